/// Adapts a closure that returns `Result` into a [`Decide`] or [`Update`].
///
/// The closure's error type becomes the trait's `Error`, so failures reach
/// the caller exactly as the closure produced them.
///
/// ```
/// use hone_core::{Decide, Fallible};
///
/// let mut positive = Fallible(|x: &f64| {
///     if x.is_nan() {
///         Err("guess is NaN")
///     } else {
///         Ok(*x > 0.0)
///     }
/// });
///
/// assert_eq!(positive.decide(&2.0), Ok(true));
/// assert_eq!(positive.decide(&f64::NAN), Err("guess is NaN"));
/// ```
///
/// [`Decide`]: crate::Decide
/// [`Update`]: crate::Update
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F> Fallible<F> {
    /// Returns the wrapped closure.
    pub fn into_inner(self) -> F {
        self.0
    }
}
