use std::convert::Infallible;

use crate::Fallible;

/// Decides whether a guess is good enough to stop refining.
///
/// A decision may fail. The error is handed back to whoever drove the call,
/// and a failure never counts as a rejected guess.
///
/// Closures of the form `FnMut(&G) -> bool` implement `Decide` with an
/// [`Infallible`] error. Wrap a closure returning `Result<bool, E>` in
/// [`Fallible`] to keep `E` as the error type.
pub trait Decide<G> {
    type Error;

    /// Returns `true` if `guess` is acceptable.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the decision cannot be made.
    fn decide(&mut self, guess: &G) -> Result<bool, Self::Error>;
}

/// Blanket implementation for infallible decision closures.
impl<G, F> Decide<G> for F
where
    F: FnMut(&G) -> bool,
{
    type Error = Infallible;

    fn decide(&mut self, guess: &G) -> Result<bool, Self::Error> {
        Ok(self(guess))
    }
}

impl<G, E, F> Decide<G> for Fallible<F>
where
    F: FnMut(&G) -> Result<bool, E>,
{
    type Error = E;

    fn decide(&mut self, guess: &G) -> Result<bool, Self::Error> {
        (self.0)(guess)
    }
}
