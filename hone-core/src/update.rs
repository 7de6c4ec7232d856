use std::convert::Infallible;

use crate::Fallible;

/// Produces the next guess from the current one.
///
/// The `iter` argument is the number of updates already completed in the
/// current refinement, so the first update of a run receives `0`.
///
/// Closures of the form `FnMut(&G, usize) -> G` implement `Update` with an
/// [`Infallible`] error. Wrap a closure returning `Result<G, E>` in
/// [`Fallible`] to keep `E` as the error type.
pub trait Update<G> {
    type Error;

    /// Returns the guess that follows `guess`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the next guess cannot be produced.
    fn update(&mut self, guess: &G, iter: usize) -> Result<G, Self::Error>;
}

/// Blanket implementation for infallible update closures.
impl<G, F> Update<G> for F
where
    F: FnMut(&G, usize) -> G,
{
    type Error = Infallible;

    fn update(&mut self, guess: &G, iter: usize) -> Result<G, Self::Error> {
        Ok(self(guess, iter))
    }
}

impl<G, E, F> Update<G> for Fallible<F>
where
    F: FnMut(&G, usize) -> Result<G, E>,
{
    type Error = E;

    fn update(&mut self, guess: &G, iter: usize) -> Result<G, Self::Error> {
        (self.0)(guess, iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_with<G, U: Update<G>>(update: &mut U, guess: &G, iter: usize) -> Result<G, U::Error> {
        update.update(guess, iter)
    }

    #[test]
    fn closure_updates() {
        let mut increment = |guess: &i32, _iter: usize| guess + 1;

        assert_eq!(update_with(&mut increment, &1, 0), Ok(2));
        assert_eq!(update_with(&mut increment, &2, 1), Ok(3));
    }

    #[test]
    fn closure_sees_iteration_count() {
        let mut add_iter = |guess: &usize, iter: usize| guess + iter;

        assert_eq!(update_with(&mut add_iter, &10, 0), Ok(10));
        assert_eq!(update_with(&mut add_iter, &10, 5), Ok(15));
    }

    #[test]
    fn works_with_non_copy_guesses() {
        let mut push = |guess: &Vec<u8>, iter: usize| {
            let mut next = guess.clone();
            next.push(u8::try_from(iter).unwrap());
            next
        };

        assert_eq!(update_with(&mut push, &vec![7], 3), Ok(vec![7, 3]));
    }

    #[test]
    fn fallible_passes_error_through() {
        let mut halve = Fallible(|guess: &u32, _iter: usize| {
            if guess % 2 == 0 {
                Ok(guess / 2)
            } else {
                Err(format!("{guess} is odd"))
            }
        });

        assert_eq!(update_with(&mut halve, &8, 0), Ok(4));
        assert_eq!(update_with(&mut halve, &5, 1), Err("5 is odd".to_string()));
    }
}
