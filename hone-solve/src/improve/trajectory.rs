use std::{ops::Index, slice};

/// The ordered history of every guess an engine has produced, oldest first.
///
/// The first element is the initial guess of the first invocation and the
/// last element is the most recent guess. Only the engine appends to it;
/// callers get read access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory<G> {
    guesses: Vec<G>,
}

impl<G> Default for Trajectory<G> {
    fn default() -> Self {
        Self {
            guesses: Vec::new(),
        }
    }
}

impl<G> Trajectory<G> {
    pub(super) fn push(&mut self, guess: G) {
        self.guesses.push(guess);
    }

    /// Returns the number of recorded guesses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    /// Returns true if no guess has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    /// Returns the oldest recorded guess.
    #[must_use]
    pub fn first(&self) -> Option<&G> {
        self.guesses.first()
    }

    /// Returns the most recent guess.
    #[must_use]
    pub fn last(&self) -> Option<&G> {
        self.guesses.last()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&G> {
        self.guesses.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, G> {
        self.guesses.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[G] {
        &self.guesses
    }

    /// Copies the history into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<G>
    where
        G: Clone,
    {
        self.guesses.clone()
    }

    /// Consumes the trajectory and returns the recorded guesses.
    #[must_use]
    pub fn into_vec(self) -> Vec<G> {
        self.guesses
    }
}

impl<G> Index<usize> for Trajectory<G> {
    type Output = G;

    fn index(&self, index: usize) -> &Self::Output {
        &self.guesses[index]
    }
}

impl<'a, G> IntoIterator for &'a Trajectory<G> {
    type Item = &'a G;
    type IntoIter = slice::Iter<'a, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.guesses.iter()
    }
}
