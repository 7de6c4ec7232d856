use thiserror::Error;

use super::MaxIters;

/// Errors that can occur while refining a guess.
///
/// `DE` and `UE` are the error types of the decision and update functions.
/// Their failures are carried as-is so callers can recover their own
/// value with [`Error::into_decide`] or [`Error::into_update`].
#[derive(Debug, Error)]
pub enum Error<DE, UE> {
    /// The ceiling was reached before any guess was accepted.
    ///
    /// Every guess produced up to this point remains in the trajectory.
    #[error("reached the iteration limit of {max_iters}")]
    MaxIters { max_iters: MaxIters },

    #[error("decision function failed")]
    Decide(#[source] DE),

    #[error("update function failed")]
    Update(#[source] UE),
}

impl<DE, UE> Error<DE, UE> {
    /// Returns true if the refinement stopped at the iteration ceiling.
    #[must_use]
    pub fn is_max_iters(&self) -> bool {
        matches!(self, Self::MaxIters { .. })
    }

    /// Returns the decision function's error, if that is what failed.
    pub fn into_decide(self) -> Option<DE> {
        match self {
            Self::Decide(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the update function's error, if that is what failed.
    pub fn into_update(self) -> Option<UE> {
        match self {
            Self::Update(error) => Some(error),
            _ => None,
        }
    }
}
