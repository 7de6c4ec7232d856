//! Iterative improvement of a guess.
//!
//! # Algorithm
//!
//! Starting from an initial guess, the engine asks a [`Decide`] whether the
//! guess is acceptable. If it is not, an [`Update`] produces the next guess
//! and the check repeats. Every guess is appended to the engine's
//! [`Trajectory`].
//!
//! Per invocation the engine moves through
//! `Start → Checking → {Accepted | Updating → Checking}`, with a side exit
//! to `Exhausted` once the optional ceiling of update calls is reached.
//!
//! # History
//!
//! The trajectory lives as long as the engine, not as long as a call.
//! Invoking the same engine twice appends the second run's guesses after
//! the first run's. Construct a fresh engine when each run needs its own
//! history.
//!
//! # Failures
//!
//! Failures inside the decision or update functions are returned as
//! [`Error::Decide`] or [`Error::Update`] holding the caller's error
//! untouched. A failed decision is never treated as a rejected guess.
//! Reaching the ceiling returns [`Error::MaxIters`]; the guesses produced
//! before that point stay in the trajectory for diagnosis.

mod config;
mod error;
mod trajectory;

pub use config::{Config, ConfigError, MaxIters};
pub use error::Error;
pub use trajectory::Trajectory;

use hone_core::{Decide, Update};

/// A refinement engine built from a decision and an update function.
///
/// See the [module docs](self) for the loop and its termination policy.
#[derive(Debug, Clone)]
pub struct Improve<G, D, U> {
    decide: D,
    update: U,
    config: Config,
    trajectory: Trajectory<G>,
}

impl<G, D, U> Improve<G, D, U>
where
    D: Decide<G>,
    U: Update<G>,
{
    /// Creates an unbounded engine.
    ///
    /// Neither function is called until [`invoke`](Self::invoke).
    pub fn new(decide: D, update: U) -> Self {
        Self::with_config(decide, update, Config::default())
    }

    /// Creates an engine with the given config.
    pub fn with_config(decide: D, update: U, config: Config) -> Self {
        Self {
            decide,
            update,
            config,
            trajectory: Trajectory::default(),
        }
    }

    /// Sets the ceiling on update calls per invocation, or clears it with
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is `Some(0)`. The previous ceiling is
    /// kept in that case.
    pub fn set_max_iters(&mut self, max_iters: Option<usize>) -> Result<(), ConfigError> {
        self.config = Config::new(max_iters)?;
        Ok(())
    }

    /// Sets the ceiling from text, coercing numeric strings.
    ///
    /// `"none"` (in any case) clears the ceiling. Anything else must coerce
    /// to a positive integer, see [`MaxIters`]'s `FromStr` impl.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is non-numeric or not positive. The
    /// previous ceiling is kept in that case.
    pub fn set_max_iters_str(&mut self, max_iters: &str) -> Result<(), ConfigError> {
        self.config = if max_iters.trim().eq_ignore_ascii_case("none") {
            Config::unbounded()
        } else {
            Config::bounded(max_iters.parse()?)
        };
        Ok(())
    }

    /// Replaces the engine's config.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the ceiling on update calls, if any.
    #[must_use]
    pub fn max_iters(&self) -> Option<MaxIters> {
        self.config.max_iters()
    }

    /// Refines `guess` until the decision function accepts it.
    ///
    /// Returns the accepted guess. The initial guess and every update are
    /// appended to the trajectory, which keeps growing across invocations.
    ///
    /// # Errors
    ///
    /// - [`Error::MaxIters`] when the ceiling is reached without acceptance
    /// - [`Error::Decide`] or [`Error::Update`] when a caller function fails
    pub fn invoke(&mut self, guess: G) -> Result<G, Error<D::Error, U::Error>>
    where
        G: Clone,
    {
        let max_iters = self.config.max_iters();
        tracing::debug!(
            max_iters = max_iters.map(MaxIters::get),
            recorded = self.trajectory.len(),
            "refinement started",
        );

        let mut current = guess;
        self.trajectory.push(current.clone());

        let mut iters = 0;
        while !self.decide.decide(&current).map_err(Error::Decide)? {
            let next = self
                .update
                .update(&current, iters)
                .map_err(Error::Update)?;
            self.trajectory.push(next.clone());
            current = next;
            iters += 1;
            tracing::trace!(iter = iters, "guess updated");

            if let Some(max_iters) = max_iters
                && iters >= max_iters.get()
            {
                tracing::warn!(max_iters = max_iters.get(), "iteration limit reached");
                return Err(Error::MaxIters { max_iters });
            }
        }

        tracing::debug!(iters, "guess accepted");
        Ok(current)
    }

    /// Returns every guess produced by this engine so far, oldest first.
    #[must_use]
    pub fn trajectory(&self) -> &Trajectory<G> {
        &self.trajectory
    }

    /// Consumes the engine and returns its trajectory.
    #[must_use]
    pub fn into_trajectory(self) -> Trajectory<G> {
        self.trajectory
    }
}
