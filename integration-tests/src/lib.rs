//! Shared fixtures for the cross-crate tests in `tests/`.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A failure with a numeric code, standing in for a caller's domain error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Boom {
    pub message: String,
    pub code: i64,
}

impl Boom {
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// A step that fails on the listed iterations and adds one otherwise.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("step {iter} could not be computed")]
pub struct StepFailed {
    pub iter: usize,
}

/// Adds one to `guess`, except on iterations listed in `fail_on`.
pub fn flaky_increment(fail_on: &[usize]) -> impl FnMut(&i32, usize) -> Result<i32, StepFailed> {
    let fail_on = fail_on.to_vec();
    move |guess: &i32, iter: usize| {
        if fail_on.contains(&iter) {
            Err(StepFailed { iter })
        } else {
            Ok(guess + 1)
        }
    }
}
