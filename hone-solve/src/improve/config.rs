use std::{fmt, num::NonZeroUsize, str::FromStr};

use thiserror::Error;

/// A positive ceiling on the number of update calls in one refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "usize", into = "usize")
)]
pub struct MaxIters(NonZeroUsize);

/// Errors that can occur when validating an iteration ceiling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iters must be a positive integer, got {value}")]
    NotPositive { value: i64 },

    #[error("max_iters must be numeric, got {value:?}")]
    NotNumeric { value: String },
}

impl MaxIters {
    /// Creates a ceiling of `value` update calls.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] if `value` is zero.
    pub fn new(value: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(ConfigError::NotPositive { value: 0 })
    }

    /// Returns the ceiling as a plain count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl From<NonZeroUsize> for MaxIters {
    fn from(value: NonZeroUsize) -> Self {
        Self(value)
    }
}

impl From<MaxIters> for usize {
    fn from(value: MaxIters) -> Self {
        value.get()
    }
}

impl TryFrom<usize> for MaxIters {
    type Error = ConfigError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for MaxIters {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(ConfigError::NotPositive { value });
        }
        // Values past `usize::MAX` only exist on narrow targets; clamp them.
        Self::new(usize::try_from(value).unwrap_or(usize::MAX))
    }
}

/// Parses a ceiling with numeric coercion.
///
/// The text is trimmed, then read as an integer or as a finite decimal that
/// is truncated toward zero. The coerced value must be positive.
impl FromStr for MaxIters {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();

        if let Ok(value) = text.parse::<i64>() {
            return Self::try_from(value);
        }

        match text.parse::<f64>() {
            #[allow(clippy::cast_possible_truncation)]
            Ok(value) if value.is_finite() => Self::try_from(value.trunc() as i64),
            _ => Err(ConfigError::NotNumeric {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MaxIters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for the [`Improve`](super::Improve) engine.
///
/// The default is unbounded: the engine keeps updating until the decision
/// accepts a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    #[cfg_attr(feature = "serde", serde(default))]
    max_iters: Option<MaxIters>,
}

impl Config {
    /// Creates a config with a validated ceiling, or no ceiling for `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is `Some(0)`.
    pub fn new(max_iters: Option<usize>) -> Result<Self, ConfigError> {
        let max_iters = max_iters.map(MaxIters::new).transpose()?;
        Ok(Self { max_iters })
    }

    /// Creates a config with no ceiling.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_iters: None }
    }

    /// Creates a config bounded by `max_iters` update calls.
    #[must_use]
    pub const fn bounded(max_iters: MaxIters) -> Self {
        Self {
            max_iters: Some(max_iters),
        }
    }

    /// Returns the ceiling on update calls, if any.
    #[must_use]
    pub fn max_iters(&self) -> Option<MaxIters> {
        self.max_iters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded() {
        assert_eq!(Config::default(), Config::unbounded());
        assert_eq!(Config::default().max_iters(), None);
    }

    #[test]
    fn new_validates_ceiling() {
        let config = Config::new(Some(10)).expect("positive ceiling");
        assert_eq!(config.max_iters().map(MaxIters::get), Some(10));

        assert_eq!(Config::new(None), Ok(Config::unbounded()));
        assert_eq!(
            Config::new(Some(0)),
            Err(ConfigError::NotPositive { value: 0 })
        );
    }

    #[test]
    fn rejects_negative_integers() {
        assert_eq!(
            MaxIters::try_from(-3_i64),
            Err(ConfigError::NotPositive { value: -3 })
        );
        assert_eq!(MaxIters::try_from(7_i64).map(MaxIters::get), Ok(7));
    }

    #[test]
    fn parses_integer_text() {
        assert_eq!("25".parse::<MaxIters>().map(MaxIters::get), Ok(25));
        assert_eq!("  4\n".parse::<MaxIters>().map(MaxIters::get), Ok(4));
    }

    #[test]
    fn coerces_decimal_text() {
        assert_eq!("10.9".parse::<MaxIters>().map(MaxIters::get), Ok(10));
        assert_eq!("1e2".parse::<MaxIters>().map(MaxIters::get), Ok(100));
        assert_eq!(
            "0.5".parse::<MaxIters>(),
            Err(ConfigError::NotPositive { value: 0 })
        );
        assert_eq!(
            "-2.5".parse::<MaxIters>(),
            Err(ConfigError::NotPositive { value: -2 })
        );
    }

    #[test]
    fn rejects_non_numeric_text() {
        for text in ["ten", "", "NaN", "inf", "3 iterations"] {
            assert_eq!(
                text.parse::<MaxIters>(),
                Err(ConfigError::NotNumeric {
                    value: text.to_string()
                }),
                "{text:?} should not parse",
            );
        }
    }

    #[test]
    fn displays_as_count() {
        let max_iters = MaxIters::new(12).expect("positive ceiling");
        assert_eq!(max_iters.to_string(), "12");
        assert_eq!(usize::from(max_iters), 12);
    }
}
