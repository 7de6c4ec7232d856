use std::{collections::BTreeMap, fmt, panic::Location};

use crate::Level;

/// A structured record of a failure or warning.
///
/// A signal carries its [`Level`], a human-readable message, the source
/// location that created it, and a snapshot of relevant values as
/// key/value strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    level: Level,
    message: String,
    origin: &'static Location<'static>,
    context: BTreeMap<String, String>,
}

impl Signal {
    /// Creates a signal whose origin is the caller's location.
    #[track_caller]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            origin: Location::caller(),
            context: BTreeMap::new(),
        }
    }

    /// Replaces the origin location.
    #[must_use]
    pub fn at(mut self, origin: &'static Location<'static>) -> Self {
        self.origin = origin;
        self
    }

    /// Adds a value to the context snapshot, replacing any previous value
    /// under the same key.
    #[must_use]
    #[allow(clippy::needless_pass_by_value)] // accepts numbers and strings alike
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the level's bit code.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.level.code()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source location that raised the signal.
    #[must_use]
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    #[must_use]
    pub fn file(&self) -> &'static str {
        self.origin.file()
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.origin.line()
    }

    #[must_use]
    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}:{}",
            self.level,
            self.message,
            self.file(),
            self.line()
        )
    }
}
