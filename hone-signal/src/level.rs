use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// The severity of a [`Signal`](crate::Signal).
///
/// The `User*` levels are meant for signals raised by application code; the
/// others for signals raised on behalf of a library or runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
    Notice,
    Deprecated,
    UserError,
    UserWarning,
    UserNotice,
    UserDeprecated,
}

impl Level {
    /// Every level, in code order.
    pub const ALL: [Level; 8] = [
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Deprecated,
        Level::UserError,
        Level::UserWarning,
        Level::UserNotice,
        Level::UserDeprecated,
    ];

    /// Returns the level's bit code. Each level has a distinct single bit.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Level::Error => 1 << 0,
            Level::Warning => 1 << 1,
            Level::Notice => 1 << 2,
            Level::Deprecated => 1 << 3,
            Level::UserError => 1 << 4,
            Level::UserWarning => 1 << 5,
            Level::UserNotice => 1 << 6,
            Level::UserDeprecated => 1 << 7,
        }
    }

    /// Returns the level whose code is `code`, if there is one.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }

    /// Returns true for `Error` and `UserError`.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Level::Error | Level::UserError)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Deprecated => "deprecated",
            Level::UserError => "user error",
            Level::UserWarning => "user warning",
            Level::UserNotice => "user notice",
            Level::UserDeprecated => "user deprecated",
        };
        f.write_str(name)
    }
}

/// A set of [`Level`]s, used to filter which signals a handler receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Levels(u32);

impl Levels {
    pub const NONE: Levels = Levels(0);

    pub const ALL: Levels = Levels(0xFF);

    /// Builds a set from raw level codes. Bits that name no level are dropped.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.code() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, level: Level) {
        self.0 |= level.code();
    }

    pub fn remove(&mut self, level: Level) {
        self.0 &= !level.code();
    }

    /// Returns the set without `level`.
    #[must_use]
    pub const fn without(self, level: Level) -> Self {
        Self(self.0 & !level.code())
    }

    /// Iterates over the levels in the set, in code order.
    pub fn iter(self) -> impl Iterator<Item = Level> {
        Level::ALL
            .into_iter()
            .filter(move |level| self.contains(*level))
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<Level> for Levels {
    fn from(level: Level) -> Self {
        Self(level.code())
    }
}

impl FromIterator<Level> for Levels {
    fn from_iter<T: IntoIterator<Item = Level>>(iter: T) -> Self {
        let mut levels = Self::NONE;
        for level in iter {
            levels.insert(level);
        }
        levels
    }
}

impl BitOr for Levels {
    type Output = Levels;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Level> for Levels {
    type Output = Levels;

    fn bitor(self, rhs: Level) -> Self::Output {
        Self(self.0 | rhs.code())
    }
}

impl BitOr for Level {
    type Output = Levels;

    fn bitor(self, rhs: Self) -> Self::Output {
        Levels(self.code() | rhs.code())
    }
}

impl BitOrAssign<Level> for Levels {
    fn bitor_assign(&mut self, rhs: Level) {
        self.insert(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_bits() {
        let combined = Level::ALL
            .iter()
            .fold(0, |bits, level| {
                assert_eq!(level.code().count_ones(), 1);
                assert_eq!(bits & level.code(), 0, "{level} reuses a bit");
                bits | level.code()
            });

        assert_eq!(combined, Levels::ALL.bits());
    }

    #[test]
    fn from_code_round_trips() {
        for level in Level::ALL {
            assert_eq!(Level::from_code(level.code()), Some(level));
        }
        assert_eq!(Level::from_code(3), None);
        assert_eq!(Level::from_code(1 << 12), None);
    }

    #[test]
    fn default_contains_everything() {
        let levels = Levels::default();
        assert!(Level::ALL.iter().all(|level| levels.contains(*level)));
        assert_eq!(levels.iter().count(), 8);
    }

    #[test]
    fn union_and_removal() {
        let mut levels = Level::UserError | Level::UserWarning;
        assert!(levels.contains(Level::UserError));
        assert!(!levels.contains(Level::Notice));

        levels |= Level::Notice;
        levels.remove(Level::UserError);

        assert_eq!(
            levels.iter().collect::<Vec<_>>(),
            vec![Level::Notice, Level::UserWarning]
        );
        assert!(Levels::ALL.without(Level::Deprecated).contains(Level::Error));
        assert!(!Levels::ALL.without(Level::Deprecated).contains(Level::Deprecated));
    }

    #[test]
    fn from_bits_drops_unknown_bits() {
        let levels = Levels::from_bits(0xFFFF_FFFF);
        assert_eq!(levels, Levels::ALL);
        assert!(Levels::from_bits(0x100).is_empty());
    }

    #[test]
    fn collects_from_iterator() {
        let levels: Levels = [Level::Warning, Level::Warning, Level::Error]
            .into_iter()
            .collect();
        assert_eq!(levels, Level::Error | Level::Warning);
        assert_eq!(Levels::from(Level::Warning).bits(), Level::Warning.code());
    }
}
