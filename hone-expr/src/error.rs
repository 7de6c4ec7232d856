use thiserror::Error;

/// An expression that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the source where the problem starts.
    pub offset: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// What went wrong while compiling an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid slot `{0}`, expected `$0` through `$9`")]
    InvalidSlot(String),

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("`{name}` takes {expected} argument(s) but {found} were given")]
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unexpected {0} after the end of the expression")]
    TrailingInput(String),

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
}

/// A compiled expression that failed while being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("slot ${slot} is not bound, only {supplied} argument(s) were supplied")]
    MissingArgument { slot: usize, supplied: usize },

    #[error("expected a {expected} but found a {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
