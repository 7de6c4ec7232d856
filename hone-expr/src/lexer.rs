use crate::{ParseError, ParseErrorKind};

/// The highest positional slot an expression may reference.
pub(crate) const MAX_SLOT: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Slot(usize),
    Ident(String),
    LParen,
    RParen,
    Comma,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Bang,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    EqEq,
    BangEq,
    Spaceship,
    AndAnd,
    OrOr,
}

impl Token {
    /// Short description used in parse errors.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(value) => format!("number {value}"),
            Token::Slot(slot) => format!("slot ${slot}"),
            Token::Ident(name) => format!("identifier `{name}`"),
            other => format!("`{}`", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::StarStar => "**",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Bang => "!",
            Token::Less => "<",
            Token::LessEq => "<=",
            Token::Greater => ">",
            Token::GreaterEq => ">=",
            Token::EqEq => "==",
            Token::BangEq => "!=",
            Token::Spaceship => "<=>",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Number(_) | Token::Slot(_) | Token::Ident(_) => "",
        }
    }
}

/// A token and the byte offset where it starts.
pub(crate) type Spanned = (usize, Token);

/// Splits `source` into tokens.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let byte = bytes[pos];

        if byte.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let fraction_start = byte == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit);
        if byte.is_ascii_digit() || fraction_start {
            let (value, end) = number(source, pos)?;
            tokens.push((start, Token::Number(value)));
            pos = end;
            continue;
        }

        if byte.is_ascii_alphabetic() || byte == b'_' {
            while bytes
                .get(pos)
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
            {
                pos += 1;
            }
            tokens.push((start, Token::Ident(source[start..pos].to_string())));
            continue;
        }

        if byte == b'$' {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let digits = &source[start + 1..pos];
            let slot = digits
                .parse::<usize>()
                .ok()
                .filter(|slot| *slot <= MAX_SLOT)
                .ok_or_else(|| {
                    let text = source[start..pos].to_string();
                    ParseError::new(start, ParseErrorKind::InvalidSlot(text))
                })?;
            tokens.push((start, Token::Slot(slot)));
            continue;
        }

        let rest = &source[pos..];
        let (token, len) = if rest.starts_with("<=>") {
            (Token::Spaceship, 3)
        } else if rest.starts_with("**") {
            (Token::StarStar, 2)
        } else if rest.starts_with("<=") {
            (Token::LessEq, 2)
        } else if rest.starts_with(">=") {
            (Token::GreaterEq, 2)
        } else if rest.starts_with("==") {
            (Token::EqEq, 2)
        } else if rest.starts_with("!=") {
            (Token::BangEq, 2)
        } else if rest.starts_with("&&") {
            (Token::AndAnd, 2)
        } else if rest.starts_with("||") {
            (Token::OrOr, 2)
        } else {
            let token = match byte {
                b'(' => Token::LParen,
                b')' => Token::RParen,
                b',' => Token::Comma,
                b'+' => Token::Plus,
                b'-' => Token::Minus,
                b'*' => Token::Star,
                b'/' => Token::Slash,
                b'%' => Token::Percent,
                b'!' => Token::Bang,
                b'<' => Token::Less,
                b'>' => Token::Greater,
                _ => {
                    let found = rest.chars().next().unwrap_or_default();
                    return Err(ParseError::new(start, ParseErrorKind::UnexpectedChar(found)));
                }
            };
            (token, 1)
        };

        tokens.push((start, token));
        pos += len;
    }

    Ok(tokens)
}

/// Scans a decimal literal starting at `start`, with optional fraction and
/// exponent. Returns the value and the offset just past it.
fn number(source: &str, start: usize) -> Result<(f64, usize), ParseError> {
    let bytes = source.as_bytes();
    let mut pos = start;

    let digits = |pos: &mut usize| {
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    };

    digits(&mut pos);
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        digits(&mut pos);
    }
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = exp;
            digits(&mut pos);
        }
    }

    let text = &source[start..pos];
    text.parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|_| ParseError::new(start, ParseErrorKind::InvalidNumber(text.to_string())))
}
