//! Recursive-descent parser.
//!
//! Precedence, loosest first:
//!
//! ```text
//! or          := and ('||' and)*
//! and         := equality ('&&' equality)*
//! equality    := comparison (('==' | '!=') comparison)*
//! comparison  := additive (('<' | '<=' | '>' | '>=' | '<=>') additive)*
//! additive    := term (('+' | '-') term)*
//! term        := unary (('*' | '/' | '%') unary)*
//! unary       := ('-' | '!') unary | power
//! power       := primary ('**' unary)?
//! primary     := number | 'true' | 'false' | slot | ident '(' args ')' | '(' or ')'
//! ```
//!
//! `**` binds tighter than a leading minus, so `-2 ** 2` is `-(2 ** 2)`, and
//! it associates to the right through its `unary` operand.
//!
//! Prefix operators, exponents, parentheses and call arguments each open a
//! nesting level; input deeper than `MAX_DEPTH` is rejected so that neither
//! parsing nor evaluation can exhaust the stack.

use crate::{
    ParseError, ParseErrorKind, Value,
    ast::{BinaryOp, Func, Node, UnaryOp},
    lexer::{self, Spanned, Token},
};

/// How deeply prefix operators, exponents, parentheses and call arguments
/// may nest.
pub(crate) const MAX_DEPTH: usize = 128;

/// Parses `source` into a syntax tree.
pub(crate) fn parse(source: &str) -> Result<Node, ParseError> {
    let mut parser = Parser {
        tokens: lexer::tokenize(source)?,
        pos: 0,
        end: source.len(),
        depth: 0,
    };

    let node = parser.or()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(node),
        Some((offset, token)) => Err(ParseError::new(
            *offset,
            ParseErrorKind::TrailingInput(token.describe()),
        )),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    /// Consumes the next token if `op` maps it to an operator.
    fn eat<T>(&mut self, op: impl Fn(&Token) -> Option<T>) -> Option<T> {
        let found = self.peek().and_then(op);
        if found.is_some() {
            self.pos += 1;
        }
        found
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        match self.next() {
            Some((_, token)) if token == *expected => Ok(()),
            Some((offset, token)) => Err(ParseError::new(
                offset,
                ParseErrorKind::UnexpectedToken(token.describe()),
            )),
            None => Err(self.unexpected_end()),
        }
    }

    fn unexpected_end(&self) -> ParseError {
        ParseError::new(self.end, ParseErrorKind::UnexpectedEnd)
    }

    /// Runs `parse` one nesting level deeper.
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        if self.depth >= MAX_DEPTH {
            let offset = self.tokens.get(self.pos).map_or(self.end, |(offset, _)| *offset);
            return Err(ParseError::new(offset, ParseErrorKind::TooDeep(MAX_DEPTH)));
        }

        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    /// Parses a left-associative chain of `operand`s joined by `op`.
    fn chain(
        &mut self,
        operand: fn(&mut Self) -> Result<Node, ParseError>,
        op: fn(&Token) -> Option<BinaryOp>,
    ) -> Result<Node, ParseError> {
        let mut node = operand(self)?;
        while let Some(found) = self.eat(op) {
            let rhs = operand(self)?;
            node = Node::Binary(found, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn or(&mut self) -> Result<Node, ParseError> {
        self.chain(Self::and, |token| {
            matches!(token, Token::OrOr).then_some(BinaryOp::Or)
        })
    }

    fn and(&mut self) -> Result<Node, ParseError> {
        self.chain(Self::equality, |token| {
            matches!(token, Token::AndAnd).then_some(BinaryOp::And)
        })
    }

    fn equality(&mut self) -> Result<Node, ParseError> {
        self.chain(Self::comparison, |token| match token {
            Token::EqEq => Some(BinaryOp::Eq),
            Token::BangEq => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    fn comparison(&mut self) -> Result<Node, ParseError> {
        self.chain(Self::additive, |token| match token {
            Token::Less => Some(BinaryOp::Lt),
            Token::LessEq => Some(BinaryOp::Le),
            Token::Greater => Some(BinaryOp::Gt),
            Token::GreaterEq => Some(BinaryOp::Ge),
            Token::Spaceship => Some(BinaryOp::Cmp),
            _ => None,
        })
    }

    fn additive(&mut self) -> Result<Node, ParseError> {
        self.chain(Self::term, |token| match token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        self.chain(Self::unary, |token| match token {
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            Token::Percent => Some(BinaryOp::Rem),
            _ => None,
        })
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        let op = self.eat(|token| match token {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Bang => Some(UnaryOp::Not),
            _ => None,
        });

        match op {
            Some(op) => Ok(Node::Unary(op, Box::new(self.nested(Self::unary)?))),
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, ParseError> {
        let base = self.primary()?;
        if self.eat(|token| matches!(token, Token::StarStar).then_some(())).is_some() {
            let exponent = self.nested(Self::unary)?;
            return Ok(Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let Some((offset, token)) = self.next() else {
            return Err(self.unexpected_end());
        };

        match token {
            Token::Number(value) => Ok(Node::Literal(Value::Number(value))),
            Token::Slot(slot) => Ok(Node::Slot(slot)),
            Token::LParen => {
                let inner = self.nested(Self::or)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) if name == "true" => Ok(Node::Literal(Value::Bool(true))),
            Token::Ident(name) if name == "false" => Ok(Node::Literal(Value::Bool(false))),
            Token::Ident(name) if self.peek() == Some(&Token::LParen) => self.call(offset, name),
            other => Err(ParseError::new(
                offset,
                ParseErrorKind::UnexpectedToken(other.describe()),
            )),
        }
    }

    fn call(&mut self, offset: usize, name: String) -> Result<Node, ParseError> {
        let Some(func) = Func::lookup(&name) else {
            return Err(ParseError::new(offset, ParseErrorKind::UnknownFunction(name)));
        };
        self.expect(&Token::LParen)?;

        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
        } else {
            loop {
                args.push(self.nested(Self::or)?);
                match self.next() {
                    Some((_, Token::Comma)) => {}
                    Some((_, Token::RParen)) => break,
                    Some((offset, token)) => {
                        return Err(ParseError::new(
                            offset,
                            ParseErrorKind::UnexpectedToken(token.describe()),
                        ));
                    }
                    None => return Err(self.unexpected_end()),
                }
            }
        }

        if args.len() != func.arity() {
            return Err(ParseError::new(
                offset,
                ParseErrorKind::WrongArity {
                    name,
                    expected: func.arity(),
                    found: args.len(),
                },
            ));
        }

        Ok(Node::Call(func, args))
    }
}
