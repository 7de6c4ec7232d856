use std::cmp::Ordering;

use crate::{EvalError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Pow,
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Cmp,
    Eq,
    Ne,
    And,
    Or,
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Abs,
    Sqrt,
    Floor,
    Ceil,
    Round,
    Min,
    Max,
    Exp,
    Ln,
}

impl Func {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => Func::Abs,
            "sqrt" => Func::Sqrt,
            "floor" => Func::Floor,
            "ceil" => Func::Ceil,
            "round" => Func::Round,
            "min" => Func::Min,
            "max" => Func::Max,
            "exp" => Func::Exp,
            "ln" => Func::Ln,
            _ => return None,
        })
    }

    pub(crate) fn arity(self) -> usize {
        match self {
            Func::Min | Func::Max => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Func::Abs, [x]) => x.abs(),
            (Func::Sqrt, [x]) => x.sqrt(),
            (Func::Floor, [x]) => x.floor(),
            (Func::Ceil, [x]) => x.ceil(),
            (Func::Round, [x]) => x.round(),
            (Func::Exp, [x]) => x.exp(),
            (Func::Ln, [x]) => x.ln(),
            (Func::Min, [a, b]) => a.min(*b),
            (Func::Max, [a, b]) => a.max(*b),
            // Arity is checked at parse time.
            _ => f64::NAN,
        }
    }
}

/// A compiled syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Literal(Value),
    Slot(usize),
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Func, Vec<Node>),
}

impl Node {
    /// Evaluates the tree with `args` bound to the slots in order.
    pub(crate) fn eval(&self, args: &[Value]) -> Result<Value, EvalError> {
        match self {
            Node::Literal(value) => Ok(*value),
            Node::Slot(slot) => args.get(*slot).copied().ok_or(EvalError::MissingArgument {
                slot: *slot,
                supplied: args.len(),
            }),
            Node::Unary(op, operand) => {
                let value = operand.eval(args)?;
                Ok(match op {
                    UnaryOp::Neg => Value::Number(-value.as_number()?),
                    UnaryOp::Not => Value::Bool(!value.as_bool()?),
                })
            }
            Node::Binary(BinaryOp::And, lhs, rhs) => {
                let value = lhs.eval(args)?.as_bool()? && rhs.eval(args)?.as_bool()?;
                Ok(Value::Bool(value))
            }
            Node::Binary(BinaryOp::Or, lhs, rhs) => {
                let value = lhs.eval(args)?.as_bool()? || rhs.eval(args)?.as_bool()?;
                Ok(Value::Bool(value))
            }
            Node::Binary(op, lhs, rhs) => binary(*op, lhs.eval(args)?, rhs.eval(args)?),
            Node::Call(func, params) => {
                let values = params
                    .iter()
                    .map(|param| param.eval(args)?.as_number())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Number(func.apply(&values)))
            }
        }
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Pow => arith(lhs, rhs, f64::powf),
        BinaryOp::Mul => arith(lhs, rhs, |a, b| a * b),
        BinaryOp::Div => arith(lhs, rhs, |a, b| a / b),
        BinaryOp::Rem => arith(lhs, rhs, |a, b| a % b),
        BinaryOp::Add => arith(lhs, rhs, |a, b| a + b),
        BinaryOp::Sub => arith(lhs, rhs, |a, b| a - b),
        BinaryOp::Cmp => arith(lhs, rhs, spaceship),
        BinaryOp::Lt => compare(lhs, rhs, |a, b| a < b),
        BinaryOp::Le => compare(lhs, rhs, |a, b| a <= b),
        BinaryOp::Gt => compare(lhs, rhs, |a, b| a > b),
        BinaryOp::Ge => compare(lhs, rhs, |a, b| a >= b),
        BinaryOp::Eq => equals(lhs, rhs).map(Value::Bool),
        BinaryOp::Ne => equals(lhs, rhs).map(|equal| Value::Bool(!equal)),
        BinaryOp::And => Ok(Value::Bool(lhs.as_bool()? && rhs.as_bool()?)),
        BinaryOp::Or => Ok(Value::Bool(lhs.as_bool()? || rhs.as_bool()?)),
    }
}

fn arith(lhs: Value, rhs: Value, op: fn(f64, f64) -> f64) -> Result<Value, EvalError> {
    Ok(Value::Number(op(lhs.as_number()?, rhs.as_number()?)))
}

fn compare(lhs: Value, rhs: Value, op: fn(f64, f64) -> bool) -> Result<Value, EvalError> {
    Ok(Value::Bool(op(lhs.as_number()?, rhs.as_number()?)))
}

/// Equality is defined between values of the same kind only.
fn equals(lhs: Value, rhs: Value) -> Result<bool, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        _ => Err(EvalError::TypeMismatch {
            expected: lhs.kind(),
            found: rhs.kind(),
        }),
    }
}

/// Three-way comparison as -1, 0 or 1, with NaN for unordered operands.
fn spaceship(a: f64, b: f64) -> f64 {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => -1.0,
        Some(Ordering::Equal) => 0.0,
        Some(Ordering::Greater) => 1.0,
        None => f64::NAN,
    }
}
