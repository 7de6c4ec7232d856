//! Short text expressions compiled into callables.
//!
//! An [`Expression`] reads its inputs from positional slots `$0` through `$9`
//! and produces a [`Value`], either a number or a bool. The language has
//! arithmetic (`+ - * / % **`), comparisons (`< <= > >= == != <=>`), logic
//! (`&& || !`) and a handful of functions: `abs`, `sqrt`, `floor`, `ceil`,
//! `round`, `min`, `max`, `exp` and `ln`.
//!
//! Expressions implement [`Decide<f64>`](hone_core::Decide) and
//! [`Update<f64>`](hone_core::Update), so they can drive a solver directly:
//!
//! ```
//! use hone_expr::Expression;
//! use hone_core::{Decide, Update};
//!
//! let mut decide = Expression::compile("$0 >= 4")?;
//! let mut update = Expression::compile("$0 + 1")?;
//!
//! let mut guess = 1.0;
//! while !decide.decide(&guess)? {
//!     guess = update.update(&guess, 0)?;
//! }
//! assert_eq!(guess, 4.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Arithmetic follows IEEE 754, so dividing by zero gives an infinity and
//! `sqrt(-1)` gives NaN rather than an error.

mod ast;
mod error;
mod expression;
mod lexer;
mod parser;
mod value;

pub use error::{EvalError, ParseError, ParseErrorKind};
pub use expression::{Expression, cache_len};
pub use value::Value;
