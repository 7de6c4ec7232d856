use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError},
};

use hone_core::{Decide, Update};
use tracing::trace;

use crate::{EvalError, ParseError, Value, ast::Node, parser};

/// Compiled trees keyed by source text, shared by every thread.
static CACHE: LazyLock<Mutex<HashMap<String, Arc<Node>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn cache() -> MutexGuard<'static, HashMap<String, Arc<Node>>> {
    // The map stays consistent even if a holder panicked.
    CACHE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the number of distinct sources compiled so far in this process.
#[must_use]
pub fn cache_len() -> usize {
    cache().len()
}

/// A compiled expression over positional slots `$0` through `$9`.
///
/// Compiling the same source twice reuses the cached tree, so expressions
/// are cheap to create and clone.
///
/// As a decision function the guess is bound to `$0` and the expression must
/// produce a bool. As an update function the guess is bound to `$0`, the
/// iteration count to `$1`, and the expression must produce a number.
///
/// ```
/// use hone_expr::{Expression, Value};
///
/// let hypot = Expression::compile("sqrt($0 ** 2 + $1 ** 2)")?;
/// let value = hypot.call(&[Value::Number(3.0), Value::Number(4.0)]);
///
/// assert_eq!(value, Ok(Value::Number(5.0)));
/// # Ok::<(), hone_expr::ParseError>(())
/// ```
#[derive(Clone)]
pub struct Expression {
    source: Arc<str>,
    root: Arc<Node>,
}

impl Expression {
    /// Compiles `source`, or fetches it from the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if `source` is not a valid expression. Failed
    /// compiles are not cached.
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        let cached = cache().get(source).cloned();

        let root = if let Some(root) = cached {
            root
        } else {
            // Parse outside the lock; a racing compile of the same source
            // keeps whichever tree was inserted first.
            let parsed = Arc::new(parser::parse(source)?);
            trace!(source, "compiled expression");
            Arc::clone(cache().entry(source.to_string()).or_insert(parsed))
        };

        Ok(Self {
            source: Arc::from(source),
            root,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the expression with `args` bound to `$0`, `$1`, and so on.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingArgument`] if the expression reads a slot
    /// past the end of `args`, and [`EvalError::TypeMismatch`] if a bool is
    /// used as a number or the other way around.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        self.root.eval(args)
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::compile(source)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.source).finish()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Decide<f64> for Expression {
    type Error = EvalError;

    fn decide(&mut self, guess: &f64) -> Result<bool, Self::Error> {
        self.call(&[Value::Number(*guess)])?.as_bool()
    }
}

impl Update<f64> for Expression {
    type Error = EvalError;

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, guess: &f64, iter: usize) -> Result<f64, Self::Error> {
        self.call(&[Value::Number(*guess), Value::Number(iter as f64)])?
            .as_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseErrorKind;

    use approx::assert_relative_eq;

    #[test]
    fn compiles_and_calls() {
        let expr = Expression::compile("$0 * 2 + $1").expect("should compile");

        assert_eq!(expr.source(), "$0 * 2 + $1");
        assert_eq!(
            expr.call(&[Value::Number(3.0), Value::Number(1.0)]),
            Ok(Value::Number(7.0))
        );
    }

    #[test]
    fn same_source_shares_a_tree() {
        let first = Expression::compile("$0 + 41 - 41").expect("should compile");
        let second: Expression = "$0 + 41 - 41".parse().expect("should compile");
        let other = Expression::compile("$0 + 42 - 42").expect("should compile");

        assert!(Arc::ptr_eq(&first.root, &second.root));
        assert!(!Arc::ptr_eq(&first.root, &other.root));
        assert!(cache_len() >= 2);
    }

    #[test]
    fn failed_compiles_are_not_cached() {
        let source = "$0 +* 1";
        assert!(Expression::compile(source).is_err());
        assert!(!cache().contains_key(source));
    }

    #[test]
    fn overly_nested_source_is_an_error() {
        let source = format!("{}$0{}", "(".repeat(100_000), ")".repeat(100_000));

        let error = Expression::compile(&source).expect_err("too deep");

        assert!(matches!(error.kind, ParseErrorKind::TooDeep(_)));
        assert!(!cache().contains_key(&source));
    }

    #[test]
    fn missing_argument() {
        let expr = Expression::compile("$0 + $2").expect("should compile");

        assert_eq!(
            expr.call(&[Value::Number(1.0), Value::Number(2.0)]),
            Err(EvalError::MissingArgument {
                slot: 2,
                supplied: 2
            })
        );
    }

    #[test]
    fn decides_on_guess() {
        let mut decide = Expression::compile("$0 >= 4").expect("should compile");

        assert_eq!(decide.decide(&3.0), Ok(false));
        assert_eq!(decide.decide(&4.0), Ok(true));
    }

    #[test]
    fn decision_must_be_bool() {
        let mut decide = Expression::compile("$0 + 1").expect("should compile");

        assert_eq!(
            decide.decide(&1.0),
            Err(EvalError::TypeMismatch {
                expected: "bool",
                found: "number"
            })
        );
    }

    #[test]
    fn update_sees_iteration_count() {
        let mut update = Expression::compile("$0 + $1 / 2").expect("should compile");

        assert_relative_eq!(update.update(&1.0, 3).expect("should update"), 2.5);
    }

    #[test]
    fn update_must_be_number() {
        let mut update = Expression::compile("$0 > 1").expect("should compile");

        assert!(matches!(
            update.update(&2.0, 0),
            Err(EvalError::TypeMismatch {
                expected: "number",
                ..
            })
        ));
    }

    #[test]
    fn debug_and_display_show_source() {
        let expr = Expression::compile("1 / $0 + 1").expect("should compile");

        assert_eq!(expr.to_string(), "1 / $0 + 1");
        assert_eq!(format!("{expr:?}"), r#"Expression("1 / $0 + 1")"#);
    }
}
