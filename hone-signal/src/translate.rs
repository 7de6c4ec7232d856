use std::{any::type_name, convert::Infallible, error::Error as StdError, panic::Location};

use hone_core::{Decide, Update};

use crate::{Level, Signal, channel};

/// The message template used unless [`FailureToSignal::set_format`] is called.
pub const DEFAULT_FORMAT: &str = "{message} ({code}) raised at {file}:{line} as {kind} failure.";

type CodeFn = Box<dyn Fn(&(dyn StdError + 'static)) -> Option<i64>>;

/// Turns failures returned by a callable into raised signals.
///
/// When the wrapped callable returns `Err(e)`, the adapter formats `e` into
/// a message, raises a [`Signal`] with the configured [`Level`] (by default
/// [`Level::UserError`]) and reports the call as failed instead of
/// returning the error. Pair it with [`CaptureSignals`](crate::CaptureSignals)
/// to collect the failures of a whole run.
///
/// # Message format
///
/// The template may reference these placeholders:
///
/// - `{message}`: the error's `Display` output
/// - `{code}`: the code assigned with [`set_code`](Self::set_code), or 0
/// - `{file}`, `{line}`: where the failure was raised
/// - `{kind}`: the short type name of the error
///
/// Unknown placeholders are left as written.
///
/// # Origin
///
/// [`call`](Self::call) records its caller as the origin. When the adapter
/// acts as a [`Decide`] or [`Update`], the origin is where the adapter was
/// constructed.
pub struct FailureToSignal<F> {
    inner: F,
    format: String,
    level: Level,
    code: Option<CodeFn>,
    origin: &'static Location<'static>,
}

impl<F> FailureToSignal<F> {
    /// Wraps `inner` with the default format and level.
    #[track_caller]
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            format: DEFAULT_FORMAT.to_string(),
            level: Level::UserError,
            code: None,
            origin: Location::caller(),
        }
    }

    /// Sets the message template.
    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Sets the level of raised signals.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Assigns codes to failures of type `E`.
    ///
    /// Failures of other types keep the code 0.
    pub fn set_code<E, C>(&mut self, code: C)
    where
        E: StdError + 'static,
        C: Fn(&E) -> i64 + 'static,
    {
        self.code = Some(Box::new(move |error: &(dyn StdError + 'static)| {
            error.downcast_ref::<E>().map(&code)
        }));
    }

    /// Returns the code assigned to `error`.
    pub fn code_of<E>(&self, error: &E) -> i64
    where
        E: StdError + 'static,
    {
        let error: &(dyn StdError + 'static) = error;
        self.code
            .as_ref()
            .and_then(|code| code(error))
            .unwrap_or(0)
    }

    /// Renders the message that a failure raised at `origin` produces.
    pub fn format_failure<E>(&self, error: &E, origin: &Location<'_>) -> String
    where
        E: StdError + 'static,
    {
        render(&self.format, |name| match name {
            "message" => Some(error.to_string()),
            "code" => Some(self.code_of(error).to_string()),
            "file" => Some(origin.file().to_string()),
            "line" => Some(origin.line().to_string()),
            "kind" => Some(short_type_name::<E>().to_string()),
            _ => None,
        })
    }

    pub fn get_ref(&self) -> &F {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut F {
        &mut self.inner
    }

    pub fn into_inner(self) -> F {
        self.inner
    }

    /// Calls the wrapped closure, raising a signal if it fails.
    ///
    /// Returns `Some(output)` on success and `None` after raising a signal
    /// for a failure.
    #[track_caller]
    pub fn call<I, O, E>(&mut self, input: I) -> Option<O>
    where
        F: FnMut(I) -> Result<O, E>,
        E: StdError + 'static,
    {
        let origin = Location::caller();
        match (self.inner)(input) {
            Ok(output) => Some(output),
            Err(error) => {
                self.raise(&error, origin);
                None
            }
        }
    }

    fn raise<E>(&self, error: &E, origin: &'static Location<'static>)
    where
        E: StdError + 'static,
    {
        let signal = Signal::new(self.level, self.format_failure(error, origin))
            .at(origin)
            .with_context("code", self.code_of(error))
            .with_context("kind", short_type_name::<E>())
            .with_context("source", source_chain(error));
        channel::raise(&signal);
    }
}

/// A failed decision is raised as a signal and counts as a rejection.
impl<G, F> Decide<G> for FailureToSignal<F>
where
    F: Decide<G>,
    F::Error: StdError + 'static,
{
    type Error = Infallible;

    fn decide(&mut self, guess: &G) -> Result<bool, Self::Error> {
        match self.inner.decide(guess) {
            Ok(accepted) => Ok(accepted),
            Err(error) => {
                self.raise(&error, self.origin);
                Ok(false)
            }
        }
    }
}

/// A failed update is raised as a signal and keeps the current guess.
impl<G, F> Update<G> for FailureToSignal<F>
where
    F: Update<G>,
    F::Error: StdError + 'static,
    G: Clone,
{
    type Error = Infallible;

    fn update(&mut self, guess: &G, iter: usize) -> Result<G, Self::Error> {
        match self.inner.update(guess, iter) {
            Ok(next) => Ok(next),
            Err(error) => {
                self.raise(&error, self.origin);
                Ok(guess.clone())
            }
        }
    }
}

/// Returns the last path segment of `T`'s type name.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Joins the messages of `error`'s sources, outermost first.
fn source_chain(error: &(dyn StdError + 'static)) -> String {
    let mut messages = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages.join(": ")
}

/// Replaces each `{name}` in `template` for which `lookup` has a value.
fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replaced = after
            .find('}')
            .and_then(|end| lookup(&after[..end]).map(|value| (end, value)));

        if let Some((end, value)) = replaced {
            out.push_str(&value);
            rest = &after[end + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}
