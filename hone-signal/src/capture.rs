use std::{cell::RefCell, mem, rc::Rc};

use hone_core::{Decide, Update};

use crate::{Levels, Signal, channel};

/// Runs a callable while recording every signal it raises.
///
/// Each call installs a handler for the configured [`Levels`] (all of them
/// by default), runs the wrapped callable, and removes the handler again.
/// Signals outside the configured levels go to whatever handler was
/// installed before. The record accumulates across calls until
/// [`take`](Self::take) drains it.
///
/// ```
/// use hone_signal::{CaptureSignals, Level, Levels, trigger};
///
/// let mut capture = CaptureSignals::new(|(a, b): (f64, f64)| {
///     if b == 0.0 {
///         trigger(Level::Warning, "division by zero");
///     }
///     a / b
/// });
/// capture.set_levels(Levels::from(Level::Warning));
///
/// assert_eq!(capture.call((6.0, 3.0)), 2.0);
/// assert!(capture.call((1.0, 0.0)).is_infinite());
/// assert_eq!(capture.captured().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CaptureSignals<F> {
    inner: F,
    levels: Levels,
    captured: Vec<Signal>,
}

impl<F> CaptureSignals<F> {
    /// Wraps `inner`, capturing signals of every level.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            levels: Levels::ALL,
            captured: Vec::new(),
        }
    }

    /// Sets which levels are captured on later calls.
    pub fn set_levels(&mut self, levels: Levels) {
        self.levels = levels;
    }

    #[must_use]
    pub fn levels(&self) -> Levels {
        self.levels
    }

    /// Returns the captured signals, oldest first.
    #[must_use]
    pub fn captured(&self) -> &[Signal] {
        &self.captured
    }

    /// Drains and returns the captured signals.
    pub fn take(&mut self) -> Vec<Signal> {
        mem::take(&mut self.captured)
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

    /// Runs `f` on the wrapped value with capturing enabled.
    ///
    /// This is the general form of [`call`](Self::call), for wrapped values
    /// that are not plain closures.
    pub fn run<R>(&mut self, f: impl FnOnce(&mut F) -> R) -> R {
        let buffer = Rc::new(RefCell::new(Vec::new()));

        let output = {
            let sink = Rc::clone(&buffer);
            let _guard = channel::install(self.levels, move |signal: &Signal| {
                sink.borrow_mut().push(signal.clone());
            });
            f(&mut self.inner)
        };

        self.captured.append(&mut buffer.borrow_mut());
        output
    }

    /// Calls the wrapped closure with `input` and returns its output.
    ///
    /// Pass several arguments as a tuple.
    pub fn call<I, O>(&mut self, input: I) -> O
    where
        F: FnMut(I) -> O,
    {
        self.run(|inner| inner(input))
    }
}

impl<G, F> Decide<G> for CaptureSignals<F>
where
    F: Decide<G>,
{
    type Error = F::Error;

    fn decide(&mut self, guess: &G) -> Result<bool, Self::Error> {
        self.run(|inner| inner.decide(guess))
    }
}

impl<G, F> Update<G> for CaptureSignals<F>
where
    F: Update<G>,
{
    type Error = F::Error;

    fn update(&mut self, guess: &G, iter: usize) -> Result<G, Self::Error> {
        self.run(|inner| inner.update(guess, iter))
    }
}
