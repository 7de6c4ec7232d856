//! Failure signals for the Hone toolkit.
//!
//! Code that cannot or does not return errors can still report problems by
//! raising a [`Signal`]: a record with a [`Level`], a message, the source
//! location that raised it, and a snapshot of relevant values.
//!
//! Signals go to the innermost handler installed on the current thread with
//! [`install`]. The returned [`HandlerGuard`] removes the handler when it is
//! dropped, so the previous handler is back in place on every exit path.
//! Signals with no handler are logged through `tracing`.
//!
//! Two adapters build on the channel:
//!
//! - [`CaptureSignals`] records every signal raised while its wrapped
//!   callable runs
//! - [`FailureToSignal`] turns a callable's `Err` into a raised signal
//!
//! Both implement [`Decide`](hone_core::Decide) and
//! [`Update`](hone_core::Update) when the callable they wrap does, so they
//! can be handed to the refinement engine unchanged.
//!
//! ```
//! use hone_signal::{CaptureSignals, Level, trigger};
//!
//! let mut capture = CaptureSignals::new(|path: &str| {
//!     if path.is_empty() {
//!         trigger(Level::UserWarning, "empty path");
//!         return false;
//!     }
//!     true
//! });
//!
//! assert!(!capture.call(""));
//! assert_eq!(capture.captured()[0].message(), "empty path");
//! ```

mod capture;
mod channel;
mod level;
mod signal;
mod translate;

pub use capture::CaptureSignals;
pub use channel::{HandlerGuard, depth, install, raise, trigger};
pub use level::{Level, Levels};
pub use signal::Signal;
pub use translate::{DEFAULT_FORMAT, FailureToSignal};
