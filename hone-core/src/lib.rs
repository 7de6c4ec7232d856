//! Core traits for the Hone refinement toolkit.
//!
//! This crate defines the callable seams that the iteration engine and its
//! adapters build on:
//!
//! - [`Decide`]: answers whether a guess is acceptable
//! - [`Update`]: produces the next guess from the current one
//! - [`Fallible`]: lets closures that return `Result` act as either seam
//!
//! Plain closures implement both traits directly with an
//! [`Infallible`](std::convert::Infallible) error, so most callers never name
//! these traits at all.

mod decide;
mod fallible;
mod update;

pub use decide::Decide;
pub use fallible::Fallible;
pub use update::Update;
