//! Bounded fixed-point refinement.
//!
//! The [`improve`] module drives a guess toward acceptance by alternating a
//! decision and an update. It records every guess it produces and stops at
//! an optional iteration ceiling.
//!
//! ```
//! use hone_solve::improve::Improve;
//!
//! let mut phi = Improve::new(
//!     |g: &f64| (g * g - (g + 1.0)).abs() < 1e-5,
//!     |g: &f64, _iter: usize| 1.0 / g + 1.0,
//! );
//! phi.set_max_iters(Some(100)).expect("positive ceiling");
//!
//! let answer = phi.invoke(1.0).expect("converges");
//! assert!((answer - 1.618_033_988_75).abs() < 1e-4);
//! assert_eq!(phi.trajectory().first(), Some(&1.0));
//! ```

pub mod improve;
