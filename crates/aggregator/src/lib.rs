//! # Rolling Stats Aggregator
//!
//! This crate owns the rolling-window engine: it admits timestamped events that fall
//! inside a trailing window, evicts them once they age out, and answers count, sum
//! and average queries from running totals instead of re-scanning history.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of transports
//!   or clocks. Every operation takes the caller's notion of "now" in epoch millis.
//! - **Exact Arithmetic:** The decimal quantity is summed with arbitrary-precision
//!   `bigdecimal`, never with binary floating point, so sums neither overflow nor round.
//! - **One Lock:** The whole window state sits behind a single reader/writer lock so
//!   the heap and the running totals always change together.
//!
//! ## Public API
//!
//! - `RollingAggregator`: the concurrency-safe window engine.
//! - `StatsSnapshot`: an immutable count/sum/average result and its text rendering.
//! - `AggregatorError`: the error returned when the window is empty.

pub mod error;
pub mod snapshot;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use error::AggregatorError;
pub use snapshot::StatsSnapshot;
pub use window::{RollingAggregator, DEFAULT_WINDOW_MILLIS};
