pub mod error;
pub mod event;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use event::{parse_events, Event, MAX_DECIMAL_EXPONENT};
