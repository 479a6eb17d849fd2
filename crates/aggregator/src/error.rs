use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorError {
    /// No events are currently inside the rolling window, so there is nothing to average.
    #[error("The period was empty.")]
    EmptyWindow,
}
