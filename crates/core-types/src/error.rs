use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The raw line is kept so the transport layer can report what it rejected.
    #[error("The event was invalid: {0:?}")]
    InvalidEvent(String),
}
