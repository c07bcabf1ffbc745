use thiserror::Error;

/// Error type for every failure this crate can surface.
///
/// Callers that only care about "the line could not be parsed" can treat any
/// variant uniformly; the variants exist so diagnostics say what actually
/// went wrong.
#[derive(Debug, Error)]
pub enum LogParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Unrecognized message type: {0}")]
    UnrecognizedMessageType(String),

    #[error("Invalid field value: {0}")]
    FieldCoercion(String),

    #[error("Reader has been closed")]
    Closed,
}
