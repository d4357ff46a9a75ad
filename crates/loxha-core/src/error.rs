//! Error types for the loxha core

use thiserror::Error;

/// Result type alias for loxha core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error taxonomy
///
/// Everything except [`Error::MalformedConfiguration`] is recoverable at the
/// message level: the router skips the triggering message and keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration document missing required keys or wrong shape.
    /// The previously parsed snapshot stays in effect.
    #[error("malformed configuration document: {0}")]
    MalformedConfiguration(String),

    /// A control references a room uuid absent from the rooms table
    #[error("unknown room uuid: {0}")]
    RoomNotFound(String),

    /// A control references a category uuid absent from the categories table
    #[error("unknown category uuid: {0}")]
    CategoryNotFound(String),

    /// Control type has no discovery builder
    #[error("unsupported control type: {0}")]
    UnsupportedControlType(String),

    /// A builder needed a type-specific detail the control does not carry
    #[error("control {control} is missing detail field '{field}'")]
    MissingDetail { control: String, field: String },

    /// Discovery payload could not be serialized
    #[error("payload encode error: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Encode(e.to_string())
    }
}
