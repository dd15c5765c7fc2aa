use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid path index: {index} (container holds {count} paths)")]
    InvalidPathIndex { index: usize, count: usize },

    #[error("invalid clip index: {index} (track holds {count} clips)")]
    InvalidClipIndex { index: usize, count: usize },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    #[error("navigator is not bound to a path")]
    UnboundPath,

    #[cfg(feature = "json")]
    #[error("failed to parse track JSON: {message}")]
    JsonParse { message: String },

    #[cfg(feature = "json")]
    #[error("invalid curve for {context}: {message}")]
    JsonInvalidCurve { context: String, message: String },

    #[cfg(feature = "json")]
    #[error("unsupported or invalid track format version: {value}")]
    JsonFormatVersion { value: String },
}
