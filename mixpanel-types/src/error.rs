//! Error types for mixpanel-types.

use thiserror::Error;

/// Errors that can occur while building or encoding wire data.
#[derive(Debug, Error)]
pub enum TypesError {
    /// JSON serialization failed
    #[error("encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The `data` parameter was not valid base64 or JSON
    #[error("decoding failed: {0}")]
    Decode(String),

    /// Operation literal not known to the service
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypesError::UnknownOperation("$increment".into());
        assert_eq!(err.to_string(), "unknown operation: $increment");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypesError>();
    }
}
