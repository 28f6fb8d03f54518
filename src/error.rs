//! Error types for decoding and authorization.
//!
//! ERROR HANDLING
//! ==============
//! Nothing in this crate is fatal. These enums exist so diagnostics carry a
//! typed, displayable cause; callers see a logged warning and a fallback
//! value (decode) or an unchanged value (authorization), never an `Err`.

/// Error returned by [`crate::codec::Codec`] encode and decode.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The stored text has no leading numeric prefix.
    #[error("not a number: {0:?}")]
    NotANumber(String),
    /// The stored text is not valid JSON for the target type.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    /// The value cannot be serialized to JSON.
    #[error("json encode failed: {0}")]
    Encode(serde_json::Error),
}

impl CodecError {
    /// Machine-readable code for log fields.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotANumber(_) => "E_NOT_A_NUMBER",
            Self::Json(_) => "E_MALFORMED_JSON",
            Self::Encode(_) => "E_ENCODE",
        }
    }
}

/// Diagnostic cause attached to recovered failures.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A write was attempted from a context whose role does not own the key.
    #[error("{action} rejected: requires {required} role")]
    Forbidden { action: String, required: &'static str },
    /// A stored value could not be decoded; the default was used instead.
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },
}

impl SyncError {
    /// Machine-readable code for log fields.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "E_FORBIDDEN",
            Self::Decode { .. } => "E_DECODE",
        }
    }
}
