use std::io;
use std::path::PathBuf;

use crate::record::Variant;

/// Errors produced by the codec boundary while framing a single record.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Reading from or writing to the underlying stream failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The frame announces a variant other than the one requested.
    #[error("foreign variant in stream: {0}")]
    Foreign(Variant),

    /// The bytes do not form a valid frame or body.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The record could not be turned into bytes.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was constructed with unusable arguments.
    #[error("invalid store configuration: {0}")]
    Configuration(String),

    /// A record handed to `set` failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored record's deep copy came back as a different variant.
    ///
    /// This points at a broken `Record` implementation, not bad data.
    #[error("record of variant {variant} deep-copied to variant {copied}")]
    Integrity { variant: Variant, copied: Variant },

    /// A record's variant differs from the one the store is configured for.
    #[error("type mismatch: store holds {expected}, encountered {found}")]
    TypeMismatch { expected: Variant, found: Variant },

    /// The codec could not parse the record at `index` in the backing file.
    #[error("decode error at record {index}: {reason}")]
    Decode { index: usize, reason: String },

    /// The codec could not encode a record during save.
    #[error("encode error: {0}")]
    Encode(String),

    /// I/O failure on the backing file.
    #[error("persistence error on {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// The variant tag that was actually encountered, for `TypeMismatch`
    /// and `Integrity` errors.
    pub fn found_variant(&self) -> Option<&Variant> {
        match self {
            Self::TypeMismatch { found, .. } => Some(found),
            Self::Integrity { copied, .. } => Some(copied),
            _ => None,
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
