//! Error types for codecs and the stores they read from
//!
//! Provides the error taxonomy shared by every codec:
//! - Unsupported format or store capability
//! - Decode failures reported by a grammar parser
//! - Encode failures from serialization or the output stream
//! - Store lookups that find no key or cannot coerce the stored value

use polyconf_value::CoercionError;

/// Boxed error from an underlying grammar library or stream
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors answering a typed key query
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No value stored under the key
    #[error("key not found: '{0}'")]
    KeyAbsent(String),

    /// Stored value could not be converted to the requested type
    #[error("cannot read '{key}': {source}")]
    Coercion {
        /// Key that was queried
        key: String,
        /// Conversion failure
        #[source]
        source: CoercionError,
    },

    /// Subtree did not deserialize into the requested structure
    #[error("cannot deserialize '{key}': {message}")]
    Deserialize {
        /// Key of the subtree
        key: String,
        /// Deserializer diagnostic
        message: String,
    },
}

impl StoreError {
    /// Create key-absent error
    #[inline]
    pub fn key_absent(key: impl Into<String>) -> Self {
        Self::KeyAbsent(key.into())
    }

    /// Create coercion error for key
    #[inline]
    pub fn coercion(key: impl Into<String>, source: CoercionError) -> Self {
        Self::Coercion {
            key: key.into(),
            source,
        }
    }
}

/// Errors raised while selecting or running a codec
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Format not registered, or target store lacks a required capability
    #[error("unsupported format '{format}': {reason}")]
    UnsupportedFormat {
        /// Requested format name
        format: String,
        /// Why it cannot be served
        reason: String,
    },

    /// Grammar parser rejected the input, or the input could not be read
    #[error("decode error ({format}): {source}")]
    Decode {
        /// Canonical name of the failing codec
        format: &'static str,
        /// Underlying diagnostic
        #[source]
        source: BoxError,
    },

    /// Serialization or stream write failed
    #[error("encode error ({format}): {source}")]
    Encode {
        /// Canonical name of the failing codec
        format: &'static str,
        /// Underlying diagnostic
        #[source]
        source: BoxError,
    },

    /// Store query failed while encoding
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CodecError {
    /// Create error for a format name nothing is registered under
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: name.into(),
            reason: "no codec registered under this name".to_string(),
        }
    }

    /// Create error for a store lacking a capability the codec requires
    pub fn unsupported_target(format: &str, capability: &str) -> Self {
        Self::UnsupportedFormat {
            format: format.to_string(),
            reason: format!("format not supported by this target: missing {capability} capability"),
        }
    }

    /// Create decode-stage error wrapping the underlying diagnostic
    pub fn decode(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            format,
            source: source.into(),
        }
    }

    /// Create encode-stage error wrapping the underlying diagnostic
    pub fn encode(format: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Encode {
            format,
            source: source.into(),
        }
    }

    /// Check if error is an unsupported format or capability
    #[inline]
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Check if error happened while decoding
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if error happened while encoding
    #[inline]
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }

    /// Check if error is a missing key
    #[inline]
    #[must_use]
    pub fn is_key_absent(&self) -> bool {
        matches!(self, Self::Store(StoreError::KeyAbsent(_)))
    }

    /// Check if error is a failed type coercion
    #[inline]
    #[must_use]
    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Store(StoreError::Coercion { .. }))
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
