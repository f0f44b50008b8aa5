// ── Core error types ──
//
// Decoding errors come from mappers reading a stored document whose values
// disagree with the expected shape. Channel errors come from the
// availability gate. Neither is ever coerced into a default value.

use std::time::Duration;

use thiserror::Error;

use crate::document::ValueKind;

// ── DecodeError ─────────────────────────────────────────────────────

/// A document field held a value of the wrong kind.
///
/// Missing keys are never reported here: absence decodes to the field's
/// zero value. Only a present value of an incompatible kind fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("field '{key}' holds {found}, expected {expected}")]
    UnexpectedType {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("element {index} of '{key}' could not be decoded: {source}")]
    Element {
        key: String,
        index: usize,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub fn unexpected(key: impl Into<String>, expected: ValueKind, found: ValueKind) -> Self {
        Self::UnexpectedType {
            key: key.into(),
            expected,
            found,
        }
    }

    pub fn element(key: impl Into<String>, index: usize, source: DecodeError) -> Self {
        Self::Element {
            key: key.into(),
            index,
            source: Box::new(source),
        }
    }

    /// The top-level document key the failure originated from.
    pub fn key(&self) -> &str {
        match self {
            Self::UnexpectedType { key, .. } | Self::Element { key, .. } => key,
        }
    }
}

// ── ChannelError ────────────────────────────────────────────────────

/// Failure outcomes of waiting on an API channel.
///
/// `ApiNotAvailable` is the expected, recoverable result of a deadline
/// expiring; `Cancelled` means the caller stopped waiting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("API not available on channel '{channel}' after waiting {waited:?}")]
    ApiNotAvailable { channel: String, waited: Duration },

    #[error("wait for channel '{channel}' was cancelled")]
    Cancelled { channel: String },
}

impl ChannelError {
    /// Whether the caller should back off and retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ApiNotAvailable { .. })
    }

    pub fn channel(&self) -> &str {
        match self {
            Self::ApiNotAvailable { channel, .. } | Self::Cancelled { channel } => channel,
        }
    }
}
