use thiserror::Error;

/// Unified error type for the velas workspace.
///
/// Covers timeframe parsing/construction failures and per-record invariant
/// violations reported by batch validation.
#[derive(Debug, Error)]
pub enum VelasError {
    /// Malformed timeframe: bad textual form, unknown unit code, zero value,
    /// or an unrecognized IANA timezone name.
    #[error("invalid timeframe: {0}")]
    Format(String),

    /// A record in a validated batch violates the OHLCV invariants
    /// (non-positive open time, unparseable decimal field, or broken
    /// OHLC ordering). Tagged with the offending batch index.
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord {
        /// Zero-based position of the offending record within the batch.
        index: usize,
        /// Human-readable description of the violated invariant.
        reason: String,
    },
}

impl VelasError {
    /// Helper: build a `Format` error from any message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Helper: build an `InvalidRecord` error for a batch index.
    pub fn invalid_record(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }
}
