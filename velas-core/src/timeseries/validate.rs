//! Stateless invariant checks for OHLCV records.
//!
//! Validation is a separate, explicit step from sanitization: the sanitizer
//! only compares timestamps, while this module parses the string-encoded
//! decimal fields (via `rust_decimal`, never binary floats) and enforces the
//! OHLC ordering invariants.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::VelasError;
use crate::types::OhlcvRecord;

/// Validate every record in a batch, in order.
///
/// Returns the first violation tagged with its batch index. Run this before
/// trusting a batch's numeric fields; [`crate::OhlcvSanitizer`] deliberately
/// does not.
///
/// # Errors
/// Returns `VelasError::InvalidRecord` for the first record with a
/// non-positive open time, an unparseable decimal field, or broken OHLC
/// ordering (`high < max(open, close, low)` or `low > min(open, close, high)`).
///
/// ```
/// use velas_core::{OhlcvRecord, validate_batch};
///
/// let record = OhlcvRecord {
///     open_time: 1000,
///     open: "100.0".into(),
///     high: "99.0".into(), // high below low
///     low: "101.0".into(),
///     close: "100.5".into(),
///     volume: "1000".into(),
/// };
/// let err = validate_batch(&[record]).unwrap_err();
/// assert!(err.to_string().starts_with("invalid record at index 0"));
/// ```
pub fn validate_batch(batch: &[OhlcvRecord]) -> Result<(), VelasError> {
    for (index, record) in batch.iter().enumerate() {
        validate_record(record).map_err(|reason| VelasError::InvalidRecord { index, reason })?;
    }
    Ok(())
}

fn validate_record(record: &OhlcvRecord) -> Result<(), String> {
    if record.open_time <= 0 {
        return Err(format!("invalid open time: {}", record.open_time));
    }

    let open = parse_decimal("open price", &record.open)?;
    let high = parse_decimal("high price", &record.high)?;
    let low = parse_decimal("low price", &record.low)?;
    let close = parse_decimal("close price", &record.close)?;

    if high < low {
        return Err(format!(
            "high price ({high}) cannot be less than low price ({low})"
        ));
    }
    if high < open || high < close {
        return Err(format!(
            "high price ({high}) cannot be less than open ({open}) or close ({close})"
        ));
    }
    if low > open || low > close {
        return Err(format!(
            "low price ({low}) cannot be greater than open ({open}) or close ({close})"
        ));
    }

    parse_decimal("volume", &record.volume)?;

    Ok(())
}

fn parse_decimal(label: &str, text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text).map_err(|_| format!("invalid {label}: {text}"))
}
