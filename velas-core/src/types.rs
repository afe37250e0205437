//! Value types exchanged with the fetch layer.

use serde::{Deserialize, Serialize};

/// A single OHLCV (candlestick) data point.
///
/// Price and volume fields are strings to preserve precision for instruments
/// with very small quotes (e.g. `"0.000000123456"`). Consumers should parse
/// them with an arbitrary-precision library such as `rust_decimal`; this crate
/// never converts them to binary floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvRecord {
    /// Unix timestamp (seconds) marking the start of the candle's period.
    /// The primary ordering and identity key.
    pub open_time: i64,
    /// Opening price.
    pub open: String,
    /// Highest price.
    pub high: String,
    /// Lowest price.
    pub low: String,
    /// Closing price.
    pub close: String,
    /// Traded volume.
    pub volume: String,
}

/// Parameters for an OHLCV history request.
///
/// Pure data; fetching itself is the caller's concern. The `timeframe` field
/// carries the compact textual form accepted by [`crate::Timeframe`]'s
/// `FromStr` implementation (e.g. `"5m"`, `"1D:America/New_York"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvParams {
    /// Trading pair symbol.
    pub symbol: String,
    /// Timeframe for the data, in compact textual form.
    pub timeframe: String,
    /// Start timestamp (Unix seconds).
    pub start_time: i64,
    /// End timestamp (Unix seconds).
    pub end_time: i64,
    /// Maximum number of records.
    pub limit: usize,
}
