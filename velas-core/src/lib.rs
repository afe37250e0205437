//! velas-core
//!
//! Incremental sanitization of candlestick (OHLCV) time-series delivered in
//! successive, possibly overlapping or gapped batches — paginated history
//! fetches or live feeds — plus the calendar arithmetic that underpins it.
//!
//! - `types`: value types exchanged with the fetch layer (`OhlcvRecord`,
//!   `OhlcvParams`), decimal fields kept as strings for arbitrary precision.
//! - `timeframe`: the `(value, unit, timezone)` descriptor with
//!   boundary-aligned calendar arithmetic.
//! - `timeseries`: the stateful batch sanitizer and the stateless record
//!   validator.
//!
//! Everything is synchronous and allocation-bounded: no I/O, no async runtime,
//! no interior locking. A sanitizer instance tracks only the first and last
//! candle ever seen, so repeated calls hold O(1) state regardless of how much
//! history has flowed through. One sanitizer per (instrument, timeframe)
//! stream; share across threads only behind an external lock.
#![warn(missing_docs)]

/// Unified error type.
pub mod error;
/// Candle timeframe descriptor and boundary arithmetic.
pub mod timeframe;
/// Batch sanitization and record validation.
pub mod timeseries;
/// OHLCV value types.
pub mod types;

pub use error::VelasError;
pub use timeframe::{Timeframe, TimeframeUnit};
pub use timeseries::sanitize::{FILLER_VOLUME, OhlcvSanitizer};
pub use timeseries::validate::validate_batch;
pub use types::{OhlcvParams, OhlcvRecord};
