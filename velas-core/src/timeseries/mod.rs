//! Time-series utilities for incremental candle-stream cleaning.
//!
//! Modules include:
//! - `sanitize`: stateful batch sanitizer (dedup + gap synthesis)
//! - `validate`: stateless per-record invariant checks
/// Stateful OHLCV batch sanitization.
pub mod sanitize;
/// Stateless OHLCV record validation.
pub mod validate;
