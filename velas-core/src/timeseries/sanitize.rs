//! Incremental batch sanitization: duplicate removal and gap synthesis over
//! candle batches delivered across repeated calls.

use crate::timeframe::Timeframe;
use crate::types::OhlcvRecord;

/// Volume literal carried by synthesized filler candles.
///
/// Fixed eight decimal places; downstream consumers expect this exact
/// fixed-precision convention, so the literal must not be reformatted.
pub const FILLER_VOLUME: &str = "0.00000000";

/// Inclusive range of already-seen open times, tracked as defensive copies of
/// the earliest and latest candle ever emitted.
#[derive(Debug, Clone)]
struct Bounds {
    first: OhlcvRecord,
    last: OhlcvRecord,
}

/// Stateful sanitizer for one (instrument, timeframe) candle stream.
///
/// Consumes raw batches in arbitrary (typically monotonic) time order and
/// returns, per call, only the newly retained records: sorted ascending,
/// stripped of intra-batch duplicates and of anything inside the already-seen
/// range, with flat filler candles synthesized for forward gaps. Between
/// calls it remembers nothing but the first and last candle ever seen.
///
/// Not a synchronization point: one instance per stream, driven by a single
/// fetch loop. `&mut self` enforces serialized access.
///
/// ```
/// use velas_core::{OhlcvRecord, OhlcvSanitizer, FILLER_VOLUME};
///
/// fn candle(open_time: i64, close: &str) -> OhlcvRecord {
///     OhlcvRecord {
///         open_time,
///         open: close.to_string(),
///         high: close.to_string(),
///         low: close.to_string(),
///         close: close.to_string(),
///         volume: "1000".to_string(),
///     }
/// }
///
/// let mut sanitizer = OhlcvSanitizer::new("5m".parse().unwrap());
/// sanitizer.sanitize_batch(&[candle(1000, "100.5")]);
///
/// // 1300 and 1600 are missing: two fillers precede the real candle.
/// let out = sanitizer.sanitize_batch(&[candle(1900, "102.5")]);
/// let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
/// assert_eq!(times, vec![1300, 1600, 1900]);
/// assert_eq!(out[0].close, "100.5");
/// assert_eq!(out[0].volume, FILLER_VOLUME);
/// ```
#[derive(Debug)]
pub struct OhlcvSanitizer {
    timeframe: Timeframe,
    bounds: Option<Bounds>,
}

impl OhlcvSanitizer {
    /// Create a sanitizer for the given timeframe, with no history.
    #[must_use]
    pub const fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            bounds: None,
        }
    }

    /// Clean one batch: sort, drop duplicates, synthesize forward gap fillers,
    /// and extend the tracked range.
    ///
    /// The caller's slice is never mutated; the sanitizer works on copies.
    /// Gap synthesis applies only before the first retained candle of a call,
    /// only when that candle extends the range forward, stepping by the
    /// reference-free period (months/years use the documented approximation).
    /// Batches entirely older than the tracked range are deduplicated but
    /// never gap-filled.
    pub fn sanitize_batch(&mut self, batch: &[OhlcvRecord]) -> Vec<OhlcvRecord> {
        if batch.is_empty() {
            return Vec::new();
        }

        let mut sorted = batch.to_vec();
        // Stable sort: equal open times keep their input order, and the first
        // of an equal run wins the intra-batch duplicate check below.
        sorted.sort_by_key(|r| r.open_time);

        let step_seconds = self.timeframe.period_minutes() * 60;
        let mut out: Vec<OhlcvRecord> = Vec::with_capacity(sorted.len());

        for (i, candle) in sorted.iter().enumerate() {
            if i > 0 && candle.open_time == sorted[i - 1].open_time {
                continue;
            }

            if let Some(bounds) = &self.bounds {
                if candle.open_time >= bounds.first.open_time
                    && candle.open_time <= bounds.last.open_time
                {
                    continue;
                }

                // Forward gap synthesis, only ahead of the first retained
                // candle of this call.
                if out.is_empty() && candle.open_time > bounds.last.open_time && step_seconds > 0 {
                    let mut next = bounds.last.open_time + step_seconds;
                    while next < candle.open_time {
                        out.push(filler(next, &bounds.last));
                        next += step_seconds;
                    }
                    #[cfg(feature = "tracing")]
                    if !out.is_empty() {
                        tracing::debug!(
                            fillers = out.len(),
                            from = bounds.last.open_time,
                            to = candle.open_time,
                            "synthesized gap fillers"
                        );
                    }
                }
            }

            out.push(candle.clone());
        }

        if out.is_empty() {
            return out;
        }

        match &mut self.bounds {
            Some(bounds) => {
                if out[0].open_time < bounds.first.open_time {
                    bounds.first = out[0].clone();
                }
                if out[out.len() - 1].open_time > bounds.last.open_time {
                    bounds.last = out[out.len() - 1].clone();
                }
            }
            None => {
                self.bounds = Some(Bounds {
                    first: out[0].clone(),
                    last: out[out.len() - 1].clone(),
                });
            }
        }

        out
    }

    /// Forget all history. The next batch behaves as on a new instance.
    pub fn reset(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!("sanitizer reset");
        self.bounds = None;
    }

    /// Replace the timeframe. Implies [`Self::reset`], since a different
    /// period invalidates the prior gap math.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
        self.reset();
    }

    /// The timeframe this sanitizer is bound to.
    #[must_use]
    pub const fn timeframe(&self) -> &Timeframe {
        &self.timeframe
    }

    /// Copy of the latest candle ever emitted, if any.
    #[must_use]
    pub fn last_candle(&self) -> Option<OhlcvRecord> {
        self.bounds.as_ref().map(|b| b.last.clone())
    }
}

/// A flat candle covering one missing period: carries the prior close forward
/// with zero volume.
fn filler(open_time: i64, prior: &OhlcvRecord) -> OhlcvRecord {
    OhlcvRecord {
        open_time,
        open: prior.close.clone(),
        high: prior.close.clone(),
        low: prior.close.clone(),
        close: prior.close.clone(),
        volume: FILLER_VOLUME.to_string(),
    }
}
