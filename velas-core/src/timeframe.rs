//! Candle timeframe descriptor and boundary arithmetic.
//!
//! A [`Timeframe`] couples a period length (`value` × `unit`) with an IANA
//! timezone that governs boundary alignment. Timestamps themselves are always
//! absolute instants; the zone only decides where "midnight", "Monday", or
//! "the 1st" falls.

use core::fmt;
use std::str::FromStr;

use chrono::offset::{LocalResult, Offset};
use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc,
};
use chrono_tz::Tz;

use crate::VelasError;

/// Reference-free fallback period for month timeframes (30-day months).
const APPROX_MONTH_MINUTES: i64 = 30 * 1440;
/// Reference-free fallback period for year timeframes (365-day years).
const APPROX_YEAR_MINUTES: i64 = 365 * 1440;

/// Calendar unit of a [`Timeframe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeUnit {
    /// Minute candles (`m`).
    Minutes,
    /// Hour candles (`h`).
    Hours,
    /// Day candles (`D`).
    Days,
    /// Week candles (`W`), weeks starting Monday.
    Weeks,
    /// Calendar-month candles (`M`).
    Months,
    /// Calendar-year candles (`Y`).
    Years,
}

impl TimeframeUnit {
    /// The single-character unit code used in the compact textual form.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'D',
            Self::Weeks => 'W',
            Self::Months => 'M',
            Self::Years => 'Y',
        }
    }

    /// Inverse of [`Self::code`]. Returns `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'm' => Some(Self::Minutes),
            'h' => Some(Self::Hours),
            'D' => Some(Self::Days),
            'W' => Some(Self::Weeks),
            'M' => Some(Self::Months),
            'Y' => Some(Self::Years),
            _ => None,
        }
    }
}

/// A candle timeframe: period value, calendar unit, and alignment timezone.
///
/// Immutable once constructed; create it with [`Timeframe::new`] or by
/// parsing the compact textual form `"<value><unitCode>[:<zone>]"`:
///
/// ```
/// use velas_core::{Timeframe, TimeframeUnit};
/// use chrono_tz::Tz;
///
/// let tf: Timeframe = "4h:America/New_York".parse().unwrap();
/// assert_eq!(tf.value(), 4);
/// assert_eq!(tf.unit(), TimeframeUnit::Hours);
/// assert_eq!(tf.timezone(), Tz::America__New_York);
///
/// // The zone suffix is omitted for UTC.
/// let tf: Timeframe = "5m".parse().unwrap();
/// assert_eq!(tf.to_string(), "5m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    value: u32,
    unit: TimeframeUnit,
    tz: Tz,
}

impl Timeframe {
    /// Build a timeframe from explicit parts.
    ///
    /// # Errors
    /// Returns `VelasError::Format` if `value` is zero.
    pub fn new(value: u32, unit: TimeframeUnit, tz: Tz) -> Result<Self, VelasError> {
        if value == 0 {
            return Err(VelasError::format("timeframe value must be positive"));
        }
        Ok(Self { value, unit, tz })
    }

    /// Build a UTC-aligned timeframe from explicit parts.
    ///
    /// # Errors
    /// Returns `VelasError::Format` if `value` is zero.
    pub fn utc(value: u32, unit: TimeframeUnit) -> Result<Self, VelasError> {
        Self::new(value, unit, Tz::UTC)
    }

    /// Period value (always positive).
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Calendar unit.
    #[must_use]
    pub const fn unit(&self) -> TimeframeUnit {
        self.unit
    }

    /// Timezone governing boundary alignment.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Period length in minutes, without a reference time.
    ///
    /// Minute/hour/day/week units use fixed multipliers. Month and year units
    /// fall back to 30-day months and 365-day years; this approximation is
    /// intentional and is what gap synthesis steps by. Use
    /// [`Self::period_minutes_at`] when calendar exactness matters.
    ///
    /// ```
    /// use velas_core::Timeframe;
    ///
    /// assert_eq!("5m".parse::<Timeframe>().unwrap().period_minutes(), 5);
    /// assert_eq!("1W".parse::<Timeframe>().unwrap().period_minutes(), 10_080);
    /// ```
    #[must_use]
    pub fn period_minutes(&self) -> i64 {
        let v = i64::from(self.value);
        match self.unit {
            TimeframeUnit::Minutes => v,
            TimeframeUnit::Hours => v * 60,
            TimeframeUnit::Days => v * 1440,
            TimeframeUnit::Weeks => v * 10_080,
            TimeframeUnit::Months => v * APPROX_MONTH_MINUTES,
            TimeframeUnit::Years => v * APPROX_YEAR_MINUTES,
        }
    }

    /// Period length in minutes, calendar-exact around `reference`.
    ///
    /// For month/year units this floors `reference` to the start of its
    /// month/year, adds `value` calendar months/years, and measures the
    /// elapsed minutes, so variable month lengths and leap years are
    /// accounted for. Other units are identical to [`Self::period_minutes`].
    ///
    /// ```
    /// use velas_core::Timeframe;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let tf: Timeframe = "1M".parse().unwrap();
    /// let leap_feb = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
    /// assert_eq!(tf.period_minutes_at(leap_feb), 29 * 1440);
    /// ```
    #[must_use]
    pub fn period_minutes_at(&self, reference: DateTime<Utc>) -> i64 {
        match self.unit {
            TimeframeUnit::Months | TimeframeUnit::Years => {
                let start = self.last_open(reference);
                let end = self.add_period(start);
                (end - start).num_minutes()
            }
            _ => self.period_minutes(),
        }
    }

    /// Floor `ts` to the most recent valid candle open in this timeframe.
    ///
    /// Minute and hour buckets floor to a multiple of the period within the
    /// local day; days floor to local midnight; weeks to the most recent
    /// Monday midnight; months to the 1st; years to January 1st.
    ///
    /// ```
    /// use velas_core::Timeframe;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let tf: Timeframe = "1D:America/New_York".parse().unwrap();
    /// let ts = Utc.with_ymd_and_hms(2024, 1, 2, 15, 30, 0).unwrap();
    /// // New York midnight is 05:00 UTC during EST.
    /// assert_eq!(tf.last_open(ts), Utc.with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap());
    /// ```
    #[must_use]
    pub fn last_open(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let local = ts.with_timezone(&self.tz);
        let date = local.date_naive();
        let naive = match self.unit {
            TimeframeUnit::Minutes | TimeframeUnit::Hours => {
                let step = self.period_minutes() * 60;
                let secs = i64::from(local.num_seconds_from_midnight());
                let floored = secs - secs.rem_euclid(step);
                date.and_time(NaiveTime::MIN) + Duration::seconds(floored)
            }
            TimeframeUnit::Days => date.and_time(NaiveTime::MIN),
            TimeframeUnit::Weeks => {
                let back = i64::from(local.weekday().num_days_from_monday());
                let monday = date
                    .checked_sub_signed(Duration::days(back))
                    .unwrap_or(date);
                monday.and_time(NaiveTime::MIN)
            }
            TimeframeUnit::Months => {
                let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
                first.and_time(NaiveTime::MIN)
            }
            TimeframeUnit::Years => {
                let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
                jan1.and_time(NaiveTime::MIN)
            }
        };
        self.resolve_local(naive, ts)
    }

    /// Ceiling counterpart of [`Self::last_open`]: identity on boundaries,
    /// otherwise the first boundary strictly after `ts`. Month/year periods
    /// advance by exact calendar months/years.
    #[must_use]
    pub fn next_open(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let open = self.last_open(ts);
        if open == ts { ts } else { self.add_period(open) }
    }

    /// Exclusive end of the candle containing `ts`: one period past
    /// [`Self::last_open`].
    #[must_use]
    pub fn close_time(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        self.add_period(self.last_open(ts))
    }

    /// Whether `ts` falls exactly on a candle boundary for this timeframe.
    #[must_use]
    pub fn is_valid_open_time(&self, ts: DateTime<Utc>) -> bool {
        self.last_open(ts) == ts
    }

    /// Advance a boundary by one period. Calendar addition for months/years,
    /// fixed minutes otherwise.
    fn add_period(&self, open: DateTime<Utc>) -> DateTime<Utc> {
        match self.unit {
            TimeframeUnit::Months | TimeframeUnit::Years => {
                let months = if self.unit == TimeframeUnit::Years {
                    self.value.saturating_mul(12)
                } else {
                    self.value
                };
                let local = open.with_timezone(&self.tz).naive_local();
                let advanced = local
                    .checked_add_months(Months::new(months))
                    .unwrap_or(local);
                self.resolve_local(advanced, open)
            }
            _ => open + Duration::minutes(self.period_minutes()),
        }
    }

    /// Map a naive local datetime back to UTC, resolving DST transitions.
    fn resolve_local(&self, naive: NaiveDateTime, ts: DateTime<Utc>) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(dt1, dt2) => {
                // Pick the mapping matching the offset of ts in this zone,
                // preserving distinct boundaries across the fall-back overlap.
                let want = ts.with_timezone(&self.tz).offset().fix().local_minus_utc();
                if dt1.offset().fix().local_minus_utc() == want {
                    dt1.with_timezone(&Utc)
                } else {
                    dt2.with_timezone(&Utc)
                }
            }
            LocalResult::None => {
                // Skipped local time (spring-forward): fall back to a UTC
                // floor at the approximate period length.
                let step = self.period_minutes().saturating_mul(60).max(1);
                let t = ts.timestamp();
                DateTime::from_timestamp(t - t.rem_euclid(step), 0).unwrap_or(ts)
            }
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.code())?;
        if self.tz != Tz::UTC {
            write!(f, ":{}", self.tz.name())?;
        }
        Ok(())
    }
}

impl FromStr for Timeframe {
    type Err = VelasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, zone) = match s.split_once(':') {
            Some((head, zone)) => (head, Some(zone)),
            None => (s, None),
        };

        let digits_end = head
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(head.len());
        let (digits, unit_part) = head.split_at(digits_end);
        if digits.is_empty() {
            return Err(VelasError::format(format!("missing value in {s:?}")));
        }
        let value: u32 = digits
            .parse()
            .map_err(|_| VelasError::format(format!("unparseable value in {s:?}")))?;

        let mut unit_chars = unit_part.chars();
        let code = match (unit_chars.next(), unit_chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(VelasError::format(format!("missing unit in {s:?}")));
            }
        };
        let unit = TimeframeUnit::from_code(code)
            .ok_or_else(|| VelasError::format(format!("unknown unit {code:?} in {s:?}")))?;

        let tz = match zone {
            Some(z) => z
                .parse::<Tz>()
                .map_err(|_| VelasError::format(format!("unknown timezone {z:?}")))?,
            None => Tz::UTC,
        };

        Self::new(value, unit, tz)
    }
}
