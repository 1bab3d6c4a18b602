// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar intervals and the time scale.
//!
//! Dates are zone-naive wall-clock values ([`NaiveDateTime`]). A [`TimeInterval`] knows how to
//! floor a date to its unit, step a date by whole units, and enumerate the dates aligned to
//! `step` units inside a range. Alignment is field based: every fifth day means days 1, 6, 11,
//! ... of each month, every third month means January, April, July and October.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::error::AxisError;
use crate::format::{self, Formatter};
use crate::scale::{MAX_TICKS, Scale};

/// A calendar unit, ordered from most to least precise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeInterval {
    /// One second.
    Second,
    /// One minute.
    Minute,
    /// One hour.
    Hour,
    /// One day.
    Day,
    /// One week, starting on Sunday.
    Week,
    /// One calendar month.
    Month,
    /// One calendar year.
    Year,
}

impl TimeInterval {
    /// Every interval, most precise first.
    pub const ALL: [Self; 7] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
    ];

    /// Returns the lowercase name of the interval.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Nominal length of one unit in milliseconds (30-day months, 365-day years).
    pub fn approx_millis(self) -> f64 {
        match self {
            Self::Second => 1_000.0,
            Self::Minute => 60_000.0,
            Self::Hour => 3_600_000.0,
            Self::Day => 86_400_000.0,
            Self::Week => 604_800_000.0,
            Self::Month => 2_592_000_000.0,
            Self::Year => 31_536_000_000.0,
        }
    }

    /// Rounds `t` down to the start of its unit.
    pub fn floor(self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        match self {
            Self::Second => t.with_nanosecond(0).unwrap_or(t),
            Self::Minute => date.and_time(hms(t.hour(), t.minute(), 0)),
            Self::Hour => date.and_time(hms(t.hour(), 0, 0)),
            Self::Day => date.and_time(NaiveTime::MIN),
            Self::Week => {
                let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
                date.checked_sub_days(back)
                    .unwrap_or(date)
                    .and_time(NaiveTime::MIN)
            }
            Self::Month => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
                .unwrap_or(date)
                .and_time(NaiveTime::MIN),
        }
    }

    /// Rounds `t` up to the start of a unit. Returns `None` past the end of the calendar.
    pub fn ceil(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let floor = self.floor(t);
        if floor == t {
            Some(t)
        } else {
            self.offset(floor, 1)
        }
    }

    /// Moves `t` by `n` units. Returns `None` when the result leaves the calendar.
    pub fn offset(self, t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        let seconds_per_unit: i64 = match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Week => 604_800,
            Self::Month => return add_months(t, n),
            Self::Year => return add_months(t, n.checked_mul(12)?),
        };
        let delta = TimeDelta::try_seconds(n.checked_mul(seconds_per_unit)?)?;
        t.checked_add_signed(delta)
    }

    /// Returns `true` if `t` is the start of a unit whose field is a multiple of `step`.
    pub fn is_aligned(self, t: NaiveDateTime, step: u32) -> bool {
        if self.floor(t) != t {
            return false;
        }
        let step = i64::from(step.max(1));
        let field: i64 = match self {
            Self::Second => t.second().into(),
            Self::Minute => t.minute().into(),
            Self::Hour => t.hour().into(),
            Self::Day => t.day0().into(),
            Self::Week => weeks_since_reference(t),
            Self::Month => t.month0().into(),
            Self::Year => t.year().into(),
        };
        field.rem_euclid(step) == 0
    }

    /// Returns every date in `[start, end]` aligned to `step` units, ascending.
    ///
    /// Output is capped at 10 000 dates.
    pub fn range(self, step: u32, start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
        let step = step.max(1);
        let mut out = Vec::new();
        let Some(mut t) = self.ceil(start) else {
            return out;
        };
        while t <= end {
            if self.is_aligned(t, step) {
                out.push(t);
                if out.len() >= MAX_TICKS {
                    log::warn!(
                        "{} x{step} ticks capped at {MAX_TICKS} between {start} and {end}",
                        self.as_str()
                    );
                    break;
                }
                // Field alignment resets at month and year boundaries, so a jump of `step`
                // units only stays on the grid when it lands on an aligned date.
                match self.offset(t, i64::from(step)) {
                    Some(next) if self.is_aligned(next, step) => {
                        t = next;
                        continue;
                    }
                    _ => {}
                }
            }
            match self.offset(t, 1) {
                Some(next) => t = next,
                None => break,
            }
        }
        out
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInterval {
    type Err = AxisError;

    /// Parses an interval name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AxisError::UnknownTimeInterval(String::from(s)))
    }
}

fn hms(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}

fn add_months(t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
    if n >= 0 {
        t.checked_add_months(months)
    } else {
        t.checked_sub_months(months)
    }
}

/// Whole weeks between the Sunday starting `t`'s week and Sunday 1970-01-04.
fn weeks_since_reference(t: NaiveDateTime) -> i64 {
    let Some(reference) = NaiveDate::from_ymd_opt(1970, 1, 4) else {
        return 0;
    };
    let week_start = TimeInterval::Week.floor(t).date();
    week_start.signed_duration_since(reference).num_days() / 7
}

/// A date whose formatted labels are about as wide as labels get.
///
/// It falls on a Wednesday in September, the longest English day and month names, with a
/// four-digit year and two-digit clock fields.
pub(crate) fn long_label_probe() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 9, 29)
        .and_then(|d| d.and_hms_opt(12, 59, 59))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Milliseconds from `from` to `to`.
pub(crate) fn millis_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64
}

/// A linear mapping from dates to a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    domain: (NaiveDateTime, NaiveDateTime),
    range: (f64, f64),
    tick_count: usize,
}

/// Intervals considered by [`ScaleTime::ticks`] before falling back to multi-year steps.
const TICK_INTERVALS: [(TimeInterval, u32); 18] = [
    (TimeInterval::Second, 1),
    (TimeInterval::Second, 5),
    (TimeInterval::Second, 15),
    (TimeInterval::Second, 30),
    (TimeInterval::Minute, 1),
    (TimeInterval::Minute, 5),
    (TimeInterval::Minute, 15),
    (TimeInterval::Minute, 30),
    (TimeInterval::Hour, 1),
    (TimeInterval::Hour, 3),
    (TimeInterval::Hour, 6),
    (TimeInterval::Hour, 12),
    (TimeInterval::Day, 1),
    (TimeInterval::Day, 2),
    (TimeInterval::Week, 1),
    (TimeInterval::Month, 1),
    (TimeInterval::Month, 3),
    (TimeInterval::Year, 1),
];

impl ScaleTime {
    /// Creates a scale over `domain` with range `(0, 1)` and about 10 ticks.
    pub fn new(domain: (NaiveDateTime, NaiveDateTime)) -> Self {
        Self {
            domain,
            range: (0.0, 1.0),
            tick_count: 10,
        }
    }

    /// Sets the pixel range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Sets the approximate number of ticks.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the domain.
    pub fn set_domain(&mut self, domain: (NaiveDateTime, NaiveDateTime)) {
        self.domain = domain;
    }

    /// Returns the domain bounds in ascending order.
    pub fn extent(&self) -> (NaiveDateTime, NaiveDateTime) {
        let (d0, d1) = self.domain;
        if d0 <= d1 { (d0, d1) } else { (d1, d0) }
    }

    /// Returns the dates inside the domain aligned to `step` units of `interval`, in domain
    /// order.
    pub fn tick_interval(&self, interval: TimeInterval, step: u32) -> Vec<NaiveDateTime> {
        let (lo, hi) = self.extent();
        let mut ticks = interval.range(step, lo, hi);
        if self.domain.0 > self.domain.1 {
            ticks.reverse();
        }
        ticks
    }

    fn auto_interval(&self) -> (TimeInterval, u32) {
        let (lo, hi) = self.extent();
        let span = millis_between(lo, hi);
        let count = self.tick_count as f64;
        for (interval, step) in TICK_INTERVALS {
            if span / (interval.approx_millis() * f64::from(step)) <= count {
                return (interval, step);
            }
        }
        let years = span / TimeInterval::Year.approx_millis() / count;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "log10 of a finite f64 is within i32"
        )]
        let power = 10_f64.powi(years.log10().floor().max(0.0) as i32);
        let step = match years / power {
            e if e >= 7.5 => 10.0 * power,
            e if e >= 3.5 => 5.0 * power,
            e if e >= 1.5 => 2.0 * power,
            _ => power,
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "calendar spans in years fit comfortably in u32"
        )]
        (TimeInterval::Year, step.clamp(1.0, f64::from(u32::MAX)) as u32)
    }
}

impl Scale for ScaleTime {
    type Value = NaiveDateTime;

    fn scale(&self, value: NaiveDateTime) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = millis_between(d0, d1);
        if span == 0.0 {
            return r0;
        }
        r0 + millis_between(d0, value) / span * (r1 - r0)
    }

    fn invert(&self, pixel: f64) -> NaiveDateTime {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        let ms = (pixel - r0) / (r1 - r0) * millis_between(d0, d1);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "saturating conversion; out-of-calendar values fall back below"
        )]
        let ms = ms.round() as i64;
        TimeDelta::try_milliseconds(ms)
            .and_then(|delta| d0.checked_add_signed(delta))
            .unwrap_or(if ms < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            })
    }

    fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    fn ticks(&self) -> Vec<NaiveDateTime> {
        if self.tick_count == 0 {
            return Vec::new();
        }
        let (interval, step) = self.auto_interval();
        self.tick_interval(interval, step)
    }

    /// Labels each date by its least significant non-zero field: `"2024"`, `"March"`,
    /// `"Mar 03"` (a Sunday), `"Mon 04"`, `"01 PM"`, `"01:05"`, `":09"`.
    fn default_formatter(&self) -> Formatter<NaiveDateTime> {
        format::from_fn(|d: &NaiveDateTime| {
            let pattern = if TimeInterval::Second.floor(*d) != *d {
                ".%3f"
            } else if TimeInterval::Minute.floor(*d) != *d {
                ":%S"
            } else if TimeInterval::Hour.floor(*d) != *d {
                "%I:%M"
            } else if TimeInterval::Day.floor(*d) != *d {
                "%I %p"
            } else if TimeInterval::Month.floor(*d) != *d {
                if TimeInterval::Week.floor(*d) != *d {
                    "%a %d"
                } else {
                    "%b %d"
                }
            } else if TimeInterval::Year.floor(*d) != *d {
                "%B"
            } else {
                "%Y"
            };
            format::time(pattern)(d)
        })
    }
}
