// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick and annotation label formatters.
//!
//! A [`Formatter`] is a shared `value -> String` function. Axes apply one formatter to tick
//! values and an independent one to annotated values.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::rc::Rc;
use core::fmt::{Display, Write};

use chrono::NaiveDateTime;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A shared label formatter.
pub type Formatter<T> = Rc<dyn Fn(&T) -> String>;

/// Wraps a closure as a [`Formatter`].
pub fn from_fn<T>(f: impl Fn(&T) -> String + 'static) -> Formatter<T> {
    Rc::new(f)
}

/// Formats values with their `Display` implementation.
pub fn identity<T: Display>() -> Formatter<T> {
    Rc::new(|v: &T| v.to_string())
}

/// Formats numbers with exactly `precision` decimals (`1.50` for precision 2).
pub fn fixed(precision: usize) -> Formatter<f64> {
    Rc::new(move |v: &f64| format!("{v:.precision$}"))
}

/// Rounds numbers to at most `precision` decimals and drops trailing zeros (`1.5`, `2`).
pub fn general(precision: usize) -> Formatter<f64> {
    Rc::new(move |v: &f64| format_general(*v, precision))
}

/// Formats fractions as percentages with `precision` decimals (`0.25 -> "25%"`).
pub fn percentage(precision: usize) -> Formatter<f64> {
    Rc::new(move |v: &f64| format!("{:.precision$}%", v * 100.0))
}

/// Formats numbers with an SI prefix and `precision` significant digits (`1500 -> "1.50k"`).
pub fn si_suffix(precision: usize) -> Formatter<f64> {
    Rc::new(move |v: &f64| format_si(*v, precision.max(1)))
}

/// Formats dates with a strftime-style pattern (`"%b %e"`, `"%Y"`, ...).
///
/// A pattern chrono cannot render produces an empty label rather than a panic.
pub fn time(pattern: &'static str) -> Formatter<NaiveDateTime> {
    Rc::new(move |d: &NaiveDateTime| {
        let mut out = String::new();
        if write!(out, "{}", d.format(pattern)).is_err() {
            out.clear();
        }
        out
    })
}

/// The default numeric formatter used by numeric axes.
pub(crate) fn format_general(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let exp = i32::try_from(precision.min(15)).unwrap_or(15);
    let multiplier = 10_f64.powi(exp);
    let rounded = (v * multiplier).round() / multiplier;
    // Normalize `-0` so it does not print a sign.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

fn format_si(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }
    let magnitude = v.abs().log10().floor();
    let group = (magnitude / 3.0).floor().clamp(-8.0, 8.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "group is clamped to [-8, 8]"
    )]
    let group_i = group as i32;
    let scaled = v / 10_f64.powi(group_i * 3);
    let int_digits = scaled.abs().log10().floor() + 1.0;
    let decimals = (precision as f64 - int_digits).max(0.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "decimals is a small non-negative integer"
    )]
    let decimals = decimals as usize;
    let prefix_index = usize::try_from(group_i + 8).unwrap_or(8);
    format!("{scaled:.decimals$}{}", SI_PREFIXES[prefix_index])
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(13, 5, 9))
            .expect("valid date")
    }

    #[test]
    fn general_drops_trailing_zeros() {
        let f = general(3);
        assert_eq!(f(&2.0), "2");
        assert_eq!(f(&1.5), "1.5");
        assert_eq!(f(&(0.1 + 0.2)), "0.3");
        assert_eq!(f(&-0.0001), "0");
    }

    #[test]
    fn fixed_and_percentage() {
        assert_eq!(fixed(2)(&1.5), "1.50");
        assert_eq!(percentage(0)(&0.25), "25%");
    }

    #[test]
    fn si_suffix_picks_prefix() {
        let f = si_suffix(3);
        assert_eq!(f(&1500.0), "1.50k");
        assert_eq!(f(&0.0), "0.00");
        assert_eq!(f(&2_000_000.0), "2.00M");
        assert_eq!(f(&0.005), "5.00m");
    }

    #[test]
    fn time_formats_with_pattern() {
        let d = date(2024, 3, 7);
        assert_eq!(time("%Y")(&d), "2024");
        assert_eq!(time("%b %e")(&d), "Mar  7");
        assert_eq!(time("%I:%M %p")(&d), "01:05 PM");
    }

    #[test]
    fn clones_share_one_stateful_closure() {
        use core::cell::Cell;

        let calls = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&calls);
        let f = from_fn(move |v: &f64| {
            counter.set(counter.get() + 1);
            v.to_string()
        });
        let g = Rc::clone(&f);
        assert!(Rc::ptr_eq(&f, &g));
        assert_eq!(g(&3.0), "3");
        assert_eq!(f(&4.5), "4.5");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn identity_uses_display() {
        assert_eq!(identity::<i32>()(&42), "42");
    }
}
