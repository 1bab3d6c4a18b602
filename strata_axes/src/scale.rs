// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scale abstraction consumed by axes, and a linear scale.
//!
//! A scale maps domain values to pixels and back. Axes read the domain and ticks from it and
//! write only its range (during layout). See [`crate::SharedScale`] for sharing one scale
//! between several axes with change notification.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt::Debug;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::format::{self, Formatter};

/// Upper bound on the number of ticks a single tick query produces.
pub(crate) const MAX_TICKS: usize = 10_000;

/// A bidirectional mapping between a domain of values and a pixel range.
pub trait Scale {
    /// The domain value type.
    type Value: Copy + PartialEq + Debug;

    /// Maps a domain value to a pixel position.
    fn scale(&self, value: Self::Value) -> f64;

    /// Maps a pixel position back to a domain value.
    fn invert(&self, pixel: f64) -> Self::Value;

    /// Returns the domain as authored (`(start, end)`, possibly reversed).
    fn domain(&self) -> (Self::Value, Self::Value);

    /// Returns the pixel range as `(start, end)`.
    fn range(&self) -> (f64, f64);

    /// Sets the pixel range.
    fn set_range(&mut self, range: (f64, f64));

    /// Returns tick values in domain order.
    fn ticks(&self) -> Vec<Self::Value>;

    /// Returns the formatter axes use for tick labels unless told otherwise.
    fn default_formatter(&self) -> Formatter<Self::Value>;
}

/// A linear mapping from an `f64` domain to a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    tick_count: usize,
}

impl ScaleLinear {
    /// Creates a scale over `domain` with range `(0, 1)` and about 10 ticks.
    pub fn new(domain: (f64, f64)) -> Self {
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
    pub fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    /// Returns the approximate number of ticks.
    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Sets the approximate number of ticks.
    pub fn set_tick_count(&mut self, tick_count: usize) {
        self.tick_count = tick_count;
    }
}

impl Scale for ScaleLinear {
    type Value = f64;

    fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        r0 + (value - d0) / denom * (r1 - r0)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (pixel - r0) / denom * (d1 - d0)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// Returns "nice" ticks inside the domain, ordered from the domain start to its end.
    ///
    /// A reversed domain (`start > end`) yields descending ticks.
    fn ticks(&self) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let mut ticks = nice_ticks(d0, d1, self.tick_count);
        if d0 > d1 {
            ticks.reverse();
        }
        ticks
    }

    fn default_formatter(&self) -> Formatter<f64> {
        format::general(6)
    }
}

/// Ticks at multiples of a 1-2-5 step, inside `[min(a, b), max(a, b)]`, ascending.
pub(crate) fn nice_ticks(a: f64, b: f64, count: usize) -> Vec<f64> {
    if count == 0 || !a.is_finite() || !b.is_finite() {
        return Vec::new();
    }
    if a == b {
        return alloc::vec![a];
    }
    let (min, max) = if a < b { (a, b) } else { (b, a) };
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    // Small steps are applied as divisions by an integer so 0.1 * 3 prints as 0.3.
    let inverse = (step < 1.0).then(|| (1.0 / step).round());
    let (start, stop) = match inverse {
        Some(inv) => ((min * inv).ceil(), (max * inv).floor()),
        None => ((min / step).ceil(), (max / step).floor()),
    };
    let to_value = |k: f64| match inverse {
        Some(inv) => k / inv,
        None => k * step,
    };

    let n = stop - start;
    if !n.is_finite() || n < 0.0 {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "guarded by finite/non-negative checks and capped"
    )]
    let n = n.min(MAX_TICKS as f64 - 1.0) as usize;
    (0..=n).map(|i| to_value(start + i as f64)).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "log10 of a finite f64 is within i32"
    )]
    let base = 10_f64.powi(power as i32);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;

    #[test]
    fn linear_maps_and_inverts() {
        let s = ScaleLinear::new((0.0, 10.0)).with_range((100.0, 200.0));
        assert_eq!(s.scale(0.0), 100.0);
        assert_eq!(s.scale(5.0), 150.0);
        assert_eq!(s.invert(175.0), 7.5);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let s = ScaleLinear::new((3.0, 3.0)).with_range((10.0, 20.0));
        assert_eq!(s.scale(3.0), 10.0);
        assert_eq!(s.ticks(), vec![3.0]);
    }

    #[test]
    fn ticks_stay_inside_the_domain() {
        let s = ScaleLinear::new((0.5, 9.5));
        let ticks = s.ticks();
        assert_eq!(ticks.first(), Some(&1.0));
        assert_eq!(ticks.last(), Some(&9.0));
    }

    #[test]
    fn small_steps_are_exact() {
        let s = ScaleLinear::new((0.0, 1.0));
        let ticks = s.ticks();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
    }

    #[test]
    fn reversed_domain_yields_descending_ticks() {
        let s = ScaleLinear::new((3.0, 0.0)).with_tick_count(3);
        assert_eq!(s.ticks(), vec![3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_tick_count_yields_nothing() {
        let s = ScaleLinear::new((0.0, 1.0)).with_tick_count(0);
        assert!(s.ticks().is_empty());
    }
}
