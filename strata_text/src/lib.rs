// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Axes need measured text to negotiate layout: the cross dimension of an axis depends on its
//! label heights, and whether a time tier fits depends on the width of its widest label. Shaping
//! and glyph layout stay downstream, so guide code depends on the small [`TextMeasurer`]
//! interface defined here.
//!
//! This crate is:
//! - small and dependency-light,
//! - `no_std`-friendly (it uses `alloc` for owned font family names and the cache), and
//! - renderer-agnostic (native shaping engines and web canvas measurement can both implement
//!   the same trait).

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::cell::RefCell;

use hashbrown::HashMap;

/// Text used to probe line metrics when no label is known yet.
const REPRESENTATIVE_LINE: &str = "Hg";

/// A minimal text measurement interface used by guide generators.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers should split on `\n` if they
    /// want multi-line layout.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Metrics of an empty, representative line in `style`.
    ///
    /// The advance width is always `0`; the vertical metrics are those of a typical line, which
    /// is what guides use to size label rows before any label is known.
    fn line_metrics(&self, style: &TextStyle) -> TextMetrics {
        TextMetrics {
            advance_width: 0.0,
            ..self.measure(REPRESENTATIVE_LINE, style)
        }
    }

    /// Drops any cached measurements.
    ///
    /// Callers invoke this whenever font metrics may have changed. Measurers without a cache
    /// ignore it.
    fn invalidate(&self) {}
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }

    fn line_metrics(&self, style: &TextStyle) -> TextMetrics {
        (**self).line_metrics(style)
    }

    fn invalidate(&self) {
        (**self).invalidate();
    }
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the chart’s coordinate system (typically pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Inter"`, `"Helvetica Neue"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width (useful for horizontal layout).
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// All-zero metrics.
    pub const ZERO: Self = Self {
        advance_width: 0.0,
        ascent: 0.0,
        descent: 0.0,
        leading: 0.0,
    };

    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }

    /// Returns `(advance_width, line_height)`.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.advance_width, self.line_height())
    }
}

/// A tiny heuristic text measurer suitable for demos, tests, and early layout.
///
/// It assumes an average glyph width of ~0.6em and a baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance_width = 0.6 * style.font_size * text.chars().count() as f64;
        let ascent = 0.8 * style.font_size;
        let descent = 0.2 * style.font_size;
        TextMetrics {
            advance_width,
            ascent,
            descent,
            leading: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    font_size_bits: u64,
    font_family: FontFamily,
    font_weight: FontWeight,
    font_style: FontStyle,
}

impl CacheKey {
    fn new(text: &str, style: &TextStyle) -> Self {
        Self {
            text: text.into(),
            font_size_bits: style.font_size.to_bits(),
            font_family: style.font_family.clone(),
            font_weight: style.font_weight,
            font_style: style.font_style,
        }
    }
}

/// A memoizing wrapper around another [`TextMeasurer`].
///
/// Guides measure the same strings on every layout pass. The cache must be cleared with
/// [`CachedTextMeasurer::invalidate`] whenever font metrics may have changed (fonts loaded,
/// display scale changed, and so on).
#[derive(Debug)]
pub struct CachedTextMeasurer<M> {
    inner: M,
    cache: RefCell<HashMap<CacheKey, TextMetrics>>,
}

impl<M: TextMeasurer> CachedTextMeasurer<M> {
    /// Wraps `inner`.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the number of cached measurements.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Returns the wrapped measurer.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedTextMeasurer<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let key = CacheKey::new(text, style);
        if let Some(metrics) = self.cache.borrow().get(&key) {
            return *metrics;
        }
        let metrics = self.inner.measure(text, style);
        self.cache.borrow_mut().insert(key, metrics);
        metrics
    }

    /// Drops every cached measurement, then forwards to the wrapped measurer.
    fn invalidate(&self) {
        self.cache.borrow_mut().clear();
        self.inner.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CountingMeasurer {
        calls: Cell<usize>,
    }

    impl TextMeasurer for CountingMeasurer {
        fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
            self.calls.set(self.calls.get() + 1);
            HeuristicTextMeasurer.measure(text, style)
        }
    }

    #[test]
    fn heuristic_measurer_scales_with_length() {
        let style = TextStyle::new(10.0);
        let m = HeuristicTextMeasurer.measure("abcd", &style);
        assert_eq!(m.advance_width, 24.0);
        assert_eq!(m.line_height(), 10.0);
    }

    #[test]
    fn line_metrics_have_no_width() {
        let m = HeuristicTextMeasurer.line_metrics(&TextStyle::new(12.0));
        assert_eq!(m.advance_width, 0.0);
        assert!((m.line_height() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn cache_hits_until_invalidated() {
        let cached = CachedTextMeasurer::new(CountingMeasurer::default());
        let style = TextStyle::new(12.0);
        cached.measure("2024", &style);
        cached.measure("2024", &style);
        assert_eq!(cached.inner().calls.get(), 1);
        assert_eq!(cached.cached_len(), 1);

        cached.measure("2024", &TextStyle::new(14.0));
        assert_eq!(cached.inner().calls.get(), 2);

        cached.invalidate();
        assert_eq!(cached.cached_len(), 0);
        cached.measure("2024", &style);
        assert_eq!(cached.inner().calls.get(), 3);
    }
}
