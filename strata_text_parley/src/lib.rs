// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley-backed text measurement adapter.
//!
//! This crate implements [`strata_text::TextMeasurer`] using Parley, enabling shaping-aware
//! metrics for axis layout: tier heights, worst-case label widths, and the label bounds used by
//! overlap suppression.
//!
//! Measurement is single-line: everything after the first `\n` is ignored. Wrap the measurer
//! in [`strata_text::CachedTextMeasurer`] when the same labels are measured on every pass.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use core::cell::RefCell;

use parley::style::{FontFamily as ParleyFontFamily, FontStack, GenericFamily, StyleProperty};
use parley::{
    Alignment, AlignmentOptions, FontContext, FontStyle as ParleyFontStyle, FontWeight,
    LayoutContext,
};
use strata_text::{FontFamily, FontStyle, TextMeasurer, TextMetrics, TextStyle};

/// A [`TextMeasurer`] backed by Parley shaping.
pub struct ParleyTextMeasurer {
    contexts: RefCell<(FontContext, LayoutContext<()>)>,
    display_scale: f32,
    quantize: bool,
}

impl core::fmt::Debug for ParleyTextMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyTextMeasurer")
            .field("display_scale", &self.display_scale)
            .field("quantize", &self.quantize)
            .finish_non_exhaustive()
    }
}

impl ParleyTextMeasurer {
    /// Creates a measurer using Parley’s default system font configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contexts: RefCell::new((FontContext::new(), LayoutContext::new())),
            display_scale: 1.0,
            quantize: true,
        }
    }

    /// Sets the display scale (device pixel ratio) passed to Parley.
    ///
    /// Metrics are reported in logical units regardless of the scale.
    #[must_use]
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale.max(0.0);
        self
    }

    /// Sets whether Parley quantizes layout coordinates to pixel boundaries.
    #[must_use]
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }
}

impl Default for ParleyTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for ParleyTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let line = text.split('\n').next().unwrap_or("");
        if line.is_empty() {
            return TextMetrics::ZERO;
        }

        let scale = self.display_scale.max(1.0e-6);
        let mut contexts = self.contexts.borrow_mut();
        let (font_cx, layout_cx) = &mut *contexts;

        let mut builder = layout_cx.ranged_builder(font_cx, line, scale, self.quantize);
        builder.push_default(StyleProperty::FontSize(font_size_f32(style.font_size)));
        builder.push_default(StyleProperty::FontStack(font_stack(&style.font_family)));
        builder.push_default(StyleProperty::FontStyle(font_style(style.font_style)));
        builder.push_default(StyleProperty::FontWeight(FontWeight::new(f32::from(
            style.font_weight.0,
        ))));

        let mut layout: parley::Layout<()> = builder.build(line);
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());

        let Some(first) = layout.lines().next() else {
            return TextMetrics::ZERO;
        };
        let m = first.metrics();
        let unscale = |v: f32| f64::from(v) / f64::from(scale);
        TextMetrics {
            advance_width: unscale(m.advance),
            ascent: unscale(m.ascent),
            descent: unscale(m.descent),
            leading: unscale(m.leading),
        }
    }
}

fn font_stack(family: &FontFamily) -> FontStack<'_> {
    FontStack::from(match family {
        FontFamily::Serif => ParleyFontFamily::Generic(GenericFamily::Serif),
        FontFamily::SansSerif => ParleyFontFamily::Generic(GenericFamily::SansSerif),
        FontFamily::Monospace => ParleyFontFamily::Generic(GenericFamily::Monospace),
        FontFamily::Named(name) => ParleyFontFamily::Named(Cow::Borrowed(name.as_ref())),
    })
}

fn font_style(style: FontStyle) -> ParleyFontStyle {
    match style {
        FontStyle::Normal => ParleyFontStyle::Normal,
        FontStyle::Italic => ParleyFontStyle::Italic,
        FontStyle::Oblique => ParleyFontStyle::Oblique(None),
    }
}

fn font_size_f32(font_size: f64) -> f32 {
    if !font_size.is_finite() || font_size <= 0.0 {
        return 0.0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped to the f32 range first"
    )]
    {
        font_size.min(f64::from(f32::MAX)) as f32
    }
}
