// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic axis component.
//!
//! An [`Axis`] renders the parts every axis shares: a baseline along the edge facing the plot,
//! tick marks, and optional annotations in the band beyond its core. Concrete axes
//! ([`NumericAxis`](crate::NumericAxis), [`TimeAxis`](crate::TimeAxis)) wrap it and add labels.
//!
//! Coordinates are local to the granted box:
//! - `Bottom` axes hang below the plot, so their baseline is at `y = 0`.
//! - `Top` axes sit above it, so their baseline is at `y = height`.
//! - `Left` axes have their baseline at `x = width`, `Right` axes at `x = 0`.

extern crate alloc;

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use kurbo::{Line, Rect, Size};
use peniko::Brush;
use peniko::color::palette::css;
use strata_scene::{MarkDiff, Scene};
use strata_text::{HeuristicTextMeasurer, TextMeasurer, TextStyle};

use crate::annotation::{self, ANNOTATION_LABEL_PADDING, AnnotationState, MeasuredAnnotation};
use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::error::{AxisError, check_length};
use crate::format::Formatter;
use crate::frame::{AnnotationMark, AxisFrame, TickMark};
use crate::layout::{Component, ComponentLayout, SpaceRequest, XAlignment, YAlignment};
use crate::memo::RenderState;
use crate::scale::Scale;
use crate::shared_scale::{SharedScale, Subscription};

/// Default length of inner and end tick marks.
pub const DEFAULT_TICK_LENGTH: f64 = 5.0;
/// Default gap between a tick mark and its label.
pub const DEFAULT_TICK_LABEL_PADDING: f64 = 10.0;
/// Default extra space requested beyond the axis core.
pub const DEFAULT_MARGIN: f64 = 15.0;

/// Which side of the plot an axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Above the plot.
    Top,
    /// Below the plot.
    Bottom,
    /// Left of the plot.
    Left,
    /// Right of the plot.
    Right,
}

impl AxisOrient {
    /// Returns `true` for `Top` and `Bottom`.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Returns the lowercase name (`"bottom"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Alignment of an axis inside a larger offer: flush against the plot.
    fn default_alignment(self) -> (XAlignment, YAlignment) {
        match self {
            Self::Bottom => (XAlignment::Left, YAlignment::Top),
            Self::Top => (XAlignment::Left, YAlignment::Bottom),
            Self::Left => (XAlignment::Right, YAlignment::Top),
            Self::Right => (XAlignment::Left, YAlignment::Top),
        }
    }
}

impl fmt::Display for AxisOrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisOrient {
    type Err = AxisError;

    /// Parses `top`, `bottom`, `left` or `right`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Top, Self::Bottom, Self::Left, Self::Right]
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AxisError::UnknownOrientation(String::from(s)))
    }
}

/// A stroke brush and width.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// A solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Paint and text styles of an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Baseline and tick marks.
    pub rule: StrokeStyle,
    /// Tick label paint.
    pub label_fill: Brush,
    /// Tick label text style. Its metrics drive label layout.
    pub label_text: TextStyle,
    /// Annotation label text style.
    pub annotation_text: TextStyle,
    /// Annotation connectors, circles and box outlines.
    pub annotation_stroke: StrokeStyle,
    /// Annotation box fill.
    pub annotation_box_fill: Brush,
    /// Annotation label paint.
    pub annotation_label_fill: Brush,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            rule: StrokeStyle::default(),
            label_fill: Brush::from(css::BLACK),
            label_text: TextStyle::new(12.0),
            annotation_text: TextStyle::new(12.0),
            annotation_stroke: StrokeStyle::default(),
            annotation_box_fill: Brush::from(css::WHITE),
            annotation_label_fill: Brush::from(css::BLACK),
        }
    }
}

/// Registers a scale listener that invalidates `state` and schedules a render.
///
/// The listener holds the state weakly: an axis that was dropped without unsubscribing
/// (impossible through the public API) would simply be ignored.
fn watch<S>(scale: &SharedScale<S>, state: &Rc<RenderState>) -> Subscription {
    let state: Weak<RenderState> = Rc::downgrade(state);
    scale.subscribe(move || {
        if let Some(state) = state.upgrade() {
            state.redraw();
        }
    })
}

/// An axis bound to a shared scale.
///
/// The axis subscribes to its scale while alive: any scale update invalidates its cached sizes
/// and schedules a render, which happens on the next [`Component::render_if_needed`]. Dropping
/// the axis unsubscribes.
///
/// Every setter validates its argument before touching any state, so a setter returning an
/// error leaves the axis unchanged.
pub struct Axis<S: Scale> {
    id_base: u64,
    scale: SharedScale<S>,
    subscription: Subscription,
    render_state: Rc<RenderState>,
    orientation: AxisOrient,
    horizontal_only: bool,
    formatter: Formatter<S::Value>,
    inner_tick_length: f64,
    end_tick_length: f64,
    tick_label_padding: f64,
    margin: f64,
    show_end_tick_labels: bool,
    annotations: AnnotationState<S::Value>,
    style: AxisStyle,
    measurer: Rc<dyn TextMeasurer>,
    diagnostics: Rc<dyn Diagnostics>,
    layout: ComponentLayout,
    scene: Scene,
    frame: AxisFrame,
}

impl<S: Scale> fmt::Debug for Axis<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("id_base", &self.id_base)
            .field("orientation", &self.orientation)
            .field("inner_tick_length", &self.inner_tick_length)
            .field("end_tick_length", &self.end_tick_length)
            .field("tick_label_padding", &self.tick_label_padding)
            .field("margin", &self.margin)
            .field("show_end_tick_labels", &self.show_end_tick_labels)
            .field("annotations_enabled", &self.annotations.enabled)
            .field("bounds", &self.layout.bounds)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl<S: Scale> Axis<S> {
    /// Creates an axis on `scale`.
    ///
    /// Mark ids of this axis start at `id_base`; give each axis in a scene its own base (a
    /// multiple of 100 000 000 leaves room for every tier).
    pub fn new(id_base: u64, scale: SharedScale<S>, orientation: AxisOrient) -> Self {
        let render_state = Rc::new(RenderState::new());
        let subscription = watch(&scale, &render_state);
        let formatter = scale.with(|s| s.default_formatter());
        let (x, y) = orientation.default_alignment();
        Self {
            id_base,
            annotations: AnnotationState::new(formatter.clone()),
            scale,
            subscription,
            render_state,
            orientation,
            horizontal_only: false,
            formatter,
            inner_tick_length: DEFAULT_TICK_LENGTH,
            end_tick_length: DEFAULT_TICK_LENGTH,
            tick_label_padding: DEFAULT_TICK_LABEL_PADDING,
            margin: DEFAULT_MARGIN,
            show_end_tick_labels: false,
            style: AxisStyle::default(),
            measurer: Rc::new(HeuristicTextMeasurer),
            diagnostics: Rc::new(NoopDiagnostics),
            layout: ComponentLayout::new(x, y),
            scene: Scene::new(),
            frame: AxisFrame::default(),
        }
    }

    /// Creates an axis that rejects vertical orientations, now and in later setters.
    pub(crate) fn new_horizontal(
        id_base: u64,
        scale: SharedScale<S>,
        orientation: AxisOrient,
    ) -> Result<Self, AxisError> {
        if !orientation.is_horizontal() {
            return Err(AxisError::UnsupportedOrientation(orientation));
        }
        let mut axis = Self::new(id_base, scale, orientation);
        axis.horizontal_only = true;
        Ok(axis)
    }

    /// Sets the text measurer used for label layout.
    pub fn with_measurer(mut self, measurer: Rc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self.render_state.redraw();
        self
    }

    /// Sets the sink for rendering warnings.
    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Sets the paint and text styles.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.set_style(style);
        self
    }

    /// Sets the tick label formatter.
    pub fn with_formatter(mut self, formatter: Formatter<S::Value>) -> Self {
        self.set_formatter(formatter);
        self
    }

    /// Overrides how the axis aligns itself inside a larger offer.
    pub fn with_alignment(mut self, x: XAlignment, y: YAlignment) -> Self {
        self.layout.x_alignment = x;
        self.layout.y_alignment = y;
        self
    }

    /// First mark id of this axis.
    pub fn id_base(&self) -> u64 {
        self.id_base
    }

    /// The scale handle.
    pub fn scale(&self) -> &SharedScale<S> {
        &self.scale
    }

    /// Moves the axis to another scale, unsubscribing from the previous one.
    pub fn set_scale(&mut self, scale: SharedScale<S>) {
        // Assigning drops the old subscription.
        self.subscription = watch(&scale, &self.render_state);
        self.scale = scale;
        self.redraw();
    }

    /// The side of the plot the axis sits on.
    pub fn orientation(&self) -> AxisOrient {
        self.orientation
    }

    /// Moves the axis to another side of the plot.
    pub fn set_orientation(&mut self, orientation: AxisOrient) -> Result<(), AxisError> {
        if self.horizontal_only && !orientation.is_horizontal() {
            return Err(AxisError::UnsupportedOrientation(orientation));
        }
        self.orientation = orientation;
        let (x, y) = orientation.default_alignment();
        self.layout.x_alignment = x;
        self.layout.y_alignment = y;
        self.redraw();
        Ok(())
    }

    /// Like [`Axis::set_orientation`], parsing the orientation case-insensitively.
    pub fn set_orientation_str(&mut self, orientation: &str) -> Result<(), AxisError> {
        self.set_orientation(orientation.parse()?)
    }

    /// Whether the axis runs horizontally.
    pub fn is_horizontal(&self) -> bool {
        self.orientation.is_horizontal()
    }

    /// The tick label formatter.
    pub fn formatter(&self) -> &Formatter<S::Value> {
        &self.formatter
    }

    /// Replaces the tick label formatter.
    pub fn set_formatter(&mut self, formatter: Formatter<S::Value>) {
        self.formatter = formatter;
        self.redraw();
    }

    /// Length of every tick mark except the first and last.
    pub fn inner_tick_length(&self) -> f64 {
        self.inner_tick_length
    }

    /// Sets the inner tick length.
    pub fn set_inner_tick_length(&mut self, length: f64) -> Result<(), AxisError> {
        self.inner_tick_length = check_length("inner_tick_length", length)?;
        self.redraw();
        Ok(())
    }

    /// Length of the first and last tick marks.
    pub fn end_tick_length(&self) -> f64 {
        self.end_tick_length
    }

    /// Sets the end tick length.
    pub fn set_end_tick_length(&mut self, length: f64) -> Result<(), AxisError> {
        self.end_tick_length = check_length("end_tick_length", length)?;
        self.redraw();
        Ok(())
    }

    /// Gap between tick marks and labels.
    pub fn tick_label_padding(&self) -> f64 {
        self.tick_label_padding
    }

    /// Sets the tick label padding.
    pub fn set_tick_label_padding(&mut self, padding: f64) -> Result<(), AxisError> {
        self.tick_label_padding = check_length("tick_label_padding", padding)?;
        self.redraw();
        Ok(())
    }

    /// Extra space requested beyond the core.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Sets the margin.
    pub fn set_margin(&mut self, margin: f64) -> Result<(), AxisError> {
        self.margin = check_length("margin", margin)?;
        self.redraw();
        Ok(())
    }

    /// Whether the end ticks count toward the core size and their labels may overhang.
    pub fn show_end_tick_labels(&self) -> bool {
        self.show_end_tick_labels
    }

    /// Sets whether end tick labels are shown.
    pub fn set_show_end_tick_labels(&mut self, show: bool) {
        self.show_end_tick_labels = show;
        self.redraw();
    }

    /// Whether annotations are drawn.
    pub fn annotations_enabled(&self) -> bool {
        self.annotations.enabled
    }

    /// Enables or disables annotations.
    pub fn set_annotations_enabled(&mut self, enabled: bool) {
        self.annotations.enabled = enabled;
        self.redraw();
    }

    /// The annotated values, in the order given. `None` entries are skipped when drawing.
    pub fn annotated_ticks(&self) -> &[Option<S::Value>] {
        &self.annotations.ticks
    }

    /// Replaces the annotated values.
    ///
    /// Missing entries, repeats and values outside the scale's range are skipped when drawing;
    /// the order decides which labels win a tier.
    pub fn set_annotated_ticks(&mut self, ticks: impl IntoIterator<Item = Option<S::Value>>) {
        self.annotations.ticks = ticks.into_iter().collect();
        self.redraw();
    }

    /// The annotation label formatter.
    pub fn annotation_formatter(&self) -> &Formatter<S::Value> {
        &self.annotations.formatter
    }

    /// Replaces the annotation label formatter.
    pub fn set_annotation_formatter(&mut self, formatter: Formatter<S::Value>) {
        self.annotations.formatter = formatter;
        self.redraw();
    }

    /// Maximum number of annotation tiers.
    pub fn annotation_tier_count(&self) -> usize {
        self.annotations.tier_count
    }

    /// Sets the maximum number of annotation tiers.
    pub fn set_annotation_tier_count(&mut self, count: usize) {
        self.annotations.tier_count = count;
        self.redraw();
    }

    /// Paint and text styles.
    pub fn style(&self) -> &AxisStyle {
        &self.style
    }

    /// Replaces the styles. Cached text measurements are dropped, since fonts may have changed.
    pub fn set_style(&mut self, style: AxisStyle) {
        self.style = style;
        self.measurer.invalidate();
        self.redraw();
    }

    /// The text measurer.
    pub fn measurer(&self) -> &dyn TextMeasurer {
        &*self.measurer
    }

    /// The layout record: alignment, last offer and granted box.
    pub fn layout(&self) -> &ComponentLayout {
        &self.layout
    }

    /// The geometry of the last render, in local coordinates.
    pub fn frame(&self) -> &AxisFrame {
        &self.frame
    }

    /// The marks of the last render.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Longest tick mark: the end length counts only when end labels are shown.
    pub fn max_label_tick_length(&self) -> f64 {
        if self.show_end_tick_labels {
            self.inner_tick_length.max(self.end_tick_length)
        } else {
            self.inner_tick_length
        }
    }

    /// Depth of one annotation tier: a line of annotation text plus padding on both sides.
    pub fn annotation_tier_height(&self) -> f64 {
        self.measurer
            .line_metrics(&self.style.annotation_text)
            .line_height()
            + 2.0 * ANNOTATION_LABEL_PADDING
    }

    pub(crate) fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    pub(crate) fn diagnostics(&self) -> &dyn Diagnostics {
        &*self.diagnostics
    }

    /// Drops memoized sizes and schedules a render.
    pub(crate) fn redraw(&self) {
        self.render_state.redraw();
    }

    /// Size of the granted box.
    pub(crate) fn size(&self) -> Size {
        self.layout.bounds.size()
    }

    /// Width and line height of `text` in the tick label style.
    pub(crate) fn measure_label(&self, text: &str) -> Size {
        let metrics = self.measurer.measure(text, &self.style.label_text);
        Size::new(metrics.advance_width, metrics.line_height())
    }

    /// Line height of the tick label style.
    pub(crate) fn label_line_height(&self) -> f64 {
        self.measurer.line_metrics(&self.style.label_text).line_height()
    }

    /// Formats `value` with the tick label formatter.
    pub(crate) fn format(&self, value: &S::Value) -> String {
        (self.formatter)(value)
    }

    /// The space request of an axis whose core is `core` deep.
    pub(crate) fn requested_space_for(&self, core: f64) -> SpaceRequest {
        let depth = core + self.margin;
        if self.is_horizontal() {
            SpaceRequest {
                min_width: 0.0,
                min_height: depth,
            }
        } else {
            SpaceRequest {
                min_width: depth,
                min_height: 0.0,
            }
        }
    }

    /// Records the granted box, pushes the matching pixel range into the scale, and schedules
    /// a render.
    ///
    /// The range is only written when it changed, so laying out twice does not notify other
    /// axes sharing the scale.
    pub(crate) fn apply_layout(&mut self, offer: Rect, size: Size) {
        let bounds = self.layout.place(offer, size);
        let range = if self.is_horizontal() {
            (0.0, bounds.width())
        } else {
            (bounds.height(), 0.0)
        };
        if self.scale.with(|s| s.range()) != range {
            self.scale.update(|s| s.set_range(range));
        }
        self.render_state.schedule();
    }

    /// A tick mark of `length` at pixel `position`, starting at the baseline.
    pub(crate) fn tick_line(&self, position: f64, length: f64, size: Size) -> Line {
        match self.orientation {
            AxisOrient::Bottom => Line::new((position, 0.0), (position, length)),
            AxisOrient::Top => Line::new((position, size.height), (position, size.height - length)),
            AxisOrient::Left => Line::new((size.width, position), (size.width - length, position)),
            AxisOrient::Right => Line::new((0.0, position), (length, position)),
        }
    }

    /// The baseline along the edge facing the plot.
    pub(crate) fn baseline(&self, size: Size) -> Line {
        match self.orientation {
            AxisOrient::Bottom => Line::new((0.0, 0.0), (size.width, 0.0)),
            AxisOrient::Top => Line::new((0.0, size.height), (size.width, size.height)),
            AxisOrient::Left => Line::new((size.width, 0.0), (size.width, size.height)),
            AxisOrient::Right => Line::new((0.0, 0.0), (0.0, size.height)),
        }
    }

    /// Tick marks for `values`; the first and last are ends and use the end tick length.
    pub(crate) fn tick_marks(&self, values: &[S::Value], size: Size) -> Vec<TickMark> {
        let last = values.len().saturating_sub(1);
        self.scale.with(|s| {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let is_end = i == 0 || i == last;
                    let length = if is_end {
                        self.end_tick_length
                    } else {
                        self.inner_tick_length
                    };
                    TickMark {
                        line: self.tick_line(s.scale(*v), length, size),
                        is_end,
                        visible: true,
                    }
                })
                .collect()
        })
    }

    /// Places the annotations in the band beyond a core `core` deep.
    pub(crate) fn annotation_marks(&self, size: Size, core: f64) -> Vec<AnnotationMark> {
        if !self.annotations.enabled {
            return Vec::new();
        }
        let measured: Vec<MeasuredAnnotation> = self.scale.with(|s| {
            let (r0, r1) = s.range();
            let (lo, hi) = (r0.min(r1), r0.max(r1));
            annotation::distinct_values(&self.annotations.ticks, |v| {
                let p = s.scale(v);
                p >= lo && p <= hi
            })
            .into_iter()
            .map(|v| {
                let text = (self.annotations.formatter)(&v);
                let width = self
                    .measurer
                    .measure(&text, &self.style.annotation_text)
                    .advance_width;
                MeasuredAnnotation {
                    text,
                    position: s.scale(v),
                    length: width + 2.0 * ANNOTATION_LABEL_PADDING,
                }
            })
            .collect()
        });
        annotation::place_annotations(
            self.orientation,
            size,
            core,
            self.annotation_tier_height(),
            self.annotations.tier_count,
            measured,
        )
    }

    /// A frame with the baseline, tick marks for `values`, and annotations beyond `core`.
    pub(crate) fn base_frame(&self, values: &[S::Value], core: f64) -> AxisFrame {
        let size = self.size();
        AxisFrame {
            size,
            baseline: self.baseline(size),
            tick_marks: self.tick_marks(values, size),
            tick_labels: Vec::new(),
            tiers: Vec::new(),
            annotations: self.annotation_marks(size, core),
        }
    }

    /// Publishes `frame` into the scene and returns the mark changes.
    pub(crate) fn commit(&mut self, frame: AxisFrame) -> Vec<MarkDiff> {
        let marks = frame.marks(self.id_base, self.layout.bounds.origin(), &self.style);
        let diffs = self.scene.tick(marks);
        self.frame = frame;
        self.render_state.mark_rendered();
        diffs
    }
}

impl<S: Scale> Component for Axis<S> {
    fn requested_space(&self, _offered_width: f64, _offered_height: f64) -> SpaceRequest {
        self.requested_space_for(self.max_label_tick_length())
    }

    fn fixed_width(&self) -> bool {
        !self.is_horizontal()
    }

    fn fixed_height(&self) -> bool {
        self.is_horizontal()
    }

    fn compute_layout(&mut self, offer: Option<Rect>) {
        let Some(offer) = offer.or(self.layout.offer) else {
            return;
        };
        let size = self.size_from_offer(offer.width(), offer.height());
        self.apply_layout(offer, size);
    }

    fn bounds(&self) -> Rect {
        self.layout.bounds
    }

    fn render_immediately(&mut self) -> Vec<MarkDiff> {
        let frame = self.base_frame(&[], self.max_label_tick_length());
        self.commit(frame)
    }

    fn needs_render(&self) -> bool {
        self.render_state.is_pending()
    }
}
