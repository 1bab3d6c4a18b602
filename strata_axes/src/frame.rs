// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry an axis produces in one render pass.
//!
//! An [`AxisFrame`] is expressed in the axis's local coordinates: the origin is the top-left
//! corner of the granted box. [`AxisFrame::marks`] translates it into scene marks with stable
//! ids, so rendering the same frame twice yields identical marks.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Circle, Line, Point, Rect, Size, Vec2};
use strata_scene::{
    CirclePayload, LinePayload, Mark, MarkId, MarkPayload, RectPayload, TextAnchor, TextBaseline,
    TextPayload,
};

use crate::axis::AxisStyle;
use crate::z_order;

/// Id offsets of the mark groups an axis emits, relative to its id base.
pub mod ids {
    /// The axis baseline.
    pub const BASELINE: u64 = 0;
    /// Untiered tick marks (one id per tick).
    pub const TICK_MARKS: u64 = 100_000;
    /// Untiered tick labels (one id per label).
    pub const TICK_LABELS: u64 = 200_000;
    /// Annotation connector lines.
    pub const ANNOTATION_LINES: u64 = 300_000;
    /// Annotation anchor circles.
    pub const ANNOTATION_CIRCLES: u64 = 400_000;
    /// Annotation label boxes.
    pub const ANNOTATION_RECTS: u64 = 500_000;
    /// Annotation label text.
    pub const ANNOTATION_LABELS: u64 = 600_000;
    /// Stride between time axis tiers; tier `t` starts at `TIER_STRIDE * (t + 1)` and uses the
    /// baseline, tick mark and tick label offsets above.
    pub const TIER_STRIDE: u64 = 1_000_000;

    /// Id base of tier `tier`.
    pub const fn tier_base(tier: usize) -> u64 {
        TIER_STRIDE * (tier as u64 + 1)
    }
}

/// A tick mark.
#[derive(Clone, Debug, PartialEq)]
pub struct TickMark {
    /// Segment, perpendicular to the axis, starting at the axis (or tier) edge.
    pub line: Line,
    /// Whether this is the first or last mark of its group and uses the end tick length.
    pub is_end: bool,
    /// Visibility.
    pub visible: bool,
}

/// A positioned, measured tick label.
#[derive(Clone, Debug, PartialEq)]
pub struct TickLabel {
    /// Label text.
    pub text: String,
    /// Anchor point.
    pub anchor: Point,
    /// Horizontal anchoring relative to `anchor`.
    pub text_anchor: TextAnchor,
    /// Vertical anchoring relative to `anchor`.
    pub baseline: TextBaseline,
    /// Measured bounds.
    pub bounds: Rect,
    /// Visibility after overlap suppression.
    pub visible: bool,
}

impl TickLabel {
    /// Positions a label of the measured `size` at `anchor`.
    pub fn new(
        text: String,
        anchor: Point,
        text_anchor: TextAnchor,
        baseline: TextBaseline,
        size: Size,
    ) -> Self {
        let x0 = match text_anchor {
            TextAnchor::Start => anchor.x,
            TextAnchor::Middle => anchor.x - 0.5 * size.width,
            TextAnchor::End => anchor.x - size.width,
        };
        let y0 = match baseline {
            TextBaseline::Hanging => anchor.y,
            TextBaseline::Middle => anchor.y - 0.5 * size.height,
            TextBaseline::Alphabetic => anchor.y - size.height,
        };
        Self {
            text,
            anchor,
            text_anchor,
            baseline,
            bounds: Rect::from_origin_size((x0, y0), size),
            visible: true,
        }
    }
}

/// One row of a multi-tier time axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tier {
    /// Tier index, counted outward from the axis edge.
    pub index: usize,
    /// The tier's inner edge.
    pub baseline: Line,
    /// Tick marks drawn inside the tier's band.
    pub tick_marks: Vec<TickMark>,
    /// Labels of the tier.
    pub labels: Vec<TickLabel>,
    /// Whether the tier fits in the granted box.
    pub visible: bool,
}

/// One annotated value's decorations.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationMark {
    /// Formatted label.
    pub text: String,
    /// Connector from the axis edge to the label box.
    pub line: Line,
    /// Anchor circle on the axis edge. Always visible.
    pub circle: Circle,
    /// Label box.
    pub rect: Rect,
    /// Whether the label runs along a vertical axis.
    pub vertical: bool,
    /// Assigned tier, or `None` if the label could not be placed.
    pub tier: Option<usize>,
    /// Visibility of the connector, box and label.
    pub visible: bool,
}

/// Everything an axis drew in one pass, in local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisFrame {
    /// Size of the granted box.
    pub size: Size,
    /// Baseline along the edge facing the plot.
    pub baseline: Line,
    /// Untiered tick marks (labelless marks on a time axis).
    pub tick_marks: Vec<TickMark>,
    /// Untiered tick labels.
    pub tick_labels: Vec<TickLabel>,
    /// Time axis tiers.
    pub tiers: Vec<Tier>,
    /// Annotation decorations.
    pub annotations: Vec<AnnotationMark>,
}

impl Default for AxisFrame {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            baseline: Line::new(Point::ZERO, Point::ZERO),
            tick_marks: Vec::new(),
            tick_labels: Vec::new(),
            tiers: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl AxisFrame {
    /// Returns the visible tick labels of every group, untiered ones first.
    pub fn visible_labels(&self) -> impl Iterator<Item = &TickLabel> {
        self.tick_labels
            .iter()
            .chain(
                self.tiers
                    .iter()
                    .filter(|t| t.visible)
                    .flat_map(|t| t.labels.iter()),
            )
            .filter(|l| l.visible)
    }

    /// Converts the frame into scene marks, translated by `origin`.
    pub fn marks(&self, id_base: u64, origin: Point, style: &AxisStyle) -> Vec<Mark> {
        let shift = origin.to_vec2();
        let mut out = Vec::new();

        out.push(rule(
            id_base + ids::BASELINE,
            self.baseline,
            shift,
            style,
            true,
        ));
        push_ticks(&mut out, id_base, &self.tick_marks, shift, style, true);
        push_labels(&mut out, id_base, &self.tick_labels, shift, style, true);

        for tier in &self.tiers {
            let base = id_base + ids::tier_base(tier.index);
            out.push(rule(
                base + ids::BASELINE,
                tier.baseline,
                shift,
                style,
                tier.visible,
            ));
            push_ticks(&mut out, base, &tier.tick_marks, shift, style, tier.visible);
            push_labels(&mut out, base, &tier.labels, shift, style, tier.visible);
        }

        for (i, a) in self.annotations.iter().enumerate() {
            let i = i as u64;
            out.push(
                Mark::new(
                    MarkId::from_raw(id_base + ids::ANNOTATION_LINES + i),
                    MarkPayload::Line(LinePayload {
                        line: shifted(a.line, shift),
                        stroke: style.annotation_stroke.brush.clone(),
                        stroke_width: style.annotation_stroke.stroke_width,
                    }),
                )
                .with_z_index(z_order::ANNOTATION_LINES)
                .with_visible(a.visible),
            );
            out.push(
                Mark::new(
                    MarkId::from_raw(id_base + ids::ANNOTATION_CIRCLES + i),
                    MarkPayload::Circle(CirclePayload {
                        circle: Circle::new(a.circle.center + shift, a.circle.radius),
                        fill: style.annotation_stroke.brush.clone(),
                    }),
                )
                .with_z_index(z_order::ANNOTATION_CIRCLES),
            );
            out.push(
                Mark::new(
                    MarkId::from_raw(id_base + ids::ANNOTATION_RECTS + i),
                    MarkPayload::Rect(RectPayload {
                        rect: a.rect + shift,
                        fill: style.annotation_box_fill.clone(),
                        stroke: style.annotation_stroke.brush.clone(),
                        stroke_width: style.annotation_stroke.stroke_width,
                    }),
                )
                .with_z_index(z_order::ANNOTATION_RECTS)
                .with_visible(a.visible),
            );
            let rect = a.rect + shift;
            out.push(
                Mark::new(
                    MarkId::from_raw(id_base + ids::ANNOTATION_LABELS + i),
                    MarkPayload::Text(TextPayload {
                        pos: rect.center(),
                        text: a.text.clone(),
                        anchor: TextAnchor::Middle,
                        baseline: TextBaseline::Middle,
                        angle: if a.vertical { 90.0 } else { 0.0 },
                        font_size: style.annotation_text.font_size,
                        fill: style.annotation_label_fill.clone(),
                        bounds: rect,
                    }),
                )
                .with_z_index(z_order::ANNOTATION_LABELS)
                .with_visible(a.visible),
            );
        }

        out
    }
}

fn shifted(line: Line, shift: Vec2) -> Line {
    Line::new(line.p0 + shift, line.p1 + shift)
}

fn rule(id: u64, line: Line, shift: Vec2, style: &AxisStyle, visible: bool) -> Mark {
    Mark::line(MarkId::from_raw(id), shifted(line, shift))
        .with_stroke(style.rule.brush.clone(), style.rule.stroke_width)
        .with_z_index(z_order::AXIS_RULES)
        .with_visible(visible)
}

fn push_ticks(
    out: &mut Vec<Mark>,
    base: u64,
    ticks: &[TickMark],
    shift: Vec2,
    style: &AxisStyle,
    group_visible: bool,
) {
    for (i, tick) in ticks.iter().enumerate() {
        out.push(rule(
            base + ids::TICK_MARKS + i as u64,
            tick.line,
            shift,
            style,
            group_visible && tick.visible,
        ));
    }
}

fn push_labels(
    out: &mut Vec<Mark>,
    base: u64,
    labels: &[TickLabel],
    shift: Vec2,
    style: &AxisStyle,
    group_visible: bool,
) {
    for (i, label) in labels.iter().enumerate() {
        out.push(
            Mark::new(
                MarkId::from_raw(base + ids::TICK_LABELS + i as u64),
                MarkPayload::Text(TextPayload {
                    pos: label.anchor + shift,
                    text: label.text.clone(),
                    anchor: label.text_anchor,
                    baseline: label.baseline,
                    angle: 0.0,
                    font_size: style.label_text.font_size,
                    fill: style.label_fill.clone(),
                    bounds: label.bounds + shift,
                }),
            )
            .with_z_index(z_order::AXIS_LABELS)
            .with_visible(group_visible && label.visible),
        );
    }
}
