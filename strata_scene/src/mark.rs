// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark identities and payloads.

extern crate alloc;

use alloc::string::String;

use kurbo::{Circle, Line, Point, Rect, Shape};
use peniko::Brush;
use peniko::color::palette::css;

/// Stable identity of a mark across render passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Creates a mark id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the id `n` steps after this one.
    pub const fn offset(self, n: u64) -> Self {
        Self(self.0.wrapping_add(n))
    }
}

/// Horizontal text anchoring, matching SVG `text-anchor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The anchor point is the start of the text.
    Start,
    /// The anchor point is the horizontal center of the text.
    Middle,
    /// The anchor point is the end of the text.
    End,
}

/// Vertical text anchoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor point is on the alphabetic baseline (bottom of the line box).
    Alphabetic,
    /// The anchor point is on the vertical middle of the line box.
    Middle,
    /// The anchor point is at the top of the line box.
    Hanging,
}

/// The shape family of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// A stroked line segment.
    Line,
    /// A filled (and optionally stroked) rectangle.
    Rect,
    /// A filled circle.
    Circle,
    /// A single line of text.
    Text,
}

/// A stroked line segment.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePayload {
    /// Segment geometry.
    pub line: Line,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// A rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectPayload {
    /// Rectangle geometry.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the outline.
    pub stroke_width: f64,
}

/// A filled circle.
#[derive(Clone, Debug, PartialEq)]
pub struct CirclePayload {
    /// Circle geometry.
    pub circle: Circle,
    /// Fill paint.
    pub fill: Brush,
}

/// A single line of already-measured text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    /// Anchor position.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Horizontal anchoring relative to `pos`.
    pub anchor: TextAnchor,
    /// Vertical anchoring relative to `pos`.
    pub baseline: TextBaseline,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Font size.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Laid-out bounds, computed by whoever measured the text.
    pub bounds: Rect,
}

/// Geometry and paint of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// See [`LinePayload`].
    Line(LinePayload),
    /// See [`RectPayload`].
    Rect(RectPayload),
    /// See [`CirclePayload`].
    Circle(CirclePayload),
    /// See [`TextPayload`].
    Text(TextPayload),
}

impl MarkPayload {
    /// Returns the kind of this payload.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Line(_) => MarkKind::Line,
            Self::Rect(_) => MarkKind::Rect,
            Self::Circle(_) => MarkKind::Circle,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// Returns the axis-aligned bounds of this payload.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Line(l) => Rect::from_points(l.line.p0, l.line.p1),
            Self::Rect(r) => r.rect,
            Self::Circle(c) => c.circle.bounding_box(),
            Self::Text(t) => t.bounds,
        }
    }
}

/// A single retained mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Paint order; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Whether the mark is drawn. Hidden marks stay in the scene.
    pub visible: bool,
    /// Geometry and paint.
    pub payload: MarkPayload,
}

impl Mark {
    /// Creates a visible mark with `z_index = 0`.
    pub fn new(id: MarkId, payload: MarkPayload) -> Self {
        Self {
            id,
            z_index: 0,
            visible: true,
            payload,
        }
    }

    /// Creates a black, 1px line mark.
    pub fn line(id: MarkId, line: Line) -> Self {
        Self::new(
            id,
            MarkPayload::Line(LinePayload {
                line,
                stroke: Brush::Solid(css::BLACK),
                stroke_width: 1.0,
            }),
        )
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets stroke paint and width on line and rect marks; other kinds are unchanged.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        match &mut self.payload {
            MarkPayload::Line(l) => {
                l.stroke = stroke.into();
                l.stroke_width = stroke_width;
            }
            MarkPayload::Rect(r) => {
                r.stroke = stroke.into();
                r.stroke_width = stroke_width;
            }
            MarkPayload::Circle(_) | MarkPayload::Text(_) => {}
        }
        self
    }

    /// Returns the kind of this mark.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }
}
