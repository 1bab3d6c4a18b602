// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Annotation placement.
//!
//! Annotated values are drawn as callouts in the margin band beyond the axis core: a circle on
//! the axis edge, a connector, and a boxed label. Boxes are packed into rows ("tiers") greedily,
//! first fit, in the order the values were given. Boxes that do not fit in any available tier
//! are hidden, but their circles stay.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{Circle, Line, Point, Rect, Size};

use crate::axis::AxisOrient;
use crate::format::Formatter;
use crate::frame::AnnotationMark;

/// Padding between an annotation label and its box, on every side.
pub const ANNOTATION_LABEL_PADDING: f64 = 2.0;
/// Radius of the anchor circle.
pub const ANNOTATION_CIRCLE_RADIUS: f64 = 3.0;

/// Annotation settings of an axis.
pub(crate) struct AnnotationState<V> {
    pub(crate) enabled: bool,
    pub(crate) ticks: Vec<Option<V>>,
    pub(crate) formatter: Formatter<V>,
    pub(crate) tier_count: usize,
}

impl<V> AnnotationState<V> {
    pub(crate) fn new(formatter: Formatter<V>) -> Self {
        Self {
            enabled: false,
            ticks: Vec::new(),
            formatter,
            tier_count: 1,
        }
    }
}

/// Drops missing entries, values rejected by `in_range`, and repeats, keeping first occurrences.
pub(crate) fn distinct_values<V: Copy + PartialEq>(
    ticks: &[Option<V>],
    in_range: impl Fn(V) -> bool,
) -> Vec<V> {
    let mut out: Vec<V> = Vec::new();
    for v in ticks.iter().flatten().copied() {
        if in_range(v) && !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// A label box to place: its start along the axis and its length along the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Footprint {
    pub(crate) position: f64,
    pub(crate) length: f64,
}

/// Assigns each footprint the lowest tier where it collides with nothing already there.
///
/// Footprints that would stick out of `[0, axis_length]` get `None`. Touching footprints
/// collide.
pub(crate) fn assign_tiers(footprints: &[Footprint], axis_length: f64) -> Vec<Option<usize>> {
    let mut tiers: Vec<Vec<Footprint>> = Vec::new();
    footprints
        .iter()
        .map(|f| {
            if f.position < 0.0 || f.position + f.length > axis_length {
                return None;
            }
            let collides = |other: &Footprint| {
                f.position + f.length >= other.position
                    && f.position <= other.position + other.length
            };
            let tier = tiers
                .iter()
                .position(|row| !row.iter().any(collides))
                .unwrap_or(tiers.len());
            if tier == tiers.len() {
                tiers.push(Vec::new());
            }
            tiers[tier].push(*f);
            Some(tier)
        })
        .collect()
}

/// Number of annotation tiers that fit in the band beyond `core` in a box `cross` deep.
#[allow(
    clippy::cast_possible_truncation,
    reason = "room is finite and positive, and capped by a usize"
)]
pub(crate) fn available_tiers(tier_count: usize, cross: f64, core: f64, tier_height: f64) -> usize {
    if tier_height <= 0.0 {
        return 0;
    }
    let room = ((cross - core) / tier_height).floor();
    if !room.is_finite() || room <= 0.0 {
        return 0;
    }
    room.min(tier_count as f64) as usize
}

/// A measured annotation ready for placement.
#[derive(Clone, Debug)]
pub(crate) struct MeasuredAnnotation {
    pub(crate) text: String,
    /// Pixel position of the value along the axis.
    pub(crate) position: f64,
    /// Label width plus padding.
    pub(crate) length: f64,
}

/// Builds the decorations of every annotation.
///
/// `size` is the granted box, `core` the depth of the axis core (ticks and labels) measured
/// from the plot-facing edge, and `tier_height` the depth of one annotation row.
pub(crate) fn place_annotations(
    orientation: AxisOrient,
    size: Size,
    core: f64,
    tier_height: f64,
    tier_count: usize,
    annotations: Vec<MeasuredAnnotation>,
) -> Vec<AnnotationMark> {
    let horizontal = orientation.is_horizontal();
    let (axis_length, cross) = if horizontal {
        (size.width, size.height)
    } else {
        (size.height, size.width)
    };
    let core = core.min(cross);
    let footprints: Vec<Footprint> = annotations
        .iter()
        .map(|a| Footprint {
            position: a.position,
            length: a.length,
        })
        .collect();
    let tiers = assign_tiers(&footprints, axis_length);
    let usable = available_tiers(tier_count, cross, core, tier_height);

    // Distance of the axis edge, and of each tier's inner edge, from the box's leading edge.
    let edge = match orientation {
        AxisOrient::Bottom | AxisOrient::Right => 0.0,
        AxisOrient::Top => size.height,
        AxisOrient::Left => size.width,
    };
    let tier_offset = |tier: usize| match orientation {
        AxisOrient::Bottom | AxisOrient::Right => tier as f64 * tier_height + core,
        AxisOrient::Top | AxisOrient::Left => cross - core - tier as f64 * tier_height,
    };
    let grows_inward = matches!(orientation, AxisOrient::Top | AxisOrient::Left);

    annotations
        .into_iter()
        .zip(tiers)
        .map(|(a, tier)| {
            let offset = tier_offset(tier.unwrap_or(0));
            let box_start = if grows_inward {
                offset - tier_height
            } else {
                offset
            };
            let (anchor, end, rect) = if horizontal {
                (
                    Point::new(a.position, edge),
                    Point::new(a.position, offset),
                    Rect::new(
                        a.position,
                        box_start,
                        a.position + a.length,
                        box_start + tier_height,
                    ),
                )
            } else {
                (
                    Point::new(edge, a.position),
                    Point::new(offset, a.position),
                    Rect::new(
                        box_start,
                        a.position,
                        box_start + tier_height,
                        a.position + a.length,
                    ),
                )
            };
            AnnotationMark {
                text: a.text,
                line: Line::new(anchor, end),
                circle: Circle::new(anchor, ANNOTATION_CIRCLE_RADIUS),
                rect,
                vertical: !horizontal,
                tier,
                visible: tier.is_some_and(|t| t < usable),
            }
        })
        .collect()
}
