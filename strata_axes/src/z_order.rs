// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint order for guide marks.
//!
//! Marks carry an explicit `z_index`; renderers sort by `(z_index, MarkId)` for a deterministic
//! tie-break. The values are coarse so hosts can slot their own marks in between.

/// Axis baselines and tick marks, including tier and labelless ticks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;

/// Annotation connector lines.
pub const ANNOTATION_LINES: i32 = 50;
/// Annotation anchor circles.
pub const ANNOTATION_CIRCLES: i32 = 55;
/// Annotation label boxes.
pub const ANNOTATION_RECTS: i32 = 60;
/// Annotation label text, drawn over its box.
pub const ANNOTATION_LABELS: i32 = 65;
