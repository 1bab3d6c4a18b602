// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis layout and tick rendering for `strata_scene`.
//!
//! This crate turns scales into positioned axis geometry:
//! - **Scales** ([`ScaleLinear`], [`ScaleTime`]) map values to pixels and are shared between
//!   axes through [`SharedScale`], which notifies subscribers on change.
//! - **Axes** ([`Axis`], [`NumericAxis`], [`TimeAxis`]) answer layout queries through the
//!   [`Component`] protocol, then render tick marks, labels, a baseline and annotations into a
//!   retained [`strata_scene::Scene`].
//! - **Time axes** pick, on every render, the most precise multi-tier label configuration that
//!   fits the granted width.
//!
//! Text is measured through [`strata_text::TextMeasurer`]; rendering warnings go to an injected
//! [`Diagnostics`] sink.

#![no_std]

extern crate alloc;

mod annotation;
mod axis;
mod diagnostics;
mod error;
#[cfg(not(feature = "std"))]
mod float;
pub mod format;
mod frame;
#[cfg(test)]
mod integration_tests;
mod layout;
mod memo;
mod numeric_axis;
mod overlap;
mod scale;
mod shared_scale;
mod time;
mod time_axis;
pub mod z_order;

pub use annotation::{ANNOTATION_CIRCLE_RADIUS, ANNOTATION_LABEL_PADDING};
pub use axis::{
    Axis, AxisOrient, AxisStyle, DEFAULT_MARGIN, DEFAULT_TICK_LABEL_PADDING, DEFAULT_TICK_LENGTH,
    StrokeStyle,
};
pub use diagnostics::{AxisWarning, Diagnostics, LogDiagnostics, NoopDiagnostics, RecordingDiagnostics};
pub use error::AxisError;
pub use format::Formatter;
pub use frame::{AnnotationMark, AxisFrame, TickLabel, TickMark, Tier, ids};
pub use layout::{
    ChartLayout, ChartLayoutSpec, Component, ComponentLayout, SpaceRequest, XAlignment,
    YAlignment,
};
pub use memo::Memo;
pub use numeric_axis::NumericAxis;
pub use scale::{Scale, ScaleLinear};
pub use shared_scale::{SharedScale, Subscription};
pub use time::{ScaleTime, TimeInterval};
pub use time_axis::{
    DEFAULT_TIME_TICK_LABEL_PADDING, MAX_TIERS, TierConfiguration, TierLabelPosition, TimeAxis,
    TimeAxisConfiguration, default_configurations,
};
