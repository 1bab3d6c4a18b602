// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An axis over a linear scale with formatted tick labels.

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use strata_scene::{MarkDiff, TextAnchor, TextBaseline};
use strata_text::TextMeasurer;

use crate::axis::{Axis, AxisOrient, AxisStyle};
use crate::error::AxisError;
use crate::format::Formatter;
use crate::frame::TickLabel;
use crate::layout::{Component, SpaceRequest};
use crate::overlap::suppress_overlapping_labels;
use crate::scale::{Scale, ScaleLinear};
use crate::shared_scale::SharedScale;

/// A numeric axis: tick marks from [`ScaleLinear::ticks`] with a label beyond each mark.
///
/// The cross dimension is measured from the labels (their line height on horizontal axes, the
/// widest label on vertical ones) and cached until the next setter call or scale update.
#[derive(Debug)]
pub struct NumericAxis {
    axis: Axis<ScaleLinear>,
}

impl NumericAxis {
    /// Creates a numeric axis on `scale`.
    pub fn new(id_base: u64, scale: SharedScale<ScaleLinear>, orientation: AxisOrient) -> Self {
        Self {
            axis: Axis::new(id_base, scale, orientation),
        }
    }

    /// Sets the text measurer used for label layout.
    pub fn with_measurer(self, measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            axis: self.axis.with_measurer(measurer),
        }
    }

    /// Sets the paint and text styles.
    pub fn with_style(self, style: AxisStyle) -> Self {
        Self {
            axis: self.axis.with_style(style),
        }
    }

    /// Sets the tick label formatter.
    pub fn with_formatter(self, formatter: Formatter<f64>) -> Self {
        Self {
            axis: self.axis.with_formatter(formatter),
        }
    }

    /// The underlying axis, for the shared getters.
    pub fn axis(&self) -> &Axis<ScaleLinear> {
        &self.axis
    }

    /// The underlying axis, for the shared setters.
    pub fn axis_mut(&mut self) -> &mut Axis<ScaleLinear> {
        &mut self.axis
    }

    /// Moves the axis to another side of the plot.
    pub fn set_orientation(&mut self, orientation: AxisOrient) -> Result<(), AxisError> {
        self.axis.set_orientation(orientation)
    }

    /// The tick values of the current domain, in domain order.
    pub fn tick_values(&self) -> Vec<f64> {
        self.axis.scale().with(Scale::ticks)
    }

    /// Depth of the axis core: the longest tick mark, the label padding and the labels.
    pub fn cross_size(&self) -> f64 {
        self.axis.render_state().cross_size.get_or_init(|| {
            let labels = if self.axis.is_horizontal() {
                self.axis.label_line_height()
            } else {
                self.tick_values()
                    .iter()
                    .map(|v| self.axis.measure_label(&self.axis.format(v)).width)
                    .fold(0.0, f64::max)
            };
            labels + self.axis.tick_label_padding() + self.axis.max_label_tick_length()
        })
    }

    fn label(&self, value: f64, position: f64) -> TickLabel {
        let text = self.axis.format(&value);
        let size = self.axis.measure_label(&text);
        let bounds = self.axis.size();
        let offset = self.axis.max_label_tick_length() + self.axis.tick_label_padding();
        let (anchor, text_anchor, baseline) = match self.axis.orientation() {
            AxisOrient::Bottom => (
                Point::new(position, offset),
                TextAnchor::Middle,
                TextBaseline::Hanging,
            ),
            AxisOrient::Top => (
                Point::new(position, bounds.height - offset),
                TextAnchor::Middle,
                TextBaseline::Alphabetic,
            ),
            AxisOrient::Left => (
                Point::new(bounds.width - offset, position),
                TextAnchor::End,
                TextBaseline::Middle,
            ),
            AxisOrient::Right => (
                Point::new(offset, position),
                TextAnchor::Start,
                TextBaseline::Middle,
            ),
        };
        TickLabel::new(text, anchor, text_anchor, baseline, size)
    }
}

impl Component for NumericAxis {
    fn requested_space(&self, _offered_width: f64, _offered_height: f64) -> SpaceRequest {
        self.axis.requested_space_for(self.cross_size())
    }

    fn fixed_width(&self) -> bool {
        self.axis.fixed_width()
    }

    fn fixed_height(&self) -> bool {
        self.axis.fixed_height()
    }

    fn compute_layout(&mut self, offer: Option<Rect>) {
        let Some(offer) = offer.or(self.axis.layout().offer) else {
            return;
        };
        let size = self.size_from_offer(offer.width(), offer.height());
        self.axis.apply_layout(offer, size);
    }

    fn bounds(&self) -> Rect {
        self.axis.bounds()
    }

    fn render_immediately(&mut self) -> Vec<MarkDiff> {
        let values = self.tick_values();
        let mut frame = self.axis.base_frame(&values, self.cross_size());
        let mut labels: Vec<TickLabel> = self.axis.scale().with(|s| {
            values
                .iter()
                .map(|v| self.label(*v, s.scale(*v)))
                .collect()
        });
        suppress_overlapping_labels(
            &mut labels,
            &[],
            Rect::from_origin_size(Point::ZERO, frame.size),
            self.axis.show_end_tick_labels(),
        );
        frame.tick_labels = labels;
        self.axis.commit(frame)
    }

    fn needs_render(&self) -> bool {
        self.axis.needs_render()
    }
}
