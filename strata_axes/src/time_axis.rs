// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A horizontal time axis with stacked label tiers.
//!
//! The axis holds a list of candidate [`TimeAxisConfiguration`]s ordered from most to least
//! precise. Each render picks the first one whose every tier passes the precision ceiling and
//! has room for its widest label between two ticks, then draws one tier per entry, stacked
//! outward from the plot.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use chrono::NaiveDateTime;
use kurbo::{Line, Point, Rect, Size};
use smallvec::{SmallVec, smallvec};
use strata_scene::{MarkDiff, TextAnchor, TextBaseline};
use strata_text::TextMeasurer;

use crate::axis::{Axis, AxisOrient, AxisStyle};
use crate::diagnostics::{AxisWarning, Diagnostics};
use crate::error::AxisError;
use crate::format::{self, Formatter};
use crate::frame::{Tier, TickLabel, TickMark};
use crate::layout::{Component, SpaceRequest};
use crate::overlap::suppress_overlapping_labels;
use crate::scale::Scale;
use crate::shared_scale::SharedScale;
use crate::time::{ScaleTime, TimeInterval, long_label_probe};

/// Default gap between tick marks and labels on a time axis.
pub const DEFAULT_TIME_TICK_LABEL_PADDING: f64 = 5.0;
/// Most tiers a configuration may have.
pub const MAX_TIERS: usize = 2;

/// One tier of a time axis: ticks every `step` units of `interval`, labeled by `formatter`.
#[derive(Clone)]
pub struct TierConfiguration {
    /// Calendar unit of the ticks.
    pub interval: TimeInterval,
    /// Number of units between ticks. Never zero.
    pub step: u32,
    /// Label formatter.
    pub formatter: Formatter<NaiveDateTime>,
}

impl TierConfiguration {
    /// Creates a tier configuration.
    pub fn new(interval: TimeInterval, step: u32, formatter: Formatter<NaiveDateTime>) -> Self {
        Self {
            interval,
            step,
            formatter,
        }
    }

    /// Creates a tier configuration labeled with a strftime-style `pattern`.
    pub fn with_pattern(interval: TimeInterval, step: u32, pattern: &'static str) -> Self {
        Self::new(interval, step, format::time(pattern))
    }
}

impl fmt::Debug for TierConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TierConfiguration")
            .field("interval", &self.interval)
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

/// The tiers of one candidate configuration, innermost first.
pub type TimeAxisConfiguration = SmallVec<[TierConfiguration; MAX_TIERS]>;

/// Where a tier places its labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TierLabelPosition {
    /// Between consecutive ticks (for single-unit steps), with ticks spanning the whole tier.
    #[default]
    Between,
    /// Centered on the ticks, below short tick marks.
    Center,
}

impl TierLabelPosition {
    /// Returns the lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Between => "between",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for TierLabelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierLabelPosition {
    type Err = AxisError;

    /// Parses exactly `between` or `center`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "between" => Ok(Self::Between),
            "center" => Ok(Self::Center),
            _ => Err(AxisError::UnknownTierLabelPosition(String::from(s))),
        }
    }
}

/// The built-in candidate list, most precise first.
pub fn default_configurations() -> Vec<TimeAxisConfiguration> {
    use TimeInterval::{Day, Hour, Minute, Month, Second, Year};

    let tiers = |inner: (TimeInterval, u32, &'static str), outer: (TimeInterval, u32, &'static str)| {
        let config: TimeAxisConfiguration = smallvec![
            TierConfiguration::with_pattern(inner.0, inner.1, inner.2),
            TierConfiguration::with_pattern(outer.0, outer.1, outer.2),
        ];
        config
    };
    let full_date = (Day, 1, "%B %e, %Y");
    let month_year = (Month, 1, "%B %Y");
    let year = (Year, 1, "%Y");

    let mut out = Vec::new();
    for step in [1, 5, 10, 15, 30] {
        out.push(tiers((Second, step, "%I:%M:%S %p"), full_date));
    }
    for step in [1, 5, 10, 15, 30] {
        out.push(tiers((Minute, step, "%I:%M %p"), full_date));
    }
    for step in [1, 3, 6, 12] {
        out.push(tiers((Hour, step, "%I %p"), full_date));
    }
    out.push(tiers((Day, 1, "%a %e"), month_year));
    out.push(tiers((Day, 1, "%e"), month_year));
    out.push(tiers((Month, 1, "%B"), year));
    out.push(tiers((Month, 1, "%b"), year));
    out.push(tiers((Month, 3, "%b"), year));
    out.push(tiers((Month, 6, "%b"), year));
    out.push(tiers((Year, 1, "%Y"), (Year, 10, "%Y")));
    out.push(tiers((Year, 1, "%y"), (Year, 10, "%Y")));
    for (inner, outer) in [
        (5, 50),
        (25, 100),
        (50, 500),
        (100, 1000),
        (200, 1000),
        (500, 5000),
        (1000, 10000),
    ] {
        out.push(tiers((Year, inner, "%Y"), (Year, outer, "%Y")));
    }
    out
}

fn validate(configurations: &[TimeAxisConfiguration]) -> Result<(), AxisError> {
    if configurations.is_empty() {
        return Err(AxisError::InvalidConfigurations("the candidate list is empty"));
    }
    for config in configurations {
        if config.is_empty() || config.len() > MAX_TIERS {
            return Err(AxisError::InvalidConfigurations(
                "a configuration must have one or two tiers",
            ));
        }
        if config.iter().any(|tier| tier.step == 0) {
            return Err(AxisError::InvalidConfigurations("tier steps must be positive"));
        }
    }
    Ok(())
}

fn tier_count(configurations: &[TimeAxisConfiguration]) -> usize {
    configurations.iter().map(SmallVec::len).max().unwrap_or(0)
}

/// A horizontal axis over a [`ScaleTime`] with up to two stacked label tiers.
#[derive(Debug)]
pub struct TimeAxis {
    axis: Axis<ScaleTime>,
    configurations: Vec<TimeAxisConfiguration>,
    tier_label_positions: Vec<TierLabelPosition>,
    max_precision: Option<TimeInterval>,
    current: usize,
}

impl TimeAxis {
    /// Creates a time axis with the default candidate configurations.
    ///
    /// Only `Top` and `Bottom` are accepted.
    pub fn new(
        id_base: u64,
        scale: SharedScale<ScaleTime>,
        orientation: AxisOrient,
    ) -> Result<Self, AxisError> {
        let mut axis = Axis::new_horizontal(id_base, scale, orientation)?;
        axis.set_tick_label_padding(DEFAULT_TIME_TICK_LABEL_PADDING)?;
        let configurations = default_configurations();
        Ok(Self {
            axis,
            tier_label_positions: vec![TierLabelPosition::Between; tier_count(&configurations)],
            configurations,
            max_precision: None,
            current: 0,
        })
    }

    /// Sets the text measurer used for label layout.
    pub fn with_measurer(self, measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            axis: self.axis.with_measurer(measurer),
            ..self
        }
    }

    /// Sets the sink for the zoomed-out warning.
    pub fn with_diagnostics(self, diagnostics: Rc<dyn Diagnostics>) -> Self {
        Self {
            axis: self.axis.with_diagnostics(diagnostics),
            ..self
        }
    }

    /// Sets the paint and text styles.
    pub fn with_style(self, style: AxisStyle) -> Self {
        Self {
            axis: self.axis.with_style(style),
            ..self
        }
    }

    /// The underlying axis, for the shared getters.
    pub fn axis(&self) -> &Axis<ScaleTime> {
        &self.axis
    }

    /// The underlying axis, for the shared setters. Vertical orientations stay rejected.
    pub fn axis_mut(&mut self) -> &mut Axis<ScaleTime> {
        &mut self.axis
    }

    /// Moves the axis above or below the plot. Vertical orientations are rejected.
    pub fn set_orientation(&mut self, orientation: AxisOrient) -> Result<(), AxisError> {
        self.axis.set_orientation(orientation)
    }

    /// The candidate configurations, most precise first.
    pub fn axis_configurations(&self) -> &[TimeAxisConfiguration] {
        &self.configurations
    }

    /// Replaces the candidate configurations.
    ///
    /// The list must be non-empty, every configuration must have one or two tiers, and every
    /// step must be positive. Tier label positions are kept for tiers that still exist; new
    /// tiers start out [`TierLabelPosition::Between`].
    pub fn set_axis_configurations(
        &mut self,
        configurations: Vec<TimeAxisConfiguration>,
    ) -> Result<(), AxisError> {
        validate(&configurations)?;
        let tiers = tier_count(&configurations);
        self.tier_label_positions
            .resize(tiers, TierLabelPosition::Between);
        self.configurations = configurations;
        self.current = 0;
        self.axis.redraw();
        Ok(())
    }

    /// Label position of every tier.
    pub fn tier_label_positions(&self) -> &[TierLabelPosition] {
        &self.tier_label_positions
    }

    /// Sets the label position of every tier. Missing entries default to `Between`.
    pub fn set_tier_label_positions(&mut self, positions: Vec<TierLabelPosition>) {
        self.tier_label_positions = positions;
        self.axis.redraw();
    }

    /// Like [`TimeAxis::set_tier_label_positions`], parsing `"between"` and `"center"`.
    pub fn set_tier_label_positions_str(&mut self, positions: &[&str]) -> Result<(), AxisError> {
        let parsed = positions
            .iter()
            .map(|p| p.parse())
            .collect::<Result<Vec<_>, _>>()?;
        self.set_tier_label_positions(parsed);
        Ok(())
    }

    /// The most precise interval a tier may use, if limited.
    pub fn max_time_interval_precision(&self) -> Option<TimeInterval> {
        self.max_precision
    }

    /// Limits tiers to `precision` or coarser. `None` lifts the limit.
    pub fn set_max_time_interval_precision(&mut self, precision: Option<TimeInterval>) {
        self.max_precision = precision;
        self.axis.redraw();
    }

    /// Like [`TimeAxis::set_max_time_interval_precision`], parsing an interval name such as
    /// `"day"`.
    pub fn set_max_time_interval_precision_str(&mut self, precision: &str) -> Result<(), AxisError> {
        self.set_max_time_interval_precision(Some(precision.parse()?));
        Ok(())
    }

    /// Index of the configuration chosen by the last render.
    pub fn current_configuration_index(&self) -> usize {
        self.current
    }

    /// The configuration chosen by the last render.
    pub fn current_configuration(&self) -> Option<&TimeAxisConfiguration> {
        self.configurations.get(self.current)
    }

    /// Depth of each tier: a label line, the padding and, for centered labels, the ticks.
    pub fn tier_heights(&self) -> Vec<f64> {
        let line = self.axis.label_line_height();
        let padding = self.axis.tick_label_padding();
        let ticks = self.axis.max_label_tick_length();
        (0..tier_count(&self.configurations))
            .map(|i| match self.label_position(i) {
                TierLabelPosition::Between => line + padding,
                TierLabelPosition::Center => line + padding + ticks,
            })
            .collect()
    }

    /// Total depth of the tiers.
    pub fn cross_size(&self) -> f64 {
        self.axis
            .render_state()
            .cross_size
            .get_or_init(|| self.tier_heights().iter().sum())
    }

    fn label_position(&self, tier: usize) -> TierLabelPosition {
        self.tier_label_positions
            .get(tier)
            .copied()
            .unwrap_or_default()
    }

    /// Pixel distance covered by one step of `tier`, or the axis width when a single step
    /// overshoots the domain.
    fn interval_length(&self, tier: &TierConfiguration) -> f64 {
        let width = self.axis.size().width;
        self.axis.scale().with(|s| {
            let (start, end) = s.extent();
            match tier.interval.offset(start, i64::from(tier.step)) {
                Some(next) if next <= end => (s.scale(next) - s.scale(start)).abs(),
                _ => width,
            }
        })
    }

    fn tier_fits(&self, tier: &TierConfiguration) -> bool {
        if self.max_precision.is_some_and(|ceiling| tier.interval < ceiling) {
            return false;
        }
        let widest = self
            .axis
            .measure_label(&(tier.formatter)(&long_label_probe()))
            .width
            + 2.0 * self.axis.tick_label_padding();
        self.interval_length(tier).min(self.axis.size().width) >= widest
    }

    fn most_precise_configuration_index(&self) -> usize {
        let found = self
            .configurations
            .iter()
            .position(|config| config.iter().all(|tier| self.tier_fits(tier)));
        match found {
            Some(index) => {
                log::debug!("time axis uses configuration {index}");
                index
            }
            None => {
                self.axis.diagnostics().warn(&AxisWarning::ZoomedOutTooFar {
                    configurations: self.configurations.len(),
                });
                self.configurations.len().saturating_sub(1)
            }
        }
    }

    /// Tick dates of `tier`, always including both domain ends.
    fn tier_ticks(&self, tier: &TierConfiguration) -> Vec<NaiveDateTime> {
        self.axis.scale().with(|s| {
            let mut ticks = s.tick_interval(tier.interval, tier.step);
            let (d0, d1) = s.domain();
            if !ticks.contains(&d0) {
                ticks.insert(0, d0);
            }
            if !ticks.contains(&d1) {
                ticks.push(d1);
            }
            ticks
        })
    }

    fn render_tier(
        &self,
        index: usize,
        tier: &TierConfiguration,
        offset: f64,
        height: f64,
        size: Size,
    ) -> Tier {
        let position = self.label_position(index);
        let padding = self.axis.tick_label_padding();
        let max_tick = self.axis.max_label_tick_length();
        let bottom = self.axis.orientation() == AxisOrient::Bottom;
        // Distance from the box's top edge for a depth measured outward from the plot.
        let y = |depth: f64| if bottom { depth } else { size.height - depth };

        let ticks = self.tier_ticks(tier);
        let last = ticks.len().saturating_sub(1);
        let between = position == TierLabelPosition::Between && tier.step == 1;
        let label_dates: Vec<NaiveDateTime> = if between {
            ticks
                .windows(2)
                .map(|w| w[0] + w[1].signed_duration_since(w[0]) / 2)
                .collect()
        } else {
            ticks.clone()
        };

        let (tick_marks, label_xs) = self.axis.scale().with(|s| {
            let marks: Vec<TickMark> = ticks
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let x = s.scale(*t);
                    let is_end = i == 0 || i == last;
                    let length = match position {
                        TierLabelPosition::Between => height,
                        TierLabelPosition::Center if is_end => self.axis.end_tick_length(),
                        TierLabelPosition::Center => self.axis.inner_tick_length(),
                    };
                    TickMark {
                        line: Line::new((x, y(offset)), (x, y(offset + length))),
                        is_end,
                        visible: true,
                    }
                })
                .collect();
            let xs: Vec<f64> = label_dates.iter().map(|d| s.scale(*d)).collect();
            (marks, xs)
        });

        let centered = position == TierLabelPosition::Center || tier.step == 1;
        let (x_shift, anchor) = if centered {
            (0.0, TextAnchor::Middle)
        } else {
            (padding, TextAnchor::Start)
        };
        // Padding separates a label from the tier edge, or from the ticks in a centered tier.
        let drop = if position == TierLabelPosition::Center {
            max_tick
        } else {
            0.0
        };
        let label_y = if bottom {
            offset + padding + drop + self.axis.label_line_height()
        } else {
            size.height - offset - padding - drop
        };
        let mut labels: Vec<TickLabel> = label_dates
            .iter()
            .zip(label_xs)
            .map(|(date, x)| {
                let text = (tier.formatter)(date);
                let text_size = self.axis.measure_label(&text);
                TickLabel::new(
                    text,
                    Point::new(x + x_shift, label_y),
                    anchor,
                    TextBaseline::Alphabetic,
                    text_size,
                )
            })
            .collect();

        let tick_rects: Vec<Rect> = tick_marks
            .iter()
            .map(|m| Rect::from_points(m.line.p0, m.line.p1))
            .collect();
        suppress_overlapping_labels(
            &mut labels,
            &tick_rects,
            Rect::from_origin_size(Point::ZERO, size),
            false,
        );

        Tier {
            index,
            baseline: Line::new((0.0, y(offset)), (size.width, y(offset))),
            tick_marks,
            labels,
            visible: true,
        }
    }

    /// Short unlabeled ticks from the next more precise configuration, drawn when the chosen
    /// configuration's innermost tier shows about one interval across the whole axis.
    fn labelless_ticks(&self, size: Size) -> Vec<TickMark> {
        let Some(first) = self
            .configurations
            .get(self.current)
            .and_then(|config| config.first())
        else {
            return Vec::new();
        };
        if self.current == 0 || self.interval_length(first) * 1.5 < size.width {
            return Vec::new();
        }
        let Some(finer) = self
            .configurations
            .get(self.current - 1)
            .and_then(|config| config.first())
        else {
            return Vec::new();
        };
        let padding = self.axis.tick_label_padding();
        let (y0, y1) = if self.axis.orientation() == AxisOrient::Bottom {
            (0.0, padding)
        } else {
            (size.height, size.height - padding)
        };
        self.axis.scale().with(|s| {
            s.tick_interval(finer.interval, finer.step)
                .into_iter()
                .map(|t| {
                    let x = s.scale(t);
                    TickMark {
                        line: Line::new((x, y0), (x, y1)),
                        is_end: false,
                        visible: true,
                    }
                })
                .collect()
        })
    }
}

impl Component for TimeAxis {
    fn requested_space(&self, _offered_width: f64, _offered_height: f64) -> SpaceRequest {
        self.axis.requested_space_for(self.cross_size())
    }

    fn fixed_width(&self) -> bool {
        false
    }

    fn fixed_height(&self) -> bool {
        true
    }

    /// Takes the offered width and only as many whole tiers as fit in the offered height, plus
    /// the margin and any annotation tiers.
    fn size_from_offer(&self, available_width: f64, available_height: f64) -> Size {
        let request = self.requested_space(available_width, available_height);
        let height = available_height.min(request.min_height).max(0.0);
        let heights = self.tier_heights();
        let tiers = heights
            .iter()
            .skip(1)
            .fold(heights.first().copied().unwrap_or(0.0), |acc, h| {
                if acc + h <= height { acc + h } else { acc }
            });
        let annotations = if self.axis.annotations_enabled() {
            self.axis.annotation_tier_count() as f64 * self.axis.annotation_tier_height()
        } else {
            0.0
        };
        let height = height.min(tiers + self.axis.margin() + annotations);
        Size::new(available_width.max(0.0), height)
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
        self.current = self.most_precise_configuration_index();
        let Some(config) = self.configurations.get(self.current).cloned() else {
            return Vec::new();
        };
        let mut frame = self.axis.base_frame(&[], self.cross_size());
        let size = frame.size;
        frame.tick_marks = self.labelless_ticks(size);

        let heights = self.tier_heights();
        let mut offset = 0.0;
        for (index, tier) in config.iter().enumerate() {
            let height = heights.get(index).copied().unwrap_or(0.0);
            let mut rendered = self.render_tier(index, tier, offset, height, size);
            offset += height;
            if offset > size.height {
                rendered.visible = false;
                rendered.labels.iter_mut().for_each(|l| l.visible = false);
                rendered.tick_marks.iter_mut().for_each(|m| m.visible = false);
            }
            frame.tiers.push(rendered);
        }
        self.axis.commit(frame)
    }

    fn needs_render(&self) -> bool {
        self.axis.needs_render()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use chrono::NaiveDate;

    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::frame::ids;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn time_axis(from: NaiveDateTime, to: NaiveDateTime) -> TimeAxis {
        TimeAxis::new(
            0,
            SharedScale::new(ScaleTime::new((from, to))),
            AxisOrient::Bottom,
        )
        .unwrap()
    }

    fn laid_out(axis: &mut TimeAxis, width: f64, height: f64) {
        axis.compute_layout(Some(Rect::new(0.0, 0.0, width, height)));
        axis.render_immediately();
    }

    fn intervals(axis: &TimeAxis) -> Vec<(TimeInterval, u32)> {
        axis.current_configuration()
            .unwrap()
            .iter()
            .map(|t| (t.interval, t.step))
            .collect()
    }

    fn tier_texts(axis: &TimeAxis, tier: usize) -> Vec<String> {
        axis.axis().frame().tiers[tier]
            .labels
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.text.clone())
            .collect()
    }

    #[test]
    fn vertical_orientations_are_rejected() {
        let scale = SharedScale::new(ScaleTime::new((day(2000, 1, 1), day(2001, 1, 1))));
        assert_eq!(
            TimeAxis::new(0, scale.clone(), AxisOrient::Left).unwrap_err(),
            AxisError::UnsupportedOrientation(AxisOrient::Left)
        );
        let mut axis = TimeAxis::new(0, scale, AxisOrient::Bottom).unwrap();
        assert!(axis.set_orientation(AxisOrient::Right).is_err());
        assert!(axis.axis_mut().set_orientation_str("left").is_err());
        assert_eq!(axis.axis().orientation(), AxisOrient::Bottom);
        axis.set_orientation(AxisOrient::Top).unwrap();
        assert_eq!(axis.axis().orientation(), AxisOrient::Top);
    }

    #[test]
    fn defaults() {
        let axis = time_axis(day(2000, 1, 1), day(2001, 1, 1));
        assert_eq!(axis.axis().tick_label_padding(), 5.0);
        assert_eq!(axis.axis().margin(), 15.0);
        assert_eq!(axis.tier_label_positions(), [TierLabelPosition::Between; 2]);
        assert_eq!(axis.max_time_interval_precision(), None);
        assert!(axis.axis_configurations().iter().all(|c| c.len() == 2));
    }

    #[test]
    fn tier_label_positions_parse_strictly() {
        assert_eq!(
            "center".parse::<TierLabelPosition>(),
            Ok(TierLabelPosition::Center)
        );
        assert_eq!(TierLabelPosition::Between.to_string(), "between");
        let mut axis = time_axis(day(2000, 1, 1), day(2001, 1, 1));
        assert_eq!(
            axis.set_tier_label_positions_str(&["center", "Between"]),
            Err(AxisError::UnknownTierLabelPosition("Between".into()))
        );
        assert_eq!(axis.tier_label_positions(), [TierLabelPosition::Between; 2]);
        axis.set_tier_label_positions_str(&["center", "between"]).unwrap();
        assert_eq!(axis.tier_label_positions()[0], TierLabelPosition::Center);
    }

    #[test]
    fn malformed_configurations_are_rejected() {
        let mut axis = time_axis(day(2000, 1, 1), day(2001, 1, 1));
        let year = || TierConfiguration::with_pattern(TimeInterval::Year, 1, "%Y");
        assert!(axis.set_axis_configurations(Vec::new()).is_err());
        assert!(
            axis.set_axis_configurations(vec![smallvec![year(), year(), year()]])
                .is_err()
        );
        let zero = TierConfiguration::with_pattern(TimeInterval::Month, 0, "%b");
        assert!(axis.set_axis_configurations(vec![smallvec![zero]]).is_err());
        assert_eq!(axis.axis_configurations().len(), default_configurations().len());

        axis.set_tier_label_positions(vec![TierLabelPosition::Center; 2]);
        axis.set_axis_configurations(vec![smallvec![year()]]).unwrap();
        assert_eq!(axis.tier_label_positions(), [TierLabelPosition::Center]);
        axis.set_axis_configurations(default_configurations()).unwrap();
        assert_eq!(
            axis.tier_label_positions(),
            [TierLabelPosition::Center, TierLabelPosition::Between]
        );
    }

    #[test]
    fn tier_heights_add_ticks_for_centered_labels() {
        let mut axis = time_axis(day(2000, 1, 1), day(2001, 1, 1));
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        let heights = axis.tier_heights();
        assert!(close(heights[0], 17.0) && close(heights[1], 17.0));
        assert!(close(axis.requested_space(0.0, 0.0).min_height, 34.0 + 15.0));

        axis.set_tier_label_positions(vec![TierLabelPosition::Center]);
        let heights = axis.tier_heights();
        assert!(close(heights[0], 22.0) && close(heights[1], 17.0));
    }

    #[test]
    fn size_from_offer_drops_tiers_that_do_not_fit() {
        let axis = time_axis(day(2000, 1, 1), day(2001, 1, 1));
        let roomy = axis.size_from_offer(300.0, 200.0);
        assert!((roomy.height - 49.0).abs() < 1e-9);
        // 30 px holds one 17 px tier; the margin fills the rest.
        let tight = axis.size_from_offer(300.0, 30.0);
        assert_eq!(tight.height, 30.0);
        assert_eq!(tight.width, 300.0);
    }

    #[test]
    fn picks_the_most_precise_configuration_that_fits() {
        let mut axis = time_axis(day(2000, 1, 1), day(2100, 1, 1));
        // A second is 0.03 px wide, an hour 114 px: "12 PM" needs 46 px.
        laid_out(&mut axis, 1e8, 100.0);
        assert_eq!(
            intervals(&axis),
            [(TimeInterval::Hour, 1), (TimeInterval::Day, 1)]
        );
        assert_eq!(axis.current_configuration_index(), 10);

        assert!(axis.set_max_time_interval_precision_str("fortnight").is_err());
        assert_eq!(axis.max_time_interval_precision(), None);
        axis.set_max_time_interval_precision_str("Day").unwrap();
        assert_eq!(axis.max_time_interval_precision(), Some(TimeInterval::Day));
        axis.render_immediately();
        assert_eq!(
            intervals(&axis),
            [(TimeInterval::Day, 1), (TimeInterval::Month, 1)]
        );
    }

    #[test]
    fn zooming_out_moves_to_coarser_configurations() {
        let mut axis = time_axis(day(2000, 1, 1), day(2100, 1, 1));
        // Four pixels per year: 25 years leave room for "9999" plus padding.
        laid_out(&mut axis, 400.0, 100.0);
        assert_eq!(
            intervals(&axis),
            [(TimeInterval::Year, 25), (TimeInterval::Year, 100)]
        );
    }

    #[test]
    fn nothing_fits_falls_back_to_the_last_configuration() {
        let diagnostics = Rc::new(RecordingDiagnostics::new());
        let mut axis = time_axis(day(2000, 1, 1), day(2100, 1, 1))
            .with_diagnostics(diagnostics.clone());
        laid_out(&mut axis, 30.0, 100.0);
        let count = default_configurations().len();
        assert_eq!(axis.current_configuration_index(), count - 1);
        assert_eq!(
            diagnostics.take(),
            [AxisWarning::ZoomedOutTooFar {
                configurations: count
            }]
        );
        // The fallback still renders.
        assert_eq!(axis.axis().frame().tiers.len(), 2);
    }

    #[test]
    fn a_week_of_days_with_the_month_below() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 8));
        laid_out(&mut axis, 700.0, 100.0);
        assert_eq!(
            intervals(&axis),
            [(TimeInterval::Day, 1), (TimeInterval::Month, 1)]
        );
        let frame = axis.axis().frame();
        assert!((frame.size.height - 49.0).abs() < 1e-9);
        assert!(frame.tick_marks.is_empty());

        let days = &frame.tiers[0];
        assert_eq!(days.tick_marks.len(), 8);
        assert_eq!(days.labels.len(), 7);
        assert_eq!(
            tier_texts(&axis, 0),
            ["Sat  1", "Sun  2", "Mon  3", "Tue  4", "Wed  5", "Thu  6", "Fri  7"]
        );
        // Labels sit between the ticks, padded away from the plot edge.
        assert!((days.labels[0].anchor.x - 50.0).abs() < 1e-9);
        assert!((days.labels[0].anchor.y - 17.0).abs() < 1e-9);
        assert!((days.labels[0].bounds.y0 - 5.0).abs() < 1e-9);
        assert_eq!(days.labels[0].baseline, TextBaseline::Alphabetic);
        // Ticks span the whole tier.
        assert!((days.tick_marks[1].line.p1.y - 17.0).abs() < 1e-9);

        let months = &frame.tiers[1];
        assert!(months.visible);
        assert!((months.baseline.p0.y - 17.0).abs() < 1e-9);
        assert_eq!(tier_texts(&axis, 1), ["January 2000"]);
    }

    #[test]
    fn outer_tier_is_hidden_when_it_does_not_fit() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 8));
        laid_out(&mut axis, 700.0, 30.0);
        let frame = axis.axis().frame();
        assert!(frame.tiers[0].visible);
        assert!(!frame.tiers[1].visible);
        assert!(frame.tiers[1].labels.iter().all(|l| !l.visible));
        let tier_base = ids::tier_base(1);
        assert!(
            axis.axis()
                .scene()
                .visible_marks()
                .iter()
                .all(|m| m.id.0 < tier_base)
        );
    }

    #[test]
    fn top_tiers_grow_upward() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 8));
        axis.set_orientation(AxisOrient::Top).unwrap();
        laid_out(&mut axis, 700.0, 100.0);
        let frame = axis.axis().frame();
        let h = frame.size.height;
        let days = &frame.tiers[0];
        assert_eq!(days.tick_marks[0].line.p0.y, h);
        assert!((days.tick_marks[0].line.p1.y - (h - 17.0)).abs() < 1e-9);
        assert!((days.labels[0].anchor.y - (h - 5.0)).abs() < 1e-9);
        assert!((frame.tiers[1].baseline.p0.y - (h - 17.0)).abs() < 1e-9);
    }

    #[test]
    fn centered_labels_sit_on_short_ticks() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 8));
        axis.set_tier_label_positions(vec![TierLabelPosition::Center, TierLabelPosition::Center]);
        laid_out(&mut axis, 700.0, 100.0);
        let days = &axis.axis().frame().tiers[0];
        assert_eq!(days.labels.len(), 8);
        assert!((days.labels[1].anchor.x - 100.0).abs() < 1e-9);
        assert_eq!(days.labels[1].text_anchor, TextAnchor::Middle);
        assert!((days.tick_marks[1].line.p1.y - 5.0).abs() < 1e-9);
        // The first and last labels are centered on the box edges and cut off.
        let visible: Vec<bool> = days.labels.iter().map(|l| l.visible).collect();
        assert_eq!(visible, [false, true, true, true, true, true, true, false]);
        assert_eq!(
            tier_texts(&axis, 0),
            ["Sun  2", "Mon  3", "Tue  4", "Wed  5", "Thu  6", "Fri  7"]
        );
    }

    #[test]
    fn centered_labels_keep_the_padding_from_their_ticks_on_both_edges() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 8));
        axis.set_tier_label_positions(vec![TierLabelPosition::Center, TierLabelPosition::Center]);
        laid_out(&mut axis, 700.0, 100.0);
        let days = &axis.axis().frame().tiers[0];
        let below = days.labels[1].bounds.y0 - days.tick_marks[1].line.p1.y;

        axis.set_orientation(AxisOrient::Top).unwrap();
        laid_out(&mut axis, 700.0, 100.0);
        let days = &axis.axis().frame().tiers[0];
        let above = days.tick_marks[1].line.p1.y - days.labels[1].bounds.y1;

        assert!((below - 5.0).abs() < 1e-9);
        assert!((above - below).abs() < 1e-9);
        assert!(days.labels[1].visible);
    }

    #[test]
    fn labels_running_into_the_next_tick_are_hidden() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 9));
        // Every other day at 50 px a day: 100 px between ticks.
        axis.set_axis_configurations(vec![smallvec![TierConfiguration::with_pattern(
            TimeInterval::Day,
            2,
            "%A %e %b",
        )]])
        .unwrap();
        laid_out(&mut axis, 400.0, 100.0);
        let days = &axis.axis().frame().tiers[0];
        assert_eq!(days.tick_marks.len(), 5);
        assert_eq!(days.labels.len(), 5);
        // Start-anchored labels begin 5 px past their tick. "Saturday  1 Jan" and
        // "Wednesday  5 Jan" cross the next tick, and "Sunday  9 Jan" leaves the box.
        assert_eq!(tier_texts(&axis, 0), ["Monday  3 Jan", "Friday  7 Jan"]);
        assert_eq!(days.labels[0].text_anchor, TextAnchor::Start);
        assert!((days.labels[1].anchor.x - 105.0).abs() < 1e-9);
    }

    #[test]
    fn coarse_selection_adds_labelless_ticks() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 3));
        // A day is 50 px, too narrow for any day configuration's widest label, so the first
        // configuration that fits is the month-name one, whose interval spans the whole axis.
        laid_out(&mut axis, 100.0, 100.0);
        assert_eq!(
            intervals(&axis),
            [(TimeInterval::Month, 1), (TimeInterval::Year, 1)]
        );
        let frame = axis.axis().frame();
        assert_eq!(frame.tick_marks.len(), 3);
        assert_eq!(frame.tick_marks[1].line, Line::new((50.0, 0.0), (50.0, 5.0)));
        assert_eq!(tier_texts(&axis, 0), ["January"]);
    }

    #[test]
    fn rerender_is_stable() {
        let mut axis = time_axis(day(2000, 1, 1), day(2000, 1, 8));
        laid_out(&mut axis, 700.0, 100.0);
        let count = axis.axis().scene().len();
        assert!(axis.render_immediately().is_empty());
        assert_eq!(axis.axis().scene().len(), count);
        assert!(!axis.needs_render());
    }
}
