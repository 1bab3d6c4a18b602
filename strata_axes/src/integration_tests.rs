// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::rc::Rc;
use alloc::vec::Vec;

use chrono::{NaiveDate, NaiveDateTime};
use kurbo::{Rect, Size};
use strata_scene::{MarkDiff, MarkId};
use strata_text::{CachedTextMeasurer, HeuristicTextMeasurer, TextStyle};

use crate::{
    AxisOrient, AxisStyle, ChartLayout, ChartLayoutSpec, Component, NumericAxis, Scale,
    ScaleLinear, ScaleTime, SharedScale, TimeAxis, TimeInterval, ids,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

fn ids_of(diffs: &[MarkDiff]) -> Vec<u64> {
    diffs.iter().map(|d| d.id().0).collect()
}

fn visible_annotation_parts(axis: &NumericAxis, group: u64) -> usize {
    let base = axis.axis().id_base() + group;
    axis.axis()
        .scene()
        .visible_marks()
        .iter()
        .filter(|m| m.id.0 >= base && m.id.0 < base + 100_000)
        .count()
}

#[test]
fn axes_around_a_plot_share_its_pixels() {
    let values = SharedScale::new(ScaleLinear::new((0.0, 100.0)));
    let dates = SharedScale::new(ScaleTime::new((day(2000, 1, 1), day(2000, 1, 8))));
    let mut left = NumericAxis::new(0, values.clone(), AxisOrient::Left);
    let mut bottom = TimeAxis::new(100_000_000, dates.clone(), AxisOrient::Bottom)
        .expect("bottom is horizontal");

    let view = Size::new(800.0, 400.0);
    let layout = ChartLayout::arrange(&ChartLayoutSpec {
        view_size: view,
        outer_padding: 10.0,
        axis_left: Some(left.requested_space(view.width, view.height).min_width),
        axis_bottom: Some(bottom.requested_space(view.width, view.height).min_height),
        ..ChartLayoutSpec::default()
    });
    left.compute_layout(layout.axis_left);
    bottom.compute_layout(layout.axis_bottom);

    let plot = layout.plot;
    let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
    let (top, zero) = values.with(|s| s.range());
    assert!(close(top, plot.height()) && zero == 0.0);
    let (zero, right) = dates.with(|s| s.range());
    assert!(zero == 0.0 && close(right, plot.width()));
    assert!(close(left.bounds().x1, plot.x0));
    assert_eq!(bottom.bounds().y0, plot.y1);

    let left_ids = ids_of(&left.render_if_needed());
    let bottom_ids = ids_of(&bottom.render_if_needed());
    assert!(left_ids.iter().all(|id| *id < 100_000_000));
    assert!(bottom_ids.iter().all(|id| *id >= 100_000_000));
    assert!(!left.needs_render() && !bottom.needs_render());

    // The bottom axis mark for January 4 sits where the plot maps it.
    let x = dates.with(|s| s.scale(day(2000, 1, 4)));
    let tick = bottom.axis().frame().tiers[0].tick_marks[3].line;
    assert!((tick.p0.x - x).abs() < 1e-9);
}

#[test]
fn a_scale_update_reaches_every_axis_on_it() {
    let scale = SharedScale::new(ScaleLinear::new((0.0, 10.0)));
    let mut bottom = NumericAxis::new(0, scale.clone(), AxisOrient::Bottom);
    let mut top = NumericAxis::new(10_000_000, scale.clone(), AxisOrient::Top);
    bottom.compute_layout(Some(Rect::new(0.0, 300.0, 500.0, 400.0)));
    top.compute_layout(Some(Rect::new(0.0, 0.0, 500.0, 100.0)));
    bottom.render_if_needed();
    top.render_if_needed();

    scale.update(|s| s.set_domain((0.0, 20.0)));
    assert!(bottom.needs_render() && top.needs_render());
    // Scale callbacks only schedule; nothing renders until asked.
    assert_eq!(bottom.axis().frame().tick_labels[1].text, "1");

    let diffs = bottom.render_if_needed();
    assert!(diffs.iter().all(|d| matches!(d, MarkDiff::Update { .. })));
    assert_eq!(bottom.axis().frame().tick_labels[1].text, "2");
    assert!(!top.render_if_needed().is_empty());
    assert!(bottom.render_if_needed().is_empty());
    assert!(top.render_if_needed().is_empty());

    drop(top);
    assert_eq!(scale.listener_count(), 1);
}

#[test]
fn annotations_collapse_repeats_and_keep_circles() {
    let scale = SharedScale::new(ScaleLinear::new((100.0, 200.0)));
    let mut axis = NumericAxis::new(0, scale, AxisOrient::Bottom);
    axis.axis_mut().set_margin(40.0).expect("valid margin");
    axis.axis_mut().set_annotations_enabled(true);
    axis.axis_mut()
        .set_annotated_ticks([Some(150.0), Some(150.0), Some(200.0)]);
    axis.compute_layout(Some(Rect::new(0.0, 0.0, 400.0, 200.0)));
    axis.render_if_needed();

    let annotations = &axis.axis().frame().annotations;
    assert_eq!(annotations.len(), 2);
    // "200" starts at the right edge and cannot be placed.
    assert_eq!(annotations[1].tier, None);
    assert_eq!(visible_annotation_parts(&axis, ids::ANNOTATION_CIRCLES), 2);
    assert_eq!(visible_annotation_parts(&axis, ids::ANNOTATION_RECTS), 1);
    assert_eq!(visible_annotation_parts(&axis, ids::ANNOTATION_LABELS), 1);
}

#[test]
fn annotation_tiers_are_capped_by_the_margin() {
    let scale = SharedScale::new(ScaleLinear::new((0.0, 100.0)));
    let mut axis = NumericAxis::new(0, scale, AxisOrient::Bottom);
    // 12 px text: tier height 16, so a 40 px margin holds two tiers.
    axis.axis_mut().set_margin(40.0).expect("valid margin");
    axis.axis_mut().set_annotations_enabled(true);
    axis.axis_mut().set_annotation_tier_count(10);
    axis.axis_mut()
        .set_annotated_ticks([Some(10.0), Some(11.0), Some(12.0), Some(13.0)]);
    let request = axis.requested_space(400.0, 400.0);
    axis.compute_layout(Some(Rect::new(0.0, 0.0, 400.0, request.min_height)));
    axis.render_if_needed();

    let annotations = &axis.axis().frame().annotations;
    let tiers: Vec<Option<usize>> = annotations.iter().map(|a| a.tier).collect();
    assert_eq!(tiers, [Some(0), Some(1), Some(2), Some(3)]);
    let visible: Vec<bool> = annotations.iter().map(|a| a.visible).collect();
    assert_eq!(visible, [true, true, false, false]);
    assert_eq!(visible_annotation_parts(&axis, ids::ANNOTATION_CIRCLES), 4);
}

#[test]
fn style_changes_drop_cached_measurements() {
    let measurer = Rc::new(CachedTextMeasurer::new(HeuristicTextMeasurer));
    let scale = SharedScale::new(ScaleLinear::new((0.0, 10.0)));
    let mut axis = NumericAxis::new(0, scale, AxisOrient::Left).with_measurer(measurer.clone());
    let narrow = axis.cross_size();
    assert!(measurer.cached_len() > 0);

    axis.axis_mut().set_style(AxisStyle {
        label_text: TextStyle::new(24.0),
        ..AxisStyle::default()
    });
    assert_eq!(measurer.cached_len(), 0);
    assert!(axis.cross_size() > narrow);
}

#[test]
fn time_axis_follows_domain_changes() {
    let dates = SharedScale::new(ScaleTime::new((day(2000, 1, 1), day(2000, 1, 8))));
    let mut axis = TimeAxis::new(0, dates.clone(), AxisOrient::Bottom).expect("horizontal");
    axis.compute_layout(Some(Rect::new(0.0, 0.0, 700.0, 100.0)));
    axis.render_if_needed();
    let week = axis.current_configuration_index();

    dates.update(|s| s.set_domain((day(1900, 1, 1), day(2000, 1, 1))));
    assert!(axis.needs_render());
    axis.render_if_needed();
    assert!(axis.current_configuration_index() > week);
    let first = axis
        .current_configuration()
        .and_then(|c| c.first())
        .map(|t| t.interval);
    assert_eq!(first, Some(TimeInterval::Year));
    assert!(axis.axis().scene().get(MarkId(ids::tier_base(0))).is_some());
}
