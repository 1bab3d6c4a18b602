// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lays out a numeric axis and a time axis around an empty plot, then zooms the time
//! scale out and re-renders, writing one SVG per state.
mod svg;

use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use kurbo::Size;
use strata_axes::{
    AxisOrient, ChartLayout, ChartLayoutSpec, Component, Diagnostics, NumericAxis,
    RecordingDiagnostics, ScaleLinear, ScaleTime, SharedScale, TierLabelPosition, TimeAxis,
};
use strata_text::TextMeasurer;

fn main() {
    let measurer = demo_measurer();
    let diagnostics = Rc::new(RecordingDiagnostics::new());

    let values = SharedScale::new(ScaleLinear::new((0.0, 250.0)));
    let dates = SharedScale::new(ScaleTime::new((
        midnight(2024, 3, 1),
        midnight(2024, 3, 15),
    )));

    let mut left = annotated_value_axis(values.clone(), measurer.clone());

    let mut bottom = TimeAxis::new(0x20_000_000, dates.clone(), AxisOrient::Bottom)
        .expect("bottom is a horizontal orientation")
        .with_measurer(measurer)
        .with_diagnostics(diagnostics.clone() as Rc<dyn Diagnostics>);
    bottom.set_tier_label_positions(vec![TierLabelPosition::Between, TierLabelPosition::Center]);

    let view = Size::new(720.0, 360.0);
    let layout = ChartLayout::arrange(&ChartLayoutSpec {
        view_size: view,
        outer_padding: 16.0,
        axis_left: Some(left.requested_space(view.width, view.height).min_width),
        axis_bottom: Some(bottom.requested_space(view.width, view.height).min_height),
        ..ChartLayoutSpec::default()
    });
    left.compute_layout(layout.axis_left);
    bottom.compute_layout(layout.axis_bottom);

    let mut svg_scene = svg::SvgScene::default();
    svg_scene.apply_diffs(&left.render_if_needed());
    svg_scene.apply_diffs(&bottom.render_if_needed());
    write_svg("strata_demo_days.svg", &svg_scene, &layout);

    // Zooming out only touches the time axis; the numeric axis has nothing to redraw.
    dates.update(|s| s.set_domain((midnight(1990, 1, 1), midnight(2024, 1, 1))));
    let diffs = bottom.render_if_needed();
    assert!(left.render_if_needed().is_empty());
    println!("zoom produced {} mark changes", diffs.len());
    svg_scene.apply_diffs(&diffs);
    write_svg("strata_demo_years.svg", &svg_scene, &layout);

    for warning in diagnostics.take() {
        println!("warning: {warning}");
    }
}

/// A left axis with two annotated values and room for two annotation tiers.
fn annotated_value_axis(
    values: SharedScale<ScaleLinear>,
    measurer: Rc<dyn TextMeasurer>,
) -> NumericAxis {
    let mut axis =
        NumericAxis::new(0x10_000_000, values, AxisOrient::Left).with_measurer(measurer);
    let tier = axis.axis().annotation_tier_height();
    axis.axis_mut()
        .set_margin(2.0 * tier + 4.0)
        .expect("annotation margin is a valid length");
    axis.axis_mut().set_annotations_enabled(true);
    axis.axis_mut().set_annotated_ticks([Some(180.0), Some(42.5)]);
    axis
}

fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid calendar date")
}

fn write_svg(path: &str, scene: &svg::SvgScene, layout: &ChartLayout) {
    std::fs::write(path, scene.to_svg_string(layout.view)).expect("write svg");
    println!("wrote {path} ({} visible marks)", scene.visible_len());
}

fn demo_measurer() -> Rc<dyn TextMeasurer> {
    #[cfg(feature = "parley")]
    {
        Rc::new(strata_text::CachedTextMeasurer::new(
            strata_text_parley::ParleyTextMeasurer::new(),
        ))
    }

    #[cfg(not(feature = "parley"))]
    {
        Rc::new(strata_text::HeuristicTextMeasurer)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    #[test]
    fn annotation_boxes_are_drawn_in_the_margin() {
        let values = SharedScale::new(ScaleLinear::new((0.0, 250.0)));
        let mut axis = annotated_value_axis(values, Rc::new(strata_text::HeuristicTextMeasurer));
        let width = axis.requested_space(720.0, 360.0).min_width;
        axis.compute_layout(Some(Rect::new(0.0, 0.0, width, 300.0)));
        axis.render_if_needed();
        let annotations = &axis.axis().frame().annotations;
        assert_eq!(annotations.len(), 2);
        assert!(annotations.iter().all(|a| a.tier.is_some() && a.visible));
    }
}
