// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label overlap suppression.

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::Rect;

use crate::frame::TickLabel;

/// Whether the interiors of `a` and `b` intersect once snapped to whole pixels. Touching
/// edges, including sub-pixel spill past a shared edge, do not count.
///
/// Degenerate rectangles (tick marks) overlap a label when they cross its interior.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    a.x1.floor() > b.x0.ceil()
        && b.x1.floor() > a.x0.ceil()
        && a.y1.floor() > b.y0.ceil()
        && b.y1.floor() > a.y0.ceil()
}

/// Whether `inner` lies within `outer`, allowing for sub-pixel rounding on every edge.
pub(crate) fn is_inside(inner: Rect, outer: Rect) -> bool {
    outer.x0.floor() <= inner.x0.ceil()
        && outer.y0.floor() <= inner.y0.ceil()
        && inner.x1.floor() <= outer.x1.ceil()
        && inner.y1.floor() <= outer.y1.ceil()
}

/// Hides labels that are empty, leave `bounds`, overlap the last label left visible, or
/// overlap the tick mark before or after them.
///
/// Labels are visited in order; `tick_marks[i]` and `tick_marks[i + 1]` are the marks
/// bracketing label `i`. With `keep_ends`, the first and last labels skip the `bounds` test.
pub(crate) fn suppress_overlapping_labels(
    labels: &mut [TickLabel],
    tick_marks: &[Rect],
    bounds: Rect,
    keep_ends: bool,
) {
    let last_index = labels.len().saturating_sub(1);
    labels
        .iter_mut()
        .enumerate()
        .fold(None::<Rect>, |last_visible, (i, label)| {
            let rect = label.bounds;
            let is_end = i == 0 || i == last_index;
            let hits_mark = |j: usize| tick_marks.get(j).is_some_and(|m| overlaps(rect, *m));
            let hidden = rect.width() <= 0.0
                || (!(keep_ends && is_end) && !is_inside(rect, bounds))
                || last_visible.is_some_and(|last| overlaps(last, rect))
                || hits_mark(i)
                || hits_mark(i + 1);
            label.visible = !hidden;
            if hidden { last_visible } else { Some(rect) }
        });
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::string::String;
    use alloc::vec::Vec;

    use kurbo::{Point, Size};
    use strata_scene::{TextAnchor, TextBaseline};

    use super::*;

    fn label(x: f64, width: f64) -> TickLabel {
        TickLabel::new(
            String::from("label"),
            Point::new(x, 0.0),
            TextAnchor::Start,
            TextBaseline::Hanging,
            Size::new(width, 10.0),
        )
    }

    fn visibility(labels: &[TickLabel]) -> Vec<bool> {
        labels.iter().map(|l| l.visible).collect()
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(overlaps(a, Rect::new(9.0, 0.0, 20.0, 10.0)));
        // A vertical tick crossing the label.
        assert!(overlaps(a, Rect::new(5.0, -5.0, 5.0, 5.0)));
    }

    #[test]
    fn subpixel_spill_onto_a_tick_end_is_not_an_overlap() {
        let tick = Rect::new(100.0, 0.0, 100.0, 5.0);
        let label = Rect::new(78.4, 5.0 - 2e-15, 121.6, 17.0);
        assert!(!overlaps(label, tick));
        assert!(overlaps(Rect::new(78.4, 4.0, 121.6, 17.0), tick));
    }

    #[test]
    fn inside_tolerates_subpixel_spill() {
        let outer = Rect::new(0.0, 0.0, 100.0, 20.0);
        assert!(is_inside(Rect::new(-0.4, 0.0, 99.6, 20.3), outer));
        assert!(!is_inside(Rect::new(-1.5, 0.0, 10.0, 10.0), outer));
    }

    #[test]
    fn overlap_is_checked_against_last_visible_label() {
        let mut labels = [
            label(0.0, 30.0),
            label(20.0, 30.0),
            label(35.0, 30.0),
            label(60.0, 30.0),
        ];
        suppress_overlapping_labels(&mut labels, &[], Rect::new(0.0, 0.0, 200.0, 20.0), false);
        // The second label is hidden, so the third is compared against the first and shown.
        assert_eq!(visibility(&labels), [true, false, true, false]);
    }

    #[test]
    fn cut_off_and_empty_labels_are_hidden() {
        let mut labels = [label(-20.0, 30.0), label(50.0, 0.0), label(80.0, 30.0)];
        suppress_overlapping_labels(&mut labels, &[], Rect::new(0.0, 0.0, 100.0, 20.0), false);
        assert_eq!(visibility(&labels), [false, false, false]);

        suppress_overlapping_labels(&mut labels, &[], Rect::new(0.0, 0.0, 100.0, 20.0), true);
        assert_eq!(visibility(&labels), [true, false, true]);
    }

    #[test]
    fn labels_crossing_adjacent_tick_marks_are_hidden() {
        let ticks = [
            Rect::new(0.0, 0.0, 0.0, 20.0),
            Rect::new(40.0, 0.0, 40.0, 20.0),
            Rect::new(80.0, 0.0, 80.0, 20.0),
        ];
        let mut labels = [label(5.0, 30.0), label(45.0, 40.0)];
        suppress_overlapping_labels(&mut labels, &ticks, Rect::new(0.0, 0.0, 100.0, 20.0), false);
        assert_eq!(visibility(&labels), [true, false]);
    }
}
