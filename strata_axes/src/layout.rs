// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component layout protocol and a small chart arrange helper.
//!
//! Layout is a two-step negotiation:
//! - **Request**: the host offers a size and asks each component how much it needs
//!   ([`Component::requested_space`]).
//! - **Grant**: the host hands each component a rectangle ([`Component::compute_layout`]). A
//!   component that is fixed in a dimension takes only what it asked for in that dimension and
//!   aligns itself inside the rest of the offer.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use strata_scene::MarkDiff;

/// Minimum space a component asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpaceRequest {
    /// Minimum width.
    pub min_width: f64,
    /// Minimum height.
    pub min_height: f64,
}

/// Horizontal placement of a component inside a wider offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XAlignment {
    /// Flush with the left edge.
    Left,
    /// Centered.
    Center,
    /// Flush with the right edge.
    Right,
}

impl XAlignment {
    /// Fraction of the leftover width placed before the component.
    pub fn proportion(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Vertical placement of a component inside a taller offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum YAlignment {
    /// Flush with the top edge.
    Top,
    /// Centered.
    Center,
    /// Flush with the bottom edge.
    Bottom,
}

impl YAlignment {
    /// Fraction of the leftover height placed above the component.
    pub fn proportion(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

/// The rectangle a component was last offered and the box it took inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComponentLayout {
    /// Horizontal alignment inside the offer.
    pub x_alignment: XAlignment,
    /// Vertical alignment inside the offer.
    pub y_alignment: YAlignment,
    /// The last offered rectangle, if any.
    pub offer: Option<Rect>,
    /// The granted box, in the host's coordinates.
    pub bounds: Rect,
}

impl ComponentLayout {
    /// Creates an unplaced layout with the given alignment.
    pub fn new(x_alignment: XAlignment, y_alignment: YAlignment) -> Self {
        Self {
            x_alignment,
            y_alignment,
            offer: None,
            bounds: Rect::ZERO,
        }
    }

    /// Places a box of `size` inside `offer` according to the alignment and records both.
    pub fn place(&mut self, offer: Rect, size: Size) -> Rect {
        let x = offer.x0 + (offer.width() - size.width) * self.x_alignment.proportion();
        let y = offer.y0 + (offer.height() - size.height) * self.y_alignment.proportion();
        self.offer = Some(offer);
        self.bounds = Rect::from_origin_size(Point::new(x, y), size);
        self.bounds
    }
}

/// A laid-out, renderable piece of a chart.
pub trait Component {
    /// Returns the minimum space needed when `offered_width` x `offered_height` is available.
    fn requested_space(&self, offered_width: f64, offered_height: f64) -> SpaceRequest;

    /// Whether the component keeps its requested width instead of filling the offer.
    fn fixed_width(&self) -> bool;

    /// Whether the component keeps its requested height instead of filling the offer.
    fn fixed_height(&self) -> bool;

    /// Returns the size the component takes out of an offer.
    ///
    /// Fixed dimensions take `min(available, requested)`; the others take everything.
    fn size_from_offer(&self, available_width: f64, available_height: f64) -> Size {
        let request = self.requested_space(available_width, available_height);
        let width = if self.fixed_width() {
            available_width.min(request.min_width)
        } else {
            available_width
        };
        let height = if self.fixed_height() {
            available_height.min(request.min_height)
        } else {
            available_height
        };
        Size::new(width.max(0.0), height.max(0.0))
    }

    /// Grants the component a rectangle. `None` repeats the previous offer.
    fn compute_layout(&mut self, offer: Option<Rect>);

    /// Returns the granted box.
    fn bounds(&self) -> Rect;

    /// Renders now and returns the changes to the component's marks.
    fn render_immediately(&mut self) -> Vec<MarkDiff>;

    /// Whether state changed since the last render.
    fn needs_render(&self) -> bool;

    /// Renders only if something changed since the last render.
    fn render_if_needed(&mut self) -> Vec<MarkDiff> {
        if self.needs_render() {
            self.render_immediately()
        } else {
            Vec::new()
        }
    }
}

/// Layout inputs for a plot rectangle with up to four axes around it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartLayoutSpec {
    /// Outer chart bounds.
    pub view_size: Size,
    /// Padding applied on all sides of the view.
    pub outer_padding: f64,
    /// Thickness reserved for a left axis.
    pub axis_left: Option<f64>,
    /// Thickness reserved for a right axis.
    pub axis_right: Option<f64>,
    /// Thickness reserved for a top axis.
    pub axis_top: Option<f64>,
    /// Thickness reserved for a bottom axis.
    pub axis_bottom: Option<f64>,
}

/// Output of [`ChartLayout::arrange`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// The plot rectangle.
    pub plot: Rect,
    /// Rectangle for the left axis (if any).
    pub axis_left: Option<Rect>,
    /// Rectangle for the right axis (if any).
    pub axis_right: Option<Rect>,
    /// Rectangle for the top axis (if any).
    pub axis_top: Option<Rect>,
    /// Rectangle for the bottom axis (if any).
    pub axis_bottom: Option<Rect>,
}

impl ChartLayout {
    /// Reserves each axis's thickness around the view edges and gives the rest to the plot.
    ///
    /// Axis rectangles span the plot along their scale dimension, so an axis laid out into its
    /// rectangle maps the scale onto the same pixels as the plot.
    pub fn arrange(spec: &ChartLayoutSpec) -> Self {
        let outer_padding = spec.outer_padding.max(0.0);
        let left_w = spec.axis_left.unwrap_or(0.0).max(0.0);
        let right_w = spec.axis_right.unwrap_or(0.0).max(0.0);
        let top_h = spec.axis_top.unwrap_or(0.0).max(0.0);
        let bottom_h = spec.axis_bottom.unwrap_or(0.0).max(0.0);

        let view = Rect::new(
            0.0,
            0.0,
            spec.view_size.width.max(0.0),
            spec.view_size.height.max(0.0),
        );
        let x0 = outer_padding + left_w;
        let y0 = outer_padding + top_h;
        let plot = Rect::new(
            x0,
            y0,
            x0.max(view.x1 - outer_padding - right_w),
            y0.max(view.y1 - outer_padding - bottom_h),
        );

        let axis_left = spec
            .axis_left
            .map(|_| Rect::new(plot.x0 - left_w, plot.y0, plot.x0, plot.y1));
        let axis_right = spec
            .axis_right
            .map(|_| Rect::new(plot.x1, plot.y0, plot.x1 + right_w, plot.y1));
        let axis_top = spec
            .axis_top
            .map(|_| Rect::new(plot.x0, plot.y0 - top_h, plot.x1, plot.y0));
        let axis_bottom = spec
            .axis_bottom
            .map(|_| Rect::new(plot.x0, plot.y1, plot.x1, plot.y1 + bottom_h));

        Self {
            view,
            plot,
            axis_left,
            axis_right,
            axis_top,
            axis_bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHeight(f64);

    impl Component for FixedHeight {
        fn requested_space(&self, _w: f64, _h: f64) -> SpaceRequest {
            SpaceRequest {
                min_width: 0.0,
                min_height: self.0,
            }
        }

        fn fixed_width(&self) -> bool {
            false
        }

        fn fixed_height(&self) -> bool {
            true
        }

        fn compute_layout(&mut self, _offer: Option<Rect>) {}

        fn bounds(&self) -> Rect {
            Rect::ZERO
        }

        fn render_immediately(&mut self) -> Vec<MarkDiff> {
            Vec::new()
        }

        fn needs_render(&self) -> bool {
            false
        }
    }

    #[test]
    fn fixed_dimension_takes_at_most_the_request() {
        let mut c = FixedHeight(30.0);
        assert_eq!(c.size_from_offer(200.0, 100.0), Size::new(200.0, 30.0));
        assert_eq!(c.size_from_offer(200.0, 10.0), Size::new(200.0, 10.0));
        assert!(c.render_if_needed().is_empty());
    }

    #[test]
    fn place_honors_alignment() {
        let offer = Rect::new(10.0, 10.0, 110.0, 110.0);
        let size = Size::new(100.0, 20.0);

        let mut top = ComponentLayout::new(XAlignment::Left, YAlignment::Top);
        assert_eq!(top.place(offer, size), Rect::new(10.0, 10.0, 110.0, 30.0));

        let mut bottom = ComponentLayout::new(XAlignment::Left, YAlignment::Bottom);
        assert_eq!(bottom.place(offer, size), Rect::new(10.0, 90.0, 110.0, 110.0));
        assert_eq!(bottom.offer, Some(offer));

        let mut center = ComponentLayout::new(XAlignment::Center, YAlignment::Center);
        assert_eq!(
            center.place(offer, Size::new(50.0, 20.0)),
            Rect::new(35.0, 50.0, 85.0, 70.0)
        );
    }

    #[test]
    fn axes_reserve_space_around_the_plot() {
        let layout = ChartLayout::arrange(&ChartLayoutSpec {
            view_size: Size::new(400.0, 300.0),
            outer_padding: 10.0,
            axis_left: Some(40.0),
            axis_right: None,
            axis_top: None,
            axis_bottom: Some(30.0),
        });
        assert_eq!(layout.plot, Rect::new(50.0, 10.0, 390.0, 260.0));
        assert_eq!(
            layout.axis_left,
            Some(Rect::new(10.0, 10.0, 50.0, 260.0))
        );
        assert_eq!(
            layout.axis_bottom,
            Some(Rect::new(50.0, 260.0, 390.0, 290.0))
        );
        assert_eq!(layout.axis_top, None);
    }

    #[test]
    fn plot_never_inverts() {
        let layout = ChartLayout::arrange(&ChartLayoutSpec {
            view_size: Size::new(20.0, 20.0),
            outer_padding: 0.0,
            axis_left: Some(30.0),
            axis_right: None,
            axis_top: Some(30.0),
            axis_bottom: None,
        });
        assert_eq!(layout.plot.width(), 0.0);
        assert_eq!(layout.plot.height(), 0.0);
    }
}
