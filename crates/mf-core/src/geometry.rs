//! Coordinate spaces.
//!
//! Three spaces are involved when placing things on the canvas:
//!
//! - **client**: browser viewport pixels, as delivered by pointer events;
//! - **container**: pixels relative to the canvas container's top-left;
//! - **canvas**: the graph's own space after the host's pan/zoom.
//!
//! Popups and menus live in container space; nodes live in canvas space.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// The host viewport's pan/zoom, mapping canvas → container space as
/// `container = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub pan: Vec2,
    pub zoom: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
    };

    /// Build a transform; a non-positive or non-finite zoom falls back to 1.
    pub fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            log::warn!("ignoring invalid zoom {zoom}, using 1.0");
            1.0
        };
        Self {
            pan: Vec2::new(pan_x, pan_y),
            zoom,
        }
    }

    fn to_container(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Map a container-space point into canvas space.
    pub fn container_to_canvas(&self, p: Point) -> Point {
        self.to_container().inverse() * p
    }

    /// Map a canvas-space point into container space.
    pub fn canvas_to_container(&self, p: Point) -> Point {
        self.to_container() * p
    }
}

/// Convert a client-space point into the container's local space.
pub fn client_to_container(client: Point, container: Rect) -> Point {
    client - container.origin().to_vec2()
}

/// Place a box of `size` anchored at `anchor` inside `bounds`, keeping
/// `margin` from every edge.
///
/// Overflow on the right/bottom pulls the box back to `bounds - size -
/// margin`; the top/left are then raised to `margin`, so the top-left
/// corner always stays visible even when the box is larger than the bounds.
pub fn clamp_box(anchor: Point, size: Size, bounds: Size, margin: f64) -> Point {
    let mut x = anchor.x;
    let mut y = anchor.y;
    if x + size.width > bounds.width {
        x = bounds.width - size.width - margin;
    }
    if y + size.height > bounds.height {
        y = bounds.height - size.height - margin;
    }
    Point::new(x.max(margin), y.max(margin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_passthrough() {
        let t = ViewportTransform::IDENTITY;
        assert_eq!(
            t.container_to_canvas(Point::new(120.0, 80.0)),
            Point::new(120.0, 80.0)
        );
    }

    #[test]
    fn pan_and_zoom_are_inverted() {
        let t = ViewportTransform::new(50.0, -20.0, 2.0);
        let canvas = t.container_to_canvas(Point::new(290.0, 140.0));
        assert!((canvas.x - 120.0).abs() < 1e-9);
        assert!((canvas.y - 80.0).abs() < 1e-9);
        let back = t.canvas_to_container(canvas);
        assert!((back.x - 290.0).abs() < 1e-9);
        assert!((back.y - 140.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_zoom_falls_back() {
        assert_eq!(ViewportTransform::new(0.0, 0.0, 0.0).zoom, 1.0);
        assert_eq!(ViewportTransform::new(0.0, 0.0, f64::NAN).zoom, 1.0);
    }

    #[test]
    fn client_offsets_by_container_origin() {
        let container = Rect::new(100.0, 50.0, 900.0, 650.0);
        assert_eq!(
            client_to_container(Point::new(220.0, 130.0), container),
            Point::new(120.0, 80.0)
        );
    }

    #[test]
    fn clamp_box_keeps_inside() {
        let bounds = Size::new(800.0, 600.0);
        let size = Size::new(280.0, 160.0);
        assert_eq!(
            clamp_box(Point::new(100.0, 100.0), size, bounds, 10.0),
            Point::new(100.0, 100.0)
        );
        assert_eq!(
            clamp_box(Point::new(700.0, 550.0), size, bounds, 10.0),
            Point::new(510.0, 430.0)
        );
        assert_eq!(
            clamp_box(Point::new(-5.0, 3.0), size, bounds, 10.0),
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn clamp_box_oversized_pins_top_left() {
        let p = clamp_box(
            Point::new(50.0, 50.0),
            Size::new(280.0, 160.0),
            Size::new(200.0, 100.0),
            10.0,
        );
        assert_eq!(p, Point::new(10.0, 10.0));
    }
}
