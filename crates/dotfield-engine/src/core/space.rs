//! Coordinate-space conversions.
//!
//! Three spaces are in play: page (document) pixels, viewport (client)
//! pixels, and container-local pixels. The cursor store is always viewport.

use glam::Vec2;

use crate::api::types::Rect;

/// Page coordinates → viewport coordinates for the current scroll offset.
#[inline]
pub fn page_to_viewport(p: Vec2, scroll_y: f32) -> Vec2 {
    Vec2::new(p.x, p.y - scroll_y)
}

/// Viewport coordinates → coordinates local to `container`.
#[inline]
pub fn viewport_to_local(p: Vec2, container: &Rect) -> Vec2 {
    p - container.origin()
}

/// Whether a viewport-space `y` lies within `margin` pixels of a viewport of `height`.
#[inline]
pub fn within_vertical_margin(y: f32, height: f32, margin: f32) -> bool {
    y >= -margin && y <= height + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_to_viewport_subtracts_scroll() {
        let p = page_to_viewport(Vec2::new(40.0, 1200.0), 1000.0);
        assert_eq!(p, Vec2::new(40.0, 200.0));
    }

    #[test]
    fn viewport_to_local_subtracts_origin() {
        let container = Rect::new(100.0, 50.0, 300.0, 120.0);
        let p = viewport_to_local(Vec2::new(150.0, 60.0), &container);
        assert_eq!(p, Vec2::new(50.0, 10.0));
    }

    #[test]
    fn vertical_margin() {
        assert!(within_vertical_margin(-100.0, 800.0, 100.0));
        assert!(within_vertical_margin(900.0, 800.0, 100.0));
        assert!(!within_vertical_margin(-100.5, 800.0, 100.0));
        assert!(!within_vertical_margin(901.0, 800.0, 100.0));
    }
}
