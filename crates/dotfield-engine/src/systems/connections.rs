//! Proximity connections: lines between points (or a point and the cursor)
//! whose opacity fades linearly to zero at the distance threshold.
//!
//! Pairwise search is O(n²) with no spatial index; callers keep point counts
//! in the tens to low hundreds.

use glam::Vec2;

use crate::renderer::{DrawList, Rgba};

/// Anything with a canvas-space position.
pub trait Positioned {
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

/// A line to draw this frame. Never stored between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Vec2,
    pub to: Vec2,
    pub alpha: f32,
}

/// Stroke alpha for two points `distance` apart, or `None` when they are not
/// connected. The comparison is strict: `distance == threshold` is not connected.
#[inline]
pub fn connection_alpha(distance: f32, threshold: f32, base_alpha: f32) -> Option<f32> {
    if !(threshold > 0.0) || !(distance < threshold) {
        return None;
    }
    Some(base_alpha * (1.0 - distance / threshold))
}

/// Every pair `i < j` closer than `threshold`.
pub fn pairwise<P: Positioned>(points: &[P], threshold: f32, base_alpha: f32) -> Vec<Connection> {
    let mut out = Vec::new();
    for (i, a) in points.iter().enumerate() {
        let pa = a.position();
        for b in &points[i + 1..] {
            let pb = b.position();
            if let Some(alpha) = connection_alpha(pa.distance(pb), threshold, base_alpha) {
                out.push(Connection { from: pa, to: pb, alpha });
            }
        }
    }
    out
}

/// Every point closer than `threshold` to the cursor.
pub fn to_cursor<P: Positioned>(
    points: &[P],
    cursor: Vec2,
    threshold: f32,
    base_alpha: f32,
) -> Vec<Connection> {
    points
        .iter()
        .filter_map(|p| {
            let pos = p.position();
            connection_alpha(pos.distance(cursor), threshold, base_alpha)
                .map(|alpha| Connection { from: pos, to: cursor, alpha })
        })
        .collect()
}

/// The `k` points nearest the cursor, then filtered by `threshold`.
///
/// One linear scan plus a sort; cheaper than a full radius query when only a
/// handful of lines are wanted.
pub fn nearest_to_cursor<P: Positioned>(
    points: &[P],
    cursor: Vec2,
    k: usize,
    threshold: f32,
    base_alpha: f32,
) -> Vec<Connection> {
    let mut by_distance: Vec<(Vec2, f32)> = points
        .iter()
        .map(|p| {
            let pos = p.position();
            (pos, pos.distance(cursor))
        })
        .collect();
    by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    by_distance.truncate(k);

    by_distance
        .into_iter()
        .filter_map(|(pos, d)| {
            connection_alpha(d, threshold, base_alpha)
                .map(|alpha| Connection { from: pos, to: cursor, alpha })
        })
        .collect()
}

/// Append connections to the draw list as `width`-wide lines in `color`.
pub fn draw_connections(draw: &mut DrawList, connections: &[Connection], width: f32, color: Rgba) {
    for c in connections {
        draw.line(c.from, c.to, width, color.with_alpha(c.alpha));
    }
}
