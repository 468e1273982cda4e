//! Shared cursor context.
//!
//! One `CursorStore` per page owns the write side; every view keeps a
//! `CursorReader` handed to it at construction. Single-threaded, last write
//! wins. Positions are viewport (client) pixels.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Write side of the cursor context.
#[derive(Debug, Default)]
pub struct CursorStore {
    shared: Rc<Cell<Option<Vec2>>>,
}

impl CursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest pointer or touch position.
    pub fn update_position(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.shared.set(Some(Vec2::new(x, y)));
        }
    }

    /// Latest position, or `None` before the first pointer sample.
    pub fn position(&self) -> Option<Vec2> {
        self.shared.get()
    }

    /// Create a read-only handle sharing this store.
    pub fn reader(&self) -> CursorReader {
        CursorReader {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// Read side of the cursor context.
#[derive(Debug, Clone, Default)]
pub struct CursorReader {
    shared: Rc<Cell<Option<Vec2>>>,
}

impl CursorReader {
    /// A reader that is not attached to any store and never sees a cursor.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.shared.get()
    }
}

/// Exponentially smoothed follower of the raw cursor.
///
/// Snaps to the first sample, then closes `factor` of the remaining gap per frame.
#[derive(Debug, Clone, Copy)]
pub struct LaggedCursor {
    position: Option<Vec2>,
    factor: f32,
}

impl LaggedCursor {
    pub const DEFAULT_FACTOR: f32 = 0.15;

    pub fn new(factor: f32) -> Self {
        Self {
            position: None,
            factor: factor.clamp(0.0, 1.0),
        }
    }

    /// Advance one frame toward `raw`. Returns the smoothed position.
    pub fn follow(&mut self, raw: Option<Vec2>) -> Option<Vec2> {
        self.position = match (self.position, raw) {
            (Some(current), Some(target)) => Some(current + (target - current) * self.factor),
            (None, Some(target)) => Some(target),
            (current, None) => current,
        };
        self.position
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }
}

impl Default for LaggedCursor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_see_writes() {
        let mut store = CursorStore::new();
        let a = store.reader();
        let b = store.reader();
        assert_eq!(a.position(), None);

        store.update_position(10.0, 20.0);
        assert_eq!(a.position(), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(b.position(), Some(Vec2::new(10.0, 20.0)));

        store.update_position(30.0, 40.0);
        assert_eq!(a.position(), Some(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn non_finite_writes_are_ignored() {
        let mut store = CursorStore::new();
        store.update_position(5.0, 5.0);
        store.update_position(f32::NAN, 1.0);
        assert_eq!(store.position(), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn detached_reader_is_empty() {
        assert_eq!(CursorReader::detached().position(), None);
    }

    #[test]
    fn lagged_cursor_snaps_then_smooths() {
        let mut lag = LaggedCursor::new(0.15);
        assert_eq!(lag.follow(None), None);
        assert_eq!(lag.follow(Some(Vec2::new(100.0, 0.0))), Some(Vec2::new(100.0, 0.0)));

        let p = lag.follow(Some(Vec2::new(200.0, 0.0))).unwrap();
        assert!((p.x - 115.0).abs() < 1e-4, "expected 115, got {}", p.x);

        // Holds position when the raw cursor disappears.
        assert_eq!(lag.follow(None), Some(p));
    }

    #[test]
    fn lagged_cursor_converges() {
        let mut lag = LaggedCursor::default();
        lag.follow(Some(Vec2::ZERO));
        let target = Some(Vec2::new(50.0, -50.0));
        let mut p = Vec2::ZERO;
        for _ in 0..200 {
            p = lag.follow(target).unwrap();
        }
        assert!(p.distance(Vec2::new(50.0, -50.0)) < 0.01);
    }
}
