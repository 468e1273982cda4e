use crate::api::types::Rect;
use crate::renderer::Theme;
use crate::systems::curves::Anchor;
use crate::systems::shape::ShapeSource;

/// Host events for one canvas. Pointer motion is not queued; it goes
/// straight into the shared cursor store.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The page scrolled to `y` (page pixels above the viewport top).
    Scroll { y: f32 },
    /// The viewport changed size, in CSS pixels.
    Resize { width: f32, height: f32 },
    /// The canvas container's rectangle in viewport coordinates.
    Container(Rect),
    Theme(Theme),
    /// Fresh timeline card measurements, in page coordinates.
    LayoutMeasured(Vec<Anchor>),
    /// Timeline content changed; previous measurements are stale.
    LayoutInvalidated,
    ShapeLoaded(ShapeSource),
    /// The shape source could not be fetched or parsed.
    ShapeFailed(String),
    /// Toggle the rainbow palette.
    Rainbow(bool),
}

/// A queue of input events.
/// JS pushes events between frames; the runner drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Scroll { y: 120.0 });
        q.push(InputEvent::LayoutInvalidated);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Resize { width: 800.0, height: 600.0 });
        q.push(InputEvent::Theme(Theme::Dark));
        q.push(InputEvent::ShapeFailed("404".into()));
        let events = q.drain();
        assert_eq!(events[0], InputEvent::Resize { width: 800.0, height: 600.0 });
        assert_eq!(events[1], InputEvent::Theme(Theme::Dark));
        match &events[2] {
            InputEvent::ShapeFailed(reason) => assert_eq!(reason, "404"),
            other => panic!("Expected ShapeFailed, got {:?}", other),
        }
    }
}
