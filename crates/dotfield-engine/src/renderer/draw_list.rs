//! Backend-neutral draw commands.
//!
//! Views append commands each frame; the web bridge replays them onto a
//! Canvas2D context, and the `vectors` feature can tessellate them for GPU hosts.
//! The list is rebuilt from scratch every frame.

use glam::Vec2;

use super::color::Rgba;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface with an opaque background.
    Fill { color: Rgba },
    /// Clear the whole surface to transparent.
    Clear,
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    /// Radial gradient disc: `color` at `center` fading to transparent at
    /// `2 * radius` around `focus`, clipped to a disc of `radius`.
    Glow { center: Vec2, focus: Vec2, radius: f32, color: Rgba },
}

/// One frame's worth of draw commands.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Reset for a new frame, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill { color });
    }

    pub fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    /// Add a filled circle. Invisible circles are dropped.
    pub fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius > 0.0 && !color.is_transparent() && center.is_finite() {
            self.commands.push(DrawCommand::Circle { center, radius, color });
        }
    }

    /// Add a stroked segment. Invisible lines are dropped.
    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if width > 0.0 && !color.is_transparent() && from.is_finite() && to.is_finite() {
            self.commands.push(DrawCommand::Line { from, to, width, color });
        }
    }

    pub fn glow(&mut self, center: Vec2, focus: Vec2, radius: f32, color: Rgba) {
        if radius > 0.0 && !color.is_transparent() {
            self.commands.push(DrawCommand::Glow { center, focus, radius, color });
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }
}
