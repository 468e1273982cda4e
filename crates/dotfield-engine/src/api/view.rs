use glam::Vec2;
use serde::de::DeserializeOwned;

use crate::api::types::{Bounds, Rect};
use crate::core::cursor::CursorReader;
use crate::core::space::viewport_to_local;
use crate::core::time::FrameClock;
use crate::error::EngineError;
use crate::renderer::{DrawList, Theme};
use crate::systems::curves::Anchor;
use crate::systems::rng::Rng;
use crate::systems::shape::ShapeSource;

/// Configuration for the engine, provided by the view.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Fixed timestep in seconds (default: 1/60). One step is one logical frame.
    pub fixed_dt: f32,
    /// Steps run per display frame at most; extra backlog is dropped.
    pub max_steps_per_frame: u32,
    /// Quiet period before a resize is applied (default: 200ms).
    pub resize_debounce_ms: f64,
    /// Initial draw list capacity.
    pub draw_capacity: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            resize_debounce_ms: 200.0,
            draw_capacity: 4096,
        }
    }
}

/// The contract every canvas view fulfils.
///
/// The runner applies host events to the [`EngineContext`] and forwards the
/// view-specific ones through the hook methods, once per display frame,
/// before any update step runs.
pub trait View {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> ViewConfig {
        ViewConfig::default()
    }

    /// Build initial state. The viewport may still be empty here.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The viewport or container was resized (after the debounce settled).
    fn resize(&mut self, ctx: &mut EngineContext);

    /// One logical frame.
    fn update(&mut self, ctx: &mut EngineContext);

    /// Read-only render pass. Rebuilds the draw list from scratch.
    fn render(&self, ctx: &mut RenderContext);

    fn layout_measured(&mut self, _ctx: &mut EngineContext, _anchors: Vec<Anchor>) {}

    fn layout_invalidated(&mut self, _ctx: &mut EngineContext) {}

    fn shape_loaded(&mut self, _ctx: &mut EngineContext, _source: ShapeSource) {}

    fn shape_failed(&mut self, _ctx: &mut EngineContext, reason: &str) {
        log::warn!("shape source failed: {}", reason);
    }

    fn set_rainbow(&mut self, _on: bool) {}
}

/// A view that can be built from a JSON config.
pub trait ConfiguredView: View + Sized {
    type Config: DeserializeOwned + Default;

    fn from_config(config: Self::Config) -> Self;

    /// Build from optional host JSON. Malformed JSON is logged and the
    /// defaults are used instead.
    fn from_json(json: Option<&str>) -> Self {
        let config = match json {
            Some(json) => parse_config::<Self::Config>(json).unwrap_or_else(|e| {
                log::warn!("{}; using defaults", e);
                Self::Config::default()
            }),
            None => Self::Config::default(),
        };
        Self::from_config(config)
    }
}

/// Parse a view config. Missing fields take their defaults.
pub fn parse_config<C: DeserializeOwned>(json: &str) -> Result<C, EngineError> {
    serde_json::from_str(json).map_err(EngineError::Config)
}

/// Mutable engine state, passed to View::init and View::update.
pub struct EngineContext {
    pub cursor: CursorReader,
    /// Browser viewport size in CSS pixels.
    pub viewport: Bounds,
    /// The canvas container in viewport coordinates. Left empty for
    /// full-viewport canvases.
    pub container: Rect,
    /// Page scroll offset.
    pub scroll_y: f32,
    pub theme: Theme,
    pub clock: FrameClock,
    pub rng: Rng,
}

impl EngineContext {
    pub fn new(cursor: CursorReader, seed: u64) -> Self {
        Self {
            cursor,
            viewport: Bounds::ZERO,
            container: Rect::default(),
            scroll_y: 0.0,
            theme: Theme::default(),
            clock: FrameClock::new(),
            rng: Rng::new(seed),
        }
    }

    /// Raw cursor in viewport coordinates, if the pointer has been seen.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor.position()
    }

    /// Cursor relative to the container origin.
    pub fn local_cursor(&self) -> Option<Vec2> {
        self.cursor().map(|p| viewport_to_local(p, &self.container))
    }

    /// Size of the drawing surface: the container when one was reported,
    /// otherwise the whole viewport.
    pub fn surface(&self) -> Bounds {
        let container = self.container.size();
        if container.is_empty() {
            self.viewport
        } else {
            container
        }
    }

    /// Narrow viewports use the mobile tuning.
    pub fn is_mobile(&self, breakpoint: f32) -> bool {
        self.viewport.width < breakpoint
    }

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }
}

/// Passed to View::render. `rng` is a render-only generator so drawing never
/// perturbs the simulation sequence.
pub struct RenderContext<'a> {
    pub engine: &'a EngineContext,
    pub draw: &'a mut DrawList,
    pub rng: &'a mut Rng,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cursor::CursorStore;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default, rename_all = "camelCase")]
    struct Sample {
        particle_count: usize,
        rainbow: bool,
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let c: Sample = parse_config(r#"{"rainbow": true}"#).expect("valid json");
        assert_eq!(c, Sample { particle_count: 0, rainbow: true });
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = parse_config::<Sample>("{particleCount: 3").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn local_cursor_subtracts_container_origin() {
        let mut store = CursorStore::new();
        let mut ctx = EngineContext::new(store.reader(), 1);
        assert!(ctx.local_cursor().is_none());

        ctx.container = Rect::new(100.0, 50.0, 300.0, 200.0);
        store.update_position(150.0, 60.0);
        assert_eq!(ctx.local_cursor(), Some(Vec2::new(50.0, 10.0)));
    }

    #[test]
    fn surface_prefers_container() {
        let mut ctx = EngineContext::new(CursorReader::detached(), 1);
        ctx.viewport = Bounds::new(1024.0, 768.0);
        assert_eq!(ctx.surface(), Bounds::new(1024.0, 768.0));
        ctx.container = Rect::new(10.0, 10.0, 300.0, 120.0);
        assert_eq!(ctx.surface(), Bounds::new(300.0, 120.0));
    }

    #[test]
    fn mobile_breakpoint_is_exclusive() {
        let mut ctx = EngineContext::new(CursorReader::detached(), 1);
        ctx.viewport = Bounds::new(767.0, 900.0);
        assert!(ctx.is_mobile(768.0));
        ctx.viewport = Bounds::new(768.0, 900.0);
        assert!(!ctx.is_mobile(768.0));
    }
}
