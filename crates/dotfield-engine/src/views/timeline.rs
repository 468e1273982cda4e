use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::view::{ConfiguredView, EngineContext, RenderContext, View};
use crate::systems::connections::{self, draw_connections};
use crate::systems::curves::{Anchor, CurveConfig, CurveField};
use crate::systems::swarm::{ParticleField, SwarmConfig};
use crate::systems::trail::{TrailConfig, TrailEmitter};

/// Pulsing gradient disc drawn at the lagged cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlowConfig {
    pub radius: f32,
    pub pulse: f32,
    pub wobble: f32,
    pub alpha: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            radius: 3.5,
            pulse: 0.5,
            wobble: 0.7,
            alpha: 0.5,
        }
    }
}

impl GlowConfig {
    /// Radius and gradient focus offset at `seconds` of simulated time.
    pub fn shape_at(&self, seconds: f32) -> (f32, Vec2) {
        let radius = self.radius + (seconds * 2.0).sin() * self.pulse;
        let focus = Vec2::new((seconds * 3.0).cos(), (seconds * 2.5).sin()) * self.wobble;
        (radius, focus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineViewConfig {
    pub particles: SwarmConfig,
    pub trail: TrailConfig,
    pub curves: CurveConfig,
    pub glow: GlowConfig,
    /// Cursor links go to at most this many nearest particles.
    pub nearest: usize,
    pub nearest_distance: f32,
    pub nearest_alpha: f32,
    pub line_width: f32,
}

impl Default for TimelineViewConfig {
    fn default() -> Self {
        Self {
            particles: SwarmConfig::timeline(),
            trail: TrailConfig::default(),
            curves: CurveConfig::default(),
            glow: GlowConfig::default(),
            nearest: 3,
            nearest_distance: 150.0,
            nearest_alpha: 0.1,
            line_width: 0.5,
        }
    }
}

/// Background for the career timeline: slow particles, flow dots between
/// cards, a sparkle trail and a glowing cursor.
pub struct TimelineView {
    particles: ParticleField,
    trail: TrailEmitter,
    curves: CurveField,
    config: TimelineViewConfig,
    /// Viewport width the current card layout was measured against.
    layout_width: f32,
}

impl TimelineView {
    pub fn new() -> Self {
        Self::from_config(TimelineViewConfig::default())
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn trail(&self) -> &TrailEmitter {
        &self.trail
    }

    pub fn curves(&self) -> &CurveField {
        &self.curves
    }

    fn scatter(&mut self, ctx: &mut EngineContext) {
        let count = self.config.particles.particle_count;
        self.particles.initialize(count, ctx.viewport, &mut ctx.rng);
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfiguredView for TimelineView {
    type Config = TimelineViewConfig;

    fn from_config(config: TimelineViewConfig) -> Self {
        Self {
            particles: ParticleField::new(config.particles),
            trail: TrailEmitter::new(config.trail),
            curves: CurveField::new(config.curves),
            config,
            layout_width: 0.0,
        }
    }
}

impl View for TimelineView {
    fn init(&mut self, ctx: &mut EngineContext) {
        self.layout_width = ctx.viewport.width;
        self.scatter(ctx);
    }

    fn resize(&mut self, ctx: &mut EngineContext) {
        self.scatter(ctx);
        // Cards reflow only when the width changes; the first size is page load.
        let reflowed = self.layout_width > 0.0 && ctx.viewport.width != self.layout_width;
        self.layout_width = ctx.viewport.width;
        if reflowed {
            self.curves.layout_invalidated();
        }
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let cursor = ctx.cursor();
        let frame = ctx.frame();
        let now = ctx.now_ms();
        self.particles.tick(cursor, ctx.viewport, frame);
        self.trail.tick(cursor, now, &mut ctx.rng);
        self.curves
            .update(cursor, ctx.scroll_y, ctx.viewport, frame, &mut ctx.rng);
    }

    fn render(&self, ctx: &mut RenderContext) {
        let theme = ctx.engine.theme;
        let ink = theme.ink();
        ctx.draw.fill(theme.background());

        self.particles.draw(ctx.draw, ink);
        self.curves.draw(ctx.draw, ink);
        self.trail.draw(ctx.draw, ink);

        if let Some(center) = self.trail.lagged() {
            let glow = &self.config.glow;
            let (radius, focus) = glow.shape_at(ctx.engine.clock.seconds());
            ctx.draw
                .glow(center, center + focus, radius, ink.with_alpha(glow.alpha));
        }

        if let Some(cursor) = ctx.engine.cursor() {
            let links = connections::nearest_to_cursor(
                self.particles.particles(),
                cursor,
                self.config.nearest,
                self.config.nearest_distance,
                self.config.nearest_alpha,
            );
            draw_connections(ctx.draw, &links, self.config.line_width, ink);
        }
    }

    fn layout_measured(&mut self, _ctx: &mut EngineContext, anchors: Vec<Anchor>) {
        self.curves.layout_measured(anchors);
    }

    fn layout_invalidated(&mut self, _ctx: &mut EngineContext) {
        self.curves.layout_invalidated();
    }
}
