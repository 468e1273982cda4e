use serde::{Deserialize, Serialize};

use crate::api::view::{ConfiguredView, EngineContext, RenderContext, View};
use crate::systems::connections::{self, draw_connections};
use crate::systems::swarm::{ParticleField, SwarmConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwarmViewConfig {
    pub particles: SwarmConfig,
    pub link_distance: f32,
    pub link_alpha: f32,
    pub cursor_link_distance: f32,
    pub cursor_link_alpha: f32,
    pub line_width: f32,
}

impl Default for SwarmViewConfig {
    fn default() -> Self {
        Self {
            particles: SwarmConfig::default(),
            link_distance: 150.0,
            link_alpha: 0.15,
            cursor_link_distance: 300.0,
            cursor_link_alpha: 0.3,
            line_width: 0.5,
        }
    }
}

/// Full-viewport drifting particles, linked to each other and to the cursor.
pub struct SwarmView {
    field: ParticleField,
    config: SwarmViewConfig,
}

impl SwarmView {
    pub fn new() -> Self {
        Self::from_config(SwarmViewConfig::default())
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    fn scatter(&mut self, ctx: &mut EngineContext) {
        let count = self.config.particles.particle_count;
        self.field.initialize(count, ctx.viewport, &mut ctx.rng);
        log::debug!("swarm: {} particles in {:?}", self.field.len(), ctx.viewport);
    }
}

impl Default for SwarmView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfiguredView for SwarmView {
    type Config = SwarmViewConfig;

    fn from_config(config: SwarmViewConfig) -> Self {
        Self {
            field: ParticleField::new(config.particles),
            config,
        }
    }
}

impl View for SwarmView {
    fn init(&mut self, ctx: &mut EngineContext) {
        self.scatter(ctx);
    }

    fn resize(&mut self, ctx: &mut EngineContext) {
        self.scatter(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        self.field.tick(ctx.cursor(), ctx.viewport, ctx.frame());
    }

    fn render(&self, ctx: &mut RenderContext) {
        let theme = ctx.engine.theme;
        let ink = theme.ink();
        let cfg = &self.config;
        ctx.draw.fill(theme.background());

        let particles = self.field.particles();
        let links = connections::pairwise(particles, cfg.link_distance, cfg.link_alpha);
        draw_connections(ctx.draw, &links, cfg.line_width, ink);

        self.field.draw(ctx.draw, ink);

        if let Some(cursor) = ctx.engine.cursor() {
            let links = connections::to_cursor(
                particles,
                cursor,
                cfg.cursor_link_distance,
                cfg.cursor_link_alpha,
            );
            draw_connections(ctx.draw, &links, cfg.line_width, ink);
        }
    }
}
