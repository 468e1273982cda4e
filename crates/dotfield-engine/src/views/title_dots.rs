use crate::api::view::{ConfiguredView, EngineContext, RenderContext, View};
use crate::systems::shape::{ShapeConfig, ShapeField, ShapeSource};

/// A logo drawn as dots inside its own container. The canvas is transparent;
/// the page background shows through.
pub struct TitleDotsView {
    field: ShapeField,
}

impl TitleDotsView {
    pub fn new() -> Self {
        Self::from_config(ShapeConfig::default())
    }

    pub fn field(&self) -> &ShapeField {
        &self.field
    }

    fn is_mobile(&self, ctx: &EngineContext) -> bool {
        ctx.is_mobile(self.field.config().mobile_breakpoint)
    }
}

impl Default for TitleDotsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfiguredView for TitleDotsView {
    type Config = ShapeConfig;

    fn from_config(config: ShapeConfig) -> Self {
        Self {
            field: ShapeField::new(config),
        }
    }
}

impl View for TitleDotsView {
    fn init(&mut self, _ctx: &mut EngineContext) {}

    fn resize(&mut self, ctx: &mut EngineContext) {
        self.field.resize(ctx.surface(), &mut ctx.rng);
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        let radius = self.field.config().interaction_radius(self.is_mobile(ctx));
        self.field.tick(ctx.local_cursor(), radius, &mut ctx.rng);
    }

    fn render(&self, ctx: &mut RenderContext) {
        let mobile = self.is_mobile(ctx.engine);
        ctx.draw.clear();
        self.field.draw(
            ctx.draw,
            ctx.engine.theme.ink(),
            ctx.engine.local_cursor(),
            mobile,
            ctx.rng,
        );
    }

    fn shape_loaded(&mut self, ctx: &mut EngineContext, source: ShapeSource) {
        self.field.load(source, ctx.surface(), &mut ctx.rng);
    }

    fn shape_failed(&mut self, _ctx: &mut EngineContext, reason: &str) {
        self.field.fail(reason);
    }

    fn set_rainbow(&mut self, on: bool) {
        self.field.set_rainbow(on);
    }
}
