pub mod api;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod systems;
pub mod views;

// Re-export key types at crate root for convenience
pub use api::types::{Bounds, Rect};
pub use api::view::{
    parse_config, ConfiguredView, EngineContext, RenderContext, View, ViewConfig,
};
pub use core::cursor::{CursorReader, CursorStore, LaggedCursor};
pub use core::schedule::{Debounce, Throttle};
pub use core::time::{FixedTimestep, FrameClock};
pub use error::EngineError;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::{DrawCommand, DrawList, Rgba, Theme};
pub use systems::connections::{Connection, Positioned};
pub use systems::curves::{Anchor, CurveField, CurveState, Placement};
pub use systems::rng::Rng;
pub use systems::shape::{CirclePrimitive, ShapeDot, ShapeField, ShapeSource};
pub use systems::swarm::{ParticleField, SwarmConfig};
pub use systems::trail::{TrailEmitter, TrailPoint};
pub use views::{SwarmView, TimelineView, TitleDotsView};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex};
