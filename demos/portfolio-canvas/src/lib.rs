use dotfield_engine::{SwarmView, TimelineView, TitleDotsView};
use wasm_bindgen::prelude::*;

pub use dotfield_web::SharedCursor;

#[cfg(feature = "vectors")]
mod canvases {
    use super::*;

    dotfield_web::export_view!(SwarmCanvas, SwarmView, "swarm", vectors);
    dotfield_web::export_view!(TimelineCanvas, TimelineView, "timeline", vectors);
    dotfield_web::export_view!(TitleDotsCanvas, TitleDotsView, "title-dots", vectors);
}

#[cfg(not(feature = "vectors"))]
mod canvases {
    use super::*;

    dotfield_web::export_view!(SwarmCanvas, SwarmView, "swarm");
    dotfield_web::export_view!(TimelineCanvas, TimelineView, "timeline");
    dotfield_web::export_view!(TitleDotsCanvas, TitleDotsView, "title-dots");
}

pub use canvases::{SwarmCanvas, TimelineCanvas, TitleDotsCanvas};
