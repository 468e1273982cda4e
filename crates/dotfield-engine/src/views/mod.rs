//! The three canvas views of the portfolio page.

pub mod swarm;
pub mod timeline;
pub mod title_dots;

pub use swarm::{SwarmView, SwarmViewConfig};
pub use timeline::{TimelineView, TimelineViewConfig};
pub use title_dots::TitleDotsView;
