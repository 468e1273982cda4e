pub mod color;
pub mod draw_list;

// Re-export key types for convenient access
pub use color::{random_rainbow, Rgba, Theme, RAINBOW_RGB};
pub use draw_list::{DrawCommand, DrawList};
