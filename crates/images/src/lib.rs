pub mod card;
pub mod layout;
pub mod svg;
pub mod text;
pub mod theme;

pub use card::{CANVAS_HEIGHT, CANVAS_WIDTH, RenderModel};
pub use svg::Rasterizer;
pub use theme::{Palette, Theme};
