use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use resvg::{
    tiny_skia,
    usvg::{self, fontdb},
};
use studycard_core::config::RenderConfig;

/// Turns SVG documents into PNG images.
///
/// Fonts are loaded once and shared by every render.
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl Rasterizer {
    pub fn new(config: &RenderConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.system_fonts {
            db.load_system_fonts();
        }
        if let Some(dir) = &config.fonts_dir {
            db.load_fonts_dir(dir);
            tracing::debug!("Loaded fonts from {}", dir.display());
        }
        Self::with_fontdb(db, config.font_family.clone())
    }

    pub fn with_fontdb(db: fontdb::Database, font_family: String) -> Self {
        Self { fontdb: Arc::new(db), font_family }
    }

    pub fn font_family(&self) -> &str { &self.font_family }

    pub fn face_count(&self) -> usize { self.fontdb.len() }

    pub fn render_png(&self, svg: &str) -> Result<Vec<u8>> {
        let options = usvg::Options { fontdb: self.fontdb.clone(), ..Default::default() };
        let tree = usvg::Tree::from_str(svg, &options).context("Failed to parse SVG")?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| anyhow!("Failed to allocate {}x{} pixmap", size.width(), size.height()))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        pixmap.encode_png().context("Failed to encode PNG")
    }
}
