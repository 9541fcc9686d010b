use std::sync::Arc;

use flowpitch_core::export::{CaptureError, PageBitmap, RasterOptions, Rasterizer, StagedSection};
use flowpitch_core::svg::render_svg;
use resvg::{tiny_skia, usvg};

/// Rasterizes staged sections by rendering them to SVG and rastering the
/// SVG with `resvg` into an RGBA bitmap.
pub struct SvgRasterizer {
    dark: bool,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl SvgRasterizer {
    pub fn new(dark: bool) -> Self {
        Self { dark, fontdb: None }
    }
}

impl Rasterizer for SvgRasterizer {
    /// Load the system font database once per rasterizer. This is the
    /// export's external-dependency acquisition step; a machine with no
    /// fonts still rasterizes shapes, so an empty database only degrades
    /// text and is logged rather than treated as fatal.
    fn prepare(&mut self) -> Result<(), CaptureError> {
        if self.fontdb.is_none() {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            if db.is_empty() {
                log::warn!("no system fonts found; exported slide text will not render");
            }
            self.fontdb = Some(Arc::new(db));
        }
        Ok(())
    }

    fn rasterize(
        &mut self,
        staged: &StagedSection,
        options: &RasterOptions,
    ) -> Result<PageBitmap, CaptureError> {
        self.prepare()?;
        let Some(fontdb) = &self.fontdb else {
            return Err(CaptureError("font database unavailable".into()));
        };

        let section = staged.section();
        let svg = render_svg(
            &section.commands,
            f64::from(options.width),
            f64::from(options.height),
            self.dark,
        );

        let mut opt = usvg::Options::default();
        opt.fontdb = fontdb.clone();
        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| CaptureError(format!("svg parse failed for {}: {e}", section.id)))?;

        let width = options.bitmap_width();
        let height = options.bitmap_height();
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| CaptureError(format!("cannot allocate {width}x{height} pixmap")))?;

        let bg = options.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, 0xff));

        let scale = options.scale as f32;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        // Pixmap pixels are premultiplied; the page bitmap contract is
        // straight RGBA8.
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        Ok(PageBitmap {
            width,
            height,
            rgba,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowpitch_core::export::Stage;
    use flowpitch_core::views::render_section;
    use flowpitch_protocol::{Slide, SlideBody};

    fn staged_plain(stage: &mut Stage) -> &StagedSection {
        let section = render_section(
            &Slide {
                headline: "Hello".into(),
                subheadline: None,
                body: SlideBody::Plain,
            },
            0,
        );
        stage.place(&section)
    }

    #[test]
    fn produces_oversampled_bitmap() {
        let mut raster = SvgRasterizer::new(true);
        let mut stage = Stage::new();
        let options = RasterOptions::default();
        let bitmap = raster
            .rasterize(staged_plain(&mut stage), &options)
            .expect("rasterize");
        assert_eq!(bitmap.width, 3840);
        assert_eq!(bitmap.height, 2160);
        assert_eq!(bitmap.rgba.len(), 3840 * 2160 * 4);
    }

    #[test]
    fn background_fills_uncovered_pixels() {
        let mut raster = SvgRasterizer::new(true);
        let mut stage = Stage::new();
        let options = RasterOptions::default();
        let bitmap = raster
            .rasterize(staged_plain(&mut stage), &options)
            .expect("rasterize");
        // The SVG's own background rect covers the canvas with the deck
        // background, so the corner pixel is exactly that color.
        assert_eq!(&bitmap.rgba[..4], &[0x0a, 0x0b, 0x14, 0xff]);
    }

    #[test]
    fn prepare_is_idempotent() {
        let mut raster = SvgRasterizer::new(true);
        raster.prepare().expect("first prepare");
        raster.prepare().expect("second prepare");
    }
}
