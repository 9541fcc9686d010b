use flowpitch_protocol::{Color, Rect};
use thiserror::Error;

use super::stage::StagedSection;

/// Export page width in design pixels.
pub const PAGE_WIDTH: u32 = 1920;
/// Export page height in design pixels.
pub const PAGE_HEIGHT: u32 = 1080;
/// Raster oversampling factor applied on top of the page size.
pub const OVERSAMPLE: f64 = 2.0;
/// The deck's dark theme background, used behind every captured page.
pub const DECK_BACKGROUND: Color = Color::rgb(0x0a, 0x0b, 0x14);

/// A capture backend failure. Wrapped by the pipeline into
/// [`super::ExportError`] with slide context.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CaptureError(pub String);

/// A document builder failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AssemblyError(pub String);

/// Options for rasterizing one staged section.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub width: u32,
    pub height: u32,
    /// Oversampling factor; the produced bitmap is `width * scale` wide.
    pub scale: f64,
    pub background: Color,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            scale: OVERSAMPLE,
            background: DECK_BACKGROUND,
        }
    }
}

impl RasterOptions {
    /// Pixel width of the bitmap this option set produces.
    pub fn bitmap_width(&self) -> u32 {
        (f64::from(self.width) * self.scale) as u32
    }

    pub fn bitmap_height(&self) -> u32 {
        (f64::from(self.height) * self.scale) as u32
    }
}

/// One captured page: tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct PageBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PageBitmap {
    /// A bitmap uniformly filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            rgba.extend_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// Page orientation for the assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Options for constructing the output document.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    pub title: String,
    pub orientation: Orientation,
    /// Page size in design pixels.
    pub page_width: f64,
    pub page_height: f64,
}

impl DocumentOptions {
    /// The fixed deck page: 1920×1080 landscape.
    pub fn deck_page(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            orientation: Orientation::Landscape,
            page_width: f64::from(PAGE_WIDTH),
            page_height: f64::from(PAGE_HEIGHT),
        }
    }

    /// Full-page image bounds: (0,0) to (page_width, page_height).
    pub fn full_page(&self) -> Rect {
        Rect::new(0.0, 0.0, self.page_width, self.page_height)
    }
}

/// Capture capability: turns a staged section into a page bitmap.
///
/// Injected into the pipeline so the real backend (SVG → raster) and the
/// deterministic test fake are interchangeable.
pub trait Rasterizer {
    /// Acquire external resources (fonts, codecs) before the first capture.
    /// Called once per export; failure aborts the export as a dependency
    /// error before any page is rendered.
    fn prepare(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn rasterize(
        &mut self,
        staged: &StagedSection,
        options: &RasterOptions,
    ) -> Result<PageBitmap, CaptureError>;
}

/// Document-assembly capability: a stateful page builder.
///
/// `construct` creates the document and its first page implicitly; each
/// later page is added explicitly before its image. Pages accumulate in
/// call order.
pub trait DocumentAssembler {
    fn construct(&mut self, options: &DocumentOptions) -> Result<(), AssemblyError>;

    fn add_page(&mut self) -> Result<(), AssemblyError>;

    /// Place a bitmap on the current page at the given bounds (in page
    /// units).
    fn add_image(&mut self, bitmap: &PageBitmap, bounds: Rect) -> Result<(), AssemblyError>;

    /// Finalize and hand the document to the user under the given name.
    fn save(&mut self, filename: &str) -> Result<(), AssemblyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_defaults_match_the_deck_page() {
        let opts = RasterOptions::default();
        assert_eq!(opts.bitmap_width(), 3840);
        assert_eq!(opts.bitmap_height(), 2160);
        assert_eq!(opts.background.to_hex(), "#0a0b14");
    }

    #[test]
    fn filled_bitmap_is_tightly_packed() {
        let bmp = PageBitmap::filled(4, 2, Color::rgb(1, 2, 3));
        assert_eq!(bmp.rgba.len(), 4 * 2 * 4);
        assert_eq!(&bmp.rgba[..4], &[1, 2, 3, 0xff]);
    }

    #[test]
    fn full_page_bounds_start_at_origin() {
        let opts = DocumentOptions::deck_page("Deck");
        let bounds = opts.full_page();
        assert_eq!((bounds.x, bounds.y), (0.0, 0.0));
        assert_eq!((bounds.w, bounds.h), (1920.0, 1080.0));
    }
}
