//! Deterministic in-memory capability implementations for tests.

use flowpitch_protocol::Rect;

use super::capability::{
    AssemblyError, CaptureError, DocumentAssembler, DocumentOptions, PageBitmap, RasterOptions,
    Rasterizer,
};
use super::stage::StagedSection;

/// A rasterizer that produces fixed background-filled bitmaps and can be
/// told to fail at a specific capture.
#[derive(Debug, Default)]
pub struct FakeRasterizer {
    /// Fail `prepare` (dependency-unavailable analog).
    pub fail_prepare: bool,
    /// Fail the capture with this 0-based call index.
    pub fail_at: Option<usize>,
    captured: Vec<String>,
    saw_unsettled: bool,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn failing_prepare() -> Self {
        Self {
            fail_prepare: true,
            ..Self::default()
        }
    }

    /// Section ids captured so far, in capture order.
    pub fn captured_ids(&self) -> &[String] {
        &self.captured
    }

    /// Whether any capture arrived with an unsettled reveal stage.
    pub fn saw_unsettled(&self) -> bool {
        self.saw_unsettled
    }
}

impl Rasterizer for FakeRasterizer {
    fn prepare(&mut self) -> Result<(), CaptureError> {
        if self.fail_prepare {
            return Err(CaptureError("capture backend unavailable".into()));
        }
        Ok(())
    }

    fn rasterize(
        &mut self,
        staged: &StagedSection,
        options: &RasterOptions,
    ) -> Result<PageBitmap, CaptureError> {
        let call = self.captured.len();
        if self.fail_at == Some(call) {
            return Err(CaptureError(format!("backend rejected capture {call}")));
        }
        if !staged.is_settled() {
            self.saw_unsettled = true;
        }
        self.captured.push(staged.section().id.clone());
        Ok(PageBitmap::filled(
            options.bitmap_width(),
            options.bitmap_height(),
            options.background,
        ))
    }
}

/// A document builder that records pages and images instead of writing
/// anything.
#[derive(Debug, Default)]
pub struct FakeAssembler {
    /// Fail the final save step.
    pub fail_save: bool,
    constructed: Option<DocumentOptions>,
    pages: usize,
    images: Vec<(u32, u32, Rect)>,
    saved: Option<String>,
}

impl FakeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_save() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    /// Pages in the document so far (the first page is implicit in
    /// `construct`).
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// (bitmap width, bitmap height, placement bounds) per added image.
    pub fn images(&self) -> &[(u32, u32, Rect)] {
        &self.images
    }

    /// The filename passed to `save`, if the document was saved.
    pub fn saved_as(&self) -> Option<&str> {
        self.saved.as_deref()
    }
}

impl DocumentAssembler for FakeAssembler {
    fn construct(&mut self, options: &DocumentOptions) -> Result<(), AssemblyError> {
        self.constructed = Some(options.clone());
        self.pages = 1;
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), AssemblyError> {
        if self.constructed.is_none() {
            return Err(AssemblyError("add_page before construct".into()));
        }
        self.pages += 1;
        Ok(())
    }

    fn add_image(&mut self, bitmap: &PageBitmap, bounds: Rect) -> Result<(), AssemblyError> {
        if self.constructed.is_none() {
            return Err(AssemblyError("add_image before construct".into()));
        }
        self.images.push((bitmap.width, bitmap.height, bounds));
        Ok(())
    }

    fn save(&mut self, filename: &str) -> Result<(), AssemblyError> {
        if self.fail_save {
            return Err(AssemblyError("disk full".into()));
        }
        self.saved = Some(filename.to_string());
        Ok(())
    }
}
