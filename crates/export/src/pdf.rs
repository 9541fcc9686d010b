use std::fs::File;
use std::io::BufWriter;

use flowpitch_core::export::{AssemblyError, DocumentAssembler, DocumentOptions, PageBitmap};
use flowpitch_protocol::Rect;
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

/// Design pixels per millimeter at the 96 dpi CSS reference.
const PX_PER_MM: f64 = 96.0 / 25.4;

/// Accumulates page bitmaps into a PDF document.
///
/// `construct` creates the document with its first page; `add_page` appends
/// further pages; `save` consumes the document and writes it out. The page
/// size is the deck's 1920×1080 design space converted to millimeters.
#[derive(Default)]
pub struct PdfAssembler {
    doc: Option<PdfDocumentReference>,
    layer: Option<PdfLayerReference>,
    page_mm: (f64, f64),
    pages: usize,
}

impl PdfAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages in the document so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }
}

impl DocumentAssembler for PdfAssembler {
    fn construct(&mut self, options: &DocumentOptions) -> Result<(), AssemblyError> {
        let w_mm = options.page_width / PX_PER_MM;
        let h_mm = options.page_height / PX_PER_MM;
        let (doc, page, layer) =
            PdfDocument::new(&options.title, Mm(w_mm as f32), Mm(h_mm as f32), "Slide");
        self.layer = Some(doc.get_page(page).get_layer(layer));
        self.doc = Some(doc);
        self.page_mm = (w_mm, h_mm);
        self.pages = 1;
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), AssemblyError> {
        let doc = self
            .doc
            .as_ref()
            .ok_or_else(|| AssemblyError("add_page before construct".into()))?;
        let (w_mm, h_mm) = self.page_mm;
        let (page, layer) = doc.add_page(Mm(w_mm as f32), Mm(h_mm as f32), "Slide");
        self.layer = Some(doc.get_page(page).get_layer(layer));
        self.pages += 1;
        Ok(())
    }

    fn add_image(&mut self, bitmap: &PageBitmap, bounds: Rect) -> Result<(), AssemblyError> {
        let layer = self
            .layer
            .clone()
            .ok_or_else(|| AssemblyError("add_image before construct".into()))?;

        // The PDF carries opaque pages; drop the alpha channel.
        let rgb: Vec<u8> = bitmap
            .rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        let buffer =
            printpdf::image_crate::RgbImage::from_raw(bitmap.width, bitmap.height, rgb)
                .ok_or_else(|| AssemblyError("bitmap dimensions do not match its data".into()))?;
        let image =
            Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(buffer));

        // Scale the oversampled bitmap back down to the page bounds.
        let dpi = f64::from(bitmap.width) * 25.4 / (bounds.w / PX_PER_MM);
        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm((bounds.x / PX_PER_MM) as f32)),
                translate_y: Some(Mm((bounds.y / PX_PER_MM) as f32)),
                dpi: Some(dpi as f32),
                ..ImageTransform::default()
            },
        );
        Ok(())
    }

    fn save(&mut self, filename: &str) -> Result<(), AssemblyError> {
        let doc = self
            .doc
            .take()
            .ok_or_else(|| AssemblyError("save before construct".into()))?;
        self.layer = None;

        let file = File::create(filename)
            .map_err(|e| AssemblyError(format!("cannot create {filename}: {e}")))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| AssemblyError(format!("cannot write {filename}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowpitch_core::export::{DECK_BACKGROUND, DocumentOptions};

    fn tiny_bitmap() -> PageBitmap {
        PageBitmap::filled(8, 4, DECK_BACKGROUND)
    }

    fn full_page() -> Rect {
        DocumentOptions::deck_page("t").full_page()
    }

    #[test]
    fn pages_accumulate_in_call_order() {
        let mut assembler = PdfAssembler::new();
        assembler
            .construct(&DocumentOptions::deck_page("Deck"))
            .expect("construct");
        assert_eq!(assembler.page_count(), 1);

        assembler
            .add_image(&tiny_bitmap(), full_page())
            .expect("image 0");
        assembler.add_page().expect("page 1");
        assembler
            .add_image(&tiny_bitmap(), full_page())
            .expect("image 1");
        assert_eq!(assembler.page_count(), 2);
    }

    #[test]
    fn save_writes_a_pdf() {
        let path = std::env::temp_dir().join(format!("flowpitch-save-{}.pdf", std::process::id()));
        let filename = path.to_string_lossy().into_owned();

        let mut assembler = PdfAssembler::new();
        assembler
            .construct(&DocumentOptions::deck_page("Deck"))
            .expect("construct");
        assembler
            .add_image(&tiny_bitmap(), full_page())
            .expect("image");
        assembler.save(&filename).expect("save");

        let written = std::fs::read(&path).expect("read back");
        assert!(written.starts_with(b"%PDF"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn operations_before_construct_are_rejected() {
        let mut assembler = PdfAssembler::new();
        assert!(assembler.add_page().is_err());
        assert!(assembler.add_image(&tiny_bitmap(), full_page()).is_err());
        assert!(assembler.save("never.pdf").is_err());
    }
}
