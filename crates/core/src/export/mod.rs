//! The export pipeline: stage, capture, and assemble one page per slide.
//!
//! ```text
//!   Idle ─▶ LoadingDependencies ─▶ Rendering(i = 0..n-1) ─▶ Saving ─▶ Idle
//!                    │                      │                  │
//!                    └──────────────────────┴──────────────────┴─▶ Failed ─▶ Idle
//! ```
//!
//! Capture backends are injected capabilities ([`Rasterizer`],
//! [`DocumentAssembler`]): the real adapters live in `flowpitch-export`,
//! deterministic fakes in [`fake`].

pub mod capability;
pub mod fake;
mod stage;

use thiserror::Error;

use crate::views::SlideSection;

pub use capability::{
    AssemblyError, CaptureError, DECK_BACKGROUND, DocumentAssembler, DocumentOptions, OVERSAMPLE,
    Orientation, PAGE_HEIGHT, PAGE_WIDTH, PageBitmap, RasterOptions, Rasterizer,
};
pub use stage::{Stage, StagedSection};

/// Default artifact name for the downloaded document.
pub const DEFAULT_FILENAME: &str = "FlowPitch.pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export dependency unavailable: {0}")]
    Dependency(#[source] CaptureError),
    #[error("failed to capture slide {index}: {source}")]
    Capture {
        index: usize,
        #[source]
        source: CaptureError,
    },
    #[error("failed to assemble document: {0}")]
    Assembly(#[source] AssemblyError),
    #[error("failed to save document: {0}")]
    Save(#[source] AssemblyError),
}

/// Where the pipeline currently is. `Failed` is a pass-through state: the
/// pipeline always lands back on `Idle` so the trigger control re-arms,
/// success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    LoadingDependencies,
    Rendering { current: usize },
    Saving,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub filename: String,
    pub document: DocumentOptions,
    pub raster: RasterOptions,
}

impl ExportOptions {
    /// The standard deck export: `FlowPitch.pdf`, 1920×1080 landscape
    /// pages, 2× raster over the dark background.
    pub fn deck(title: impl Into<String>) -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            document: DocumentOptions::deck_page(title),
            raster: RasterOptions::default(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

/// Summary of a completed export.
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub filename: String,
    pub pages: usize,
}

/// Drives the capture loop over the shared staging area.
///
/// Strictly sequential: the stage is cleared and repopulated between
/// iterations, so capture `i + 1` never starts before capture `i`'s bitmap
/// has been appended to the document.
#[derive(Debug)]
pub struct ExportPipeline<R, A> {
    rasterizer: R,
    assembler: A,
    stage: Stage,
    state: ExportState,
    last_error: Option<String>,
}

impl<R: Rasterizer, A: DocumentAssembler> ExportPipeline<R, A> {
    pub fn new(rasterizer: R, assembler: A) -> Self {
        Self {
            rasterizer,
            assembler,
            stage: Stage::new(),
            state: ExportState::Idle,
            last_error: None,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Message from the most recent failed export, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Recover the injected capabilities (used by tests to inspect fakes).
    pub fn into_parts(self) -> (R, A) {
        (self.rasterizer, self.assembler)
    }

    /// Run a full export over the given sections.
    ///
    /// Any step's failure aborts the export with no partial document
    /// saved. Cleanup is unconditional: the stage is cleared and the state
    /// returns to `Idle` on every path out of this function.
    pub fn export(
        &mut self,
        sections: &[SlideSection],
        options: &ExportOptions,
    ) -> Result<ExportReceipt, ExportError> {
        let result = self.run(sections, options);

        self.stage.clear();
        match &result {
            Ok(receipt) => {
                log::info!(
                    "exported {} page(s) to {}",
                    receipt.pages,
                    receipt.filename
                );
                self.last_error = None;
            }
            Err(err) => {
                self.state = ExportState::Failed;
                log::error!("export aborted: {err}");
                self.last_error = Some(err.to_string());
            }
        }
        self.state = ExportState::Idle;

        result
    }

    fn run(
        &mut self,
        sections: &[SlideSection],
        options: &ExportOptions,
    ) -> Result<ExportReceipt, ExportError> {
        self.state = ExportState::LoadingDependencies;
        self.rasterizer.prepare().map_err(ExportError::Dependency)?;

        // Construction creates the first page implicitly.
        self.assembler
            .construct(&options.document)
            .map_err(ExportError::Assembly)?;

        let bounds = options.document.full_page();
        for (index, section) in sections.iter().enumerate() {
            self.state = ExportState::Rendering { current: index };

            self.stage.clear();
            let staged = self.stage.place(section);
            let bitmap = self
                .rasterizer
                .rasterize(staged, &options.raster)
                .map_err(|source| ExportError::Capture { index, source })?;

            if index > 0 {
                self.assembler.add_page().map_err(ExportError::Assembly)?;
            }
            self.assembler
                .add_image(&bitmap, bounds)
                .map_err(ExportError::Assembly)?;
        }

        self.state = ExportState::Saving;
        self.assembler
            .save(&options.filename)
            .map_err(ExportError::Save)?;

        Ok(ExportReceipt {
            filename: options.filename.clone(),
            pages: sections.len().max(1),
        })
    }
}
