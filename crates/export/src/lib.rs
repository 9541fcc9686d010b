//! Real capture backends for the export pipeline.
//!
//! [`SvgRasterizer`] renders a staged section through the core SVG renderer
//! and rasterizes it with `resvg`; [`PdfAssembler`] accumulates the
//! resulting bitmaps into a paginated PDF via `printpdf`. Both plug into
//! `flowpitch_core::export::ExportPipeline` behind the capability traits.

pub mod pdf;
pub mod raster;

pub use pdf::PdfAssembler;
pub use raster::SvgRasterizer;
