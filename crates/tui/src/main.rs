mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flowpitch_core::export::{DEFAULT_FILENAME, ExportOptions, ExportPipeline};
use flowpitch_export::{PdfAssembler, SvgRasterizer};

/// Present a JSON slide deck in the terminal and export it to PDF.
#[derive(Parser)]
#[command(name = "flowpitch", version)]
struct Args {
    /// Path to the deck content document.
    #[arg(default_value = "content.json")]
    deck: PathBuf,

    /// Export the deck to PDF and exit instead of opening the viewer.
    #[arg(long)]
    export_pdf: bool,

    /// File name for the exported document.
    #[arg(long)]
    output: Option<String>,

    /// Use the light color palette.
    #[arg(long)]
    light: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // A load failure aborts startup with an explicit error surface —
    // never a blank screen.
    let deck = flowpitch_core::loader::load_deck(&args.deck)
        .with_context(|| format!("failed to load deck from {}", args.deck.display()))?;
    let sections = flowpitch_core::views::render_deck(&deck);

    let dark = !args.light;
    let filename = args
        .output
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    if args.export_pdf {
        let mut pipeline = ExportPipeline::new(SvgRasterizer::new(dark), PdfAssembler::new());
        let options = ExportOptions::deck(deck.meta.title.clone()).with_filename(&filename);
        let receipt = pipeline
            .export(&sections, &options)
            .with_context(|| format!("failed to export {filename}"))?;
        println!("saved {} ({} page(s))", receipt.filename, receipt.pages);
        return Ok(());
    }

    renderer::run_viewer(&deck, &sections, dark, &filename)
}
