//! Example: center-normalize a single text-line image.
//!
//! Loads a grayscale line (dark ink on a bright page), straightens it around
//! its centerline and rescales it to the target height. The normalized line is
//! written as PNG next to the input; params and timing are printed as JSON.
//!
//! Run from the workspace root:
//!   cargo run -p linenorm --example dewarp_line -- --help
//!   cargo run -p linenorm --example dewarp_line -- --input data/line_0.png

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::{GrayImage, ImageReader};
use linenorm::{CenterConfig, CenterNormalizer, Image, NormalizationParams};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Center-normalize a text-line image to a fixed height")]
struct Args {
    /// Path to the line image
    #[arg(long, default_value = "data/line_0.png")]
    input: PathBuf,

    /// Output line height in pixels
    #[arg(long, default_value_t = 48)]
    target_height: usize,

    /// Output PNG path (default: <input stem>_norm.png next to input)
    #[arg(long)]
    out: Option<PathBuf>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report {
    input: [usize; 2],
    output: [usize; 2],
    params: NormalizationParams,
    /// Source x of the last output column.
    right_edge_x: f64,
    /// Wall-clock time for the normalization, in milliseconds.
    elapsed_ms: f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn default_out_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let dir = input.parent().unwrap_or(Path::new("."));
    dir.join(format!("{stem}_norm.png"))
}

fn load_line(path: &Path) -> Result<Image<u8>> {
    let gray = ImageReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .decode()
        .with_context(|| format!("decoding {}", path.display()))?
        .into_luma8();
    let (w, h) = gray.dimensions();
    Image::from_vec(w as usize, h as usize, gray.into_raw()).context("building line Image")
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let out_path = args.out.unwrap_or_else(|| default_out_path(&args.input));

    let line = load_line(&args.input)?;
    info!(
        path = %args.input.display(),
        width = line.width(),
        height = line.height(),
        "loaded line"
    );

    let normalizer = CenterNormalizer::new(CenterConfig {
        target_height: args.target_height,
        ..CenterConfig::default()
    })
    .context("building normalizer")?;

    let t0 = Instant::now();
    let (out, params) = normalizer
        .process_u8(&line.as_view())
        .context("normalizing line")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    let (w, h) = (out.width(), out.height());
    GrayImage::from_raw(w as u32, h as u32, out.into_vec())
        .context("constructing GrayImage from normalized line")?
        .save(&out_path)
        .with_context(|| format!("saving {}", out_path.display()))?;
    info!(path = %out_path.display(), "normalized line written");

    let report = Report {
        input: [line.width(), line.height()],
        output: [w, h],
        params,
        right_edge_x: params.local_to_global(w as f64),
        elapsed_ms,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing report")?
    );
    Ok(())
}
