//! Pixelate command implementation.
//!
//! Discovers input images, pixelates each one on a worker pool, writes the
//! results and optionally packs them into a spritemap. A file that fails is
//! reported and skipped; the batch only fails when nothing succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use rayon::prelude::*;

use crate::discovery::{scan, Manifest};
use crate::error::{SpriteError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{decode, encode, pixelate};
use crate::types::{PixelationConfig, Sprite};

use super::pack::write_spritemap;
use super::{ensure_output_dir, frame_name, relative_to, InputArgs, SpritemapArgs};

/// Suffix added to the file stem of every pixelated output.
pub const OUTPUT_SUFFIX: &str = "_pixelated";

/// Convert images (PNG/TGA) into pixel art
#[derive(Args, Debug)]
pub struct PixelateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Pixelation level. Suggested values: 4, 8, 16, 32 [default: 16]
    #[arg(long, short)]
    pub pixel_size: Option<u32>,

    /// Generate a spritemap with all processed images
    #[arg(long, short)]
    pub spritemap: bool,

    /// Apply auto-contrast adjustment to enhance clarity
    #[arg(long, short)]
    pub auto_adjust: bool,

    #[command(flatten)]
    pub sheet: SpritemapArgs,

    /// Number of worker threads [default: one per CPU]
    #[arg(long, short)]
    pub jobs: Option<usize>,
}

/// What a batch produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Written images, in discovery order.
    pub outputs: Vec<PathBuf>,
    /// Inputs that could not be processed.
    pub failed: Vec<PathBuf>,
    /// The spritemap, when one was written.
    pub spritemap: Option<PathBuf>,
}

pub fn run(args: PixelateArgs, manifest: &Manifest, printer: &Printer) -> Result<BatchReport> {
    let config = PixelationConfig::new(
        args.pixel_size.unwrap_or(manifest.pixel_size),
        args.auto_adjust || manifest.auto_adjust,
    )?;
    let want_spritemap = args.spritemap || manifest.spritemap;

    let output_dir = args.input.output_dir(manifest);
    ensure_output_dir(&output_dir)?;

    let discovery = args.input.discovery_config(manifest);
    let found = scan(&args.input.input, &discovery)?;

    if args.input.input.is_file() && found.is_empty() {
        printer.warning(
            "Warning",
            &format!(
                "{} does not have a supported extension ({})",
                display_path(&args.input.input),
                discovery.extensions().join(", ")
            ),
        );
    } else {
        for path in &found.ignored {
            printer.verbose("Ignoring", &display_path(path));
        }
    }

    if found.is_empty() {
        return Err(SpriteError::EmptyInput {
            message: "no images found to process".to_string(),
            help: Some(format!(
                "Looked for {} files in {}",
                discovery.extensions().join("/"),
                display_path(&args.input.input)
            )),
        });
    }

    printer.info(
        "Found",
        &format!(
            "{} (pixel size {}{})",
            plural(found.files.len(), "image", "images"),
            config.pixel_size,
            if config.auto_adjust { ", auto-contrast" } else { "" }
        ),
    );

    let pool = build_pool(args.jobs)?;
    let results: Vec<Result<Processed>> = pool.install(|| {
        found
            .files
            .par_iter()
            .map(|path| {
                let relative = relative_to(&args.input.input, path);
                process_file(path, &relative, &output_dir, &config, want_spritemap)
            })
            .collect()
    });

    let mut report = BatchReport::default();
    let mut sprites = Vec::new();

    for (path, result) in found.files.iter().zip(results) {
        match result {
            Ok(processed) => {
                let ((w, h), (small_w, small_h)) = processed.reduced;
                printer.verbose(
                    "Reducing",
                    &format!("{} {}x{} -> {}x{}", display_path(path), w, h, small_w, small_h),
                );
                printer.success("Saved", &display_path(&processed.output));
                report.outputs.push(processed.output);
                sprites.extend(processed.sprite);
            }
            Err(e) => {
                printer.error("Error", &format!("{}: {}", display_path(path), e));
                report.failed.push(path.clone());
            }
        }
    }

    if report.outputs.is_empty() {
        return Err(SpriteError::EmptyInput {
            message: format!(
                "none of the {} could be processed",
                plural(found.files.len(), "image", "images")
            ),
            help: None,
        });
    }

    if want_spritemap {
        let settings = args.sheet.resolve(manifest);
        report.spritemap = write_spritemap(&sprites, &output_dir, &settings, printer)?;
    }

    let summary = if report.failed.is_empty() {
        plural(report.outputs.len(), "image", "images")
    } else {
        format!(
            "{} ({} failed)",
            plural(report.outputs.len(), "image", "images"),
            report.failed.len()
        )
    };
    printer.success(
        "Finished",
        &format!("{} to {}", summary, printer.bold(&display_path(&output_dir))),
    );

    Ok(report)
}

/// One successfully pixelated file.
struct Processed {
    output: PathBuf,
    /// Source and reduced grid dimensions.
    reduced: ((u32, u32), (u32, u32)),
    /// Kept only when a spritemap will be packed.
    sprite: Option<Sprite>,
}

/// Decode, pixelate and save a single image.
///
/// Runs on a worker thread, so all reporting is left to the caller.
fn process_file(
    path: &Path,
    relative: &Path,
    output_dir: &Path,
    config: &PixelationConfig,
    keep: bool,
) -> Result<Processed> {
    let source = decode(path)?;
    let size = source.dimensions();
    let reduced = (size, config.reduced_size(size.0, size.1));

    let result = pixelate(&source, config)?;
    drop(source);

    let output = output_path(relative, output_dir);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| SpriteError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    encode(&result, &output)?;

    let sprite = keep.then(|| Sprite::new(frame_name(&relative_to(output_dir, &output)), result));

    Ok(Processed {
        output,
        reduced,
        sprite,
    })
}

/// `<output_dir>/<dirs>/<stem>_pixelated.<ext>` for an input at
/// `<dirs>/<stem>.<ext>` relative to the scanned root.
///
/// The input's extension is kept instead of always writing `.png`, so TGA
/// sources produce TGA outputs.
pub fn output_path(relative: &Path, output_dir: &Path) -> PathBuf {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let ext = relative
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());

    output_dir.join(relative.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext)))
}

fn build_pool(jobs: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = jobs {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| SpriteError::InvalidConfig {
        message: format!("Failed to start worker threads: {}", e),
        help: Some("Try a smaller --jobs value".to_string()),
    })
}
