//! Pack command implementation.
//!
//! Packs a set of existing images into a spritemap as-is. The same writer
//! is used by `pixelate --spritemap`.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan, Manifest};
use crate::error::{SpriteError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{decode, encode, write_sheet_json, SpritemapPacker};
use crate::types::Sprite;

use super::{ensure_output_dir, frame_name, relative_to, InputArgs, SheetSettings, SpritemapArgs};

/// Base file name of the spritemap and its metadata sidecar.
pub const SPRITEMAP_STEM: &str = "spritemap";

/// Pack existing images into a spritemap without pixelating them
#[derive(Args, Debug)]
pub struct PackArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub sheet: SpritemapArgs,
}

pub fn run(args: PackArgs, manifest: &Manifest, printer: &Printer) -> Result<PathBuf> {
    let output_dir = args.input.output_dir(manifest);
    ensure_output_dir(&output_dir)?;

    let discovery = args.input.discovery_config(manifest);
    let found = scan(&args.input.input, &discovery)?;

    let mut sprites = Vec::with_capacity(found.files.len());
    for path in &found.files {
        match decode(path) {
            Ok(image) => {
                printer.verbose(
                    "Loaded",
                    &format!("{} ({}x{})", display_path(path), image.width(), image.height()),
                );
                let name = frame_name(&relative_to(&args.input.input, path));
                sprites.push(Sprite::new(name, image));
            }
            Err(e) => printer.error("Error", &format!("{}: {}", display_path(path), e)),
        }
    }

    let settings = args.sheet.resolve(manifest);
    write_spritemap(&sprites, &output_dir, &settings, printer)?.ok_or_else(|| {
        SpriteError::EmptyInput {
            message: "no valid images found for the spritemap".to_string(),
            help: Some(format!(
                "Looked for {} files in {}",
                discovery.extensions().join("/"),
                display_path(&args.input.input)
            )),
        }
    })
}

/// Pack `sprites` and write `spritemap.<ext>` (plus `spritemap.json` when
/// requested) into `output_dir`.
///
/// Returns `Ok(None)` with a warning when there is nothing to pack.
pub fn write_spritemap(
    sprites: &[Sprite],
    output_dir: &Path,
    settings: &SheetSettings,
    printer: &Printer,
) -> Result<Option<PathBuf>> {
    let packer = SpritemapPacker::new(settings.background);
    let Some((sheet, meta)) = packer.pack(sprites) else {
        printer.warning("Skipping", "no images to generate a spritemap");
        return Ok(None);
    };

    let layout = meta.layout;
    printer.verbose(
        "Layout",
        &format!(
            "{}x{} grid of {}x{} cells",
            layout.columns, layout.rows, layout.cell_width, layout.cell_height
        ),
    );

    let image_name = format!("{}.{}", SPRITEMAP_STEM, settings.format.extension());
    let image_path = output_dir.join(&image_name);
    encode(&sheet, &image_path)?;

    if settings.metadata {
        let json_path = output_dir.join(format!("{}.json", SPRITEMAP_STEM));
        write_sheet_json(&meta, &image_name, &json_path)?;
        printer.verbose("Metadata", &display_path(&json_path));
    }

    printer.success(
        "Packed",
        &format!(
            "{} into {} ({}x{})",
            plural(sprites.len(), "sprite", "sprites"),
            display_path(&image_path),
            meta.size.0,
            meta.size.1
        ),
    );

    Ok(Some(image_path))
}
