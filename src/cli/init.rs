//! Init command implementation.
//!
//! Generates a `pixsprite.yaml` manifest for a directory of images.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{scan, DiscoveryConfig, Manifest, MANIFEST_FILENAME};
use crate::error::{SpriteError, Result};
use crate::output::{display_path, plural, Printer};
use crate::types::PixelationConfig;

use super::pack::SPRITEMAP_STEM;
use super::pixelate::OUTPUT_SUFFIX;

/// Initialize a pixsprite project by generating a pixsprite.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Default pixel size to record
    #[arg(long, short)]
    pub pixel_size: Option<u32>,

    /// Overwrite existing pixsprite.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    // Check for existing manifest
    if manifest_path.exists() && !args.force {
        return Err(SpriteError::InvalidConfig {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let mut manifest = Manifest {
        // Keep earlier results out of later runs over the same directory
        excludes: vec![
            format!("*{}.*", OUTPUT_SUFFIX),
            format!("{}.*", SPRITEMAP_STEM),
        ],
        ..Default::default()
    };

    if let Some(pixel_size) = args.pixel_size {
        PixelationConfig::new(pixel_size, false)?;
        manifest.pixel_size = pixel_size;
    }

    printer.status("Scanning", &display_path(&args.path));
    let flat_config = DiscoveryConfig::from_manifest(&manifest);
    let mut found = scan(&args.path, &flat_config)?.files.len();

    // Images only in subdirectories: record that discovery should recurse
    if found == 0 {
        let deep = scan(&args.path, &flat_config.with_recursive(true))?.files.len();
        if deep > 0 {
            manifest.recursive = true;
            found = deep;
        }
    }

    let yaml = manifest.to_yaml()?;
    fs::write(&manifest_path, &yaml).map_err(|e| SpriteError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    printer.success(
        "Created",
        &format!("{} ({} found)", MANIFEST_FILENAME, plural(found, "image", "images")),
    );

    Ok(())
}
