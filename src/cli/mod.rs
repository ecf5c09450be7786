pub mod completions;
pub mod init;
pub mod pack;
pub mod pixelate;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::discovery::{DiscoveryConfig, Manifest, SortOrder};
use crate::error::{SpriteError, Result};
use crate::output::Verbosity;
use crate::render::OutputFormat;
use crate::types::Colour;

/// pixsprite - Pixel art converter and spritemap packer
#[derive(Parser, Debug)]
#[command(name = "pixsprite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only print warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Print extra detail
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Path to a pixsprite.yaml (default: ./pixsprite.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert images (PNG/TGA) into pixel art
    Pixelate(pixelate::PixelateArgs),

    /// Pack existing images into a spritemap without pixelating them
    Pack(pack::PackArgs),

    /// Initialize a pixsprite project (generates pixsprite.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Where to read images from and write results to.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Image file or directory of images
    pub input: PathBuf,

    /// Output directory [default: current directory]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Processing and spritemap order [default: listing]
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Descend into subdirectories
    #[arg(long, short)]
    pub recursive: bool,
}

impl InputArgs {
    /// Output directory, falling back to the manifest.
    pub fn output_dir(&self, manifest: &Manifest) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| manifest.output.clone())
    }

    /// Discovery settings with command line overrides applied.
    pub fn discovery_config(&self, manifest: &Manifest) -> DiscoveryConfig {
        DiscoveryConfig::from_manifest(manifest)
            .with_recursive(self.recursive || manifest.recursive)
            .with_sort(self.sort.unwrap_or(manifest.sort))
    }
}

/// Spritemap output options.
#[derive(Args, Debug, Clone, Default)]
pub struct SpritemapArgs {
    /// Spritemap file format [default: png]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Spritemap background colour (#RGB, #RGBA, #RRGGBB or #RRGGBBAA) [default: transparent]
    #[arg(long)]
    pub background: Option<Colour>,

    /// Also write a TexturePacker JSON file describing each frame
    #[arg(long)]
    pub metadata: bool,
}

/// Resolved spritemap settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSettings {
    pub format: OutputFormat,
    pub background: Colour,
    pub metadata: bool,
}

impl SpritemapArgs {
    pub fn resolve(&self, manifest: &Manifest) -> SheetSettings {
        SheetSettings {
            format: self.format.unwrap_or(manifest.format),
            background: self.background.unwrap_or(manifest.background),
            metadata: self.metadata || manifest.metadata,
        }
    }
}

/// Create the output directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| SpriteError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    Ok(())
}

/// Path of a discovered `file` relative to the scanned `root`. A single file
/// input maps to its own file name.
pub fn relative_to(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| file.to_path_buf())
}

/// Spritemap frame name for a relative path, `/`-separated on every platform.
pub fn frame_name(relative: &Path) -> String {
    relative
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
