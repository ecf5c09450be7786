//! Project manifest (pixsprite.yaml) parsing.
//!
//! The manifest holds per-project defaults. Command line flags override
//! anything set here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SpriteError, Result};
use crate::render::OutputFormat;
use crate::types::{Colour, DEFAULT_PIXEL_SIZE};

use super::scanner::{SortOrder, DEFAULT_EXTENSIONS};

/// Project manifest loaded from pixsprite.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Output directory for pixelated images and the spritemap.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Default block size.
    #[serde(default = "default_pixel_size")]
    pub pixel_size: u32,

    /// Apply auto-contrast by default.
    pub auto_adjust: bool,

    /// Generate a spritemap by default.
    pub spritemap: bool,

    /// Write the spritemap JSON sidecar by default.
    pub metadata: bool,

    /// File extensions treated as input images (case-insensitive, no dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    /// Order in which discovered files are processed and packed.
    pub sort: SortOrder,

    /// Descend into subdirectories.
    pub recursive: bool,

    /// Spritemap file format.
    pub format: OutputFormat,

    /// Spritemap background colour.
    #[serde(default = "default_background")]
    pub background: Colour,
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

fn default_pixel_size() -> u32 {
    DEFAULT_PIXEL_SIZE
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_background() -> Colour {
    Colour::TRANSPARENT
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            output: default_output(),
            pixel_size: default_pixel_size(),
            auto_adjust: false,
            spritemap: false,
            metadata: false,
            extensions: default_extensions(),
            excludes: vec![],
            sort: SortOrder::default(),
            recursive: false,
            format: OutputFormat::default(),
            background: default_background(),
        }
    }
}

impl Manifest {
    /// Load manifest from a pixsprite.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid manifest with every default
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| SpriteError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check pixsprite.yaml syntax".to_string()),
        })
    }

    /// Render the manifest as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| SpriteError::Parse {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }
}
