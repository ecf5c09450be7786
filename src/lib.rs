//! pixsprite - Pixel art converter and spritemap packer
//!
//! A library for turning raster images into blocky pixel-art renditions and
//! packing batches of images into a single grid spritemap.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod output;
pub mod render;
pub mod types;

pub use discovery::{load_manifest, scan, DiscoveryConfig, Manifest, ScanResult, SortOrder};
pub use error::{Result, SpriteError};
pub use render::{
    auto_contrast, decode, encode, pixelate, upscale_nearest, write_sheet_json, AtlasLayout,
    Frame, OutputFormat, SheetMeta, SpritemapPacker,
};
pub use types::{Colour, PixelationConfig, Sprite};
