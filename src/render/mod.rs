//! Rendering module for pixsprite.
//!
//! This module holds the image transforms: pixelation, auto-contrast,
//! spritemap packing, and the codec wrappers that read and write files.

mod codec;
mod contrast;
mod pixelate;
mod sheet;

pub use codec::{decode, encode, OutputFormat};
pub use contrast::auto_contrast;
pub use pixelate::{pixelate, upscale_nearest};
pub use sheet::{write_sheet_json, AtlasLayout, Frame, SheetMeta, SpritemapPacker};
