//! Core domain types for pixsprite.
//!
//! This module contains the small value types shared by the pipeline:
//! - `Colour` - RGBA colour values (spritemap background)
//! - `PixelationConfig` - Validated pixelation settings
//! - `Sprite` - A named image handed to the spritemap packer

mod colour;
mod pixelation;
mod sprite;

pub use colour::Colour;
pub use pixelation::{PixelationConfig, DEFAULT_PIXEL_SIZE};
pub use sprite::Sprite;
