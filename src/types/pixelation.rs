//! Pixelation settings.

use crate::error::{SpriteError, Result};

/// Block size used when neither the command line nor `pixsprite.yaml` sets one.
pub const DEFAULT_PIXEL_SIZE: u32 = 16;

/// Settings for a single pixelation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelationConfig {
    /// Edge length of one output block, in source pixels.
    pub pixel_size: u32,
    /// Stretch each colour channel to the full 0..=255 range afterwards.
    pub auto_adjust: bool,
}

impl PixelationConfig {
    /// Create a validated config.
    pub fn new(pixel_size: u32, auto_adjust: bool) -> Result<Self> {
        let config = Self {
            pixel_size,
            auto_adjust,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject a block size of zero.
    pub fn validate(&self) -> Result<()> {
        if self.pixel_size == 0 {
            return Err(SpriteError::InvalidConfig {
                message: "pixel size must be at least 1".to_string(),
                help: Some("Suggested values: 4, 8, 16, 32".to_string()),
            });
        }
        Ok(())
    }

    /// Dimensions of the reduced grid for a `width` x `height` source.
    ///
    /// Never smaller than 1x1, so images narrower than one block still
    /// produce a single block.
    pub fn reduced_size(&self, width: u32, height: u32) -> (u32, u32) {
        let size = self.pixel_size.max(1);
        ((width / size).max(1), (height / size).max(1))
    }
}

impl Default for PixelationConfig {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            auto_adjust: false,
        }
    }
}
