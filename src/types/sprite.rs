//! Named images for spritemap packing.

use image::RgbaImage;

/// An image together with the name its spritemap frame is listed under.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub image: RgbaImage,
}

impl Sprite {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
