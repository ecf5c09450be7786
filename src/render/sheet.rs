//! Spritemap packer.
//!
//! Packs sprites into a near-square grid of uniform cells, each sprite
//! centred in its cell. Optionally outputs a TexturePacker-compatible JSON
//! Hash sidecar for game engine interop.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use image::imageops;
use image::RgbaImage;
use serde::Serialize;

use crate::error::{SpriteError, Result};
use crate::types::{Colour, Sprite};

/// A frame in the spritemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Spritemap metadata.
#[derive(Debug, Clone)]
pub struct SheetMeta {
    pub frames: Vec<Frame>,
    pub layout: AtlasLayout,
    pub size: (u32, u32),
}

/// Grid geometry for a spritemap.
///
/// Every cell is as wide as the widest sprite and as tall as the tallest, so
/// no sprite is ever cropped or scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl AtlasLayout {
    /// Compute the layout for sprites of the given sizes.
    ///
    /// Returns `None` when there is nothing to lay out.
    pub fn for_sizes<I>(sizes: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut count: u32 = 0;
        let mut cell_width = 0;
        let mut cell_height = 0;

        for (w, h) in sizes {
            count += 1;
            cell_width = cell_width.max(w);
            cell_height = cell_height.max(h);
        }

        if count == 0 {
            return None;
        }

        let columns = ceil_sqrt(count);
        let rows = count.div_ceil(columns);

        Some(Self {
            cell_width,
            cell_height,
            columns,
            rows,
        })
    }

    /// Total canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.columns * self.cell_width, self.rows * self.cell_height)
    }

    /// Grid cell (column, row) for the sprite at `index`.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index % self.columns, index / self.columns)
    }

    /// Top-left canvas position that centres a `w` x `h` sprite in its cell.
    pub fn placement(&self, index: u32, w: u32, h: u32) -> (u32, u32) {
        let (col, row) = self.cell(index);
        (
            col * self.cell_width + self.cell_width.saturating_sub(w) / 2,
            row * self.cell_height + self.cell_height.saturating_sub(h) / 2,
        )
    }
}

/// Spritemap packer using a uniform grid.
pub struct SpritemapPacker {
    pub background: Colour,
}

impl Default for SpritemapPacker {
    fn default() -> Self {
        Self::new(Colour::TRANSPARENT)
    }
}

impl SpritemapPacker {
    pub fn new(background: Colour) -> Self {
        Self { background }
    }

    /// Pack sprites into a spritemap, in the order given.
    ///
    /// Returns the composited image and frame metadata, or `None` when
    /// `sprites` is empty.
    pub fn pack(&self, sprites: &[Sprite]) -> Option<(RgbaImage, SheetMeta)> {
        let layout = AtlasLayout::for_sizes(sprites.iter().map(|s| (s.width(), s.height())))?;
        let (sheet_width, sheet_height) = layout.canvas_size();

        let mut canvas = RgbaImage::from_pixel(sheet_width, sheet_height, self.background.to_pixel());
        let mut frames: Vec<Frame> = Vec::with_capacity(sprites.len());

        for (idx, sprite) in (0u32..).zip(sprites) {
            let (x, y) = layout.placement(idx, sprite.width(), sprite.height());
            imageops::overlay(&mut canvas, &sprite.image, i64::from(x), i64::from(y));

            frames.push(Frame {
                name: sprite.name.clone(),
                x,
                y,
                w: sprite.width(),
                h: sprite.height(),
            });
        }

        let meta = SheetMeta {
            frames,
            layout,
            size: (sheet_width, sheet_height),
        };

        Some((canvas, meta))
    }
}

/// Smallest `c` with `c * c >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let mut c = f64::from(n).sqrt() as u32;
    while c * c < n {
        c += 1;
    }
    while c > 0 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c
}

/// Write spritemap metadata as TexturePacker-compatible JSON Hash format.
///
/// `image` is the spritemap's file name as recorded in the `meta` block.
/// Frames are keyed by name, so every name must be unique.
pub fn write_sheet_json(meta: &SheetMeta, image: &str, path: &Path) -> Result<()> {
    let mut seen = BTreeSet::new();
    for frame in &meta.frames {
        if !seen.insert(frame.name.as_str()) {
            return Err(SpriteError::Encode {
                path: path.to_path_buf(),
                message: format!("Duplicate frame name '{}' in spritemap metadata", frame.name),
            });
        }
    }

    let output = TexturePackerJson::from_meta(meta, image);
    let json = serde_json::to_string_pretty(&output).map_err(|e| SpriteError::Encode {
        path: path.to_path_buf(),
        message: format!("Failed to serialize spritemap metadata: {}", e),
    })?;
    fs::write(path, json).map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write spritemap metadata: {}", e),
    })?;
    Ok(())
}

// --- TexturePacker JSON serialization types ---

#[derive(Serialize)]
struct TexturePackerJson {
    frames: BTreeMap<String, TPFrame>,
    meta: TPMeta,
}

#[derive(Serialize)]
struct TPFrame {
    frame: TPRect,
    rotated: bool,
    trimmed: bool,
    #[serde(rename = "spriteSourceSize")]
    sprite_source_size: TPRect,
    #[serde(rename = "sourceSize")]
    source_size: TPSize,
}

#[derive(Serialize)]
struct TPRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPSize {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPMeta {
    app: String,
    version: String,
    image: String,
    format: String,
    size: TPSize,
    scale: String,
    grid: TPGrid,
}

#[derive(Serialize)]
struct TPGrid {
    columns: u32,
    rows: u32,
    cell: TPSize,
}

impl TexturePackerJson {
    fn from_meta(meta: &SheetMeta, image: &str) -> Self {
        let mut frames = BTreeMap::new();
        for f in &meta.frames {
            frames.insert(
                f.name.clone(),
                TPFrame {
                    frame: TPRect {
                        x: f.x,
                        y: f.y,
                        w: f.w,
                        h: f.h,
                    },
                    rotated: false,
                    trimmed: false,
                    sprite_source_size: TPRect {
                        x: 0,
                        y: 0,
                        w: f.w,
                        h: f.h,
                    },
                    source_size: TPSize { w: f.w, h: f.h },
                },
            );
        }

        TexturePackerJson {
            frames,
            meta: TPMeta {
                app: "pixsprite".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                image: image.to_string(),
                format: "RGBA8888".to_string(),
                size: TPSize {
                    w: meta.size.0,
                    h: meta.size.1,
                },
                scale: "1".to_string(),
                grid: TPGrid {
                    columns: meta.layout.columns,
                    rows: meta.layout.rows,
                    cell: TPSize {
                        w: meta.layout.cell_width,
                        h: meta.layout.cell_height,
                    },
                },
            },
        }
    }
}
