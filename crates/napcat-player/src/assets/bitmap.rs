//! Bitmap decoding for sprite assets
//!
//! Supports:
//! - PNG (8/16-bit, any colour type) via the `image` crate, converted to RGBA8
//! - flat-colour placeholders for assets that are missing on disk

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("{path} has no pixels")]
    Empty { path: String },
}

/// Decoded bitmap in RGBA format, ready for rendering
#[derive(Debug, Clone)]
pub struct DecodedBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
}

impl DecodedBitmap {
    /// Height / width, used to derive a sprite's height from its width
    pub fn aspect(&self) -> f32 {
        if self.width == 0 {
            1.0
        } else {
            self.height as f32 / self.width as f32
        }
    }

    /// RGBA at (x, y); out-of-range reads are transparent
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        match self.pixels.get(idx..idx + 4) {
            Some(p) => [p[0], p[1], p[2], p[3]],
            None => [0, 0, 0, 0],
        }
    }
}

/// Decode a PNG file into an RGBA bitmap
pub fn decode_png(path: &Path) -> Result<DecodedBitmap, BitmapError> {
    let img = image::open(path).map_err(|source| BitmapError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(BitmapError::Empty {
            path: path.display().to_string(),
        });
    }
    Ok(DecodedBitmap {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Solid placeholder with a 1px darker border so sprite bounds stay visible
pub fn placeholder(width: u32, height: u32, rgb: [u8; 3]) -> DecodedBitmap {
    let w = width.max(1);
    let h = height.max(1);
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            let [r, g, b] = if edge {
                [rgb[0] / 2, rgb[1] / 2, rgb[2] / 2]
            } else {
                rgb
            };
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    DecodedBitmap {
        width: w,
        height: h,
        pixels,
    }
}
