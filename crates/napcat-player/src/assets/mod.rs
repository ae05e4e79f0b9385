//! Sprite asset store
//!
//! Every image the scene can show is decoded once at startup, including the
//! eyes-closed blink frame, so swapping a sprite's source never touches the
//! disk mid-animation. Missing files degrade to flat placeholders.

pub mod bitmap;

use std::collections::HashMap;
use std::path::Path;

use bitmap::DecodedBitmap;

/// Every image asset the scene references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background1,
    Background2,
    Outside,
    Hat,
    CatEyesOpen,
    CatEyesClosed,
    Think1,
    Think2,
    Think3,
    Fish,
    CatStand,
    CatHat,
    CatFishing,
}

impl AssetKey {
    pub const ALL: [AssetKey; 13] = [
        AssetKey::Background1,
        AssetKey::Background2,
        AssetKey::Outside,
        AssetKey::Hat,
        AssetKey::CatEyesOpen,
        AssetKey::CatEyesClosed,
        AssetKey::Think1,
        AssetKey::Think2,
        AssetKey::Think3,
        AssetKey::Fish,
        AssetKey::CatStand,
        AssetKey::CatHat,
        AssetKey::CatFishing,
    ];

    /// File name inside the asset directory
    pub fn file_name(self) -> &'static str {
        match self {
            AssetKey::Background1   => "Background-1.png",
            AssetKey::Background2   => "Background-2.png",
            AssetKey::Outside       => "Outside.png",
            AssetKey::Hat           => "Hat.png",
            AssetKey::CatEyesOpen   => "Cat-open-eye.png",
            AssetKey::CatEyesClosed => "Cat-close-eye.png",
            AssetKey::Think1        => "Think-1.png",
            AssetKey::Think2        => "Think-2.png",
            AssetKey::Think3        => "Think-3.png",
            AssetKey::Fish          => "Fish.png",
            AssetKey::CatStand      => "Cat-stand.png",
            AssetKey::CatHat        => "Cat-hat.png",
            AssetKey::CatFishing    => "Cat-fishing.png",
        }
    }

    /// Placeholder size and colour, roughly matching the real art's shape
    fn placeholder_spec(self) -> (u32, u32, [u8; 3]) {
        match self {
            AssetKey::Background1   => (64, 36, [92, 74, 110]),
            AssetKey::Background2   => (64, 36, [128, 96, 72]),
            AssetKey::Outside       => (64, 36, [96, 160, 200]),
            AssetKey::Hat           => (16, 12, [180, 40, 40]),
            AssetKey::CatEyesOpen   => (24, 16, [230, 160, 60]),
            AssetKey::CatEyesClosed => (24, 16, [200, 130, 40]),
            AssetKey::Think1
            | AssetKey::Think2
            | AssetKey::Think3      => (16, 12, [240, 240, 240]),
            AssetKey::Fish          => (16, 8, [60, 120, 220]),
            AssetKey::CatStand      => (12, 20, [230, 160, 60]),
            AssetKey::CatHat        => (12, 24, [230, 110, 60]),
            AssetKey::CatFishing    => (24, 20, [230, 160, 60]),
        }
    }
}

/// Central asset store: decoded bitmaps keyed by asset
pub struct AssetStore {
    bitmaps: HashMap<AssetKey, DecodedBitmap>,
    missing: usize,
}

impl AssetStore {
    /// Decode every asset from `asset_dir`.
    ///
    /// A file that is missing or fails to decode is replaced by a
    /// placeholder so the scene stays playable; the count is reported by
    /// `missing()`.
    pub fn load(asset_dir: &Path) -> Self {
        let mut bitmaps = HashMap::with_capacity(AssetKey::ALL.len());
        let mut missing = 0;

        for key in AssetKey::ALL {
            let path = asset_dir.join(key.file_name());
            let bmp = match bitmap::decode_png(&path) {
                Ok(bmp) => {
                    tracing::debug!("Loaded {} ({}x{})", key.file_name(), bmp.width, bmp.height);
                    bmp
                }
                Err(e) => {
                    tracing::warn!("{}; using placeholder", e);
                    missing += 1;
                    let (w, h, rgb) = key.placeholder_spec();
                    bitmap::placeholder(w, h, rgb)
                }
            };
            bitmaps.insert(key, bmp);
        }

        Self {
            bitmaps,
            missing,
        }
    }

    /// A store made entirely of placeholders (no disk access)
    #[cfg(test)]
    pub fn placeholders() -> Self {
        let bitmaps = AssetKey::ALL
            .iter()
            .map(|&key| {
                let (w, h, rgb) = key.placeholder_spec();
                (key, bitmap::placeholder(w, h, rgb))
            })
            .collect();
        Self {
            bitmaps,
            missing: AssetKey::ALL.len(),
        }
    }

    pub fn get(&self, key: AssetKey) -> Option<&DecodedBitmap> {
        self.bitmaps.get(&key)
    }

    /// Intrinsic height / width of an asset
    pub fn aspect(&self, key: AssetKey) -> f32 {
        self.get(key).map(DecodedBitmap::aspect).unwrap_or(1.0)
    }

    pub fn total(&self) -> usize {
        self.bitmaps.len()
    }

    /// Number of assets that fell back to a placeholder
    pub fn missing(&self) -> usize {
        self.missing
    }
}
