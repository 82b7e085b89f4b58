use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat, RgbImage, RgbaImage};

/// Channels kept by the RGB view of an atlas.
pub const RGB_CHANNELS: usize = 3;

/// A decoded skin atlas. Pixels are stored as RGBA8 and never modified after decode.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    image: RgbaImage,
}

impl TextureAtlas {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decodes PNG (or any format enabled on `image`) bytes into an RGBA8 atlas.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self {
            image: decoded.to_rgba8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.image.width() as usize * self.image.height() as usize
    }

    /// Pre-1.8 skins are 64x32 and have no dedicated left limb regions.
    pub fn is_legacy(&self) -> bool {
        self.image.height() * 2 == self.image.width()
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Nearest-neighbour lookup with clamp-to-edge addressing. `(0, 0)` is the top-left corner.
    pub fn sample_nearest(&self, u: f32, v: f32) -> [u8; 4] {
        let (w, h) = self.image.dimensions();
        let x = ((u * w as f32).floor() as i64).clamp(0, i64::from(w) - 1) as u32;
        let y = ((v * h as f32).floor() as i64).clamp(0, i64::from(h) - 1) as u32;
        self.texel(x, y)
    }

    /// Row-major RGB bytes with alpha dropped, `pixel_count() * RGB_CHANNELS` long.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.image
            .pixels()
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    pub fn to_rgb(&self) -> RgbImage {
        DynamicImage::ImageRgba8(self.image.clone()).to_rgb8()
    }

    pub fn save_rgb(&self, path: &Path) -> Result<(), ImageError> {
        self.to_rgb().save_with_format(path, ImageFormat::Png)
    }
}
