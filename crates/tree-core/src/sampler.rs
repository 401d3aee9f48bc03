//! Photo → particle colors.
//!
//! A photo is first reduced to a fixed square grid so the cost of a sampling
//! pass does not depend on the upload's native resolution. The grid is stored
//! bottom row first: surface `v` runs from the tree base (0) to the apex (1),
//! while decoded images keep row 0 at the top. Without the flip the photo
//! lands upside down on the tree.

use crate::colors::ColorBuffer;
use crate::constants::SAMPLE_GRID_SIZE;
use crate::error::{ImageDecodeError, TreeError};
use glam::Vec2;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Decoded RGBA8 pixels, top row first. Only lives for one sampling pass.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Wrap a raw `width * height * 4` RGBA buffer.
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, ImageDecodeError> {
        if width == 0 || height == 0 {
            return Err(ImageDecodeError::Empty { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .unwrap_or(usize::MAX);
        let actual = pixels.len();
        if actual != expected {
            return Err(ImageDecodeError::Length {
                width,
                height,
                expected,
                actual,
            });
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(|pixels| Self { pixels })
            .ok_or(ImageDecodeError::Length {
                width,
                height,
                expected,
                actual,
            })
    }

    /// Decode an encoded upload (PNG, JPEG, GIF, BMP or WebP).
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageDecodeError> {
        let pixels = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageDecodeError::Empty { width, height });
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Square, vertically flipped copy of a photo used for nearest-neighbour
/// lookups by surface coordinate.
#[derive(Clone, Debug)]
pub struct SampleGrid {
    pixels: RgbaImage,
}

impl SampleGrid {
    pub fn from_image(image: &SourceImage, size: u32) -> Self {
        let size = size.max(1);
        let mut pixels = imageops::resize(&image.pixels, size, size, FilterType::Triangle);
        imageops::flip_vertical_in_place(&mut pixels);
        Self { pixels }
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// RGB at `uv`, normalised to [0, 1].
    pub fn color_at(&self, uv: Vec2) -> [f32; 3] {
        let last = self.size() - 1;
        let index = |t: f32| ((t.clamp(0.0, 1.0) * last as f32).floor() as u32).min(last);
        let px = self.pixels.get_pixel(index(uv.x), index(uv.y));
        [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        ]
    }
}

/// Color every surface coordinate from an already decoded photo.
pub fn sample_source_image(surface_coords: &[Vec2], image: &SourceImage) -> ColorBuffer {
    let grid = SampleGrid::from_image(image, SAMPLE_GRID_SIZE);
    surface_coords.iter().map(|uv| grid.color_at(*uv)).collect()
}

/// Color every surface coordinate from a raw RGBA pixel buffer.
pub fn sample_image_colors(
    surface_coords: &[Vec2],
    rgba: &[u8],
    width: u32,
    height: u32,
) -> Result<ColorBuffer, TreeError> {
    let image = SourceImage::from_rgba(rgba.to_vec(), width, height)?;
    Ok(sample_source_image(surface_coords, &image))
}
