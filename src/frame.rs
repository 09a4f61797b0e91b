use std::path::Path;

use rayon::prelude::*;

pub trait Rgba32 {
    fn to_rgba32(&self) -> (u8, u8, u8, u8);
    fn from_rgba32(rgba: (u8, u8, u8, u8)) -> Self;
}

/// Traced colors are unclamped; anything outside [0, 1] is clipped here.
impl Rgba32 for nalgebra::Vector3<f64> {
    fn to_rgba32(&self) -> (u8, u8, u8, u8) {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
        (channel(self.x), channel(self.y), channel(self.z), u8::MAX)
    }

    fn from_rgba32((r, g, b, _): (u8, u8, u8, u8)) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }
}

pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixel_data: Box<[u8]>,
}

/// One mutable raster row, handed out by [`FrameBuffer::par_rows_mut`].
pub struct Row<'a> {
    bytes: &'a mut [u8],
}

impl Row<'_> {
    pub fn set_pixel<T: Rgba32>(&mut self, x: usize, color: T) {
        let (r, g, b, a) = color.to_rgba32();
        self.bytes[x * 4..x * 4 + 4].copy_from_slice(&[r, g, b, a]);
    }
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixel_data: vec![0; width * height * 4].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_data(&self) -> &[u8] {
        &self.pixel_data
    }

    pub fn set_pixel<T: Rgba32>(&mut self, x: usize, y: usize, color: T) {
        let start = (x + y * self.width) * 4;
        let (r, g, b, a) = color.to_rgba32();
        self.pixel_data[start..start + 4].copy_from_slice(&[r, g, b, a]);
    }

    pub fn get_pixel<T: Rgba32>(&self, x: usize, y: usize) -> T {
        let start = (x + y * self.width) * 4;
        let px = &self.pixel_data[start..start + 4];
        T::from_rgba32((px[0], px[1], px[2], px[3]))
    }

    /// Rows top to bottom, for filling in parallel. A zero-width frame has
    /// no rows.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = Row<'_>> {
        self.pixel_data
            .par_chunks_mut(self.width.max(1) * 4)
            .map(|bytes| Row { bytes })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.pixel_data,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )
    }
}
