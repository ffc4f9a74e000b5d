// The overlay the lights are drawn into: one reusable RGBA surface the size of the viewport.
// Pixels are packed 0xAARRGGBB with straight (non-premultiplied) alpha.
// Visual: nothing by itself; `present` lays it over the scene each frame.

use std::path::Path;

use image::{ImageBuffer, Rgba as ImgRgba, RgbaImage};

use crate::color::Rgb;
use crate::error::Error;

/// Working color for blending: channels 0..255, alpha 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn new(color: Rgb, alpha: f32) -> Self {
        Self {
            r: color.r as f32,
            g: color.g as f32,
            b: color.b as f32,
            a: alpha,
        }
    }

    /// Quantize to 0xAARRGGBB.
    #[inline]
    pub fn pack(self) -> u32 {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u32;
        (q(self.a * 255.0) << 24) | (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    #[inline]
    pub fn unpack(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as f32,
            g: ((px >> 8) & 0xFF) as f32,
            b: (px & 0xFF) as f32,
            a: ((px >> 24) & 0xFF) as f32 / 255.0,
        }
    }
}

pub struct OverlaySurface {
    width: usize,
    height: usize,
    pixels: Vec<u32>, // length = width * height
}

impl OverlaySurface {
    /// Fully transparent surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Match a new viewport size. Contents are discarded (the next frame redraws everything).
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        tracing::debug!(width, height, "Overlay surface resized");
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// Everything back to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Overwrite every pixel with one color (no blending).
    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color.pack());
    }

    /// Packed pixel at (x,y), or None outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Source-over blend `src` onto the pixel at (x,y). Out of bounds is a no-op.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, src: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }

        let sa = src.a.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }

        let idx = y * self.width + x;
        let dst = Rgba::unpack(self.pixels[idx]);

        let keep = dst.a * (1.0 - sa);
        let out_a = sa + keep;
        // out_a >= sa > 0 here
        let mix = |s: f32, d: f32| (s * sa + d * keep) / out_a;

        self.pixels[idx] = Rgba {
            r: mix(src.r, dst.r),
            g: mix(src.g, dst.g),
            b: mix(src.b, dst.b),
            a: out_a,
        }
        .pack();
    }

    /// Copy out as an RGBA image (for snapshots and tests).
    pub fn to_rgba_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            ImgRgba([
                ((px >> 16) & 0xFF) as u8,
                ((px >> 8) & 0xFF) as u8,
                (px & 0xFF) as u8,
                ((px >> 24) & 0xFF) as u8,
            ])
        })
    }

    /// Write the current overlay as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), Error> {
        self.to_rgba_image().save(path).map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), width = self.width, height = self.height, "Overlay snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let c = Rgba { r: 255.0, g: 170.0, b: 102.0, a: 0.75 };
        let px = c.pack();
        assert_eq!(px, (191 << 24) | 0x00FF_AA66);
        let back = Rgba::unpack(px);
        assert_eq!((back.r, back.g, back.b), (255.0, 170.0, 102.0));
        assert!((back.a - 191.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut s = OverlaySurface::new(3, 2);
        s.fill(Rgba::new(Rgb::new(0, 0, 0), 0.75));
        assert!(s.pixels().iter().all(|&p| p == 191 << 24));
        s.clear();
        assert!(s.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_blend_onto_transparent_is_source() {
        let mut s = OverlaySurface::new(1, 1);
        let src = Rgba::new(Rgb::new(200, 100, 50), 0.4);
        s.blend_pixel(0, 0, src);
        assert_eq!(s.pixel(0, 0), Some(src.pack()));
    }

    #[test]
    fn test_blend_over_darkness() {
        let mut s = OverlaySurface::new(1, 1);
        s.fill(Rgba::new(Rgb::new(0, 0, 0), 0.5));
        s.blend_pixel(0, 0, Rgba::new(Rgb::new(255, 255, 255), 0.5));
        let out = Rgba::unpack(s.pixel(0, 0).unwrap());
        // a = 0.5 + 0.502 * 0.5
        assert!((out.a - 0.75).abs() < 0.01);
        // white weighted 0.5 against black weighted ~0.25
        assert!((out.r - 170.0).abs() <= 1.0, "{}", out.r);
    }

    #[test]
    fn test_blend_out_of_bounds_and_zero_alpha() {
        let mut s = OverlaySurface::new(2, 2);
        s.blend_pixel(-1, 0, Rgba::new(Rgb::new(255, 0, 0), 1.0));
        s.blend_pixel(0, 2, Rgba::new(Rgb::new(255, 0, 0), 1.0));
        s.blend_pixel(0, 0, Rgba::new(Rgb::new(255, 0, 0), 0.0));
        assert!(s.pixels().iter().all(|&p| p == 0));
        assert_eq!(s.pixel(2, 0), None);
    }

    #[test]
    fn test_resize_discards() {
        let mut s = OverlaySurface::new(2, 2);
        s.fill(Rgba::new(Rgb::new(1, 2, 3), 1.0));
        s.resize(3, 1);
        assert_eq!((s.width(), s.height()), (3, 1));
        assert_eq!(s.pixels(), &[0, 0, 0]);
    }

    #[test]
    fn test_to_rgba_image() {
        let mut s = OverlaySurface::new(2, 1);
        s.blend_pixel(1, 0, Rgba::new(Rgb::new(10, 20, 30), 1.0));
        let img = s.to_rgba_image();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 255]);
    }
}
