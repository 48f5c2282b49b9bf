//! Procedural images for the texture demos.
//!
//! The gallery ships no binary assets; anything a scene samples is
//! synthesized here and fed through the same loader path a file would take.

use image::{Rgba, RgbaImage};
use noise::{NoiseFn, Perlin};

/// A black and white checkerboard with `cells` squares per side.
pub fn checkerboard(size: u32, cells: u32) -> RgbaImage {
    let cells = cells.max(1);
    let mut img = RgbaImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let cx = x * cells / size;
        let cy = y * cells / size;
        let v = if (cx + cy) % 2 == 0 { 255 } else { 0 };
        *pixel = Rgba([v, v, v, 255]);
    }
    img
}

/// A white disc on black with a softened rim.
pub fn disc(size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let center = size as f32 * 0.5;
    let radius = size as f32 * 0.4;
    let feather = (size as f32 * 0.02).max(1.0);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let d = (dx * dx + dy * dy).sqrt();
        let t = ((radius - d) / feather).clamp(0.0, 1.0);
        let v = (t * 255.0) as u8;
        *pixel = Rgba([v, v, v, 255]);
    }
    img
}

/// A cloudy sky from two octaves of Perlin noise.
pub fn clouds(size: u32, seed: u32) -> RgbaImage {
    let perlin = Perlin::new(seed);
    let mut img = RgbaImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let u = x as f64 / size as f64;
        let v = y as f64 / size as f64;
        let base = perlin.get([u * 4.0, v * 4.0]);
        let detail = perlin.get([u * 16.0, v * 16.0]);
        let n = (((base + detail * 0.35) / 1.35 + 1.0) * 0.5).clamp(0.0, 1.0) as f32;
        // blend sky blue toward white where the noise peaks
        let blend = |a: f32| ((a + (1.0 - a) * n) * 255.0) as u8;
        *pixel = Rgba([blend(0.36), blend(0.58), blend(0.92), 255]);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let img = checkerboard(64, 8);
        assert_eq!(img.dimensions(), (64, 64));
        // first cell is white, its right neighbor black
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(8, 0)[0], 0);
        assert_eq!(img.get_pixel(8, 8)[0], 255);
    }

    #[test]
    fn disc_is_white_inside_black_outside() {
        let img = disc(64);
        assert_eq!(img.get_pixel(32, 32)[0], 255);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(63, 63)[0], 0);
    }

    #[test]
    fn clouds_are_opaque_and_seeded() {
        let a = clouds(32, 1);
        let b = clouds(32, 2);
        assert_eq!(a.dimensions(), (32, 32));
        assert!(a.pixels().all(|p| p[3] == 255));
        assert!(
            a.pixels().zip(b.pixels()).any(|(pa, pb)| pa != pb),
            "different seeds should give different skies"
        );
    }
}
