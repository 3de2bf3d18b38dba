//! Contrast-limited adaptive histogram equalization.
//!
//! Operates on a single 8-bit channel. The image is divided into a grid of
//! tiles; each tile gets its own clipped-histogram equalization lookup table,
//! and every output pixel bilinearly interpolates between the four nearest
//! tile tables. Clipping the per-tile histogram bounds the local gain, which
//! keeps flat regions from being amplified into noise.

use image::{GrayImage, Luma};

const BINS: usize = 256;

/// Apply CLAHE to a grayscale channel.
///
/// `clip_limit` is the contrast limit relative to a uniform histogram
/// (2.0 means no bin may exceed twice the uniform height); `grid_size` is the
/// number of tiles along each axis. Dimensions are preserved exactly.
#[must_use]
pub fn clahe(channel: &GrayImage, clip_limit: f32, grid_size: u32) -> GrayImage {
    let (width, height) = channel.dimensions();
    if width == 0 || height == 0 {
        return channel.clone();
    }

    let grid = grid_size.max(1).min(width).min(height);
    let bounds_x = tile_bounds(width, grid);
    let bounds_y = tile_bounds(height, grid);

    let luts = build_tile_luts(channel, &bounds_x, &bounds_y, clip_limit);
    let centers_x: Vec<f32> = bounds_x.iter().map(|&(a, b)| (a + b) as f32 / 2.0).collect();
    let centers_y: Vec<f32> = bounds_y.iter().map(|&(a, b)| (a + b) as f32 / 2.0).collect();

    let grid = grid as usize;
    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in channel.enumerate_pixels() {
        let (tx0, tx1, wx) = interp_coords(&centers_x, x as f32);
        let (ty0, ty1, wy) = interp_coords(&centers_y, y as f32);
        let v = pixel[0] as usize;

        let top = lerp(
            f32::from(luts[ty0 * grid + tx0][v]),
            f32::from(luts[ty0 * grid + tx1][v]),
            wx,
        );
        let bottom = lerp(
            f32::from(luts[ty1 * grid + tx0][v]),
            f32::from(luts[ty1 * grid + tx1][v]),
            wx,
        );
        let value = lerp(top, bottom, wy).round().clamp(0.0, 255.0) as u8;
        out.put_pixel(x, y, Luma([value]));
    }

    out
}

/// Half-open tile extents along one axis, covering every pixel exactly once.
fn tile_bounds(extent: u32, grid: u32) -> Vec<(u32, u32)> {
    (0..grid)
        .map(|i| (i * extent / grid, (i + 1) * extent / grid))
        .collect()
}

/// Build one equalization LUT per tile from its clipped histogram.
fn build_tile_luts(
    channel: &GrayImage,
    bounds_x: &[(u32, u32)],
    bounds_y: &[(u32, u32)],
    clip_limit: f32,
) -> Vec<[u8; BINS]> {
    let mut luts = Vec::with_capacity(bounds_x.len() * bounds_y.len());

    for &(y0, y1) in bounds_y {
        for &(x0, x1) in bounds_x {
            let mut hist = [0u32; BINS];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[channel.get_pixel(x, y)[0] as usize] += 1;
                }
            }

            let tile_pixels = (x1 - x0) * (y1 - y0);
            luts.push(equalization_lut(&mut hist, tile_pixels, clip_limit));
        }
    }

    luts
}

/// Clip the histogram, redistribute the excess uniformly, and map through the
/// cumulative distribution.
fn equalization_lut(hist: &mut [u32; BINS], tile_pixels: u32, clip_limit: f32) -> [u8; BINS] {
    let mut lut = [0u8; BINS];
    if tile_pixels == 0 {
        // Degenerate empty tile: identity mapping.
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let limit = ((clip_limit * tile_pixels as f32 / BINS as f32).max(1.0)) as u32;
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let bonus = excess / BINS as u32;
    let mut remainder = (excess % BINS as u32) as usize;
    for bin in hist.iter_mut() {
        *bin += bonus;
        if remainder > 0 {
            *bin += 1;
            remainder -= 1;
        }
    }

    let scale = 255.0 / tile_pixels as f32;
    let mut cumulative = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        cumulative += count;
        lut[i] = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }

    lut
}

/// Indices of the two bracketing tile centers and the interpolation weight
/// toward the second one. Positions outside the outermost centers clamp.
fn interp_coords(centers: &[f32], pos: f32) -> (usize, usize, f32) {
    if centers.len() == 1 {
        return (0, 0, 0.0);
    }

    let upper = centers.partition_point(|&c| c <= pos);
    if upper == 0 {
        return (0, 0, 0.0);
    }
    if upper >= centers.len() {
        let last = centers.len() - 1;
        return (last, last, 0.0);
    }

    let lower = upper - 1;
    let span = centers[upper] - centers[lower];
    let weight = if span > 0.0 {
        (pos - centers[lower]) / span
    } else {
        0.0
    };
    (lower, upper, weight)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
