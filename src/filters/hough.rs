//! Probabilistic Hough line segment detection over a binary edge image.
//!
//! Progressive variant: edge pixels vote into a (rho, theta) accumulator one
//! at a time; as soon as some pixel pushes a bin past the vote threshold, the
//! full segment is traced out along that bin's direction, accepted if long
//! enough, and its pixels are removed from both the edge set and the
//! accumulator. Pixels are visited in scan order, so detection is fully
//! deterministic for identical input.

use image::GrayImage;

/// A detected line segment in pixel coordinates.
///
/// Endpoints are normalized so `x2 >= x1` (ties broken by `y2 >= y1`), which
/// keeps the reported angle in the `[0, pi/2]` range callers bucket on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl LineSegment {
    fn normalized(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        if x2 < x1 || (x2 == x1 && y2 < y1) {
            Self {
                x1: x2,
                y1: y2,
                x2: x1,
                y2: y1,
            }
        } else {
            Self { x1, y1, x2, y2 }
        }
    }

    /// Euclidean length in pixels.
    #[must_use]
    pub fn length(&self) -> f64 {
        let dx = (self.x2 - self.x1) as f64;
        let dy = (self.y2 - self.y1) as f64;
        dx.hypot(dy)
    }

    /// Absolute angle of the segment, `|atan2(dy, dx)|`, in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        let dx = (self.x2 - self.x1) as f64;
        let dy = (self.y2 - self.y1) as f64;
        dy.atan2(dx).abs()
    }
}

/// Tuning parameters for segment detection.
#[derive(Debug, Clone, Copy)]
pub struct LineDetectionParams {
    /// Accumulator votes required before a segment is traced.
    pub vote_threshold: u32,
    /// Minimum accepted segment length in pixels.
    pub min_line_length: f64,
    /// Maximum run of non-edge pixels bridged within one segment.
    pub max_gap: u32,
}

/// Angular resolution: one bin per degree over a half turn.
const N_THETA: usize = 180;

/// Detect line segments in a binary edge image (non-zero pixels are edges).
#[must_use]
pub fn detect_line_segments(edges: &GrayImage, params: &LineDetectionParams) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let w = width as i64;
    let h = height as i64;
    let max_rho = (w + h) as usize;
    let n_rho = 2 * max_rho + 1;

    let trig: Vec<(f64, f64)> = (0..N_THETA)
        .map(|k| {
            let theta = (k as f64).to_radians();
            (theta.cos(), theta.sin())
        })
        .collect();

    // Edge pixel set, in scan order.
    let mut points = Vec::new();
    let mut mask = vec![false; (w * h) as usize];
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel[0] > 0 {
            points.push((i64::from(x), i64::from(y)));
            mask[(i64::from(y) * w + i64::from(x)) as usize] = true;
        }
    }

    let mut accumulator = vec![0u32; N_THETA * n_rho];
    let mut voted = vec![false; (w * h) as usize];
    let mut segments = Vec::new();

    for &(x, y) in &points {
        let pixel_index = (y * w + x) as usize;
        if !mask[pixel_index] {
            // Consumed by an earlier segment.
            continue;
        }

        // Cast this pixel's votes and remember the strongest updated bin.
        let mut best_theta = 0usize;
        let mut best_votes = 0u32;
        for (k, &(cos_t, sin_t)) in trig.iter().enumerate() {
            let rho = (x as f64) * cos_t + (y as f64) * sin_t;
            let rho_index = (rho.round() as i64 + max_rho as i64) as usize;
            let bin = &mut accumulator[k * n_rho + rho_index];
            *bin += 1;
            if *bin > best_votes {
                best_votes = *bin;
                best_theta = k;
            }
        }
        voted[pixel_index] = true;

        if best_votes < params.vote_threshold {
            continue;
        }

        // Trace the candidate segment through (x, y) along the line
        // direction, then retire its pixels whether or not it is accepted.
        let (cos_t, sin_t) = trig[best_theta];
        let segment = trace_segment(&mask, w, h, x, y, -sin_t, cos_t, params.max_gap);
        let segment = LineSegment::normalized(segment.0, segment.1, segment.2, segment.3);

        remove_segment_pixels(
            &mut mask,
            &mut voted,
            &mut accumulator,
            &trig,
            max_rho,
            n_rho,
            w,
            h,
            &segment,
        );

        if segment.length() >= params.min_line_length {
            segments.push(segment);
        }
    }

    segments
}

/// Walk outward from a seed pixel in both directions along (dx, dy),
/// bridging gaps up to `max_gap`, and return the raw endpoints.
fn trace_segment(
    mask: &[bool],
    w: i64,
    h: i64,
    seed_x: i64,
    seed_y: i64,
    dx: f64,
    dy: f64,
    max_gap: u32,
) -> (i64, i64, i64, i64) {
    let mut endpoints = [(seed_x, seed_y), (seed_x, seed_y)];

    for (slot, sign) in [(0usize, 1.0f64), (1, -1.0)] {
        let step_x = dx * sign;
        let step_y = dy * sign;
        let mut fx = seed_x as f64;
        let mut fy = seed_y as f64;
        let mut gap = 0u32;

        loop {
            fx += step_x;
            fy += step_y;
            let xi = fx.round() as i64;
            let yi = fy.round() as i64;
            if xi < 0 || yi < 0 || xi >= w || yi >= h {
                break;
            }
            if mask[(yi * w + xi) as usize] {
                endpoints[slot] = (xi, yi);
                gap = 0;
            } else {
                gap += 1;
                if gap > max_gap {
                    break;
                }
            }
        }
    }

    (
        endpoints[1].0,
        endpoints[1].1,
        endpoints[0].0,
        endpoints[0].1,
    )
}

/// Remove a traced segment's pixels from the edge set and subtract the votes
/// already cast by any of them.
#[allow(clippy::too_many_arguments)]
fn remove_segment_pixels(
    mask: &mut [bool],
    voted: &mut [bool],
    accumulator: &mut [u32],
    trig: &[(f64, f64)],
    max_rho: usize,
    n_rho: usize,
    w: i64,
    h: i64,
    segment: &LineSegment,
) {
    let dx = segment.x2 - segment.x1;
    let dy = segment.y2 - segment.y1;
    let steps = dx.abs().max(dy.abs());

    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        let xi = (segment.x1 as f64 + dx as f64 * t).round() as i64;
        let yi = (segment.y1 as f64 + dy as f64 * t).round() as i64;
        if xi < 0 || yi < 0 || xi >= w || yi >= h {
            continue;
        }

        let pixel_index = (yi * w + xi) as usize;
        if !mask[pixel_index] {
            continue;
        }
        mask[pixel_index] = false;

        if voted[pixel_index] {
            voted[pixel_index] = false;
            for (k, &(cos_t, sin_t)) in trig.iter().enumerate() {
                let rho = (xi as f64) * cos_t + (yi as f64) * sin_t;
                let rho_index = (rho.round() as i64 + max_rho as i64) as usize;
                let bin = &mut accumulator[k * n_rho + rho_index];
                *bin = bin.saturating_sub(1);
            }
        }
    }
}
