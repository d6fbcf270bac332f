use std::f32::consts::TAU;

use super::Point2;
use crate::error::{ConfigError, Result};

/// Smallest side count ever returned by [`estimate_side_count`].
pub const MIN_ESTIMATED_SIDES: usize = 20;

/// Largest side count ever returned by [`estimate_side_count`].
pub const MAX_ESTIMATED_SIDES: usize = 4096;

/// Circumference, in pixels, covered by one polygon side.
const PIXELS_PER_SIDE: f32 = 16.0;

/// Rounds `value` to the nearest multiple of `pixel_size`, then shifts it by
/// `half_pixel_size` so it lands on a pixel centre.
#[must_use]
pub fn snap_to_pixel_centre(value: f32, pixel_size: f32, half_pixel_size: f32) -> f32 {
    (value / pixel_size).round() * pixel_size + half_pixel_size
}

/// Estimates how many sides a polygon needs to pass for an ellipse with the
/// given radii at the given pixel size.
///
/// The count grows with the circumference in device pixels and gets a bonus
/// proportional to eccentricity, since flat ellipses bend sharply at their
/// ends. The result is clamped to
/// `[MIN_ESTIMATED_SIDES, MAX_ESTIMATED_SIDES]`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn estimate_side_count(pixel_size: f32, radius_x: f32, radius_y: f32) -> usize {
    let (rx, ry) = (radius_x.abs(), radius_y.abs());
    let circumference = TAU * ((rx * rx + ry * ry) * 0.5).sqrt();
    let mut sides = circumference / (PIXELS_PER_SIDE * pixel_size);

    let (minor, major) = (rx.min(ry), rx.max(ry));
    if major > f32::EPSILON {
        let ratio = minor / major;
        let eccentricity = (1.0 - ratio * ratio).sqrt();
        sides += sides * eccentricity / PIXELS_PER_SIDE;
    }

    if !sides.is_finite() || sides >= MAX_ESTIMATED_SIDES as f32 {
        return if sides.is_nan() {
            MIN_ESTIMATED_SIDES
        } else {
            MAX_ESTIMATED_SIDES
        };
    }
    (sides as usize).max(MIN_ESTIMATED_SIDES)
}

/// A validated pixel grid used for snapping thin lines to pixel centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    size: f32,
    half: f32,
}

impl PixelGrid {
    /// Creates a grid with cells of `size` world units.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not positive and finite.
    pub fn new(size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(ConfigError::PixelSize(size).into());
        }
        Ok(Self {
            size,
            half: size * 0.5,
        })
    }

    /// Returns the pixel size in world units.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns half the pixel size.
    #[must_use]
    pub fn half(&self) -> f32 {
        self.half
    }

    /// Snaps a single coordinate to the nearest pixel centre.
    #[must_use]
    pub fn snap(&self, value: f32) -> f32 {
        snap_to_pixel_centre(value, self.size, self.half)
    }

    /// Snaps both coordinates of a point.
    #[must_use]
    pub fn snap_point(&self, p: &Point2) -> Point2 {
        Point2::new(self.snap(p.x), self.snap(p.y))
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self {
            size: 1.0,
            half: 0.5,
        }
    }
}
