use crate::colour::{Colour, PackedColour};
use crate::error::{ConfigError, Result};

/// How consecutive stroked segments are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Segments are stroked independently with flat ends.
    None,
    /// Outer edges meet at the exact mitre point.
    #[default]
    Pointy,
    /// Outer edges are cut flat at the shared vertex and the wedge between
    /// them is filled with a triangle.
    Smooth,
}

/// Style parameters for path, polygon and rectangle strokes.
///
/// The width may taper linearly from `width` at the start of a path to
/// `end_width` at its end, driven by arc length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    width: f32,
    end_width: f32,
    join: JoinType,
    colour: PackedColour,
}

impl StrokeStyle {
    /// Creates a constant-width white stroke with pointy joins.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not positive and finite.
    pub fn new(width: f32) -> Result<Self> {
        check_width(width)?;
        Ok(Self {
            width,
            end_width: width,
            join: JoinType::default(),
            colour: PackedColour::WHITE,
        })
    }

    /// Makes the width taper towards `end_width` at the end of the path.
    ///
    /// # Errors
    ///
    /// Returns an error if `end_width` is not positive and finite.
    pub fn with_end_width(mut self, end_width: f32) -> Result<Self> {
        check_width(end_width)?;
        self.end_width = end_width;
        Ok(self)
    }

    /// Sets how consecutive segments are joined.
    #[must_use]
    pub fn with_join(mut self, join: JoinType) -> Self {
        self.join = join;
        self
    }

    /// Sets the stroke colour.
    #[must_use]
    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour.pack();
        self
    }

    /// Returns the stroke width at the start of the path.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke width at the end of the path.
    #[must_use]
    pub fn end_width(&self) -> f32 {
        self.end_width
    }

    /// Returns half the start width.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    /// Returns half the width at normalized arc length `t` in `[0, 1]`.
    #[must_use]
    pub fn half_width_at(&self, t: f32) -> f32 {
        (self.width + (self.end_width - self.width) * t) * 0.5
    }

    /// Returns the join type.
    #[must_use]
    pub fn join(&self) -> JoinType {
        self.join
    }

    /// Returns the packed stroke colour.
    #[must_use]
    pub fn colour(&self) -> PackedColour {
        self.colour
    }

    /// Returns `true` when the end width differs from the start width.
    #[must_use]
    pub fn is_tapered(&self) -> bool {
        (self.end_width - self.width).abs() > f32::EPSILON
    }
}

fn check_width(width: f32) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(ConfigError::StrokeWidth(width).into());
    }
    Ok(())
}
