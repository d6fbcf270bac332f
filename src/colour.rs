/// An RGBA colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from its four channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the colour into a single vertex attribute.
    #[must_use]
    pub fn pack(&self) -> PackedColour {
        PackedColour::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// Linearly interpolates towards `other` by `t`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Colour> for PackedColour {
    fn from(colour: Colour) -> Self {
        colour.pack()
    }
}

/// A colour packed into one 32-bit value, laid out as `0xAABBGGRR`.
///
/// Vertices only carry packed colours; sinks upload the bits as four
/// normalized bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedColour(u32);

impl PackedColour {
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Packs four `[0, 1]` channels, clamping out-of-range values.
    #[must_use]
    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(
            (channel(a) << 24) | (channel(b) << 16) | (channel(g) << 8) | channel(r),
        )
    }

    /// Wraps raw `0xAABBGGRR` bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw `0xAABBGGRR` bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Expands the packed value back into float channels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpack(self) -> Colour {
        let byte = |shift: u32| f32::from(((self.0 >> shift) & 0xFF) as u8) / 255.0;
        Colour::new(byte(0), byte(8), byte(16), byte(24))
    }
}

impl Default for PackedColour {
    fn default() -> Self {
        Self::WHITE
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f32) -> u32 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (clamped * 255.0).round() as u32
}
