/// Pixel or color-map entry depth with a known byte width.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    /// 8 bits: grayscale or color-map index.
    Bits8,
    /// 16 bits: packed 5-5-5(+1) color.
    Bits16,
    /// 24 bits: BGR.
    Bits24,
    /// 32 bits: BGRA.
    Bits32,
}

impl PixelDepth {
    /// Map a header depth field to a known depth, `None` for anything else.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Bits8),
            16 => Some(Self::Bits16),
            24 => Some(Self::Bits24),
            32 => Some(Self::Bits32),
            _ => None,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
            Self::Bits24 => 24,
            Self::Bits32 => 32,
        }
    }

    /// Bytes per pixel for this depth.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
            Self::Bits24 => 3,
            Self::Bits32 => 4,
        }
    }
}

/// Bytes occupied by one pixel (or color-map entry) of `bits` depth.
///
/// Depths other than 8/16/24/32 count as 4 bytes. This matches how existing
/// TGA writers size sections; use [`crate::Permissiveness::Strict`] to reject
/// such files instead.
pub fn bytes_per_pixel(bits: u8) -> usize {
    PixelDepth::from_bits(bits).map_or(4, |d| d.bytes_per_pixel())
}
