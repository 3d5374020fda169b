//! The fixed 18-byte TGA header.
//!
//! All multi-byte fields are little-endian `u16`. Every byte pattern decodes
//! to some header and re-encodes to the same bytes: unknown image types are
//! kept verbatim and the descriptor byte is stored raw.

use crate::error::TgaError;

/// Size of the TGA header on the wire.
pub const TGA_HEADER_LEN: usize = 18;

/// Image type code (header byte 2).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// 0 — no image data.
    NoImage,
    /// 1 — uncompressed, color-mapped.
    ColorMapped,
    /// 2 — uncompressed, RGB.
    TrueColor,
    /// 3 — uncompressed, black and white.
    BlackAndWhite,
    /// 9 — run-length encoded, color-mapped.
    RleColorMapped,
    /// 10 — run-length encoded, RGB.
    RleTrueColor,
    /// 11 — run-length encoded, black and white.
    RleBlackAndWhite,
    /// 32 — color-mapped, Huffman + delta + RLE. Tagged only.
    HuffmanDeltaRle,
    /// 33 — as 32, with a 4-pass quadtree process. Tagged only.
    HuffmanDeltaRleQuadtree,
    /// Any other code, preserved as-is.
    Unknown(u8),
}

impl ImageType {
    pub fn from_u8(code: u8) -> Self {
        match code {
            0 => Self::NoImage,
            1 => Self::ColorMapped,
            2 => Self::TrueColor,
            3 => Self::BlackAndWhite,
            9 => Self::RleColorMapped,
            10 => Self::RleTrueColor,
            11 => Self::RleBlackAndWhite,
            32 => Self::HuffmanDeltaRle,
            33 => Self::HuffmanDeltaRleQuadtree,
            other => Self::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::NoImage => 0,
            Self::ColorMapped => 1,
            Self::TrueColor => 2,
            Self::BlackAndWhite => 3,
            Self::RleColorMapped => 9,
            Self::RleTrueColor => 10,
            Self::RleBlackAndWhite => 11,
            Self::HuffmanDeltaRle => 32,
            Self::HuffmanDeltaRleQuadtree => 33,
            Self::Unknown(code) => code,
        }
    }

    /// Whether the image data section is a TGA RLE packet stream (types 9, 10, 11).
    pub fn is_rle(self) -> bool {
        matches!(
            self,
            Self::RleColorMapped | Self::RleTrueColor | Self::RleBlackAndWhite
        )
    }

    /// Whether an image data section is present at all.
    pub fn has_image_data(self) -> bool {
        self != Self::NoImage
    }
}

/// Screen origin of the first pixel (descriptor bit 5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    BottomLeft,
    TopLeft,
}

/// Data storage interleaving (descriptor bits 6–7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interleave {
    None,
    /// Even/odd lines.
    TwoWay,
    FourWay,
    Reserved,
}

/// Decoded TGA header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TgaHeader {
    /// Length of the image ID field, 0–255.
    pub id_length: u8,
    /// 0 = no color map, anything else = color map present.
    pub color_map_type: u8,
    pub image_type: ImageType,
    /// First color-map index.
    pub color_map_origin: u16,
    /// Number of color-map entries.
    pub color_map_length: u16,
    /// Bits per color-map entry.
    pub color_map_entry_size: u8,
    pub x_origin: u16,
    pub y_origin: u16,
    pub width: u16,
    pub height: u16,
    /// Bits per pixel.
    pub depth: u8,
    /// Raw descriptor bitfield; see [`Self::attribute_bits`], [`Self::origin`],
    /// [`Self::interleave`].
    pub image_descriptor: u8,
}

impl Default for TgaHeader {
    fn default() -> Self {
        Self {
            id_length: 0,
            color_map_type: 0,
            image_type: ImageType::NoImage,
            color_map_origin: 0,
            color_map_length: 0,
            color_map_entry_size: 0,
            x_origin: 0,
            y_origin: 0,
            width: 0,
            height: 0,
            depth: 0,
            image_descriptor: 0,
        }
    }
}

impl TgaHeader {
    /// Decode a header from exactly 18 bytes. Never fails.
    pub fn from_bytes(b: &[u8; TGA_HEADER_LEN]) -> Self {
        Self {
            id_length: b[0],
            color_map_type: b[1],
            image_type: ImageType::from_u8(b[2]),
            color_map_origin: u16::from_le_bytes([b[3], b[4]]),
            color_map_length: u16::from_le_bytes([b[5], b[6]]),
            color_map_entry_size: b[7],
            x_origin: u16::from_le_bytes([b[8], b[9]]),
            y_origin: u16::from_le_bytes([b[10], b[11]]),
            width: u16::from_le_bytes([b[12], b[13]]),
            height: u16::from_le_bytes([b[14], b[15]]),
            depth: b[16],
            image_descriptor: b[17],
        }
    }

    /// Encode to the 18-byte wire layout.
    pub fn to_bytes(&self) -> [u8; TGA_HEADER_LEN] {
        let mut out = [0u8; TGA_HEADER_LEN];
        out[0] = self.id_length;
        out[1] = self.color_map_type;
        out[2] = self.image_type.to_u8();
        out[3..5].copy_from_slice(&self.color_map_origin.to_le_bytes());
        out[5..7].copy_from_slice(&self.color_map_length.to_le_bytes());
        out[7] = self.color_map_entry_size;
        out[8..10].copy_from_slice(&self.x_origin.to_le_bytes());
        out[10..12].copy_from_slice(&self.y_origin.to_le_bytes());
        out[12..14].copy_from_slice(&self.width.to_le_bytes());
        out[14..16].copy_from_slice(&self.height.to_le_bytes());
        out[16] = self.depth;
        out[17] = self.image_descriptor;
        out
    }

    pub fn has_id_field(&self) -> bool {
        self.id_length > 0
    }

    pub fn has_color_map(&self) -> bool {
        self.color_map_type != 0
    }

    pub fn has_image_data(&self) -> bool {
        self.image_type.has_image_data()
    }

    /// Attribute (alpha) bits per pixel, descriptor bits 0–3.
    pub fn attribute_bits(&self) -> u8 {
        self.image_descriptor & 0x0F
    }

    pub fn origin(&self) -> Origin {
        if self.image_descriptor & 0x20 != 0 {
            Origin::TopLeft
        } else {
            Origin::BottomLeft
        }
    }

    pub fn interleave(&self) -> Interleave {
        match self.image_descriptor >> 6 {
            0 => Interleave::None,
            1 => Interleave::TwoWay,
            2 => Interleave::FourWay,
            _ => Interleave::Reserved,
        }
    }
}

/// Parse a header from the first 18 bytes of `data`.
///
/// Trailing bytes are ignored. Fails only when fewer than 18 bytes are given.
pub fn parse_header(data: &[u8]) -> Result<TgaHeader, TgaError> {
    let bytes: &[u8; TGA_HEADER_LEN] = data
        .get(..TGA_HEADER_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(TgaError::TruncatedHeader { actual: data.len() })?;
    Ok(TgaHeader::from_bytes(bytes))
}

/// Serialize a header to its 18-byte wire form.
pub fn serialize_header(header: &TgaHeader) -> [u8; TGA_HEADER_LEN] {
    header.to_bytes()
}
