//! The TGA file aggregate and its section layout.

use alloc::vec::Vec;
use core::fmt;

use crate::error::TgaError;
use crate::header::{TGA_HEADER_LEN, TgaHeader};
use crate::pixel::bytes_per_pixel;
use crate::rle::packet_stream_len;

/// One of the three variable-length sections following the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    IdField,
    ColorMap,
    ImageData,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::IdField => "image ID",
            Section::ColorMap => "color map",
            Section::ImageData => "image data",
        })
    }
}

/// Byte sizes of the three sections as declared by a header.
///
/// These are wire sizes: a color map with `color_map_type == 0` still
/// occupies `color_map` bytes when `color_map_length` is nonzero.
/// `image_data` is the uncompressed size, `width * height * bpp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionSizes {
    pub id_field: usize,
    pub color_map: usize,
    pub image_data: usize,
}

impl SectionSizes {
    pub fn of(header: &TgaHeader) -> Result<Self, TgaError> {
        let too_large = TgaError::DimensionsTooLarge {
            width: u32::from(header.width),
            height: u32::from(header.height),
        };
        let color_map = usize::from(header.color_map_length)
            .checked_mul(bytes_per_pixel(header.color_map_entry_size))
            .ok_or(TgaError::DimensionsTooLarge {
                width: u32::from(header.color_map_length),
                height: 1,
            })?;
        let image_data = usize::from(header.width)
            .checked_mul(usize::from(header.height))
            .and_then(|px| px.checked_mul(bytes_per_pixel(header.depth)))
            .ok_or(too_large)?;
        Ok(Self {
            id_field: usize::from(header.id_length),
            color_map,
            image_data,
        })
    }

    /// Total body bytes following the header.
    pub fn total(&self) -> Option<usize> {
        self.id_field
            .checked_add(self.color_map)?
            .checked_add(self.image_data)
    }

    pub fn get(&self, section: Section) -> usize {
        match section {
            Section::IdField => self.id_field,
            Section::ColorMap => self.color_map,
            Section::ImageData => self.image_data,
        }
    }
}

/// A TGA file: header plus the three owned section buffers.
///
/// A section whose header flag marks it absent is an empty `Vec`. For RLE
/// image types `image_data` holds the encoded packet stream; use
/// [`crate::unpack_rle`] to expand it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TgaFile {
    pub header: TgaHeader,
    pub id_field: Vec<u8>,
    pub color_map: Vec<u8>,
    pub image_data: Vec<u8>,
}

impl TgaFile {
    /// A file with the given header and empty sections.
    pub fn new(header: TgaHeader) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    pub fn sizes(&self) -> Result<SectionSizes, TgaError> {
        SectionSizes::of(&self.header)
    }

    /// Whether `image_data` is an RLE packet stream.
    pub fn is_rle(&self) -> bool {
        self.header.image_type.is_rle()
    }

    fn is_present(&self, section: Section) -> bool {
        match section {
            Section::IdField => self.header.has_id_field(),
            Section::ColorMap => self.header.has_color_map(),
            Section::ImageData => self.header.has_image_data(),
        }
    }

    pub fn section(&self, section: Section) -> &[u8] {
        match section {
            Section::IdField => &self.id_field,
            Section::ColorMap => &self.color_map,
            Section::ImageData => &self.image_data,
        }
    }

    /// Verify each buffer against the length its header declares.
    ///
    /// Present sections must match exactly, absent ones must be empty. RLE
    /// image data must end on the packet that covers the last pixel.
    pub fn check_sections(&self) -> Result<SectionSizes, TgaError> {
        let sizes = self.sizes()?;
        for section in [Section::IdField, Section::ColorMap, Section::ImageData] {
            let expected = if section == Section::ImageData && self.is_rle() {
                let pixels = usize::from(self.header.width) * usize::from(self.header.height);
                let bpp = bytes_per_pixel(self.header.depth);
                match packet_stream_len(&self.image_data, bpp, pixels) {
                    Ok(len) | Err(len) => len,
                }
            } else if self.is_present(section) {
                sizes.get(section)
            } else {
                0
            };
            let actual = self.section(section).len();
            if actual != expected {
                return Err(TgaError::SectionLength {
                    section,
                    expected,
                    actual,
                });
            }
        }
        Ok(sizes)
    }

    /// Load a file from an in-memory buffer with default settings.
    #[cfg(feature = "std")]
    pub fn from_bytes(data: &[u8]) -> Result<Self, TgaError> {
        crate::LoadRequest::new().load_bytes(data, enough::Unstoppable)
    }

    /// Serialize to a new buffer.
    #[cfg(feature = "std")]
    pub fn to_vec(&self) -> Result<Vec<u8>, TgaError> {
        crate::encode::to_vec(self, &enough::Unstoppable)
    }

    /// Bytes this file occupies when written.
    pub fn encoded_len(&self) -> Result<usize, TgaError> {
        let sizes = self.sizes()?;
        let image = if self.is_rle() {
            self.image_data.len()
        } else {
            sizes.image_data
        };
        TGA_HEADER_LEN
            .checked_add(sizes.id_field)
            .and_then(|n| n.checked_add(sizes.color_map))
            .and_then(|n| n.checked_add(image))
            .ok_or(TgaError::DimensionsTooLarge {
                width: u32::from(self.header.width),
                height: u32::from(self.header.height),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::ImageType;
    use alloc::vec;

    fn rgb_header(w: u16, h: u16) -> TgaHeader {
        TgaHeader {
            image_type: ImageType::TrueColor,
            width: w,
            height: h,
            depth: 24,
            ..Default::default()
        }
    }

    #[test]
    fn sizes_from_header() {
        let header = TgaHeader {
            id_length: 7,
            color_map_type: 1,
            color_map_length: 256,
            color_map_entry_size: 24,
            ..rgb_header(4, 3)
        };
        let sizes = SectionSizes::of(&header).unwrap();
        assert_eq!(sizes.id_field, 7);
        assert_eq!(sizes.color_map, 768);
        assert_eq!(sizes.image_data, 36);
        assert_eq!(sizes.total(), Some(811));
    }

    #[test]
    fn max_dimensions_do_not_overflow() {
        let sizes = SectionSizes::of(&TgaHeader {
            depth: 32,
            ..rgb_header(u16::MAX, u16::MAX)
        });
        if usize::BITS >= 64 {
            assert_eq!(sizes.unwrap().image_data, 65535 * 65535 * 4);
        }
    }

    #[test]
    fn check_sections_accepts_consistent_file() {
        let file = TgaFile {
            image_data: vec![0; 2 * 2 * 3],
            ..TgaFile::new(rgb_header(2, 2))
        };
        assert!(file.check_sections().is_ok());
        assert_eq!(file.encoded_len().unwrap(), 18 + 12);
    }

    #[test]
    fn check_sections_rejects_short_image() {
        let file = TgaFile {
            image_data: vec![0; 5],
            ..TgaFile::new(rgb_header(2, 2))
        };
        match file.check_sections() {
            Err(TgaError::SectionLength {
                section: Section::ImageData,
                expected: 12,
                actual: 5,
            }) => {}
            other => panic!("expected SectionLength, got {other:?}"),
        }
    }

    #[test]
    fn absent_color_map_must_be_empty() {
        let file = TgaFile {
            color_map: vec![1, 2, 3],
            image_data: vec![0; 3],
            ..TgaFile::new(TgaHeader {
                color_map_type: 0,
                color_map_length: 1,
                color_map_entry_size: 24,
                ..rgb_header(1, 1)
            })
        };
        assert!(matches!(
            file.check_sections(),
            Err(TgaError::SectionLength {
                section: Section::ColorMap,
                expected: 0,
                ..
            })
        ));
    }

    #[test]
    fn rle_image_ends_on_last_packet() {
        let file = TgaFile {
            image_data: vec![0x83, 1, 2, 3],
            ..TgaFile::new(TgaHeader {
                image_type: ImageType::RleTrueColor,
                ..rgb_header(2, 2)
            })
        };
        assert!(file.check_sections().is_ok());
        assert_eq!(file.encoded_len().unwrap(), 18 + 4);
    }

    fn rle_gray(width: u16, image_data: Vec<u8>) -> TgaFile {
        TgaFile {
            image_data,
            ..TgaFile::new(TgaHeader {
                image_type: ImageType::RleBlackAndWhite,
                width,
                height: 1,
                depth: 8,
                ..Default::default()
            })
        }
    }

    #[test]
    fn rle_bytes_after_last_packet_are_rejected() {
        // 0x00 covers the single pixel; 0xAA would be dropped on reload.
        match rle_gray(1, vec![0x00, 5, 0xAA]).check_sections() {
            Err(TgaError::SectionLength {
                section: Section::ImageData,
                expected: 2,
                actual: 3,
            }) => {}
            other => panic!("expected SectionLength, got {other:?}"),
        }
    }

    #[test]
    fn rle_stream_short_of_image_is_rejected() {
        assert!(matches!(
            rle_gray(4, Vec::new()).check_sections(),
            Err(TgaError::SectionLength {
                section: Section::ImageData,
                expected: 2,
                actual: 0,
            })
        ));
        // Run of 2 covers half of a 4-pixel row.
        assert!(matches!(
            rle_gray(4, vec![0x81, 9]).check_sections(),
            Err(TgaError::SectionLength {
                expected: 4,
                actual: 2,
                ..
            })
        ));
    }
}
