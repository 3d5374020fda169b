use std::io::Write;

use alloc::vec::Vec;
use enough::Stop;
use log::debug;

use crate::error::TgaError;
use crate::file::TgaFile;
use crate::io::{flush, write_all, write_zeros};

/// Write `file` to `sink`: header, ID field, color map, image data.
///
/// Buffer lengths are checked against the header before the first byte goes
/// out. After that, a failing write aborts with [`TgaError::Io`] and whatever
/// was already written stays in the sink; nothing is rolled back.
///
/// A section whose header flag marks it absent but whose declared length is
/// nonzero is written as zeros, keeping later sections at the offsets a
/// reader computes.
pub fn write<W: Write + ?Sized>(
    file: &TgaFile,
    sink: &mut W,
    stop: impl Stop,
) -> Result<(), TgaError> {
    write_file(file, sink, &stop)
}

pub(crate) fn write_file<W: Write + ?Sized>(
    file: &TgaFile,
    sink: &mut W,
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let sizes = file.check_sections()?;
    let header = &file.header;
    stop.check()?;

    write_all(sink, &header.to_bytes(), stop)?;
    write_all(sink, &file.id_field, stop)?;

    if sizes.color_map > 0 {
        if header.has_color_map() {
            write_all(sink, &file.color_map, stop)?;
        } else {
            debug!("padding {} absent color map bytes", sizes.color_map);
            write_zeros(sink, sizes.color_map, stop)?;
        }
    }

    if header.image_type.is_rle() {
        if !file.image_data.is_empty() {
            write_all(sink, &file.image_data, stop)?;
        }
    } else if sizes.image_data > 0 {
        if header.has_image_data() {
            write_all(sink, &file.image_data, stop)?;
        } else {
            debug!("padding {} absent image data bytes", sizes.image_data);
            write_zeros(sink, sizes.image_data, stop)?;
        }
    }

    flush(sink, stop)
}

/// Serialize `file` to a new buffer.
pub(crate) fn to_vec(file: &TgaFile, stop: &dyn Stop) -> Result<Vec<u8>, TgaError> {
    let mut out = Vec::with_capacity(file.encoded_len()?);
    write_file(file, &mut out, stop)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Section;
    use crate::header::{ImageType, TgaHeader};
    use alloc::vec;
    use enough::Unstoppable;

    #[test]
    fn emits_sections_in_order() {
        let file = TgaFile {
            header: TgaHeader {
                id_length: 1,
                color_map_type: 1,
                color_map_length: 1,
                color_map_entry_size: 16,
                image_type: ImageType::ColorMapped,
                width: 2,
                height: 1,
                depth: 8,
                ..Default::default()
            },
            id_field: vec![b'x'],
            color_map: vec![0xC0, 0xC1],
            image_data: vec![0, 0],
        };
        let out = to_vec(&file, &Unstoppable).unwrap();
        assert_eq!(&out[..18], &file.header.to_bytes());
        assert_eq!(&out[18..], &[b'x', 0xC0, 0xC1, 0, 0]);
    }

    #[test]
    fn pads_absent_color_map() {
        let file = TgaFile {
            image_data: vec![9],
            ..TgaFile::new(TgaHeader {
                color_map_length: 3,
                color_map_entry_size: 8,
                image_type: ImageType::BlackAndWhite,
                width: 1,
                height: 1,
                depth: 8,
                ..Default::default()
            })
        };
        let out = to_vec(&file, &Unstoppable).unwrap();
        assert_eq!(&out[18..], &[0, 0, 0, 9]);
    }

    #[test]
    fn short_buffer_writes_nothing() {
        let file = TgaFile {
            id_field: vec![1, 2],
            ..TgaFile::new(TgaHeader {
                id_length: 3,
                ..Default::default()
            })
        };
        let mut out = Vec::new();
        match write_file(&file, &mut out, &Unstoppable) {
            Err(TgaError::SectionLength {
                section: Section::IdField,
                expected: 3,
                actual: 2,
            }) => {}
            other => panic!("expected SectionLength, got {other:?}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn header_only_file() {
        let file = TgaFile::new(TgaHeader::default());
        assert_eq!(to_vec(&file, &Unstoppable).unwrap(), vec![0u8; 18]);
    }
}
