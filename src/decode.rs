use std::io::Read;

use alloc::vec::Vec;
use enough::Stop;
use log::debug;

use crate::error::TgaError;
use crate::file::{SectionSizes, TgaFile};
use crate::header::{TGA_HEADER_LEN, TgaHeader};
use crate::io::{read_full, read_vec, skip};
use crate::limits::{Limits, Permissiveness};
use crate::pixel::bytes_per_pixel;
use crate::rle::{packet_header, payload_len};

/// Builder for loading a TGA file from a byte stream.
///
/// ```no_run
/// use zentga::{LoadRequest, Limits, Unstoppable};
///
/// let limits = Limits { max_pixels: Some(16_000_000), ..Default::default() };
/// let mut src = std::fs::File::open("image.tga")?;
/// let file = LoadRequest::new()
///     .with_limits(&limits)
///     .load(&mut src, Unstoppable)?;
/// println!("{}x{}", file.header.width, file.header.height);
/// # Ok::<(), zentga::TgaError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoadRequest<'a> {
    limits: Option<&'a Limits>,
    permissiveness: Permissiveness,
}

impl<'a> LoadRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Load a complete file from `reader`.
    ///
    /// Reads the header and exactly the sections it declares; anything after
    /// them stays in the reader. RLE image data is read packet by packet, so
    /// wrap unbuffered sources in a [`std::io::BufReader`].
    pub fn load<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        stop: impl Stop,
    ) -> Result<TgaFile, TgaError> {
        load_file(reader, self.limits, self.permissiveness, &stop)
    }

    /// Load from an in-memory buffer. Trailing bytes are ignored.
    pub fn load_bytes(&self, mut data: &[u8], stop: impl Stop) -> Result<TgaFile, TgaError> {
        self.load(&mut data, stop)
    }
}

pub(crate) fn load_file<R: Read + ?Sized>(
    reader: &mut R,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<TgaFile, TgaError> {
    let mut raw = [0u8; TGA_HEADER_LEN];
    let got = read_full(reader, &mut raw, stop)?;
    if got < TGA_HEADER_LEN {
        return Err(TgaError::TruncatedHeader { actual: got });
    }
    let header = TgaHeader::from_bytes(&raw);
    debug!(
        "TGA header: {}x{} depth {} type {:?}, id {} bytes, color map type {} ({} entries of {} bits)",
        header.width,
        header.height,
        header.depth,
        header.image_type,
        header.id_length,
        header.color_map_type,
        header.color_map_length,
        header.color_map_entry_size,
    );

    permissiveness.check_header(&header)?;
    if let Some(limits) = limits {
        limits.check(u32::from(header.width), u32::from(header.height))?;
    }

    let sizes = SectionSizes::of(&header)?;
    let expected = sizes.total().ok_or(TgaError::DimensionsTooLarge {
        width: u32::from(header.width),
        height: u32::from(header.height),
    })?;
    if let Some(limits) = limits {
        limits.check_memory(sizes.image_data)?;
        limits.check_memory(sizes.color_map)?;
    }

    let mut body = BodyReader {
        reader,
        stop,
        expected,
        read: 0,
    };

    let id_field = body.section(sizes.id_field, header.has_id_field())?;
    let color_map = body.section(sizes.color_map, header.has_color_map())?;
    if !header.has_color_map() && sizes.color_map > 0 {
        debug!(
            "skipped {} color map bytes: color map type is 0",
            sizes.color_map
        );
    }

    let image_data = if header.image_type.is_rle() {
        let pixels = usize::from(header.width) * usize::from(header.height);
        body.rle_packets(pixels, bytes_per_pixel(header.depth))?
    } else {
        body.section(sizes.image_data, header.has_image_data())?
    };

    Ok(TgaFile {
        header,
        id_field,
        color_map,
        image_data,
    })
}

/// Tracks body progress so a short stream reports the full shortfall.
struct BodyReader<'r, 's, R: Read + ?Sized> {
    reader: &'r mut R,
    stop: &'s dyn Stop,
    expected: usize,
    read: usize,
}

impl<R: Read + ?Sized> BodyReader<'_, '_, R> {
    fn incomplete(&self) -> TgaError {
        TgaError::IncompleteBody {
            expected: self.expected,
            actual: self.read,
        }
    }

    /// Read a fixed-size section, keeping it only when `present`.
    fn section(&mut self, len: usize, present: bool) -> Result<Vec<u8>, TgaError> {
        if present {
            let data = read_vec(&mut *self.reader, len, self.stop)?;
            self.read += data.len();
            if data.len() < len {
                return Err(self.incomplete());
            }
            Ok(data)
        } else {
            let skipped = skip(&mut *self.reader, len, self.stop)?;
            self.read += skipped;
            if skipped < len {
                return Err(self.incomplete());
            }
            Ok(Vec::new())
        }
    }

    /// Read RLE packets until `pixels` pixels are covered, returning the
    /// encoded bytes.
    fn rle_packets(&mut self, pixels: usize, bpp: usize) -> Result<Vec<u8>, TgaError> {
        // The uncompressed size is only an estimate of the encoded size.
        self.expected = self.expected.saturating_sub(pixels * bpp);
        let mut out = Vec::new();
        let mut covered = 0usize;
        let mut packets = 0u32;
        while covered < pixels {
            packets = packets.wrapping_add(1);
            if packets % 1024 == 0 {
                self.stop.check()?;
            }

            let mut head = [0u8; 1];
            self.expected += 1;
            if read_full(&mut *self.reader, &mut head, self.stop)? == 0 {
                return Err(self.incomplete());
            }
            self.read += 1;
            out.push(head[0]);

            let (is_run, count) = packet_header(head[0]);
            let payload = payload_len(is_run, count, bpp);
            self.expected += payload;
            let start = out.len();
            out.resize(start + payload, 0);
            let got = read_full(&mut *self.reader, &mut out[start..], self.stop)?;
            self.read += got;
            if got < payload {
                return Err(self.incomplete());
            }
            covered += count;
        }
        debug!(
            "read {} RLE bytes in {packets} packets for {pixels} pixels",
            out.len()
        );
        Ok(out)
    }
}
