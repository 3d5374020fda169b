//! TGA run-length packet decoding.
//!
//! Each packet starts with one header byte. Bit 7 set marks a run-length
//! packet (one pixel follows, repeated), clear marks a raw packet (that many
//! distinct pixels follow). Bits 0–6 hold the pixel count minus one.
//!
//! Decoding stops once the declared image size has been produced. A final
//! packet that overshoots is clamped, and input after it is left unread.
//! Input that runs out first is an error.

use alloc::vec::Vec;
use enough::Stop;
use log::debug;

use crate::error::TgaError;
use crate::file::{SectionSizes, TgaFile};
use crate::limits::Limits;
use crate::pixel::bytes_per_pixel;

/// Pixels covered by one packet at most.
pub const MAX_PACKET_PIXELS: usize = 128;

const RUN_FLAG: u8 = 0x80;
const COUNT_MASK: u8 = 0x7F;

/// Decoded pixel bytes from an RLE stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RleOutput {
    pixels: Vec<u8>,
    consumed: usize,
}

impl RleOutput {
    /// The decompressed pixel bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Decompressed length in bytes.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Encoded bytes read to produce the output.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Split a packet header byte into (is_run, pixel count).
#[inline]
pub(crate) fn packet_header(byte: u8) -> (bool, usize) {
    (byte & RUN_FLAG != 0, usize::from(byte & COUNT_MASK) + 1)
}

/// Encoded payload bytes following a packet header.
#[inline]
pub(crate) fn payload_len(is_run: bool, count: usize, bpp: usize) -> usize {
    if is_run { bpp } else { count * bpp }
}

/// Length of the packet prefix of `encoded` that covers `pixels`.
///
/// Returns `Err` with the shortest length a complete stream could have
/// when `encoded` ends before `pixels` are covered.
pub(crate) fn packet_stream_len(
    encoded: &[u8],
    bpp: usize,
    pixels: usize,
) -> Result<usize, usize> {
    // Fewest bytes that can still cover `left` pixels.
    let min_tail = |left: usize| left.div_ceil(MAX_PACKET_PIXELS).saturating_mul(1 + bpp);

    let mut pos = 0usize;
    let mut covered = 0usize;
    while covered < pixels {
        let Some(&head) = encoded.get(pos) else {
            return Err(pos.saturating_add(min_tail(pixels - covered)));
        };
        let (is_run, count) = packet_header(head);
        let end = pos + 1 + payload_len(is_run, count, bpp);
        covered += count;
        if end > encoded.len() {
            return Err(end.saturating_add(min_tail(pixels.saturating_sub(covered))));
        }
        pos = end;
    }
    Ok(pos)
}

/// Expand the RLE image data of `file`.
///
/// `file.header.image_type` must be 9, 10 or 11. The output holds exactly
/// `width * height * bytes_per_pixel(depth)` bytes.
pub fn unpack_rle(
    file: &TgaFile,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<RleOutput, TgaError> {
    let header = &file.header;
    if !header.image_type.is_rle() {
        return Err(TgaError::UnsupportedVariant(alloc::format!(
            "image type {} is not run-length encoded",
            header.image_type.to_u8()
        )));
    }
    if let Some(limits) = limits {
        limits.check(u32::from(header.width), u32::from(header.height))?;
    }
    let expected = SectionSizes::of(header)?.image_data;
    if let Some(limits) = limits {
        limits.check_memory(expected)?;
    }
    decode_packets(
        &file.image_data,
        bytes_per_pixel(header.depth),
        expected,
        &stop,
    )
}

/// Expand an RLE packet stream until `expected_len` bytes are produced.
///
/// `bytes_per_pixel` is the pixel width in the packets (1–4 for TGA).
pub fn unpack_packets(
    encoded: &[u8],
    bytes_per_pixel: usize,
    expected_len: usize,
    stop: impl Stop,
) -> Result<RleOutput, TgaError> {
    if bytes_per_pixel == 0 {
        return Err(TgaError::UnsupportedVariant(
            "zero bytes per pixel".into(),
        ));
    }
    decode_packets(encoded, bytes_per_pixel, expected_len, &stop)
}

fn decode_packets(
    encoded: &[u8],
    bpp: usize,
    expected_len: usize,
    stop: &dyn Stop,
) -> Result<RleOutput, TgaError> {
    // A packet of at least 1 + bpp bytes yields at most 128 pixels.
    let capacity = expected_len.min(encoded.len().saturating_mul(MAX_PACKET_PIXELS));
    let mut out = Vec::with_capacity(capacity);
    let mut pos = 0usize;
    let mut packets = 0u32;

    let truncated = |actual: usize| TgaError::TruncatedRle {
        expected: expected_len,
        actual,
    };

    while out.len() < expected_len {
        packets = packets.wrapping_add(1);
        if packets % 1024 == 0 {
            stop.check()?;
        }

        let &head = encoded.get(pos).ok_or_else(|| truncated(out.len()))?;
        pos += 1;
        let (is_run, count) = packet_header(head);
        let payload = encoded
            .get(pos..pos + payload_len(is_run, count, bpp))
            .ok_or_else(|| truncated(out.len()))?;
        pos += payload.len();

        let remaining = expected_len - out.len();
        if is_run {
            let run_bytes = count * bpp;
            if run_bytes > remaining {
                debug!(
                    "RLE run of {count} pixels overruns image by {} bytes, clamping",
                    run_bytes - remaining
                );
            }
            let mut left = run_bytes.min(remaining);
            while left > 0 {
                let n = left.min(bpp);
                out.extend_from_slice(&payload[..n]);
                left -= n;
            }
        } else {
            if payload.len() > remaining {
                debug!(
                    "RLE raw packet of {count} pixels overruns image by {} bytes, clamping",
                    payload.len() - remaining
                );
            }
            out.extend_from_slice(&payload[..payload.len().min(remaining)]);
        }
    }

    Ok(RleOutput {
        pixels: out,
        consumed: pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{ImageType, TgaHeader};
    use alloc::vec;
    use enough::Unstoppable;

    fn rle_file(width: u16, height: u16, depth: u8, data: Vec<u8>) -> TgaFile {
        TgaFile {
            image_data: data,
            ..TgaFile::new(TgaHeader {
                image_type: ImageType::RleBlackAndWhite,
                width,
                height,
                depth,
                ..Default::default()
            })
        }
    }

    #[test]
    fn run_packet_repeats_pixel() {
        let file = rle_file(2, 1, 8, vec![0x81, 0xFF]);
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert_eq!(out.pixels(), &[0xFF, 0xFF]);
        assert_eq!(out.len(), 2);
        assert_eq!(out.consumed(), 2);
    }

    #[test]
    fn raw_packet_copies_pixels() {
        let file = rle_file(3, 1, 8, vec![0x02, 0x10, 0x20, 0x30]);
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert_eq!(out.pixels(), &[0x10, 0x20, 0x30]);
    }

    #[test]
    fn high_bit_alone_decides_packet_kind() {
        // 0x7F: raw, 128 pixels. 0x80: run, 1 pixel.
        assert_eq!(packet_header(0x7F), (false, 128));
        assert_eq!(packet_header(0x80), (true, 1));
        assert_eq!(packet_header(0xFF), (true, 128));
        assert_eq!(packet_header(0x00), (false, 1));
    }

    #[test]
    fn mixed_packets_24bit() {
        let data = vec![
            0x81, 1, 2, 3, // run of 2 BGR pixels
            0x01, 4, 5, 6, 7, 8, 9, // 2 raw pixels
        ];
        let file = rle_file(2, 2, 24, data);
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert_eq!(
            out.pixels(),
            &[1, 2, 3, 1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn packets_may_span_scanlines() {
        // 3x2 image, one run covering the whole thing.
        let file = rle_file(3, 2, 16, vec![0x85, 0xAB, 0xCD]);
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert_eq!(out.pixels(), &[0xABu8, 0xCD].repeat(6)[..]);
    }

    #[test]
    fn overshooting_run_is_clamped() {
        let file = rle_file(2, 1, 8, vec![0x8F, 0x55, 0x00, 0x99]);
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert_eq!(out.pixels(), &[0x55, 0x55]);
        // Trailing packet left unread.
        assert_eq!(out.consumed(), 2);
    }

    #[test]
    fn overshooting_raw_packet_is_clamped() {
        let file = rle_file(2, 1, 8, vec![0x03, 1, 2, 3, 4]);
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert_eq!(out.pixels(), &[1, 2]);
        assert_eq!(out.consumed(), 5);
    }

    #[test]
    fn exhausted_input_is_an_error() {
        let file = rle_file(4, 1, 8, vec![0x81, 0x11]);
        match unpack_rle(&file, None, Unstoppable) {
            Err(TgaError::TruncatedRle {
                expected: 4,
                actual: 2,
            }) => {}
            other => panic!("expected TruncatedRle, got {other:?}"),
        }
    }

    #[test]
    fn packet_cut_mid_payload_is_an_error() {
        let file = rle_file(3, 1, 8, vec![0x02, 0x10, 0x20]);
        assert!(matches!(
            unpack_rle(&file, None, Unstoppable),
            Err(TgaError::TruncatedRle { actual: 0, .. })
        ));
    }

    #[test]
    fn empty_image_needs_no_input() {
        let file = rle_file(0, 5, 8, Vec::new());
        let out = unpack_rle(&file, None, Unstoppable).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.consumed(), 0);
    }

    #[test]
    fn rejects_uncompressed_type() {
        let mut file = rle_file(1, 1, 8, vec![0]);
        file.header.image_type = ImageType::BlackAndWhite;
        assert!(matches!(
            unpack_rle(&file, None, Unstoppable),
            Err(TgaError::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn memory_limit_applies_to_output() {
        let file = rle_file(100, 100, 32, vec![0xFF, 0, 0, 0, 0]);
        let limits = Limits {
            max_memory_bytes: Some(1000),
            ..Default::default()
        };
        assert!(matches!(
            unpack_rle(&file, Some(&limits), Unstoppable),
            Err(TgaError::LimitExceeded(_))
        ));
    }

    #[test]
    fn stream_len_ends_on_covering_packet() {
        // 0x81 covers 2 of 3 pixels, 0x00 the last one.
        let data = [0x81, 7, 0x00, 8, 0xEE, 0xEE];
        assert_eq!(packet_stream_len(&data, 1, 3), Ok(4));
        assert_eq!(packet_stream_len(&data[..4], 1, 3), Ok(4));
        assert_eq!(packet_stream_len(&[], 1, 0), Ok(0));
    }

    #[test]
    fn stream_len_reports_minimum_when_short() {
        // Nothing for 4 RGB pixels: one run packet at least.
        assert_eq!(packet_stream_len(&[], 3, 4), Err(4));
        // 300 pixels need three packets of 1 + 2 bytes.
        assert_eq!(packet_stream_len(&[], 2, 300), Err(9));
        // Raw packet of 3 cut after one pixel, 1 pixel still to cover.
        assert_eq!(packet_stream_len(&[0x02, 1], 1, 4), Err(4 + 2));
    }

    #[test]
    fn unpack_packets_on_slices() {
        let out = unpack_packets(&[0x80, 9, 9, 0x00, 1, 2], 2, 4, Unstoppable).unwrap();
        assert_eq!(out.into_pixels(), vec![9, 9, 1, 2]);
    }
}
