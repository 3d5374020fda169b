//! # zentga
//!
//! TGA (Targa) container codec.
//!
//! A TGA file is an 18-byte little-endian header followed by up to three
//! sections in fixed order: the image ID field, color-map data and image
//! data. Their sizes are derived from header fields. This crate reads and
//! writes that structure byte-exactly and expands RLE image data.
//!
//! ## Supported
//!
//! - Header parse/serialize for every byte pattern (unknown image types are
//!   preserved)
//! - Loading from any [`std::io::Read`], including non-blocking sources:
//!   `WouldBlock` and `Interrupted` are retried with back-off
//! - Writing to any [`std::io::Write`]
//! - RLE unpacking for image types 9, 10 and 11
//!
//! ## Non-Goals
//!
//! - Pixel format conversion (color-mapped → RGB, BGR → RGB, 16-bit unpacking)
//! - RLE compression
//! - Huffman/delta/quadtree variants (types 32, 33) beyond tagging the type
//! - TGA 2.0 extension and developer areas
//!
//! ## Usage
//!
//! ```no_run
//! use zentga::{ImageType, Unstoppable};
//!
//! let data: &[u8] = &[]; // your TGA bytes
//!
//! let file = zentga::load(&mut &data[..], Unstoppable)?;
//! println!("{}x{} {:?}", file.header.width, file.header.height, file.header.image_type);
//!
//! let pixels = if file.is_rle() {
//!     zentga::unpack_rle(&file, None, Unstoppable)?.into_pixels()
//! } else {
//!     file.image_data.clone()
//! };
//!
//! let mut out = Vec::new();
//! zentga::write(&file, &mut out, Unstoppable)?;
//! # let _ = (pixels, ImageType::TrueColor);
//! # Ok::<(), zentga::TgaError>(())
//! ```
//!
//! Without the `std` feature the header codec, section layout and RLE
//! unpacker remain available on `no_std + alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod file;
mod header;
mod limits;
mod pixel;
mod rle;

#[cfg(feature = "std")]
mod decode;
#[cfg(feature = "std")]
mod encode;
#[cfg(feature = "std")]
mod io;

// Re-exports
pub use enough::{Stop, Unstoppable};
pub use error::TgaError;
pub use file::{Section, SectionSizes, TgaFile};
pub use header::{
    ImageType, Interleave, Origin, TGA_HEADER_LEN, TgaHeader, parse_header, serialize_header,
};
pub use limits::{Limits, Permissiveness};
pub use pixel::{PixelDepth, bytes_per_pixel};
pub use rle::{MAX_PACKET_PIXELS, RleOutput, unpack_packets, unpack_rle};

#[cfg(feature = "std")]
pub use decode::LoadRequest;
#[cfg(feature = "std")]
pub use encode::write;

/// Load a TGA file from `reader` with default settings.
///
/// See [`LoadRequest`] for limits and strict validation.
#[cfg(feature = "std")]
pub fn load<R: std::io::Read + ?Sized>(reader: &mut R, stop: impl Stop) -> Result<TgaFile, TgaError> {
    LoadRequest::new().load(reader, stop)
}
