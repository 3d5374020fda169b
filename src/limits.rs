/// Resource limits for load and RLE unpack operations.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for a single buffer allocation.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), crate::TgaError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(crate::TgaError::LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(crate::TgaError::LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(crate::TgaError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), crate::TgaError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(crate::TgaError::LimitExceeded(alloc::format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}

/// Controls how strictly header fields are validated on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Reject depths outside 8/16/24/32 for image data and for color-map
    /// entries that are present.
    Strict,

    /// Default. Unknown depths are sized as 4 bytes per pixel.
    #[default]
    Standard,
}

impl Permissiveness {
    pub(crate) fn check_header(self, header: &crate::TgaHeader) -> Result<(), crate::TgaError> {
        if self != Self::Strict {
            return Ok(());
        }
        if header.has_image_data() && crate::PixelDepth::from_bits(header.depth).is_none() {
            return Err(crate::TgaError::UnsupportedVariant(alloc::format!(
                "pixel depth {} bits",
                header.depth
            )));
        }
        if header.has_color_map()
            && crate::PixelDepth::from_bits(header.color_map_entry_size).is_none()
        {
            return Err(crate::TgaError::UnsupportedVariant(alloc::format!(
                "color map entry size {} bits",
                header.color_map_entry_size
            )));
        }
        Ok(())
    }
}
