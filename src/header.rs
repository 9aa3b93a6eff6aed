//! BMP file header (14 bytes) and BITMAPINFOHEADER (40 bytes) parsing.
//!
//! Only the fields needed to locate and size an uncompressed 24-bit pixel
//! array are validated. Larger info headers (V4/V5) are accepted; the bytes
//! past the first 40 are kept verbatim in the document prefix.

use crate::bytes::{field_i32, field_u16, field_u32};
use crate::error::BmpError;

/// Size of the BITMAPFILEHEADER.
pub const FILE_HEADER_LEN: usize = 14;
/// Size of the BITMAPINFOHEADER, the smallest info header accepted.
pub const INFO_HEADER_LEN: usize = 40;
/// Both headers together.
pub const HEADERS_LEN: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;

/// The only supported bit depth.
pub const BITS_PER_PIXEL: u16 = 24;
/// BI_RGB: uncompressed.
pub const COMPRESSION_NONE: u32 = 0;

const SIGNATURE: [u8; 2] = *b"BM";

/// The 14-byte BMP file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpFileHeader {
    /// Declared file size. Informational only.
    pub file_size: u32,
    pub reserved: u32,
    /// Byte position where the pixel array begins.
    pub pixel_array_offset: u32,
}

/// The 40-byte BITMAPINFOHEADER fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpInfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Positive: rows stored bottom-up. Negative: top-down.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// Check the two signature bytes.
pub fn check_signature(sig: [u8; 2]) -> Result<(), BmpError> {
    if sig != SIGNATURE {
        return Err(BmpError::BadSignature);
    }
    Ok(())
}

impl BmpFileHeader {
    /// Parse the file header. The signature is checked before any other field.
    pub fn parse(buf: &[u8; FILE_HEADER_LEN]) -> Result<Self, BmpError> {
        check_signature([buf[0], buf[1]])?;
        Ok(Self {
            file_size: field_u32(buf, 2),
            reserved: field_u32(buf, 6),
            pixel_array_offset: field_u32(buf, 10),
        })
    }

    /// Validate the pixel-array offset against the info header it follows.
    ///
    /// The pixel array may not start before the end of the info header.
    pub fn validate_offset(&self, info: &BmpInfoHeader) -> Result<(), BmpError> {
        if self.pixel_array_offset == 0 {
            return Err(BmpError::InvalidHeader(
                "unknown start of pixel array (offset is zero)".into(),
            ));
        }
        let headers_end = FILE_HEADER_LEN as u64 + u64::from(info.header_size);
        if u64::from(self.pixel_array_offset) < headers_end {
            return Err(BmpError::InvalidHeader(format!(
                "pixel array offset {} overlaps headers ending at {headers_end}",
                self.pixel_array_offset
            )));
        }
        Ok(())
    }
}

impl BmpInfoHeader {
    /// Parse and validate the info header.
    ///
    /// Bit depth is checked before compression; both are checked before any
    /// pixel I/O can happen.
    pub fn parse(buf: &[u8; INFO_HEADER_LEN]) -> Result<Self, BmpError> {
        let header_size = field_u32(buf, 0);
        if (header_size as usize) < INFO_HEADER_LEN {
            return Err(BmpError::InvalidHeader(format!(
                "info header size {header_size} is smaller than BITMAPINFOHEADER ({INFO_HEADER_LEN})"
            )));
        }

        let bits_per_pixel = field_u16(buf, 14);
        if bits_per_pixel != BITS_PER_PIXEL {
            return Err(BmpError::UnsupportedBitDepth(bits_per_pixel));
        }

        let compression = field_u32(buf, 16);
        if compression != COMPRESSION_NONE {
            return Err(BmpError::UnsupportedCompression(compression));
        }

        Ok(Self {
            header_size,
            width: field_i32(buf, 4),
            height: field_i32(buf, 8),
            planes: field_u16(buf, 12),
            bits_per_pixel,
            compression,
            image_size: field_u32(buf, 20),
            x_pixels_per_meter: field_i32(buf, 24),
            y_pixels_per_meter: field_i32(buf, 28),
            colors_used: field_u32(buf, 32),
            colors_important: field_u32(buf, 36),
        })
    }
}

/// Both parsed headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeaders {
    pub file: BmpFileHeader,
    pub info: BmpInfoHeader,
}

impl BmpHeaders {
    /// Parse both headers from the start of `data`.
    ///
    /// The signature is checked as soon as two bytes are available, so
    /// non-BMP input is rejected as `BadSignature` even when shorter than
    /// the headers.
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        let sig = data.get(0..2).ok_or(BmpError::UnexpectedEof)?;
        check_signature([sig[0], sig[1]])?;

        let file_buf: &[u8; FILE_HEADER_LEN] = data
            .get(..FILE_HEADER_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(BmpError::UnexpectedEof)?;
        let info_buf: &[u8; INFO_HEADER_LEN] = data
            .get(FILE_HEADER_LEN..HEADERS_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(BmpError::UnexpectedEof)?;

        Self::from_buffers(file_buf, info_buf)
    }

    pub(crate) fn from_buffers(
        file_buf: &[u8; FILE_HEADER_LEN],
        info_buf: &[u8; INFO_HEADER_LEN],
    ) -> Result<Self, BmpError> {
        let file = BmpFileHeader::parse(file_buf)?;
        let info = BmpInfoHeader::parse(info_buf)?;
        file.validate_offset(&info)?;
        Ok(Self { file, info })
    }

    pub fn pixel_array_offset(&self) -> usize {
        self.file.pixel_array_offset as usize
    }
}
