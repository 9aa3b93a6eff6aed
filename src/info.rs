use core::fmt;

use crate::error::BmpError;
use crate::geometry::{Geometry, RowOrder};
use crate::header::BmpHeaders;

/// Header summary of a 24-bit BMP, obtained without reading pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub row_order: RowOrder,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub pixel_array_offset: u32,
    /// Bytes per stored row, padding included.
    pub row_size: usize,
    pub pixel_array_size: usize,
    pub colors_used: u32,
}

impl ImageInfo {
    /// Probe header data. Needs only the first 54 bytes of the file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
        let headers = BmpHeaders::parse(data)?;
        let geometry = Geometry::from_info(&headers.info)?;
        Ok(Self::new(&headers, &geometry))
    }

    pub(crate) fn new(headers: &BmpHeaders, geometry: &Geometry) -> Self {
        Self {
            width: geometry.width(),
            height: geometry.height(),
            row_order: geometry.row_order(),
            bits_per_pixel: headers.info.bits_per_pixel,
            compression: headers.info.compression,
            pixel_array_offset: headers.file.pixel_array_offset,
            row_size: geometry.row_size(),
            pixel_array_size: geometry.pixel_array_size(),
            colors_used: headers.info.colors_used,
        }
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "offset: {}", self.pixel_array_offset)?;
        writeln!(f, "bpp: {}", self.bits_per_pixel)?;
        writeln!(f, "compression: {}", self.compression)?;
        writeln!(f, "width: {}", self.width)?;
        writeln!(f, "height: {}", self.height)?;
        writeln!(f, "row order: {:?}", self.row_order)?;
        writeln!(f, "row size: {}", self.row_size)?;
        write!(f, "pixel array size: {}", self.pixel_array_size)
    }
}
