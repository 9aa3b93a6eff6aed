//! Pixel-array geometry derived from the info header.

use core::ops::Range;

use crate::error::BmpError;
use crate::header::{BITS_PER_PIXEL, BmpInfoHeader};
use crate::limits::Limits;

/// Bytes per 24-bit pixel (blue, green, red).
pub const BYTES_PER_PIXEL: usize = 3;

/// Order in which rows are stored in the pixel array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowOrder {
    /// Positive height: first stored row is the bottom of the image.
    BottomUp,
    /// Negative height: first stored row is the top of the image.
    TopDown,
}

/// Row layout of an uncompressed 24-bit pixel array.
///
/// Computed once per parsed document. Every row is `row_size` bytes:
/// `width` BGR triplets followed by `padding` filler bytes, so that
/// `row_size` is a multiple of 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: u32,
    height: u32,
    row_order: RowOrder,
    row_size: usize,
    padding: usize,
    pixel_array_size: usize,
}

impl Geometry {
    /// Derive geometry from the signed header dimensions.
    pub fn new(width: i32, height: i32) -> Result<Self, BmpError> {
        if width <= 0 {
            return Err(BmpError::InvalidGeometry(format!(
                "width must be positive, got {width}"
            )));
        }
        if height == 0 {
            return Err(BmpError::InvalidGeometry("height is zero".into()));
        }
        let row_order = if height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        };
        let width = width.unsigned_abs();
        let height = height.unsigned_abs();
        let too_large = BmpError::DimensionsTooLarge { width, height };

        let row_bits = u64::from(width) * u64::from(BITS_PER_PIXEL);
        let row_size = usize::try_from((row_bits + 31) / 32 * 4).map_err(|_| too_large)?;
        let pixel_bytes = width as usize * BYTES_PER_PIXEL;
        let pixel_array_size = row_size
            .checked_mul(height as usize)
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            row_order,
            row_size,
            padding: row_size - pixel_bytes,
            pixel_array_size,
        })
    }

    /// Derive geometry from a parsed info header.
    pub fn from_info(info: &BmpInfoHeader) -> Result<Self, BmpError> {
        Self::new(info.width, info.height)
    }

    /// Check dimensions and the pixel array allocation against `limits`.
    pub fn check_limits(&self, limits: &Limits) -> Result<(), BmpError> {
        limits.check(self.width, self.height)?;
        limits.check_memory(self.pixel_array_size)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height magnitude in rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// Bytes per stored row, padding included.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Filler bytes at the end of each row.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Color bytes per row (`width * 3`).
    pub fn pixel_bytes_per_row(&self) -> usize {
        self.row_size - self.padding
    }

    /// Total bytes of the padded pixel array.
    pub fn pixel_array_size(&self) -> usize {
        self.pixel_array_size
    }

    /// Byte range of stored row `row` (file order) within the pixel array.
    ///
    /// `row` must be below `height`.
    pub(crate) fn row_range(&self, row: usize) -> Range<usize> {
        let start = row * self.row_size;
        start..start + self.row_size
    }

    /// Stored row index holding image row `y`, counted from the top.
    ///
    /// `y` must be below `height`.
    pub(crate) fn stored_row(&self, y: u32) -> usize {
        match self.row_order {
            RowOrder::BottomUp => (self.height - 1 - y) as usize,
            RowOrder::TopDown => y as usize,
        }
    }
}
