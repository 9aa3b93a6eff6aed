use core::slice::ChunksExact;

use crate::error::BmpError;
use crate::geometry::{BYTES_PER_PIXEL, Geometry};

/// A padded 24-bit pixel array in file order.
///
/// Holds exactly [`Geometry::pixel_array_size`] bytes: `height` stored rows
/// of [`Geometry::row_size`] bytes, each row being `width` blue-green-red
/// triplets followed by filler. Stored row 0 is the first row in the file,
/// which is the bottom of the image unless the header height was negative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelArray {
    bytes: Vec<u8>,
    geometry: Geometry,
}

impl PixelArray {
    /// Wrap a buffer, checking its length against the geometry.
    pub fn new(bytes: Vec<u8>, geometry: Geometry) -> Result<Self, BmpError> {
        if bytes.len() != geometry.pixel_array_size() {
            return Err(BmpError::PixelBufferMismatch {
                expected: geometry.pixel_array_size(),
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes, geometry })
    }

    pub(crate) fn from_parts(bytes: Vec<u8>, geometry: Geometry) -> Self {
        debug_assert_eq!(bytes.len(), geometry.pixel_array_size());
        Self { bytes, geometry }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Stored rows in file order, padding included.
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        self.bytes.chunks_exact(self.geometry.row_size())
    }

    /// Stored row `row` (file order), padding included.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.geometry.height() as usize {
            return None;
        }
        Some(&self.bytes[self.geometry.row_range(row)])
    }

    /// Color bytes of image row `y` (counted from the top), padding excluded.
    pub fn image_row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.geometry.height() {
            return None;
        }
        let row = self.row(self.geometry.stored_row(y))?;
        Some(&row[..self.geometry.pixel_bytes_per_row()])
    }

    /// `[blue, green, red]` of the pixel at column `x`, image row `y` from the top.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.geometry.width() {
            return None;
        }
        let row = self.image_row(y)?;
        let off = x as usize * BYTES_PER_PIXEL;
        Some([row[off], row[off + 1], row[off + 2]])
    }

    /// Typed pixels of image row `y` (counted from the top).
    #[cfg(feature = "rgb")]
    pub fn bgr_row(&self, y: u32) -> Option<impl Iterator<Item = rgb::alt::BGR8> + '_> {
        let row = self.image_row(y)?;
        Some(
            row.chunks_exact(BYTES_PER_PIXEL)
                .map(|p| rgb::alt::BGR8 {
                    b: p[0],
                    g: p[1],
                    r: p[2],
                }),
        )
    }
}

impl AsRef<[u8]> for PixelArray {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two(height: i32) -> PixelArray {
        let g = Geometry::new(2, height).unwrap();
        // row size 8: two pixels + 2 filler bytes
        let bytes = vec![
            1, 2, 3, 4, 5, 6, 0, 0, // stored row 0
            7, 8, 9, 10, 11, 12, 0, 0, // stored row 1
        ];
        PixelArray::new(bytes, g).unwrap()
    }

    #[test]
    fn rejects_wrong_length() {
        let g = Geometry::new(2, 2).unwrap();
        assert!(matches!(
            PixelArray::new(vec![0; 15], g),
            Err(BmpError::PixelBufferMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn bottom_up_lookup() {
        let px = two_by_two(2);
        assert_eq!(px.pixel(0, 0), Some([7, 8, 9]));
        assert_eq!(px.pixel(1, 1), Some([4, 5, 6]));
        assert_eq!(px.image_row(0), Some(&[7, 8, 9, 10, 11, 12][..]));
        assert_eq!(px.pixel(2, 0), None);
        assert_eq!(px.pixel(0, 2), None);
    }

    #[test]
    fn top_down_lookup() {
        let px = two_by_two(-2);
        assert_eq!(px.pixel(0, 0), Some([1, 2, 3]));
        assert_eq!(px.pixel(1, 1), Some([10, 11, 12]));
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        for height in [2, -2] {
            let px = two_by_two(height);
            assert_eq!(px.image_row(2), None);
            assert_eq!(px.image_row(u32::MAX), None);
            assert_eq!(px.pixel(0, u32::MAX), None);
            assert_eq!(px.row(usize::MAX), None);
        }
    }

    #[test]
    fn rows_in_file_order() {
        let px = two_by_two(2);
        let rows: Vec<&[u8]> = px.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], &[1, 2, 3, 4, 5, 6, 0, 0]);
        assert_eq!(px.row(1), Some(rows[1]));
        assert_eq!(px.row(2), None);
    }

    #[cfg(feature = "rgb")]
    #[test]
    fn typed_rows() {
        let px = two_by_two(2);
        let row: Vec<_> = px.bgr_row(0).unwrap().collect();
        assert_eq!(row[0], rgb::alt::BGR8 { b: 7, g: 8, r: 9 });
        assert_eq!(row.len(), 2);
    }
}
