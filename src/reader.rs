//! Pixel array extraction, from an in-memory file or row-by-row from a stream.
//!
//! BMP pixel data has no resynchronization marker, so any short read is a
//! terminal [`BmpError::TruncatedPixelData`].

use std::io::{ErrorKind, Read};

use enough::Stop;

use crate::error::BmpError;
use crate::geometry::Geometry;
use crate::pixels::PixelArray;

/// Upper bound on the up-front buffer reservation for streamed pixel data.
const INITIAL_CAPACITY: usize = 1 << 20;

/// Copy the pixel array out of a complete in-memory BMP file.
pub fn read_pixel_array(
    data: &[u8],
    offset: usize,
    geometry: &Geometry,
    stop: &dyn Stop,
) -> Result<PixelArray, BmpError> {
    let size = geometry.pixel_array_size();
    let needed = offset
        .checked_add(size)
        .ok_or(BmpError::DimensionsTooLarge {
            width: geometry.width(),
            height: geometry.height(),
        })?;
    let src = data
        .get(offset..needed)
        .ok_or(BmpError::TruncatedPixelData {
            needed,
            actual: data.len(),
        })?;

    let mut out = Vec::with_capacity(size);
    for (row_idx, row) in src.chunks_exact(geometry.row_size()).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        out.extend_from_slice(row);
    }
    Ok(PixelArray::from_parts(out, *geometry))
}

/// Read the pixel array row by row from a stream positioned at the pixel
/// array offset.
///
/// `consumed` is the number of source bytes already read (the offset);
/// it is only used to report whole-file byte counts on truncation.
pub fn read_pixel_rows<R: Read + ?Sized>(
    reader: &mut R,
    geometry: &Geometry,
    consumed: usize,
    stop: &dyn Stop,
) -> Result<PixelArray, BmpError> {
    let size = geometry.pixel_array_size();
    let row_size = geometry.row_size();
    let needed = consumed.saturating_add(size);

    // Header values are untrusted: grow only as bytes actually arrive.
    let mut out = Vec::with_capacity(size.min(INITIAL_CAPACITY));
    for row_idx in 0..geometry.height() as usize {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        let before = out.len();
        let got = (&mut *reader).take(row_size as u64).read_to_end(&mut out)?;
        if got < row_size {
            return Err(BmpError::TruncatedPixelData {
                needed,
                actual: consumed + before + got,
            });
        }
    }
    Ok(PixelArray::from_parts(out, *geometry))
}

/// Read until `buf` is full or the stream ends. Returns bytes read.
pub(crate) fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
