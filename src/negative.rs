//! Photo-negative transform over a padded 24-bit pixel array.
//!
//! Each color byte becomes `255 - value`. Row filler is written as zero so
//! output is deterministic regardless of what the source left in its padding.

use enough::Stop;

use crate::error::BmpError;
use crate::geometry::Geometry;
use crate::pixels::PixelArray;

/// Negate one color channel.
#[inline]
pub const fn negate_byte(value: u8) -> u8 {
    255 - value
}

/// Produce the negated copy of `pixels`. Same length, same row order.
pub fn negate(pixels: &PixelArray, stop: &dyn Stop) -> Result<PixelArray, BmpError> {
    let geometry = *pixels.geometry();
    let mut out = vec![0u8; geometry.pixel_array_size()];
    negate_into(pixels.as_bytes(), &geometry, &mut out, stop)?;
    Ok(PixelArray::from_parts(out, geometry))
}

/// Negate `src` into `out`. Both must be exactly `pixel_array_size` bytes.
pub fn negate_into(
    src: &[u8],
    geometry: &Geometry,
    out: &mut [u8],
    stop: &dyn Stop,
) -> Result<(), BmpError> {
    let expected = geometry.pixel_array_size();
    for len in [src.len(), out.len()] {
        if len != expected {
            return Err(BmpError::PixelBufferMismatch {
                expected,
                actual: len,
            });
        }
    }

    let row_size = geometry.row_size();
    let color_bytes = geometry.pixel_bytes_per_row();
    for (row_idx, (src_row, out_row)) in src
        .chunks_exact(row_size)
        .zip(out.chunks_exact_mut(row_size))
        .enumerate()
    {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        let (out_color, out_pad) = out_row.split_at_mut(color_bytes);
        for (o, &s) in out_color.iter_mut().zip(&src_row[..color_bytes]) {
            *o = negate_byte(s);
        }
        out_pad.fill(0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[test]
    fn byte_values() {
        assert_eq!(negate_byte(0), 255);
        assert_eq!(negate_byte(255), 0);
        assert_eq!(negate_byte(128), 127);
        assert_eq!(negate_byte(1), 254);
    }

    #[test]
    fn padding_is_zeroed_not_negated() {
        let g = Geometry::new(1, 2).unwrap();
        let px = PixelArray::new(vec![0, 128, 255, 0xAB, 10, 20, 30, 0], g).unwrap();
        let neg = negate(&px, &Unstoppable).unwrap();
        assert_eq!(neg.as_bytes(), &[255, 127, 0, 0, 245, 235, 225, 0]);
    }

    #[test]
    fn double_negation_restores_colors() {
        let g = Geometry::new(5, 3).unwrap();
        let mut state: u32 = 0xDEAD_BEEF;
        let mut bytes = vec![0u8; g.pixel_array_size()];
        for b in bytes.iter_mut() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            *b = state as u8;
        }
        for row in bytes.chunks_exact_mut(g.row_size()) {
            row[g.pixel_bytes_per_row()..].fill(0);
        }
        let px = PixelArray::new(bytes, g).unwrap();
        let twice = negate(&negate(&px, &Unstoppable).unwrap(), &Unstoppable).unwrap();
        assert_eq!(twice, px);
    }

    #[test]
    fn no_padding_width() {
        let g = Geometry::new(4, 1).unwrap();
        let px = PixelArray::new((0..12).collect(), g).unwrap();
        let neg = negate(&px, &Unstoppable).unwrap();
        let expected: Vec<u8> = (0..12).map(|v| 255 - v).collect();
        assert_eq!(neg.as_bytes(), &expected[..]);
    }

    #[test]
    fn into_rejects_mismatched_buffers() {
        let g = Geometry::new(3, 2).unwrap();
        let src = vec![0u8; 24];
        let mut short = vec![0u8; 23];
        assert!(matches!(
            negate_into(&src, &g, &mut short, &Unstoppable),
            Err(BmpError::PixelBufferMismatch {
                expected: 24,
                actual: 23
            })
        ));
        let mut out = vec![0u8; 24];
        assert!(matches!(
            negate_into(&src[..20], &g, &mut out, &Unstoppable),
            Err(BmpError::PixelBufferMismatch { actual: 20, .. })
        ));
    }
}
