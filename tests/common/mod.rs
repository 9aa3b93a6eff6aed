#![allow(dead_code)]

/// Builder for synthetic 24-bit BMP files.
pub struct BmpBuilder {
    pub width: i32,
    pub height: i32,
    pub bits_per_pixel: u16,
    pub compression: u32,
    /// Bytes between the 54-byte headers and the pixel array.
    pub gap: usize,
    pub padding_fill: u8,
    pub trailer: Vec<u8>,
}

impl BmpBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 24,
            compression: 0,
            gap: 0,
            padding_fill: 0,
            trailer: Vec::new(),
        }
    }

    pub fn row_size(&self) -> usize {
        (self.width.unsigned_abs() as usize * 24).div_ceil(32) * 4
    }

    pub fn offset(&self) -> usize {
        54 + self.gap
    }

    /// Encode with color bytes taken from `colors` (`width * 3` per row, file order).
    pub fn build(&self, colors: &[u8]) -> Vec<u8> {
        let w = self.width.unsigned_abs() as usize;
        let h = self.height.unsigned_abs() as usize;
        let row_size = self.row_size();
        let image = row_size * h;
        let mut out = Vec::with_capacity(self.offset() + image + self.trailer.len());

        out.extend_from_slice(b"BM");
        out.extend_from_slice(&((self.offset() + image + self.trailer.len()) as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&(self.offset() as u32).to_le_bytes());
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&(image as u32).to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend((0..self.gap).map(|i| i as u8));

        for row in colors.chunks_exact(w * 3).take(h) {
            out.extend_from_slice(row);
            out.extend(core::iter::repeat_n(self.padding_fill, row_size - w * 3));
        }
        out.extend_from_slice(&self.trailer);
        out
    }
}

pub fn checkerboard(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * 3;
            for c in 0..3 {
                pixels[off + c] = if (x + y) % 2 == 0 {
                    200 + (c as u8 * 20)
                } else {
                    10 + (c as u8 * 30)
                };
            }
        }
    }
    pixels
}

pub fn noise_pattern(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * 3];
    let mut state: u32 = 0xDEAD_BEEF;
    for p in pixels.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = state as u8;
    }
    pixels
}
