//! Little-endian field decoding for BMP headers.
//!
//! All multi-byte BMP header fields are stored least-significant byte first.

/// Decode a little-endian `u16`.
#[inline]
pub fn read_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Decode a little-endian `u32`.
#[inline]
pub fn read_u32_le(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// Decode a little-endian two's-complement `i32` (BMP width/height).
#[inline]
pub fn read_i32_le(bytes: [u8; 4]) -> i32 {
    i32::from_le_bytes(bytes)
}

// Header buffers are fixed-size arrays, so the offsets below are checked at
// the call sites by construction.

#[inline]
pub(crate) fn field_u16<const N: usize>(buf: &[u8; N], at: usize) -> u16 {
    read_u16_le([buf[at], buf[at + 1]])
}

#[inline]
pub(crate) fn field_u32<const N: usize>(buf: &[u8; N], at: usize) -> u32 {
    read_u32_le([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

#[inline]
pub(crate) fn field_i32<const N: usize>(buf: &[u8; N], at: usize) -> i32 {
    read_i32_le([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
