//! # zennegative
//!
//! Uncompressed 24-bit BMP decoder, photo-negative transform, and re-encoder.
//!
//! A file is decoded in strict stages (file header, info header, geometry,
//! pixel array) into a [`BmpDocument`]. The document can produce a negated
//! [`PixelArray`] and write it back behind the source's original header bytes,
//! or write a byte-for-byte copy of the source. The source file is never
//! modified.
//!
//! ## Supported input
//!
//! - `BM` signature, BITMAPINFOHEADER or larger (V4/V5 headers are carried
//!   through verbatim)
//! - 24 bits per pixel, compression 0 (BI_RGB)
//! - Bottom-up (positive height) and top-down (negative height) row order
//!
//! ## Non-Goals
//!
//! - RLE/bitfield compression, palettes, other bit depths
//! - Other image formats
//! - Interactive or command-line front ends
//!
//! ## Usage
//!
//! ```no_run
//! use zennegative::{BmpDocument, OutputKind, Overwrite, Unstoppable, output_path};
//!
//! let doc = BmpDocument::open("photo.bmp")?;
//! println!("{}", doc.info());
//!
//! let negative = doc.negate(Unstoppable)?;
//! doc.write_edited(output_path("photo.bmp".as_ref(), OutputKind::Edited), &negative, Overwrite::Allow)?;
//! doc.write_copy(output_path("photo.bmp".as_ref(), OutputKind::Copy), Overwrite::Deny)?;
//! # Ok::<(), zennegative::BmpError>(())
//! ```

#![forbid(unsafe_code)]

mod document;
mod error;
mod info;
mod limits;
mod pixels;

pub mod bytes;
pub mod geometry;
pub mod header;
pub mod negative;
pub mod reader;
pub mod writer;

// Re-exports
pub use document::{BmpDocument, DecodeRequest, Stage};
pub use enough::{Stop, Unstoppable};
pub use error::BmpError;
pub use geometry::{Geometry, RowOrder};
pub use header::{BmpFileHeader, BmpHeaders, BmpInfoHeader};
pub use info::ImageInfo;
pub use limits::Limits;
pub use pixels::PixelArray;
pub use writer::{OutputKind, Overwrite, copy_file, output_path};

use std::path::Path;

/// Open and decode a 24-bit BMP file.
pub fn open(path: impl AsRef<Path>) -> Result<BmpDocument, BmpError> {
    BmpDocument::open(path)
}

/// Read only the headers of an in-memory BMP.
pub fn probe(data: &[u8]) -> Result<ImageInfo, BmpError> {
    ImageInfo::from_bytes(data)
}

/// Photo negative of a pixel array: every color byte becomes `255 - value`,
/// row padding becomes zero.
pub fn negate(pixels: &PixelArray, stop: impl Stop) -> Result<PixelArray, BmpError> {
    negative::negate(pixels, &stop)
}
