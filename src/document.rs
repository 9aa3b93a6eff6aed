//! The decode pipeline and the parsed document it produces.
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//! headers, then geometry, then the pixel array. The first failure ends the
//! pipeline; nothing partially built is returned.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use enough::{Stop, Unstoppable};

use crate::error::BmpError;
use crate::geometry::Geometry;
use crate::header::{BmpFileHeader, BmpHeaders, BmpInfoHeader, HEADERS_LEN, check_signature};
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::negative;
use crate::pixels::PixelArray;
use crate::reader::{fill, read_pixel_array, read_pixel_rows};
use crate::writer::{self, Overwrite};

/// Progress of a document through the decode pipeline.
///
/// A [`BmpDocument`] only exists once decoding has succeeded, so
/// [`BmpDocument::stage`] reports `PixelArrayLoaded` or `NegativeComputed`.
/// The earlier stages and `Failed` appear in decode diagnostics (`log`
/// trace and debug records) and are never returned from a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Unopened,
    HeaderParsed,
    GeometryDerived,
    PixelArrayLoaded,
    NegativeComputed,
    /// Terminal. A failed decode must be restarted from the source.
    Failed,
}

struct Pipeline {
    stage: Stage,
}

impl Pipeline {
    fn new() -> Self {
        Self {
            stage: Stage::Unopened,
        }
    }

    fn step<T>(
        &mut self,
        next: Stage,
        f: impl FnOnce() -> Result<T, BmpError>,
    ) -> Result<T, BmpError> {
        debug_assert_ne!(self.stage, Stage::Failed);
        match f() {
            Ok(v) => {
                log::trace!("bmp stage {:?} -> {next:?}", self.stage);
                self.stage = next;
                Ok(v)
            }
            Err(e) => {
                log::debug!("bmp decode failed after {:?}: {e}", self.stage);
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }
}

fn derive_geometry(headers: &BmpHeaders, limits: Option<&Limits>) -> Result<Geometry, BmpError> {
    let geometry = Geometry::from_info(&headers.info)?;
    if let Some(limits) = limits {
        geometry.check_limits(limits)?;
    }
    log::trace!(
        "bmp geometry {}x{} {:?}, row {} bytes ({} padding), array {} bytes",
        geometry.width(),
        geometry.height(),
        geometry.row_order(),
        geometry.row_size(),
        geometry.padding(),
        geometry.pixel_array_size()
    );
    Ok(geometry)
}

/// Decode options: resource limits.
#[derive(Clone, Debug, Default)]
pub struct DecodeRequest<'a> {
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode a complete BMP file held in memory.
    pub fn decode(&self, data: &[u8], stop: impl Stop) -> Result<BmpDocument, BmpError> {
        let stop: &dyn Stop = &stop;
        let mut p = Pipeline::new();

        let headers = p.step(Stage::HeaderParsed, || BmpHeaders::parse(data))?;
        let geometry = p.step(Stage::GeometryDerived, || {
            derive_geometry(&headers, self.limits)
        })?;
        let offset = headers.pixel_array_offset();
        let pixels = p.step(Stage::PixelArrayLoaded, || {
            stop.check()?;
            read_pixel_array(data, offset, &geometry, stop)
        })?;

        let end = offset + pixels.len();
        Ok(BmpDocument {
            headers,
            geometry,
            prefix: data[..offset].to_vec(),
            pixels,
            trailer: data[end..].to_vec(),
            negative: None,
            source: None,
            stage: p.stage,
        })
    }

    /// Decode from a stream, reading the pixel array row by row.
    ///
    /// The signature is checked after reading exactly two bytes; a non-BMP
    /// stream is not read any further.
    pub fn read_from<R: Read>(&self, mut reader: R, stop: impl Stop) -> Result<BmpDocument, BmpError> {
        let stop: &dyn Stop = &stop;
        let mut p = Pipeline::new();

        let (headers, mut prefix) = p.step(Stage::HeaderParsed, || read_headers(&mut reader))?;
        let geometry = p.step(Stage::GeometryDerived, || {
            derive_geometry(&headers, self.limits)
        })?;
        let offset = headers.pixel_array_offset();
        let (pixels, trailer) = p.step(Stage::PixelArrayLoaded, || {
            stop.check()?;
            let needed = offset.saturating_add(geometry.pixel_array_size());
            let gap = (offset - HEADERS_LEN) as u64;
            (&mut reader).take(gap).read_to_end(&mut prefix)?;
            if prefix.len() < offset {
                return Err(BmpError::TruncatedPixelData {
                    needed,
                    actual: prefix.len(),
                });
            }
            let pixels = read_pixel_rows(&mut reader, &geometry, offset, stop)?;
            let mut trailer = Vec::new();
            reader.read_to_end(&mut trailer)?;
            Ok((pixels, trailer))
        })?;

        Ok(BmpDocument {
            headers,
            geometry,
            prefix,
            pixels,
            trailer,
            negative: None,
            source: None,
            stage: p.stage,
        })
    }

    /// Open and decode a BMP file.
    pub fn open(&self, path: impl AsRef<Path>, stop: impl Stop) -> Result<BmpDocument, BmpError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut doc = self.read_from(BufReader::new(file), stop)?;
        log::debug!(
            "opened {}: {}x{}, pixel array {} bytes at offset {}",
            path.display(),
            doc.geometry.width(),
            doc.geometry.height(),
            doc.geometry.pixel_array_size(),
            doc.pixel_array_offset()
        );
        doc.source = Some(path.to_path_buf());
        Ok(doc)
    }
}

/// Read the 54 header bytes, checking the signature after the first two.
fn read_headers<R: Read>(reader: &mut R) -> Result<(BmpHeaders, Vec<u8>), BmpError> {
    let mut prefix = vec![0u8; HEADERS_LEN];
    if fill(reader, &mut prefix[..2])? < 2 {
        return Err(BmpError::UnexpectedEof);
    }
    check_signature([prefix[0], prefix[1]])?;
    if fill(reader, &mut prefix[2..])? < HEADERS_LEN - 2 {
        return Err(BmpError::UnexpectedEof);
    }
    let headers = BmpHeaders::parse(&prefix)?;
    Ok((headers, prefix))
}

/// A parsed 24-bit BMP: headers, geometry and raw pixel array.
///
/// Only exists once every decode stage has succeeded. The source is never
/// modified; edits are written to new files.
#[derive(Clone, Debug)]
pub struct BmpDocument {
    headers: BmpHeaders,
    geometry: Geometry,
    /// The first `pixel_array_offset` source bytes, verbatim.
    prefix: Vec<u8>,
    pixels: PixelArray,
    /// Source bytes after the pixel array, verbatim.
    trailer: Vec<u8>,
    negative: Option<PixelArray>,
    source: Option<PathBuf>,
    stage: Stage,
}

impl BmpDocument {
    /// Open and decode a BMP file with no limits.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BmpError> {
        DecodeRequest::new().open(path, Unstoppable)
    }

    /// Decode a complete in-memory BMP file with no limits.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
        DecodeRequest::new().decode(data, Unstoppable)
    }

    pub fn headers(&self) -> &BmpHeaders {
        &self.headers
    }

    pub fn file_header(&self) -> &BmpFileHeader {
        &self.headers.file
    }

    pub fn info_header(&self) -> &BmpInfoHeader {
        &self.headers.info
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo::new(&self.headers, &self.geometry)
    }

    pub fn pixel_array_offset(&self) -> usize {
        self.headers.pixel_array_offset()
    }

    /// Everything before the pixel array: both headers plus any color table
    /// or gap, exactly as read.
    pub fn header_prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Raw pixel array as read from the source.
    pub fn pixels(&self) -> &PixelArray {
        &self.pixels
    }

    /// Bytes following the pixel array in the source, if any.
    pub fn trailing_bytes(&self) -> &[u8] {
        &self.trailer
    }

    /// Path the document was opened from, if it came from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The cached negative, once [`Self::compute_negative`] has run.
    pub fn negative(&self) -> Option<&PixelArray> {
        self.negative.as_ref()
    }

    /// Photo negative of the pixel array. Uses the cached negative if present.
    pub fn negate(&self, stop: impl Stop) -> Result<PixelArray, BmpError> {
        if let Some(neg) = &self.negative {
            return Ok(neg.clone());
        }
        negative::negate(&self.pixels, &stop)
    }

    /// Compute and cache the photo negative.
    pub fn compute_negative(&mut self, stop: impl Stop) -> Result<&PixelArray, BmpError> {
        let neg = match self.negative.take() {
            Some(neg) => neg,
            None => {
                let neg = negative::negate(&self.pixels, &stop)?;
                log::trace!("bmp stage {:?} -> NegativeComputed", self.stage);
                self.stage = Stage::NegativeComputed;
                neg
            }
        };
        let neg: &PixelArray = self.negative.insert(neg);
        Ok(neg)
    }

    /// Edited file contents: the header prefix followed by `pixels`.
    pub fn edited_bytes(&self, pixels: &PixelArray) -> Result<Vec<u8>, BmpError> {
        writer::encode_edited(
            &self.prefix,
            pixels.as_bytes(),
            self.geometry.pixel_array_size(),
        )
    }

    /// The source file contents, reassembled byte for byte.
    pub fn copy_bytes(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.prefix.len() + self.pixels.len() + self.trailer.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(self.pixels.as_bytes());
        out.extend_from_slice(&self.trailer);
        out
    }

    /// Write the header prefix followed by `pixels` to a new file.
    ///
    /// `pixels` must be exactly as long as this document's pixel array.
    pub fn write_edited(
        &self,
        path: impl AsRef<Path>,
        pixels: &PixelArray,
        overwrite: Overwrite,
    ) -> Result<(), BmpError> {
        let expected = self.geometry.pixel_array_size();
        if pixels.len() != expected {
            return Err(BmpError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        writer::write_file(
            path.as_ref(),
            &[self.prefix.as_slice(), pixels.as_bytes()],
            overwrite,
            self.source.as_deref(),
        )
    }

    /// Negate (or reuse the cached negative) and write it as an edited file.
    pub fn write_negative(
        &self,
        path: impl AsRef<Path>,
        overwrite: Overwrite,
        stop: impl Stop,
    ) -> Result<(), BmpError> {
        let neg = self.negate(stop)?;
        self.write_edited(path, &neg, overwrite)
    }

    /// Write a byte-for-byte copy of the source.
    pub fn write_copy(&self, path: impl AsRef<Path>, overwrite: Overwrite) -> Result<(), BmpError> {
        writer::write_file(
            path.as_ref(),
            &[
                self.prefix.as_slice(),
                self.pixels.as_bytes(),
                self.trailer.as_slice(),
            ],
            overwrite,
            self.source.as_deref(),
        )
    }
}
