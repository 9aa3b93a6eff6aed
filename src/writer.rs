//! BMP output: edited files (verbatim header prefix + new pixel array) and
//! verbatim copies.
//!
//! Stateless free functions. Every write creates or truncates the destination
//! according to [`Overwrite`], never touches the source, and removes the
//! destination again if the write fails part-way.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::BmpError;

/// What to do when the destination already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Truncate and replace an existing destination.
    #[default]
    Allow,
    /// Fail with an `AlreadyExists` I/O error.
    Deny,
}

/// Purpose of an output file, used to derive its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// Negated (or otherwise edited) pixels.
    Edited,
    /// Byte-for-byte copy.
    Copy,
}

impl OutputKind {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Edited => "_EDITED",
            Self::Copy => "_COPY",
        }
    }
}

/// Default output path: `<dir>/<stem><suffix>.bmp` next to `source`.
///
/// `photos/cat.bmp` becomes `photos/cat_EDITED.bmp` or `photos/cat_COPY.bmp`.
pub fn output_path(source: &Path, kind: OutputKind) -> PathBuf {
    let mut name = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(kind.suffix());
    name.push(".bmp");
    source.with_file_name(name)
}

/// Assemble an edited BMP: `prefix` (the source's first pixel-array-offset
/// bytes) followed by `pixels`.
///
/// `pixels` must be exactly `expected_len` bytes; anything else would either
/// truncate color data or leave the header describing the wrong size.
pub fn encode_edited(prefix: &[u8], pixels: &[u8], expected_len: usize) -> Result<Vec<u8>, BmpError> {
    if pixels.len() != expected_len {
        return Err(BmpError::PixelBufferMismatch {
            expected: expected_len,
            actual: pixels.len(),
        });
    }
    let mut out = Vec::with_capacity(prefix.len() + pixels.len());
    out.extend_from_slice(prefix);
    out.extend_from_slice(pixels);
    Ok(out)
}

/// Write `parts` back to back into a new file at `dest`.
///
/// `source`, when known, is refused as a destination.
pub fn write_file(
    dest: &Path,
    parts: &[&[u8]],
    overwrite: Overwrite,
    source: Option<&Path>,
) -> Result<(), BmpError> {
    if let Some(source) = source {
        ensure_not_source(dest, source)?;
    }
    let mut file = create(dest, overwrite)?;
    let result = parts
        .iter()
        .try_for_each(|part| file.write_all(part))
        .and_then(|()| file.flush());
    finish(dest, file, result)?;
    log::debug!(
        "wrote {} bytes to {}",
        parts.iter().map(|p| p.len()).sum::<usize>(),
        dest.display()
    );
    Ok(())
}

/// Copy any file byte-for-byte, without parsing it. Returns bytes copied.
pub fn copy_file(source: &Path, dest: &Path, overwrite: Overwrite) -> Result<u64, BmpError> {
    ensure_not_source(dest, source)?;
    let mut input = File::open(source)?;
    let mut file = create(dest, overwrite)?;
    let mut copied = 0;
    let result = io::copy(&mut input, &mut file).map(|n| copied = n);
    finish(dest, file, result)?;
    log::debug!(
        "copied {copied} bytes from {} to {}",
        source.display(),
        dest.display()
    );
    Ok(copied)
}

fn create(dest: &Path, overwrite: Overwrite) -> Result<File, BmpError> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    match overwrite {
        Overwrite::Allow => opts.create(true).truncate(true),
        Overwrite::Deny => opts.create_new(true),
    };
    Ok(opts.open(dest)?)
}

/// Close `file`; on any failure remove the partially written destination.
fn finish(dest: &Path, file: File, result: io::Result<()>) -> Result<(), BmpError> {
    let result = result.and_then(|()| file.sync_all());
    drop(file);
    if let Err(err) = result {
        if let Err(rm) = fs::remove_file(dest) {
            log::warn!(
                "failed to remove partial output {}: {rm}",
                dest.display()
            );
        }
        return Err(err.into());
    }
    Ok(())
}

fn ensure_not_source(dest: &Path, source: &Path) -> Result<(), BmpError> {
    if dest == source {
        return Err(BmpError::SameFile);
    }
    // Only an existing destination can alias the source.
    if let (Ok(d), Ok(s)) = (fs::canonicalize(dest), fs::canonicalize(source))
        && d == s
    {
        return Err(BmpError::SameFile);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        let src = Path::new("photos/cat.bmp");
        assert_eq!(
            output_path(src, OutputKind::Edited),
            PathBuf::from("photos/cat_EDITED.bmp")
        );
        assert_eq!(
            output_path(src, OutputKind::Copy),
            PathBuf::from("photos/cat_COPY.bmp")
        );
        assert_eq!(
            output_path(Path::new("noext"), OutputKind::Copy),
            PathBuf::from("noext_COPY.bmp")
        );
        assert_eq!(
            output_path(Path::new("a.b.bmp"), OutputKind::Edited),
            PathBuf::from("a.b_EDITED.bmp")
        );
    }

    #[test]
    fn edited_is_prefix_then_pixels() {
        let out = encode_edited(b"HEADER", &[1, 2, 3, 4], 4).unwrap();
        assert_eq!(out, b"HEADER\x01\x02\x03\x04");
    }

    #[test]
    fn edited_rejects_wrong_length() {
        assert!(matches!(
            encode_edited(b"H", &[1, 2, 3], 4),
            Err(BmpError::PixelBufferMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn deny_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bmp");
        fs::write(&dest, b"keep").unwrap();
        let err = write_file(&dest, &[b"new".as_slice()], Overwrite::Deny, None).unwrap_err();
        match err {
            BmpError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("expected Io, got {other:?}"),
        }
        assert_eq!(fs::read(&dest).unwrap(), b"keep");
    }

    #[test]
    fn allow_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bmp");
        fs::write(&dest, b"a much longer old body").unwrap();
        write_file(&dest, &[b"ne".as_slice(), b"w".as_slice()], Overwrite::Allow, None).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn refuses_to_overwrite_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.bmp");
        fs::write(&src, b"original").unwrap();
        let alias = dir.path().join(".").join("in.bmp");
        assert!(matches!(
            write_file(&alias, &[b"x".as_slice()], Overwrite::Allow, Some(&src)),
            Err(BmpError::SameFile)
        ));
        assert!(matches!(
            copy_file(&src, &src, Overwrite::Allow),
            Err(BmpError::SameFile)
        ));
        assert_eq!(fs::read(&src).unwrap(), b"original");
    }

    #[test]
    fn copy_is_byte_identical_for_any_content() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("not_a_bitmap.txt");
        let body: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        fs::write(&src, &body).unwrap();
        let dest = output_path(&src, OutputKind::Copy);
        assert_eq!(copy_file(&src, &dest, Overwrite::Deny).unwrap(), 5000);
        assert_eq!(fs::read(&dest).unwrap(), body);
    }

    #[test]
    fn missing_source_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bmp");
        let err = copy_file(&dir.path().join("missing.bmp"), &dest, Overwrite::Allow);
        assert!(matches!(err, Err(BmpError::Io(_))));
        assert!(!dest.exists());
    }
}
