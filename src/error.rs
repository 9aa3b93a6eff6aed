use enough::StopReason;

/// Errors from BMP decoding, negation and writing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("not a BMP file: signature is not \"BM\"")]
    BadSignature,

    #[error("BMP bit depth {0} unsupported, only 24 bits per pixel")]
    UnsupportedBitDepth(u16),

    #[error("BMP compression scheme {0} unsupported, only uncompressed (0)")]
    UnsupportedCompression(u32),

    #[error("invalid BMP geometry: {0}")]
    InvalidGeometry(String),

    #[error("truncated pixel data: need {needed} bytes, got {actual}")]
    TruncatedPixelData { needed: usize, actual: usize },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    PixelBufferMismatch { expected: usize, actual: usize },

    #[error("destination is the source file")]
    SameFile,

    #[error("operation cancelled")]
    Cancelled(StopReason),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}

impl BmpError {
    /// Whether this error describes malformed or unsupported input, as
    /// opposed to an I/O failure, a caller mistake, or cancellation.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::BadSignature
                | Self::UnsupportedBitDepth(_)
                | Self::UnsupportedCompression(_)
                | Self::InvalidGeometry(_)
                | Self::TruncatedPixelData { .. }
                | Self::InvalidHeader(_)
                | Self::UnexpectedEof
                | Self::DimensionsTooLarge { .. }
        )
    }
}
