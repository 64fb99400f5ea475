//! Document text <-> shareable token.
//!
//! `token = base64(raw_deflate(utf8(text)))`, standard alphabet with padding.
//! The raw (headerless) deflate stream keeps tokens short and matches what
//! browsers produce with `CompressionStream("deflate-raw")`.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use thiserror::Error;

const INFLATE_CHUNK: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("corrupt compressed stream: {0}")]
    Corrupt(#[from] flate2::DecompressError),
    #[error("compressed stream ended early")]
    Truncated,
    #[error("{0} bytes of trailing data after compressed stream")]
    TrailingData(usize),
    #[error("failed to compress document: {0}")]
    Compress(#[from] std::io::Error),
}

pub fn encode(text: &str) -> Result<String, CodecError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Reverses [`encode`]. Invalid UTF-8 inside a well-formed stream is
/// replaced rather than rejected.
pub fn decode(token: &str) -> Result<String, CodecError> {
    let compressed = STANDARD.decode(token.trim())?;
    let bytes = inflate(&compressed)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn inflate(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity(input.len().saturating_mul(3));

    loop {
        out.reserve(INFLATE_CHUNK);
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();

        let status = inflater.decompress_vec(&input[consumed..], &mut out, FlushDecompress::None)?;
        match status {
            Status::StreamEnd => {
                let trailing = input.len() - inflater.total_in() as usize;
                if trailing > 0 {
                    return Err(CodecError::TrailingData(trailing));
                }
                return Ok(out);
            }
            Status::Ok | Status::BufError => {
                // Out of input before the final block and nothing left to flush.
                if inflater.total_in() as usize == consumed && inflater.total_out() == produced {
                    return Err(CodecError::Truncated);
                }
            }
        }
    }
}
