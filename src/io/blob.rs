//! Compressed array blobs: gzip-wrapped little-endian `f32` data.
//!
//! The blob carries bare component data; shape (dims and component count)
//! lives in the owning channel's `attributes.json`. Round trips are
//! bit-exact.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::foundation::buffer::{Dims, PixelBuffer};
use crate::foundation::error::{CisError, CisResult};

/// Write a buffer's component data as a gzip blob.
pub fn write_blob(path: &Path, buf: &PixelBuffer) -> CisResult<()> {
    let file = File::create(path)
        .map_err(|e| CisError::io(format!("cannot create {}: {e}", path.display())))?;
    let mut encoder = GzEncoder::new(file, Compression::default());

    let mut bytes = Vec::with_capacity(buf.data().len() * 4);
    for v in buf.data() {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    encoder
        .write_all(&bytes)
        .and_then(|_| encoder.finish().map(|_| ()))
        .map_err(|e| CisError::io(format!("cannot write {}: {e}", path.display())))
}

/// Read a gzip blob back into a buffer of the given shape.
pub fn read_blob(path: &Path, dims: Dims, components: usize) -> CisResult<PixelBuffer> {
    let file = File::open(path)
        .map_err(|e| CisError::io(format!("cannot open {}: {e}", path.display())))?;
    let mut decoder = GzDecoder::new(file);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| CisError::io(format!("cannot read {}: {e}", path.display())))?;

    let expected = dims.pixel_count() * components * 4;
    if bytes.len() != expected {
        return Err(CisError::io(format!(
            "{} holds {} bytes, expected {} for {}x{}x{}",
            path.display(),
            bytes.len(),
            expected,
            dims.width,
            dims.height,
            components
        )));
    }

    let data = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    PixelBuffer::new(dims, components, data)
}
