//! Value-to-color decoding for composited layers.
//!
//! Two encodings are supported, chosen by the shape of the value buffer:
//! raw scalar floats (1 component) and the invertible-RGB encoding
//! (3 components), where a normalized value was packed losslessly into a
//! 24-bit integer split across the color channels so numeric data can
//! ride through a standard RGB render target.

use crate::foundation::buffer::{PixelBuffer, Rgb};
use crate::foundation::error::{CisError, CisResult};
use crate::model::colormap::Lut;

/// Largest packed value of the invertible-RGB encoding. Packed value 0 is
/// reserved as "undefined", hence the `-1` offset when decoding.
pub const MAX_PACKED: u32 = 0xFF_FFFE;

/// Value ranges narrower than this are treated as degenerate and map to
/// the bottom LUT bin instead of dividing by zero.
pub const RANGE_EPSILON: f32 = 1e-4;

/// Background depth of a buffer: its maximum depth value.
pub fn background_depth(depth: &PixelBuffer) -> CisResult<f32> {
    if depth.components() != 1 {
        return Err(CisError::decode("depth buffer must have 1 component"));
    }
    depth
        .max_component()
        .ok_or_else(|| CisError::decode("depth buffer is empty"))
}

/// Linear pixel indices of foreground pixels: those strictly closer than
/// the background depth. Empty when the whole buffer is background.
pub fn foreground_indices(depth: &PixelBuffer) -> CisResult<Vec<usize>> {
    let bg = background_depth(depth)?;
    Ok((0..depth.pixel_count())
        .filter(|&i| depth.comp(i, 0) < bg)
        .collect())
}

/// Clamp a raw sample into `range` and normalize it to `[0, 1]`.
///
/// A degenerate range (span `<=` [`RANGE_EPSILON`]) maps every sample to
/// `0.0`, the bottom of the LUT.
pub fn normalize_value(v: f32, range: (f32, f32)) -> f32 {
    let (lo, hi) = range;
    let span = hi - lo;
    if span <= RANGE_EPSILON {
        return 0.0;
    }
    (v.clamp(lo, hi) - lo) / span
}

/// Decode a raw scalar value buffer into a color buffer through `lut`.
///
/// Only foreground pixels (per the depth buffer) are decoded; background
/// pixels keep a neutral zero placeholder and are overwritten by the
/// compositor's background fill. If every foreground sample already lies
/// in `[0, 1]` the buffer is treated as pre-normalized and `range` is
/// ignored. Returns `None` when the layer has no foreground ("no visible
/// geometry").
pub fn decode_float(
    value: &PixelBuffer,
    depth: &PixelBuffer,
    lut: &Lut,
    range: (f32, f32),
) -> CisResult<Option<PixelBuffer>> {
    if value.components() != 1 {
        return Err(CisError::decode(
            "raw scalar decode expects a 1-component value buffer",
        ));
    }
    if value.dims() != depth.dims() {
        return Err(CisError::decode("value and depth dims differ"));
    }

    let foreground = foreground_indices(depth)?;
    if foreground.is_empty() {
        return Ok(None);
    }

    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &i in &foreground {
        let v = value.comp(i, 0);
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let pre_normalized = lo >= 0.0 && hi <= 1.0;

    let mut out = PixelBuffer::zeroed(value.dims(), 3);
    for &i in &foreground {
        let v = value.comp(i, 0);
        let norm = if pre_normalized {
            v
        } else {
            normalize_value(v, range)
        };
        out.pixel_mut(i).copy_from_slice(&lut.lookup(norm));
    }
    Ok(Some(out))
}

/// Decode an invertible-RGB value buffer into a color buffer through
/// `lut`.
///
/// Each foreground pixel's `(R, G, B)` is reassembled into
/// `packed = (R << 16) | (G << 8) | B` and mapped back to
/// `v = (packed - 1) / MAX_PACKED`; packed value 0 means "undefined" and
/// keeps the placeholder. Returns `None` when the layer has no
/// foreground.
pub fn decode_packed_rgb(
    value: &PixelBuffer,
    depth: &PixelBuffer,
    lut: &Lut,
) -> CisResult<Option<PixelBuffer>> {
    if value.components() != 3 {
        return Err(CisError::decode(
            "invertible-RGB decode expects a 3-component value buffer",
        ));
    }
    if value.dims() != depth.dims() {
        return Err(CisError::decode("value and depth dims differ"));
    }

    let foreground = foreground_indices(depth)?;
    if foreground.is_empty() {
        return Ok(None);
    }

    let mut out = PixelBuffer::zeroed(value.dims(), 3);
    for &i in &foreground {
        let px = value.pixel(i);
        let r = channel_u8(px[0]);
        let g = channel_u8(px[1]);
        let b = channel_u8(px[2]);
        let packed = (r << 16) | (g << 8) | b;
        if packed == 0 {
            continue;
        }
        // 24-bit products do not fit an f32 mantissa; unpack in f64.
        let v = ((packed - 1) as f64 / MAX_PACKED as f64) as f32;
        out.pixel_mut(i).copy_from_slice(&lut.lookup(v));
    }
    Ok(Some(out))
}

/// Encode a normalized value `v` in `[0, 1]` as an invertible-RGB pixel,
/// the inverse of [`decode_packed_rgb`]'s per-pixel step. Producers use
/// this to smuggle scalars through an RGB render target.
pub fn encode_value_rgb(v: f32) -> Rgb {
    let packed = (f64::from(v.clamp(0.0, 1.0)) * f64::from(MAX_PACKED)).round() as u32 + 1;
    [
        ((packed >> 16) & 0xFF) as f32,
        ((packed >> 8) & 0xFF) as f32,
        (packed & 0xFF) as f32,
    ]
}

fn channel_u8(v: f32) -> u32 {
    (v.round().clamp(0.0, 255.0)) as u32
}
