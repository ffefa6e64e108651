//! Lighting decomposition helpers.
//!
//! A luminance buffer is a 3-channel image produced by a lighting-only
//! render pass: channel 0 is the ambient contribution, channel 1 diffuse,
//! channel 2 specular.

use crate::foundation::buffer::PixelBuffer;
use crate::foundation::error::{CisError, CisResult};

const AMBIENT: usize = 0;
const DIFFUSE: usize = 1;
const SPECULAR: usize = 2;

/// The ambient contribution broadcast across all three output channels.
pub fn ambient(luminance: &PixelBuffer) -> CisResult<PixelBuffer> {
    broadcast(luminance, AMBIENT)
}

/// The diffuse contribution broadcast across all three output channels.
pub fn diffuse(luminance: &PixelBuffer) -> CisResult<PixelBuffer> {
    broadcast(luminance, DIFFUSE)
}

/// The specular contribution broadcast across all three output channels.
pub fn specular(luminance: &PixelBuffer) -> CisResult<PixelBuffer> {
    broadcast(luminance, SPECULAR)
}

fn broadcast(luminance: &PixelBuffer, channel: usize) -> CisResult<PixelBuffer> {
    if luminance.components() != 3 {
        return Err(CisError::composite(
            "luminance buffer must have 3 components",
        ));
    }
    let mut out = PixelBuffer::zeroed(luminance.dims(), 3);
    for i in 0..luminance.pixel_count() {
        let v = luminance.comp(i, channel);
        out.pixel_mut(i).copy_from_slice(&[v, v, v]);
    }
    Ok(out)
}

/// Modulate a color buffer in place by its diffuse luminance:
/// `color = color * diffuse / 255`, element-wise.
pub fn modulate_diffuse(color: &mut PixelBuffer, luminance: &PixelBuffer) -> CisResult<()> {
    if luminance.components() != 3 {
        return Err(CisError::composite(
            "luminance buffer must have 3 components",
        ));
    }
    if color.dims() != luminance.dims() || color.components() != 3 {
        return Err(CisError::composite(
            "color and luminance must be 3-component buffers of equal dims",
        ));
    }
    for i in 0..color.pixel_count() {
        let d = luminance.comp(i, DIFFUSE) / 255.0;
        for c in 0..3 {
            let v = color.comp(i, c) * d;
            color.set_comp(i, c, v);
        }
    }
    Ok(())
}

/// The modulation factor for one pixel: its diffuse luminance over 255.
pub(crate) fn diffuse_factor(luminance: &PixelBuffer, pixel: usize) -> f32 {
    luminance.comp(pixel, DIFFUSE) / 255.0
}
