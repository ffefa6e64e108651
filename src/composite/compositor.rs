use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::composite::decode::{decode_float, decode_packed_rgb, foreground_indices};
use crate::composite::layer_spec::LayerSpec;
use crate::composite::lighting::{diffuse_factor, modulate_diffuse};
use crate::foundation::buffer::{PixelBuffer, Rgb};
use crate::foundation::error::{CisError, CisResult};
use crate::model::colormap::Lut;

/// How one layer's pixels are colored during compositing, keyed by the
/// layer's customization name in [`CompositeConfig::color_definitions`].
#[derive(Clone, Debug)]
pub enum ColorSpec {
    /// No recoloring: color arrays pass through unchanged; raw scalar
    /// value arrays yield nothing (they are not colors).
    None,
    /// Flat fill applied to the layer's foreground pixels when geometry
    /// coloring is enabled.
    Fill(Rgb),
    /// Decode the layer's value array through a LUT, normalizing raw
    /// samples into `range`.
    Lut {
        /// Prebuilt lookup table.
        lut: Lut,
        /// Raw value range used for normalization.
        range: (f32, f32),
    },
}

/// Explicit engine configuration passed to a compositor at construction.
/// There is no process-wide mutable state.
#[derive(Clone, Debug)]
pub struct CompositeConfig {
    /// Per-layer color customizations keyed by customization name.
    pub color_definitions: BTreeMap<String, ColorSpec>,
    /// Modulate colors by each layer's diffuse luminance.
    pub lighting_enabled: bool,
    /// Honor [`ColorSpec::Fill`] overrides on color-array layers.
    pub geometry_color_enabled: bool,
    /// Color given to pixels still at background depth after all merges.
    pub background: Rgb,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            color_definitions: BTreeMap::new(),
            lighting_enabled: true,
            geometry_color_enabled: false,
            background: [0.0, 0.0, 0.0],
        }
    }
}

/// Turns an ordered list of layers into one final RGB image.
pub trait Compositor {
    /// Composite `layers` in list order into a 3-component color buffer.
    fn render(&self, layers: &[LayerSpec]) -> CisResult<PixelBuffer>;
}

/// Single-layer pass-through: returns the first layer's color array
/// unmodified. Intended for stores whose images hold one full-canvas
/// layer each.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughCompositor;

impl Compositor for PassthroughCompositor {
    fn render(&self, layers: &[LayerSpec]) -> CisResult<PixelBuffer> {
        layers
            .first()
            .and_then(|l| l.color.clone())
            .ok_or_else(|| CisError::composite("no valid layers to render"))
    }
}

/// Sort-last depth-merge compositor.
///
/// The first layer that yields a usable color buffer seeds the canvas;
/// every later layer is merged in by a strict `<` depth test, so equal
/// depths keep the earlier layer's pixel. Pixels still at background
/// depth after all merges take the configured background color.
#[derive(Clone, Debug, Default)]
pub struct DepthCompositor {
    /// Engine configuration.
    pub config: CompositeConfig,
}

impl DepthCompositor {
    /// A compositor over the given configuration.
    pub fn new(config: CompositeConfig) -> Self {
        Self { config }
    }

    /// Apply this layer's registered [`ColorSpec`] and return its color
    /// contribution, or `None` when the layer has nothing usable.
    fn customized_color(&self, layer: &LayerSpec) -> CisResult<Option<PixelBuffer>> {
        let def = self.config.color_definitions.get(&layer.name);

        if let Some(value) = &layer.value {
            return match def {
                Some(ColorSpec::Lut { lut, range }) => {
                    let depth = require_depth(layer)?;
                    if value.components() == 3 {
                        decode_packed_rgb(value, depth, lut)
                    } else {
                        decode_float(value, depth, lut, *range)
                    }
                }
                Some(ColorSpec::Fill(rgb)) if self.config.geometry_color_enabled => {
                    let depth = require_depth(layer)?;
                    let mut out = PixelBuffer::zeroed(value.dims(), 3);
                    for i in foreground_indices(depth)? {
                        out.pixel_mut(i).copy_from_slice(rgb);
                    }
                    Ok(Some(out))
                }
                // Sentinel "no recoloring": pass a value-encoded RGB image
                // through untouched; a raw scalar array is not a color.
                _ => {
                    if value.components() == 3 {
                        Ok(Some(value.clone()))
                    } else {
                        Ok(None)
                    }
                }
            };
        }

        if let Some(color) = &layer.color {
            if color.components() != 3 {
                return Err(CisError::composite(format!(
                    "layer '{}' color buffer has {} components, expected 3",
                    layer.name,
                    color.components()
                )));
            }
            if self.config.geometry_color_enabled
                && let Some(ColorSpec::Fill(rgb)) = def
            {
                let depth = require_depth(layer)?;
                let mut out = color.clone();
                for i in foreground_indices(depth)? {
                    out.pixel_mut(i).copy_from_slice(rgb);
                }
                return Ok(Some(out));
            }
            return Ok(Some(color.clone()));
        }

        Ok(None)
    }
}

impl Compositor for DepthCompositor {
    #[tracing::instrument(skip_all, fields(layers = layers.len()))]
    fn render(&self, layers: &[LayerSpec]) -> CisResult<PixelBuffer> {
        // Seed with the first layer producing a usable color buffer.
        let mut base = None;
        let mut rest = 0;
        for (idx, layer) in layers.iter().enumerate() {
            if !layer.has_renderable() {
                tracing::debug!(layer = %layer.name, "layer has no color or value buffer, skipping");
                continue;
            }
            if let Some(c0) = self.customized_color(layer)? {
                base = Some((layer, c0));
                rest = idx + 1;
                break;
            }
            tracing::debug!(layer = %layer.name, "layer has no usable color, skipping");
        }
        let (base_layer, mut c0) =
            base.ok_or_else(|| CisError::composite("no valid layers to render"))?;

        if self.config.lighting_enabled
            && let Some(lum) = &base_layer.luminance
        {
            modulate_diffuse(&mut c0, lum)?;
        }

        let mut d0 = require_depth(base_layer)?.clone();
        if d0.dims() != c0.dims() || d0.components() != 1 {
            return Err(CisError::composite(
                "base layer depth must be a 1-component buffer of its color dims",
            ));
        }
        let mut bg_depth = d0
            .max_component()
            .ok_or_else(|| CisError::composite("base layer depth buffer is empty"))?;

        for layer in &layers[rest..] {
            let Some(cnext) = self.customized_color(layer)? else {
                tracing::debug!(layer = %layer.name, "layer has no usable color, skipping");
                continue;
            };
            if !cnext.same_shape(&c0) {
                return Err(CisError::composite(format!(
                    "layer '{}' color dims do not match the base layer",
                    layer.name
                )));
            }
            let dnext = require_depth(layer)?;
            if !dnext.same_shape(&d0) {
                return Err(CisError::composite(format!(
                    "layer '{}' depth dims do not match the base layer",
                    layer.name
                )));
            }
            let lum = if self.config.lighting_enabled {
                layer.luminance.as_ref()
            } else {
                None
            };
            if let Some(lum) = lum
                && (lum.dims() != cnext.dims() || lum.components() != 3)
            {
                return Err(CisError::composite(format!(
                    "layer '{}' luminance must be a 3-component buffer of the layer dims",
                    layer.name
                )));
            }

            if let Some(d) = dnext.max_component() {
                bg_depth = bg_depth.max(d);
            }

            // Strict less-than: ties keep the earlier layer's pixel.
            for i in 0..d0.pixel_count() {
                if dnext.comp(i, 0) < d0.comp(i, 0) {
                    let factor = lum.map(|l| diffuse_factor(l, i)).unwrap_or(1.0);
                    for c in 0..3 {
                        c0.set_comp(i, c, cnext.comp(i, c) * factor);
                    }
                    d0.set_comp(i, 0, dnext.comp(i, 0));
                }
            }
        }

        // Everything still at background depth takes the background
        // color. A constant depth buffer carries no geometry/background
        // distinction, so it is left alone.
        let merged_max = d0.max_component().unwrap_or(f32::NEG_INFINITY);
        let merged_min = d0.min_component().unwrap_or(f32::INFINITY);
        if merged_max > merged_min {
            for i in 0..d0.pixel_count() {
                if d0.comp(i, 0) == bg_depth {
                    c0.pixel_mut(i).copy_from_slice(&self.config.background);
                }
            }
        }

        Ok(c0)
    }
}

fn require_depth(layer: &LayerSpec) -> CisResult<&PixelBuffer> {
    layer
        .depth
        .as_ref()
        .ok_or_else(|| CisError::decode(format!("layer '{}' has no depth buffer", layer.name)))
}

/// Composite several independent layer lists in parallel.
///
/// Lists are independent by construction (a finalized store is
/// read-only), so this fans out across the rayon thread pool with no
/// locking.
pub fn render_batch<C>(compositor: &C, jobs: &[Vec<LayerSpec>]) -> CisResult<Vec<PixelBuffer>>
where
    C: Compositor + Sync,
{
    jobs.par_iter()
        .map(|layers| compositor.render(layers))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
