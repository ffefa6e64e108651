use std::collections::BTreeMap;

use crate::composite::layer_spec::LayerSpec;
use crate::foundation::buffer::{Dims, Offset, PixelBuffer, Rgb};
use crate::foundation::error::{CisError, CisResult};
use crate::model::channel::{Channel, ChannelKind};
use crate::model::layer::Layer;
use crate::model::store::Cis;

/// A query over one image of a store: which layers are active and which
/// channel is shown per layer.
///
/// A view holds a non-owning reference to its store and owns only the
/// working copies materialized by [`ImageView::update`]; each call
/// replaces the previous working set. Layer buffers are embedded into
/// canvas-sized buffers at their layer offsets so the compositor sees
/// uniform shapes.
#[derive(Debug)]
pub struct ImageView<'a> {
    cis: &'a Cis,
    image: String,
    active_layers: Vec<String>,
    active_channels: BTreeMap<String, String>,
    /// Materialize depth buffers (required for depth-merge compositing).
    pub use_depth: bool,
    /// Materialize shadow channels as luminance buffers.
    pub use_shadow: bool,
    /// Background color handed to the compositor configuration.
    pub background: Rgb,
    specs: Vec<LayerSpec>,
}

impl<'a> ImageView<'a> {
    /// A view over `image`, which must exist in the store.
    pub fn new(cis: &'a Cis, image: impl Into<String>) -> CisResult<Self> {
        let image = image.into();
        if cis.image(&image).is_none() {
            return Err(CisError::validation(format!(
                "store has no image named '{image}'"
            )));
        }
        Ok(Self {
            cis,
            image,
            active_layers: Vec::new(),
            active_channels: BTreeMap::new(),
            use_depth: true,
            use_shadow: false,
            background: [0.0, 0.0, 0.0],
            specs: Vec::new(),
        })
    }

    /// Name of the viewed image.
    pub fn image_name(&self) -> &str {
        &self.image
    }

    /// Replace the ordered active-layer list. Order is compositing order.
    pub fn set_active_layers<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_layers = names.into_iter().map(Into::into).collect();
    }

    /// Choose the channel shown for one layer. Layers without an explicit
    /// choice show their primary channel.
    pub fn set_active_channel(&mut self, layer: impl Into<String>, channel: impl Into<String>) {
        self.active_channels.insert(layer.into(), channel.into());
    }

    /// Pull current buffers for the active selection out of the store.
    ///
    /// Validates the selection (active layers must exist in the image,
    /// chosen channels must exist on their layer) and replaces the
    /// working set. A missing depth channel is fatal when `use_depth` is
    /// set.
    #[tracing::instrument(skip(self), fields(image = %self.image))]
    pub fn update(&mut self) -> CisResult<()> {
        let image = self
            .cis
            .image(&self.image)
            .ok_or_else(|| CisError::validation(format!("store has no image named '{}'", self.image)))?;

        let mut specs = Vec::with_capacity(self.active_layers.len());
        for name in &self.active_layers {
            let layer = image.layer(name).ok_or_else(|| {
                CisError::validation(format!(
                    "image '{}' has no layer named '{name}'",
                    self.image
                ))
            })?;
            specs.push(self.materialize(layer)?);
        }
        self.specs = specs;
        Ok(())
    }

    /// The working set from the last [`ImageView::update`], in active
    /// order.
    pub fn layer_specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    /// Move the working set out of the view, leaving it empty.
    pub fn take_layer_specs(&mut self) -> Vec<LayerSpec> {
        std::mem::take(&mut self.specs)
    }

    fn materialize(&self, layer: &Layer) -> CisResult<LayerSpec> {
        let canvas = self.cis.dims;
        let mut spec = LayerSpec::new(layer.name.clone());

        let chosen = self
            .active_channels
            .get(&layer.name)
            .map(String::as_str)
            .unwrap_or(layer.channel.name.as_str());
        let channel = layer.find_channel(chosen).ok_or_else(|| {
            CisError::validation(format!(
                "layer '{}' has no channel named '{chosen}'",
                layer.name
            ))
        })?;

        if let Some(data) = channel_data(channel) {
            let embedded = embed(data, layer.offset, canvas, 0.0)?;
            match channel.kind {
                ChannelKind::Rgb => spec.color = Some(embedded),
                ChannelKind::Float | ChannelKind::Int => spec.value = Some(embedded),
            }
        }

        if self.use_depth {
            let depth = layer
                .depth
                .as_ref()
                .and_then(channel_data)
                .ok_or_else(|| {
                    CisError::decode(format!("layer '{}' has no depth buffer", layer.name))
                })?;
            // Pad with the layer's own background depth so padding never
            // wins a depth test.
            let pad = depth
                .max_component()
                .ok_or_else(|| CisError::decode("depth buffer is empty"))?;
            spec.depth = Some(embed(depth, layer.offset, canvas, pad)?);
        }

        if self.use_shadow
            && let Some(shadow) = layer.shadow.as_ref().and_then(channel_data)
        {
            spec.luminance = Some(embed(shadow, layer.offset, canvas, 0.0)?);
        }

        Ok(spec)
    }
}

fn channel_data(channel: &Channel) -> Option<&PixelBuffer> {
    channel.data.as_ref()
}

/// Copy a layer-sized buffer into a canvas-sized one at `offset`, filling
/// the uncovered area with `pad`.
fn embed(buf: &PixelBuffer, offset: Offset, canvas: Dims, pad: f32) -> CisResult<PixelBuffer> {
    if buf.dims() == canvas && offset == Offset::default() {
        return Ok(buf.clone());
    }
    let right = u64::from(offset.x) + u64::from(buf.dims().width);
    let bottom = u64::from(offset.y) + u64::from(buf.dims().height);
    if right > u64::from(canvas.width) || bottom > u64::from(canvas.height) {
        return Err(CisError::validation(format!(
            "layer buffer at ({},{}) sized {}x{} exceeds the {}x{} canvas",
            offset.x,
            offset.y,
            buf.dims().width,
            buf.dims().height,
            canvas.width,
            canvas.height
        )));
    }

    let c = buf.components();
    let lw = buf.dims().width as usize;
    let cw = canvas.width as usize;
    let mut out = PixelBuffer::filled(canvas, c, pad);
    for row in 0..buf.dims().height as usize {
        let src_start = row * lw * c;
        let dst_start = ((offset.y as usize + row) * cw + offset.x as usize) * c;
        out.data_mut()[dst_start..dst_start + lw * c]
            .copy_from_slice(&buf.data()[src_start..src_start + lw * c]);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/view/image_view.rs"]
mod tests;
