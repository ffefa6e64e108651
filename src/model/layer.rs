use crate::foundation::buffer::{Dims, Offset};
use crate::foundation::error::{CisError, CisResult};
use crate::model::channel::Channel;

/// One named sub-rectangle of the canvas captured by a single render.
///
/// A layer holds exactly one primary channel plus optional depth and
/// shadow (luminance) channels. Layers are read-only after being added to
/// an [`crate::Image`].
#[derive(Clone, Debug)]
pub struct Layer {
    /// Layer name, unique within its image.
    pub name: String,
    /// Primary channel (color array or scalar value array).
    pub channel: Channel,
    /// Optional per-pixel camera depth.
    pub depth: Option<Channel>,
    /// Optional lighting luminance (ambient/diffuse/specular as RGB).
    pub shadow: Option<Channel>,
    /// Layer extent in pixels.
    pub dims: Dims,
    /// Layer position within the canvas.
    pub offset: Offset,
}

impl Layer {
    /// A layer covering `dims` at `offset` with the given primary channel.
    pub fn new(name: impl Into<String>, channel: Channel, dims: Dims, offset: Offset) -> Self {
        Self {
            name: name.into(),
            channel,
            depth: None,
            shadow: None,
            dims,
            offset,
        }
    }

    /// Look up one of this layer's channels by name.
    pub fn find_channel(&self, name: &str) -> Option<&Channel> {
        if self.channel.name == name {
            return Some(&self.channel);
        }
        if let Some(depth) = &self.depth
            && depth.name == name
        {
            return Some(depth);
        }
        if let Some(shadow) = &self.shadow
            && shadow.name == name
        {
            return Some(shadow);
        }
        None
    }

    /// Validate the layer's placement and channel shapes against the canvas.
    pub fn validate(&self, canvas: Dims) -> CisResult<()> {
        if self.name.trim().is_empty() {
            return Err(CisError::validation("layer name must be non-empty"));
        }
        let right = u64::from(self.offset.x) + u64::from(self.dims.width);
        let bottom = u64::from(self.offset.y) + u64::from(self.dims.height);
        if right > u64::from(canvas.width) || bottom > u64::from(canvas.height) {
            return Err(CisError::validation(format!(
                "layer '{}' at ({},{}) sized {}x{} exceeds the {}x{} canvas",
                self.name,
                self.offset.x,
                self.offset.y,
                self.dims.width,
                self.dims.height,
                canvas.width,
                canvas.height
            )));
        }

        self.channel.validate(self.dims)?;
        if let Some(depth) = &self.depth {
            depth.validate(self.dims)?;
            if let Some(data) = &depth.data
                && data.components() != 1
            {
                return Err(CisError::validation(format!(
                    "layer '{}' depth channel must have 1 component",
                    self.name
                )));
            }
        }
        if let Some(shadow) = &self.shadow {
            shadow.validate(self.dims)?;
        }
        Ok(())
    }
}
