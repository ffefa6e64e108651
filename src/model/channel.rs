use crate::foundation::buffer::{Dims, PixelBuffer};
use crate::foundation::error::{CisError, CisResult};

/// Declared source type of a channel's samples.
///
/// Storage is always `f32`; the kind records how the data was produced and
/// how the engine should interpret it: [`ChannelKind::Rgb`] channels are
/// color arrays, [`ChannelKind::Float`] and [`ChannelKind::Int`] channels
/// are scalar value arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Scalar floating-point samples.
    Float,
    /// Scalar integer samples.
    Int,
    /// Three-component color samples.
    Rgb,
}

impl ChannelKind {
    /// Components per pixel implied by this kind.
    pub fn components(self) -> usize {
        match self {
            ChannelKind::Float | ChannelKind::Int => 1,
            ChannelKind::Rgb => 3,
        }
    }
}

/// A named, typed pixel buffer plus optional variable/colormap references.
///
/// A channel is immutable once attached to a layer; `data` is `None` for
/// channels whose blob has not been materialized from the store.
#[derive(Clone, Debug)]
pub struct Channel {
    /// Channel name, unique among a layer's channels.
    pub name: String,
    /// Declared sample type.
    pub kind: ChannelKind,
    /// Pixel data, when loaded.
    pub data: Option<PixelBuffer>,
    /// Name of the variable this channel samples, if any.
    pub variable: Option<String>,
    /// Name of the colormap used to color this channel, if any.
    pub colormap: Option<String>,
}

impl Channel {
    /// A channel with no data attached.
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: None,
            variable: None,
            colormap: None,
        }
    }

    /// A channel wrapping loaded data.
    pub fn with_data(name: impl Into<String>, kind: ChannelKind, data: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            kind,
            data: Some(data),
            variable: None,
            colormap: None,
        }
    }

    /// Validate the channel against the dims of its owning layer.
    pub fn validate(&self, layer_dims: Dims) -> CisResult<()> {
        if self.name.trim().is_empty() {
            return Err(CisError::validation("channel name must be non-empty"));
        }
        if let Some(data) = &self.data {
            if data.dims() != layer_dims {
                return Err(CisError::validation(format!(
                    "channel '{}' data is {}x{} but its layer is {}x{}",
                    self.name,
                    data.dims().width,
                    data.dims().height,
                    layer_dims.width,
                    layer_dims.height
                )));
            }
            if data.components() != self.kind.components() && data.components() != 3 {
                return Err(CisError::validation(format!(
                    "channel '{}' has {} components, expected {} for its kind",
                    self.name,
                    data.components(),
                    self.kind.components()
                )));
            }
        }
        Ok(())
    }
}
