use crate::foundation::buffer::PixelBuffer;

/// One flat, canvas-sized layer ready for compositing.
///
/// A spec carries at most one of each buffer kind as an explicit
/// `Option`, so "layer has neither color nor value" is a checked state
/// rather than an attribute-presence probe. All buffers in one spec share
/// the same dims; color and luminance are 3-component, depth is
/// 1-component, value is 1-component raw scalars or a 3-component
/// invertible-RGB encoding.
#[derive(Clone, Debug)]
pub struct LayerSpec {
    /// Customization name used to look up a
    /// [`ColorSpec`](crate::ColorSpec) in the compositor configuration.
    pub name: String,
    /// Plain color array, `0..=255`.
    pub color: Option<PixelBuffer>,
    /// Scalar value array (raw floats or invertible-RGB encoded).
    pub value: Option<PixelBuffer>,
    /// Camera depth array.
    pub depth: Option<PixelBuffer>,
    /// Lighting luminance array (ambient/diffuse/specular channels).
    pub luminance: Option<PixelBuffer>,
}

impl LayerSpec {
    /// A spec with no buffers attached.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            value: None,
            depth: None,
            luminance: None,
        }
    }

    /// `true` when a color array is present.
    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    /// `true` when a value array is present.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// `true` when this spec can seed or contribute to a composite.
    pub fn has_renderable(&self) -> bool {
        self.has_color() || self.has_value()
    }
}
