use std::collections::BTreeMap;

use crate::foundation::buffer::Dims;
use crate::foundation::error::{CisError, CisResult};
use crate::model::layer::Layer;

/// A named set of layers captured together at one pipeline state
/// (one timestep, viewpoint, or parameter tuple).
#[derive(Clone, Debug, Default)]
pub struct Image {
    /// Image name, unique within its store.
    pub name: String,
    /// Layers keyed by layer name.
    pub layers: BTreeMap<String, Layer>,
}

impl Image {
    /// An empty image.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: BTreeMap::new(),
        }
    }

    /// Add a layer; layer names are unique within an image.
    pub fn add_layer(&mut self, layer: Layer) -> CisResult<()> {
        if self.layers.contains_key(&layer.name) {
            return Err(CisError::validation(format!(
                "image '{}' already has a layer named '{}'",
                self.name, layer.name
            )));
        }
        self.layers.insert(layer.name.clone(), layer);
        Ok(())
    }

    /// Look up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Validate all contained layers against the canvas.
    pub fn validate(&self, canvas: Dims) -> CisResult<()> {
        if self.name.trim().is_empty() {
            return Err(CisError::validation("image name must be non-empty"));
        }
        for layer in self.layers.values() {
            layer.validate(canvas)?;
        }
        Ok(())
    }
}
