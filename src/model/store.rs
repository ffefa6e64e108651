use std::collections::BTreeMap;

use crate::foundation::buffer::Dims;
use crate::foundation::error::{CisError, CisResult};
use crate::model::colormap::Colormap;
use crate::model::image::Image;
use crate::model::variable::Variable;

/// Format version written by this crate.
pub const CIS_VERSION: &str = "1.0";

/// Classname recorded in a store's top-level attributes.
pub const CIS_CLASSNAME: &str = "COMPOSABLE_IMAGE_SET";

/// Canvas corner that row 0, column 0 of every buffer maps to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Origin {
    /// Upper-left corner.
    #[default]
    #[serde(rename = "UL")]
    UpperLeft,
    /// Upper-right corner.
    #[serde(rename = "UR")]
    UpperRight,
    /// Lower-left corner.
    #[serde(rename = "LL")]
    LowerLeft,
    /// Lower-right corner.
    #[serde(rename = "LR")]
    LowerRight,
}

/// A Composable Image Set: the top-level, append-only container of
/// images, variables, and colormaps sharing one canvas.
///
/// A store owns everything it contains for its lifetime and is treated as
/// read-only once finalized (written or handed to views).
#[derive(Clone, Debug)]
pub struct Cis {
    /// Canvas dimensions shared by all images.
    pub dims: Dims,
    /// Format version string.
    pub version: String,
    /// Free-form format flags.
    pub flags: Vec<String>,
    /// Corner convention for buffer row order.
    pub origin: Origin,
    /// Images keyed by name.
    pub images: BTreeMap<String, Image>,
    /// Variables keyed by name.
    pub variables: BTreeMap<String, Variable>,
    /// Colormaps keyed by name.
    pub colormaps: BTreeMap<String, Colormap>,
}

impl Cis {
    /// An empty store over the given canvas.
    pub fn new(dims: Dims) -> Self {
        Self {
            dims,
            version: CIS_VERSION.to_string(),
            flags: Vec::new(),
            origin: Origin::default(),
            images: BTreeMap::new(),
            variables: BTreeMap::new(),
            colormaps: BTreeMap::new(),
        }
    }

    /// Append an image; image names are unique within a store.
    pub fn add_image(&mut self, image: Image) -> CisResult<()> {
        if self.images.contains_key(&image.name) {
            return Err(CisError::validation(format!(
                "store already has an image named '{}'",
                image.name
            )));
        }
        self.images.insert(image.name.clone(), image);
        Ok(())
    }

    /// Append a variable; variable names are unique within a store.
    pub fn add_variable(&mut self, variable: Variable) -> CisResult<()> {
        variable.validate()?;
        if self.variables.contains_key(&variable.name) {
            return Err(CisError::validation(format!(
                "store already has a variable named '{}'",
                variable.name
            )));
        }
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Append a colormap; colormap names are unique within a store.
    pub fn add_colormap(&mut self, colormap: Colormap) -> CisResult<()> {
        colormap.validate()?;
        if self.colormaps.contains_key(&colormap.name) {
            return Err(CisError::validation(format!(
                "store already has a colormap named '{}'",
                colormap.name
            )));
        }
        self.colormaps.insert(colormap.name.clone(), colormap);
        Ok(())
    }

    /// Look up an image by name.
    pub fn image(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Look up a colormap by name, falling back to the default grayscale
    /// ramp when the name is unknown.
    pub fn colormap_or_default(&self, name: &str) -> Colormap {
        match self.colormaps.get(name) {
            Some(cm) => cm.clone(),
            None => {
                tracing::debug!(colormap = name, "unknown colormap, using grayscale ramp");
                Colormap::grayscale()
            }
        }
    }

    /// Validate the whole store tree.
    pub fn validate(&self) -> CisResult<()> {
        for image in self.images.values() {
            image.validate(self.dims)?;
        }
        for variable in self.variables.values() {
            variable.validate()?;
        }
        for colormap in self.colormaps.values() {
            colormap.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/store.rs"]
mod tests;
