//! Attribute records serialized as the `attributes.json` files of a
//! store directory.

use crate::model::channel::ChannelKind;
use crate::model::store::Origin;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct StoreAttrs {
    pub classname: String,
    pub dims: [u32; 2],
    pub version: String,
    #[serde(default)]
    pub flags: Vec<String>,
    pub origin: Origin,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct LayerAttrs {
    pub offset: [u32; 2],
    pub dims: [u32; 2],
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub(crate) struct ChannelAttrs {
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// Component count of the stored blob; absent when no data was
    /// written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colormap: Option<String>,
}
