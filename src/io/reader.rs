use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::foundation::buffer::{Dims, Offset};
use crate::foundation::error::{CisError, CisResult};
use crate::io::attrs::{ChannelAttrs, LayerAttrs, StoreAttrs};
use crate::io::blob::read_blob;
use crate::model::channel::Channel;
use crate::model::colormap::Colormap;
use crate::model::image::Image;
use crate::model::layer::Layer;
use crate::model::store::{CIS_CLASSNAME, Cis};
use crate::model::variable::Variable;

/// Deserialize a whole store from the directory layout produced by
/// [`write_store`](crate::write_store), reconstructing identical objects.
#[tracing::instrument(fields(root = %root.display()))]
pub fn read_store(root: &Path) -> CisResult<Cis> {
    let attrs: StoreAttrs = read_json(&root.join("attributes.json"))?;
    if attrs.classname != CIS_CLASSNAME {
        return Err(CisError::serde(format!(
            "{} is not a composable image set (classname '{}')",
            root.display(),
            attrs.classname
        )));
    }

    let mut cis = Cis::new(Dims::new(attrs.dims[0], attrs.dims[1])?);
    cis.version = attrs.version;
    cis.flags = attrs.flags;
    cis.origin = attrs.origin;

    let image_root = root.join("image");
    if image_root.is_dir() {
        for name in dir_names(&image_root)? {
            let image = read_image(&image_root.join(&name), name)?;
            cis.add_image(image)?;
        }
    }

    let colormap_root = root.join("colormaps");
    if colormap_root.is_dir() {
        for path in json_files(&colormap_root)? {
            let colormap: Colormap = read_json(&path)?;
            cis.add_colormap(colormap)?;
        }
    }

    let variable_root = root.join("variables");
    if variable_root.is_dir() {
        for path in json_files(&variable_root)? {
            let variable: Variable = read_json(&path)?;
            cis.add_variable(variable)?;
        }
    }

    cis.validate()?;
    Ok(cis)
}

fn read_image(image_dir: &Path, name: String) -> CisResult<Image> {
    let mut image = Image::new(name);
    let layer_root = image_dir.join("layer");
    if layer_root.is_dir() {
        for layer_name in dir_names(&layer_root)? {
            let layer = read_layer(&layer_root.join(&layer_name), layer_name)?;
            image.add_layer(layer)?;
        }
    }
    Ok(image)
}

fn read_layer(layer_dir: &Path, name: String) -> CisResult<Layer> {
    let attrs: LayerAttrs = read_json(&layer_dir.join("attributes.json"))?;
    let dims = Dims::new(attrs.dims[0], attrs.dims[1])?;
    let offset = Offset {
        x: attrs.offset[0],
        y: attrs.offset[1],
    };

    let mut channels: BTreeMap<String, Channel> = BTreeMap::new();
    let channel_root = layer_dir.join("channel");
    if channel_root.is_dir() {
        for channel_name in dir_names(&channel_root)? {
            let channel = read_channel(&channel_root.join(&channel_name), channel_name, dims)?;
            channels.insert(channel.name.clone(), channel);
        }
    }

    let channel = channels.remove(&attrs.primary).ok_or_else(|| {
        CisError::serde(format!(
            "layer '{name}' names primary channel '{}' but it was not found",
            attrs.primary
        ))
    })?;
    let depth = take_named(&mut channels, attrs.depth.as_deref(), &name, "depth")?;
    let shadow = take_named(&mut channels, attrs.shadow.as_deref(), &name, "shadow")?;

    Ok(Layer {
        name,
        channel,
        depth,
        shadow,
        dims,
        offset,
    })
}

fn take_named(
    channels: &mut BTreeMap<String, Channel>,
    wanted: Option<&str>,
    layer: &str,
    role: &str,
) -> CisResult<Option<Channel>> {
    let Some(wanted) = wanted else {
        return Ok(None);
    };
    channels.remove(wanted).map(Some).ok_or_else(|| {
        CisError::serde(format!(
            "layer '{layer}' names {role} channel '{wanted}' but it was not found"
        ))
    })
}

fn read_channel(channel_dir: &Path, name: String, dims: Dims) -> CisResult<Channel> {
    let attrs: ChannelAttrs = read_json(&channel_dir.join("attributes.json"))?;
    let blob = channel_dir.join("data.gz");
    let data = if blob.is_file() {
        let components = attrs.components.ok_or_else(|| {
            CisError::serde(format!(
                "channel '{name}' has a data blob but no recorded component count"
            ))
        })?;
        Some(read_blob(&blob, dims, components)?)
    } else {
        None
    };
    Ok(Channel {
        name,
        kind: attrs.kind,
        data,
        variable: attrs.variable,
        colormap: attrs.colormap,
    })
}

/// Sorted names of the subdirectories of `dir`.
fn dir_names(dir: &Path) -> CisResult<Vec<String>> {
    let mut names = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(|e| CisError::io(format!("cannot read {}: {e}", dir.display())))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| CisError::io(format!("cannot read {}: {e}", dir.display())))?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Sorted paths of the `.json` files directly under `dir`.
fn json_files(dir: &Path) -> CisResult<Vec<std::path::PathBuf>> {
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(|e| CisError::io(format!("cannot read {}: {e}", dir.display())))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| CisError::io(format!("cannot read {}: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CisResult<T> {
    let text = fs::read_to_string(path)
        .map_err(|e| CisError::io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CisError::serde(format!("cannot parse {}: {e}", path.display())))
}
