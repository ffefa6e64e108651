use std::fs;
use std::path::Path;

use crate::foundation::error::{CisError, CisResult};
use crate::io::attrs::{ChannelAttrs, LayerAttrs, StoreAttrs};
use crate::io::blob::write_blob;
use crate::model::channel::Channel;
use crate::model::layer::Layer;
use crate::model::store::{CIS_CLASSNAME, Cis};

/// Serialize a whole store under `root`, which must not yet exist.
///
/// Directories are created top-down; any pre-existing directory aborts
/// the write with a descriptive error so an earlier export is never
/// silently overwritten.
#[tracing::instrument(skip(cis), fields(root = %root.display()))]
pub fn write_store(cis: &Cis, root: &Path) -> CisResult<()> {
    cis.validate()?;

    create_new_dir(root)?;
    write_json(
        &root.join("attributes.json"),
        &StoreAttrs {
            classname: CIS_CLASSNAME.to_string(),
            dims: [cis.dims.width, cis.dims.height],
            version: cis.version.clone(),
            flags: cis.flags.clone(),
            origin: cis.origin,
        },
    )?;

    let image_root = root.join("image");
    create_new_dir(&image_root)?;
    for image in cis.images.values() {
        let image_dir = image_root.join(&image.name);
        create_new_dir(&image_dir)?;
        let layer_root = image_dir.join("layer");
        create_new_dir(&layer_root)?;
        for layer in image.layers.values() {
            write_layer(layer, &layer_root)?;
        }
    }

    let colormap_root = root.join("colormaps");
    create_new_dir(&colormap_root)?;
    for colormap in cis.colormaps.values() {
        write_json(
            &colormap_root.join(format!("{}.json", colormap.name)),
            colormap,
        )?;
    }

    let variable_root = root.join("variables");
    create_new_dir(&variable_root)?;
    for variable in cis.variables.values() {
        write_json(
            &variable_root.join(format!("{}.json", variable.name)),
            variable,
        )?;
    }

    Ok(())
}

fn write_layer(layer: &Layer, layer_root: &Path) -> CisResult<()> {
    let layer_dir = layer_root.join(&layer.name);
    create_new_dir(&layer_dir)?;
    write_json(
        &layer_dir.join("attributes.json"),
        &LayerAttrs {
            offset: [layer.offset.x, layer.offset.y],
            dims: [layer.dims.width, layer.dims.height],
            primary: layer.channel.name.clone(),
            depth: layer.depth.as_ref().map(|c| c.name.clone()),
            shadow: layer.shadow.as_ref().map(|c| c.name.clone()),
        },
    )?;

    let channel_root = layer_dir.join("channel");
    create_new_dir(&channel_root)?;
    write_channel(&layer.channel, &channel_root)?;
    if let Some(depth) = &layer.depth {
        write_channel(depth, &channel_root)?;
    }
    if let Some(shadow) = &layer.shadow {
        write_channel(shadow, &channel_root)?;
    }
    Ok(())
}

fn write_channel(channel: &Channel, channel_root: &Path) -> CisResult<()> {
    let dir = channel_root.join(&channel.name);
    create_new_dir(&dir)?;
    write_json(
        &dir.join("attributes.json"),
        &ChannelAttrs {
            kind: channel.kind,
            components: channel.data.as_ref().map(|d| d.components()),
            variable: channel.variable.clone(),
            colormap: channel.colormap.clone(),
        },
    )?;
    if let Some(data) = &channel.data {
        write_blob(&dir.join("data.gz"), data)?;
    }
    Ok(())
}

fn create_new_dir(path: &Path) -> CisResult<()> {
    fs::create_dir(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            CisError::io(format!(
                "refusing to overwrite existing directory {}",
                path.display()
            ))
        } else {
            CisError::io(format!("cannot create {}: {e}", path.display()))
        }
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> CisResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CisError::serde(format!("cannot serialize {}: {e}", path.display())))?;
    fs::write(path, json).map_err(|e| CisError::io(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/io/roundtrip.rs"]
mod tests;
