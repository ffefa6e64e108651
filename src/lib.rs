//! Cineset is a Composable Image Set (CIS) engine.
//!
//! A visualization pipeline pre-renders many independent layers (one per
//! pipeline object, viewpoint, or parameter combination) once, stores each
//! layer's per-pixel buffers (color, depth, value, luminance) to disk, and
//! later recombines an arbitrary subset of layers into a final picture
//! without re-running the original 3D rendering. This makes post-hoc
//! exploration of a large parameter space (recoloring, toggling
//! visibility, reordering) possible from a bounded set of stored renders.
//!
//! # Pipeline overview
//!
//! 1. **Store**: a [`Cis`] owns images, variables, and colormaps over one
//!    canvas; [`write_store`] / [`read_store`] persist it as a directory
//!    of JSON attributes plus compressed array blobs.
//! 2. **Select**: an [`ImageView`] picks one image, an ordered set of
//!    active layers, and a channel per layer, then `update()` materializes
//!    canvas-sized [`LayerSpec`]s.
//! 3. **Composite**: a [`Compositor`] ([`DepthCompositor`] or
//!    [`PassthroughCompositor`]) merges the specs into one RGB image,
//!    decoding value buffers through LUTs and modulating by lighting.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: compositing and decoding are pure, synchronous
//!   array transforms; fixed inputs give fixed outputs.
//! - **No hidden state**: all compositor behavior comes from an explicit
//!   [`CompositeConfig`]; a finalized store is read-only.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod foundation;
mod io;
mod model;
mod view;

pub use composite::compositor::{
    ColorSpec, CompositeConfig, Compositor, DepthCompositor, PassthroughCompositor, render_batch,
};
pub use composite::decode::{
    MAX_PACKED, RANGE_EPSILON, background_depth, decode_float, decode_packed_rgb, encode_value_rgb,
    foreground_indices, normalize_value,
};
pub use composite::layer_spec::LayerSpec;
pub use composite::lighting::{ambient, diffuse, modulate_diffuse, specular};
pub use foundation::buffer::{Dims, Offset, PixelBuffer, Rgb};
pub use foundation::error::{CisError, CisResult};
pub use io::blob::{read_blob, write_blob};
pub use io::reader::read_store;
pub use io::writer::write_store;
pub use model::channel::{Channel, ChannelKind};
pub use model::colormap::{Colormap, ColormapSource, ControlPoint, Lut};
pub use model::image::Image;
pub use model::layer::Layer;
pub use model::store::{CIS_CLASSNAME, CIS_VERSION, Cis, Origin};
pub use model::variable::{Variable, VariableKind};
pub use view::image_view::ImageView;
