pub mod channel;
pub mod colormap;
pub mod image;
pub mod layer;
pub mod store;
pub mod variable;
