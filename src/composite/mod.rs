pub mod compositor;
pub mod decode;
pub mod layer_spec;
pub mod lighting;
