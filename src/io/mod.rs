mod attrs;
pub mod blob;
pub mod reader;
pub mod writer;
