pub mod buffer;
pub mod interface;
