//! Rust structs wrapping the nitty-gritty of OpenGL shader and program objects.
pub mod program;
pub mod shader;

pub use program::*;
pub use shader::*;
