//! Minimal OpenGL demos and the shader program loader they share.
//!
//! [`ShaderProgram`] turns a vertex and a fragment source into a linked
//! program, reporting exactly which step failed. Everything GPU-facing goes
//! through an explicit [`RenderingContext`].
pub mod context;
pub mod demo;
pub mod error;
pub mod gl_wrappers;
pub mod logging;
pub mod mesh;

pub use context::{GlContext, RenderingContext};
pub use error::{ContextError, ShaderError};
pub use gl_wrappers::{FailurePolicy, ProgramOptions, ShaderProgram, ShaderStage};
pub use mesh::Mesh;
