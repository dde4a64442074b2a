//! The capability to issue GPU commands.
//!
//! Every OpenGL call goes through a context that is current on the calling
//! thread. Instead of relying on that ambient state, shader objects take an
//! explicit [`RenderingContext`] and borrow it for as long as they live.
mod opengl;

#[cfg(test)]
pub(crate) mod fake;

pub use opengl::GlContext;

use crate::{error::ShaderError, gl_wrappers::ShaderStage};

/// Raw name of a shader object.
pub type ShaderId = gl::types::GLuint;
/// Raw name of a program object.
pub type ProgramId = gl::types::GLuint;
/// Location of a uniform inside a linked program.
pub type UniformLocation = gl::types::GLint;

/// The subset of the graphics API used to build and drive shader programs.
///
/// Implementors guarantee that a context is current on the calling thread
/// for as long as the value exists.
pub trait RenderingContext {
    /// Create an empty shader object for `stage`.
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, ShaderError>;
    /// Replace the source of `shader`.
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    /// The complete compiler log for `shader`, however long it is.
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    /// Create an empty program object.
    fn create_program(&self) -> Result<ProgramId, ShaderError>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    /// The complete linker log for `program`, however long it is.
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);

    /// Make `program` the active program for subsequent draws.
    fn use_program(&self, program: ProgramId);
    /// The active program, `0` when none is bound.
    fn current_program(&self) -> ProgramId;
    /// `None` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Upload to the currently active program.
    fn uniform_1i(&self, location: UniformLocation, value: i32);
    /// Upload to the currently active program.
    fn uniform_1f(&self, location: UniformLocation, value: f32);
}
