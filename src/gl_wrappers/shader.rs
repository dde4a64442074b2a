//! Exports [`Shader`], [`CompiledShader`] and [`ShaderStage`].
use std::fmt;

use crate::{
    context::{RenderingContext, ShaderId},
    error::ShaderError,
};

/// Represents the stage a shader object runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// This shader is a Vertex shader.
    Vertex,
    /// This shader is a Fragment shader.
    Fragment,
}

impl ShaderStage {
    /// The OpenGL enum passed to `glCreateShader`.
    pub fn gl_enum(self) -> gl::types::GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// An uncompiled shader object.
/// Contains the source code necessary to compile it.
pub struct Shader<'ctx, C: RenderingContext> {
    ctx: &'ctx C,
    /// GL ID for this shader.
    inner: ShaderId,
    stage: ShaderStage,
    /// The source code for this shader. Dropped once compiled.
    source: String,
    /// Was ownership of `inner` handed to a [`CompiledShader`]?
    was_compiled: bool,
}

impl<'ctx, C: RenderingContext> Shader<'ctx, C> {
    /// Create the shader object for `stage` and hold on to `source`.
    ///
    /// # Errors
    /// Errors if the driver refuses to create a shader object.
    pub fn new(
        ctx: &'ctx C,
        stage: ShaderStage,
        source: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let inner = ctx.create_shader(stage)?;
        Ok(Self {
            ctx,
            inner,
            stage,
            source: source.into(),
            was_compiled: false,
        })
    }
    /// Helper function for `Shader::new()` with vertex shaders.
    pub fn vertex(ctx: &'ctx C, source: impl Into<String>) -> Result<Self, ShaderError> {
        Self::new(ctx, ShaderStage::Vertex, source)
    }
    /// Helper function for `Shader::new()` with fragment shaders.
    pub fn fragment(ctx: &'ctx C, source: impl Into<String>) -> Result<Self, ShaderError> {
        Self::new(ctx, ShaderStage::Fragment, source)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Compile this shader.
    ///
    /// Returns a [`CompiledShader`], for use in [`ShaderProgram`](super::ShaderProgram)s.
    ///
    /// # Errors
    /// Errors if compilation was unsuccessful, with the full compiler log.
    /// The shader object is deleted before returning.
    pub fn compile(self) -> Result<CompiledShader<'ctx, C>, ShaderError> {
        match self.compile_lenient() {
            (compiled, None) => Ok(compiled),
            (_, Some(err)) => Err(err),
        }
    }

    /// Compile this shader, keeping the object even if compilation failed.
    ///
    /// The failure, if any, is returned next to the shader so the caller can
    /// decide whether to carry on with it.
    pub fn compile_lenient(mut self) -> (CompiledShader<'ctx, C>, Option<ShaderError>) {
        let ctx = self.ctx;
        ctx.shader_source(self.inner, &self.source);
        ctx.compile_shader(self.inner);

        let failure = if ctx.shader_compile_status(self.inner) {
            log::debug!("compiled {} shader {}", self.stage, self.inner);
            None
        } else {
            Some(ShaderError::Compile {
                stage: self.stage,
                log: non_empty_log(ctx.shader_info_log(self.inner)),
            })
        };

        self.was_compiled = true;
        let compiled = CompiledShader {
            ctx,
            id: self.inner,
            stage: self.stage,
        };
        (compiled, failure)
    }
}

impl<C: RenderingContext> Drop for Shader<'_, C> {
    fn drop(&mut self) {
        if !self.was_compiled {
            self.ctx.delete_shader(self.inner);
        }
    }
}

/// A compiled shader object.
/// This can be linked and used in [`ShaderProgram`](super::ShaderProgram)s.
///
/// The object is deleted when this value is dropped. A program that has
/// already linked against it keeps working.
pub struct CompiledShader<'ctx, C: RenderingContext> {
    ctx: &'ctx C,
    /// GL ID for this compiled shader.
    id: ShaderId,
    stage: ShaderStage,
}

impl<C: RenderingContext> CompiledShader<'_, C> {
    /// Get the internal GL ID of this shader.
    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<C: RenderingContext> Drop for CompiledShader<'_, C> {
    fn drop(&mut self) {
        self.ctx.delete_shader(self.id);
    }
}

/// Some drivers report failure without saying why.
pub(crate) fn non_empty_log(log: String) -> String {
    if log.trim().is_empty() {
        String::from("no diagnostics reported by the driver")
    } else {
        log
    }
}
