//! Exports [`ShaderProgram`].
use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{shader::non_empty_log, CompiledShader, Shader, ShaderStage};
use crate::{
    context::{ProgramId, RenderingContext, UniformLocation},
    error::ShaderError,
};

/// What to do when a stage fails to compile or the program fails to link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop and return the error. Nothing is left allocated on the GPU.
    #[default]
    FailFast,
    /// Log the diagnostic, record it on the program and keep going.
    ///
    /// Handy while iterating on shaders. The resulting program reports
    /// `is_linked() == false` and draws nothing useful.
    LogAndContinue,
}

impl FailurePolicy {
    /// Turn an optional failure into either an error or a recorded diagnostic.
    fn settle<T>(
        self,
        (value, failure): (T, Option<ShaderError>),
        diagnostics: &mut Vec<ShaderError>,
    ) -> Result<T, ShaderError> {
        match (self, failure) {
            (_, None) => Ok(value),
            (Self::FailFast, Some(err)) => Err(err),
            (Self::LogAndContinue, Some(err)) => {
                log::error!("{err}");
                diagnostics.push(err);
                Ok(value)
            }
        }
    }
}

/// Knobs for building a [`ShaderProgram`].
#[derive(Debug, Clone, Default)]
pub struct ProgramOptions {
    pub on_failure: FailurePolicy,
}

impl ProgramOptions {
    pub fn log_and_continue() -> Self {
        Self {
            on_failure: FailurePolicy::LogAndContinue,
        }
    }
}

/// Wrapper for a linked vertex + fragment program.
///
/// <https://www.khronos.org/opengl/wiki/GLSL_Object#Program_objects>
///
/// The program object is deleted when this value is dropped.
pub struct ShaderProgram<'ctx, C: RenderingContext> {
    ctx: &'ctx C,
    /// The internal OpenGL id for this object.
    id: ProgramId,
    linked: bool,
    /// Failures tolerated under [`FailurePolicy::LogAndContinue`].
    diagnostics: Vec<ShaderError>,
}

impl<'ctx, C: RenderingContext> ShaderProgram<'ctx, C> {
    /// Read, compile and link the two shader files.
    ///
    /// # Errors
    /// Errors if either file cannot be read, or if compiling or linking fails.
    pub fn from_files(
        ctx: &'ctx C,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Self::from_files_with(ctx, vertex_path, fragment_path, &ProgramOptions::default())
    }

    /// [`ShaderProgram::from_files`] with explicit options.
    ///
    /// # Errors
    /// Read errors are always returned. Compile and link errors are returned
    /// unless `options` asks to continue past them.
    pub fn from_files_with(
        ctx: &'ctx C,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        options: &ProgramOptions,
    ) -> Result<Self, ShaderError> {
        // Both reads happen before any GPU object exists.
        let vertex_source = read_source(ShaderStage::Vertex, vertex_path.as_ref())?;
        let fragment_source = read_source(ShaderStage::Fragment, fragment_path.as_ref())?;
        Self::from_sources_with(ctx, vertex_source, fragment_source, options)
    }

    /// Compile and link in-memory sources.
    ///
    /// # Errors
    /// Errors if compiling or linking fails.
    pub fn from_sources(
        ctx: &'ctx C,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        Self::from_sources_with(ctx, vertex_source, fragment_source, &ProgramOptions::default())
    }

    /// [`ShaderProgram::from_sources`] with explicit options.
    ///
    /// # Errors
    /// Errors if compiling or linking fails and `options` says to fail fast,
    /// or if the driver cannot create the objects.
    pub fn from_sources_with(
        ctx: &'ctx C,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
        options: &ProgramOptions,
    ) -> Result<Self, ShaderError> {
        let policy = options.on_failure;
        let mut diagnostics = Vec::new();

        let vertex = Shader::vertex(ctx, vertex_source)?;
        let fragment = Shader::fragment(ctx, fragment_source)?;
        let vertex = policy.settle(vertex.compile_lenient(), &mut diagnostics)?;
        let fragment = policy.settle(fragment.compile_lenient(), &mut diagnostics)?;

        Self::link(ctx, vertex, fragment, policy, diagnostics)
    }

    /// Attach both stages and link them.
    ///
    /// The stages are taken by value, so they are detached and deleted when
    /// this returns, whatever the outcome.
    fn link(
        ctx: &'ctx C,
        vertex: CompiledShader<'ctx, C>,
        fragment: CompiledShader<'ctx, C>,
        policy: FailurePolicy,
        diagnostics: Vec<ShaderError>,
    ) -> Result<Self, ShaderError> {
        let id = ctx.create_program()?;
        // From here on, dropping `program` releases the object.
        let mut program = Self {
            ctx,
            id,
            linked: false,
            diagnostics,
        };

        ctx.attach_shader(id, vertex.id());
        ctx.attach_shader(id, fragment.id());
        ctx.link_program(id);
        program.linked = ctx.program_link_status(id);
        let failure = (!program.linked).then(|| ShaderError::Link {
            log: non_empty_log(ctx.program_info_log(id)),
        });
        ctx.detach_shader(id, vertex.id());
        ctx.detach_shader(id, fragment.id());

        policy.settle(((), failure), &mut program.diagnostics)?;
        if program.linked {
            log::debug!("linked shader program {id}");
        }
        Ok(program)
    }

    /// Get the internal id of this program.
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Did the link step succeed?
    ///
    /// Always `true` for programs built with [`FailurePolicy::FailFast`].
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Failures that were logged and skipped while building this program.
    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    /// Make this the active program for subsequent draw calls.
    pub fn use_program(&self) {
        self.ctx.use_program(self.id);
    }

    /// Get the location of a uniform in this program.
    ///
    /// `None` if the name is not an active uniform, which includes uniforms
    /// the compiler optimized away, or if the program never linked.
    pub fn uniform_location(&self, name: impl AsRef<str>) -> Option<UniformLocation> {
        if !self.linked {
            return None;
        }
        self.ctx.uniform_location(self.id, name.as_ref())
    }

    /// Set a `bool` uniform. Uploaded as an int, like GLSL expects.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, i32::from(value));
    }

    /// Set an `int` (or sampler) uniform. Unknown names are ignored.
    pub fn set_int(&self, name: &str, value: i32) {
        self.upload(name, |ctx, location| ctx.uniform_1i(location, value));
    }

    /// Set a `float` uniform. Unknown names are ignored.
    pub fn set_float(&self, name: &str, value: f32) {
        self.upload(name, |ctx, location| ctx.uniform_1f(location, value));
    }

    /// Resolve `name` and run `upload` with this program bound.
    ///
    /// Whichever program was active beforehand is active again afterwards.
    fn upload(&self, name: &str, upload: impl FnOnce(&C, UniformLocation)) {
        let Some(location) = self.uniform_location(name) else {
            log::trace!("program {} has no active uniform `{name}`", self.id);
            return;
        };
        let previous = self.ctx.current_program();
        if previous != self.id {
            self.ctx.use_program(self.id);
        }
        upload(self.ctx, location);
        if previous != self.id {
            self.ctx.use_program(previous);
        }
    }
}

impl<C: RenderingContext> Drop for ShaderProgram<'_, C> {
    fn drop(&mut self) {
        self.ctx.delete_program(self.id);
    }
}

fn read_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    log::debug!("reading {stage} shader source from {}", path.display());
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        stage,
        path: PathBuf::from(path),
        source,
    })
}
