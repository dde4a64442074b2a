//! [`RenderingContext`] backed by the `gl` bindings.
use std::{
    borrow::Cow,
    ffi::{c_void, CStr, CString},
    ptr::null,
};

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use sdl2::{video::GLContext, VideoSubsystem};

use super::{ProgramId, RenderingContext, ShaderId, UniformLocation};
use crate::{
    error::{ContextError, ShaderError},
    gl_wrappers::ShaderStage,
};

/// A loaded OpenGL context that is current on this thread.
///
/// Borrows the SDL context it was created from, so nothing built on top of it
/// can outlive the context or be sent to another thread.
pub struct GlContext<'a> {
    _gl_ctx: &'a GLContext,
}

impl<'a> GlContext<'a> {
    /// Load function pointers through `video` and wrap `gl_ctx`.
    ///
    /// # Errors
    /// Errors if `gl_ctx` is not current on the calling thread, or if the
    /// functions needed for shader programs are missing from the driver.
    pub fn load(video: &VideoSubsystem, gl_ctx: &'a GLContext) -> Result<Self, ContextError> {
        if !gl_ctx.is_current() {
            return Err(ContextError::NotCurrent);
        }
        gl::load_with(|s| video.gl_get_proc_address(s).cast());

        let required = [
            (gl::CreateShader::is_loaded(), "glCreateShader"),
            (gl::ShaderSource::is_loaded(), "glShaderSource"),
            (gl::CompileShader::is_loaded(), "glCompileShader"),
            (gl::GetShaderInfoLog::is_loaded(), "glGetShaderInfoLog"),
            (gl::CreateProgram::is_loaded(), "glCreateProgram"),
            (gl::LinkProgram::is_loaded(), "glLinkProgram"),
            (gl::GetProgramInfoLog::is_loaded(), "glGetProgramInfoLog"),
            (gl::UseProgram::is_loaded(), "glUseProgram"),
            (gl::GetUniformLocation::is_loaded(), "glGetUniformLocation"),
            (gl::GenVertexArrays::is_loaded(), "glGenVertexArrays"),
        ];
        if let Some((_, name)) = required.into_iter().find(|(loaded, _)| !loaded) {
            return Err(ContextError::MissingFunction(name));
        }

        log::info!("OpenGL {}", gl_string(gl::VERSION));
        log::debug!("renderer: {}", gl_string(gl::RENDERER));
        Ok(Self { _gl_ctx: gl_ctx })
    }

    /// Update the viewport to cover `width` x `height` pixels.
    pub fn viewport(&self, width: u32, height: u32) {
        let real_width = GLsizei::try_from(width).unwrap_or(GLsizei::MAX);
        let real_height = GLsizei::try_from(height).unwrap_or(GLsizei::MAX);
        // SAFETY:
        // gl::Viewport does not fail with non-negative values.
        unsafe {
            gl::Viewport(0, 0, real_width, real_height);
        }
    }

    /// Clear the color buffer to `color` (RGBA).
    pub fn clear(&self, [r, g, b, a]: [f32; 4]) {
        // SAFETY:
        // ClearColor clamps its inputs and COLOR_BUFFER_BIT is a valid mask.
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    /// Rasterize polygons as outlines instead of filled faces.
    pub fn set_wireframe(&self, wireframe: bool) {
        let mode = if wireframe { gl::LINE } else { gl::FILL };
        // SAFETY:
        // FRONT_AND_BACK with LINE or FILL is always accepted in core profile.
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, mode);
        }
    }

    /// Forward driver debug messages to the `gl` log target.
    ///
    /// Returns `false` when the driver does not expose `glDebugMessageCallback`
    /// (it is core only from 4.3).
    pub fn enable_debug_output(&self) -> bool {
        if !gl::DebugMessageCallback::is_loaded() {
            return false;
        }
        // SAFETY:
        // the callback is a `'static` fn that ignores the null user pointer.
        unsafe {
            gl::Enable(gl::DEBUG_OUTPUT);
            gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
            gl::DebugMessageCallback(Some(gl_debug_output), null());
        }
        true
    }
}

// SAFETY (for every block below):
// a `GlContext` only exists while its context is current on this thread, and
// the calls take object names by value or point at locals alive for the call.
impl RenderingContext for GlContext<'_> {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, ShaderError> {
        let shader = unsafe { gl::CreateShader(stage.gl_enum()) };
        if shader == 0 {
            return Err(ShaderError::ObjectCreation("shader"));
        }
        Ok(shader)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        // Passing an explicit length means the source needs no nul terminator.
        let ptr = source.as_ptr().cast::<GLchar>();
        let len = GLint::try_from(source.len()).unwrap_or(GLint::MAX);
        unsafe {
            gl::ShaderSource(shader, 1, &ptr, &len);
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success == GLint::from(gl::TRUE)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        unsafe { info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog) }
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> Result<ProgramId, ShaderError> {
        let program = unsafe { gl::CreateProgram() };
        if program == 0 {
            return Err(ShaderError::ObjectCreation("program"));
        }
        Ok(program)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success == GLint::from(gl::TRUE)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        unsafe { info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog) }
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: ProgramId) {
        unsafe { gl::UseProgram(program) }
    }

    fn current_program(&self) -> ProgramId {
        let mut current: GLint = 0;
        unsafe { gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut current) };
        ProgramId::try_from(current).unwrap_or(0)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        // A name with an interior nul can never match a GLSL identifier.
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr().cast()) };
        (location >= 0).then_some(location)
    }

    fn uniform_1i(&self, location: UniformLocation, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }
}

/// Read an object's info log, sized by `INFO_LOG_LENGTH`.
///
/// # Safety
/// `object` must be a valid name for the pair of query functions passed in.
unsafe fn info_log(
    object: GLuint,
    get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
    get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut capacity: GLint = 0;
    get_iv(object, gl::INFO_LOG_LENGTH, &mut capacity);
    let len = match usize::try_from(capacity) {
        Ok(len) if len > 0 => len,
        _ => return String::new(),
    };

    let mut infolog: Vec<u8> = vec![0; len];
    let mut written: GLsizei = 0;
    get_log(object, capacity, &mut written, infolog.as_mut_ptr().cast());
    infolog.truncate(usize::try_from(written).unwrap_or(0).min(len));
    String::from_utf8_lossy(&infolog).into_owned()
}

fn gl_string(name: GLenum) -> Cow<'static, str> {
    unsafe {
        let raw = gl::GetString(name);
        if raw.is_null() {
            Cow::Borrowed("unknown")
        } else {
            Cow::Owned(CStr::from_ptr(raw.cast()).to_string_lossy().into_owned())
        }
    }
}

extern "system" fn gl_debug_output(
    _source: GLenum,
    _output_type: GLenum,
    id: GLuint,
    severity: GLenum,
    length: GLsizei,
    message: *const GLchar,
    _user_param: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    // SAFETY: the driver hands us `length` bytes, or a nul-terminated string
    // when `length` is negative.
    let text = unsafe {
        match usize::try_from(length) {
            Ok(len) => String::from_utf8_lossy(std::slice::from_raw_parts(message.cast(), len)),
            Err(_) => CStr::from_ptr(message).to_string_lossy(),
        }
    };
    let level = match severity {
        gl::DEBUG_SEVERITY_HIGH => log::Level::Error,
        gl::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        gl::DEBUG_SEVERITY_LOW => log::Level::Info,
        _ => log::Level::Debug,
    };
    log::log!(target: "gl", level, "[{id}] {}", text.trim_end());
}
