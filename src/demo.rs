//! Window, context and event plumbing shared by the demo binaries.
use std::path::PathBuf;

use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
    video::{self, GLContext, Window},
    EventPump, Sdl, VideoSubsystem,
};

use crate::{context::GlContext, error::ContextError};

/// How the demo window and its GL context are set up.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Requested core-profile version, (major, minor).
    pub gl_version: (u8, u8),
    /// RGBA color each frame is cleared to.
    pub clear_color: [f32; 4],
    pub vsync: bool,
    /// Create the window without showing it.
    pub hidden: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Learn OpenGL"),
            width: 800,
            height: 600,
            gl_version: (3, 3),
            clear_color: [0.2, 0.7, 0.3, 1.0],
            vsync: true,
            hidden: false,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("error creating window")]
    Window(#[from] video::WindowBuildError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// An open window with a current GL context.
///
/// Fields drop in order: the GL context goes before its window.
pub struct DemoWindow {
    gl_ctx: GLContext,
    window: Window,
    video: VideoSubsystem,
    _sdl: Sdl,
    clear_color: [f32; 4],
}

/// Pending window events.
pub struct EventLoop {
    pump: EventPump,
    window_id: u32,
}

/// Whether the render loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Continue,
    Quit,
}

/// Open a window described by `config` and make its GL context current.
///
/// # Errors
/// Errors if SDL, the window or the GL context cannot be created.
pub fn open(config: &WindowConfig) -> Result<(DemoWindow, EventLoop), DemoError> {
    let sdl = sdl2::init().map_err(DemoError::Sdl)?;
    let video = sdl.video().map_err(DemoError::Sdl)?;
    video.gl_load_library_default().map_err(DemoError::Sdl)?;

    let gl_attr = video.gl_attr();
    gl_attr.set_context_flags().forward_compatible().set();
    gl_attr.set_context_version(config.gl_version.0, config.gl_version.1);
    gl_attr.set_context_profile(video::GLProfile::Core);

    let mut builder = video.window(&config.title, config.width, config.height);
    builder.position_centered().resizable().opengl();
    if config.hidden {
        builder.hidden();
    }
    let window = builder.build()?;

    let gl_ctx = window.gl_create_context().map_err(DemoError::Sdl)?;
    window.gl_make_current(&gl_ctx).map_err(DemoError::Sdl)?;
    let interval = if config.vsync {
        video::SwapInterval::VSync
    } else {
        video::SwapInterval::Immediate
    };
    if let Err(err) = video.gl_set_swap_interval(interval) {
        log::warn!("could not set swap interval: {err}");
    }

    let pump = sdl.event_pump().map_err(DemoError::Sdl)?;
    let window_id = window.id();
    log::info!(
        "opened \"{}\" ({}x{}), requested GL {}.{} core",
        config.title,
        config.width,
        config.height,
        config.gl_version.0,
        config.gl_version.1
    );

    let demo_window = DemoWindow {
        gl_ctx,
        window,
        video,
        _sdl: sdl,
        clear_color: config.clear_color,
    };
    Ok((demo_window, EventLoop { pump, window_id }))
}

impl DemoWindow {
    /// Load OpenGL and hand out the context token for this window.
    ///
    /// # Errors
    /// Errors if the context is not current or OpenGL failed to load.
    pub fn rendering_context(&self) -> Result<GlContext<'_>, ContextError> {
        let ctx = GlContext::load(&self.video, &self.gl_ctx)?;
        let (width, height) = self.window.drawable_size();
        ctx.viewport(width, height);
        if ctx.enable_debug_output() {
            log::debug!("GL debug output enabled");
        }
        Ok(ctx)
    }

    /// Clear to the configured color.
    pub fn clear(&self, ctx: &GlContext<'_>) {
        ctx.clear(self.clear_color);
    }

    /// Present the frame.
    pub fn swap(&self) {
        self.window.gl_swap_window();
    }
}

impl EventLoop {
    /// Drain pending events. Resizes update the viewport; closing the window
    /// or pressing Escape asks to quit.
    pub fn poll(&mut self, ctx: &GlContext<'_>) -> Frame {
        let mut frame = Frame::Continue;
        for event in self.pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => frame = Frame::Quit,
                Event::Window {
                    window_id,
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } if window_id == self.window_id => {
                    ctx.viewport(
                        u32::try_from(width).unwrap_or(0),
                        u32::try_from(height).unwrap_or(0),
                    );
                }
                _ => {}
            }
        }
        frame
    }
}

/// Path of a file in the repository's `shaders/` directory.
pub fn shader_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("shaders")
        .join(name)
}
