//! Error types for shader loading and context setup.
use std::{io, path::PathBuf};

use crate::gl_wrappers::ShaderStage;

/// Everything that can go wrong while building a
/// [`ShaderProgram`](crate::gl_wrappers::ShaderProgram).
#[derive(thiserror::Error, Debug)]
pub enum ShaderError {
    /// A shader source file could not be read.
    #[error("failed to read {stage} shader source from `{}`", .path.display())]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stage was rejected by the shader compiler.
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    /// Both stages compiled but the program did not link.
    #[error("shader program failed to link: {log}")]
    Link { log: String },

    /// The driver handed back the null object.
    #[error("OpenGL refused to create a {0} object")]
    ObjectCreation(&'static str),
}

impl ShaderError {
    /// The stage this error belongs to, if it is tied to one.
    pub fn stage(&self) -> Option<ShaderStage> {
        match self {
            Self::Io { stage, .. } | Self::Compile { stage, .. } => Some(*stage),
            Self::Link { .. } | Self::ObjectCreation(_) => None,
        }
    }

    /// Driver diagnostics carried by compile and link failures.
    pub fn log(&self) -> Option<&str> {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => Some(log),
            Self::Io { .. } | Self::ObjectCreation(_) => None,
        }
    }
}

/// Failure to obtain a usable [`GlContext`](crate::context::GlContext).
#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("the GL context is not current on this thread")]
    NotCurrent,
    #[error("OpenGL function `{0}` could not be loaded")]
    MissingFunction(&'static str),
}
