use std::fmt;

use crate::backend::GpuBackend;
use crate::compile::{ShaderSources, BACKGROUND_SOURCES, IMAGE_SOURCES};
use crate::error::Result;

/// The two GPU programs the viewport draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Position-only vertex stage; fragment stage paints the checkerboard or
    /// a flat fill.
    Background,
    /// Position + UV vertex stage with anisotropic scale; fragment stage
    /// samples the image and applies the channel matrix.
    Texture,
}

impl ProgramKind {
    pub fn sources(self) -> ShaderSources {
        match self {
            ProgramKind::Background => BACKGROUND_SOURCES,
            ProgramKind::Texture => IMAGE_SOURCES,
        }
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProgramKind::Background => "background",
            ProgramKind::Texture => "texture",
        })
    }
}

/// Both programs, created once and kept for the viewport's lifetime.
pub struct ProgramRegistry<P> {
    background: P,
    texture: P,
}

impl<P> ProgramRegistry<P> {
    /// Compiles and links both programs. Any failure is returned as-is; there
    /// is no partially built registry.
    pub fn compile_and_link<B>(backend: &mut B) -> Result<Self>
    where
        B: GpuBackend<Program = P>,
    {
        let background = compile_and_link(backend, ProgramKind::Background)?;
        let texture = compile_and_link(backend, ProgramKind::Texture)?;
        Ok(Self {
            background,
            texture,
        })
    }

    pub fn get(&self, kind: ProgramKind) -> &P {
        match kind {
            ProgramKind::Background => &self.background,
            ProgramKind::Texture => &self.texture,
        }
    }
}

/// Builds a single program of `kind` on `backend`.
pub fn compile_and_link<B: GpuBackend>(backend: &mut B, kind: ProgramKind) -> Result<B::Program> {
    let program = backend.compile_program(kind, kind.sources())?;
    tracing::debug!(%kind, "linked GPU program");
    Ok(program)
}
