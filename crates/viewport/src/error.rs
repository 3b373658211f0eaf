use std::path::PathBuf;

use crate::programs::ProgramKind;

/// Why an image could not be decoded. Always recovered with the placeholder
/// glyph; never fatal to the viewport.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{} is not a supported image file", path.display())]
    Unsupported { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("decoded buffer for {} does not match {width}x{height} RGBA8", path.display())]
    Malformed {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// Shader stage a compile log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Link => "link",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    /// A GPU program failed to compile or link. Fatal at initialisation.
    #[error("{kind} program failed at {stage} stage:\n{log}")]
    ShaderCompile {
        kind: ProgramKind,
        stage: ShaderStage,
        log: String,
    },
    /// Texture or buffer allocation failed. Fatal for the current operation only.
    #[error("GPU resource allocation failed: {0}")]
    GpuResource(String),
    /// The presentation surface could not provide a frame.
    #[error("surface error: {0}")]
    Surface(String),
}

pub type Result<T, E = ViewportError> = std::result::Result<T, E>;
