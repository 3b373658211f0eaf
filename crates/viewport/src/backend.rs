//! The seam between viewport state and a GPU API.
//!
//! [`Viewport`](crate::Viewport) owns every handle a backend hands out and
//! decides when they are created and released; the backend only translates
//! those requests into API calls. The wgpu implementation lives in
//! [`crate::gpu`]; tests drive the viewport with a counting mock.

use crate::compile::ShaderSources;
use crate::error::Result;
use crate::programs::ProgramKind;
use crate::types::{ChannelMatrix, DecodedImage, GpuDiagnostics, Rgba, Scale, Vertex};

pub trait GpuBackend {
    type Program;
    type Geometry;
    type Texture;

    /// Compiles and links one program. Failures carry the compiler log.
    fn compile_program(&mut self, kind: ProgramKind, sources: ShaderSources)
        -> Result<Self::Program>;

    /// Uploads immutable vertex and index data.
    fn create_geometry(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<Self::Geometry>;

    /// Allocates a 2D texture (trilinear minification, linear magnification,
    /// repeat wrap) and uploads `image` into it.
    fn create_texture(&mut self, image: &DecodedImage) -> Result<Self::Texture>;

    /// Releases a texture previously returned by [`Self::create_texture`].
    fn release_texture(&mut self, texture: Self::Texture);

    /// Tracks the framebuffer size. Zero-sized requests may be ignored.
    fn resize(&mut self, width: u32, height: u32);

    /// Encodes and presents one frame.
    fn draw(&mut self, frame: &Frame<'_, Self>) -> Result<()>;

    fn diagnostics(&self) -> GpuDiagnostics;
}

/// Uniforms of the background pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundUniforms {
    pub color1: Rgba,
    pub color2: Rgba,
    /// Viewport height in framebuffer pixels.
    pub height: f32,
}

/// Uniforms of the image pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageUniforms {
    pub scale: Scale,
    pub channels: ChannelMatrix,
}

pub struct BackgroundPass<'a, B: GpuBackend + ?Sized> {
    pub program: &'a B::Program,
    pub uniforms: BackgroundUniforms,
}

/// Drawn with alpha blending over the background; blending does not outlive
/// this pass.
pub struct ImagePass<'a, B: GpuBackend + ?Sized> {
    pub program: &'a B::Program,
    pub texture: &'a B::Texture,
    pub uniforms: ImageUniforms,
}

/// Everything one redraw needs, borrowed from the viewport's cached state.
pub struct Frame<'a, B: GpuBackend + ?Sized> {
    pub geometry: &'a B::Geometry,
    pub index_count: u32,
    pub background: BackgroundPass<'a, B>,
    pub image: Option<ImagePass<'a, B>>,
}
