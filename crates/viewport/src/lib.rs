//! GPU image viewport for the texture viewer.
//!
//! Loads a raster image, uploads it as a texture, and draws it over a
//! procedural checkerboard (or flat colour) with per-channel masking and
//! aspect-correct fitting:
//!
//! ```text
//!   host (window, keys, drops)
//!          │ ViewportEvent
//!          ▼
//!   Viewport::handle_event ──▶ set_image ──▶ ImageSource::decode ─▶ GpuBackend::create_texture
//!          │                   resize / set_channels / set_background
//!          │                        └─▶ cached ViewportState (scale, channel matrix, colours)
//!          ▼
//!   Viewport::render ──▶ Frame { background pass, image pass } ──▶ GpuBackend::draw
//! ```
//!
//! [`gpu::WgpuBackend`] is the production backend. Everything above the
//! [`GpuBackend`] trait is plain state and pure functions.

pub mod backend;
pub mod channels;
pub mod compile;
pub mod error;
pub mod event;
pub mod fit;
pub mod geometry;
pub mod glyph;
pub mod gpu;
pub mod programs;
pub mod source;
pub mod types;
mod viewport;

pub use backend::{Frame, GpuBackend};
pub use channels::channel_matrix;
pub use error::{DecodeError, Result, ShaderStage, ViewportError};
pub use event::{EventOutcome, RedrawRequest, ViewportEvent};
pub use fit::fit;
pub use gpu::{PowerPreference, WgpuBackend};
pub use programs::{ProgramKind, ProgramRegistry};
pub use source::{Decoded, FileImageSource, ImageSource};
pub use types::{
    Background, Channel, ChannelMask, ChannelMatrix, DecodedImage, GpuDiagnostics, Rgba, Scale,
    Vertex,
};
pub use viewport::{Viewport, ViewportState, NOT_AN_IMAGE};
