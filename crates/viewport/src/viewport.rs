use std::path::Path;

use tracing::{debug, info, warn};

use crate::backend::{BackgroundPass, BackgroundUniforms, Frame, GpuBackend, ImagePass, ImageUniforms};
use crate::channels::channel_matrix;
use crate::error::{DecodeError, Result};
use crate::event::{EventOutcome, RedrawRequest, ViewportEvent};
use crate::fit::fit;
use crate::geometry::{QUAD_INDICES, QUAD_VERTICES};
use crate::programs::{ProgramKind, ProgramRegistry};
use crate::source::ImageSource;
use crate::types::{
    Background, Channel, ChannelMask, ChannelMatrix, DecodedImage, GpuDiagnostics, Rgba, Scale,
};

/// Status reported when a path falls back to the placeholder glyph.
pub const NOT_AN_IMAGE: &str = "not an image";

/// Derived state read by every frame. Recomputed on mutation, never while
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub viewport_size: (u32, u32),
    /// Native size of the displayed image; `(1, 1)` until one is set.
    pub texture_size: (u32, u32),
    pub scale: Scale,
    pub channels: ChannelMask,
    pub channel_matrix: ChannelMatrix,
    pub background: Background,
}

impl ViewportState {
    fn new(width: u32, height: u32) -> Self {
        let channels = ChannelMask::default();
        Self {
            viewport_size: (width, height),
            texture_size: (1, 1),
            scale: fit(1, 1, width, height),
            channels,
            channel_matrix: channel_matrix(channels),
            background: Background::default(),
        }
    }

    fn refit(&mut self) {
        let (tex_w, tex_h) = self.texture_size;
        let (vp_w, vp_h) = self.viewport_size;
        self.scale = fit(tex_w, tex_h, vp_w, vp_h);
        debug!(
            tex_w,
            tex_h,
            vp_w,
            vp_h,
            scale_x = self.scale.x,
            scale_y = self.scale.y,
            "recomputed image scale"
        );
    }
}

/// GPU image viewport: owns both programs, the quad, and at most one texture.
///
/// All mutation happens on the caller's thread; `render` only reads the cached
/// [`ViewportState`].
pub struct Viewport<B: GpuBackend> {
    backend: B,
    source: Box<dyn ImageSource>,
    redraw: Box<dyn RedrawRequest>,
    programs: ProgramRegistry<B::Program>,
    geometry: B::Geometry,
    texture: Option<B::Texture>,
    state: ViewportState,
    status: String,
}

impl<B: GpuBackend> Viewport<B> {
    /// Builds both programs and the quad. A shader failure is returned to the
    /// caller; no viewport exists without its programs.
    pub fn new(
        mut backend: B,
        source: Box<dyn ImageSource>,
        redraw: Box<dyn RedrawRequest>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let programs = ProgramRegistry::compile_and_link(&mut backend)?;
        let geometry = backend.create_geometry(&QUAD_VERTICES, &QUAD_INDICES)?;
        backend.resize(width, height);

        Ok(Self {
            backend,
            source,
            redraw,
            programs,
            geometry,
            texture: None,
            state: ViewportState::new(width, height),
            status: String::new(),
        })
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Status line of the last `set_image` call.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn has_image(&self) -> bool {
        self.texture.is_some()
    }

    pub fn diagnostics(&self) -> GpuDiagnostics {
        self.backend.diagnostics()
    }

    /// Loads `path` and displays it, or the placeholder glyph when it is not
    /// a decodable image. Never fails; the outcome is the returned status.
    pub fn set_image(&mut self, path: &Path) -> String {
        let (image, status) = match self.source.decode(path) {
            Ok(decoded) => (decoded.image, decoded.summary),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "showing placeholder");
                let status = match err {
                    DecodeError::Unsupported { .. } => NOT_AN_IMAGE.to_string(),
                    other => format!("{NOT_AN_IMAGE}: {other}"),
                };
                (self.source.fallback_glyph(path), status)
            }
        };

        self.status = match self.set_pixels(image) {
            Ok(_) => {
                info!(path = %path.display(), status = %status, "displaying image");
                status
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "keeping previous image");
                format!("failed to display {}: {err}", path.display())
            }
        };
        self.status.clone()
    }

    /// Uploads already-decoded pixels and makes them the displayed image.
    ///
    /// The new texture is allocated before the current one is released, so an
    /// allocation failure leaves the previous image on screen.
    pub fn set_pixels(&mut self, image: DecodedImage) -> Result<(u32, u32)> {
        let texture = self.backend.create_texture(&image)?;
        if let Some(previous) = self.texture.replace(texture) {
            self.backend.release_texture(previous);
        }

        self.state.texture_size = image.dimensions();
        self.state.refit();
        self.redraw.request_redraw();
        Ok(image.dimensions())
    }

    /// Host-driven resize. Refits the image; the host repaints on its own.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.viewport_size = (width, height);
        self.backend.resize(width, height);
        self.state.refit();
    }

    pub fn set_channels(&mut self, channels: ChannelMask) {
        self.state.channels = channels;
        self.state.channel_matrix = channel_matrix(channels);
        self.redraw.request_redraw();
    }

    pub fn toggle_channel(&mut self, channel: Channel) {
        let mut channels = self.state.channels;
        channels.toggle(channel);
        self.set_channels(channels);
    }

    pub fn solo_channel(&mut self, channel: Channel) {
        self.set_channels(ChannelMask::solo(channel));
    }

    pub fn set_background(&mut self, checkerboard: bool, color1: Rgba, color2: Rgba) {
        self.state.background = Background::from_request(checkerboard, color1, color2);
        self.redraw.request_redraw();
    }

    /// Draws the background pass, then the image pass if an image is set.
    pub fn render(&mut self) -> Result<()> {
        let (color1, color2) = self.state.background.colors();
        let background = BackgroundPass {
            program: self.programs.get(ProgramKind::Background),
            uniforms: BackgroundUniforms {
                color1,
                color2,
                height: self.state.viewport_size.1 as f32,
            },
        };
        let image = self.texture.as_ref().map(|texture| ImagePass {
            program: self.programs.get(ProgramKind::Texture),
            texture,
            uniforms: ImageUniforms {
                scale: self.state.scale,
                channels: self.state.channel_matrix,
            },
        });
        let frame = Frame {
            geometry: &self.geometry,
            index_count: QUAD_INDICES.len() as u32,
            background,
            image,
        };
        self.backend.draw(&frame)
    }

    /// Routes one host event to the matching state update.
    pub fn handle_event(&mut self, event: ViewportEvent) -> Result<EventOutcome> {
        match event {
            ViewportEvent::Resized { width, height } => self.resize(width, height),
            ViewportEvent::RedrawRequested => {
                self.render()?;
                return Ok(EventOutcome::Rendered);
            }
            ViewportEvent::OpenImage(path) => {
                return Ok(EventOutcome::Status(self.set_image(&path)));
            }
            ViewportEvent::SetChannels(channels) => self.set_channels(channels),
            ViewportEvent::ToggleChannel(channel) => self.toggle_channel(channel),
            ViewportEvent::SoloChannel(channel) => self.solo_channel(channel),
            ViewportEvent::SetBackground {
                checkerboard,
                color1,
                color2,
            } => self.set_background(checkerboard, color1, color2),
        }
        Ok(EventOutcome::Handled)
    }
}

impl<B: GpuBackend> Drop for Viewport<B> {
    fn drop(&mut self) {
        if let Some(texture) = self.texture.take() {
            self.backend.release_texture(texture);
        }
    }
}
