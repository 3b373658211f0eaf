//! wgpu implementation of [`GpuBackend`].
//!
//! - `context` owns instance/device/surface wiring and reconfigures the
//!   swapchain on resize.
//! - `pipeline` validates the embedded GLSL with naga and builds one render
//!   pipeline per [`ProgramKind`], each with its own uniform buffer.
//! - `texture` uploads decoded images with a CPU-built mip chain.
//! - `uniforms` mirrors the std140 blocks the shaders declare.

mod context;
mod pipeline;
mod texture;
mod uniforms;

use std::str::FromStr;

use tracing::{debug, warn};
use wgpu::util::DeviceExt;

use crate::backend::{Frame, GpuBackend};
use crate::compile::{ShaderSources, SHADER_LANGUAGE};
use crate::error::{Result, ViewportError};
use crate::programs::ProgramKind;
use crate::types::{DecodedImage, GpuDiagnostics, Vertex};

use context::GpuContext;
use pipeline::PipelineLayouts;
use uniforms::{BackgroundParams, ImageParams};

pub use pipeline::WgpuProgram;
pub use texture::WgpuTexture;

/// Framebuffer clear colour behind the background pass.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.0,
    b: 0.2,
    a: 0.0,
};

/// Which adapter to ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PowerPreference {
    #[default]
    Low,
    High,
}

impl FromStr for PowerPreference {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            other => Err(format!("unknown power preference '{other}' (expected low or high)")),
        }
    }
}

/// Vertex and index buffers for the quad.
pub struct WgpuGeometry {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

pub struct WgpuBackend {
    context: GpuContext,
    layouts: PipelineLayouts,
    sampler: wgpu::Sampler,
}

impl WgpuBackend {
    /// Creates a device and surface for `window`.
    pub fn new<W>(window: W, width: u32, height: u32, power: PowerPreference) -> Result<Self>
    where
        W: wgpu::WindowHandle + 'static,
    {
        let context = GpuContext::new(window, width, height, power)?;
        let layouts = PipelineLayouts::new(&context.device);
        let sampler = texture::create_sampler(&context.device);
        Ok(Self {
            context,
            layouts,
            sampler,
        })
    }
}

impl GpuBackend for WgpuBackend {
    type Program = WgpuProgram;
    type Geometry = WgpuGeometry;
    type Texture = WgpuTexture;

    fn compile_program(&mut self, kind: ProgramKind, sources: ShaderSources) -> Result<WgpuProgram> {
        pipeline::build_program(&self.context, &self.layouts, kind, sources)
    }

    fn create_geometry(&mut self, vertices: &[Vertex], indices: &[u32]) -> Result<WgpuGeometry> {
        let (geometry, error) = self.context.scoped(|device| WgpuGeometry {
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad indices"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
        });
        match error {
            Some(error) => Err(ViewportError::GpuResource(format!(
                "failed to create quad buffers: {error}"
            ))),
            None => Ok(geometry),
        }
    }

    fn create_texture(&mut self, image: &DecodedImage) -> Result<WgpuTexture> {
        texture::upload(
            &self.context,
            &self.layouts.texture_layout,
            &self.sampler,
            image,
        )
    }

    fn release_texture(&mut self, texture: WgpuTexture) {
        let (width, height) = texture.dimensions();
        debug!(width, height, "released image texture");
        drop(texture);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    fn draw(&mut self, frame: &Frame<'_, Self>) -> Result<()> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated; reconfiguring and skipping frame");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out acquiring surface texture; skipping frame");
                return Ok(());
            }
            Err(err) => return Err(ViewportError::Surface(err.to_string())),
        };

        let queue = &self.context.queue;
        let background = frame.background.program;
        queue.write_buffer(
            &background.uniform_buffer,
            0,
            bytemuck::bytes_of(&BackgroundParams::from(&frame.background.uniforms)),
        );
        if let Some(image) = &frame.image {
            queue.write_buffer(
                &image.program.uniform_buffer,
                0,
                bytemuck::bytes_of(&ImageParams::from(&image.uniforms)),
            );
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("viewport encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("viewport pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_vertex_buffer(0, frame.geometry.vertices.slice(..));
            pass.set_index_buffer(frame.geometry.indices.slice(..), wgpu::IndexFormat::Uint32);

            pass.set_pipeline(&background.pipeline);
            pass.set_bind_group(0, &background.uniform_bind_group, &[]);
            pass.draw_indexed(0..frame.index_count, 0, 0..1);

            // The texture pipeline carries the blend state; the background does not.
            if let Some(image) = &frame.image {
                pass.set_pipeline(&image.program.pipeline);
                pass.set_bind_group(0, &image.program.uniform_bind_group, &[]);
                pass.set_bind_group(1, &image.texture.bind_group, &[]);
                pass.draw_indexed(0..frame.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn diagnostics(&self) -> GpuDiagnostics {
        let info = &self.context.adapter_info;
        let api_version = if info.driver_info.is_empty() {
            format!("{:?}", info.backend)
        } else {
            format!("{:?} ({} {})", info.backend, info.driver, info.driver_info)
        };
        GpuDiagnostics {
            vendor: vendor_name(info.vendor),
            renderer: info.name.clone(),
            api_version,
            shader_version: SHADER_LANGUAGE.to_string(),
        }
    }
}

/// PCI (or Khronos) vendor id to a readable name.
fn vendor_name(id: u32) -> String {
    match id {
        0x1002 | 0x1022 => "AMD".to_string(),
        0x10DE => "NVIDIA".to_string(),
        0x8086 => "Intel".to_string(),
        0x13B5 => "ARM".to_string(),
        0x5143 => "Qualcomm".to_string(),
        0x106B => "Apple".to_string(),
        0x1010 => "Imagination".to_string(),
        0x10005 => "Mesa".to_string(),
        0 => "unknown".to_string(),
        other => format!("0x{other:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_ids_map_to_names() {
        assert_eq!(vendor_name(0x10DE), "NVIDIA");
        assert_eq!(vendor_name(0x1022), "AMD");
        assert_eq!(vendor_name(0xABCD), "0xABCD");
    }

    #[test]
    fn power_preference_parses() {
        assert_eq!("HIGH".parse::<PowerPreference>(), Ok(PowerPreference::High));
        assert_eq!(" low ".parse::<PowerPreference>(), Ok(PowerPreference::Low));
        assert!("turbo".parse::<PowerPreference>().is_err());
        assert_eq!(PowerPreference::default(), PowerPreference::Low);
    }
}
