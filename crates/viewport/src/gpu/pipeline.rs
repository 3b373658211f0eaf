use std::borrow::Cow;

use wgpu::naga::ShaderStage as NagaStage;

use crate::compile::{check_interface, check_stage, ShaderSources};
use crate::error::{Result, ShaderStage, ViewportError};
use crate::geometry::VERTEX_STRIDE;
use crate::programs::ProgramKind;

use super::uniforms::{BackgroundParams, ImageParams};

const BACKGROUND_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const IMAGE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Bind group layouts shared by every program and texture.
pub(crate) struct PipelineLayouts {
    /// Group 0: the program's own uniform block.
    pub uniform_layout: wgpu::BindGroupLayout,
    /// Group 1: image texture and its sampler.
    pub texture_layout: wgpu::BindGroupLayout,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            uniform_layout,
            texture_layout,
        }
    }
}

/// A linked program: pipeline plus its uniform buffer.
pub struct WgpuProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) uniform_bind_group: wgpu::BindGroup,
}

/// Validates both stages with naga, then builds the wgpu pipeline.
///
/// Every failure becomes [`ViewportError::ShaderCompile`] tagged with the
/// stage and carrying the compiler log.
pub(crate) fn build_program(
    context: &super::context::GpuContext,
    layouts: &PipelineLayouts,
    kind: ProgramKind,
    sources: ShaderSources,
) -> Result<WgpuProgram> {
    let compile_error = |stage: ShaderStage, log: String| ViewportError::ShaderCompile {
        kind,
        stage,
        log,
    };

    let vertex = check_stage(ShaderStage::Vertex, sources.vertex)
        .map_err(|log| compile_error(ShaderStage::Vertex, log))?;
    let fragment = check_stage(ShaderStage::Fragment, sources.fragment)
        .map_err(|log| compile_error(ShaderStage::Fragment, log))?;
    check_interface(&vertex, &fragment).map_err(|log| compile_error(ShaderStage::Link, log))?;

    let (program, error) = context.scoped(|device| {
        create_program(device, layouts, context.surface_format, kind, sources)
    });
    match error {
        Some(error) => Err(compile_error(ShaderStage::Link, error.to_string())),
        None => Ok(program),
    }
}

fn create_program(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
    kind: ProgramKind,
    sources: ShaderSources,
) -> WgpuProgram {
    let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{kind} vertex")),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(sources.vertex),
            stage: NagaStage::Vertex,
            defines: &[],
        },
    });
    let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{kind} fragment")),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(sources.fragment),
            stage: NagaStage::Fragment,
            defines: &[],
        },
    });

    let (uniform_size, attributes, blend): (usize, &[wgpu::VertexAttribute], _) = match kind {
        ProgramKind::Background => (
            std::mem::size_of::<BackgroundParams>(),
            &BACKGROUND_ATTRIBUTES,
            None,
        ),
        ProgramKind::Texture => (
            std::mem::size_of::<ImageParams>(),
            &IMAGE_ATTRIBUTES,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        ),
    };

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{kind} uniforms")),
        size: uniform_size as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{kind} uniform bind group")),
        layout: &layouts.uniform_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    let bind_group_layouts: &[&wgpu::BindGroupLayout] = match kind {
        ProgramKind::Background => &[&layouts.uniform_layout],
        ProgramKind::Texture => &[&layouts.uniform_layout, &layouts.texture_layout],
    };
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{kind} pipeline layout")),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{kind} pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: VERTEX_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });

    WgpuProgram {
        pipeline,
        uniform_buffer,
        uniform_bind_group,
    }
}
