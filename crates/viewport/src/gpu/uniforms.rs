use bytemuck::{Pod, Zeroable};

use crate::backend::{BackgroundUniforms, ImageUniforms};

/// std140 mirror of `BackgroundParams` in `background.frag`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct BackgroundParams {
    pub color1: [f32; 4],
    pub color2: [f32; 4],
    /// `(0, viewport height, 0, 0)`.
    pub height: [f32; 4],
}

impl From<&BackgroundUniforms> for BackgroundParams {
    fn from(uniforms: &BackgroundUniforms) -> Self {
        Self {
            color1: uniforms.color1.to_array(),
            color2: uniforms.color2.to_array(),
            height: [0.0, uniforms.height, 0.0, 0.0],
        }
    }
}

/// std140 mirror of `ImageParams` shared by `image.vert` and `image.frag`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct ImageParams {
    pub channels: [[f32; 4]; 4],
    pub scale: [f32; 2],
    pub _padding: [f32; 2],
}

impl From<&ImageUniforms> for ImageParams {
    fn from(uniforms: &ImageUniforms) -> Self {
        Self {
            channels: uniforms.channels.to_gpu(),
            scale: uniforms.scale.to_array(),
            _padding: [0.0; 2],
        }
    }
}
