//! The single quad shared by the background and image passes.

use crate::types::Vertex;

/// Unit quad in clip space. UVs run bottom-up; the image program flips V when
/// sampling so row zero of the upload ends up at the top.
pub const QUAD_VERTICES: [Vertex; 4] = [
    // top right
    Vertex {
        position: [1.0, 1.0, 0.0],
        uv: [1.0, 1.0],
    },
    // bottom right
    Vertex {
        position: [1.0, -1.0, 0.0],
        uv: [1.0, 0.0],
    },
    // bottom left
    Vertex {
        position: [-1.0, -1.0, 0.0],
        uv: [0.0, 0.0],
    },
    // top left
    Vertex {
        position: [-1.0, 1.0, 0.0],
        uv: [0.0, 1.0],
    },
];

/// Two triangles over [`QUAD_VERTICES`].
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Byte stride of one [`Vertex`] in the vertex buffer.
pub const VERTEX_STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_five_packed_floats() {
        assert_eq!(VERTEX_STRIDE, 20);
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 80);
    }

    #[test]
    fn indices_reference_every_vertex() {
        for vertex in 0..QUAD_VERTICES.len() as u32 {
            assert!(QUAD_INDICES.contains(&vertex));
        }
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let first = &QUAD_INDICES[..3];
        let second = &QUAD_INDICES[3..];
        let shared: Vec<_> = first.iter().filter(|i| second.contains(i)).collect();
        assert_eq!(shared, vec![&1, &3]);
    }

    #[test]
    fn quad_spans_clip_space() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
    }
}
