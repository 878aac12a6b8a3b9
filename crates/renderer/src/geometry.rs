//! Quad meshes used as the heat map's drawing surface.

use bytemuck::{Pod, Zeroable};

/// Number of triangle indices a rectangle needs.
pub const RECTANGLE_INDEX_COUNT: usize = 6;

/// Fan over top-left, top-right, bottom-right, bottom-left.
const RECTANGLE_INDICES: [u32; RECTANGLE_INDEX_COUNT] = [0, 1, 2, 2, 3, 0];

/// A vertex type that can be uploaded as a single attribute at location 0.
pub trait MeshVertex: Pod {
    /// Floats per vertex; also the attribute's component count.
    const COMPONENTS: u32;

    fn attribute_format() -> wgpu::VertexFormat;
}

/// Position-only vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex2D {
    pub position: [f32; 2],
}

/// Position followed by texture coordinate, packed as one `vec4`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex4D {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl MeshVertex for Vertex2D {
    const COMPONENTS: u32 = 2;

    fn attribute_format() -> wgpu::VertexFormat {
        wgpu::VertexFormat::Float32x2
    }
}

impl MeshVertex for Vertex4D {
    const COMPONENTS: u32 = 4;

    fn attribute_format() -> wgpu::VertexFormat {
        wgpu::VertexFormat::Float32x4
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Mesh<V> {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Whole triangles only, every index inside the vertex list.
    pub fn is_well_formed(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&index| (index as usize) < self.vertices.len())
    }
}

fn rectangle_corners(width: f32, height: f32, center: [f32; 2]) -> [[f32; 2]; 4] {
    let (half_w, half_h) = (width * 0.5, height * 0.5);
    let [cx, cy] = center;
    [
        [cx - half_w, cy + half_h],
        [cx + half_w, cy + half_h],
        [cx + half_w, cy - half_h],
        [cx - half_w, cy - half_h],
    ]
}

/// Axis-aligned rectangle of `width × height` centred on `center`.
pub fn make_rectangle(width: f32, height: f32, center: [f32; 2]) -> Mesh<Vertex2D> {
    Mesh {
        vertices: rectangle_corners(width, height, center)
            .into_iter()
            .map(|position| Vertex2D { position })
            .collect(),
        indices: RECTANGLE_INDICES.to_vec(),
    }
}

/// Same rectangle with texture coordinates: `(0, 1)` top-left down to
/// `(1, 0)` bottom-right, so texel row 0 lands on the bottom edge.
pub fn make_textured_rectangle(width: f32, height: f32, center: [f32; 2]) -> Mesh<Vertex4D> {
    const TEX_COORDS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    Mesh {
        vertices: rectangle_corners(width, height, center)
            .into_iter()
            .zip(TEX_COORDS)
            .map(|(position, tex_coord)| Vertex4D {
                position,
                tex_coord,
            })
            .collect(),
        indices: RECTANGLE_INDICES.to_vec(),
    }
}

/// Full-viewport quad the renderer draws the field on.
pub fn fullscreen_quad() -> Mesh<Vertex4D> {
    make_textured_rectangle(2.0, 2.0, [0.0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_rectangle_matches_clip_space_corners() {
        let mesh = make_rectangle(2.0, 2.0, [0.0, 0.0]);
        let positions: Vec<[f32; 2]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[-1.0, 1.0], [1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]]
        );
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
        assert!(mesh.is_well_formed());
    }

    #[test]
    fn rectangle_respects_center_offset() {
        let mesh = make_rectangle(1.0, 0.5, [2.0, -1.0]);
        assert_eq!(mesh.vertices[0].position, [1.5, -0.75]);
        assert_eq!(mesh.vertices[2].position, [2.5, -1.25]);
    }

    #[test]
    fn textured_rectangle_maps_origin_to_bottom_left() {
        let mesh = fullscreen_quad();
        assert_eq!(mesh.vertices[0].tex_coord, [0.0, 1.0]);
        assert_eq!(mesh.vertices[2].tex_coord, [1.0, 0.0]);
        assert_eq!(mesh.vertices[3].position, [-1.0, -1.0]);
        assert_eq!(mesh.vertices[3].tex_coord, [0.0, 0.0]);
        assert_eq!(mesh.index_count(), RECTANGLE_INDEX_COUNT as u32);
    }

    #[test]
    fn both_triangles_share_one_winding() {
        let mesh = make_rectangle(2.0, 2.0, [0.0, 0.0]);
        for triangle in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[triangle[i] as usize].position);
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            // Clip space y points up: the fan runs clockwise there.
            assert!(cross < 0.0, "triangle {triangle:?}");
        }
    }

    #[test]
    fn vertex_layouts_match_component_counts() {
        assert_eq!(std::mem::size_of::<Vertex2D>(), 2 * 4);
        assert_eq!(std::mem::size_of::<Vertex4D>(), 4 * 4);
        assert_eq!(Vertex2D::attribute_format().size(), 8);
        assert_eq!(Vertex4D::attribute_format().size(), 16);
    }

    #[test]
    fn out_of_range_index_is_malformed() {
        let mut mesh = make_rectangle(1.0, 1.0, [0.0, 0.0]);
        mesh.indices[5] = 4;
        assert!(!mesh.is_well_formed());
    }
}
