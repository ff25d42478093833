//! Mesh representation for 3D models
//!
//! Pure CPU-side geometry: an indexed triangle list with per-vertex position,
//! normal and texture coordinate. Primitive builders cover the shapes the rig
//! and the visualization helpers need.

use bytemuck::{Pod, Zeroable};

/// 3D vertex data structure for rendering
///
/// `#[repr(C)]` and `Pod` so vertex arrays can be handed to any backend as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let a = self.vertices.get(tri[0] as usize)?;
            let b = self.vertices.get(tri[1] as usize)?;
            let c = self.vertices.get(tri[2] as usize)?;
            Some([a.position, b.position, c.position])
        })
    }

    /// Raw vertex bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Shift every vertex by `offset`
    pub fn translated(mut self, offset: [f32; 3]) -> Self {
        for vertex in &mut self.vertices {
            vertex.position[0] += offset[0];
            vertex.position[1] += offset[1];
            vertex.position[2] += offset[2];
        }
        self
    }

    /// Axis-aligned box centered at the origin with the given full extents
    ///
    /// Each face has its own four vertices so normals stay flat.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
            ([0.0, 0.0, -1.0], [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]]),
            ([1.0, 0.0, 0.0], [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]]),
            ([-1.0, 0.0, 0.0], [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]]),
            ([0.0, 1.0, 0.0], [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]]),
            ([0.0, -1.0, 0.0], [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]]),
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let first = vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(uvs) {
                vertices.push(Vertex::new(*corner, normal, uv));
            }
            indices.extend_from_slice(&[first, first + 1, first + 2, first + 2, first + 3, first]);
        }

        Self::new(vertices, indices)
    }

    /// Unit cube spanning ±1 on each axis
    pub fn cube() -> Self {
        Self::cuboid(2.0, 2.0, 2.0)
    }

    /// Square ground plane in XZ at y = 0, split into `divisions`² quads
    ///
    /// Subdivision keeps individual triangles small, which matters for
    /// near-plane clipping of a plane that passes under the camera.
    pub fn ground_plane(size: f32, divisions: u32) -> Self {
        let divisions = divisions.max(1);
        let step = size / divisions as f32;
        let half = size * 0.5;
        let row = divisions + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for j in 0..row {
            for i in 0..row {
                let u = i as f32 / divisions as f32;
                let v = j as f32 / divisions as f32;
                vertices.push(Vertex::new(
                    [-half + i as f32 * step, 0.0, -half + j as f32 * step],
                    [0.0, 1.0, 0.0],
                    [u, v],
                ));
            }
        }

        let mut indices = Vec::with_capacity((divisions * divisions * 6) as usize);
        for j in 0..divisions {
            for i in 0..divisions {
                let a = j * row + i;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Self::new(vertices, indices)
    }

    /// Closed pyramid visualizing a camera frustum
    ///
    /// Apex at the origin, base rectangle at `-depth` on Z spanning the field of
    /// view, matching a camera looking down its local -Z axis.
    pub fn frustum(fov_y: f32, aspect: f32, depth: f32) -> Self {
        let half_h = (fov_y * 0.5).tan() * depth;
        let half_w = half_h * aspect;

        let apex = [0.0, 0.0, 0.0];
        let corners = [
            [-half_w, -half_h, -depth],
            [half_w, -half_h, -depth],
            [half_w, half_h, -depth],
            [-half_w, half_h, -depth],
        ];

        let mut vertices = vec![Vertex::new(apex, [0.0, 0.0, 1.0], [0.5, 0.5])];
        for corner in corners {
            vertices.push(Vertex::new(corner, [0.0, 0.0, -1.0], [0.0, 0.0]));
        }

        let indices = vec![
            // Sides
            0, 1, 2,
            0, 2, 3,
            0, 3, 4,
            0, 4, 1,
            // Far cap
            1, 4, 3,
            3, 2, 1,
        ];

        Self::new(vertices, indices)
    }
}
