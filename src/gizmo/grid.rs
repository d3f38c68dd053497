use glam::Vec3;

/// Vertex of a debug line mesh. The normal mirrors the position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GizmoVertex {
    /// Local-space position.
    pub position: [f32; 3],
    /// Local-space normal.
    pub normal: [f32; 3],
}

impl GizmoVertex {
    fn at(p: Vec3) -> Self {
        Self {
            position: p.to_array(),
            normal: p.to_array(),
        }
    }
}

/// Indexed line list (every pair of indices is one segment).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMesh {
    /// Vertex data.
    pub vertices: Vec<GizmoVertex>,
    /// Line-list indices.
    pub indices: Vec<u32>,
}

impl LineMesh {
    /// Number of line segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }

    /// Vertex data as raw bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    fn push_segment(&mut self, a: Vec3, b: Vec3) {
        for p in [a, b] {
            self.indices.push(self.vertices.len() as u32);
            self.vertices.push(GizmoVertex::at(p));
        }
    }
}

/// Square grid on the local XY plane, centered at the origin.
///
/// Produces `columns + 1` lines parallel to Y and as many parallel to X,
/// spanning `[-extent, extent]` on both axes. `columns` of zero is treated
/// as one.
#[must_use]
pub fn build_grid(columns: u32, extent: f32) -> LineMesh {
    let columns = columns.max(1);
    let lines = columns as usize + 1;
    let mut mesh = LineMesh {
        vertices: Vec::with_capacity(lines * 4),
        indices: Vec::with_capacity(lines * 4),
    };

    for i in 0..=columns {
        let x = extent * (2.0 * i as f32 / columns as f32 - 1.0);
        mesh.push_segment(Vec3::new(x, -extent, 0.0), Vec3::new(x, extent, 0.0));
        mesh.push_segment(Vec3::new(-extent, x, 0.0), Vec3::new(extent, x, 0.0));
    }
    mesh
}
