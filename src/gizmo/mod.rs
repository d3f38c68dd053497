//! Editor debug visualization of the effect slab.
//!
//! The host supplies a [`MeshStore`] that owns GPU meshes and a
//! [`GizmoPainter`] that issues immediate-mode wire draws. The grid mesh is
//! created on first draw and held by a [`GridMeshCache`] until teardown.

mod grid;

use glam::{Mat4, Vec3, Vec4};
pub use grid::{build_grid, GizmoVertex, LineMesh};

/// Host handle for a mesh created through a [`MeshStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// How the host should free a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// Free at the end of the frame (a playback session is active).
    Deferred,
    /// Free right away (editing, no session).
    Immediate,
}

/// Whether the host is currently in a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostSession {
    /// Playing.
    Active,
    /// Editing.
    #[default]
    Inactive,
}

impl HostSession {
    /// Release mode appropriate for this session state.
    #[must_use]
    pub fn release_mode(self) -> ReleaseMode {
        match self {
            Self::Active => ReleaseMode::Deferred,
            Self::Inactive => ReleaseMode::Immediate,
        }
    }
}

/// Host-side mesh storage.
pub trait MeshStore {
    /// Upload a line mesh and return its handle.
    fn create_line_mesh(&mut self, mesh: &LineMesh) -> MeshId;

    /// Free a mesh previously returned by
    /// [`create_line_mesh`](Self::create_line_mesh).
    fn release_mesh(&mut self, id: MeshId, mode: ReleaseMode);
}

/// Immediate-mode wireframe drawing.
pub trait GizmoPainter {
    /// Draw `mesh` as wireframe, translated by `offset` in the space of
    /// `matrix`.
    fn draw_wire_mesh(
        &mut self,
        mesh: MeshId,
        matrix: Mat4,
        offset: Vec3,
        color: Vec4,
    );

    /// Draw an axis-aligned wire box in the space of `matrix`.
    fn draw_wire_cube(
        &mut self,
        matrix: Mat4,
        center: Vec3,
        size: Vec3,
        color: Vec4,
    );

    /// Draw a wire sphere in world space.
    fn draw_wire_sphere(&mut self, center: Vec3, radius: f32, color: Vec4);
}

/// One recorded draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GizmoCommand {
    /// See [`GizmoPainter::draw_wire_mesh`].
    WireMesh {
        /// Mesh handle.
        mesh: MeshId,
        /// Local-to-world matrix.
        matrix: Mat4,
        /// Local offset.
        offset: Vec3,
        /// RGBA color.
        color: Vec4,
    },
    /// See [`GizmoPainter::draw_wire_cube`].
    WireCube {
        /// Local-to-world matrix.
        matrix: Mat4,
        /// Local center.
        center: Vec3,
        /// Local size.
        size: Vec3,
        /// RGBA color.
        color: Vec4,
    },
    /// See [`GizmoPainter::draw_wire_sphere`].
    WireSphere {
        /// World center.
        center: Vec3,
        /// Radius.
        radius: f32,
        /// RGBA color.
        color: Vec4,
    },
}

/// Painter that records commands for a later batched replay.
#[derive(Debug, Clone, Default)]
pub struct GizmoRecorder {
    /// Commands in draw order.
    pub commands: Vec<GizmoCommand>,
}

impl GizmoPainter for GizmoRecorder {
    fn draw_wire_mesh(
        &mut self,
        mesh: MeshId,
        matrix: Mat4,
        offset: Vec3,
        color: Vec4,
    ) {
        self.commands.push(GizmoCommand::WireMesh {
            mesh,
            matrix,
            offset,
            color,
        });
    }

    fn draw_wire_cube(
        &mut self,
        matrix: Mat4,
        center: Vec3,
        size: Vec3,
        color: Vec4,
    ) {
        self.commands.push(GizmoCommand::WireCube {
            matrix,
            center,
            size,
            color,
        });
    }

    fn draw_wire_sphere(&mut self, center: Vec3, radius: f32, color: Vec4) {
        self.commands.push(GizmoCommand::WireSphere {
            center,
            radius,
            color,
        });
    }
}

/// Lazily created grid mesh, released exactly once.
#[derive(Debug, Default)]
pub struct GridMeshCache {
    handle: Option<MeshId>,
}

impl GridMeshCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the cached mesh, if created.
    #[must_use]
    pub fn handle(&self) -> Option<MeshId> {
        self.handle
    }

    /// Return the cached mesh, building and uploading it on first use.
    pub fn get_or_create(
        &mut self,
        store: &mut dyn MeshStore,
        columns: u32,
        extent: f32,
    ) -> MeshId {
        if let Some(id) = self.handle {
            return id;
        }
        let mesh = build_grid(columns, extent);
        let id = store.create_line_mesh(&mesh);
        log::debug!(
            "created gizmo grid mesh {id:?} ({} segments)",
            mesh.segment_count()
        );
        self.handle = Some(id);
        id
    }

    /// Free the cached mesh. Returns `false` when there was nothing to free.
    pub fn release(
        &mut self,
        store: &mut dyn MeshStore,
        session: HostSession,
    ) -> bool {
        let Some(id) = self.handle.take() else {
            return false;
        };
        let mode = session.release_mode();
        log::debug!("releasing gizmo grid mesh {id:?} ({mode:?})");
        store.release_mesh(id, mode);
        true
    }
}
