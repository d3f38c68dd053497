use glam::Vec4;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Editor gizmo appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Gizmo", inline)]
#[serde(default)]
pub struct GizmoOptions {
    /// Grid subdivisions per axis.
    #[schemars(title = "Grid Columns", range(min = 1, max = 64))]
    pub grid_columns: u32,
    /// Half-size of the grid square.
    #[schemars(skip)]
    pub grid_extent: f32,
    /// RGBA of the two plane grids.
    #[schemars(skip)]
    pub plane_color: [f32; 4],
    /// RGBA of the box joining the planes.
    #[schemars(skip)]
    pub slab_color: [f32; 4],
    /// Cross-section of the box joining the planes.
    #[schemars(title = "Slab Thickness", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub slab_thickness: f32,
    /// RGBA of the target marker.
    #[schemars(skip)]
    pub target_color: [f32; 4],
    /// Radius of the target marker.
    #[schemars(title = "Target Radius", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub target_radius: f32,
}

impl GizmoOptions {
    /// Plane grid color.
    #[must_use]
    pub fn plane_color(&self) -> Vec4 {
        Vec4::from_array(self.plane_color)
    }

    /// Slab box color.
    #[must_use]
    pub fn slab_color(&self) -> Vec4 {
        Vec4::from_array(self.slab_color)
    }

    /// Target marker color.
    #[must_use]
    pub fn target_color(&self) -> Vec4 {
        Vec4::from_array(self.target_color)
    }
}

impl Default for GizmoOptions {
    fn default() -> Self {
        Self {
            grid_columns: 10,
            grid_extent: 0.5,
            plane_color: [1.0, 1.0, 0.0, 0.5],
            slab_color: [1.0, 0.0, 0.0, 0.5],
            slab_thickness: 0.02,
            target_color: [0.0, 1.0, 1.0, 1.0],
            target_radius: 0.1,
        }
    }
}
