//! Effect plane and effect point math.
//!
//! The shader receives the slab as a plane `(n, d)` where `n` is the
//! effector's forward axis divided by its z scale and `d` is the distance of
//! the effector along `n` plus a user offset. Geometry on the far side of the
//! plane is treated as "voxelized".

use glam::{Vec3, Vec4};

use crate::transform::Transform;

/// Plane descriptor `(nx, ny, nz, d)` for `transform` shifted by `offset`.
///
/// Only the z scale participates, so the normal is unit length for unit z
/// scale and shortened/lengthened otherwise. Non-uniform scale on x/y is
/// ignored.
#[must_use]
pub fn effect_vector(transform: &Transform, offset: f32) -> Vec4 {
    let fwd = transform.forward() / transform.scale.z;
    let dist = fwd.dot(transform.translation);
    fwd.extend(dist + offset)
}

/// Target position as a homogeneous vector with `w = 0`, or zero when no
/// target is present.
#[must_use]
pub fn effect_point(target: Option<&Transform>) -> Vec4 {
    target.map_or(Vec4::ZERO, |t| t.translation.extend(0.0))
}

/// Everything one tick pushes to the linked surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectFrame {
    /// Plane descriptor.
    pub vector: Vec4,
    /// Target point (`w = 0`).
    pub point: Vec4,
    /// Resolved local time in seconds.
    pub time: f32,
}

impl EffectFrame {
    /// Plane normal part of [`Self::vector`].
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.vector.truncate()
    }

    /// Signed distance of `p` from the effect plane, as the shader sees it.
    #[must_use]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal().dot(p) - self.vector.w
    }

    /// GPU layout for hosts that bind a uniform buffer instead of named
    /// overrides.
    #[must_use]
    pub fn uniform(&self) -> EffectUniform {
        EffectUniform {
            effect_vector: self.vector.to_array(),
            effect_point: self.point.to_array(),
            local_time: self.time,
            _pad: [0.0; 3],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform holding one channel's effect parameters.
pub struct EffectUniform {
    /// Plane descriptor.
    pub effect_vector: [f32; 4],
    /// Target point.
    pub effect_point: [f32; 4],
    /// Local time in seconds.
    pub local_time: f32,
    /// Padding for GPU alignment.
    pub(crate) _pad: [f32; 3],
}

impl Default for EffectUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}
