//! World-space transforms and the shared/weak handles hosts use to expose
//! them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Mat4, Quat, Vec3};

/// Host-owned transform that other components may observe.
pub type SharedTransform = Rc<RefCell<Transform>>;

/// Non-owning reference to a [`SharedTransform`]. Dangles once the host drops
/// the node.
pub type TransformRef = Weak<RefCell<Transform>>;

/// World-space placement of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position.
    pub translation: Vec3,
    /// World orientation.
    pub rotation: Quat,
    /// Local scale.
    pub scale: Vec3,
}

impl Transform {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Identity transform moved to `translation`.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Replace the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Unit-length local +Z axis in world space. Scale does not affect it.
    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Scale, then rotate, then translate.
    #[must_use]
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }

    /// Wrap in a shared handle for the host scene graph.
    #[must_use]
    pub fn into_shared(self) -> SharedTransform {
        Rc::new(RefCell::new(self))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
