//! Per-renderer shader parameter overrides.
//!
//! An [`OverrideBlock`] is a named bag of values layered on top of a
//! surface's shared material, so several effectors can tweak the same
//! material without duplicating it. Surfaces expose their block through
//! [`OverrideTarget`] as a read-modify-write pair.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec4;
use rustc_hash::FxHashMap;

/// A single shader parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShaderValue {
    /// Scalar uniform.
    Float(f32),
    /// Four-component vector uniform.
    Vector(Vec4),
}

/// Named shader parameter overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideBlock {
    values: FxHashMap<String, ShaderValue>,
}

impl OverrideBlock {
    /// Empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar, reusing the existing key allocation when present.
    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set(name, ShaderValue::Float(value));
    }

    /// Set a vector, reusing the existing key allocation when present.
    pub fn set_vector(&mut self, name: &str, value: Vec4) {
        self.set(name, ShaderValue::Vector(value));
    }

    fn set(&mut self, name: &str, value: ShaderValue) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        } else {
            let _ = self.values.insert(name.to_owned(), value);
        }
    }

    /// Raw value lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ShaderValue> {
        self.values.get(name).copied()
    }

    /// Scalar lookup; `None` if absent or not a scalar.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ShaderValue::Float(v) => Some(v),
            ShaderValue::Vector(_) => None,
        }
    }

    /// Vector lookup; `None` if absent or not a vector.
    #[must_use]
    pub fn vector(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            ShaderValue::Vector(v) => Some(v),
            ShaderValue::Float(_) => None,
        }
    }

    /// Remove every override, keeping the allocation.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Replace the contents with those of `other`. Keys already present are
    /// updated in place, so copying between blocks with the same names does
    /// not allocate.
    pub fn copy_from(&mut self, other: &Self) {
        self.values.retain(|k, _| other.values.contains_key(k));
        for (name, value) in &other.values {
            self.set(name, *value);
        }
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// A renderable surface whose overrides can be read and replaced.
pub trait OverrideTarget {
    /// Copy this surface's current overrides into `block`, replacing its
    /// previous contents.
    fn read_overrides(&self, block: &mut OverrideBlock);

    /// Replace this surface's overrides with `block`.
    fn write_overrides(&mut self, block: &OverrideBlock);
}

/// Host-owned surface shared between every effector that links it.
pub type SharedTarget = Rc<RefCell<dyn OverrideTarget>>;

/// In-memory surface that just stores its overrides.
#[derive(Debug, Default)]
pub struct SurfaceOverrides {
    block: OverrideBlock,
    writes: usize,
}

impl SurfaceOverrides {
    /// Surface with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overrides.
    #[must_use]
    pub fn block(&self) -> &OverrideBlock {
        &self.block
    }

    /// How many times [`OverrideTarget::write_overrides`] has been called.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Wrap in a shared handle so it can be linked to effectors.
    #[must_use]
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

impl OverrideTarget for SurfaceOverrides {
    fn read_overrides(&self, block: &mut OverrideBlock) {
        block.copy_from(&self.block);
    }

    fn write_overrides(&mut self, block: &OverrideBlock) {
        self.block.copy_from(block);
        self.writes += 1;
    }
}
