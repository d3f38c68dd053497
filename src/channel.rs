//! Effect channels and the shader parameter names they map to.
//!
//! Up to four effectors can drive the same surfaces at once; each writes to
//! its own `_EffectVectorN` / `_EffectPointN` pair. The names are the
//! contract with the shader side and must not change.

use std::fmt;

use crate::error::EffectorError;

/// Prefix of the per-channel plane parameter (`_EffectVector1` ..).
pub const EFFECT_VECTOR_PREFIX: &str = "_EffectVector";
/// Prefix of the per-channel point parameter (`_EffectPoint1` ..).
pub const EFFECT_POINT_PREFIX: &str = "_EffectPoint";
/// Shared time parameter, written by every channel.
pub const LOCAL_TIME_NAME: &str = "_LocalTime";

/// Channel index in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(u8);

impl Channel {
    /// Lowest valid channel.
    pub const MIN: u8 = 1;
    /// Highest valid channel.
    pub const MAX: u8 = 4;
    /// Channel 1, the default.
    pub const FIRST: Self = Self(1);

    /// Validated constructor.
    pub fn new(index: u8) -> Result<Self, EffectorError> {
        if (Self::MIN..=Self::MAX).contains(&index) {
            Ok(Self(index))
        } else {
            Err(EffectorError::InvalidChannel(index))
        }
    }

    /// Clamp an arbitrary index into range (used for slider-style input).
    #[must_use]
    pub fn clamped(index: u8) -> Self {
        Self(index.clamp(Self::MIN, Self::MAX))
    }

    /// Raw index.
    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }

    /// `_EffectVector{N}`
    #[must_use]
    pub fn effect_vector_name(self) -> String {
        format!("{EFFECT_VECTOR_PREFIX}{}", self.0)
    }

    /// `_EffectPoint{N}`
    #[must_use]
    pub fn effect_point_name(self) -> String {
        format!("{EFFECT_POINT_PREFIX}{}", self.0)
    }

    /// All four channels in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Channel {
    type Error = EffectorError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
