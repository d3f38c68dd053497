//! Crate-level error types.

use std::fmt;

/// Errors produced by the slab-effector crate.
///
/// Per-frame operations never fail; these only arise while configuring an
/// effector or loading/saving options.
#[derive(Debug)]
pub enum EffectorError {
    /// Channel index outside the supported `1..=4` range.
    InvalidChannel(u8),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for EffectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel(channel) => {
                write!(f, "invalid effect channel {channel} (expected 1-4)")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for EffectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EffectorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
