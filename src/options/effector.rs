use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::EffectorError;

/// Per-instance effector configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effector", inline)]
#[serde(default)]
pub struct EffectorOptions {
    /// Shader channel written by this instance (1-4).
    #[schemars(title = "Channel", range(min = 1, max = 4))]
    pub channel: u8,
    /// Distance of the effect plane along the forward axis.
    #[schemars(title = "Offset", extend("step" = 0.01))]
    pub offset: f32,
}

impl EffectorOptions {
    /// Validated channel.
    pub fn channel(&self) -> Result<Channel, EffectorError> {
        Channel::new(self.channel)
    }
}

impl Default for EffectorOptions {
    fn default() -> Self {
        Self {
            channel: Channel::FIRST.index(),
            offset: 0.0,
        }
    }
}
