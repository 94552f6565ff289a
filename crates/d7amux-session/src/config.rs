use d7amux_engine::SessionConfig;

use crate::budget::DEFAULT_MAX_PAYLOAD;

/// Controls session stack behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Protocol maximum payload before security overhead.
    pub max_payload_size: usize,
    /// Session used when a send passes no config. The access class is
    /// replaced by the stored active access class at send time.
    pub default_session: SessionConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            default_session: SessionConfig::default(),
        }
    }
}
