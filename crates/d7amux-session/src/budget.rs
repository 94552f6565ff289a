use d7amux_engine::NlsMethod;

use crate::error::ConfigError;

/// Protocol maximum application payload without security.
pub const DEFAULT_MAX_PAYLOAD: usize = 239;

/// Usable payload sizes per security method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBudget {
    max_payload: usize,
}

impl PayloadBudget {
    /// Budget over a protocol maximum of `max_payload` bytes.
    ///
    /// Rejects a maximum that the largest security overhead would underflow.
    pub fn new(max_payload: usize) -> Result<Self, ConfigError> {
        let overhead = NlsMethod::max_overhead();
        if max_payload < overhead {
            return Err(ConfigError::PayloadBudgetTooSmall {
                max_payload,
                overhead,
            });
        }
        Ok(Self { max_payload })
    }

    /// Largest application payload when sending with `method`.
    pub fn max_payload(&self, method: NlsMethod) -> usize {
        self.max_payload - method.overhead()
    }

    /// Protocol maximum the budget was built from.
    pub fn protocol_max(&self) -> usize {
        self.max_payload
    }
}

impl Default for PayloadBudget {
    fn default() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}
