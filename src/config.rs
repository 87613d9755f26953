use serde::{Deserialize, Serialize};

use crate::error::ConverseError;

/// Default capacity of the signal registry
pub const DEFAULT_MAX_SIGNALS: usize = 1000;

/// Configuration for a [`Converse`](crate::Converse) instance.
///
/// The single tunable is `max_signals`, the capacity of the signal registry.
/// Once the registry is full, inserting a new key evicts the oldest entry
/// (see [`SignalRegistry`](crate::SignalRegistry)).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverseConfig {
    pub max_signals: usize,
}

impl Default for ConverseConfig {
    fn default() -> Self { Self { max_signals: DEFAULT_MAX_SIGNALS } }
}

impl ConverseConfig {
    pub fn new(max_signals: usize) -> Self { Self { max_signals } }

    /// A registry that cannot hold a single signal is unusable
    pub fn validate(&self) -> Result<(), ConverseError> {
        if self.max_signals < 1 {
            return Err(ConverseError::InvalidConfiguration { max_signals: self.max_signals });
        }
        Ok(())
    }
}
