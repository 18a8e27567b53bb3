//! Tick registry configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`TickManager`](crate::TickManager).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Emit a `trace` event for every ticker visited by a sweep.
    ///
    /// Off by default so the steady-state sweep carries no logging cost.
    pub debug: bool,
}

impl TickConfig {
    /// Turn the per-ticker diagnostic events on or off.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quiet() {
        assert!(!TickConfig::default().debug);
    }

    #[test]
    fn test_missing_fields_fall_back_to_default() {
        let config: TickConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TickConfig::default());

        let config: TickConfig = serde_json::from_str(r#"{ "debug": true }"#).unwrap();
        assert!(config.debug);
    }
}
