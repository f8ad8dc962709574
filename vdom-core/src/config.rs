//! Mount Configuration
//!
//! Settings for a mounted component, loadable from JSON.
//!
//! ```rust,ignore
//! let config = MountConfig::from_json(r#"{ "forward_delay_ms": 16 }"#)?;
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Settings for a [`Mounted`](crate::component::Mounted) component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountConfig {
    /// Delay before a deferred re-render runs, unless the component's
    /// pre-mount hook overrides it.
    pub forward_delay_ms: u64,
}

impl MountConfig {
    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The default forward delay.
    pub fn forward_delay(&self) -> Duration {
        Duration::from_millis(self.forward_delay_ms)
    }
}
