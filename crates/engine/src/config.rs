//! Engine configuration.
//!
//! Configuration is written in TOML. Every key is optional:
//!
//! ```toml
//! # Minimum delay between queue drains.
//! tick_interval_ms = 1000
//!
//! # Prefix for the static type name the host sees for each channel view.
//! view_type_prefix = "LIGHTDESK_PT_"
//!
//! # Filter state for documents the engine has not seen before.
//! [filters]
//! area = true
//! point = true
//! spot = true
//! sun = false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::FilterState;
use crate::error::ConfigError;

/// Default delay between scheduler ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Default view type-name prefix.
pub const DEFAULT_VIEW_TYPE_PREFIX: &str = "LIGHTDESK_PT_";

/// Runtime configuration for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Minimum delay, in milliseconds, the host waits between queue drains.
	pub tick_interval_ms: u64,
	/// Prefix joined with the channel token to form each view's type name.
	pub view_type_prefix: String,
	/// Initial filter state for newly seen documents.
	pub filters: FilterState,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
			view_type_prefix: DEFAULT_VIEW_TYPE_PREFIX.to_string(),
			filters: FilterState::default(),
		}
	}
}

impl EngineConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses, and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Returns the tick interval as a [`Duration`].
	pub fn tick_interval(&self) -> Duration {
		Duration::from_millis(self.tick_interval_ms)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.tick_interval_ms == 0 {
			return Err(ConfigError::Invalid {
				field: "tick_interval_ms",
				reason: "must be greater than zero".to_string(),
			});
		}

		let prefix_ok = self
			.view_type_prefix
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
			&& self.view_type_prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
		if !prefix_ok {
			return Err(ConfigError::Invalid {
				field: "view_type_prefix",
				reason: format!("'{}' is not a valid identifier prefix", self.view_type_prefix),
			});
		}

		Ok(())
	}
}
