//! Tunables for the movement core.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```
//! use stride::config::MovementConfig;
//!
//! let config = MovementConfig::from_json_str(r#"{ "max_segment_hops": 1 }"#).unwrap();
//! assert_eq!(config.max_segment_hops, 1);
//! assert_eq!(config.default_sequence, "Run_A");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration shared by every actor in a [`Field`](crate::field::Field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Sequence used when a command names none
    pub default_sequence: String,
    /// Name prefix that marks a sequence as walking-paced
    pub walk_prefix: String,
    /// Sequence played when an actor goes idle
    pub idle_sequence: String,
    /// Lookahead window for navigation segment queries, in seconds
    pub path_lookahead_secs: f32,
    /// Divisor turning the integer movement-speed stat into a multiplier
    pub speed_divisor: f32,
    /// Maximum navigation segments fetched in a single tick
    pub max_segment_hops: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            default_sequence: "Run_A".to_string(),
            walk_prefix: "Walk_".to_string(),
            idle_sequence: "Idle_A".to_string(),
            path_lookahead_secs: 0.15,
            speed_divisor: 100.0,
            max_segment_hops: 8,
        }
    }
}

impl MovementConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`from_json_str`](Self::from_json_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_divisor.is_finite() && self.speed_divisor > 0.0) {
            return Err(ConfigError::Invalid("speed_divisor must be positive"));
        }
        if !(self.path_lookahead_secs.is_finite() && self.path_lookahead_secs > 0.0) {
            return Err(ConfigError::Invalid("path_lookahead_secs must be positive"));
        }
        if self.max_segment_hops == 0 {
            return Err(ConfigError::Invalid("max_segment_hops must be at least 1"));
        }
        if self.default_sequence.is_empty() {
            return Err(ConfigError::Invalid("default_sequence must not be empty"));
        }
        Ok(())
    }

    /// Lookahead window as a [`Duration`]. Negative or non-finite windows
    /// are zero.
    #[must_use]
    pub fn path_lookahead(&self) -> Duration {
        Duration::try_from_secs_f32(self.path_lookahead_secs).unwrap_or(Duration::ZERO)
    }

    /// Returns `true` if `sequence` is walking-paced.
    #[must_use]
    pub fn is_walking_sequence(&self, sequence: &str) -> bool {
        sequence.starts_with(&self.walk_prefix)
    }
}
