//! Gateway configuration.
//!
//! Every config type is validated once, when the gateway is built. A query never
//! sees a configuration error.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default complexity budget.
pub const DEFAULT_MAX_COMPLEXITY: u64 = 1000;
/// Default list multiplier.
pub const DEFAULT_LIST_MULTIPLIER: u64 = 10;
/// Default estimated size of a list field without a limit argument.
pub const DEFAULT_LIST_LIMIT: u64 = 100;
/// Default maximum selection depth.
pub const DEFAULT_MAX_DEPTH: usize = 10;
/// Default number of items returned when no limit is requested.
pub const DEFAULT_RESULT_LIMIT: usize = 100;
/// Default cap on the number of items returned.
pub const DEFAULT_MAX_RESULT_LIMIT: usize = 1000;
/// Default loader batch size.
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Default loader debounce window in milliseconds.
pub const DEFAULT_WAIT_MS: u64 = 1;

/// Budget for the complexity analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityConfig {
    /// Highest accepted score. A score equal to this is still accepted.
    pub max_complexity: u64,
    /// Nominal fan-out of a list field. Carried for compatibility with existing
    /// configuration files; scoring uses `default_list_limit`.
    pub list_multiplier: u64,
    /// Estimated size of a list field that has no usable limit argument.
    pub default_list_limit: u64,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            max_complexity: DEFAULT_MAX_COMPLEXITY,
            list_multiplier: DEFAULT_LIST_MULTIPLIER,
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ComplexityConfig {
    /// Create a config with the given budget and default list estimates.
    pub fn new(max_complexity: u64) -> Self {
        Self {
            max_complexity,
            ..Default::default()
        }
    }

    /// Set the list multiplier.
    pub fn with_list_multiplier(mut self, list_multiplier: u64) -> Self {
        self.list_multiplier = list_multiplier;
        self
    }

    /// Set the default list limit.
    pub fn with_default_list_limit(mut self, default_list_limit: u64) -> Self {
        self.default_list_limit = default_list_limit;
        self
    }

    /// Validate the budget and fill zero list estimates with their defaults.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.max_complexity == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_complexity",
            });
        }
        if self.list_multiplier == 0 {
            self.list_multiplier = DEFAULT_LIST_MULTIPLIER;
        }
        if self.default_list_limit == 0 {
            self.default_list_limit = DEFAULT_LIST_LIMIT;
        }
        Ok(())
    }
}

/// Result-size limits for list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Limit used when the request has none (or a negative one).
    pub default_limit: usize,
    /// Hard cap on any requested limit.
    pub max_limit: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_RESULT_LIMIT,
            max_limit: DEFAULT_MAX_RESULT_LIMIT,
        }
    }
}

impl LimitConfig {
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_limit == 0 {
            return Err(ConfigError::NonPositive { field: "max_limit" });
        }
        if self.default_limit > self.max_limit {
            return Err(ConfigError::DefaultAboveMax {
                default: self.default_limit,
                max: self.max_limit,
            });
        }
        if self.default_limit == 0 {
            return Err(ConfigError::NonPositive {
                field: "default_limit",
            });
        }
        Ok(())
    }

    /// Resolve a requested limit.
    ///
    /// Negative ⇒ the default, zero ⇒ zero, above the cap ⇒ the cap.
    pub fn apply(&self, requested: i64) -> usize {
        if requested < 0 {
            return self.default_limit;
        }
        if requested == 0 {
            return 0;
        }
        usize::try_from(requested)
            .unwrap_or(usize::MAX)
            .min(self.max_limit)
    }
}

/// Batching parameters for a [`crate::Loader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of keys that triggers an immediate dispatch.
    pub batch_size: usize,
    /// Debounce window in milliseconds.
    pub wait_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            wait_ms: DEFAULT_WAIT_MS,
        }
    }
}

impl LoaderConfig {
    pub fn new(batch_size: usize, wait: Duration) -> Self {
        Self {
            batch_size,
            wait_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Batch size, falling back to the default when zero.
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }

    /// Debounce window, falling back to the default when zero.
    pub fn effective_wait(&self) -> Duration {
        if self.wait_ms == 0 {
            Duration::from_millis(DEFAULT_WAIT_MS)
        } else {
            Duration::from_millis(self.wait_ms)
        }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub complexity: ComplexityConfig,
    pub max_depth: usize,
    pub limits: LimitConfig,
    pub loader: LoaderConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            complexity: ComplexityConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            limits: LimitConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Omitted fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Set the complexity budget.
    pub fn with_complexity(mut self, complexity: ComplexityConfig) -> Self {
        self.complexity = complexity;
        self
    }

    /// Set the maximum complexity score.
    pub fn with_max_complexity(mut self, max_complexity: u64) -> Self {
        self.complexity.max_complexity = max_complexity;
        self
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the result limits.
    pub fn with_limits(mut self, limits: LimitConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Set the loader parameters.
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// Validate every section, normalizing defaulted values in place.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.complexity.validate()?;
        if self.max_depth == 0 {
            return Err(ConfigError::NonPositive { field: "max_depth" });
        }
        self.limits.validate()?;
        Ok(())
    }
}
