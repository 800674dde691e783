//! Analyzer configuration

use serde::{Deserialize, Serialize};
use sqlscope_diagnostics::{AnalysisError, Result};
use std::path::Path;

/// Default ceiling for nested analysis calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Default session time zone
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Settings for one analysis tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum nesting of analysis calls before failing with a recursion error
    pub max_call_depth: usize,
    /// Session time zone used by time-dependent analysis
    pub timezone: String,
    /// The query is an EXPLAIN request
    pub explain: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            timezone: DEFAULT_TIMEZONE.to_string(),
            explain: false,
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AnalysisError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_call_depth == 0 {
            return Err(AnalysisError::config("max_call_depth must be at least 1"));
        }
        if self.timezone.trim().is_empty() {
            return Err(AnalysisError::config("timezone must not be empty"));
        }
        Ok(())
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }
}
