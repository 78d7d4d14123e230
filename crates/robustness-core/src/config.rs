//! Aggregation settings.
//!
//! Settings are plain serde structs with defaults so they can be built in code,
//! loaded from a JSON file, or overridden from the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};

/// Which tail(s) the Student-t critical value covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tail {
    /// `level` of the mass lies between `-t` and `t`.
    #[default]
    TwoSided,
    /// `level` of the mass lies below `t`.
    OneSided,
}

impl std::fmt::Display for Tail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoSided => write!(f, "two-sided"),
            Self::OneSided => write!(f, "one-sided"),
        }
    }
}

/// Configuration for [`crate::aggregate::aggregate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Confidence level in the open interval (0, 1).
    pub confidence_level: f64,
    pub tail: Tail,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            tail: Tail::TwoSided,
        }
    }
}

impl AggregatorConfig {
    pub fn two_sided(confidence_level: f64) -> Self {
        Self {
            confidence_level,
            tail: Tail::TwoSided,
        }
    }

    pub fn one_sided(confidence_level: f64) -> Self {
        Self {
            confidence_level,
            tail: Tail::OneSided,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.confidence_level;
        if !level.is_finite() || level <= 0.0 || level >= 1.0 {
            return Err(IntervalError::validation(
                "confidence level",
                level,
                "a value in (0, 1)",
            ));
        }
        // Below 0.5 the one-sided critical value is negative and would pull
        // the endpoints inward.
        if self.tail == Tail::OneSided && level < 0.5 {
            return Err(IntervalError::validation(
                "confidence level",
                level,
                "a one-sided level in [0.5, 1)",
            ));
        }
        Ok(())
    }

    /// CDF quantile whose Student-t inverse is the critical value.
    pub fn quantile(&self) -> f64 {
        match self.tail {
            Tail::TwoSided => 1.0 - (1.0 - self.confidence_level) / 2.0,
            Tail::OneSided => self.confidence_level,
        }
    }
}

/// Load and validate an aggregator config from a JSON file.
pub fn load_config_from_path(path: &Path) -> std::io::Result<AggregatorConfig> {
    let raw = std::fs::read_to_string(path)?;
    let config = serde_json::from_str::<AggregatorConfig>(&raw).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse aggregator config JSON: {e}"),
        )
    })?;
    config
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    Ok(config)
}
