use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::loader::LoadOptions;
use crate::processing::pipeline::RecomputeOptions;
use crate::processing::smoothing::{SmoothingMode, DEFAULT_TRAILING_WINDOW};
use crate::processing::statistics::EnergyAggregation;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "phasescope.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Whether the trend line is shown when a panel opens.
    pub enabled: bool,
    pub mode: SmoothingMode,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: SmoothingMode::default(),
        }
    }
}

impl SmoothingConfig {
    /// Trend line on, trailing rolling mean over the default window.
    pub fn trailing() -> Self {
        Self {
            enabled: true,
            mode: SmoothingMode::Trailing {
                window: DEFAULT_TRAILING_WINDOW,
            },
        }
    }
}

/// Engine feature switches. Filter state is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Show the calendar day picker on comparison panels.
    pub calendar: bool,
    pub smoothing: SmoothingConfig,
    /// Phase 4 energy replaces the phase 1-3 sum instead of adding to it.
    pub phase4_replaces_total: bool,
    /// Derive `voltagemoy4` as the rounded mean of phases 1-3 when a log has
    /// phase-4 current and power but no phase-4 voltage.
    pub derive_phase4_voltage: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calendar: true,
            smoothing: SmoothingConfig::default(),
            phase4_replaces_total: true,
            derive_phase4_voltage: false,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn energy_aggregation(&self) -> EnergyAggregation {
        if self.phase4_replaces_total {
            EnergyAggregation::AggregateReplaces
        } else {
            EnergyAggregation::SumAll
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            derive_phase4_voltage: self.derive_phase4_voltage,
        }
    }

    /// Options for one recompute, with the panel's own smoothing state.
    pub fn recompute_options(&self, smoothing: Option<SmoothingMode>) -> RecomputeOptions {
        RecomputeOptions {
            smoothing,
            energy: self.energy_aggregation(),
        }
    }
}
