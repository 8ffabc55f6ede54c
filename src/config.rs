//! Engine Configuration
//!
//! Placement policy and history depth are configuration, not constants.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// Where objects may sit relative to the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundsPolicy {
    /// Only finite poses are required.
    Unbounded,
    /// The pose anchor must lie on the canvas.
    #[default]
    AnchorInside,
    /// The object's unrotated box must lie entirely on the canvas.
    BoxInside,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    #[serde(default)]
    pub policy: BoundsPolicy,
    /// Slack around the canvas, in scene units.
    #[serde(default)]
    pub margin: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            policy: BoundsPolicy::AnchorInside,
            margin: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum undo snapshots kept; `None` keeps everything.
    #[serde(default = "default_history_limit")]
    pub limit: Option<usize>,
}

fn default_history_limit() -> Option<usize> { Some(100) }

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: default_history_limit() }
    }
}
