//! Tool Registry - Semantic Tool Presets
//!
//! Closed enumeration: a new tool kind is one more variant and one more match arm.
//! The factory is total. Unknown kinds get the placeholder preset.

use serde::Serialize;
use serde_json::{json, Value};

use crate::ids::generate_id;
use crate::model::{Attributes, CanvasObject, ObjectType, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolKind {
    #[serde(rename = "tool.knife")]
    Knife,
    #[serde(rename = "tool.spatula")]
    Spatula,
    #[serde(rename = "tool.whisk")]
    Whisk,
    #[serde(rename = "board.cuttingBoard")]
    CuttingBoard,
    #[serde(rename = "pan.skillet")]
    Skillet,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Knife,
        ToolKind::Spatula,
        ToolKind::Whisk,
        ToolKind::CuttingBoard,
        ToolKind::Skillet,
    ];

    pub fn parse(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Knife => "tool.knife",
            ToolKind::Spatula => "tool.spatula",
            ToolKind::Whisk => "tool.whisk",
            ToolKind::CuttingBoard => "board.cuttingBoard",
            ToolKind::Skillet => "pan.skillet",
        }
    }

    pub fn preset(&self) -> ToolPreset {
        match self {
            ToolKind::Knife => ToolPreset::new("/assets/tools/knife.svg", 240.0, 40.0),
            ToolKind::Spatula => ToolPreset::new("/assets/tools/spatula.svg", 200.0, 60.0),
            ToolKind::Whisk => ToolPreset::new("/assets/tools/whisk.svg", 80.0, 220.0),
            ToolKind::CuttingBoard => {
                ToolPreset::new("/assets/boards/cutting-board.svg", 420.0, 280.0)
            }
            ToolKind::Skillet => ToolPreset::new("/assets/pans/skillet.svg", 320.0, 320.0),
        }
    }
}

/// Asset reference and default footprint for a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolPreset {
    pub asset: &'static str,
    pub width: f64,
    pub height: f64,
}

impl ToolPreset {
    const fn new(asset: &'static str, width: f64, height: f64) -> Self {
        Self { asset, width, height }
    }

    pub fn placeholder() -> Self {
        Self::new("/assets/tools/placeholder.svg", 100.0, 100.0)
    }

    fn style(&self) -> Attributes {
        let mut style = Attributes::new();
        style.insert("width".into(), json!(self.width));
        style.insert("height".into(), json!(self.height));
        style
    }
}

/// Materialize a `type: "tool"` object for a semantic tool kind.
///
/// `metadata.toolType` keeps the requested kind verbatim, even when it is unknown.
pub fn create_tool_object(tool_kind: &str, x: f64, y: f64) -> CanvasObject {
    let preset = ToolKind::parse(tool_kind)
        .map(|k| k.preset())
        .unwrap_or_else(ToolPreset::placeholder);

    let mut metadata = Attributes::new();
    metadata.insert("toolType".into(), Value::String(tool_kind.to_string()));

    CanvasObject {
        id: generate_id(tool_kind),
        kind: ObjectType::Tool,
        pose: Pose::at(x, y),
        content: Value::String(preset.asset.to_string()),
        style: preset.style(),
        metadata,
        locked: false,
    }
}

/// Every known tool kind with its preset, for pickers and the CLI.
pub fn catalog() -> Vec<(ToolKind, ToolPreset)> {
    ToolKind::ALL.into_iter().map(|k| (k, k.preset())).collect()
}
