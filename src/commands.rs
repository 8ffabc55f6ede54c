//! Commands - the wire contract for every mutation
//!
//! UI and AI collaborators both produce these; the engine only checks structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::model::{Attributes, CanvasObject, ObjectPatch, Zone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    AddObject {
        object: CanvasObject,
    },
    AddTool {
        #[serde(rename = "toolType")]
        tool_type: String,
        x: f64,
        y: f64,
    },
    AddText {
        content: String,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<Attributes>,
    },
    AddImage {
        url: String,
        x: f64,
        y: f64,
    },
    UpdateObject {
        id: String,
        patch: ObjectPatch,
    },
    MoveObject {
        id: String,
        dx: f64,
        dy: f64,
    },
    SetPose {
        id: String,
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r: Option<f64>,
        #[serde(rename = "scaleX", default, skip_serializing_if = "Option::is_none")]
        scale_x: Option<f64>,
        #[serde(rename = "scaleY", default, skip_serializing_if = "Option::is_none")]
        scale_y: Option<f64>,
    },
    DeleteEntity {
        id: String,
    },
    AddZone {
        zone: Zone,
    },
    ReorderObjects {
        #[serde(rename = "newOrder")]
        new_order: Vec<String>,
    },
}

impl Command {
    /// Human-readable label for logs and tooltips.
    pub fn description(&self) -> String {
        match self {
            Command::AddObject { object } => format!("Add {} object {}", object.kind.as_str(), object.id),
            Command::AddTool { tool_type, .. } => format!("Add tool {tool_type}"),
            Command::AddText { content, .. } => format!("Add text \"{content}\""),
            Command::AddImage { url, .. } => format!("Add image {url}"),
            Command::UpdateObject { id, .. } => format!("Update {id}"),
            Command::MoveObject { id, dx, dy } => format!("Move {id} by ({dx}, {dy})"),
            Command::SetPose { id, .. } => format!("Set pose of {id}"),
            Command::DeleteEntity { id } => format!("Delete {id}"),
            Command::AddZone { zone } => format!("Add {} zone {}", zone.kind.as_str(), zone.id),
            Command::ReorderObjects { new_order } => {
                format!("Reorder {} objects", new_order.len())
            }
        }
    }
}

/// One or more commands submitted together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBatch(pub Vec<Command>);

impl CommandBatch {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Command> for CommandBatch {
    fn from(command: Command) -> Self {
        Self(vec![command])
    }
}

impl From<Vec<Command>> for CommandBatch {
    fn from(commands: Vec<Command>) -> Self {
        Self(commands)
    }
}

impl<const N: usize> From<[Command; N]> for CommandBatch {
    fn from(commands: [Command; N]) -> Self {
        Self(commands.into())
    }
}

/// Parse a single command object or an array of them.
pub fn parse_commands(json: &str) -> Result<CommandBatch, SchemaError> {
    let value: Value = serde_json::from_str(json)?;
    let commands = match value {
        Value::Array(_) => serde_json::from_value::<Vec<Command>>(value)?,
        other => vec![serde_json::from_value::<Command>(other)?],
    };
    Ok(CommandBatch(commands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_tags() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "SET_POSE", "id": "a", "x": 1, "y": 2, "scaleX": -1
        }))
        .unwrap();
        assert_eq!(
            cmd,
            Command::SetPose {
                id: "a".into(),
                x: 1.0,
                y: 2.0,
                r: None,
                scale_x: Some(-1.0),
                scale_y: None
            }
        );

        let value = serde_json::to_value(Command::ReorderObjects { new_order: vec!["b".into()] }).unwrap();
        assert_eq!(value, json!({"type": "REORDER_OBJECTS", "newOrder": ["b"]}));
    }

    #[test]
    fn test_add_tool_field_name() {
        let cmd: Command =
            serde_json::from_str(r#"{"type": "ADD_TOOL", "toolType": "tool.knife", "x": 0, "y": 0}"#).unwrap();
        assert!(matches!(cmd, Command::AddTool { ref tool_type, .. } if tool_type == "tool.knife"));
    }

    #[test]
    fn test_parse_single_and_array() {
        let one = parse_commands(r#"{"type": "DELETE_ENTITY", "id": "a"}"#).unwrap();
        assert_eq!(one.len(), 1);

        let many = parse_commands(
            r#"[{"type": "DELETE_ENTITY", "id": "a"}, {"type": "MOVE_OBJECT", "id": "b", "dx": 1, "dy": 2}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        assert!(parse_commands(r#"{"type": "EXPLODE", "id": "a"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(parse_commands(r#"{"type": "MOVE_OBJECT", "id": "a", "dx": 1}"#).is_err());
    }

    #[test]
    fn test_description_uses_wire_kind_names() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "ADD_OBJECT",
            "object": {"id": "a", "type": "shape", "pose": {"x": 0, "y": 0}, "content": "rect", "style": {}}
        }))
        .unwrap();
        assert_eq!(cmd.description(), "Add shape object a");

        let cmd: Command = serde_json::from_value(json!({
            "type": "ADD_ZONE",
            "zone": {"id": "z", "type": "target", "points": [0, 0, 1, 0, 1, 1]}
        }))
        .unwrap();
        assert_eq!(cmd.description(), "Add target zone z");
    }

    #[test]
    fn test_batch_from_single() {
        let batch: CommandBatch = Command::DeleteEntity { id: "a".into() }.into();
        assert_eq!(batch.len(), 1);
    }
}
