//! Document Model - Pure Data
//!
//! `Scene.objects` order IS paint order: index 0 renders behind index N.
//! Ids are unique across objects AND zones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::SchemaError;

/// Free-form string-keyed attributes (style, metadata).
pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Unbounded, never normalized.
    #[serde(default)]
    pub rotation_degrees: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
}

fn default_scale() -> f64 { 1.0 }

impl Pose {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            rotation_degrees: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.rotation_degrees, self.scale_x, self.scale_y]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Text,
    Image,
    Shape,
    Tool,
    Sticker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub pose: Pose,
    /// String for text / image URL / shape kind, opaque otherwise.
    pub content: Value,
    pub style: Attributes,
    #[serde(default)]
    pub metadata: Attributes,
    #[serde(default)]
    pub locked: bool,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Text => "text",
            ObjectType::Image => "image",
            ObjectType::Shape => "shape",
            ObjectType::Tool => "tool",
            ObjectType::Sticker => "sticker",
        }
    }
}

impl CanvasObject {
    /// Numeric style attribute, if present.
    pub fn style_number(&self, key: &str) -> Option<f64> {
        self.style.get(key).and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Safe,
    Danger,
    Target,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Safe => "safe",
            ZoneType::Danger => "danger",
            ZoneType::Target => "target",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ZoneType,
    /// Flat x0, y0, x1, y1, ... polygon, implicitly closed.
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_url: Option<String>,
    pub objects: Vec<CanvasObject>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background_url: None,
            objects: vec![],
            zones: vec![],
        }
    }

    /// Parse and schema-validate an externally supplied scene.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate_schema()?;
        Ok(scene)
    }

    /// Checks what serde cannot: finite numbers, usable dimensions, id uniqueness.
    pub fn validate_schema(&self) -> Result<(), SchemaError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(SchemaError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let mut seen = HashSet::new();
        for object in &self.objects {
            check_id(&object.id, &mut seen)?;
            if !object.pose.is_finite() {
                return Err(SchemaError::NonFinite {
                    field: format!("objects[{}].pose", object.id),
                });
            }
        }
        for zone in &self.zones {
            check_id(&zone.id, &mut seen)?;
            if zone.points.iter().any(|p| !p.is_finite()) {
                return Err(SchemaError::NonFinite {
                    field: format!("zones[{}].points", zone.id),
                });
            }
        }
        Ok(())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o.id == id) || self.zones.iter().any(|z| z.id == id)
    }

    pub fn object(&self, id: &str) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Object ids in paint order.
    pub fn object_ids(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.id.as_str()).collect()
    }
}

fn check_id<'a>(id: &'a str, seen: &mut HashSet<&'a str>) -> Result<(), SchemaError> {
    if id.is_empty() {
        return Err(SchemaError::EmptyId);
    }
    if !seen.insert(id) {
        return Err(SchemaError::DuplicateId(id.to_string()));
    }
    Ok(())
}

/// Partial pose, merged one level deep by `UPDATE_OBJECT`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PosePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
}

impl PosePatch {
    pub fn apply_to(&self, pose: &mut Pose) {
        if let Some(x) = self.x {
            pose.x = x;
        }
        if let Some(y) = self.y {
            pose.y = y;
        }
        if let Some(r) = self.rotation_degrees {
            pose.rotation_degrees = r;
        }
        if let Some(sx) = self.scale_x {
            pose.scale_x = sx;
        }
        if let Some(sy) = self.scale_y {
            pose.scale_y = sy;
        }
    }
}

/// Shallow patch for `UPDATE_OBJECT`. Ids are immutable, so `id` is not a field
/// and unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<PosePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl ObjectPatch {
    /// Whether applying this patch can change where the object sits.
    pub fn affects_placement(&self) -> bool {
        self.pose.is_some() || self.style.is_some()
    }

    pub fn apply_to(&self, object: &mut CanvasObject) {
        if let Some(kind) = self.kind {
            object.kind = kind;
        }
        if let Some(pose) = &self.pose {
            pose.apply_to(&mut object.pose);
        }
        if let Some(content) = &self.content {
            object.content = content.clone();
        }
        if let Some(style) = &self.style {
            object.style = style.clone();
        }
        if let Some(metadata) = &self.metadata {
            object.metadata = metadata.clone();
        }
        if let Some(locked) = self.locked {
            object.locked = locked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pose_defaults() {
        let pose: Pose = serde_json::from_value(json!({"x": 3, "y": 4})).unwrap();
        assert_eq!(pose, Pose::at(3.0, 4.0));
    }

    #[test]
    fn test_object_defaults() {
        let object: CanvasObject = serde_json::from_value(json!({
            "id": "a",
            "type": "shape",
            "pose": {"x": 0, "y": 0},
            "content": "rect",
            "style": {"fill": "#fff"}
        }))
        .unwrap();
        assert!(object.metadata.is_empty());
        assert!(!object.locked);
        assert_eq!(object.kind, ObjectType::Shape);
    }

    #[test]
    fn test_scene_rejects_missing_fields() {
        let err = Scene::from_json(r#"{"width": 100, "objects": []}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn test_scene_rejects_unknown_object_type() {
        let json = r#"{"width": 100, "height": 100, "objects": [
            {"id": "a", "type": "video", "pose": {"x": 0, "y": 0}, "content": "", "style": {}}
        ]}"#;
        assert!(Scene::from_json(json).is_err());
    }

    #[test]
    fn test_scene_rejects_shared_id_between_object_and_zone() {
        let json = r#"{"width": 100, "height": 100,
            "objects": [{"id": "a", "type": "text", "pose": {"x": 0, "y": 0}, "content": "hi", "style": {}}],
            "zones": [{"id": "a", "type": "safe", "points": [0,0,10,0,10,10]}]}"#;
        let err = Scene::from_json(json).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_scene_rejects_bad_dimensions() {
        let err = Scene::from_json(r#"{"width": 0, "height": 100, "objects": []}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_scene_wire_format_round_trip() {
        let json = r#"{"width": 1080, "height": 1080, "backgroundUrl": "bg.png", "objects": [], "zones": []}"#;
        let scene = Scene::from_json(json).unwrap();
        assert_eq!(scene.background_url.as_deref(), Some("bg.png"));
        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["backgroundUrl"], "bg.png");
    }

    #[test]
    fn test_object_patch_rejects_id() {
        let result: Result<ObjectPatch, _> = serde_json::from_value(json!({"id": "b"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_pose_patch_merges_one_level() {
        let mut pose = Pose { x: 0.0, y: 5.0, rotation_degrees: 45.0, scale_x: -1.0, scale_y: 0.5 };
        PosePatch { x: Some(10.0), ..Default::default() }.apply_to(&mut pose);
        assert_eq!(pose, Pose { x: 10.0, y: 5.0, rotation_degrees: 45.0, scale_x: -1.0, scale_y: 0.5 });
    }
}
