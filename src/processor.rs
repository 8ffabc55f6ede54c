//! Command Processor - Single Mutation Entry Point
//!
//! CRITICAL: the input scene is never mutated. Every command works on a copy and
//! a scene is only returned when the whole batch succeeds.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::commands::{Command, CommandBatch};
use crate::config::PlacementConfig;
use crate::error::CommandError;
use crate::ids::generate_id;
use crate::model::{Attributes, CanvasObject, ObjectType, Pose, Scene};
use crate::tools::create_tool_object;
use crate::validation::PlacementValidator;

const DEFAULT_FONT_FAMILY: &str = "Inter";
const DEFAULT_FONT_SIZE: f64 = 32.0;
const DEFAULT_TEXT_FILL: &str = "#111111";
const DEFAULT_IMAGE_SIZE: f64 = 256.0;

/// A successfully applied command or batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applied {
    pub scene: Scene,
    pub event: String,
}

pub struct CommandProcessor {
    validator: PlacementValidator,
}

impl CommandProcessor {
    pub fn new(validator: PlacementValidator) -> Self {
        Self { validator }
    }

    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(PlacementValidator::new(config))
    }

    pub fn validator(&self) -> &PlacementValidator {
        &self.validator
    }

    /// Apply one command to a copy of `scene`.
    pub fn apply_command(&self, scene: &Scene, command: &Command) -> Result<Applied, CommandError> {
        let mut next = scene.clone();
        let event = self.apply_in_place(&mut next, command)?;
        debug!(command = %command.description(), %event, "command applied");
        Ok(Applied { scene: next, event })
    }

    /// Fold commands left to right. Each command sees the effect of the ones
    /// before it; the first error discards the whole batch.
    pub fn apply_commands(&self, scene: &Scene, commands: &[Command]) -> Result<Applied, CommandError> {
        if commands.is_empty() {
            return Ok(Applied {
                scene: scene.clone(),
                event: "no commands".to_string(),
            });
        }

        let mut next = scene.clone();
        let mut events = Vec::with_capacity(commands.len());
        for (index, command) in commands.iter().enumerate() {
            let event = self.apply_in_place(&mut next, command).inspect_err(|err| {
                debug!(index, command = %command.description(), error = %err, "batch aborted");
            })?;
            debug!(index, command = %command.description(), %event, "command applied");
            events.push(event);
        }

        Ok(Applied {
            scene: next,
            event: events.join("; "),
        })
    }

    pub fn apply_batch(&self, scene: &Scene, batch: &CommandBatch) -> Result<Applied, CommandError> {
        self.apply_commands(scene, &batch.0)
    }

    /// Mutates `scene`, which must be a private working copy.
    fn apply_in_place(&self, scene: &mut Scene, command: &Command) -> Result<String, CommandError> {
        match command {
            Command::AddObject { object } => {
                self.insert_object(scene, object.clone(), true)
            }

            Command::AddTool { tool_type, x, y } => {
                self.insert_object(scene, create_tool_object(tool_type, *x, *y), true)
            }

            Command::AddText { content, x, y, style } => {
                let mut text_style = default_text_style();
                if let Some(overrides) = style {
                    text_style.extend(overrides.clone());
                }
                let object = CanvasObject {
                    id: generate_id("text"),
                    kind: ObjectType::Text,
                    pose: Pose::at(*x, *y),
                    content: Value::String(content.clone()),
                    style: text_style,
                    metadata: Attributes::new(),
                    locked: false,
                };
                self.insert_object(scene, object, false)
            }

            Command::AddImage { url, x, y } => {
                let object = CanvasObject {
                    id: generate_id("image"),
                    kind: ObjectType::Image,
                    pose: Pose::at(*x, *y),
                    content: Value::String(url.clone()),
                    style: default_image_style(),
                    metadata: Attributes::new(),
                    locked: false,
                };
                self.insert_object(scene, object, false)
            }

            Command::UpdateObject { id, patch } => {
                // Objects already off-canvas stay editable. Only a placement that
                // was valid before the patch is re-checked after it.
                let was_placed = patch.affects_placement() && self.revalidate(scene, id).is_ok();
                patch.apply_to(find_object_mut(scene, id)?);
                if was_placed {
                    self.revalidate(scene, id)?;
                }
                Ok(format!("Updated {id}"))
            }

            Command::MoveObject { id, dx, dy } => {
                let object = find_object_mut(scene, id)?;
                object.pose.x += dx;
                object.pose.y += dy;
                self.revalidate(scene, id)?;
                Ok(format!("Moved {id} by ({dx}, {dy})"))
            }

            Command::SetPose { id, x, y, r, scale_x, scale_y } => {
                let pose = &mut find_object_mut(scene, id)?.pose;
                pose.x = *x;
                pose.y = *y;
                if let Some(r) = r {
                    pose.rotation_degrees = *r;
                }
                if let Some(sx) = scale_x {
                    pose.scale_x = *sx;
                }
                if let Some(sy) = scale_y {
                    pose.scale_y = *sy;
                }
                self.revalidate(scene, id)?;
                Ok(format!("Set pose of {id} to ({x}, {y})"))
            }

            Command::DeleteEntity { id } => {
                let before = scene.objects.len() + scene.zones.len();
                scene.objects.retain(|o| &o.id != id);
                scene.zones.retain(|z| &z.id != id);
                if scene.objects.len() + scene.zones.len() == before {
                    return Err(CommandError::NotFound(id.clone()));
                }
                Ok(format!("Deleted {id}"))
            }

            Command::AddZone { zone } => {
                if zone.id.is_empty() {
                    return Err(CommandError::EmptyId);
                }
                if scene.contains_id(&zone.id) {
                    return Err(CommandError::DuplicateId(zone.id.clone()));
                }
                self.validator.check_zone(zone)?;
                scene.zones.push(zone.clone());
                Ok(format!("Added {} zone {}", zone.kind.as_str(), zone.id))
            }

            Command::ReorderObjects { new_order } => {
                reorder(scene, new_order);
                Ok(format!("Reordered objects: {}", scene.object_ids().join(", ")))
            }
        }
    }

    fn insert_object(
        &self,
        scene: &mut Scene,
        object: CanvasObject,
        check_placement: bool,
    ) -> Result<String, CommandError> {
        if object.id.is_empty() {
            return Err(CommandError::EmptyId);
        }
        if scene.contains_id(&object.id) {
            return Err(CommandError::DuplicateId(object.id));
        }
        if check_placement {
            self.validator.check_placement(&object, scene)?;
        }
        let event = format!("Added {} {}", object.kind.as_str(), object.id);
        scene.objects.push(object);
        Ok(event)
    }

    fn revalidate(&self, scene: &Scene, id: &str) -> Result<(), CommandError> {
        let object = scene
            .object(id)
            .ok_or_else(|| CommandError::NotFound(id.to_string()))?;
        self.validator.check_placement(object, scene)
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new(PlacementValidator::default())
    }
}

/// Apply one command with the default placement policy.
pub fn apply_command(scene: &Scene, command: &Command) -> Result<Applied, CommandError> {
    CommandProcessor::default().apply_command(scene, command)
}

/// Apply a batch with the default placement policy.
pub fn apply_commands(scene: &Scene, commands: &[Command]) -> Result<Applied, CommandError> {
    CommandProcessor::default().apply_commands(scene, commands)
}

fn find_object_mut<'a>(scene: &'a mut Scene, id: &str) -> Result<&'a mut CanvasObject, CommandError> {
    scene
        .object_mut(id)
        .ok_or_else(|| CommandError::NotFound(id.to_string()))
}

/// Listed ids first, in the order given; unlisted objects keep their
/// relative order after them.
fn reorder(scene: &mut Scene, new_order: &[String]) {
    let mut remaining: Vec<Option<CanvasObject>> =
        std::mem::take(&mut scene.objects).into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for id in new_order {
        let slot = remaining
            .iter_mut()
            .find(|slot| matches!(slot, Some(o) if &o.id == id));
        if let Some(object) = slot.and_then(Option::take) {
            ordered.push(object);
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    scene.objects = ordered;
}

fn default_text_style() -> Attributes {
    let mut style = Attributes::new();
    style.insert("fontFamily".into(), json!(DEFAULT_FONT_FAMILY));
    style.insert("fontSize".into(), json!(DEFAULT_FONT_SIZE));
    style.insert("fill".into(), json!(DEFAULT_TEXT_FILL));
    style
}

fn default_image_style() -> Attributes {
    let mut style = Attributes::new();
    style.insert("width".into(), json!(DEFAULT_IMAGE_SIZE));
    style.insert("height".into(), json!(DEFAULT_IMAGE_SIZE));
    style
}
