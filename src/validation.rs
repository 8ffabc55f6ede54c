//! Placement Validation - Rule/Policy Separation
//!
//! Rules report why a placement is rejected.
//! The configured `BoundsPolicy` decides which rules run.

use crate::config::{BoundsPolicy, PlacementConfig};
use crate::error::CommandError;
use crate::model::{CanvasObject, Scene, Zone};

/// A placement rule: `Some(reason)` rejects the object.
pub trait PlacementRule {
    fn name(&self) -> &'static str;
    fn check(&self, object: &CanvasObject, scene: &Scene) -> Option<String>;
}

// --- Concrete Rules ---

pub struct FinitePoseRule;

impl PlacementRule for FinitePoseRule {
    fn name(&self) -> &'static str { "finite_pose" }

    fn check(&self, object: &CanvasObject, _scene: &Scene) -> Option<String> {
        if object.pose.is_finite() {
            None
        } else {
            Some("pose contains a non-finite value".to_string())
        }
    }
}

pub struct AnchorInsideRule {
    pub margin: f64,
}

impl PlacementRule for AnchorInsideRule {
    fn name(&self) -> &'static str { "anchor_inside" }

    fn check(&self, object: &CanvasObject, scene: &Scene) -> Option<String> {
        let (x, y) = (object.pose.x, object.pose.y);
        let inside = x >= -self.margin
            && x <= scene.width + self.margin
            && y >= -self.margin
            && y <= scene.height + self.margin;

        if inside {
            None
        } else {
            Some(format!(
                "anchor ({}, {}) outside {}x{} canvas",
                x, y, scene.width, scene.height
            ))
        }
    }
}

pub struct BoxInsideRule {
    pub margin: f64,
}

impl BoxInsideRule {
    /// Unrotated box as (min_x, min_y, max_x, max_y). Negative scale flips
    /// the box to the other side of the anchor.
    fn bounds(object: &CanvasObject) -> (f64, f64, f64, f64) {
        let w = object.style_number("width").unwrap_or(0.0) * object.pose.scale_x;
        let h = object.style_number("height").unwrap_or(0.0) * object.pose.scale_y;
        let (x0, x1) = (object.pose.x, object.pose.x + w);
        let (y0, y1) = (object.pose.y, object.pose.y + h);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl PlacementRule for BoxInsideRule {
    fn name(&self) -> &'static str { "box_inside" }

    fn check(&self, object: &CanvasObject, scene: &Scene) -> Option<String> {
        let (min_x, min_y, max_x, max_y) = Self::bounds(object);
        let inside = min_x >= -self.margin
            && min_y >= -self.margin
            && max_x <= scene.width + self.margin
            && max_y <= scene.height + self.margin;

        if inside {
            None
        } else {
            Some(format!(
                "box ({}, {})-({}, {}) exceeds {}x{} canvas",
                min_x, min_y, max_x, max_y, scene.width, scene.height
            ))
        }
    }
}

/// Validator orchestrates placement rules and zone well-formedness.
pub struct PlacementValidator {
    rules: Vec<Box<dyn PlacementRule>>,
}

impl PlacementValidator {
    pub fn new(config: &PlacementConfig) -> Self {
        let mut rules: Vec<Box<dyn PlacementRule>> = vec![Box::new(FinitePoseRule)];
        match config.policy {
            BoundsPolicy::Unbounded => {}
            BoundsPolicy::AnchorInside => {
                rules.push(Box::new(AnchorInsideRule { margin: config.margin }))
            }
            BoundsPolicy::BoxInside => {
                rules.push(Box::new(BoxInsideRule { margin: config.margin }))
            }
        }
        Self { rules }
    }

    /// Add a host-specific rule after the policy rules.
    pub fn with_rule(mut self, rule: Box<dyn PlacementRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// First failing rule wins.
    pub fn check_placement(&self, object: &CanvasObject, scene: &Scene) -> Result<(), CommandError> {
        for rule in &self.rules {
            if let Some(reason) = rule.check(object, scene) {
                return Err(CommandError::BoundsViolation {
                    id: object.id.clone(),
                    reason: format!("{}: {}", rule.name(), reason),
                });
            }
        }
        Ok(())
    }

    pub fn check_zone(&self, zone: &Zone) -> Result<(), CommandError> {
        zone_defect(&zone.points)
            .map_or(Ok(()), |reason| {
                Err(CommandError::InvalidZone {
                    id: zone.id.clone(),
                    reason,
                })
            })
    }
}

impl Default for PlacementValidator {
    fn default() -> Self {
        Self::new(&PlacementConfig::default())
    }
}

/// Structural problems with a flat, implicitly closed polygon.
fn zone_defect(points: &[f64]) -> Option<String> {
    if points.len() % 2 != 0 {
        return Some(format!("odd coordinate count {}", points.len()));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Some("non-finite coordinate".to_string());
    }

    let mut vertices: Vec<(f64, f64)> = points.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    // An explicit closing vertex is not a vertex of its own.
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    if vertices.len() < 3 {
        return Some(format!("{} vertices, at least 3 required", vertices.len()));
    }

    if shoelace_area(&vertices) == 0.0 {
        return Some("polygon has zero area".to_string());
    }
    None
}

fn shoelace_area(vertices: &[(f64, f64)]) -> f64 {
    let twice: f64 = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|((x0, y0), (x1, y1))| x0 * y1 - x1 * y0)
        .sum();
    (twice / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectType, Pose, ZoneType};
    use serde_json::json;

    fn object_at(x: f64, y: f64) -> CanvasObject {
        CanvasObject {
            id: "obj".into(),
            kind: ObjectType::Shape,
            pose: Pose::at(x, y),
            content: json!("rect"),
            style: json!({"width": 100, "height": 50}).as_object().cloned().unwrap(),
            metadata: Default::default(),
            locked: false,
        }
    }

    fn zone(points: Vec<f64>) -> Zone {
        Zone { id: "z".into(), kind: ZoneType::Safe, points, label: None }
    }

    fn validator(policy: BoundsPolicy, margin: f64) -> PlacementValidator {
        PlacementValidator::new(&PlacementConfig { policy, margin })
    }

    #[test]
    fn test_anchor_policy() {
        let scene = Scene::new(500.0, 500.0);
        let v = validator(BoundsPolicy::AnchorInside, 0.0);
        assert!(v.check_placement(&object_at(500.0, 0.0), &scene).is_ok());
        assert!(v.check_placement(&object_at(501.0, 0.0), &scene).is_err());
    }

    #[test]
    fn test_margin_extends_canvas() {
        let scene = Scene::new(500.0, 500.0);
        let v = validator(BoundsPolicy::AnchorInside, 20.0);
        assert!(v.check_placement(&object_at(-20.0, 510.0), &scene).is_ok());
        assert!(v.check_placement(&object_at(-21.0, 0.0), &scene).is_err());
    }

    #[test]
    fn test_box_policy_uses_style_extent() {
        let scene = Scene::new(500.0, 500.0);
        let v = validator(BoundsPolicy::BoxInside, 0.0);
        assert!(v.check_placement(&object_at(400.0, 450.0), &scene).is_ok());
        assert!(v.check_placement(&object_at(401.0, 0.0), &scene).is_err());
    }

    #[test]
    fn test_box_policy_negative_scale_flips() {
        let scene = Scene::new(500.0, 500.0);
        let v = validator(BoundsPolicy::BoxInside, 0.0);
        let mut flipped = object_at(50.0, 0.0);
        flipped.pose.scale_x = -1.0;
        assert!(v.check_placement(&flipped, &scene).is_err());
        flipped.pose.x = 100.0;
        assert!(v.check_placement(&flipped, &scene).is_ok());
    }

    #[test]
    fn test_unbounded_still_rejects_nan() {
        let scene = Scene::new(500.0, 500.0);
        let v = validator(BoundsPolicy::Unbounded, 0.0);
        assert!(v.check_placement(&object_at(-9000.0, 9000.0), &scene).is_ok());
        let err = v.check_placement(&object_at(f64::NAN, 0.0), &scene).unwrap_err();
        assert!(matches!(err, CommandError::BoundsViolation { .. }));
    }

    #[test]
    fn test_custom_rule_is_pluggable() {
        struct NoTopStrip;
        impl PlacementRule for NoTopStrip {
            fn name(&self) -> &'static str { "no_top_strip" }
            fn check(&self, object: &CanvasObject, _scene: &Scene) -> Option<String> {
                (object.pose.y < 50.0).then(|| "reserved header".to_string())
            }
        }

        let scene = Scene::new(500.0, 500.0);
        let v = PlacementValidator::default().with_rule(Box::new(NoTopStrip));
        assert_eq!(v.rule_names(), vec!["finite_pose", "anchor_inside", "no_top_strip"]);
        assert!(v.check_placement(&object_at(10.0, 10.0), &scene).is_err());
    }

    #[test]
    fn test_zone_well_formed() {
        let v = PlacementValidator::default();
        assert!(v.check_zone(&zone(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0])).is_ok());
        // explicitly closed triangle
        assert!(v.check_zone(&zone(vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0])).is_ok());
    }

    #[test]
    fn test_zone_defects() {
        let v = PlacementValidator::default();
        for points in [
            vec![0.0, 0.0, 10.0, 0.0, 10.0],
            vec![0.0, 0.0, 10.0, 0.0],
            vec![0.0, 0.0, 10.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 5.0, 5.0, 10.0, 10.0],
            vec![0.0, 0.0, f64::INFINITY, 0.0, 10.0, 10.0],
        ] {
            let err = v.check_zone(&zone(points)).unwrap_err();
            assert!(matches!(err, CommandError::InvalidZone { .. }));
        }
    }
}
