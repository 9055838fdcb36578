//! Design snapshots.

use crate::model::{DesignObject, GroupId, ObjectId, RgbaColor};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Integrity problems found in a design.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("Duplicate object id: {0}")]
    DuplicateId(ObjectId),
    #[error("Object {0} has non-finite geometry")]
    NonFiniteGeometry(ObjectId),
    #[error("Object {id} has opacity {opacity} outside 0..=1")]
    OpacityOutOfRange { id: ObjectId, opacity: f64 },
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: f64, height: f64 },
}

/// A complete, self-contained snapshot of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignState {
    /// Objects from bottom to top of the stack.
    pub objects: Vec<DesignObject>,
    pub background: RgbaColor,
    pub product_type: String,
    pub product_color: String,
    pub product_size: String,
    /// Design name.
    pub name: String,
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Print resolution in dots per inch.
    pub resolution: u32,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            background: RgbaColor::white(),
            product_type: "t-shirt".to_string(),
            product_color: "white".to_string(),
            product_size: "M".to_string(),
            name: "Untitled design".to_string(),
            width: 800.0,
            height: 600.0,
            resolution: 300,
        }
    }
}

impl DesignState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an object by id.
    pub fn object(&self, id: &ObjectId) -> Option<&DesignObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Stack index of an object.
    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Object ids from bottom to top.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id().clone()).collect()
    }

    /// Ids of all members of `group`, in stacking order.
    pub fn group_members(&self, group: GroupId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.group == Some(group))
            .map(|o| o.id().clone())
            .collect()
    }

    /// Union of all object bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.objects
            .iter()
            .map(DesignObject::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check the integrity of the design.
    pub fn validate(&self) -> Result<(), DesignError> {
        let finite = self.width.is_finite() && self.height.is_finite();
        if !(finite && self.width > 0.0 && self.height > 0.0) {
            return Err(DesignError::InvalidCanvasSize {
                width: self.width,
                height: self.height,
            });
        }

        let mut seen = HashSet::new();
        for object in &self.objects {
            if !seen.insert(object.id()) {
                return Err(DesignError::DuplicateId(object.id().clone()));
            }
            if !object.geometry.is_finite() {
                return Err(DesignError::NonFiniteGeometry(object.id().clone()));
            }
            if !(0.0..=1.0).contains(&object.opacity) {
                return Err(DesignError::OpacityOutOfRange {
                    id: object.id().clone(),
                    opacity: object.opacity,
                });
            }
        }
        Ok(())
    }

    /// Serialize the design to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a design from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeType;
    use kurbo::Point;

    fn rect(id: &str, x: f64) -> DesignObject {
        DesignObject::shape(Point::new(x, 0.0), 10.0, 10.0, ShapeType::Rect).with_id(id)
    }

    #[test]
    fn test_default_is_empty() {
        let state = DesignState::default();
        assert!(state.is_empty());
        assert_eq!(state.product_type, "t-shirt");
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_lookup_helpers() {
        let mut state = DesignState::new();
        state.objects = vec![rect("a", 0.0), rect("b", 50.0)];

        assert_eq!(state.index_of(&"b".into()), Some(1));
        assert!(state.contains(&"a".into()));
        assert!(state.object(&"zzz".into()).is_none());
        assert_eq!(state.ids(), vec![ObjectId::from("a"), ObjectId::from("b")]);

        let bounds = state.bounds().unwrap();
        assert!((bounds.x1 - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let mut state = DesignState::new();
        state.objects = vec![rect("a", 0.0), rect("a", 5.0)];
        assert_eq!(state.validate(), Err(DesignError::DuplicateId("a".into())));
    }

    #[test]
    fn test_validate_geometry_and_opacity() {
        let mut state = DesignState::new();
        let mut bad = rect("a", 0.0);
        bad.geometry.width = f64::NAN;
        state.objects = vec![bad];
        assert!(matches!(state.validate(), Err(DesignError::NonFiniteGeometry(_))));

        let mut faded = rect("b", 0.0);
        faded.opacity = 1.5;
        state.objects = vec![faded];
        assert!(matches!(
            state.validate(),
            Err(DesignError::OpacityOutOfRange { .. })
        ));

        state.objects.clear();
        state.width = 0.0;
        assert!(matches!(
            state.validate(),
            Err(DesignError::InvalidCanvasSize { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut state = DesignState::new();
        state.objects = vec![rect("a", 0.0)];
        state.product_type = "hoodie".into();
        let back = DesignState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(back, state);
    }
}
