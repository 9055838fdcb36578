//! Shape object content.

use super::Paint;
use serde::{Deserialize, Serialize};

/// Geometric primitive drawn by a shape object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rect,
    Circle,
    Triangle,
    Polygon,
}

impl ShapeType {
    pub fn all() -> &'static [ShapeType] {
        &[
            ShapeType::Rect,
            ShapeType::Circle,
            ShapeType::Triangle,
            ShapeType::Polygon,
        ]
    }
}

/// Content carried by a shape object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeContent {
    pub shape_type: ShapeType,
    #[serde(default)]
    pub paint: Paint,
}

impl ShapeContent {
    pub fn new(shape_type: ShapeType) -> Self {
        Self {
            shape_type,
            paint: Paint::default(),
        }
    }
}
