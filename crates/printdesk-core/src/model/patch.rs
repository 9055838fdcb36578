//! Partial updates applied by `UpdateObject`.

use super::{DesignObject, FontWeight, ImageSource, ObjectKind, RgbaColor, ShapeType};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A set of optional field overrides for a [`DesignObject`].
///
/// Fields that do not apply to the target's kind are skipped; the object's
/// kind itself can never be changed through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<RgbaColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<RgbaColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<ImageSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
}

impl ObjectPatch {
    /// Patch carrying the full interactive geometry of `object`
    /// (position, size, rotation, scale and opacity).
    pub fn geometry_of(object: &DesignObject) -> Self {
        let g = &object.geometry;
        Self {
            x: Some(g.position.x),
            y: Some(g.position.y),
            width: Some(g.width),
            height: Some(g.height),
            rotation: Some(g.rotation),
            scale_x: Some(g.scale_x),
            scale_y: Some(g.scale_y),
            opacity: Some(object.opacity),
            ..Self::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch in place. Returns the names of fields that were
    /// skipped because they do not apply to the object's kind.
    pub fn apply_to(&self, object: &mut DesignObject) -> Vec<&'static str> {
        let mut skipped = Vec::new();

        let g = &mut object.geometry;
        let x = self.x.unwrap_or(g.position.x);
        let y = self.y.unwrap_or(g.position.y);
        g.position = Point::new(x, y);
        set(&mut g.width, self.width);
        set(&mut g.height, self.height);
        set(&mut g.rotation, self.rotation);
        set(&mut g.scale_x, self.scale_x);
        set(&mut g.scale_y, self.scale_y);
        set(&mut object.opacity, self.opacity);

        let kind = object.kind();
        match object.paint_mut() {
            Some(paint) => {
                if let Some(fill) = self.fill {
                    paint.fill = Some(fill);
                }
                if let Some(stroke) = self.stroke {
                    paint.stroke = Some(stroke);
                }
                set(&mut paint.stroke_width, self.stroke_width);
            }
            None => {
                skip_if(&mut skipped, "fill", self.fill.is_some());
                skip_if(&mut skipped, "stroke", self.stroke.is_some());
                skip_if(&mut skipped, "strokeWidth", self.stroke_width.is_some());
            }
        }

        match object.text_content_mut() {
            Some(text) => {
                if let Some(content) = &self.content {
                    text.content.clone_from(content);
                }
                if let Some(family) = &self.font_family {
                    text.font_family.clone_from(family);
                }
                set(&mut text.font_size, self.font_size);
                if let Some(weight) = self.font_weight {
                    text.font_weight = weight;
                }
            }
            None => {
                skip_if(&mut skipped, "content", self.content.is_some());
                skip_if(&mut skipped, "fontFamily", self.font_family.is_some());
                skip_if(&mut skipped, "fontSize", self.font_size.is_some());
                skip_if(&mut skipped, "fontWeight", self.font_weight.is_some());
            }
        }

        match (object.image_content_mut(), &self.src) {
            (Some(image), Some(src)) => image.src = src.clone(),
            (None, Some(_)) => skipped.push("src"),
            _ => {}
        }

        match (object.shape_content_mut(), self.shape_type) {
            (Some(shape), Some(shape_type)) => shape.shape_type = shape_type,
            (None, Some(_)) => skipped.push("shapeType"),
            _ => {}
        }

        if !skipped.is_empty() {
            log::warn!(
                "Ignored {:?} on {:?} object {}",
                skipped,
                kind,
                object.id()
            );
        }
        skipped
    }
}

fn set(field: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *field = v;
    }
}

fn skip_if(skipped: &mut Vec<&'static str>, name: &'static str, present: bool) {
    if present {
        skipped.push(name);
    }
}
