//! Design object definitions.

mod color;
mod image;
mod patch;
mod shape;
mod text;

pub use color::RgbaColor;
pub use image::{ImageContent, ImageFormat, ImageSource};
pub use patch::ObjectPatch;
pub use shape::{ShapeContent, ShapeType};
pub use text::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontWeight, TextContent};

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a design object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Identifier derived from this one, used for duplicates.
    pub fn derive(&self) -> Self {
        Self(format!("{}-{}", self.0, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier shared by all members of a group.
pub type GroupId = Uuid;

/// Which variant a design object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Text,
    Image,
    Shape,
}

/// Position, size and transform of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    /// Top-left corner.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl Geometry {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Size after scaling.
    pub fn scaled_size(&self) -> Size {
        Size::new(self.width * self.scale_x.abs(), self.height * self.scale_y.abs())
    }

    /// Axis-aligned bounds, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.scaled_size())
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && [self.width, self.height, self.rotation, self.scale_x, self.scale_y]
                .iter()
                .all(|v| v.is_finite())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(Point::ZERO, 100.0, 100.0)
    }
}

/// Fill and stroke for text and shape objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    /// Fill color (None = no fill).
    pub fill: Option<RgbaColor>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<RgbaColor>,
    pub stroke_width: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Some(RgbaColor::black()),
            stroke: None,
            stroke_width: 0.0,
        }
    }
}

/// Kind-specific payload. Private to [`DesignObject`] so the variant is fixed
/// once the object exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectContent {
    Text(TextContent),
    Image(ImageContent),
    Shape(ShapeContent),
}

impl ObjectContent {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectContent::Text(_) => ObjectKind::Text,
            ObjectContent::Image(_) => ObjectKind::Image,
            ObjectContent::Shape(_) => ObjectKind::Shape,
        }
    }
}

/// A single placeable entity on the design canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignObject {
    pub(crate) id: ObjectId,
    pub geometry: Geometry,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Group this object belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    content: ObjectContent,
}

fn default_opacity() -> f64 {
    1.0
}

impl DesignObject {
    fn from_content(content: ObjectContent, geometry: Geometry) -> Self {
        Self {
            id: ObjectId::generate(),
            geometry,
            opacity: 1.0,
            group: None,
            content,
        }
    }

    /// Create a text object at `position`, sized from its content.
    pub fn text(position: Point, text: TextContent) -> Self {
        let (width, height) = text.estimated_size();
        Self::from_content(
            ObjectContent::Text(text),
            Geometry::new(position, width, height),
        )
    }

    /// Create an image object.
    pub fn image(position: Point, width: f64, height: f64, src: ImageSource) -> Self {
        Self::from_content(
            ObjectContent::Image(ImageContent::new(src)),
            Geometry::new(position, width, height),
        )
    }

    /// Create a shape object.
    pub fn shape(position: Point, width: f64, height: f64, shape_type: ShapeType) -> Self {
        Self::from_content(
            ObjectContent::Shape(ShapeContent::new(shape_type)),
            Geometry::new(position, width, height),
        )
    }

    /// Replace the generated id, e.g. for fixtures or imported designs.
    pub fn with_id(mut self, id: impl Into<ObjectId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.content.kind()
    }

    pub fn content(&self) -> &ObjectContent {
        &self.content
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn text_content(&self) -> Option<&TextContent> {
        match &self.content {
            ObjectContent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_content_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.content {
            ObjectContent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn image_content(&self) -> Option<&ImageContent> {
        match &self.content {
            ObjectContent::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn image_content_mut(&mut self) -> Option<&mut ImageContent> {
        match &mut self.content {
            ObjectContent::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn shape_content(&self) -> Option<&ShapeContent> {
        match &self.content {
            ObjectContent::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn shape_content_mut(&mut self) -> Option<&mut ShapeContent> {
        match &mut self.content {
            ObjectContent::Shape(s) => Some(s),
            _ => None,
        }
    }

    /// Paint of text and shape objects; images carry none.
    pub fn paint(&self) -> Option<&Paint> {
        match &self.content {
            ObjectContent::Text(t) => Some(&t.paint),
            ObjectContent::Shape(s) => Some(&s.paint),
            ObjectContent::Image(_) => None,
        }
    }

    pub fn paint_mut(&mut self) -> Option<&mut Paint> {
        match &mut self.content {
            ObjectContent::Text(t) => Some(&mut t.paint),
            ObjectContent::Shape(s) => Some(&mut s.paint),
            ObjectContent::Image(_) => None,
        }
    }

    /// Copy of this object under `id`, moved by `offset`. Group membership
    /// is not carried over.
    pub(crate) fn duplicate_as(&self, id: ObjectId, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy.geometry.position += offset;
        copy.group = None;
        copy
    }
}
