//! Drawing surface abstraction.
//!
//! The surface is the external renderer the design is projected onto. The
//! synchronizer only needs the narrow interface below; concrete renderers
//! live outside this crate.

use crate::image::DecodedImage;
use kurbo::{Affine, BezPath, Point, Size, Vec2};
use peniko::Color;
use printdesk_core::ObjectId;
use printdesk_core::model::{DesignObject, ShapeType};
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Index {index} out of bounds for {len} primitives")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("No primitive tagged {0}")]
    UnknownPrimitive(String),
    #[error("Surface rejected primitive: {0}")]
    Rejected(String),
}

/// Correlates a surface primitive with the design.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveTag {
    /// Static grid or background guide. Never touched by reconciliation.
    Guide,
    /// Projection of the design object with this id.
    Object(ObjectId),
}

impl PrimitiveTag {
    pub fn object_id(&self) -> Option<&ObjectId> {
        match self {
            PrimitiveTag::Object(id) => Some(id),
            PrimitiveTag::Guide => None,
        }
    }

    pub fn is_guide(&self) -> bool {
        matches!(self, PrimitiveTag::Guide)
    }
}

/// Interactive properties shared by every primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveProps {
    /// Top-left corner.
    pub origin: Point,
    /// Unscaled size.
    pub size: Size,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub opacity: f64,
}

impl PrimitiveProps {
    pub fn from_object(object: &DesignObject) -> Self {
        let g = &object.geometry;
        Self {
            origin: g.position,
            size: Size::new(g.width, g.height),
            rotation: g.rotation,
            scale_x: g.scale_x,
            scale_y: g.scale_y,
            opacity: object.opacity,
        }
    }

    /// Local-to-canvas transform: scale, then rotate about the origin, then
    /// translate to the origin.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

/// What a primitive draws, in local coordinates `(0,0)..size`.
#[derive(Debug, Clone)]
pub enum PrimitiveBody {
    Text {
        content: String,
        font_family: String,
        font_size: f64,
        font_weight: u16,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
    Image {
        image: DecodedImage,
    },
    Shape {
        shape_type: ShapeType,
        path: BezPath,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
}

/// A single drawable item on the surface.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub tag: PrimitiveTag,
    pub props: PrimitiveProps,
    pub body: PrimitiveBody,
}

impl Primitive {
    /// A guide primitive, e.g. the print area outline.
    pub fn guide(size: Size) -> Self {
        Self {
            tag: PrimitiveTag::Guide,
            props: PrimitiveProps {
                origin: Point::ZERO,
                size,
                rotation: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
                opacity: 1.0,
            },
            body: PrimitiveBody::Shape {
                shape_type: ShapeType::Rect,
                path: shape_path(ShapeType::Rect, size),
                fill: None,
                stroke: Some(Color::from_rgba8(200, 200, 200, 255)),
                stroke_width: 1.0,
            },
        }
    }
}

/// Number of corners of the `Polygon` shape type.
pub const POLYGON_SIDES: usize = 6;

/// Outline of a shape type fitted to `size`, in local coordinates.
pub fn shape_path(shape_type: ShapeType, size: Size) -> BezPath {
    use kurbo::Shape as _;

    let (w, h) = (size.width, size.height);
    match shape_type {
        ShapeType::Rect => kurbo::Rect::new(0.0, 0.0, w, h).to_path(0.1),
        ShapeType::Circle => {
            kurbo::Ellipse::from_rect(kurbo::Rect::new(0.0, 0.0, w, h)).to_path(0.1)
        }
        ShapeType::Triangle => {
            let mut path = BezPath::new();
            path.move_to((w / 2.0, 0.0));
            path.line_to((w, h));
            path.line_to((0.0, h));
            path.close_path();
            path
        }
        ShapeType::Polygon => {
            let center = Point::new(w / 2.0, h / 2.0);
            let mut path = BezPath::new();
            for i in 0..POLYGON_SIDES {
                let angle = std::f64::consts::TAU * i as f64 / POLYGON_SIDES as f64
                    - std::f64::consts::FRAC_PI_2;
                let corner = center + Vec2::new(angle.cos() * w / 2.0, angle.sin() * h / 2.0);
                if i == 0 {
                    path.move_to(corner);
                } else {
                    path.line_to(corner);
                }
            }
            path.close_path();
            path
        }
    }
}

/// The narrow interface the synchronizer drives.
///
/// Primitives are kept in stacking order: index 0 is drawn first.
pub trait DrawingSurface {
    /// Set the canvas background color.
    fn set_background(&mut self, color: Color);

    /// Tags of all primitives, bottom to top.
    fn tags(&self) -> Vec<PrimitiveTag>;

    /// Insert a primitive at `index` in the stack.
    fn insert(&mut self, index: usize, primitive: Primitive) -> Result<(), SurfaceError>;

    /// Remove the primitive at `index`.
    fn remove(&mut self, index: usize) -> Result<Primitive, SurfaceError>;

    /// Update the interactive properties of the primitive tagged `tag`.
    fn set_properties(
        &mut self,
        tag: &PrimitiveTag,
        props: &PrimitiveProps,
    ) -> Result<(), SurfaceError>;

    /// Append a primitive on top of the stack.
    fn push(&mut self, primitive: Primitive) -> Result<(), SurfaceError> {
        let len = self.tags().len();
        self.insert(len, primitive)
    }
}
