//! In-memory drawing surface.

use crate::surface::{DrawingSurface, Primitive, PrimitiveProps, PrimitiveTag, SurfaceError};
use peniko::Color;
use printdesk_core::ObjectId;
use std::collections::HashSet;

/// A surface that only records what it is told to draw.
///
/// Used by the command-line shell and by tests; it can be told to reject
/// specific objects to exercise failure handling.
#[derive(Debug, Default)]
pub struct MemorySurface {
    background: Option<Color>,
    primitives: Vec<Primitive>,
    rejected: HashSet<ObjectId>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive(&self, tag: &PrimitiveTag) -> Option<&Primitive> {
        self.primitives.iter().find(|p| &p.tag == tag)
    }

    /// Ids of object primitives, bottom to top.
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.primitives
            .iter()
            .filter_map(|p| p.tag.object_id().cloned())
            .collect()
    }

    /// Make `insert` fail for primitives of this object.
    pub fn reject(&mut self, id: impl Into<ObjectId>) {
        self.rejected.insert(id.into());
    }
}

impl DrawingSurface for MemorySurface {
    fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    fn tags(&self) -> Vec<PrimitiveTag> {
        self.primitives.iter().map(|p| p.tag.clone()).collect()
    }

    fn insert(&mut self, index: usize, primitive: Primitive) -> Result<(), SurfaceError> {
        if index > self.primitives.len() {
            return Err(SurfaceError::IndexOutOfBounds {
                index,
                len: self.primitives.len(),
            });
        }
        if let Some(id) = primitive.tag.object_id() {
            if self.rejected.contains(id) {
                return Err(SurfaceError::Rejected(format!("object {} is rejected", id)));
            }
        }
        self.primitives.insert(index, primitive);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<Primitive, SurfaceError> {
        if index >= self.primitives.len() {
            return Err(SurfaceError::IndexOutOfBounds {
                index,
                len: self.primitives.len(),
            });
        }
        Ok(self.primitives.remove(index))
    }

    fn set_properties(
        &mut self,
        tag: &PrimitiveTag,
        props: &PrimitiveProps,
    ) -> Result<(), SurfaceError> {
        let primitive = self
            .primitives
            .iter_mut()
            .find(|p| &p.tag == tag)
            .ok_or_else(|| SurfaceError::UnknownPrimitive(format!("{:?}", tag)))?;
        primitive.props = *props;
        Ok(())
    }
}
