//! PrintDesk Canvas Library
//!
//! Projects a design onto a drawing surface and feeds surface interaction
//! back into the editor.

pub mod image;
mod memory;
pub mod shortcuts;
pub mod surface;
mod sync;

pub use image::{DecodedImage, ImageLoadError, decode_bytes, decode_image};
pub use memory::MemorySurface;
pub use shortcuts::{Key, KeyCombo, Shortcut, ShortcutAction, ShortcutRegistry};
pub use surface::{
    DrawingSurface, POLYGON_SIDES, Primitive, PrimitiveBody, PrimitiveProps, PrimitiveTag,
    SurfaceError, shape_path,
};
pub use sync::{
    CanvasSync, ImageCompletion, ImageRequest, ImageTicket, ReconcileReport, SurfaceEvent,
    SyncEffect, build_primitive,
};
