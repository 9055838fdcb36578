//! Canvas synchronizer.
//!
//! Projects the design onto a [`DrawingSurface`] and turns surface
//! interaction back into editor actions. The design is the source of truth:
//! the surface can always be rebuilt from it, so failures while drawing a
//! single object are logged and skipped rather than propagated.

use crate::image::{DecodedImage, ImageLoadError};
use crate::shortcuts::{KeyCombo, ShortcutAction, ShortcutRegistry};
use crate::surface::{
    DrawingSurface, Primitive, PrimitiveBody, PrimitiveProps, PrimitiveTag, SurfaceError,
    shape_path,
};
use kurbo::Size;
use peniko::Color;
use printdesk_core::model::{DesignObject, GroupId, ImageSource, ObjectContent, ObjectPatch};
use printdesk_core::{Action, DesignState, Dispatch, Editor, NoOp, ObjectId};
use std::collections::{HashMap, HashSet};

/// Identifies one outstanding image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTicket {
    /// Reconciliation pass that issued the request.
    pass: u64,
    serial: u64,
}

/// An image the host must load before it can be drawn.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub ticket: ImageTicket,
    pub id: ObjectId,
    pub src: ImageSource,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub pass: u64,
    /// Objects drawn immediately.
    pub drawn: usize,
    /// Objects the surface could not draw.
    pub failed: Vec<ObjectId>,
    /// Image loads the host should perform.
    pub requests: Vec<ImageRequest>,
}

/// Outcome of delivering a finished image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCompletion {
    Applied,
    Failed,
    /// The load belongs to a superseded pass or a removed object.
    Stale,
}

/// Interaction reported by the surface.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    ObjectMoving { tag: PrimitiveTag, props: PrimitiveProps },
    ObjectScaling { tag: PrimitiveTag, props: PrimitiveProps },
    ObjectRotating { tag: PrimitiveTag, props: PrimitiveProps },
    /// The pointer was released after moving, scaling or rotating.
    ObjectModified { tag: PrimitiveTag },
    SelectionCreated(Vec<PrimitiveTag>),
    SelectionUpdated(Vec<PrimitiveTag>),
    SelectionCleared,
    Key(KeyCombo),
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEffect {
    /// The surface already shows the current design.
    None,
    /// The design changed; call [`CanvasSync::sync`].
    Resync,
}

/// Build the surface primitive for a non-image object, or for an image
/// object once its pixels are available.
pub fn build_primitive(
    object: &DesignObject,
    image: Option<DecodedImage>,
) -> Result<Primitive, SurfaceError> {
    if !object.geometry.is_finite() {
        return Err(SurfaceError::Rejected(format!(
            "object {} has non-finite geometry",
            object.id()
        )));
    }

    let color = |c: Option<printdesk_core::RgbaColor>| c.map(Color::from);
    let size = Size::new(object.geometry.width, object.geometry.height);
    let body = match object.content() {
        ObjectContent::Text(text) => PrimitiveBody::Text {
            content: text.content.clone(),
            font_family: text.font_family.clone(),
            font_size: text.font_size,
            font_weight: text.font_weight.numeric(),
            fill: color(text.paint.fill),
            stroke: color(text.paint.stroke),
            stroke_width: text.paint.stroke_width,
        },
        ObjectContent::Shape(shape) => PrimitiveBody::Shape {
            shape_type: shape.shape_type,
            path: shape_path(shape.shape_type, size),
            fill: color(shape.paint.fill),
            stroke: color(shape.paint.stroke),
            stroke_width: shape.paint.stroke_width,
        },
        ObjectContent::Image(_) => match image {
            Some(image) => PrimitiveBody::Image { image },
            None => {
                return Err(SurfaceError::Rejected(format!(
                    "image object {} has no decoded pixels",
                    object.id()
                )));
            }
        },
    };

    Ok(Primitive {
        tag: PrimitiveTag::Object(object.id().clone()),
        props: PrimitiveProps::from_object(object),
        body,
    })
}

fn patch_from_props(props: &PrimitiveProps) -> ObjectPatch {
    ObjectPatch {
        x: Some(props.origin.x),
        y: Some(props.origin.y),
        width: Some(props.size.width),
        height: Some(props.size.height),
        rotation: Some(props.rotation),
        scale_x: Some(props.scale_x),
        scale_y: Some(props.scale_y),
        opacity: Some(props.opacity),
        ..ObjectPatch::default()
    }
}

/// Keeps a drawing surface in step with an [`Editor`].
#[derive(Debug, Default)]
pub struct CanvasSync {
    /// Counter of reconciliation passes.
    pass: u64,
    serial: u64,
    /// Editor version the surface currently reflects.
    synced_version: Option<u64>,
    /// Stack index of each object in the last reconciled design.
    order: HashMap<ObjectId, usize>,
    /// Outstanding image loads of the current pass.
    pending: HashMap<ObjectId, ImageTicket>,
    selection: Vec<ObjectId>,
}

impl CanvasSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected objects, in stacking order.
    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    /// Number of image loads still awaited by the current pass.
    pub fn pending_images(&self) -> usize {
        self.pending.len()
    }

    /// Reconcile the surface with the editor's design if it changed since
    /// the last pass. Returns `None` when already in sync.
    pub fn sync(
        &mut self,
        surface: &mut dyn DrawingSurface,
        editor: &Editor,
    ) -> Option<ReconcileReport> {
        if self.synced_version == Some(editor.version()) {
            return None;
        }
        let report = self.reconcile(surface, editor.present());
        self.synced_version = Some(editor.version());
        Some(report)
    }

    /// Rebuild every object primitive on the surface from `state`.
    pub fn reconcile(
        &mut self,
        surface: &mut dyn DrawingSurface,
        state: &DesignState,
    ) -> ReconcileReport {
        self.pass += 1;
        self.pending.clear();
        self.order = state
            .objects
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id().clone(), i))
            .collect();
        self.prune_selection(state);

        let mut report = ReconcileReport {
            pass: self.pass,
            ..ReconcileReport::default()
        };

        surface.set_background(state.background.into());

        let tags = surface.tags();
        for index in (0..tags.len()).rev() {
            if tags[index].is_guide() {
                continue;
            }
            if let Err(e) = surface.remove(index) {
                log::error!("Failed to remove primitive {:?}: {}", tags[index], e);
            }
        }

        for object in &state.objects {
            if let ObjectContent::Image(image) = object.content() {
                self.serial += 1;
                let ticket = ImageTicket {
                    pass: self.pass,
                    serial: self.serial,
                };
                self.pending.insert(object.id().clone(), ticket);
                report.requests.push(ImageRequest {
                    ticket,
                    id: object.id().clone(),
                    src: image.src.clone(),
                });
                continue;
            }

            match self.insert_object(surface, object, None) {
                Ok(()) => report.drawn += 1,
                Err(e) => {
                    log::error!("Failed to draw object {}: {}", object.id(), e);
                    report.failed.push(object.id().clone());
                }
            }
        }

        log::debug!(
            "Reconcile pass {}: {} drawn, {} failed, {} images pending",
            report.pass,
            report.drawn,
            report.failed.len(),
            report.requests.len()
        );
        report
    }

    /// Deliver the result of an image load issued by [`CanvasSync::reconcile`].
    ///
    /// `state` must be the design the surface currently reflects.
    pub fn complete_image(
        &mut self,
        surface: &mut dyn DrawingSurface,
        state: &DesignState,
        request: &ImageRequest,
        result: Result<DecodedImage, ImageLoadError>,
    ) -> ImageCompletion {
        if request.ticket.pass != self.pass
            || self.pending.get(&request.id) != Some(&request.ticket)
        {
            log::warn!(
                "Discarding stale image load for {} from pass {} (current pass {})",
                request.id,
                request.ticket.pass,
                self.pass
            );
            return ImageCompletion::Stale;
        }
        self.pending.remove(&request.id);

        let Some(object) = state.object(&request.id) else {
            log::warn!("Image {} finished loading after its object was removed", request.id);
            return ImageCompletion::Stale;
        };

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                log::error!(
                    "Failed to load image {} for {}: {}",
                    request.src.describe(),
                    request.id,
                    e
                );
                return ImageCompletion::Failed;
            }
        };

        match self.insert_object(surface, object, Some(image)) {
            Ok(()) => ImageCompletion::Applied,
            Err(e) => {
                log::error!("Failed to draw image {}: {}", request.id, e);
                ImageCompletion::Failed
            }
        }
    }

    /// Insert an object's primitive where its stack index says it belongs
    /// among the primitives already on the surface.
    fn insert_object(
        &self,
        surface: &mut dyn DrawingSurface,
        object: &DesignObject,
        image: Option<DecodedImage>,
    ) -> Result<(), SurfaceError> {
        let primitive = build_primitive(object, image)?;
        let z = self.order.get(object.id()).copied().unwrap_or(usize::MAX);
        let tags = surface.tags();
        let index = tags
            .iter()
            .position(|tag| {
                tag.object_id()
                    .and_then(|id| self.order.get(id))
                    .is_some_and(|&other| other > z)
            })
            .unwrap_or(tags.len());
        surface.insert(index, primitive)
    }

    /// Handle a surface event, dispatching to the editor as needed.
    pub fn handle_event(
        &mut self,
        editor: &mut Editor,
        surface: &mut dyn DrawingSurface,
        event: SurfaceEvent,
    ) -> SyncEffect {
        match event {
            SurfaceEvent::ObjectMoving { tag, props }
            | SurfaceEvent::ObjectScaling { tag, props }
            | SurfaceEvent::ObjectRotating { tag, props } => {
                self.handle_manipulation(editor, surface, &tag, &props)
            }
            SurfaceEvent::ObjectModified { tag } => {
                if editor.end_gesture() {
                    log::debug!("Recorded gesture on {:?}", tag);
                }
                SyncEffect::None
            }
            SurfaceEvent::SelectionCreated(tags) | SurfaceEvent::SelectionUpdated(tags) => {
                self.select(editor.present(), &tags);
                SyncEffect::None
            }
            SurfaceEvent::SelectionCleared => {
                self.selection.clear();
                SyncEffect::None
            }
            SurfaceEvent::Key(combo) => match ShortcutRegistry::lookup(combo) {
                Some(action) => self.run_shortcut(editor, action),
                None => SyncEffect::None,
            },
        }
    }

    fn handle_manipulation(
        &mut self,
        editor: &mut Editor,
        surface: &mut dyn DrawingSurface,
        tag: &PrimitiveTag,
        props: &PrimitiveProps,
    ) -> SyncEffect {
        let Some(id) = tag.object_id() else {
            return SyncEffect::None;
        };

        // Only a surface already showing the present can absorb the preview
        // without a rebuild.
        let in_sync = self.synced_version == Some(editor.version());
        let behind = if in_sync {
            SyncEffect::None
        } else {
            SyncEffect::Resync
        };

        editor.begin_gesture();
        let action = Action::UpdateObject {
            id: id.clone(),
            patch: patch_from_props(props),
        };
        match editor.preview(&action) {
            Dispatch::Ignored(NoOp::ObjectNotFound(_)) => {
                log::warn!("Surface manipulated unknown object {}", id);
                return SyncEffect::Resync;
            }
            Dispatch::Ignored(_) => return behind,
            Dispatch::Committed | Dispatch::Previewed => {}
        }
        if !in_sync {
            return SyncEffect::Resync;
        }

        // The surface already shows the manipulation; snap it to the model.
        if let Some(object) = editor.present().object(id) {
            if let Err(e) = surface.set_properties(tag, &PrimitiveProps::from_object(object)) {
                log::error!("Failed to update primitive {}: {}", id, e);
                return SyncEffect::Resync;
            }
        }
        self.synced_version = Some(editor.version());
        SyncEffect::None
    }

    fn select(&mut self, state: &DesignState, tags: &[PrimitiveTag]) {
        let picked: HashSet<&ObjectId> = tags.iter().filter_map(PrimitiveTag::object_id).collect();
        let groups: HashSet<GroupId> = state
            .objects
            .iter()
            .filter(|o| picked.contains(o.id()))
            .filter_map(|o| o.group)
            .collect();

        // Picking one member of a group selects the whole group.
        self.selection = state
            .objects
            .iter()
            .filter(|o| picked.contains(o.id()) || o.group.is_some_and(|g| groups.contains(&g)))
            .map(|o| o.id().clone())
            .collect();
    }

    fn prune_selection(&mut self, state: &DesignState) {
        self.selection.retain(|id| state.contains(id));
    }

    fn run_shortcut(&mut self, editor: &mut Editor, action: ShortcutAction) -> SyncEffect {
        let changed = match action {
            ShortcutAction::DeleteSelection => {
                if self.selection.is_empty() {
                    return SyncEffect::None;
                }
                let ids = std::mem::take(&mut self.selection);
                editor.dispatch(&Action::RemoveObjects { ids }).changed()
            }
            ShortcutAction::DuplicateSelection => {
                if self.selection.is_empty() {
                    return SyncEffect::None;
                }
                let before = editor.present().len();
                let changed = editor
                    .dispatch(&Action::DuplicateObjects {
                        ids: self.selection.clone(),
                    })
                    .changed();
                if changed {
                    // Select the copies.
                    self.selection = editor.present().objects[before..]
                        .iter()
                        .map(|o| o.id().clone())
                        .collect();
                }
                changed
            }
            ShortcutAction::Undo => editor.undo(),
            ShortcutAction::Redo => editor.redo(),
            ShortcutAction::GroupSelection => editor
                .dispatch(&Action::GroupObjects {
                    ids: self.selection.clone(),
                })
                .changed(),
            ShortcutAction::UngroupSelection => {
                let state = editor.present();
                let mut groups: Vec<GroupId> = Vec::new();
                for group in self.selection.iter().filter_map(|id| state.object(id)?.group) {
                    if !groups.contains(&group) {
                        groups.push(group);
                    }
                }
                if groups.is_empty() {
                    return SyncEffect::None;
                }
                editor.dispatch(&Action::UngroupAll { groups }).changed()
            }
            ShortcutAction::Cancel => {
                self.selection.clear();
                let active = editor.is_gesture_active();
                editor.cancel_gesture();
                active
            }
        };

        self.prune_selection(editor.present());
        if changed {
            SyncEffect::Resync
        } else {
            SyncEffect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::tests::png_bytes;
    use crate::image::decode_image;
    use crate::memory::MemorySurface;
    use crate::shortcuts::Key;
    use kurbo::Point;
    use printdesk_core::EditorConfig;
    use printdesk_core::model::{ShapeType, TextContent};

    fn shape(id: &str) -> DesignObject {
        DesignObject::shape(Point::new(10.0, 10.0), 20.0, 20.0, ShapeType::Rect).with_id(id)
    }

    fn image(id: &str) -> DesignObject {
        let src = ImageSource::from_bytes(&png_bytes(2, 2)).unwrap();
        DesignObject::image(Point::ZERO, 50.0, 50.0, src).with_id(id)
    }

    fn editor_with(objects: Vec<DesignObject>) -> Editor {
        let mut editor = Editor::default();
        for object in objects {
            editor.dispatch(&Action::AddObject { object });
        }
        editor
    }

    fn surface_with_guide() -> MemorySurface {
        let mut surface = MemorySurface::new();
        surface.push(Primitive::guide(Size::new(800.0, 600.0))).unwrap();
        surface
    }

    fn ids(list: &[&str]) -> Vec<ObjectId> {
        list.iter().map(|s| ObjectId::from(*s)).collect()
    }

    fn moving(id: &str, x: f64, y: f64) -> SurfaceEvent {
        let object = shape(id);
        let mut props = PrimitiveProps::from_object(&object);
        props.origin = Point::new(x, y);
        SurfaceEvent::ObjectMoving {
            tag: PrimitiveTag::Object(id.into()),
            props,
        }
    }

    fn press(
        sync: &mut CanvasSync,
        editor: &mut Editor,
        surface: &mut MemorySurface,
        combo: KeyCombo,
    ) -> SyncEffect {
        sync.handle_event(editor, surface, SurfaceEvent::Key(combo))
    }

    #[test]
    fn test_reconcile_reproduces_stack_order_and_keeps_guides() {
        let editor = editor_with(vec![shape("a"), shape("b"), shape("c")]);
        let mut surface = surface_with_guide();
        let mut sync = CanvasSync::new();

        let report = sync.sync(&mut surface, &editor).unwrap();
        assert_eq!(report.drawn, 3);
        assert_eq!(surface.object_ids(), ids(&["a", "b", "c"]));
        assert_eq!(surface.tags()[0], PrimitiveTag::Guide);
        let background = surface.background().map(printdesk_core::RgbaColor::from);
        assert_eq!(background, Some(printdesk_core::RgbaColor::white()));

        // In sync: nothing to do.
        assert!(sync.sync(&mut surface, &editor).is_none());
    }

    #[test]
    fn test_reconcile_removes_stale_primitives() {
        let mut editor = editor_with(vec![shape("a"), shape("b")]);
        let mut surface = surface_with_guide();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);

        editor.dispatch(&Action::RemoveObject { id: "a".into() });
        sync.sync(&mut surface, &editor);
        assert_eq!(surface.object_ids(), ids(&["b"]));
        assert_eq!(surface.primitives().len(), 2);
    }

    #[test]
    fn test_failed_object_does_not_abort_pass() {
        let editor = editor_with(vec![shape("a"), shape("bad"), shape("c")]);
        let mut surface = MemorySurface::new();
        surface.reject("bad");
        let mut sync = CanvasSync::new();

        let report = sync.sync(&mut surface, &editor).unwrap();
        assert_eq!(report.failed, ids(&["bad"]));
        assert_eq!(surface.object_ids(), ids(&["a", "c"]));
        // The design is untouched.
        assert_eq!(editor.present().len(), 3);
    }

    #[test]
    fn test_late_image_lands_at_its_stack_position() {
        let editor = editor_with(vec![shape("a"), image("img"), shape("c")]);
        let mut surface = surface_with_guide();
        let mut sync = CanvasSync::new();

        let report = sync.sync(&mut surface, &editor).unwrap();
        assert_eq!(report.requests.len(), 1);
        assert_eq!(surface.object_ids(), ids(&["a", "c"]));

        let request = &report.requests[0];
        let decoded = decode_image(&request.src);
        let completion = sync.complete_image(&mut surface, editor.present(), request, decoded);
        assert_eq!(completion, ImageCompletion::Applied);
        assert_eq!(surface.object_ids(), ids(&["a", "img", "c"]));
        assert_eq!(sync.pending_images(), 0);
    }

    #[test]
    fn test_failed_image_is_skipped() {
        let editor = editor_with(vec![image("img"), shape("b")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();

        let report = sync.sync(&mut surface, &editor).unwrap();
        let failure = Err(ImageLoadError::Decode("truncated".into()));
        let request = &report.requests[0];
        let completion = sync.complete_image(&mut surface, editor.present(), request, failure);
        assert_eq!(completion, ImageCompletion::Failed);
        assert_eq!(surface.object_ids(), ids(&["b"]));
    }

    #[test]
    fn test_stale_image_load_is_discarded() {
        let mut editor = editor_with(vec![image("img")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();

        let first = sync.sync(&mut surface, &editor).unwrap();
        editor.dispatch(&Action::SetName { value: "Renamed".into() });
        let second = sync.sync(&mut surface, &editor).unwrap();

        let old = &first.requests[0];
        let completion = sync.complete_image(
            &mut surface,
            editor.present(),
            old,
            decode_image(&old.src),
        );
        assert_eq!(completion, ImageCompletion::Stale);
        assert!(surface.object_ids().is_empty());

        let fresh = &second.requests[0];
        let completion = sync.complete_image(
            &mut surface,
            editor.present(),
            fresh,
            decode_image(&fresh.src),
        );
        assert_eq!(completion, ImageCompletion::Applied);
        assert_eq!(surface.object_ids(), ids(&["img"]));

        // A second delivery of the same ticket is stale too.
        let again = sync.complete_image(
            &mut surface,
            editor.present(),
            fresh,
            decode_image(&fresh.src),
        );
        assert_eq!(again, ImageCompletion::Stale);
    }

    #[test]
    fn test_drag_coalesces_into_one_entry() {
        let mut editor = editor_with(vec![shape("a")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);
        let entries = editor.history().past().len();

        for step in 0..10 {
            let event = moving("a", step as f64, 5.0);
            let effect = sync.handle_event(&mut editor, &mut surface, event);
            assert_eq!(effect, SyncEffect::None);
        }
        let tag = PrimitiveTag::Object("a".into());
        let modified = SurfaceEvent::ObjectModified { tag: tag.clone() };
        sync.handle_event(&mut editor, &mut surface, modified);

        assert_eq!(editor.history().past().len(), entries + 1);
        assert_eq!(editor.present().objects[0].geometry.position, Point::new(9.0, 5.0));
        assert_eq!(surface.primitive(&tag).unwrap().props.origin, Point::new(9.0, 5.0));
        // The surface reflects the drag without a rebuild.
        assert!(sync.sync(&mut surface, &editor).is_none());

        let effect = press(&mut sync, &mut editor, &mut surface, KeyCombo::ctrl('z'));
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.present().objects[0].geometry.position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_drag_without_coalescing_commits_each_frame() {
        let config = EditorConfig {
            coalesce_gestures: false,
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(config);
        editor.dispatch(&Action::AddObject { object: shape("a") });
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);

        for step in 0..3 {
            sync.handle_event(&mut editor, &mut surface, moving("a", step as f64 + 1.0, 0.0));
        }
        assert_eq!(editor.history().past().len(), 4);
    }

    #[test]
    fn test_manipulating_unknown_object_requests_resync() {
        let mut editor = Editor::default();
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        let effect = sync.handle_event(&mut editor, &mut surface, moving("ghost", 1.0, 1.0));
        assert_eq!(effect, SyncEffect::Resync);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_selection_events() {
        let mut editor = editor_with(vec![shape("a"), shape("b"), shape("c")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();

        let tags = vec![
            PrimitiveTag::Object("c".into()),
            PrimitiveTag::Guide,
            PrimitiveTag::Object("a".into()),
            PrimitiveTag::Object("missing".into()),
        ];
        sync.handle_event(&mut editor, &mut surface, SurfaceEvent::SelectionCreated(tags));
        assert_eq!(sync.selection(), ids(&["a", "c"]).as_slice());

        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionUpdated(vec![PrimitiveTag::Object("b".into())]),
        );
        assert_eq!(sync.selection(), ids(&["b"]).as_slice());

        sync.handle_event(&mut editor, &mut surface, SurfaceEvent::SelectionCleared);
        assert!(sync.selection().is_empty());
    }

    #[test]
    fn test_delete_and_duplicate_shortcuts() {
        let mut editor = editor_with(vec![shape("a"), shape("b")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionCreated(vec![PrimitiveTag::Object("a".into())]),
        );

        let effect = press(&mut sync, &mut editor, &mut surface, KeyCombo::ctrl('d'));
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.present().len(), 3);
        let copy = editor.present().objects[2].id().clone();
        assert_eq!(sync.selection(), std::slice::from_ref(&copy));

        let effect = sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::Key(KeyCombo::plain(Key::Backspace)),
        );
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.present().ids(), ids(&["a", "b"]));
        assert!(sync.selection().is_empty());

        // Nothing selected: delete does nothing.
        let effect = press(&mut sync, &mut editor, &mut surface, KeyCombo::plain(Key::Delete));
        assert_eq!(effect, SyncEffect::None);
    }

    #[test]
    fn test_group_shortcuts_and_group_selection() {
        let text = DesignObject::text(Point::ZERO, TextContent::new("Team")).with_id("t");
        let mut editor = editor_with(vec![shape("a"), text, shape("b")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();

        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionCreated(vec![
                PrimitiveTag::Object("a".into()),
                PrimitiveTag::Object("b".into()),
            ]),
        );
        let effect = press(&mut sync, &mut editor, &mut surface, KeyCombo::ctrl('g'));
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.present().ids(), ids(&["t", "a", "b"]));

        // Picking one member selects the whole group.
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionCreated(vec![PrimitiveTag::Object("a".into())]),
        );
        assert_eq!(sync.selection(), ids(&["a", "b"]).as_slice());

        let before = editor.history().past().len();
        let effect = sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::Key(KeyCombo::ctrl_shift('g')),
        );
        assert_eq!(effect, SyncEffect::Resync);
        assert!(editor.present().objects.iter().all(|o| o.group.is_none()));
        assert_eq!(editor.history().past().len(), before + 1);
    }

    #[test]
    fn test_event_while_surface_is_behind_forces_resync() {
        let mut editor = editor_with(vec![shape("a")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);

        // Not yet reflected on the surface.
        editor.dispatch(&Action::AddObject { object: shape("b") });
        let effect = sync.handle_event(&mut editor, &mut surface, moving("a", 40.0, 40.0));
        assert_eq!(effect, SyncEffect::Resync);

        assert!(sync.sync(&mut surface, &editor).is_some());
        assert_eq!(surface.object_ids(), ids(&["a", "b"]));
        let tag = PrimitiveTag::Object("a".into());
        assert_eq!(surface.primitive(&tag).unwrap().props.origin, Point::new(40.0, 40.0));
    }

    #[test]
    fn test_scaling_and_rotating_patch_geometry() {
        let mut editor = editor_with(vec![shape("a")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);
        let entries = editor.history().past().len();
        let tag = PrimitiveTag::Object("a".into());

        let mut props = PrimitiveProps::from_object(&editor.present().objects[0]);
        props.scale_x = 2.0;
        props.scale_y = 3.0;
        let effect = sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::ObjectScaling {
                tag: tag.clone(),
                props,
            },
        );
        assert_eq!(effect, SyncEffect::None);
        let geometry = &editor.present().objects[0].geometry;
        assert_eq!((geometry.scale_x, geometry.scale_y), (2.0, 3.0));
        assert_eq!(geometry.position, Point::new(10.0, 10.0));

        let mut props = PrimitiveProps::from_object(&editor.present().objects[0]);
        props.rotation = 45.0;
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::ObjectRotating {
                tag: tag.clone(),
                props,
            },
        );
        let geometry = &editor.present().objects[0].geometry;
        assert_eq!(geometry.rotation, 45.0);
        assert_eq!(geometry.scale_x, 2.0);
        assert_eq!(surface.primitive(&tag).unwrap().props.rotation, 45.0);

        sync.handle_event(&mut editor, &mut surface, SurfaceEvent::ObjectModified { tag });
        assert_eq!(editor.history().past().len(), entries + 1);
        assert!(sync.sync(&mut surface, &editor).is_none());
    }

    fn grouped_pairs(config: EditorConfig) -> Editor {
        let mut editor = Editor::new(config);
        for id in ["a", "b", "c", "d", "e"] {
            editor.dispatch(&Action::AddObject { object: shape(id) });
        }
        editor.dispatch(&Action::GroupObjects {
            ids: ids(&["a", "b"]),
        });
        editor.dispatch(&Action::GroupObjects {
            ids: ids(&["c", "d"]),
        });
        editor
    }

    #[test]
    fn test_ungroup_without_coalescing_is_one_entry() {
        let config = EditorConfig {
            coalesce_gestures: false,
            ..EditorConfig::default()
        };
        let mut editor = grouped_pairs(config);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionCreated(vec![
                PrimitiveTag::Object("a".into()),
                PrimitiveTag::Object("c".into()),
            ]),
        );
        assert_eq!(sync.selection(), ids(&["a", "b", "c", "d"]).as_slice());

        let before = editor.history().past().len();
        let effect = sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::Key(KeyCombo::ctrl_shift('g')),
        );
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.history().past().len(), before + 1);
        assert!(editor.present().objects.iter().all(|o| o.group.is_none()));

        // Nothing left to ungroup.
        let effect = sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::Key(KeyCombo::ctrl_shift('g')),
        );
        assert_eq!(effect, SyncEffect::None);
    }

    #[test]
    fn test_ungroup_during_drag_is_its_own_entry() {
        let mut editor = grouped_pairs(EditorConfig::default());
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);
        let before = editor.history().past().len();

        sync.handle_event(&mut editor, &mut surface, moving("e", 70.0, 70.0));
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionCreated(vec![PrimitiveTag::Object("a".into())]),
        );
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::Key(KeyCombo::ctrl_shift('g')),
        );
        assert_eq!(editor.history().past().len(), before + 2);

        // Undo brings the group back and keeps the drag.
        assert!(editor.undo());
        let present = editor.present();
        assert!(present.object(&"a".into()).unwrap().group.is_some());
        assert_eq!(
            present.object(&"e".into()).unwrap().geometry.position,
            Point::new(70.0, 70.0)
        );
    }

    #[test]
    fn test_undo_prunes_selection() {
        let mut editor = editor_with(vec![shape("a")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::SelectionCreated(vec![PrimitiveTag::Object("a".into())]),
        );

        press(&mut sync, &mut editor, &mut surface, KeyCombo::ctrl('z'));
        assert!(editor.present().is_empty());
        assert!(sync.selection().is_empty());

        let effect = press(&mut sync, &mut editor, &mut surface, KeyCombo::ctrl('y'));
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.present().len(), 1);
    }

    #[test]
    fn test_escape_cancels_gesture() {
        let mut editor = editor_with(vec![shape("a")]);
        let mut surface = MemorySurface::new();
        let mut sync = CanvasSync::new();
        sync.sync(&mut surface, &editor);

        sync.handle_event(&mut editor, &mut surface, moving("a", 99.0, 99.0));
        let effect = sync.handle_event(
            &mut editor,
            &mut surface,
            SurfaceEvent::Key(KeyCombo::plain(Key::Escape)),
        );
        assert_eq!(effect, SyncEffect::Resync);
        assert_eq!(editor.present().objects[0].geometry.position, Point::new(10.0, 10.0));

        sync.sync(&mut surface, &editor);
        let tag = PrimitiveTag::Object("a".into());
        assert_eq!(surface.primitive(&tag).unwrap().props.origin, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_build_primitive_bodies() {
        let text = DesignObject::text(Point::ZERO, TextContent::new("Hi"));
        assert!(matches!(
            build_primitive(&text, None).unwrap().body,
            PrimitiveBody::Text { .. }
        ));

        let circle = DesignObject::shape(Point::ZERO, 10.0, 10.0, ShapeType::Circle);
        assert!(matches!(
            build_primitive(&circle, None).unwrap().body,
            PrimitiveBody::Shape { shape_type: ShapeType::Circle, .. }
        ));

        assert!(build_primitive(&image("img"), None).is_err());

        let mut broken = shape("x");
        broken.geometry.height = f64::INFINITY;
        assert!(matches!(build_primitive(&broken, None), Err(SurfaceError::Rejected(_))));
    }
}
