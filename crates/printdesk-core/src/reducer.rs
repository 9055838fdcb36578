//! Mutation engine: pure functions computing the next design from an action.
//!
//! [`reduce`] borrows the previous state immutably and either returns a new
//! [`DesignState`] or reports why the action had no effect. Missing ids are
//! never errors; they come back as [`NoOp::ObjectNotFound`] so callers can
//! observe them.

use crate::model::{DesignObject, GroupId, ObjectId, ObjectPatch, RgbaColor};
use crate::state::DesignState;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Offset applied to duplicated objects.
pub const DEFAULT_DUPLICATE_OFFSET: f64 = 20.0;

/// Where `ArrangeObject` moves an object in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Topmost.
    Front,
    /// Bottommost.
    Back,
    /// One step up.
    Forward,
    /// One step down.
    Backward,
}

/// Everything that can change a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    AddObject { object: DesignObject },
    UpdateObject { id: ObjectId, patch: ObjectPatch },
    RemoveObject { id: ObjectId },
    RemoveObjects { ids: Vec<ObjectId> },
    DuplicateObject { id: ObjectId },
    DuplicateObjects { ids: Vec<ObjectId> },
    MoveObjectForward { id: ObjectId },
    MoveObjectBackward { id: ObjectId },
    ArrangeObject { id: ObjectId, placement: Placement },
    GroupObjects { ids: Vec<ObjectId> },
    UngroupObjects { group: GroupId },
    UngroupAll { groups: Vec<GroupId> },
    SetBackground { color: RgbaColor },
    SetProductType { value: String },
    SetProductColor { value: String },
    SetProductSize { value: String },
    SetName { value: String },
    ClearDesign,
    LoadDesign { state: DesignState },
}

impl Action {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddObject { .. } => "AddObject",
            Action::UpdateObject { .. } => "UpdateObject",
            Action::RemoveObject { .. } => "RemoveObject",
            Action::RemoveObjects { .. } => "RemoveObjects",
            Action::DuplicateObject { .. } => "DuplicateObject",
            Action::DuplicateObjects { .. } => "DuplicateObjects",
            Action::MoveObjectForward { .. } => "MoveObjectForward",
            Action::MoveObjectBackward { .. } => "MoveObjectBackward",
            Action::ArrangeObject { .. } => "ArrangeObject",
            Action::GroupObjects { .. } => "GroupObjects",
            Action::UngroupObjects { .. } => "UngroupObjects",
            Action::UngroupAll { .. } => "UngroupAll",
            Action::SetBackground { .. } => "SetBackground",
            Action::SetProductType { .. } => "SetProductType",
            Action::SetProductColor { .. } => "SetProductColor",
            Action::SetProductSize { .. } => "SetProductSize",
            Action::SetName { .. } => "SetName",
            Action::ClearDesign => "ClearDesign",
            Action::LoadDesign { .. } => "LoadDesign",
        }
    }
}

/// Why an action left the design untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum NoOp {
    ObjectNotFound(ObjectId),
    GroupNotFound(GroupId),
    /// An object with this id already exists.
    DuplicateId(ObjectId),
    /// Reorder requested past the top or bottom of the stack.
    AtBoundary(ObjectId),
    /// Grouping needs at least two present objects.
    NotEnoughObjects,
    /// The action produced a value equal to the current one.
    NoEffect,
}

impl fmt::Display for NoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOp::ObjectNotFound(id) => write!(f, "object {} not found", id),
            NoOp::GroupNotFound(group) => write!(f, "group {} not found", group),
            NoOp::DuplicateId(id) => write!(f, "object id {} already in use", id),
            NoOp::AtBoundary(id) => write!(f, "object {} is already at the stack boundary", id),
            NoOp::NotEnoughObjects => write!(f, "fewer than two objects to group"),
            NoOp::NoEffect => write!(f, "no effect"),
        }
    }
}

/// Result of reducing an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduced {
    Changed(DesignState),
    Unchanged(NoOp),
}

impl Reduced {
    /// The new state, if any.
    pub fn changed(self) -> Option<DesignState> {
        match self {
            Reduced::Changed(state) => Some(state),
            Reduced::Unchanged(_) => None,
        }
    }
}

/// Reduce with the default duplicate offset.
pub fn reduce(state: &DesignState, action: &Action) -> Reduced {
    reduce_with_offset(state, action, Vec2::new(DEFAULT_DUPLICATE_OFFSET, DEFAULT_DUPLICATE_OFFSET))
}

/// Compute the design that results from applying `action` to `state`.
pub fn reduce_with_offset(state: &DesignState, action: &Action, duplicate_offset: Vec2) -> Reduced {
    let reduced = match action {
        Action::AddObject { object } => add_object(state, object),
        Action::UpdateObject { id, patch } => update_object(state, id, patch),
        Action::RemoveObject { id } => remove_objects(state, std::slice::from_ref(id)),
        Action::RemoveObjects { ids } => remove_objects(state, ids),
        Action::DuplicateObject { id } => {
            duplicate_objects(state, std::slice::from_ref(id), duplicate_offset)
        }
        Action::DuplicateObjects { ids } => duplicate_objects(state, ids, duplicate_offset),
        Action::MoveObjectForward { id } => move_by_one(state, id, true),
        Action::MoveObjectBackward { id } => move_by_one(state, id, false),
        Action::ArrangeObject { id, placement } => arrange_object(state, id, *placement),
        Action::GroupObjects { ids } => group_objects(state, ids),
        Action::UngroupObjects { group } => ungroup_objects(state, std::slice::from_ref(group)),
        Action::UngroupAll { groups } => ungroup_objects(state, groups),
        Action::SetBackground { color } => replace_field(state, |s| &mut s.background, *color),
        Action::SetProductType { value } => {
            replace_field(state, |s| &mut s.product_type, value.clone())
        }
        Action::SetProductColor { value } => {
            replace_field(state, |s| &mut s.product_color, value.clone())
        }
        Action::SetProductSize { value } => {
            replace_field(state, |s| &mut s.product_size, value.clone())
        }
        Action::SetName { value } => replace_field(state, |s| &mut s.name, value.clone()),
        Action::ClearDesign => clear_design(state),
        Action::LoadDesign { state: loaded } => {
            if loaded == state {
                Reduced::Unchanged(NoOp::NoEffect)
            } else {
                Reduced::Changed(loaded.clone())
            }
        }
    };

    if let Reduced::Unchanged(reason) = &reduced {
        log::debug!("{} ignored: {}", action.name(), reason);
    }
    reduced
}

fn with_objects(state: &DesignState, objects: Vec<DesignObject>) -> DesignState {
    DesignState {
        objects,
        ..state.clone()
    }
}

fn add_object(state: &DesignState, object: &DesignObject) -> Reduced {
    if state.contains(object.id()) {
        return Reduced::Unchanged(NoOp::DuplicateId(object.id().clone()));
    }
    let mut next = state.clone();
    next.objects.push(object.clone());
    Reduced::Changed(next)
}

fn update_object(state: &DesignState, id: &ObjectId, patch: &ObjectPatch) -> Reduced {
    let Some(index) = state.index_of(id) else {
        return Reduced::Unchanged(NoOp::ObjectNotFound(id.clone()));
    };

    let mut updated = state.objects[index].clone();
    patch.apply_to(&mut updated);
    if updated == state.objects[index] {
        return Reduced::Unchanged(NoOp::NoEffect);
    }

    let mut next = state.clone();
    next.objects[index] = updated;
    Reduced::Changed(next)
}

fn remove_objects(state: &DesignState, ids: &[ObjectId]) -> Reduced {
    let targets: HashSet<&ObjectId> = ids.iter().collect();
    let objects: Vec<DesignObject> = state
        .objects
        .iter()
        .filter(|o| !targets.contains(o.id()))
        .cloned()
        .collect();

    if objects.len() == state.objects.len() {
        return Reduced::Unchanged(match ids.first() {
            Some(id) => NoOp::ObjectNotFound(id.clone()),
            None => NoOp::NoEffect,
        });
    }
    Reduced::Changed(with_objects(state, objects))
}

fn duplicate_objects(state: &DesignState, ids: &[ObjectId], offset: Vec2) -> Reduced {
    let targets: HashSet<&ObjectId> = ids.iter().collect();
    let mut taken: HashSet<ObjectId> = state.objects.iter().map(|o| o.id().clone()).collect();
    let mut regrouped: HashMap<GroupId, GroupId> = HashMap::new();
    let mut copies = Vec::new();

    // Stacking order, so copies keep the relative order of their originals.
    for original in state.objects.iter().filter(|o| targets.contains(o.id())) {
        let mut id = original.id().derive();
        while taken.contains(&id) {
            id = original.id().derive();
        }
        taken.insert(id.clone());

        let mut copy = original.duplicate_as(id, offset);
        // Duplicating several members of a group yields a fresh group.
        if let Some(group) = original.group {
            let members_copied = state
                .objects
                .iter()
                .filter(|o| o.group == Some(group) && targets.contains(o.id()))
                .count();
            if members_copied > 1 {
                copy.group = Some(*regrouped.entry(group).or_insert_with(Uuid::new_v4));
            }
        }
        copies.push(copy);
    }

    if copies.is_empty() {
        return Reduced::Unchanged(match ids.first() {
            Some(id) => NoOp::ObjectNotFound(id.clone()),
            None => NoOp::NoEffect,
        });
    }

    let mut next = state.clone();
    next.objects.extend(copies);
    Reduced::Changed(next)
}

fn move_by_one(state: &DesignState, id: &ObjectId, forward: bool) -> Reduced {
    let Some(index) = state.index_of(id) else {
        return Reduced::Unchanged(NoOp::ObjectNotFound(id.clone()));
    };

    let neighbour = if forward {
        index + 1
    } else if index == 0 {
        return Reduced::Unchanged(NoOp::AtBoundary(id.clone()));
    } else {
        index - 1
    };
    if neighbour >= state.objects.len() {
        return Reduced::Unchanged(NoOp::AtBoundary(id.clone()));
    }

    let mut next = state.clone();
    next.objects.swap(index, neighbour);
    Reduced::Changed(next)
}

fn arrange_object(state: &DesignState, id: &ObjectId, placement: Placement) -> Reduced {
    let Some(index) = state.index_of(id) else {
        return Reduced::Unchanged(NoOp::ObjectNotFound(id.clone()));
    };

    let last = state.objects.len() - 1;
    let target = match placement {
        Placement::Front => last,
        Placement::Back => 0,
        Placement::Forward => (index + 1).min(last),
        Placement::Backward => index.saturating_sub(1),
    };
    if target == index {
        return Reduced::Unchanged(NoOp::AtBoundary(id.clone()));
    }

    let mut next = state.clone();
    let object = next.objects.remove(index);
    next.objects.insert(target, object);
    Reduced::Changed(next)
}

fn group_objects(state: &DesignState, ids: &[ObjectId]) -> Reduced {
    let targets: HashSet<&ObjectId> = ids.iter().collect();
    let (mut members, rest): (Vec<DesignObject>, Vec<DesignObject>) = state
        .objects
        .iter()
        .cloned()
        .partition(|o| targets.contains(o.id()));

    if members.len() < 2 {
        return Reduced::Unchanged(NoOp::NotEnoughObjects);
    }

    // The group sits where its topmost member was.
    let topmost = state
        .objects
        .iter()
        .rposition(|o| targets.contains(o.id()))
        .unwrap_or(state.objects.len() - 1);
    let insert_at = state.objects[..topmost]
        .iter()
        .filter(|o| !targets.contains(o.id()))
        .count();

    let group = Uuid::new_v4();
    for member in &mut members {
        member.group = Some(group);
    }

    let mut objects = rest;
    for (offset, member) in members.into_iter().enumerate() {
        objects.insert(insert_at + offset, member);
    }
    Reduced::Changed(with_objects(state, objects))
}

fn ungroup_objects(state: &DesignState, groups: &[GroupId]) -> Reduced {
    let in_groups = |o: &DesignObject| o.group.is_some_and(|g| groups.contains(&g));
    if !state.objects.iter().any(in_groups) {
        return Reduced::Unchanged(match groups.first() {
            Some(group) => NoOp::GroupNotFound(*group),
            None => NoOp::NoEffect,
        });
    }

    let mut next = state.clone();
    for object in next.objects.iter_mut().filter(|o| in_groups(o)) {
        object.group = None;
    }
    Reduced::Changed(next)
}

fn replace_field<T: PartialEq>(
    state: &DesignState,
    field: impl Fn(&mut DesignState) -> &mut T,
    value: T,
) -> Reduced {
    let mut next = state.clone();
    let slot = field(&mut next);
    if *slot == value {
        return Reduced::Unchanged(NoOp::NoEffect);
    }
    *slot = value;
    Reduced::Changed(next)
}

fn clear_design(state: &DesignState) -> Reduced {
    // Product type and the session's canvas dimensions survive a clear.
    let cleared = DesignState {
        product_type: state.product_type.clone(),
        width: state.width,
        height: state.height,
        resolution: state.resolution,
        ..DesignState::default()
    };
    if cleared == *state {
        return Reduced::Unchanged(NoOp::NoEffect);
    }
    Reduced::Changed(cleared)
}
