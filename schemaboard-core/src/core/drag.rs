//! Drag-and-drop gesture state for reordering field rows.
//!
//! Pointer events arrive in any order (a cancelled gesture may skip `drop`,
//! a stray `dragover` may arrive while idle), so every event is accepted in
//! every state. Only [`DragReorderController::drop`] touches the list.

use crate::FieldListStore;

/// Where the pointer is hovering during a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Over another field row.
    Field(String),
    /// Over the table header area rather than any row; dropping here moves
    /// the dragged field to the front.
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { source: String },
    HoverTarget { source: String, target: DropTarget },
}

/// Tracks one drag gesture over a [`FieldListStore`].
#[derive(Debug, Clone, Default)]
pub struct DragReorderController {
    state: DragState,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Id of the field being dragged, if any.
    pub fn source(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::HoverTarget { source, .. } => Some(source),
        }
    }

    pub fn hover_target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::HoverTarget { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Begins dragging `id`. Starting a drag on an unknown field leaves the
    /// controller idle.
    pub fn drag_start(&mut self, id: &str, store: &FieldListStore) {
        self.state = if store.index(id).is_some() {
            DragState::Dragging { source: id.to_string() }
        } else {
            DragState::Idle
        };
    }

    /// Pointer moved over the row `candidate`. Presentation only.
    pub fn drag_over(&mut self, candidate: &str) {
        if let Some(source) = self.source() {
            self.state = DragState::HoverTarget {
                source: source.to_string(),
                target: DropTarget::Field(candidate.to_string()),
            };
        }
    }

    /// Pointer moved over the container. Ignored when the dragged field is
    /// already first, since dropping there could not change anything.
    pub fn drag_over_container(&mut self, store: &FieldListStore) {
        let Some(source) = self.source() else {
            return;
        };
        if store.index(source) == Some(0) {
            return;
        }
        self.state = DragState::HoverTarget {
            source: source.to_string(),
            target: DropTarget::Container,
        };
    }

    /// Completes the gesture on `target` and returns whether the list changed.
    pub fn drop(&mut self, target: DropTarget, store: &mut FieldListStore) -> bool {
        let state = std::mem::take(&mut self.state);
        let source = match state {
            DragState::Idle => return false,
            DragState::Dragging { source } | DragState::HoverTarget { source, .. } => source,
        };
        let moved = match target {
            DropTarget::Field(ref id) if *id == source => false,
            DropTarget::Field(id) => store.move_to(&source, &id),
            DropTarget::Container => store.move_to_front(&source),
        };
        log::debug!("drop of {source}: moved = {moved}");
        moved
    }

    /// Gesture ended, with or without a drop. Never mutates the list.
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
    }

    /// The hover target that should be drawn as a drop zone.
    ///
    /// Hovering over the dragged row or the row right above it is not
    /// highlighted: the first drops nothing and the second is the adjacent
    /// swap, which reads as the row sliding up rather than landing below.
    pub fn highlighted_target(&self, store: &FieldListStore) -> Option<&DropTarget> {
        let DragState::HoverTarget { source, target } = &self.state else {
            return None;
        };
        match target {
            DropTarget::Container => Some(target),
            DropTarget::Field(id) if id == source => None,
            DropTarget::Field(id) => {
                let (Some(s), Some(t)) = (store.index(source), store.index(id)) else {
                    return None;
                };
                (t + 1 != s).then_some(target)
            }
        }
    }
}
