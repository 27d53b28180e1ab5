use crate::error::PlacementError;
use crate::placement::{ContainerId, ItemId, Moved, PlacementModel};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    /// `marked` turns on one tick after drag-start, so the platform's drag
    /// image is taken from the undecorated item.
    Dragging { item: ItemId, marked: bool },
}

/// How a drag-over/drag-enter was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hover {
    Candidate,
    /// The container already holds the dragged item.
    Home,
    NotDragging,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag in flight, or the dragged item is no longer known.
    Ignored,
    Dropped { item: ItemId, moved: Moved },
}

/// Pointer drag-and-drop modality.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
    candidate: Option<ContainerId>,
}

impl DragController {
    pub fn dragging(&self) -> Option<&ItemId> {
        match &self.state {
            DragState::Dragging { item, .. } => Some(item),
            DragState::Idle => None,
        }
    }

    /// The item that currently shows the "dragging" mark.
    pub fn marked(&self) -> Option<&ItemId> {
        match &self.state {
            DragState::Dragging { item, marked: true } => Some(item),
            _ => None,
        }
    }

    pub fn candidate(&self) -> Option<&ContainerId> {
        self.candidate.as_ref()
    }

    /// Begin dragging `item`. A drag left over from a missed drag-end is
    /// replaced and returned.
    pub fn start(&mut self, item: ItemId) -> Option<ItemId> {
        let previous = match std::mem::take(&mut self.state) {
            DragState::Dragging { item, .. } => Some(item),
            DragState::Idle => None,
        };
        self.candidate = None;
        self.state = DragState::Dragging { item, marked: false };
        previous
    }

    /// Apply the deferred "dragging" mark, only if `item` is still the one
    /// being dragged.
    pub fn reveal_mark(&mut self, item: &ItemId) -> bool {
        match &mut self.state {
            DragState::Dragging { item: current, marked } if current == item => {
                *marked = true;
                true
            }
            _ => false,
        }
    }

    pub fn hover(&mut self, model: &PlacementModel, container: &ContainerId) -> Hover {
        let Some(item) = self.dragging() else {
            return Hover::NotDragging;
        };
        if model.container_of(item) == Some(container) {
            return Hover::Home;
        }
        self.candidate = Some(container.clone());
        Hover::Candidate
    }

    /// Clear the candidate mark on `container`. Callers pass `left = false`
    /// for leave events that only crossed into one of its descendants.
    pub fn leave(&mut self, container: &ContainerId, left: bool) -> bool {
        if left && self.candidate.as_ref() == Some(container) {
            self.candidate = None;
            true
        } else {
            false
        }
    }

    /// Drop the dragged item into `container`. The drag stays active (with
    /// its mark removed) until `end` is called.
    pub fn drop_on(
        &mut self,
        model: &mut PlacementModel,
        container: &ContainerId,
    ) -> Result<DropOutcome, PlacementError> {
        self.candidate = None;
        let item = match &mut self.state {
            DragState::Dragging { item, marked } => {
                *marked = false;
                item.clone()
            }
            DragState::Idle => return Ok(DropOutcome::Ignored),
        };
        match model.move_item(&item, container) {
            Ok(moved) => Ok(DropOutcome::Dropped { item, moved }),
            Err(PlacementError::UnknownItem(_)) => Ok(DropOutcome::Ignored),
            Err(e) => Err(e),
        }
    }

    /// Finish the drag, whatever its outcome. Safe to call when idle.
    pub fn end(&mut self) -> Option<ItemId> {
        self.candidate = None;
        match std::mem::take(&mut self.state) {
            DragState::Dragging { item, .. } => Some(item),
            DragState::Idle => None,
        }
    }
}
