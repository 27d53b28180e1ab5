use std::fmt;

use crate::drag::{DragController, DropOutcome, Hover};
use crate::error::{InvariantError, PlacementError};
use crate::placement::{ContainerId, ItemId, Moved, PlacementModel};
use crate::selection::{ItemTap, Selection};

/// What an input event did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Armed { item: ItemId, replaced: Option<ItemId> },
    Disarmed(ItemId),
    Placed { item: ItemId, container: ContainerId, moved: Moved },
    DragStarted { item: ItemId, disarmed: Option<ItemId> },
    MarkRevealed(ItemId),
    Candidate(ContainerId),
    CandidateCleared(ContainerId),
    DragEnded(ItemId),
    Ignored(Ignored),
}

/// Reasons an event left the session untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    NothingArmed,
    NotDragging,
    ItemBeingDragged,
    HomeContainer,
    StaleMark,
    StillInside,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ignored::NothingArmed => "no item selected",
            Ignored::NotDragging => "no active dragged item",
            Ignored::ItemBeingDragged => "item is being dragged",
            Ignored::HomeContainer => "container already holds the item",
            Ignored::StaleMark => "drag already finished",
            Ignored::StillInside => "pointer still inside container",
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Armed { item, replaced: None } => write!(f, "Item selected: {item}"),
            Outcome::Armed {
                item,
                replaced: Some(old),
            } => write!(f, "Item selected: {item} (replaces {old})"),
            Outcome::Disarmed(item) => write!(f, "Selection cleared: {item}"),
            Outcome::Placed {
                item,
                container,
                moved: Moved::Unchanged,
            } => write!(f, "Placed {item} back into same zone: {container}"),
            Outcome::Placed {
                item,
                container,
                moved: Moved::Moved { from },
            } => write!(f, "Placed {item}: {from} -> {container}"),
            Outcome::DragStarted { item, .. } => write!(f, "Drag start: {item}"),
            Outcome::MarkRevealed(item) => write!(f, "Dragging: {item}"),
            Outcome::Candidate(c) => write!(f, "Drop candidate: {c}"),
            Outcome::CandidateCleared(c) => write!(f, "Drop candidate cleared: {c}"),
            Outcome::DragEnded(item) => write!(f, "Drag end: {item}"),
            Outcome::Ignored(why) => write!(f, "Ignored: {why}"),
        }
    }
}

/// Visual state derived from the session, projected onto CSS classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Marks<'a> {
    pub armed: Option<&'a ItemId>,
    pub dragging: Option<&'a ItemId>,
    pub candidate: Option<&'a ContainerId>,
}

/// One interaction session: the placement model plus both input modalities.
///
/// Each modality clears the other when it activates, so an item is never
/// armed and dragged at once.
#[derive(Clone, Debug)]
pub struct Session {
    model: PlacementModel,
    selection: Selection,
    drag: DragController,
}

impl Session {
    pub fn new(model: PlacementModel) -> Self {
        Session {
            model,
            selection: Selection::default(),
            drag: DragController::default(),
        }
    }

    pub fn model(&self) -> &PlacementModel {
        &self.model
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn marks(&self) -> Marks<'_> {
        Marks {
            armed: self.selection.armed(),
            dragging: self.drag.marked(),
            candidate: self.drag.candidate(),
        }
    }

    pub fn tap_item(&mut self, item: &ItemId) -> Result<Outcome, PlacementError> {
        if !self.model.contains_item(item) {
            return Err(PlacementError::UnknownItem(item.clone()));
        }
        if self.drag.dragging() == Some(item) {
            return Ok(Outcome::Ignored(Ignored::ItemBeingDragged));
        }
        Ok(match self.selection.tap_item(item) {
            ItemTap::Armed { replaced } => Outcome::Armed {
                item: item.clone(),
                replaced,
            },
            ItemTap::Disarmed => Outcome::Disarmed(item.clone()),
        })
    }

    pub fn tap_container(&mut self, container: &ContainerId) -> Result<Outcome, PlacementError> {
        match self.selection.tap_container(&mut self.model, container)? {
            Some((item, moved)) => Ok(Outcome::Placed {
                item,
                container: container.clone(),
                moved,
            }),
            None => Ok(Outcome::Ignored(Ignored::NothingArmed)),
        }
    }

    /// Drag wins over tap: any armed item is disarmed first.
    pub fn drag_start(&mut self, item: ItemId) -> Result<Outcome, PlacementError> {
        if !self.model.contains_item(&item) {
            return Err(PlacementError::UnknownItem(item));
        }
        let disarmed = self.selection.clear();
        self.drag.start(item.clone());
        Ok(Outcome::DragStarted { item, disarmed })
    }

    pub fn reveal_drag_mark(&mut self, item: &ItemId) -> Outcome {
        if self.drag.reveal_mark(item) {
            Outcome::MarkRevealed(item.clone())
        } else {
            Outcome::Ignored(Ignored::StaleMark)
        }
    }

    pub fn drag_over(&mut self, container: &ContainerId) -> Outcome {
        match self.drag.hover(&self.model, container) {
            Hover::Candidate => Outcome::Candidate(container.clone()),
            Hover::Home => Outcome::Ignored(Ignored::HomeContainer),
            Hover::NotDragging => Outcome::Ignored(Ignored::NotDragging),
        }
    }

    pub fn drag_leave(&mut self, container: &ContainerId, left: bool) -> Outcome {
        if self.drag.leave(container, left) {
            Outcome::CandidateCleared(container.clone())
        } else {
            Outcome::Ignored(Ignored::StillInside)
        }
    }

    pub fn drop_on(&mut self, container: &ContainerId) -> Result<Outcome, PlacementError> {
        let outcome = match self.drag.drop_on(&mut self.model, container)? {
            DropOutcome::Dropped { item, moved } => Outcome::Placed {
                item,
                container: container.clone(),
                moved,
            },
            DropOutcome::Ignored => Outcome::Ignored(Ignored::NotDragging),
        };
        self.selection.clear();
        Ok(outcome)
    }

    pub fn drag_end(&mut self) -> Outcome {
        match self.drag.end() {
            Some(item) => Outcome::DragEnded(item),
            None => Outcome::Ignored(Ignored::NotDragging),
        }
    }

    pub fn clear_selection(&mut self) -> Option<ItemId> {
        self.selection.clear()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.model.check_invariant()?;
        let dragging = self.drag.dragging();
        if let (Some(armed), Some(dragged)) = (self.selection.armed(), dragging)
            && armed == dragged
        {
            return Err(InvariantError::ArmedWhileDragging(armed.clone()));
        }
        if let Some(candidate) = self.drag.candidate() {
            let Some(item) = dragging else {
                return Err(InvariantError::CandidateWithoutDrag(candidate.clone()));
            };
            if self.model.container_of(item) == Some(candidate) {
                return Err(InvariantError::CandidateIsHome(candidate.clone()));
            }
        }
        Ok(())
    }
}
