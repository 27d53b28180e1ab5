use crate::error::PlacementError;
use crate::placement::{ContainerId, ItemId, Moved, PlacementModel};

/// Tap-to-select, tap-to-place modality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Armed(ItemId),
}

/// What a tap on an item did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemTap {
    Armed { replaced: Option<ItemId> },
    Disarmed,
}

impl Selection {
    pub fn armed(&self) -> Option<&ItemId> {
        match self {
            Selection::Idle => None,
            Selection::Armed(item) => Some(item),
        }
    }

    /// Arm `item`, or disarm it when it is already armed. Arming a second
    /// item replaces the first; selections never stack.
    pub fn tap_item(&mut self, item: &ItemId) -> ItemTap {
        match std::mem::take(self) {
            Selection::Armed(current) if current == *item => ItemTap::Disarmed,
            previous => {
                *self = Selection::Armed(item.clone());
                ItemTap::Armed {
                    replaced: match previous {
                        Selection::Armed(old) => Some(old),
                        Selection::Idle => None,
                    },
                }
            }
        }
    }

    /// Place the armed item into `container`. Returns `None` when nothing is
    /// armed. The selection is cleared even if the move is rejected.
    pub fn tap_container(
        &mut self,
        model: &mut PlacementModel,
        container: &ContainerId,
    ) -> Result<Option<(ItemId, Moved)>, PlacementError> {
        let Some(item) = self.clear() else {
            return Ok(None);
        };
        let moved = model.move_item(&item, container)?;
        Ok(Some((item, moved)))
    }

    /// Return to `Idle`, yielding the previously armed item.
    pub fn clear(&mut self) -> Option<ItemId> {
        match std::mem::take(self) {
            Selection::Armed(item) => Some(item),
            Selection::Idle => None,
        }
    }
}
