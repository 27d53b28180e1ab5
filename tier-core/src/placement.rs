use std::collections::HashMap;
use std::fmt;

use crate::error::PlacementError;

/// Stable identity of an item, taken from the host's `data-id` attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(v: &str) -> Self {
        ItemId::new(v)
    }
}

/// A dropzone, or the catch-all bank holding unranked items.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Bank,
    Zone(String),
}

impl ContainerId {
    pub fn zone(id: impl Into<String>) -> Self {
        ContainerId::Zone(id.into())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Bank => f.write_str("item-bank"),
            ContainerId::Zone(id) => f.write_str(id),
        }
    }
}

/// Result of a successful `move_item`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Moved {
    /// The item already lived in the target; nothing changed.
    Unchanged,
    Moved { from: ContainerId },
}

/// Authoritative item → container assignment.
///
/// Containers keep their items in placement order: the most recently placed
/// item is last. `owner` indexes into `containers` and is only ever updated
/// together with the collections, inside a single `&mut self` call.
#[derive(Clone, Debug)]
pub struct PlacementModel {
    containers: Vec<(ContainerId, Vec<ItemId>)>,
    owner: HashMap<ItemId, usize>,
}

impl PlacementModel {
    /// Register containers in display order. One of them must be the bank.
    pub fn new(containers: impl IntoIterator<Item = ContainerId>) -> Result<Self, PlacementError> {
        let mut list: Vec<(ContainerId, Vec<ItemId>)> = Vec::new();
        for id in containers {
            if list.iter().any(|(c, _)| *c == id) {
                return Err(PlacementError::DuplicateContainer(id));
            }
            list.push((id, Vec::new()));
        }
        if !list.iter().any(|(c, _)| *c == ContainerId::Bank) {
            return Err(PlacementError::MissingBank);
        }
        Ok(PlacementModel {
            containers: list,
            owner: HashMap::new(),
        })
    }

    /// Register an item at session start, appended to `container`.
    pub fn insert(&mut self, item: ItemId, container: &ContainerId) -> Result<(), PlacementError> {
        if self.owner.contains_key(&item) {
            return Err(PlacementError::DuplicateItem(item));
        }
        let idx = self.index_of(container)?;
        self.containers[idx].1.push(item.clone());
        self.owner.insert(item, idx);
        Ok(())
    }

    /// Move `item` to the end of `target`. Moving into the current container
    /// is a no-op: the item is neither duplicated nor reordered.
    pub fn move_item(&mut self, item: &ItemId, target: &ContainerId) -> Result<Moved, PlacementError> {
        let from = *self
            .owner
            .get(item)
            .ok_or_else(|| PlacementError::UnknownItem(item.clone()))?;
        let to = self.index_of(target)?;
        if from == to {
            return Ok(Moved::Unchanged);
        }
        let src = &mut self.containers[from].1;
        if let Some(pos) = src.iter().position(|i| i == item) {
            src.remove(pos);
        }
        self.containers[to].1.push(item.clone());
        self.owner.insert(item.clone(), to);
        Ok(Moved::Moved {
            from: self.containers[from].0.clone(),
        })
    }

    pub fn container_of(&self, item: &ItemId) -> Option<&ContainerId> {
        self.owner.get(item).map(|&idx| &self.containers[idx].0)
    }

    pub fn items_in(&self, container: &ContainerId) -> Option<&[ItemId]> {
        self.containers
            .iter()
            .find(|(c, _)| c == container)
            .map(|(_, items)| items.as_slice())
    }

    pub fn contains_item(&self, item: &ItemId) -> bool {
        self.owner.contains_key(item)
    }

    pub fn containers(&self) -> impl Iterator<Item = &ContainerId> {
        self.containers.iter().map(|(c, _)| c)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.containers.iter().flat_map(|(_, items)| items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.owner.len()
    }

    /// Verify that every item is owned by exactly one container and that the
    /// ownership index agrees with the collections.
    pub fn check_invariant(&self) -> Result<(), PlacementError> {
        let mut seen: HashMap<&ItemId, usize> = HashMap::new();
        for (idx, (_, items)) in self.containers.iter().enumerate() {
            for item in items {
                *seen.entry(item).or_default() += 1;
                if self.owner.get(item) != Some(&idx) {
                    return Err(PlacementError::Ownership {
                        item: item.clone(),
                        owners: 0,
                    });
                }
            }
        }
        for (item, owners) in &seen {
            if *owners != 1 {
                return Err(PlacementError::Ownership {
                    item: (*item).clone(),
                    owners: *owners,
                });
            }
        }
        if let Some(orphan) = self.owner.keys().find(|i| !seen.contains_key(i)) {
            return Err(PlacementError::Ownership {
                item: orphan.clone(),
                owners: 0,
            });
        }
        Ok(())
    }

    fn index_of(&self, container: &ContainerId) -> Result<usize, PlacementError> {
        self.containers
            .iter()
            .position(|(c, _)| c == container)
            .ok_or_else(|| PlacementError::UnknownContainer(container.clone()))
    }
}
