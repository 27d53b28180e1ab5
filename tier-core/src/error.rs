use crate::placement::{ContainerId, ItemId};

/// Failures reported by the placement model.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("unknown item `{0}`")]
    UnknownItem(ItemId),
    #[error("unknown container `{0}`")]
    UnknownContainer(ContainerId),
    #[error("item `{0}` is registered twice")]
    DuplicateItem(ItemId),
    #[error("container `{0}` is registered twice")]
    DuplicateContainer(ContainerId),
    #[error("no item bank registered")]
    MissingBank,
    #[error("item `{item}` is owned by {owners} containers")]
    Ownership { item: ItemId, owners: usize },
}

/// A broken session invariant, found by `Session::check_invariants`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("item `{0}` is armed and dragged at the same time")]
    ArmedWhileDragging(ItemId),
    #[error("container `{0}` is highlighted while it already holds the dragged item")]
    CandidateIsHome(ContainerId),
    #[error("container `{0}` is highlighted without an active drag")]
    CandidateWithoutDrag(ContainerId),
}
