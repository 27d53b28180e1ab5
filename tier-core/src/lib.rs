//! Placement state and input modalities for a tier list board.
//!
//! Items live in exactly one container at a time. They are moved either by
//! tapping an item then a container, or by dragging. [`Session`] owns the
//! [`PlacementModel`] and keeps the two modalities mutually exclusive.

pub mod drag;
pub mod error;
pub mod placement;
pub mod selection;
pub mod session;

pub use drag::{DragController, DropOutcome, Hover};
pub use error::{InvariantError, PlacementError};
pub use placement::{ContainerId, ItemId, Moved, PlacementModel};
pub use selection::{ItemTap, Selection};
pub use session::{Ignored, Marks, Outcome, Session};
