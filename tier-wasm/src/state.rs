use tier_core::{Moved, Outcome, PlacementError, Session};
use web_sys::{Document, Window};

use crate::board::Board;
use crate::config::HostConfig;
use crate::utils::{log, warn};

/// Application state stored behind an `Rc<RefCell<_>>` so it can be shared
/// across the WASM callbacks. Each mounted board owns one.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub config: HostConfig,
    pub board: Board,
    pub session: Session,
    pub exporting: bool,
}

impl State {
    /// Log what an input event did, mirror placements into the DOM, and
    /// re-sync the CSS classes with the session.
    pub fn commit(&mut self, result: Result<Outcome, PlacementError>) {
        match result {
            Ok(outcome) => {
                log(&outcome.to_string());
                // Same-container placements leave the DOM order alone, as
                // they do the model.
                if let Outcome::Placed {
                    item,
                    container,
                    moved: Moved::Moved { .. },
                } = &outcome
                    && let Err(e) = self.board.place(item, container)
                {
                    warn(&format!("Failed to place {item}: {e:?}"));
                }
            }
            Err(e) => warn(&format!("Interaction rejected: {e}")),
        }
        self.sync_marks();
    }

    pub fn sync_marks(&self) {
        if let Err(e) = self.board.apply_marks(&self.session.marks()) {
            warn(&format!("Failed to update classes: {e:?}"));
        }
    }
}
