/// CSS classes mirrored from the interaction session.
pub const SELECTED_CLASS: &str = "item-selected";
pub const DRAGGING_CLASS: &str = "dragging";
pub const CANDIDATE_CLASS: &str = "drag-over";
/// Attribute tagging the off-screen snapshot copy.
pub const SNAPSHOT_COPY_ATTR: &str = "data-snapshot-copy";
/// Host global holding configuration overrides.
pub const HOST_CONFIG_GLOBAL: &str = "__TIER_LIST_CONFIG";
pub const EXPORT_FAILED_MESSAGE: &str = "Sorry, something went wrong while saving the image.";
