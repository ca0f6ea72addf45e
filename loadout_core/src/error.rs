use gear_core::{ItemId, SlotId};
use thiserror::Error;

/// Malformed build input, or a run that died
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Unknown slot '{slot}' referenced by {context}")]
    UnknownSlot { slot: SlotId, context: &'static str },
    #[error("Locked item '{item}' is not in the '{slot}' pool")]
    UnknownItem { slot: SlotId, item: ItemId },
    #[error("Item '{item}' belongs to '{belongs_to}' but was placed in the '{slot}' pool")]
    MisplacedItem {
        slot: SlotId,
        item: ItemId,
        belongs_to: SlotId,
    },
    #[error("Build {generation} panicked: {message}")]
    RunPanicked { generation: u64, message: String },
}
