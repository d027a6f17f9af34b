//! Cached device state with polling, staleness and write arbitration.

mod animation_toggle;
mod colour_edit;
mod engine;
mod layout;

pub use self::animation_toggle::AnimationSelection;
pub use self::engine::{CachedStatus, Freshness, SyncEngine};
pub use self::layout::LayoutChange;
