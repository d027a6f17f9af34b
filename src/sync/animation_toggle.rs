use serde_with::SerializeDisplay;

use crate::codec::{AnimationKind, AnimationMode};

/// What the mode selector shows: a preset, or dream mode for any other code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, derive_more::Display, SerializeDisplay)]
pub enum AnimationSelection {
    #[display("{_0}")]
    Preset(AnimationMode),
    #[display("DREAM_MODE")]
    Dream,
}

impl AnimationSelection {
    /// Classifies the device's current animation.
    #[must_use]
    pub fn from_kind(kind: AnimationKind) -> Self {
        match kind {
            AnimationKind::Preset(mode) => Self::Preset(mode),
            AnimationKind::Dream { .. } => Self::Dream,
        }
    }
}

/// Outcome of an animation on/off request.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum ToggleDecision {
    AlreadyActive,
    AlreadyInactive,
    Start,
    Stop,
}

/// Decides whether an animation on/off request needs a device write.
///
/// A request is dropped only when the local flag and the last known device
/// mode both already agree with it. If either disagrees, for example after
/// the mode was changed from another app, the request goes through.
/// `device_animated` is `None` when no status has been read yet.
pub(crate) fn decide(requested: bool, device_animated: Option<bool>, flag: bool) -> ToggleDecision {
    match (requested, device_animated) {
        (true, Some(true)) if flag => ToggleDecision::AlreadyActive,
        (false, Some(false)) if !flag => ToggleDecision::AlreadyInactive,
        (true, _) => ToggleDecision::Start,
        (false, _) => ToggleDecision::Stop,
    }
}

impl ToggleDecision {
    pub(crate) fn writes(self) -> bool {
        matches!(self, Self::Start | Self::Stop)
    }
}
