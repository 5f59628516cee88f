//! Registry-wide tween defaults

use crate::easing::Easing;
use crate::timing::Playback;

/// Defaults applied by [`Slot::begin`](crate::Slot::begin)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TweenDefaults {
    /// Curve for tweens that never call `easing()`
    pub easing: Easing,
    /// Playback for tweens that never call `timing()`
    pub playback: Playback,
}

impl TweenDefaults {
    pub fn new(easing: Easing, playback: Playback) -> Self {
        Self { easing, playback }
    }

    /// Builder: set the default easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: set the default playback
    pub fn with_playback(mut self, playback: Playback) -> Self {
        self.playback = playback;
        self
    }
}
