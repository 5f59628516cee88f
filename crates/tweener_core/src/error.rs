//! Tween error types

use thiserror::Error;

/// Errors surfaced at the registry/slot boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TweenError {
    /// The animation already captured its beginning value
    #[error("animation already started; its final value is frozen")]
    AlreadyStarted,

    /// A handle or target resolved to a slot of another element type
    #[error("slot element type mismatch: expected {expected}")]
    TargetTypeMismatch { expected: &'static str },

    /// The handle does not refer to a live slot
    #[error("unknown slot handle")]
    UnknownSlot,
}

/// Result type for tween operations
pub type Result<T> = std::result::Result<T, TweenError>;
