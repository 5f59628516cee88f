//! Tweener Core
//!
//! Time-driven interpolation of numeric targets.
//!
//! # Features
//!
//! - **Registry**: one slot per animated target, deduplicated by identity
//! - **Slots**: FIFO tween queues configured through a fluent builder
//! - **State Machine**: idle → delaying → running → finished, with start,
//!   step and finish callbacks
//! - **Timing Strategies**: single pass, repeat, and ping-pong playback
//! - **Easing**: Penner-style curve catalog plus cubic bezier
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tweener_core::{Easing, Timing, TweenRegistry};
//!
//! let mut registry = TweenRegistry::new();
//! let x = Rc::new(Cell::new(2.0f64));
//!
//! registry
//!     .animate(&x)
//!     .unwrap()
//!     .begin(1.0, 6.0)
//!     .easing(Easing::Linear)
//!     .timing(Timing::once())
//!     .commit();
//!
//! registry.update(0.0);
//! registry.update(1.0);
//! assert_eq!(x.get(), 6.0);
//! ```

pub mod animation;
pub mod config;
pub mod easing;
pub mod error;
pub mod registry;
pub mod slot;
pub mod target;
pub mod timing;
pub mod values;

pub use animation::{Animation, AnimationState, Callback};
pub use config::TweenDefaults;
pub use easing::{Easing, UnknownEasing};
pub use error::{Result, TweenError};
pub use registry::{Deferred, Handle, SlotId, TweenRegistry};
pub use slot::Slot;
pub use target::{SetterTarget, TargetKey, TweenTarget, VarTarget};
pub use timing::{Playback, Progress, Timing, TimingStrategy, PING_PONG_EPSILON, REPEAT_EPSILON};
pub use values::Tweenable;
