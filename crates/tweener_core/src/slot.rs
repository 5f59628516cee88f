//! Per-target animation queues
//!
//! A [`Slot`] owns the target and a FIFO queue of tweens for it. Only the
//! queue head receives updates. New tweens are built through a fluent
//! protocol: `begin` creates a pending tween, the chainable setters configure
//! it, and `commit` appends it to the queue.
//!
//! ```ignore
//! registry
//!     .animate(&x)?
//!     .begin(0.5, 6.0)
//!     .easing(Easing::EaseOutExpo)
//!     .timing(Timing::ping_pong(1))
//!     .on_finish(|| println!("done"))
//!     .commit();
//! ```

use crate::animation::Animation;
use crate::config::TweenDefaults;
use crate::easing::Easing;
use crate::target::{TargetKey, TweenTarget};
use crate::timing::TimingStrategy;
use crate::values::Tweenable;
use std::collections::VecDeque;

/// One target's tween queue
pub struct Slot<T: Tweenable> {
    target: Box<dyn TweenTarget<T>>,
    queue: VecDeque<Animation<T>>,
    pending: Option<Animation<T>>,
    paused: bool,
    defaults: TweenDefaults,
}

impl<T: Tweenable> Slot<T> {
    pub fn new(target: Box<dyn TweenTarget<T>>, defaults: TweenDefaults) -> Self {
        Self {
            target,
            queue: VecDeque::new(),
            pending: None,
            paused: false,
            defaults,
        }
    }

    // ========================================================================
    // Fluent configuration
    // ========================================================================

    /// Start configuring a tween toward `final_value`
    ///
    /// The tween begins from whatever the target holds when it starts. A
    /// pending tween that was never committed is discarded.
    pub fn begin(&mut self, duration: f64, final_value: T) -> &mut Self {
        if self.pending.is_some() {
            tracing::debug!("Discarding uncommitted pending animation");
        }
        self.pending = Some(
            Animation::new(duration, final_value)
                .with_easing(self.defaults.easing)
                .with_timing(self.defaults.playback.timing()),
        );
        self
    }

    /// Start configuring a tween from `from` to `final_value`
    pub fn begin_from(&mut self, duration: f64, from: T, final_value: T) -> &mut Self {
        self.begin(duration, final_value);
        self.with_pending("begin_from", |anim| anim.set_from(from))
    }

    pub fn easing(&mut self, easing: Easing) -> &mut Self {
        self.with_pending("easing", |anim| anim.set_easing(easing))
    }

    pub fn timing<S: TimingStrategy + 'static>(&mut self, timing: S) -> &mut Self {
        self.with_pending("timing", move |anim| anim.set_timing(timing))
    }

    pub fn duration(&mut self, duration: f64) -> &mut Self {
        self.with_pending("duration", |anim| anim.set_duration(duration))
    }

    pub fn delay(&mut self, delay: f64) -> &mut Self {
        self.with_pending("delay", |anim| anim.set_delay(delay))
    }

    pub fn final_value(&mut self, final_value: T) -> &mut Self {
        self.with_pending("final_value", |anim| {
            if let Err(err) = anim.set_final_value(final_value) {
                tracing::warn!("Ignoring final value {:?}: {}", final_value, err);
            }
        })
    }

    /// Fires once, on the start transition, before the first write
    pub fn on_start<F: FnMut() + 'static>(&mut self, callback: F) -> &mut Self {
        self.with_pending("on_start", move |anim| anim.set_on_start(callback))
    }

    /// Fires after every write
    pub fn on_step<F: FnMut() + 'static>(&mut self, callback: F) -> &mut Self {
        self.with_pending("on_step", move |anim| anim.set_on_step(callback))
    }

    /// Fires once, after the final write
    pub fn on_finish<F: FnMut() + 'static>(&mut self, callback: F) -> &mut Self {
        self.with_pending("on_finish", move |anim| anim.set_on_finish(callback))
    }

    /// Like [`on_finish`](Self::on_finish), binding an argument for the callback
    pub fn on_finish_with<A, F>(&mut self, arg: A, mut callback: F) -> &mut Self
    where
        A: 'static,
        F: FnMut(&A) + 'static,
    {
        self.on_finish(move || callback(&arg))
    }

    /// Append the pending tween to the queue
    pub fn commit(&mut self) -> &mut Self {
        match self.pending.take() {
            Some(anim) => {
                tracing::trace!("Queued {:?} at position {}", anim, self.queue.len());
                self.queue.push_back(anim);
            }
            None => tracing::warn!("commit() called without a pending animation"),
        }
        self
    }

    /// Append a fully specified tween, bypassing the pending tween
    pub fn commit_with<S: TimingStrategy + 'static>(
        &mut self,
        duration: f64,
        final_value: T,
        easing: Easing,
        timing: S,
    ) -> &mut Self {
        self.queue.push_back(
            Animation::new(duration, final_value)
                .with_easing(easing)
                .with_timing(timing),
        );
        self
    }

    /// Append an already built tween
    pub fn push(&mut self, animation: Animation<T>) -> &mut Self {
        self.queue.push_back(animation);
        self
    }

    fn with_pending(
        &mut self,
        op: &'static str,
        configure: impl FnOnce(&mut Animation<T>),
    ) -> &mut Self {
        match self.pending.as_mut() {
            Some(anim) => configure(anim),
            None => tracing::warn!(
                "{}() called without a pending animation; call begin() first",
                op
            ),
        }
        self
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Advance the queue head to `time`
    ///
    /// A head that completes is retired in the same call. The next tween only
    /// receives updates from the following call on.
    pub fn update(&mut self, time: f64) {
        if self.paused {
            return;
        }

        let Some(head) = self.queue.front_mut() else {
            return;
        };

        head.update(time, self.target.as_mut());

        if head.is_complete() {
            self.queue.pop_front();
            tracing::trace!("Retired animation, {} remaining", self.queue.len());
        }
    }

    /// Suppress updates until [`play`](Self::play)
    pub fn pause(&mut self) -> &mut Self {
        self.paused = true;
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.paused = false;
        self
    }

    /// Drop every queued tween; no finish callback fires
    pub fn stop(&mut self) -> &mut Self {
        if !self.queue.is_empty() {
            tracing::debug!("Stopping {} queued animation(s)", self.queue.len());
            self.queue.clear();
        }
        self
    }

    /// Turn the queue head around (see [`Animation::reverse`])
    pub fn reverse(&mut self) -> &mut Self {
        let current = self.target.current();
        if let Some(head) = self.queue.front_mut() {
            head.reverse(current);
        }
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The tween currently receiving updates
    pub fn current_animation(&self) -> Option<&Animation<T>> {
        self.queue.front()
    }

    pub fn current_animation_mut(&mut self) -> Option<&mut Animation<T>> {
        self.queue.front_mut()
    }

    /// The tween being configured, not yet committed
    pub fn pending(&self) -> Option<&Animation<T>> {
        self.pending.as_ref()
    }

    /// Queued tweens in playback order
    pub fn animations(&self) -> impl Iterator<Item = &Animation<T>> {
        self.queue.iter()
    }

    pub fn is_animating(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn key(&self) -> TargetKey {
        self.target.key()
    }

    pub fn defaults(&self) -> TweenDefaults {
        self.defaults
    }

    pub fn set_defaults(&mut self, defaults: TweenDefaults) {
        self.defaults = defaults;
    }
}
