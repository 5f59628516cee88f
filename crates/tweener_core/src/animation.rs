//! Tween animations
//!
//! An [`Animation`] is one in-flight tween. It moves through
//! `Idle → Delaying → Running → Finished`, where `Delaying` is skipped when
//! no delay is configured. The beginning value is captured on the start
//! transition, not at construction, so a tween queued far ahead still starts
//! from whatever the target holds when it actually begins.

use crate::easing::Easing;
use crate::error::{Result, TweenError};
use crate::target::TweenTarget;
use crate::timing::{Timing, TimingStrategy};
use crate::values::Tweenable;
use std::fmt;

/// A lifecycle callback
pub type Callback = Box<dyn FnMut()>;

/// Public view of an animation's lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Delaying,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug)]
enum Phase<T> {
    Idle,
    Delaying {
        until: f64,
    },
    Running {
        start: f64,
        beginning: T,
        change: T,
    },
    Finished,
}

/// One tween from a beginning value to a final value
pub struct Animation<T: Tweenable> {
    phase: Phase<T>,
    duration: f64,
    delay: f64,
    /// Explicit beginning; `None` reads the target at start
    from: Option<T>,
    final_value: T,
    easing: Easing,
    timing: Box<dyn TimingStrategy>,
    on_start: Option<Callback>,
    on_step: Option<Callback>,
    on_finish: Option<Callback>,
}

impl<T: Tweenable> Animation<T> {
    /// Create a linear single-pass tween
    pub fn new(duration: f64, final_value: T) -> Self {
        Self {
            phase: Phase::Idle,
            duration,
            delay: 0.0,
            from: None,
            final_value,
            easing: Easing::Linear,
            timing: Box::new(Timing::once()),
            on_start: None,
            on_step: None,
            on_finish: None,
        }
    }

    /// Builder: start from `from` instead of the target's current value
    pub fn with_from(mut self, from: T) -> Self {
        self.from = Some(from);
        self
    }

    /// Builder: set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: set the timing strategy
    pub fn with_timing<S: TimingStrategy + 'static>(mut self, timing: S) -> Self {
        self.timing = Box::new(timing);
        self
    }

    /// Builder: set the delay before the tween starts
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn set_timing<S: TimingStrategy + 'static>(&mut self, timing: S) {
        self.timing = Box::new(timing);
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn set_delay(&mut self, delay: f64) {
        self.delay = delay;
    }

    pub fn set_from(&mut self, from: T) {
        self.from = Some(from);
    }

    /// Change the final value
    ///
    /// Honored until the tween starts. Once `beginning` and `change` are
    /// captured the tween is frozen and this returns
    /// [`TweenError::AlreadyStarted`].
    pub fn set_final_value(&mut self, final_value: T) -> Result<()> {
        match self.phase {
            Phase::Idle | Phase::Delaying { .. } => {
                self.final_value = final_value;
                Ok(())
            }
            Phase::Running { .. } | Phase::Finished => Err(TweenError::AlreadyStarted),
        }
    }

    pub fn set_on_start<F: FnMut() + 'static>(&mut self, callback: F) {
        self.on_start = Some(Box::new(callback));
    }

    pub fn set_on_step<F: FnMut() + 'static>(&mut self, callback: F) {
        self.on_step = Some(Box::new(callback));
    }

    pub fn set_on_finish<F: FnMut() + 'static>(&mut self, callback: F) {
        self.on_finish = Some(Box::new(callback));
    }

    pub fn state(&self) -> AnimationState {
        match self.phase {
            Phase::Idle => AnimationState::Idle,
            Phase::Delaying { .. } => AnimationState::Delaying,
            Phase::Running { .. } => AnimationState::Running,
            Phase::Finished => AnimationState::Finished,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self.phase, Phase::Running { .. } | Phase::Finished)
    }

    pub fn is_delaying(&self) -> bool {
        matches!(self.phase, Phase::Delaying { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn final_value(&self) -> T {
        self.final_value
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Beginning value, known once the tween has started
    pub fn beginning(&self) -> Option<T> {
        match self.phase {
            Phase::Running { beginning, .. } => Some(beginning),
            _ => None,
        }
    }

    /// Total change, known once the tween has started
    pub fn change(&self) -> Option<T> {
        match self.phase {
            Phase::Running { change, .. } => Some(change),
            _ => None,
        }
    }

    /// Time of the start transition
    pub fn start_time(&self) -> Option<f64> {
        match self.phase {
            Phase::Running { start, .. } => Some(start),
            _ => None,
        }
    }

    /// Advance the tween to `time`, writing into `target`
    ///
    /// Callback order within one tick is fixed: start (first running tick
    /// only), value write, step, finish (final tick only).
    pub fn update(&mut self, time: f64, target: &mut dyn TweenTarget<T>) {
        match self.phase {
            Phase::Finished => return,
            Phase::Idle if self.delay > 0.0 => {
                self.phase = Phase::Delaying {
                    until: time + self.delay,
                };
                tracing::trace!("Animation delaying until {}", time + self.delay);
                return;
            }
            Phase::Delaying { until } if time < until => return,
            Phase::Idle | Phase::Delaying { .. } => self.start(time, &*target),
            Phase::Running { .. } => {}
        }

        let Phase::Running {
            start,
            beginning,
            change,
        } = self.phase
        else {
            return;
        };

        let progress = self.timing.advance(time, start, self.duration);
        let value = self.easing.curve(progress.value, beginning, change, 1.0);
        target.apply(value);

        if let Some(on_step) = self.on_step.as_mut() {
            on_step();
        }

        if progress.finished {
            self.phase = Phase::Finished;
            tracing::trace!("Animation finished at {} with {:?}", time, value);
            if let Some(on_finish) = self.on_finish.as_mut() {
                on_finish();
            }
        }
    }

    fn start(&mut self, time: f64, target: &dyn TweenTarget<T>) {
        let beginning = self
            .from
            .or_else(|| target.current())
            .unwrap_or_else(T::zero);
        let change = self.final_value.difference(beginning);

        self.phase = Phase::Running {
            start: time,
            beginning,
            change,
        };
        tracing::trace!(
            "Animation started at {}: {:?} -> {:?}",
            time,
            beginning,
            self.final_value
        );

        if let Some(on_start) = self.on_start.as_mut() {
            on_start();
        }
    }

    /// Turn the tween around
    ///
    /// A running tween restarts toward its original beginning, starting from
    /// `current` (or the target's value at restart when `None`); the start
    /// callback fires again and the delay is not re-applied. A tween that has
    /// not started swaps its beginning and final values. Finished tweens are
    /// left alone.
    pub fn reverse(&mut self, current: Option<T>) {
        match self.phase {
            Phase::Running { beginning, .. } => {
                self.from = current;
                self.final_value = beginning;
                self.delay = 0.0;
                self.timing.reset();
                self.phase = Phase::Idle;
            }
            Phase::Idle | Phase::Delaying { .. } => {
                let from = self.from.or(current).unwrap_or_else(T::zero);
                self.from = Some(self.final_value);
                self.final_value = from;
            }
            Phase::Finished => {}
        }
    }
}

impl<T: Tweenable> fmt::Debug for Animation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("state", &self.state())
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("from", &self.from)
            .field("final_value", &self.final_value)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}
