//! Timing strategies
//!
//! A timing strategy maps elapsed time to normalized progress and decides
//! when a tween is complete. Looping strategies keep lap counters, so each
//! animation owns its own instance.

/// Tolerance used when detecting a repeat lap boundary
pub const REPEAT_EPSILON: f64 = 1e-7;

/// Tolerance used when detecting ping-pong completion
///
/// Completion is approximate: a frame landing within `PING_PONG_EPSILON`
/// cycles before the final return is treated as the return itself, so the
/// tween may finish up to `PING_PONG_EPSILON * duration` early. A frame that
/// lands past the return always completes, so large or irregular steps never
/// miss completion.
pub const PING_PONG_EPSILON: f64 = 1e-5;

/// Result of advancing a timing strategy
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Normalized progress handed to the easing curve
    pub value: f64,
    /// Set on the call where the tween should be considered complete
    pub finished: bool,
}

impl Progress {
    pub fn running(value: f64) -> Self {
        Self {
            value,
            finished: false,
        }
    }

    pub fn finished(value: f64) -> Self {
        Self {
            value,
            finished: true,
        }
    }
}

/// Maps `(time, start, duration)` to progress
pub trait TimingStrategy {
    /// Advance to `time` for a tween that started at `start`
    fn advance(&mut self, time: f64, start: f64, duration: f64) -> Progress;

    /// Forget lap state so the strategy can drive a restarted tween
    fn reset(&mut self) {}
}

/// Raw progress in durations elapsed, `None` for a degenerate duration
fn raw_progress(time: f64, start: f64, duration: f64) -> Option<f64> {
    (duration > 0.0).then(|| ((time - start) / duration).max(0.0))
}

/// Built-in timing strategies
///
/// The lap counter is private: a `Timing` always starts at lap zero, whether
/// it comes from one of the constructors or from a [`Playback`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    playback: Playback,
    /// Completed laps (repeat) or full cycles (ping-pong)
    laps: u32,
}

impl Timing {
    /// Single pass from 0 to 1
    pub fn once() -> Self {
        Self::from_playback(Playback::Once)
    }

    /// Restart from 0 after every lap, `count` laps in total
    pub fn repeat(count: u32) -> Self {
        Self::from_playback(Playback::Repeat { count: Some(count) })
    }

    pub fn repeat_forever() -> Self {
        Self::from_playback(Playback::Repeat { count: None })
    }

    /// Bounce 0 → 1 → 0 once per duration, `count` cycles in total
    pub fn ping_pong(count: u32) -> Self {
        Self::from_playback(Playback::PingPong { count: Some(count) })
    }

    pub fn ping_pong_forever() -> Self {
        Self::from_playback(Playback::PingPong { count: None })
    }

    fn from_playback(playback: Playback) -> Self {
        Self { playback, laps: 0 }
    }

    /// The playback this strategy was built from
    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Completed laps (repeat) or full cycles (ping-pong)
    pub fn laps(&self) -> u32 {
        self.laps
    }
}

impl TimingStrategy for Timing {
    fn advance(&mut self, time: f64, start: f64, duration: f64) -> Progress {
        let raw = raw_progress(time, start, duration);

        match self.playback {
            Playback::Once => match raw {
                Some(p) if p < 1.0 => Progress::running(p),
                _ => Progress::finished(1.0),
            },

            Playback::Repeat { count: limit } => {
                let Some(raw) = raw else {
                    return Progress::finished(1.0);
                };

                let crossed = (raw + REPEAT_EPSILON).floor() as u32;
                if crossed > self.laps {
                    // Boundary tick: show the lap's end value
                    self.laps = limit.map_or(crossed, |n| crossed.min(n));
                    let finished = limit.is_some_and(|n| self.laps >= n);
                    return Progress {
                        value: 1.0,
                        finished,
                    };
                }

                Progress::running((raw - self.laps as f64).clamp(0.0, 1.0))
            }

            Playback::PingPong { count: limit } => {
                let Some(raw) = raw else {
                    return Progress::finished(0.0);
                };

                let completed = (raw + PING_PONG_EPSILON).floor() as u32;
                self.laps = limit.map_or(completed, |n| completed.min(n));
                if limit.is_some_and(|n| completed >= n) {
                    return Progress::finished(0.0);
                }

                // Triangle wave: up on the first half-cycle, down on the second
                let folded = (raw * 2.0) % 2.0;
                let value = if folded <= 1.0 { folded } else { 2.0 - folded };
                Progress::running(value)
            }
        }
    }

    fn reset(&mut self) {
        self.laps = 0;
    }
}

/// Serializable playback description
///
/// Each call to [`Playback::timing`] builds a fresh strategy with zeroed
/// counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum Playback {
    #[default]
    Once,
    Repeat {
        #[cfg_attr(feature = "serde", serde(default))]
        count: Option<u32>,
    },
    PingPong {
        #[cfg_attr(feature = "serde", serde(default))]
        count: Option<u32>,
    },
}

impl Playback {
    pub fn timing(self) -> Timing {
        Timing::from_playback(self)
    }
}

impl From<Playback> for Timing {
    fn from(playback: Playback) -> Self {
        playback.timing()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_once_clamps_and_finishes() {
        let mut timing = Timing::once();
        assert_eq!(timing.advance(10.0, 10.0, 2.0), Progress::running(0.0));
        assert_eq!(timing.advance(11.0, 10.0, 2.0), Progress::running(0.5));
        assert_eq!(timing.advance(12.5, 10.0, 2.0), Progress::finished(1.0));
    }

    #[test]
    fn test_degenerate_duration_finishes_immediately() {
        for mut timing in [
            Timing::once(),
            Timing::repeat(3),
            Timing::repeat_forever(),
            Timing::ping_pong_forever(),
        ] {
            assert!(timing.advance(5.0, 5.0, 0.0).finished);
        }
        assert!(Timing::once().advance(5.0, 5.0, -1.0).finished);
    }

    #[test]
    fn test_repeat_finishes_on_nth_boundary() {
        let mut timing = Timing::repeat(3);
        let mut boundaries = Vec::new();

        for step in 0..=12 {
            let time = step as f64 * 0.25;
            let progress = timing.advance(time, 0.0, 1.0);
            if step > 0 && step % 4 == 0 {
                assert!(approx(progress.value, 1.0));
                boundaries.push(progress.finished);
            } else {
                assert!(!progress.finished);
                assert!(progress.value < 1.0);
            }
        }

        assert_eq!(boundaries, vec![false, false, true]);
        assert_eq!(timing.laps(), 3);
    }

    #[test]
    fn test_repeat_resets_progress_each_lap() {
        let mut timing = Timing::repeat(2);
        timing.advance(0.0, 0.0, 2.0);
        assert!(approx(timing.advance(2.0, 0.0, 2.0).value, 1.0));
        assert!(approx(timing.advance(3.0, 0.0, 2.0).value, 0.5));
    }

    #[test]
    fn test_repeat_forever_never_finishes() {
        let mut timing = Timing::repeat_forever();
        for step in 0..1000 {
            let progress = timing.advance(step as f64 * 0.1, 0.0, 0.5);
            assert!(!progress.finished);
        }
        assert!(timing.laps() > 100);
    }

    #[test]
    fn test_repeat_large_step_counts_skipped_laps() {
        let mut timing = Timing::repeat(3);
        let progress = timing.advance(5.0, 0.0, 1.0);
        assert!(progress.finished);
        assert_eq!(timing.laps(), 3);
    }

    #[test]
    fn test_ping_pong_peak_and_return() {
        let mut timing = Timing::ping_pong_forever();
        assert!(approx(timing.advance(3.0, 2.0, 2.0).value, 1.0));
        assert!(approx(timing.advance(4.0, 2.0, 2.0).value, 0.0));
        assert!(approx(timing.advance(2.5, 2.0, 2.0).value, 0.5));
        assert!(approx(timing.advance(3.5, 2.0, 2.0).value, 0.5));
    }

    #[test]
    fn test_ping_pong_completes_after_cycles() {
        let mut timing = Timing::ping_pong(2);
        let mut finished_at = None;

        for step in 0..=40 {
            let time = step as f64 * 0.1;
            let progress = timing.advance(time, 0.0, 1.0);
            if progress.finished {
                assert!(approx(progress.value, 0.0));
                finished_at = Some(time);
                break;
            }
        }

        let finished_at = finished_at.expect("ping-pong never finished");
        assert!(approx(finished_at, 2.0));
        assert_eq!(timing.laps(), 2);
    }

    #[test]
    fn test_ping_pong_epsilon_is_approximate() {
        let mut timing = Timing::ping_pong(1);
        // Just short of the return, inside the tolerance
        assert!(timing.advance(1.0 - PING_PONG_EPSILON / 2.0, 0.0, 1.0).finished);

        let mut timing = Timing::ping_pong(1);
        // Short of the return by more than the tolerance
        assert!(!timing.advance(1.0 - PING_PONG_EPSILON * 10.0, 0.0, 1.0).finished);
    }

    #[test]
    fn test_reset_clears_laps() {
        let mut timing = Timing::repeat(5);
        timing.advance(2.0, 0.0, 1.0);
        assert_eq!(timing.laps(), 2);
        timing.reset();
        assert_eq!(timing.laps(), 0);
    }

    #[test]
    fn test_strategies_start_at_lap_zero() {
        let mut advanced = Timing::repeat(2);
        advanced.advance(1.0, 0.0, 1.0);
        assert_eq!(advanced.laps(), 1);
        assert_eq!(advanced.playback(), Playback::Repeat { count: Some(2) });

        // Rebuilding from the playback never carries laps over
        let mut rebuilt = advanced.playback().timing();
        assert_eq!(rebuilt.laps(), 0);
        assert_eq!(rebuilt, Timing::repeat(2));
        assert!(!rebuilt.advance(1.0, 0.0, 1.0).finished);
        assert!(rebuilt.advance(2.0, 0.0, 1.0).finished);
        assert_eq!(Timing::default(), Timing::once());
    }

    #[test]
    fn test_playback_builds_fresh_timing() {
        assert_eq!(Playback::Once.timing(), Timing::once());
        assert_eq!(Playback::Repeat { count: Some(2) }.timing(), Timing::repeat(2));
        assert_eq!(Playback::Repeat { count: None }.timing(), Timing::repeat_forever());
        assert_eq!(
            Timing::from(Playback::PingPong { count: Some(1) }),
            Timing::ping_pong(1)
        );
    }
}
