//! Scene playback against a simulated clock

use crate::config::{SceneConfig, TweenConfig};
use anyhow::{Context, Result};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;
use tracing::{debug, info};
use tweener_core::TweenRegistry;

/// Lifecycle events raised by callbacks during one frame
type EventLog = Rc<RefCell<Vec<String>>>;

/// A named variable driven by the scene
struct Variable {
    name: String,
    cell: Rc<Cell<f64>>,
}

/// One sampled value
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub target: String,
    pub value: f64,
}

/// Every variable's value after one `update`
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub time: f64,
    pub values: Vec<Sample>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

/// A loaded scene ready to play
pub struct Scene {
    registry: TweenRegistry,
    variables: Vec<Variable>,
    events: EventLog,
    start: f64,
    step: f64,
    frames: usize,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let mut scene = Self {
            registry: TweenRegistry::with_defaults(config.defaults),
            variables: Vec::new(),
            events: Rc::new(RefCell::new(Vec::new())),
            start: config.clock.start,
            step: config.clock.step,
            frames: config.clock.frame_count()?,
        };

        for tween in &config.tweens {
            scene
                .queue(tween)
                .with_context(|| format!("Failed to queue tween for '{}'", tween.target))?;
        }

        info!(
            "Loaded scene with {} tween(s) over {} variable(s)",
            config.tweens.len(),
            scene.variables.len()
        );
        Ok(scene)
    }

    fn variable(&mut self, name: &str, initial: f64) -> Rc<Cell<f64>> {
        if let Some(var) = self.variables.iter().find(|var| var.name == name) {
            return var.cell.clone();
        }

        let cell = Rc::new(Cell::new(initial));
        self.variables.push(Variable {
            name: name.to_string(),
            cell: cell.clone(),
        });
        cell
    }

    fn queue(&mut self, tween: &TweenConfig) -> Result<()> {
        let cell = self.variable(&tween.target, tween.from.unwrap_or_default());
        let slot = self.registry.animate(&cell)?;

        match tween.from {
            Some(from) => slot.begin_from(tween.duration, from, tween.to),
            None => slot.begin(tween.duration, tween.to),
        };
        if let Some(easing) = tween.easing {
            slot.easing(easing);
        }
        if let Some(playback) = tween.playback {
            slot.timing(playback.timing());
        }

        let started = self.events.clone();
        let label = tween.target.clone();
        slot.delay(tween.delay)
            .on_start(move || started.borrow_mut().push(format!("{} started", label)));

        let finished = self.events.clone();
        slot.on_finish_with(tween.target.clone(), move |label| {
            finished.borrow_mut().push(format!("{} finished", label))
        })
        .commit();

        debug!(
            "Queued {} -> {} over {}s for '{}'",
            tween
                .from
                .map_or_else(|| "current".to_string(), |from| from.to_string()),
            tween.to,
            tween.duration,
            tween.target
        );
        Ok(())
    }

    /// Frame times from `start` to `end` inclusive, bounded by
    /// [`ClockConfig::MAX_FRAMES`](crate::config::ClockConfig::MAX_FRAMES)
    fn times(&self) -> impl Iterator<Item = f64> {
        let (start, step) = (self.start, self.step);
        (0..self.frames).map(move |i| start + i as f64 * step)
    }

    /// Play the whole clock and collect every frame
    pub fn run(&mut self) -> Vec<Frame> {
        let times: Vec<f64> = self.times().collect();
        let frames: Vec<Frame> = times.into_iter().map(|time| self.tick(time)).collect();

        if self.registry.has_active_animations() {
            info!("Clock ended with tweens still running");
        }
        frames
    }

    /// Advance the registry to `time` and sample every variable
    pub fn tick(&mut self, time: f64) -> Frame {
        self.registry.update(time);

        Frame {
            time,
            values: self
                .variables
                .iter()
                .map(|var| Sample {
                    target: var.name.clone(),
                    value: var.cell.get(),
                })
                .collect(),
            events: std::mem::take(&mut *self.events.borrow_mut()),
        }
    }
}

/// Output format for `tweener run`
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Render frames in the requested format
pub fn render(frames: &[Frame], format: Format) -> Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(frames).context("Failed to encode frames"),
        Format::Text => Ok(render_text(frames)),
    }
}

fn render_text(frames: &[Frame]) -> String {
    let mut out = String::new();
    for frame in frames {
        let _ = write!(out, "t={:>7.3}", frame.time);
        for sample in &frame.values {
            let _ = write!(out, "  {}={:.3}", sample.target, sample.value);
        }
        for event in &frame.events {
            let _ = write!(out, "  [{}]", event);
        }
        out.push('\n');
    }
    out
}
