//! Scene file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tweener_core::{Easing, Playback, TweenDefaults};

/// Top-level scene description (scene.toml)
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub defaults: TweenDefaults,
    #[serde(default)]
    pub tweens: Vec<TweenConfig>,
}

/// Simulated clock driving the registry
#[derive(Debug, Deserialize, Serialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub start: f64,
    #[serde(default = "default_end")]
    pub end: f64,
    /// Seconds between frames
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_end() -> f64 {
    2.0
}

fn default_step() -> f64 {
    0.25
}

impl ClockConfig {
    /// Upper bound on frames a single scene may produce
    pub const MAX_FRAMES: usize = 100_000;

    /// Number of frames from `start` to `end` inclusive
    ///
    /// Fails for non-finite or inverted clocks, a non-positive step, and
    /// clocks longer than [`MAX_FRAMES`](Self::MAX_FRAMES).
    pub fn frame_count(&self) -> Result<usize> {
        for (field, value) in [("start", self.start), ("end", self.end), ("step", self.step)] {
            if !value.is_finite() {
                anyhow::bail!("clock.{} must be finite, got {}", field, value);
            }
        }
        if self.step <= 0.0 {
            anyhow::bail!("clock.step must be positive, got {}", self.step);
        }
        if self.end < self.start {
            anyhow::bail!(
                "clock.end ({}) is before clock.start ({})",
                self.end,
                self.start
            );
        }

        let intervals = ((self.end - self.start) / self.step + 1e-9).floor();
        if intervals >= Self::MAX_FRAMES as f64 {
            anyhow::bail!(
                "clock spans {} frames; the limit is {} (raise clock.step or shorten the clock)",
                intervals,
                Self::MAX_FRAMES
            );
        }
        Ok(intervals as usize + 1)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: default_end(),
            step: default_step(),
        }
    }
}

/// One tween in the scene
///
/// Tweens sharing a `target` name animate the same variable and play one
/// after another, in file order.
#[derive(Debug, Deserialize, Serialize)]
pub struct TweenConfig {
    pub target: String,
    /// Explicit start value; omitted tweens start from the variable
    #[serde(default)]
    pub from: Option<f64>,
    pub to: f64,
    pub duration: f64,
    #[serde(default)]
    pub delay: f64,
    /// Overrides `defaults.easing`
    #[serde(default)]
    pub easing: Option<Easing>,
    /// Overrides `defaults.playback`
    #[serde(default)]
    pub playback: Option<Playback>,
}

impl TweenConfig {
    pub fn new(target: &str, to: f64, duration: f64) -> Self {
        Self {
            target: target.to_string(),
            from: None,
            to,
            duration,
            delay: 0.0,
            easing: None,
            playback: None,
        }
    }
}

impl SceneConfig {
    /// Load and validate a scene file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No scene found at {}. Run `tweener init {}` to create one.",
                path.display(),
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        Ok(config)
    }

    /// Parse and validate scene TOML
    pub fn parse(content: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content).context("Invalid scene TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject scenes the runner cannot play
    pub fn validate(&self) -> Result<()> {
        self.clock.frame_count()?;

        for (index, tween) in self.tweens.iter().enumerate() {
            if tween.target.trim().is_empty() {
                anyhow::bail!("tweens[{}] has an empty target name", index);
            }
            let numbers = [Some(tween.to), tween.from, Some(tween.duration), Some(tween.delay)];
            if numbers.iter().flatten().any(|value| !value.is_finite()) {
                anyhow::bail!(
                    "tweens[{}] ({}) has a non-finite value",
                    index,
                    tween.target
                );
            }
            if tween.delay < 0.0 {
                anyhow::bail!(
                    "tweens[{}] ({}) has a negative delay",
                    index,
                    tween.target
                );
            }
        }

        Ok(())
    }

    /// A small scene exercising every playback mode
    pub fn sample() -> Self {
        let mut fade = TweenConfig::new("opacity", 1.0, 1.0);
        fade.from = Some(0.0);
        fade.easing = Some(Easing::EaseOutCubic);

        let mut fade_out = TweenConfig::new("opacity", 0.0, 0.5);
        fade_out.easing = Some(Easing::EaseInQuad);

        let mut pulse = TweenConfig::new("scale", 1.5, 1.0);
        pulse.from = Some(1.0);
        pulse.playback = Some(Playback::PingPong { count: Some(2) });
        pulse.easing = Some(Easing::EaseInOutSine);

        let mut spin = TweenConfig::new("angle", 360.0, 0.5);
        spin.from = Some(0.0);
        spin.delay = 0.5;
        spin.playback = Some(Playback::Repeat { count: Some(3) });

        Self {
            clock: ClockConfig {
                start: 0.0,
                end: 2.5,
                step: 0.125,
            },
            defaults: TweenDefaults::default(),
            tweens: vec![fade, fade_out, pulse, spin],
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scene")
    }
}
