//! Built-in walkthrough for `tweener demo`

use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::rc::Rc;
use tracing::debug;
use tweener_core::{Easing, Timing, TweenRegistry};

const FRAME: f64 = 0.25;

/// A sprite animated through its setter
#[derive(Debug, Default)]
struct Sprite {
    x: f64,
    moves: u32,
}

impl Sprite {
    fn set_x(&mut self, x: f64) {
        self.x = x;
        self.moves += 1;
    }
}

/// Tick `registry` from `from` to `to`, printing `probe` after every frame
fn play(
    out: &mut dyn Write,
    registry: &mut TweenRegistry,
    from: f64,
    to: f64,
    probe: &dyn Fn() -> String,
) -> Result<()> {
    let frames = ((to - from) / FRAME).round() as usize;
    for i in 0..=frames {
        let time = from + i as f64 * FRAME;
        registry.update(time);
        writeln!(out, "  t={:.2}  {}", time, probe())?;
    }
    Ok(())
}

fn one_shot(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "One-shot tween: x 0 -> 100, ease_out_cubic, 1s")?;

    let mut registry = TweenRegistry::new();
    let x = Rc::new(Cell::new(0.0f64));
    registry
        .animate(&x)?
        .commit_with(1.0, 100.0, Easing::EaseOutCubic, Timing::once());

    let probe = || format!("x={:.2}", x.get());
    play(out, &mut registry, 0.0, 1.0, &probe)
}

fn ping_pong(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Fluent build: scale 1 -> 2 and back, twice")?;

    let mut registry = TweenRegistry::new();
    let scale = Rc::new(Cell::new(1.0f64));
    registry
        .animate(&scale)?
        .begin(1.0, 2.0)
        .easing(Easing::EaseInOutSine)
        .timing(Timing::ping_pong(2))
        .commit();

    let probe = || format!("scale={:.3}", scale.get());
    play(out, &mut registry, 0.0, 2.0, &probe)
}

fn delayed_repeat(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Delayed repeat: angle 0 -> 90 three times after 0.5s")?;

    let mut registry = TweenRegistry::new();
    let angle = Rc::new(Cell::new(0.0f64));
    let started = Rc::new(Cell::new(false));
    let flag = started.clone();

    registry
        .animate(&angle)?
        .begin_from(0.5, 0.0, 90.0)
        .delay(0.5)
        .timing(Timing::repeat(3))
        .on_start(move || flag.set(true))
        .commit();

    let probe = || format!("angle={:.1} started={}", angle.get(), started.get());
    play(out, &mut registry, 0.0, 2.0, &probe)
}

fn setter_callbacks(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Setter target: sprite.set_x 10 -> 20, then back to 0")?;

    let mut registry = TweenRegistry::new();
    let sprite = Rc::new(RefCell::new(Sprite::default()));
    let log = Rc::new(RefCell::new(Vec::new()));
    let (on_start, on_finish, on_back) = (log.clone(), log.clone(), log.clone());

    registry
        .animate_setter(&sprite, Sprite::set_x)?
        .begin_from(1.0, 10.0, 20.0)
        .on_start(move || on_start.borrow_mut().push("start"))
        .on_finish(move || on_finish.borrow_mut().push("finish"))
        .commit()
        .begin(0.5, 0.0)
        .easing(Easing::EaseOutBack)
        .on_finish_with("back", move |tag| on_back.borrow_mut().push(*tag))
        .commit();

    let probe = || {
        let sprite = sprite.borrow();
        format!(
            "x={:.2} moves={} events={:?}",
            sprite.x,
            sprite.moves,
            log.borrow()
        )
    };
    play(out, &mut registry, 0.0, 1.75, &probe)?;

    debug!("Sprite ended at {:?}", sprite.borrow());
    Ok(())
}

/// Run every walkthrough section in order
pub fn run(out: &mut dyn Write) -> Result<()> {
    let sections: [fn(&mut dyn Write) -> Result<()>; 4] =
        [one_shot, ping_pong, delayed_repeat, setter_callbacks];

    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        section(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(section: fn(&mut dyn Write) -> Result<()>) -> String {
        let mut buf = Vec::new();
        section(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_one_shot_ends_on_target() {
        let text = capture(one_shot);
        assert!(text.lines().last().unwrap().ends_with("x=100.00"));
    }

    #[test]
    fn test_ping_pong_returns_to_start() {
        let text = capture(ping_pong);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[3].ends_with("scale=2.000"));
        assert!(lines.last().unwrap().ends_with("scale=1.000"));
    }

    #[test]
    fn test_delayed_repeat_starts_after_delay() {
        let text = capture(delayed_repeat);
        assert!(text.contains("t=0.25  angle=0.0 started=false"));
        assert!(text.contains("t=0.50  angle=0.0 started=true"));
        assert!(text.lines().last().unwrap().contains("angle=90.0"));
    }

    #[test]
    fn test_setter_section_logs_callbacks() {
        let text = capture(setter_callbacks);
        let last = text.lines().last().unwrap();
        assert!(last.contains("x=0.00"));
        assert!(last.contains(r#"events=["start", "finish", "back"]"#));
    }

    #[test]
    fn test_full_walkthrough() {
        let text = capture(run);
        assert_eq!(text.matches("\n\n").count(), 3);
    }
}
