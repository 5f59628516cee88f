//! Integration tests for the registry, slot queues and animation lifecycle
//!
//! These tests drive the public API the way a frame loop would:
//! - Variable and setter targets reach their final values
//! - Callbacks fire in start → write → step → finish order
//! - Queues retire tweens in FIFO order
//! - Callbacks can reshape the registry through the deferred queue

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tweener_core::{
    AnimationState, Easing, Playback, Timing, TweenDefaults, TweenError, TweenRegistry,
};

type EventLog = Rc<RefCell<Vec<String>>>;

/// An object animated through a setter; every write is logged
struct Gauge {
    value: f64,
    log: EventLog,
}

impl Gauge {
    fn new(log: &EventLog) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            value: 0.0,
            log: log.clone(),
        }))
    }

    fn set_value(&mut self, value: f64) {
        self.value = value;
        self.log.borrow_mut().push(format!("set {}", value));
    }
}

fn push(log: &EventLog, event: &'static str) -> impl FnMut() + 'static {
    let log = log.clone();
    move || log.borrow_mut().push(event.to_string())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// Two frames take a variable from 2.0 to 6.0 and empty the queue
#[test]
fn test_variable_single_pass_scenario() {
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(2.0f64));
    let handle = registry.acquire(&v);

    registry
        .get_mut(handle)
        .unwrap()
        .begin(1.0, 6.0)
        .easing(Easing::Linear)
        .delay(0.0)
        .commit();

    registry.update(0.0);
    registry.update(1.0);

    assert_eq!(v.get(), 6.0);
    let slot = registry.get(handle).unwrap();
    assert!(slot.is_empty());
    assert!(slot.current_animation().is_none());
}

/// Start fires before the first setter write, finish after the last
#[test]
fn test_setter_callback_ordering_scenario() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let gauge = Gauge::new(&log);
    let mut registry = TweenRegistry::new();

    registry
        .animate_setter(&gauge, Gauge::set_value)
        .unwrap()
        .begin_from(1.0, 10.0, 20.0)
        .on_start(push(&log, "start"))
        .on_finish(push(&log, "finish"))
        .commit();

    registry.update(0.0);
    registry.update(0.5);
    registry.update(1.0);
    registry.update(1.5);

    assert_eq!(
        *log.borrow(),
        vec!["start", "set 10", "set 15", "set 20", "finish"]
    );
    assert_eq!(gauge.borrow().value, 20.0);
}

#[test]
fn test_step_fires_after_every_write() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let gauge = Gauge::new(&log);
    let mut registry = TweenRegistry::new();

    registry
        .animate_setter(&gauge, Gauge::set_value)
        .unwrap()
        .begin_from(2.0, 0.0, 4.0)
        .on_step(push(&log, "step"))
        .commit();

    registry.update(0.0);
    registry.update(1.0);
    registry.update(2.0);

    assert_eq!(
        *log.borrow(),
        vec!["set 0", "step", "set 2", "step", "set 4", "step"]
    );
}

#[test]
fn test_setter_without_from_continues_from_last_write() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let gauge = Gauge::new(&log);
    let mut registry = TweenRegistry::new();

    registry
        .animate_setter(&gauge, Gauge::set_value)
        .unwrap()
        .begin(1.0, 8.0)
        .commit()
        .begin(1.0, 4.0)
        .commit();

    // First tween starts from zero: the setter has never written
    registry.update(0.0);
    registry.update(1.0);
    assert_eq!(gauge.borrow().value, 8.0);

    // Second picks up from the last written value
    registry.update(2.0);
    registry.update(2.5);
    assert!(approx(gauge.borrow().value, 6.0));
}

#[test]
fn test_delay_holds_value_and_start_callback() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(1.0f64));

    registry
        .animate(&v)
        .unwrap()
        .begin(1.0, 3.0)
        .delay(0.5)
        .on_start(push(&log, "start"))
        .commit();

    registry.update(0.0);
    registry.update(0.25);
    assert_eq!(v.get(), 1.0);
    assert!(log.borrow().is_empty());

    let state = registry
        .animate(&v)
        .unwrap()
        .current_animation()
        .map(|anim| anim.state());
    assert_eq!(state, Some(AnimationState::Delaying));

    registry.update(0.5);
    assert_eq!(*log.borrow(), vec!["start"]);
    registry.update(1.5);
    assert_eq!(v.get(), 3.0);
}

#[test]
fn test_queue_retires_in_fifo_order() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(0.0f64));

    registry
        .animate(&v)
        .unwrap()
        .begin(1.0, 1.0)
        .on_finish(push(&log, "first"))
        .commit()
        .begin(1.0, 2.0)
        .on_finish(push(&log, "second"))
        .commit()
        .begin(1.0, 3.0)
        .on_finish(push(&log, "third"))
        .commit();

    let mut time = 0.0;
    while registry.has_active_animations() {
        registry.update(time);
        time += 0.5;
        assert!(time < 10.0, "queue never drained");
    }

    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    assert_eq!(v.get(), 3.0);
}

#[test]
fn test_repeat_completes_on_nth_boundary() {
    let finished = Rc::new(Cell::new(0));
    let count = finished.clone();
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(0.0f64));

    registry
        .animate(&v)
        .unwrap()
        .begin(1.0, 10.0)
        .timing(Timing::repeat(3))
        .on_finish(move || count.set(count.get() + 1))
        .commit();

    for step in 0..12 {
        registry.update(step as f64 * 0.25);
    }
    assert_eq!(finished.get(), 0);
    assert!(registry.has_active_animations());

    registry.update(3.0);
    assert_eq!(finished.get(), 1);
    assert_eq!(v.get(), 10.0);
    assert!(!registry.has_active_animations());
}

#[test]
fn test_ping_pong_peaks_and_returns() {
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(0.0f64));

    registry
        .animate(&v)
        .unwrap()
        .begin(2.0, 8.0)
        .timing(Timing::ping_pong(1))
        .commit();

    registry.update(0.0);
    registry.update(1.0);
    assert!(approx(v.get(), 8.0));
    registry.update(1.5);
    assert!(approx(v.get(), 4.0));
    registry.update(2.0);
    assert!(approx(v.get(), 0.0));
    assert!(!registry.has_active_animations());
}

#[test]
fn test_forever_timings_keep_running() {
    let mut registry = TweenRegistry::new();
    let a = Rc::new(Cell::new(0.0f64));
    let b = Rc::new(Cell::new(0.0f64));

    registry
        .animate(&a)
        .unwrap()
        .begin(1.0, 1.0)
        .timing(Timing::repeat_forever())
        .commit();
    registry
        .animate(&b)
        .unwrap()
        .begin(1.0, 1.0)
        .timing(Timing::ping_pong_forever())
        .commit();

    for frame in 0..600 {
        registry.update(frame as f64 / 60.0);
    }
    assert!(registry.has_active_animations());

    // Stopping is the only way out, and it is silent
    let finished = Rc::new(Cell::new(false));
    let flag = finished.clone();
    let slot = registry.animate(&a).unwrap();
    slot.current_animation_mut()
        .unwrap()
        .set_on_finish(move || flag.set(true));
    slot.stop();
    registry.release_var(&b);

    registry.update(20.0);
    assert!(!finished.get());
    assert!(!registry.has_active_animations());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_pause_freezes_slot() {
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(0.0f64));

    registry.animate(&v).unwrap().begin(1.0, 10.0).commit();
    registry.update(0.0);
    registry.update(0.2);
    assert!(approx(v.get(), 2.0));

    registry.animate(&v).unwrap().pause();
    registry.update(0.6);
    assert!(approx(v.get(), 2.0));

    // Time keeps flowing while paused
    registry.animate(&v).unwrap().play();
    registry.update(0.6);
    assert!(approx(v.get(), 6.0));
}

#[test]
fn test_release_drops_in_flight_tweens_silently() {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let gauge = Gauge::new(&log);
    let mut registry = TweenRegistry::new();

    registry
        .animate_setter(&gauge, Gauge::set_value)
        .unwrap()
        .begin_from(1.0, 0.0, 1.0)
        .on_finish(push(&log, "finish"))
        .commit();
    registry.update(0.0);

    assert!(registry.release_setter(&gauge, Gauge::set_value));
    assert!(!registry.release_setter(&gauge, Gauge::set_value));
    registry.update(1.0);

    assert_eq!(*log.borrow(), vec!["set 0"]);
    assert!(registry.is_empty());
}

#[test]
fn test_callback_queues_follow_up_tween() {
    let mut registry = TweenRegistry::new();
    let deferred = registry.deferred();
    let fade = Rc::new(Cell::new(0.0f64));
    let slide = Rc::new(Cell::new(0.0f64));
    let next = slide.clone();

    registry
        .animate(&fade)
        .unwrap()
        .begin(1.0, 1.0)
        .on_finish(move || {
            let next = next.clone();
            deferred.run(move |registry| {
                if let Ok(slot) = registry.animate(&next) {
                    slot.begin(1.0, 100.0).commit();
                }
            });
        })
        .commit();

    registry.update(0.0);
    registry.update(1.0);

    // Applied once the frame finished: the new slot exists but has not ticked
    assert_eq!(registry.len(), 2);
    assert_eq!(slide.get(), 0.0);

    registry.update(1.0);
    registry.update(2.0);
    assert_eq!(slide.get(), 100.0);
}

#[test]
fn test_callback_releases_other_slot_after_iteration() {
    let mut registry = TweenRegistry::new();
    let deferred = registry.deferred();
    let a = Rc::new(Cell::new(0.0f64));
    let b = Rc::new(Cell::new(0.0f64));
    let other = b.clone();

    registry.animate(&b).unwrap().begin(2.0, 2.0).commit();
    registry
        .animate(&a)
        .unwrap()
        .begin(1.0, 1.0)
        .on_finish(move || deferred.release_var(&other))
        .commit();

    registry.update(0.0);
    registry.update(1.0);

    // Both slots saw the frame before the release was applied
    assert_eq!(a.get(), 1.0);
    assert!(approx(b.get(), 1.0));
    assert_eq!(registry.len(), 1);

    registry.update(2.0);
    assert!(approx(b.get(), 1.0));
}

#[test]
fn test_integer_and_vector_targets() {
    let mut registry = TweenRegistry::new();
    let count = Rc::new(Cell::new(0i32));
    let point = Rc::new(Cell::new([0.0f32, 10.0]));

    registry.animate(&count).unwrap().begin(1.0, 10).commit();
    registry
        .animate(&point)
        .unwrap()
        .begin(1.0, [4.0, 0.0])
        .commit();

    registry.update(0.0);
    registry.update(0.25);
    assert_eq!(count.get(), 3);
    assert_eq!(point.get(), [1.0, 7.5]);

    registry.update(1.0);
    assert_eq!(count.get(), 10);
    assert_eq!(point.get(), [4.0, 0.0]);
}

#[test]
fn test_integer_tween_across_most_of_its_range() {
    let mut registry = TweenRegistry::new();
    let level = Rc::new(Cell::new(-30000i16));

    registry.animate(&level).unwrap().begin(1.0, 30000).commit();

    let mut seen = Vec::new();
    for step in 0..=4 {
        registry.update(step as f64 * 0.25);
        seen.push(level.get());
    }
    assert_eq!(seen, vec![-30000, -15000, 0, 15000, 30000]);
}

#[test]
fn test_registry_defaults_shape_new_tweens() {
    let defaults = TweenDefaults::new(Easing::EaseInQuad, Playback::PingPong { count: Some(1) });
    let mut registry = TweenRegistry::with_defaults(defaults);
    let v = Rc::new(Cell::new(0.0f64));

    registry.animate(&v).unwrap().begin(2.0, 1.0).commit();
    registry.update(0.0);
    registry.update(0.5);
    assert!(approx(v.get(), 0.25));
    registry.update(2.0);
    assert!(!registry.has_active_animations());
}

#[test]
fn test_final_value_frozen_after_start() {
    let mut registry = TweenRegistry::new();
    let v = Rc::new(Cell::new(0.0f64));

    registry.animate(&v).unwrap().begin(1.0, 5.0).commit();
    registry.update(0.0);

    let anim = registry
        .animate(&v)
        .unwrap()
        .current_animation_mut()
        .unwrap();
    assert_eq!(anim.set_final_value(50.0), Err(TweenError::AlreadyStarted));

    registry.update(1.0);
    assert_eq!(v.get(), 5.0);
}
