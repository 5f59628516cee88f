//! Animated targets
//!
//! A target is where a tween writes its values: either a shared variable or
//! a setter method invoked on a shared object.

use crate::values::Tweenable;
use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Stable identity of an animated target, used to deduplicate slots
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// Address of a shared variable's allocation
    Var(usize),
    /// Object allocation address, setter address and value type
    ///
    /// Function addresses are not guaranteed unique or stable: the compiler
    /// may merge setters with identical bodies, and one setter may get
    /// different addresses in different codegen units. Keep the
    /// [`Handle`](crate::Handle) returned by
    /// [`acquire_setter`](crate::TweenRegistry::acquire_setter) and reach the
    /// slot through it rather than re-acquiring by setter.
    Setter {
        object: usize,
        setter: usize,
        value: TypeId,
    },
}

impl TargetKey {
    pub fn of_var<T: 'static>(var: &Rc<Cell<T>>) -> Self {
        TargetKey::Var(Rc::as_ptr(var) as *const () as usize)
    }

    pub fn of_setter<O: 'static, T: 'static>(
        object: &Rc<RefCell<O>>,
        setter: fn(&mut O, T),
    ) -> Self {
        TargetKey::Setter {
            object: Rc::as_ptr(object) as *const () as usize,
            setter: setter as usize,
            value: TypeId::of::<T>(),
        }
    }
}

/// Sink for tweened values
pub trait TweenTarget<T> {
    /// The value a new tween should start from, if the target can tell
    fn current(&self) -> Option<T>;

    /// Write a tweened value
    fn apply(&mut self, value: T);

    /// Identity used by the registry
    fn key(&self) -> TargetKey;
}

/// A shared variable target
pub struct VarTarget<T> {
    cell: Rc<Cell<T>>,
}

impl<T> VarTarget<T> {
    pub fn new(cell: Rc<Cell<T>>) -> Self {
        Self { cell }
    }
}

impl<T: Tweenable> TweenTarget<T> for VarTarget<T> {
    fn current(&self) -> Option<T> {
        Some(self.cell.get())
    }

    fn apply(&mut self, value: T) {
        self.cell.set(value);
    }

    fn key(&self) -> TargetKey {
        TargetKey::of_var(&self.cell)
    }
}

/// A setter invoked on a shared object
///
/// Setters are write-only, so the target remembers the last value it wrote
/// and reports that as its current value.
pub struct SetterTarget<O, T> {
    object: Rc<RefCell<O>>,
    setter: fn(&mut O, T),
    last: Option<T>,
}

impl<O, T> SetterTarget<O, T> {
    pub fn new(object: Rc<RefCell<O>>, setter: fn(&mut O, T)) -> Self {
        Self {
            object,
            setter,
            last: None,
        }
    }
}

impl<O: 'static, T: Tweenable> TweenTarget<T> for SetterTarget<O, T> {
    fn current(&self) -> Option<T> {
        self.last
    }

    fn apply(&mut self, value: T) {
        match self.object.try_borrow_mut() {
            Ok(mut object) => {
                (self.setter)(&mut *object, value);
                self.last = Some(value);
            }
            Err(_) => {
                tracing::warn!(
                    "Setter target is borrowed elsewhere, skipping write of {:?}",
                    value
                );
            }
        }
    }

    fn key(&self) -> TargetKey {
        TargetKey::of_setter(&self.object, self.setter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sprite {
        x: f32,
        y: f32,
    }

    impl Sprite {
        fn set_x(&mut self, x: f32) {
            self.x = x;
        }

        fn set_y(&mut self, y: f32) {
            self.y = y;
        }
    }

    #[test]
    fn test_var_target_reads_and_writes() {
        let cell = Rc::new(Cell::new(1.5f32));
        let mut target = VarTarget::new(cell.clone());
        assert_eq!(target.current(), Some(1.5));
        target.apply(3.0);
        assert_eq!(cell.get(), 3.0);
    }

    #[test]
    fn test_setter_target_tracks_last_value() {
        let sprite = Rc::new(RefCell::new(Sprite { x: 0.0, y: 0.0 }));
        let mut target = SetterTarget::new(sprite.clone(), Sprite::set_x);
        assert_eq!(target.current(), None);
        target.apply(4.0);
        assert_eq!(sprite.borrow().x, 4.0);
        assert_eq!(target.current(), Some(4.0));
    }

    #[test]
    fn test_setter_target_skips_write_while_borrowed() {
        let sprite = Rc::new(RefCell::new(Sprite { x: 1.0, y: 0.0 }));
        let mut target = SetterTarget::new(sprite.clone(), Sprite::set_x);
        {
            let _guard = sprite.borrow();
            target.apply(9.0);
        }
        assert_eq!(sprite.borrow().x, 1.0);
        assert_eq!(target.current(), None);
    }

    #[test]
    fn test_keys_distinguish_objects_and_setters() {
        let a = Rc::new(RefCell::new(Sprite { x: 0.0, y: 0.0 }));
        let b = Rc::new(RefCell::new(Sprite { x: 0.0, y: 0.0 }));

        let ax = TargetKey::of_setter(&a, Sprite::set_x as fn(&mut Sprite, f32));
        let ay = TargetKey::of_setter(&a, Sprite::set_y as fn(&mut Sprite, f32));
        let bx = TargetKey::of_setter(&b, Sprite::set_x as fn(&mut Sprite, f32));

        assert_ne!(ax, ay);
        assert_ne!(ax, bx);
        assert_eq!(ax, TargetKey::of_setter(&a, Sprite::set_x as fn(&mut Sprite, f32)));

        let v = Rc::new(Cell::new(0.0f64));
        assert_eq!(TargetKey::of_var(&v), TargetKey::of_var(&v.clone()));
        assert_ne!(TargetKey::of_var(&v), TargetKey::of_var(&Rc::new(Cell::new(0.0f64))));
    }
}
