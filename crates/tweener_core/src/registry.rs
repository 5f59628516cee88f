//! Tween registry
//!
//! Maps animated targets to their slots and fans out per-frame updates.
//! Acquiring the same target twice yields the same slot; the returned
//! [`Handle`] is the caller's reference to it from then on.
//!
//! # Threading
//!
//! The registry is single-threaded: it holds `Rc` state and is `!Send`.
//! Callbacks run synchronously inside [`TweenRegistry::update`].
//!
//! # Structural changes from callbacks
//!
//! Callbacks cannot borrow the registry while it is updating. They queue
//! structural changes on a [`Deferred`] handle instead. Commands queued
//! during an update are applied once every slot has been advanced; commands
//! queued between frames are applied at the start of the next update, or
//! immediately by [`TweenRegistry::apply_deferred`].

use crate::config::TweenDefaults;
use crate::error::{Result, TweenError};
use crate::slot::Slot;
use crate::target::{SetterTarget, TargetKey, TweenTarget, VarTarget};
use crate::values::Tweenable;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

new_key_type! {
    /// Untyped identifier of a registered slot
    pub struct SlotId;
}

/// Typed handle to a registered slot
pub struct Handle<T> {
    id: SlotId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(id: SlotId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

/// Type-erased slot storage
trait AnySlot {
    fn update(&mut self, time: f64);
    fn key(&self) -> TargetKey;
    fn is_animating(&self) -> bool;
    fn set_defaults(&mut self, defaults: TweenDefaults);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Tweenable> AnySlot for Slot<T> {
    fn update(&mut self, time: f64) {
        Slot::update(self, time);
    }

    fn key(&self) -> TargetKey {
        Slot::key(self)
    }

    fn is_animating(&self) -> bool {
        Slot::is_animating(self)
    }

    fn set_defaults(&mut self, defaults: TweenDefaults) {
        Slot::set_defaults(self, defaults);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A structural change applied outside slot iteration
type Command = Box<dyn FnOnce(&mut TweenRegistry)>;

/// Queue of registry changes that callbacks can hold on to
///
/// Cloning shares the same queue.
#[derive(Clone, Default)]
pub struct Deferred {
    queue: Rc<RefCell<Vec<Command>>>,
}

impl Deferred {
    /// Queue an arbitrary registry operation
    pub fn run<F: FnOnce(&mut TweenRegistry) + 'static>(&self, command: F) {
        self.queue.borrow_mut().push(Box::new(command));
    }

    /// Queue the release of a slot
    pub fn release<T: 'static>(&self, handle: Handle<T>) {
        self.run(move |registry| {
            registry.release(handle);
        });
    }

    /// Queue the release of a variable target's slot
    pub fn release_var<T: 'static>(&self, var: &Rc<Cell<T>>) {
        let key = TargetKey::of_var(var);
        self.run(move |registry| {
            registry.release_key(key);
        });
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("pending", &self.len())
            .finish()
    }
}

/// The registry that owns every slot and ticks them each frame
pub struct TweenRegistry {
    slots: SlotMap<SlotId, Box<dyn AnySlot>>,
    index: FxHashMap<TargetKey, SlotId>,
    deferred: Deferred,
    defaults: TweenDefaults,
}

impl TweenRegistry {
    pub fn new() -> Self {
        Self::with_defaults(TweenDefaults::default())
    }

    pub fn with_defaults(defaults: TweenDefaults) -> Self {
        Self {
            slots: SlotMap::with_key(),
            index: FxHashMap::default(),
            deferred: Deferred::default(),
            defaults,
        }
    }

    pub fn defaults(&self) -> TweenDefaults {
        self.defaults
    }

    /// Change the defaults for every existing and future slot
    pub fn set_defaults(&mut self, defaults: TweenDefaults) {
        self.defaults = defaults;
        for (_, slot) in self.slots.iter_mut() {
            slot.set_defaults(defaults);
        }
    }

    /// Handle for queueing changes from inside callbacks
    pub fn deferred(&self) -> Deferred {
        self.deferred.clone()
    }

    // ========================================================================
    // Acquire
    // ========================================================================

    /// Get or create the slot for a shared variable
    pub fn acquire<T: Tweenable>(&mut self, var: &Rc<Cell<T>>) -> Handle<T> {
        let key = TargetKey::of_var(var);
        self.acquire_with(key, || {
            Box::new(VarTarget::new(var.clone())) as Box<dyn TweenTarget<T>>
        })
    }

    /// Get or create the slot for `setter` invoked on `object`
    ///
    /// The same setter on two objects, or two setters on one object, map to
    /// distinct slots. Setter identity is the function address, which the
    /// compiler does not guarantee to be unique or stable (see
    /// [`TargetKey::Setter`]); hold on to the returned handle and use
    /// [`get_mut`](Self::get_mut) and [`release`](Self::release) with it.
    pub fn acquire_setter<O: 'static, T: Tweenable>(
        &mut self,
        object: &Rc<RefCell<O>>,
        setter: fn(&mut O, T),
    ) -> Handle<T> {
        let key = TargetKey::of_setter(object, setter);
        self.acquire_with(key, || {
            Box::new(SetterTarget::new(object.clone(), setter)) as Box<dyn TweenTarget<T>>
        })
    }

    fn acquire_with<T: Tweenable>(
        &mut self,
        key: TargetKey,
        target: impl FnOnce() -> Box<dyn TweenTarget<T>>,
    ) -> Handle<T> {
        if let Some(&id) = self.index.get(&key) {
            return Handle::new(id);
        }

        let slot = Slot::new(target(), self.defaults);
        let id = self.slots.insert(Box::new(slot));
        self.index.insert(key, id);
        tracing::debug!("Registered slot {:?} for {:?}", id, key);
        Handle::new(id)
    }

    /// Acquire a variable's slot for immediate configuration
    pub fn animate<T: Tweenable>(&mut self, var: &Rc<Cell<T>>) -> Result<&mut Slot<T>> {
        let handle = self.acquire(var);
        self.typed_slot(handle)
    }

    /// Acquire a setter's slot for immediate configuration
    ///
    /// Re-keys by setter address on every call; prefer
    /// [`acquire_setter`](Self::acquire_setter) plus the handle for repeated
    /// access.
    pub fn animate_setter<O: 'static, T: Tweenable>(
        &mut self,
        object: &Rc<RefCell<O>>,
        setter: fn(&mut O, T),
    ) -> Result<&mut Slot<T>> {
        let handle = self.acquire_setter(object, setter);
        self.typed_slot(handle)
    }

    fn typed_slot<T: Tweenable>(&mut self, handle: Handle<T>) -> Result<&mut Slot<T>> {
        let slot = self
            .slots
            .get_mut(handle.id)
            .ok_or(TweenError::UnknownSlot)?;
        slot.as_any_mut()
            .downcast_mut::<Slot<T>>()
            .ok_or(TweenError::TargetTypeMismatch {
                expected: type_name::<T>(),
            })
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn get<T: Tweenable>(&self, handle: Handle<T>) -> Option<&Slot<T>> {
        self.slots
            .get(handle.id)?
            .as_any()
            .downcast_ref::<Slot<T>>()
    }

    pub fn get_mut<T: Tweenable>(&mut self, handle: Handle<T>) -> Option<&mut Slot<T>> {
        self.typed_slot(handle).ok()
    }

    pub fn contains<T>(&self, handle: Handle<T>) -> bool {
        self.slots.contains_key(handle.id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if any slot still has queued tweens
    pub fn has_active_animations(&self) -> bool {
        self.slots.iter().any(|(_, slot)| slot.is_animating())
    }

    // ========================================================================
    // Release
    // ========================================================================

    /// Remove a slot; in-flight tweens are dropped without a finish callback
    ///
    /// Returns `false` if the handle is not registered.
    pub fn release<T>(&mut self, handle: Handle<T>) -> bool {
        match self.slots.remove(handle.id) {
            Some(slot) => {
                self.index.remove(&slot.key());
                tracing::debug!("Released slot {:?}", handle.id);
                true
            }
            None => false,
        }
    }

    pub fn release_var<T: 'static>(&mut self, var: &Rc<Cell<T>>) -> bool {
        self.release_key(TargetKey::of_var(var))
    }

    pub fn release_setter<O: 'static, T: 'static>(
        &mut self,
        object: &Rc<RefCell<O>>,
        setter: fn(&mut O, T),
    ) -> bool {
        self.release_key(TargetKey::of_setter(object, setter))
    }

    fn release_key(&mut self, key: TargetKey) -> bool {
        match self.index.remove(&key) {
            Some(id) => {
                self.slots.remove(id);
                tracing::debug!("Released slot {:?} for {:?}", id, key);
                true
            }
            None => false,
        }
    }

    /// Drop every slot
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Advance every slot to `time`
    ///
    /// Every slot sees the same `time`; the order across slots is unspecified.
    pub fn update(&mut self, time: f64) {
        self.apply_deferred();

        for (_, slot) in self.slots.iter_mut() {
            slot.update(time);
        }

        self.apply_deferred();
    }

    /// Apply queued structural changes now
    ///
    /// Commands queued while applying are left for the next call.
    pub fn apply_deferred(&mut self) {
        let commands = self.deferred.take();
        if commands.is_empty() {
            return;
        }

        tracing::trace!("Applying {} deferred command(s)", commands.len());
        for command in commands {
            command(self);
        }
    }
}

impl Default for TweenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TweenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenRegistry")
            .field("slots", &self.slots.len())
            .field("deferred", &self.deferred)
            .field("defaults", &self.defaults)
            .finish()
    }
}
