use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, shared handle to a long-lived system.
///
/// Used for the GPU device, queue and buffer registry, which several render
/// components hold on to at once. Everything runs on the event-loop thread,
/// so `Rc<RefCell<_>>` is enough.
///
/// # Panics
/// - `get_mut` panics if the system is already borrowed
/// - `get` panics if the system is mutably borrowed
pub struct StSystem<T: ?Sized> {
    system: Rc<RefCell<Box<T>>>,
}

impl<T: ?Sized> StSystem<T> {
    /// Wraps an already boxed system.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable reference to the contained system.
    pub fn get(&self) -> Ref<'_, Box<T>> {
        self.system.borrow()
    }

    /// Returns a mutable reference to the contained system.
    pub fn get_mut(&self) -> RefMut<'_, Box<T>> {
        self.system.borrow_mut()
    }

    /// Number of live handles to this system.
    #[cfg(test)]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.system)
    }
}

impl<T> StSystem<T> {
    /// Boxes and wraps a system.
    pub fn from_value(system: T) -> Self {
        Self::new(Box::new(system))
    }
}

impl<T: ?Sized> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}
