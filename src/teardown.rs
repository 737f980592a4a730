//! Scoped ownership of engine objects.
//!
//! Every object the engine creates is pushed onto a [`ResourceStack`] and
//! addressed through a typed [`Handle`]. Dropping the stack releases the
//! objects in exact reverse order of acquisition, so dependents (renderables,
//! material instances) always go before the things they reference (buffers,
//! materials, the swap chain). Bootstrap code that bails out with `?` gets the
//! same unwinding for free.

use std::{any::Any, fmt, marker::PhantomData};

use crate::error::{DemoError, Result};

/// Typed index into a [`ResourceStack`].
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn index(&self) -> usize {
        self.index
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
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({})", short_type_name::<T>(), self.index)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

struct Slot {
    label: String,
    value: Box<dyn Any>,
}

#[derive(Default)]
pub struct ResourceStack {
    slots: Vec<Slot>,
}

impl fmt::Debug for ResourceStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| &slot.label))
            .finish()
    }
}

impl ResourceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `value`. It is released when the stack unwinds.
    pub fn push<T: 'static>(&mut self, label: impl Into<String>, value: T) -> Handle<T> {
        let label = label.into();
        log::debug!("acquired {label}");
        self.slots.push(Slot {
            label,
            value: Box::new(value),
        });
        Handle {
            index: self.slots.len() - 1,
            _marker: PhantomData,
        }
    }

    /// Run a fallible constructor and take ownership of its result.
    ///
    /// Nothing is pushed when `make` fails; whatever was acquired before stays
    /// on the stack and is released when the stack is dropped.
    pub fn acquire<T: 'static>(
        &mut self,
        label: impl Into<String>,
        make: impl FnOnce() -> Result<T>,
    ) -> Result<Handle<T>> {
        let value = make()?;
        Ok(self.push(label, value))
    }

    pub fn get<T: 'static>(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index)
            .and_then(|slot| slot.value.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .and_then(|slot| slot.value.downcast_mut())
    }

    /// Like [`get`](Self::get) but reports a dangling handle as an error.
    pub fn resolve<T: 'static>(&self, handle: Handle<T>) -> Result<&T> {
        self.get(handle).ok_or(DemoError::InvalidHandle {
            kind: short_type_name::<T>(),
        })
    }

    pub fn resolve_mut<T: 'static>(&mut self, handle: Handle<T>) -> Result<&mut T> {
        self.get_mut(handle).ok_or(DemoError::InvalidHandle {
            kind: short_type_name::<T>(),
        })
    }

    /// Labels in acquisition order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Drop for ResourceStack {
    fn drop(&mut self) {
        while let Some(slot) = self.slots.pop() {
            log::debug!("released {}", slot.label);
            drop(slot.value);
        }
    }
}
