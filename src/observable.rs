//! Observable values
//!
//! Every mutable field of a preference group is a [`Property`]. Subscribers
//! are called synchronously on the mutating thread after the value has been
//! replaced, so a write-back listener has run by the time `set` returns.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Callback invoked with the new value of a [`Property`]
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Property<T> {
    value: RwLock<T>,
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T> Property<T>
where
    T: Clone + PartialEq,
{
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Clone of the current value
    pub fn get(&self) -> T {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Borrow the current value without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the value; listeners run only if it changed
    pub fn set(&self, value: T) {
        {
            let mut current = self.value.write().unwrap_or_else(PoisonError::into_inner);
            if *current == value {
                return;
            }
            *current = value.clone();
        }
        self.notify(&value);
    }

    /// Mutate the value in place; listeners run only if it changed
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut current = self.value.write().unwrap_or_else(PoisonError::into_inner);
            let before = current.clone();
            f(&mut current);
            (*current != before).then(|| current.clone())
        };
        if let Some(value) = changed {
            self.notify(&value);
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, value: &T) {
        // Snapshot so a listener may touch this property without deadlocking
        let listeners: Vec<Listener<T>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<T: Clone + PartialEq + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_tuple("Property").field(&*value).finish()
    }
}
