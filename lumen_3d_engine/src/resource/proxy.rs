/// Shared reference with explicit liveness
///
/// A `Proxy<T>` is a cheap clonable handle on a value owned jointly by every
/// holder. The owner may `free` it at any time; every clone then reads as
/// absent, so holders must check before use instead of assuming a value.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct Proxy<T> {
    inner: Arc<RwLock<Option<T>>>,
}

impl<T> Proxy<T> {
    /// Create a proxy holding `value`
    pub fn new(value: T) -> Self {
        Self { inner: Arc::new(RwLock::new(Some(value))) }
    }

    /// Create a proxy holding nothing
    pub fn empty() -> Self {
        Self { inner: Arc::new(RwLock::new(None)) }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<T>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<T>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns true while the shared value is alive
    pub fn is_valid(&self) -> bool {
        self.read().is_some()
    }

    /// Run `f` on the shared value if it is alive
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.read().as_ref().map(f)
    }

    /// Run `f` on the shared value mutably if it is alive
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.write().as_mut().map(f)
    }

    /// Replace the shared value (revives a freed proxy)
    pub fn set(&self, value: T) {
        *self.write() = Some(value);
    }

    /// Drop the shared value for every holder, returning it
    pub fn free(&self) -> Option<T> {
        self.write().take()
    }

    /// Returns true if both proxies share the same slot
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of holders sharing the slot
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T: Clone> Proxy<T> {
    /// Copy of the shared value, if alive
    pub fn get(&self) -> Option<T> {
        self.read().clone()
    }
}

impl<T> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for Proxy<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Proxy").field(&*self.read()).finish()
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
