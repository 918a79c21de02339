//! Exclusive ownership of native handles
//!
//! Vulkan handles are plain values with no destructor of their own. An
//! [`OwningResource`] pairs such a value with the call that destroys it and
//! guarantees that call runs exactly once: on [`OwningResource::reset`], on
//! [`OwningResource::replace`], or when the wrapper goes out of scope,
//! whichever comes first.

use std::fmt;

type Destructor<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Move-only owner of a native resource and its teardown callback
///
/// The empty state is tracked separately from the value itself, so resources
/// without a conventional null value are handled the same as those with one.
pub struct OwningResource<T> {
    slot: Option<(T, Destructor<T>)>,
}

impl<T> OwningResource<T> {
    /// Take ownership of `value`, destroying it with `destructor` later
    pub fn new<F>(value: T, destructor: F) -> Self
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        Self {
            slot: Some((value, Box::new(destructor))),
        }
    }

    /// A wrapper that owns nothing and destroys nothing
    pub const fn empty() -> Self {
        Self { slot: None }
    }

    /// Read access to the owned value, `None` once empty
    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref().map(|(value, _)| value)
    }

    /// Whether the wrapper currently owns nothing
    pub const fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Destroy the owned value now; no-op when already empty
    pub fn reset(&mut self) {
        if let Some((mut value, destructor)) = self.slot.take() {
            destructor(&mut value);
        }
    }

    /// Destroy the current value (if any), then take ownership of `value`
    pub fn replace<F>(&mut self, value: T, destructor: F)
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.reset();
        self.slot = Some((value, Box::new(destructor)));
    }

    /// Move ownership into a new wrapper, leaving this one empty
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            slot: self.slot.take(),
        }
    }

    /// Give up ownership without destroying the value
    ///
    /// The caller becomes responsible for tearing the value down.
    #[must_use]
    pub fn release(mut self) -> Option<T> {
        self.slot.take().map(|(value, _)| value)
    }
}

impl<T> Default for OwningResource<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Drop for OwningResource<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: fmt::Debug> fmt::Debug for OwningResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("OwningResource").field(value).finish(),
            None => f.write_str("OwningResource(<empty>)"),
        }
    }
}
