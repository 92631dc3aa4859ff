#![forbid(unsafe_code)]

//! Listener bookkeeping that unregisters on drop.
//!
//! A JS callback must be removed from its target before the Rust closure
//! behind it is freed; otherwise the next event invokes a dropped closure.

/// Something installed on the host that can be taken back down.
pub(crate) trait Registration {
    fn unregister(self);
}

/// Owns installed registrations and removes each exactly once.
pub(crate) struct ListenerRegistry<R: Registration> {
    entries: Vec<R>,
}

impl<R: Registration> ListenerRegistry<R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: R) {
        self.entries.push(entry);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unregister everything, most recent first. Idempotent.
    pub(crate) fn clear(&mut self) {
        while let Some(entry) = self.entries.pop() {
            entry.unregister();
        }
    }
}

impl<R: Registration> Drop for ListenerRegistry<R> {
    fn drop(&mut self) {
        self.clear();
    }
}
