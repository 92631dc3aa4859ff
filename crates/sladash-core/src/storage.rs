#![forbid(unsafe_code)]

//! Durable key/value storage and the sidebar preference built on it.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic. The
//!    [`KeyValueStorage`] seam returns `Result`; [`PreferenceStore`] swallows
//!    the error, logs it, and behaves as if the key were unset.
//! 2. **Single writer**: only the sidebar controller owns a
//!    [`PreferenceStore`], so no locking is needed.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Unavailable` | Storage disabled (private mode, policy) | Preference reads `false`, writes dropped |
//! | `StorageError::QuotaExceeded` | Byte quota reached | Write dropped, previous value kept |
//! | `StorageError::Backend` | Any other host error | Same as unavailable |
//! | Unparsable value | Foreign writer | Preference reads `false` |

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Errors raised by a [`KeyValueStorage`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or inaccessible.
    Unavailable(String),
    /// Writing the key would exceed the backend's byte quota.
    QuotaExceeded { key: String },
    /// Any other backend failure.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StorageError::QuotaExceeded { key } => write!(f, "storage quota exceeded writing {key:?}"),
            StorageError::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string key/value store (the shape of `window.localStorage`).
pub trait KeyValueStorage {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// In-memory storage backend for tests and hosts without durable storage.
///
/// Usage is counted as key bytes plus value bytes, summed over all entries.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStorage {
    /// Create a new empty, unlimited storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that rejects writes pushing usage past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Create storage on which every operation fails with
    /// [`StorageError::Unavailable`].
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Create storage pre-populated with entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self {
            data: RefCell::new(data),
            ..Self::default()
        }
    }

    /// Current usage in bytes.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.data.borrow().iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Raw stored value, bypassing the availability check.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn check_available(&self) -> StorageResult<()> {
        if self.disabled {
            return Err(StorageError::Unavailable("storage disabled".into()));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_available()?;
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check_available()?;
        if let Some(quota) = self.quota {
            let others: usize = self
                .data
                .borrow()
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded { key: key.to_owned() });
            }
        }
        self.data
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.check_available()?;
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}

const STORED_TRUE: &str = "1";
const STORED_FALSE: &str = "0";

/// Boolean preferences over a [`KeyValueStorage`], failures swallowed.
#[derive(Debug)]
pub struct PreferenceStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> PreferenceStore<S> {
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read a flag. Unset, unparsable and failed reads all yield `false`.
    pub fn get(&self, key: &str) -> bool {
        match self.storage.get_item(key) {
            Ok(Some(raw)) => match raw.as_str() {
                STORED_TRUE => true,
                STORED_FALSE => false,
                _ => {
                    tracing::debug!(key, value = %raw, "unparsable preference, treating as unset");
                    false
                }
            },
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(
                    backend = self.storage.name(),
                    key,
                    error = %err,
                    "preference read failed, treating as unset"
                );
                false
            }
        }
    }

    /// Persist a flag. Failures are logged and dropped.
    pub fn set(&self, key: &str, value: bool) {
        let raw = if value { STORED_TRUE } else { STORED_FALSE };
        if let Err(err) = self.storage.set_item(key, raw) {
            tracing::warn!(
                backend = self.storage.name(),
                key,
                error = %err,
                "preference write failed, continuing without persistence"
            );
        }
    }

    /// Borrow the underlying backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
