//! Key-value persistence
//!
//! The high-score ledger and settings are stored as JSON strings under fixed
//! keys. On the web the backend is LocalStorage; natively and in tests it is
//! an in-memory map. Nothing here is fatal: callers log failures and keep
//! their in-memory value.

mod storage;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::MemoryStorage;

/// Storage key for the high-score ledger
pub const HIGH_SCORES_KEY: &str = "sky_hopper_highscores";
/// Storage key for settings
pub const SETTINGS_KEY: &str = "sky_hopper_settings";

/// Why a storage operation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No backing store (private browsing, no window, access denied)
    Unavailable,
    /// The store refused the write
    Quota { key: String },
    /// The value could not be encoded or the stored text could not be decoded
    Serialize(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Quota { key } => write!(f, "storage quota exceeded writing '{key}'"),
            Self::Serialize(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// String key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(json) = storage.get(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&json)?;
    Ok(Some(value))
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}
