//! Typed access to the application's persisted records.
//!
//! Each logical record lives as a JSON text value under a fixed key in an
//! injected [`KeyValueStore`]. Reads of a missing key yield `None`; callers
//! supply their own defaults. Writes complete before returning and are never
//! retried: a failed write is logged and handed back to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use crate::symptoms::{CustomSymptoms, SymptomSelection};

/// Key of the first-launch flag.
pub const STORAGE_KEY_IS_FIRST_LAUNCH: &str = "is_first_launch";
/// Key of the symptom category selection.
pub const STORAGE_KEY_SYMPTOMS: &str = "symptoms";
/// Key of the "supported device" flag.
pub const STORAGE_KEY_SUPPORTED: &str = "supported";
/// Key of the custom symptom list.
pub const STORAGE_KEY_CUSTOM_SYMPTOMS: &str = "custom_symptoms";

/// Every key this adapter owns.
pub const STORAGE_KEYS: &[&str] = &[
    STORAGE_KEY_IS_FIRST_LAUNCH,
    STORAGE_KEY_SYMPTOMS,
    STORAGE_KEY_SUPPORTED,
    STORAGE_KEY_CUSTOM_SYMPTOMS,
];

/// Persistence adapter over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct LocalStorage<S> {
    store: S,
}

impl<S: KeyValueStore> LocalStorage<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read and decode the record under `key`.
    ///
    /// An empty stored string counts as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the record is not valid JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get_item(key).await? else {
            debug!("No record under '{}'", key);
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| Error::CorruptRecord {
                key: key.to_string(),
                source,
            })
    }

    /// Encode `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails. Write failures are
    /// also logged at `error` level.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        if let Err(e) = self.store.set_item(key, &raw).await {
            error!("Failed to persist '{}': {}", key, e);
            return Err(e);
        }
        Ok(())
    }

    /// The persisted symptom selection, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the record is corrupt.
    pub async fn symptoms(&self) -> Result<Option<SymptomSelection>> {
        self.get_json(STORAGE_KEY_SYMPTOMS).await
    }

    /// Persist the full symptom selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set_symptoms(&self, selection: &SymptomSelection) -> Result<()> {
        self.set_json(STORAGE_KEY_SYMPTOMS, selection).await
    }

    /// The first-launch flag, if recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the record is corrupt.
    pub async fn is_first_launch(&self) -> Result<Option<bool>> {
        self.get_json(STORAGE_KEY_IS_FIRST_LAUNCH).await
    }

    /// Record the first-launch flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set_first_launch(&self, first_launch: bool) -> Result<()> {
        self.set_json(STORAGE_KEY_IS_FIRST_LAUNCH, &first_launch)
            .await
    }

    /// The "supported device" flag, if recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the record is corrupt.
    pub async fn supported(&self) -> Result<Option<bool>> {
        self.get_json(STORAGE_KEY_SUPPORTED).await
    }

    /// Record the "supported device" flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set_supported(&self, supported: bool) -> Result<()> {
        self.set_json(STORAGE_KEY_SUPPORTED, &supported).await
    }

    /// The custom symptom list.
    ///
    /// Missing, `null` and undecodable records all read as an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails.
    pub async fn custom_symptoms(&self) -> Result<CustomSymptoms> {
        match self
            .get_json::<Option<CustomSymptoms>>(STORAGE_KEY_CUSTOM_SYMPTOMS)
            .await
        {
            Ok(list) => Ok(list.flatten().unwrap_or_default()),
            Err(e) if e.is_corrupt_record() => {
                warn!("Ignoring unreadable custom symptom list: {}", e);
                Ok(CustomSymptoms::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Append `name` to the persisted custom list and return the new list.
    ///
    /// Names already present are not duplicated (and nothing is written).
    ///
    /// # Errors
    ///
    /// Returns an error if the read or the write fails.
    pub async fn add_custom_symptom(&self, name: &str) -> Result<CustomSymptoms> {
        let mut list = self.custom_symptoms().await?;
        if list.push(name) {
            self.set_json(STORAGE_KEY_CUSTOM_SYMPTOMS, &list).await?;
        }
        Ok(list)
    }

    /// Keys of this adapter currently present in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn stored_keys(&self) -> Result<Vec<String>> {
        let mut keys = self.store.keys().await?;
        keys.retain(|key| STORAGE_KEYS.contains(&key.as_str()));
        Ok(keys)
    }

    /// Remove every record owned by this adapter. Returns how many existed.
    ///
    /// # Errors
    ///
    /// Returns an error if a removal fails; earlier removals are kept.
    pub async fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for key in STORAGE_KEYS {
            if self.store.remove_item(key).await? {
                removed += 1;
            }
        }
        info!("Cleared {} stored records", removed);
        Ok(removed)
    }
}
