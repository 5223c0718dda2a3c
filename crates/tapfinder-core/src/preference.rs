//! Persisted reference-location preference and reference resolution

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Result, TapfinderError};
use crate::models::{ReferenceLocation, ReferenceSource};

/// How long a stored preference stays usable
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// What produced a stored preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    Geolocation,
    Search,
}

/// A reference location remembered between invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPreference {
    pub kind: PreferenceKind,

    /// The text that was geocoded, for `Search` preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,

    pub latitude: f64,
    pub longitude: f64,
    pub saved_at: DateTime<Utc>,
}

impl StoredPreference {
    /// Capture a resolved reference as a preference
    pub fn from_reference(reference: &ReferenceLocation, saved_at: DateTime<Utc>) -> Self {
        let kind = match reference.source {
            ReferenceSource::Search => PreferenceKind::Search,
            _ => PreferenceKind::Geolocation,
        };
        let search_term = match kind {
            PreferenceKind::Search => reference.label.clone(),
            PreferenceKind::Geolocation => None,
        };

        Self {
            kind,
            search_term,
            latitude: reference.latitude,
            longitude: reference.longitude,
            saved_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.saved_at >= max_age
    }

    pub fn to_reference(&self) -> ReferenceLocation {
        let reference =
            ReferenceLocation::new(self.latitude, self.longitude, ReferenceSource::Persisted);
        match &self.search_term {
            Some(term) => reference.with_label(term.clone()),
            None => reference,
        }
    }
}

/// Storage for at most one preference
pub trait PreferenceStore {
    fn load(&self) -> Result<Option<StoredPreference>>;

    fn save(&self, preference: &StoredPreference) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Preference kept as a single JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Result<Option<StoredPreference>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(preference) => Ok(Some(preference)),
            Err(e) => {
                // A corrupt file behaves like no preference at all
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable stored preference"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, preference: &StoredPreference) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(preference)
            .map_err(|e| TapfinderError::Serialization(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory preference store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    slot: RwLock<Option<StoredPreference>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> TapfinderError {
    TapfinderError::PreferenceStore("lock poisoned".to_string())
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<StoredPreference>> {
        Ok(self.slot.read().map_err(poisoned)?.clone())
    }

    fn save(&self, preference: &StoredPreference) -> Result<()> {
        *self.slot.write().map_err(poisoned)? = Some(preference.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write().map_err(poisoned)? = None;
        Ok(())
    }
}

/// Outcome of [`resolve_reference`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub reference: Option<ReferenceLocation>,

    /// A stored preference existed but was too old; the caller should clear it
    pub stored_expired: bool,
}

/// Pick the reference for one call.
///
/// Order: an explicit user action, then a stored preference younger than
/// `max_age` with valid coordinates, then the configured default.
pub fn resolve_reference(
    explicit: Option<ReferenceLocation>,
    stored: Option<&StoredPreference>,
    default: Option<&ReferenceLocation>,
    now: DateTime<Utc>,
    max_age: Duration,
) -> ResolvedReference {
    let stored_expired = stored.is_some_and(|p| p.is_expired(now, max_age));

    if let Some(reference) = explicit.filter(ReferenceLocation::is_valid) {
        return ResolvedReference { reference: Some(reference), stored_expired };
    }

    let persisted = stored
        .filter(|p| !p.is_expired(now, max_age))
        .map(StoredPreference::to_reference)
        .filter(ReferenceLocation::is_valid);
    if persisted.is_some() {
        return ResolvedReference { reference: persisted, stored_expired };
    }

    let fallback = default.filter(|r| r.is_valid()).map(|r| {
        let mut reference = r.clone();
        reference.source = ReferenceSource::Default;
        reference
    });

    ResolvedReference { reference: fallback, stored_expired }
}
