//! UUID-keyed registry of extracted objects.
//!
//! The directory is the single source of truth for turning foreign-key
//! UUIDs into display names. It is filled during the first parsing pass,
//! updated in place by the process-model enhancement pass, and read-only
//! afterwards.

use super::{AppObject, ObjectType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Marker that excludes an object from the directory when found in its name.
pub const DEPRECATED_MARKER: &str = "DEPRECATED";

/// Why an object was not admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryRejection {
    #[error("object has no uuid")]
    MissingUuid,
    #[error("object '{0}' has no name")]
    MissingName(String),
    #[error("object '{0}' is marked deprecated")]
    Deprecated(String),
}

/// An admitted object and its insertion ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub ordinal: usize,
    pub object: Arc<AppObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectDirectory {
    entries: IndexMap<String, DirectoryEntry>,
    next_ordinal: usize,
}

impl ObjectDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an object and return its ordinal.
    ///
    /// Objects without a uuid or name, or whose name contains the
    /// deprecation marker (any case), are rejected. Re-adding a uuid that is
    /// already present overwrites the object but keeps the original ordinal.
    pub fn add(&mut self, object: AppObject) -> Result<usize, DirectoryRejection> {
        let uuid = object.uuid().trim();
        if uuid.is_empty() {
            return Err(DirectoryRejection::MissingUuid);
        }
        let name = object.name().trim();
        if name.is_empty() {
            return Err(DirectoryRejection::MissingName(uuid.to_string()));
        }
        if name.to_uppercase().contains(DEPRECATED_MARKER) {
            return Err(DirectoryRejection::Deprecated(name.to_string()));
        }

        let uuid = uuid.to_string();
        if let Some(entry) = self.entries.get_mut(&uuid) {
            entry.object = Arc::new(object);
            return Ok(entry.ordinal);
        }

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.entries.insert(
            uuid,
            DirectoryEntry {
                ordinal,
                object: Arc::new(object),
            },
        );
        Ok(ordinal)
    }

    /// Replace an existing entry by uuid, keeping its ordinal.
    ///
    /// Returns `false` when the uuid is not in the directory.
    pub fn replace(&mut self, object: AppObject) -> bool {
        match self.entries.get_mut(object.uuid().trim()) {
            Some(entry) => {
                entry.object = Arc::new(object);
                true
            }
            None => false,
        }
    }

    // Keys are stored trimmed, so every lookup trims too.

    #[must_use]
    pub fn get(&self, uuid: &str) -> Option<&Arc<AppObject>> {
        self.entries.get(uuid.trim()).map(|e| &e.object)
    }

    #[must_use]
    pub fn entry(&self, uuid: &str) -> Option<&DirectoryEntry> {
        self.entries.get(uuid.trim())
    }

    pub(crate) fn entry_mut(&mut self, uuid: &str) -> Option<&mut DirectoryEntry> {
        self.entries.get_mut(uuid.trim())
    }

    #[must_use]
    pub fn contains(&self, uuid: &str) -> bool {
        self.entries.contains_key(uuid.trim())
    }

    /// Display name for a uuid, or a redacted placeholder when unknown.
    #[must_use]
    pub fn resolve(&self, uuid: &str) -> String {
        let uuid = uuid.trim();
        if uuid.is_empty() {
            return "Unknown".to_string();
        }
        match self.entries.get(uuid) {
            Some(entry) => entry.object.name().to_string(),
            None => {
                tracing::debug!(uuid, "unresolved reference");
                let prefix: String = uuid.chars().take(8).collect();
                format!("Unknown ({prefix}...)")
            }
        }
    }

    /// Kind of the object behind a uuid.
    #[must_use]
    pub fn object_type_of(&self, uuid: &str) -> Option<&ObjectType> {
        self.entries.get(uuid.trim()).map(|e| e.object.object_type())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Objects in ordinal order.
    pub fn objects(&self) -> impl Iterator<Item = &Arc<AppObject>> {
        self.entries.values().map(|e| &e.object)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &DirectoryEntry)> {
        self.entries.iter()
    }

    pub fn uuids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectCore, SimpleObject};

    fn simple(uuid: &str, name: &str) -> AppObject {
        AppObject::Simple(SimpleObject::new(ObjectCore::new(
            uuid,
            name,
            ObjectType::Interface,
        )))
    }

    #[test]
    fn test_add_assigns_sequential_ordinals() {
        let mut dir = ObjectDirectory::new();
        assert_eq!(dir.add(simple("a", "A")), Ok(0));
        assert_eq!(dir.add(simple("b", "B")), Ok(1));
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_add_rejects_missing_identity() {
        let mut dir = ObjectDirectory::new();
        assert_eq!(dir.add(simple("", "A")), Err(DirectoryRejection::MissingUuid));
        assert!(matches!(
            dir.add(simple("u", "  ")),
            Err(DirectoryRejection::MissingName(_))
        ));
        assert!(dir.is_empty());
    }

    #[test]
    fn test_add_rejects_deprecated_any_case() {
        let mut dir = ObjectDirectory::new();
        assert!(dir.add(simple("a", "Old Form (Deprecated)")).is_err());
        assert!(dir.add(simple("b", "zz_DEPRECATED_rule")).is_err());
        assert!(dir.is_empty());
    }

    #[test]
    fn test_resolve() {
        let mut dir = ObjectDirectory::new();
        dir.add(simple("_a-0000-1111", "Home")).expect("add");

        assert_eq!(dir.resolve("_a-0000-1111"), "Home");
        assert_eq!(dir.resolve("0123456789abcdef"), "Unknown (01234567...)");
        assert_eq!(dir.resolve("abc"), "Unknown (abc...)");
        assert_eq!(dir.resolve(""), "Unknown");
    }

    #[test]
    fn test_replace_keeps_ordinal() {
        let mut dir = ObjectDirectory::new();
        dir.add(simple("a", "A")).expect("add");
        dir.add(simple("b", "B")).expect("add");

        assert!(dir.replace(simple("a", "A v2")));
        assert!(!dir.replace(simple("zzz", "Z")));

        let entry = dir.entry("a").expect("entry");
        assert_eq!(entry.ordinal, 0);
        assert_eq!(entry.object.name(), "A v2");
    }

    #[test]
    fn test_padded_uuid_is_found_either_way() {
        let mut dir = ObjectDirectory::new();
        dir.add(simple(" u-1 ", "Padded")).expect("add");

        for key in ["u-1", " u-1 ", "u-1\n"] {
            assert!(dir.contains(key), "lookup by {key:?}");
            assert_eq!(dir.get(key).map(|o| o.name()), Some("Padded"));
            assert_eq!(dir.resolve(key), "Padded");
            assert_eq!(dir.entry(key).map(|e| e.ordinal), Some(0));
            assert!(dir.entry_mut(key).is_some());
        }

        assert!(dir.replace(simple("u-1 ", "Padded v2")));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.resolve("u-1"), "Padded v2");
        assert_eq!(dir.object_type_of(" u-1"), Some(&ObjectType::Interface));
    }
}
