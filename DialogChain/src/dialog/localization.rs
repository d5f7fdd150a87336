//! Localization lookup and new-handle export
//!
//! A [`LocalizationTable`] maps content UIDs (text handles) to text. It is
//! used twice: to resolve node text while decoding, and as the reference
//! set when exporting the handles a dialog introduces.

use indexmap::IndexMap;
use std::io::ErrorKind;
use std::path::Path;

use super::types::Dialog;
use crate::error::{Error, Result};
use crate::formats::loca::{self, LocaResource, LocalizedText};

/// Handle -> text lookup built from a `contentList` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationTable {
    entries: IndexMap<String, String>,
}

impl LocalizationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a parsed resource. Entries without a content UID
    /// are dropped; for duplicate UIDs the last text wins.
    #[must_use]
    pub fn from_resource(resource: &LocaResource) -> Self {
        let mut table = Self::new();
        for entry in resource.entries.iter().filter(|e| !e.key.is_empty()) {
            table.insert(entry.key.clone(), entry.text.clone());
        }
        table
    }

    /// Parse `contentList` XML.
    ///
    /// # Errors
    /// Returns an error if the XML is malformed.
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self::from_resource(&loca::from_xml(xml)?))
    }

    /// Read a `contentList` XML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_resource(&loca::read_loca_xml(path)?))
    }

    /// Read a reference table that may not exist yet.
    ///
    /// A missing file yields `Ok(None)`. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let table = Self::parse(&content)?;
                tracing::info!(
                    "Loaded {} localization entries from {}",
                    table.len(),
                    path.display()
                );
                Ok(Some(table))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No localization file at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(Error::file_access(path, e)),
        }
    }

    pub fn insert(&mut self, handle: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(handle.into(), text.into());
    }

    #[must_use]
    pub fn get(&self, handle: &str) -> Option<&str> {
        self.entries.get(handle).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Collect the text handles to export for `dialog`.
///
/// For a new dialog every handle is returned. For a modification only the
/// handles missing from `reference` are returned; a missing reference counts
/// as empty. Handles keep first-seen document order, and a handle used twice
/// keeps the text of its last use. Empty handles are skipped.
#[must_use]
pub fn compute_new_handles(
    dialog: &Dialog,
    reference: Option<&LocalizationTable>,
) -> IndexMap<String, String> {
    let mut handles = IndexMap::new();
    for node in dialog.nodes.values() {
        let Some(texts) = node.kind.tagged_texts() else {
            continue;
        };
        for text in texts.iter().filter(|t| !t.handle.is_empty()) {
            let known = dialog.is_modification && reference.is_some_and(|r| r.contains(&text.handle));
            if !known {
                handles.insert(text.handle.clone(), text.text.clone());
            }
        }
    }
    tracing::debug!(
        "{} handle(s) to export (modification: {})",
        handles.len(),
        dialog.is_modification
    );
    handles
}

/// Render handles as `contentList` XML with `version="1"` entries.
///
/// Returns `Ok(None)` when there is nothing to emit.
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn render_localization_xml(handles: &IndexMap<String, String>) -> Result<Option<String>> {
    if handles.is_empty() {
        return Ok(None);
    }
    let resource = LocaResource {
        entries: handles
            .iter()
            .map(|(handle, text)| LocalizedText {
                key: handle.clone(),
                version: 1,
                text: text.clone(),
            })
            .collect(),
    };
    Ok(Some(loca::to_xml(&resource)?))
}

/// Compute the new handles of `dialog` and write them to `path`.
///
/// Nothing is written when there are no new handles. Returns the number of
/// entries written.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_new_handles<P: AsRef<Path>>(
    dialog: &Dialog,
    reference: Option<&LocalizationTable>,
    path: P,
) -> Result<usize> {
    let path = path.as_ref();
    let handles = compute_new_handles(dialog, reference);
    match render_localization_xml(&handles)? {
        Some(xml) => {
            std::fs::write(path, xml).map_err(|e| Error::file_access(path, e))?;
            tracing::info!("Wrote {} handle(s) to {}", handles.len(), path.display());
            Ok(handles.len())
        }
        None => {
            tracing::warn!("No new handles to export");
            Ok(0)
        }
    }
}
