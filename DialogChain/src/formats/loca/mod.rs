//! Localization `contentList` XML format
//!
//! ```xml
//! <contentList>
//!     <content contentuid="h1234..." version="1">Text</content>
//! </contentList>
//! ```

mod xml;

pub use xml::{from_xml, read_loca_xml, to_xml, write_loca_xml};

use serde::{Deserialize, Serialize};

/// A single localized text entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Unique identifier key (e.g., "h1234567890abcdef...")
    pub key: String,
    /// Version number
    pub version: u16,
    /// The localized text content
    pub text: String,
}

/// A collection of localized text entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaResource {
    pub entries: Vec<LocalizedText>,
}

impl LocaResource {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a new entry or update an existing one (version 1 for new entries)
    ///
    /// Returns true if a new entry was added.
    pub fn add_entry(&mut self, key: impl Into<String>, text: impl Into<String>) -> bool {
        let key = key.into();
        let text = text.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.text = text;
            false
        } else {
            self.entries.push(LocalizedText {
                key,
                version: 1,
                text,
            });
            true
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
