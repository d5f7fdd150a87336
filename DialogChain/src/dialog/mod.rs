//! Dialogue chain handling for Baldur's Gate 3
//!
//! This module provides the dialog document model, a decoder and encoder for
//! the LSX dialog layout, graph utilities, and the localization merge that
//! collects the text handles a dialog introduces.
//!
//! # Overview
//!
//! - Each node has a constructor type (`TagAnswer`, `Jump`, `ActiveRoll`, ...)
//! - Nodes are linked by directed edges; jumps and groups add implicit links
//! - Tagged texts carry localization handles, resolved through a
//!   [`LocalizationTable`]
//!
//! # Usage
//!
//! ```no_run
//! use dialogchain::dialog::{LocalizationTable, read_dialog, write_dialog};
//!
//! let table = LocalizationTable::load_optional("english.xml")?;
//! let decoded = read_dialog("dialog.lsx", table.as_ref())?;
//! for warning in &decoded.warnings {
//!     println!("{warning}");
//! }
//! write_dialog(&decoded.dialog, "dialog_copy.lsx")?;
//! # Ok::<(), dialogchain::Error>(())
//! ```

mod attributes;
mod difficulty;
mod editing;
mod graph;
mod localization;
mod parser;
mod types;
mod writer;

pub use attributes::{
    get_bool_attribute, get_bool_attribute_any, get_int_attribute, get_int_attribute_any,
    get_optional_int_attribute, get_optional_string_attribute, get_string_attribute,
};
pub use difficulty::{
    DEFAULT_DIFFICULTY_CLASS_ID, DIFFICULTY_CLASSES, DifficultyClassInfo,
    fallback_difficulty_class, find_difficulty_class,
};
pub use editing::FlagList;
pub use graph::{children_of, incoming, outgoing, remove_direct_links_bypassing_reroutes};
pub use localization::{
    LocalizationTable, compute_new_handles, render_localization_xml, write_new_handles,
};
pub use parser::{DecodedDialog, decode_dialog, decode_dialog_bytes, parse_dialog, read_dialog};
pub use types::*;
pub use writer::{encode_dialog, to_lsx_document, write_dialog};
