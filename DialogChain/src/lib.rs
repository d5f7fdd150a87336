//! # DialogChain
//!
//! A pure-Rust library for Baldur's Gate 3 dialog files in LSX form.
//!
//! ## Features
//!
//! - **Dialog model** - Nodes keyed by UUID with a flat edge set
//! - **LSX codec** - Tolerant decoding with collected warnings, byte-stable encoding
//! - **Localization merge** - Export the text handles a dialog introduces
//!
//! ## Quick Start
//!
//! ```no_run
//! use dialogchain::prelude::*;
//!
//! let decoded = read_dialog("dialog.lsx", None)?;
//! println!("{} nodes, {} warnings", decoded.dialog.node_count(), decoded.warnings.len());
//!
//! let xml = encode_dialog(&decoded.dialog)?;
//! # let _ = xml;
//! # Ok::<(), dialogchain::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `dialogchain` command-line binary

pub mod config;
pub mod dialog;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{DecodeWarning, Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::EditorConfig;
    pub use crate::error::{DecodeWarning, Error, Result};
    pub use crate::formats::loca::{LocaResource, LocalizedText};
    pub use crate::formats::lsx::{LsxAttribute, LsxDocument, LsxNode, LsxRegion};

    pub use crate::dialog::{
        DecodedDialog, Dialog, DialogNode, Edge, Flag, FlagList, LocalizationTable, NodeKind,
        TaggedText, children_of, compute_new_handles, decode_dialog, encode_dialog, read_dialog,
        remove_direct_links_bypassing_reroutes, write_dialog, write_new_handles,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
