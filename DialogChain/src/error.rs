//! Error types for `DialogChain`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `DialogChain` operations.
///
/// Every variant aborts the operation that raised it. Problems the decoder
/// can recover from are reported as [`DecodeWarning`]s instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be read or written.
    #[error("failed to access {path}: {source}")]
    FileAccess {
        /// The path that was being accessed.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// The markup is well-formed XML but not a well-formed LSX tree.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== Dialog Errors ====================
    /// The document has no `dialog` region or no `dialog` root node.
    #[error("missing dialog region: {0}")]
    MissingDialogRegion(String),

    /// An attribute could not be converted to its declared type.
    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttributeValue {
        /// The attribute id.
        attribute: String,
        /// The raw value found in the document.
        value: String,
    },

    // ==================== Configuration Errors ====================
    /// No platform configuration directory is available.
    #[error("could not determine the configuration directory")]
    ConfigDirNotFound,
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

impl Error {
    pub(crate) fn invalid_value(attribute: &str, value: &str) -> Self {
        Error::InvalidAttributeValue {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for `DialogChain` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A recoverable problem found while decoding a dialog.
///
/// Warnings are collected and returned next to the decoded dialog. The
/// offending element or edge is skipped, or a default is substituted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A node element lacks its `UUID`, `constructor` or jump target.
    #[error("skipping node {}: missing {field}", .node.as_deref().unwrap_or("without UUID"))]
    MissingRequiredField {
        /// The node UUID, when the element has one.
        node: Option<String>,
        /// The missing attribute.
        field: String,
    },

    /// A child, jump target or root reference names a node that does not exist.
    #[error("node {from} references unknown node {target}")]
    UnresolvedReference {
        /// The referencing node, or `RootNodes` for the root list.
        from: String,
        /// The unresolved id.
        target: String,
    },

    /// An enumerated value is not one of the known options.
    #[error("node {node}: invalid {field} '{value}', using '{fallback}'")]
    InvalidEnumValue {
        /// The node the value belongs to.
        node: String,
        /// The field name.
        field: String,
        /// The rejected value.
        value: String,
        /// The substituted default.
        fallback: String,
    },

    /// A node element could not be converted and was skipped.
    #[error("skipping node {node}: {reason}")]
    MalformedElement {
        /// The node UUID.
        node: String,
        /// What went wrong.
        reason: String,
    },

    /// A node element has a constructor no decoder pass recognizes.
    #[error("skipping node {node}: unsupported constructor '{constructor}'")]
    UnsupportedConstructor {
        /// The node UUID.
        node: String,
        /// The unrecognized constructor.
        constructor: String,
    },
}
