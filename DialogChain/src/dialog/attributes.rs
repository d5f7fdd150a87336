//! Typed attribute access on LSX nodes
//!
//! Absent attributes yield the caller's default. A present integer attribute
//! that does not parse is an error, never silently defaulted.

use crate::error::{Error, Result};
use crate::formats::lsx::LsxNode;

/// Read a bool attribute. Only a case-insensitive `true` is true.
#[must_use]
pub fn get_bool_attribute(node: &LsxNode, id: &str, default: bool) -> bool {
    node.attribute(id)
        .map_or(default, |attr| attr.value.trim().eq_ignore_ascii_case("true"))
}

/// Read an integer attribute.
///
/// # Errors
/// Returns [`Error::InvalidAttributeValue`] if the attribute is present but not an integer.
pub fn get_int_attribute(node: &LsxNode, id: &str, default: i32) -> Result<i32> {
    Ok(get_optional_int_attribute(node, id)?.unwrap_or(default))
}

/// Read an integer attribute, `None` when absent.
///
/// # Errors
/// Returns [`Error::InvalidAttributeValue`] if the attribute is present but not an integer.
pub fn get_optional_int_attribute(node: &LsxNode, id: &str) -> Result<Option<i32>> {
    match node.attribute(id) {
        Some(attr) => attr
            .value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidAttributeValue {
                attribute: id.to_string(),
                value: attr.value.clone(),
            }),
        None => Ok(None),
    }
}

/// Read a string attribute verbatim.
#[must_use]
pub fn get_string_attribute(node: &LsxNode, id: &str, default: &str) -> String {
    get_optional_string_attribute(node, id)
        .unwrap_or(default)
        .to_string()
}

/// Read a string attribute, `None` when absent.
#[must_use]
pub fn get_optional_string_attribute<'a>(node: &'a LsxNode, id: &str) -> Option<&'a str> {
    node.attribute(id).map(|attr| attr.value.as_str())
}

/// Read the first of several alternative spellings of a bool attribute.
#[must_use]
pub fn get_bool_attribute_any(node: &LsxNode, ids: &[&str], default: bool) -> bool {
    ids.iter()
        .find(|id| node.attribute(id).is_some())
        .map_or(default, |id| get_bool_attribute(node, id, default))
}

/// Read the first of several alternative spellings of an integer attribute.
///
/// # Errors
/// Returns [`Error::InvalidAttributeValue`] if the chosen attribute is not an integer.
pub fn get_int_attribute_any(node: &LsxNode, ids: &[&str], default: i32) -> Result<i32> {
    match ids.iter().find(|id| node.attribute(id).is_some()) {
        Some(id) => get_int_attribute(node, id, default),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> LsxNode {
        let mut node = LsxNode::new("node");
        node.push_attribute("Root", "bool", "True");
        node.push_attribute("endnode", "bool", "yes");
        node.push_attribute("speaker", "int32", " 3 ");
        node.push_attribute("GroupIndex", "int32", "abc");
        node.push_attribute("Empty", "int32", "");
        node.push_attribute("GroupID", "FixedString", "");
        node
    }

    #[test]
    fn test_bool() {
        let node = node();
        assert!(get_bool_attribute(&node, "Root", false));
        assert!(!get_bool_attribute(&node, "endnode", true));
        assert!(get_bool_attribute(&node, "Missing", true));
        assert!(!get_bool_attribute(&node, "Missing", false));
    }

    #[test]
    fn test_int() {
        let node = node();
        assert_eq!(get_int_attribute(&node, "speaker", 0).unwrap(), 3);
        assert_eq!(get_int_attribute(&node, "Missing", -1).unwrap(), -1);
        assert!(matches!(
            get_int_attribute(&node, "GroupIndex", 0),
            Err(Error::InvalidAttributeValue { .. })
        ));
        assert!(get_int_attribute(&node, "Empty", 0).is_err());
        assert_eq!(get_optional_int_attribute(&node, "Missing").unwrap(), None);
    }

    #[test]
    fn test_string() {
        let node = node();
        assert_eq!(get_string_attribute(&node, "GroupID", "x"), "");
        assert_eq!(get_string_attribute(&node, "Missing", "x"), "x");
        assert_eq!(get_optional_string_attribute(&node, "Missing"), None);
    }

    #[test]
    fn test_alternative_spellings() {
        let mut node = LsxNode::new("node");
        node.push_attribute("trademode", "uint8", "2");
        node.push_attribute("root", "bool", "true");
        assert_eq!(get_int_attribute_any(&node, &["TradeMode", "trademode"], 1).unwrap(), 2);
        assert!(get_bool_attribute_any(&node, &["Root", "root"], false));
        assert_eq!(get_int_attribute_any(&node, &["Nope"], 1).unwrap(), 1);
    }
}
