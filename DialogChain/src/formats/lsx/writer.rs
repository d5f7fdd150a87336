//! SPDX-FileCopyrightText: 2025 CyberDeco, 2015 Norbyte (LSLib, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! LSX file writing
//!
//! Output is UTF-8 without BOM, LF line endings, four-space indentation and
//! `" />"` for self-closing tags, so that identical trees serialize to
//! identical bytes.

use super::document::{LsxAttribute, LsxDocument, LsxNode, LsxVersion};
use crate::error::{Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::fs;
use std::path::Path;

/// Write an LSX document to disk
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_lsx<P: AsRef<Path>>(doc: &LsxDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    let xml = serialize_lsx(doc)?;
    fs::write(path, xml).map_err(|e| Error::file_access(path, e))?;
    Ok(())
}

/// Serialize LSX document to XML string
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_lsx(doc: &LsxDocument) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("save")))?;

    if let Some(version) = doc.version {
        writer.write_event(Event::Empty(version_tag(version)))?;
    }

    for region in &doc.regions {
        let region_tag = BytesStart::new("region").with_attributes([("id", region.id.as_str())]);
        writer.write_event(Event::Start(region_tag))?;
        for node in &region.nodes {
            write_node(&mut writer, node)?;
        }
        writer.write_event(Event::End(BytesEnd::new("region")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("save")))?;

    // quick-xml writes `<tag/>`; values are escaped, so this only touches tag ends
    Ok(String::from_utf8(output)?.replace("/>", " />"))
}

fn version_tag(version: LsxVersion) -> BytesStart<'static> {
    let mut tag = BytesStart::new("version");
    for (key, value) in [
        ("major", version.major),
        ("minor", version.minor),
        ("revision", version.revision),
        ("build", version.build),
    ] {
        tag.push_attribute((key, value.to_string().as_str()));
    }
    tag
}

/// `<attribute>` tag. Translated strings carry `handle`/`version` and only
/// write `value` when it is set.
fn attribute_tag(attr: &LsxAttribute) -> BytesStart<'_> {
    let mut tag = BytesStart::new("attribute")
        .with_attributes([("id", attr.id.as_str()), ("type", attr.type_name.as_str())]);
    match &attr.handle {
        Some(handle) => {
            tag.push_attribute(("handle", handle.as_str()));
            if !attr.value.is_empty() {
                tag.push_attribute(("value", attr.value.as_str()));
            }
            if let Some(version) = attr.version {
                tag.push_attribute(("version", version.to_string().as_str()));
            }
        }
        None => tag.push_attribute(("value", attr.value.as_str())),
    }
    tag
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &LsxNode) -> Result<()> {
    let mut tag = BytesStart::new("node").with_attributes([("id", node.id.as_str())]);
    if let Some(key) = &node.key {
        tag.push_attribute(("key", key.as_str()));
    }

    if node.attributes.is_empty() && node.children.is_empty() {
        writer.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(tag))?;
    for attr in &node.attributes {
        writer.write_event(Event::Empty(attribute_tag(attr)))?;
    }
    if !node.children.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("children")))?;
        for child in &node.children {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new("children")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("node")))?;
    Ok(())
}
