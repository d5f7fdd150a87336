//! SPDX-FileCopyrightText: 2025 CyberDeco, 2015 Norbyte (LSLib, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! LSX file reading

use super::document::{LsxAttribute, LsxDocument, LsxNode, LsxRegion, LsxVersion};
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

/// Read an LSX file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has invalid XML.
pub fn read_lsx<P: AsRef<Path>>(path: P) -> Result<LsxDocument> {
    let path = path.as_ref();
    let content = fs::read(path).map_err(|e| Error::file_access(path, e))?;
    parse_lsx_bytes(&content)
}

/// Parse LSX from raw bytes (UTF-8, optional BOM)
///
/// # Errors
/// Returns an error if the bytes are not UTF-8 or the XML is malformed.
pub fn parse_lsx_bytes(content: &[u8]) -> Result<LsxDocument> {
    let content = String::from_utf8(content.to_vec())?;
    parse_lsx(&content)
}

/// Parse LSX from XML string
///
/// # Errors
/// Returns an error if the XML is malformed or has an invalid structure.
pub fn parse_lsx(content: &str) -> Result<LsxDocument> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut doc = LsxDocument::new();

    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut current_region: Option<LsxRegion> = None;
    let mut node_stack: Vec<LsxNode> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                match e.name().as_ref() {
                    b"version" => doc.version = Some(read_version(&e)?),
                    b"region" => current_region = Some(read_region(&e)?),
                    b"node" => node_stack.push(read_node(&e)?),
                    b"attribute" => push_attribute(&mut node_stack, read_attribute(&e)?)?,
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"version" => doc.version = Some(read_version(&e)?),
                b"region" => doc.regions.push(read_region(&e)?),
                b"attribute" => push_attribute(&mut node_stack, read_attribute(&e)?)?,
                b"node" => {
                    // Self-closing node with no attributes/children
                    let empty_node = read_node(&e)?;
                    attach_node(empty_node, &mut node_stack, current_region.as_mut());
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::MalformedDocument("unbalanced closing tag".to_string())
                })?;
                match e.name().as_ref() {
                    b"node" => {
                        if let Some(completed_node) = node_stack.pop() {
                            attach_node(completed_node, &mut node_stack, current_region.as_mut());
                        }
                    }
                    b"region" => {
                        if let Some(region) = current_region.take() {
                            doc.regions.push(region);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 || !node_stack.is_empty() || current_region.is_some() {
        return Err(Error::MalformedDocument(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }

    Ok(doc)
}

fn attach_node(node: LsxNode, stack: &mut [LsxNode], region: Option<&mut LsxRegion>) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if let Some(region) = region {
        region.nodes.push(node);
    }
}

fn push_attribute(stack: &mut [LsxNode], attribute: LsxAttribute) -> Result<()> {
    match stack.last_mut() {
        Some(node) => {
            node.attributes.push(attribute);
            Ok(())
        }
        None => Err(Error::MalformedDocument(format!(
            "attribute '{}' outside of a node",
            attribute.id
        ))),
    }
}

fn attr_string(attr: &Attribute<'_>) -> Result<String> {
    Ok(attr.unescape_value()?.into_owned())
}

fn read_version(e: &BytesStart<'_>) -> Result<LsxVersion> {
    let mut version = LsxVersion::default();
    for attr in e.attributes() {
        let attr = attr?;
        let field = match attr.key.as_ref() {
            b"major" => &mut version.major,
            b"minor" => &mut version.minor,
            b"revision" => &mut version.revision,
            b"build" => &mut version.build,
            _ => continue,
        };
        let value = attr_string(&attr)?;
        *field = value
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value("version", &value))?;
    }
    Ok(version)
}

fn read_region(e: &BytesStart<'_>) -> Result<LsxRegion> {
    let mut region_id = String::new();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"id" {
            region_id = attr_string(&attr)?;
        }
    }
    Ok(LsxRegion::new(region_id))
}

fn read_node(e: &BytesStart<'_>) -> Result<LsxNode> {
    let mut node = LsxNode::new(String::new());
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"id" => node.id = attr_string(&attr)?,
            b"key" => node.key = Some(attr_string(&attr)?),
            _ => {}
        }
    }
    Ok(node)
}

fn read_attribute(e: &BytesStart<'_>) -> Result<LsxAttribute> {
    let mut attribute = LsxAttribute::new(String::new(), String::new(), String::new());
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"id" => attribute.id = attr_string(&attr)?,
            b"type" => attribute.type_name = attr_string(&attr)?,
            b"value" => attribute.value = attr_string(&attr)?,
            b"handle" => attribute.handle = Some(attr_string(&attr)?),
            b"version" => {
                let value = attr_string(&attr)?;
                let version = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::invalid_value("version", &value))?;
                attribute.version = Some(version);
            }
            _ => {}
        }
    }
    Ok(attribute)
}
