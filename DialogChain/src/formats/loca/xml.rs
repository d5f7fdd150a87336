//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! `contentList` XML reading and writing

use super::{LocaResource, LocalizedText};
use crate::error::{Error, Result};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Escape only the characters required in XML text content (not attributes).
/// In text content, only < and & need escaping. Apostrophes and quotes are fine.
fn escape_text_minimal(s: &str) -> Cow<'_, str> {
    if s.contains('&') || s.contains('<') {
        Cow::Owned(s.replace('&', "&amp;").replace('<', "&lt;"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Read a `contentList` XML file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_loca_xml<P: AsRef<Path>>(path: P) -> Result<LocaResource> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
    from_xml(&content)
}

/// Write a `contentList` XML file
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_loca_xml<P: AsRef<Path>>(path: P, resource: &LocaResource) -> Result<()> {
    let path = path.as_ref();
    let xml = to_xml(resource)?;
    fs::write(path, xml).map_err(|e| Error::file_access(path, e))?;
    Ok(())
}

/// Parse XML string to `LocaResource`
///
/// # Errors
/// Returns an error if XML parsing fails.
pub fn from_xml(content: &str) -> Result<LocaResource> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    // Don't trim text - preserve trailing/leading whitespace in localization strings
    reader.trim_text(false);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;

    // Current entry being parsed
    let mut current: Option<LocalizedText> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if e.name().as_ref() == b"content" {
                    current = Some(read_content(&e)?);
                }
            }
            Ok(Event::Empty(e)) => {
                // Self-closing <content ... /> element (empty text)
                if e.name().as_ref() == b"content" {
                    entries.push(read_content(&e)?);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(entry) = current.as_mut() {
                    let text = e.unescape().map_err(Error::XmlError)?;
                    entry.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::MalformedDocument("unbalanced closing tag".to_string())
                })?;
                if e.name().as_ref() == b"content"
                    && let Some(entry) = current.take()
                {
                    entries.push(entry);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if current.is_some() {
        return Err(Error::MalformedDocument(
            "unterminated <content> element".to_string(),
        ));
    }
    if depth != 0 {
        return Err(Error::MalformedDocument(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }

    Ok(LocaResource { entries })
}

fn read_content(e: &BytesStart<'_>) -> Result<LocalizedText> {
    let mut entry = LocalizedText {
        key: String::new(),
        version: 1,
        text: String::new(),
    };
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"contentuid" => entry.key = attr.unescape_value()?.into_owned(),
            b"version" => {
                let value = attr.unescape_value()?;
                entry.version = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::invalid_value("version", &value))?;
            }
            _ => {}
        }
    }
    Ok(entry)
}

/// Convert `LocaResource` to XML string
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn to_xml(resource: &LocaResource) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', 4);

    // XML declaration
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    // <contentList>
    writer.write_event(Event::Start(BytesStart::new("contentList")))?;

    for entry in &resource.entries {
        let mut content = BytesStart::new("content");
        content.push_attribute(("contentuid", entry.key.as_str()));
        content.push_attribute(("version", entry.version.to_string().as_str()));

        if entry.text.is_empty() {
            // Self-closing for empty text
            writer.write_event(Event::Empty(content))?;
        } else {
            writer.write_event(Event::Start(content.borrow()))?;
            let escaped = escape_text_minimal(&entry.text);
            writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
            writer.write_event(Event::End(BytesEnd::new("content")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("contentList")))?;

    let mut xml = String::from_utf8(output)?;
    // Add trailing newline
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_xml_layout() {
        let mut resource = LocaResource::new();
        resource.add_entry("h1", "Hello & <welcome>");
        resource.add_entry("h2", "");

        let xml = to_xml(&resource).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<contentList>\n    \
<content contentuid=\"h1\" version=\"1\">Hello &amp; &lt;welcome></content>\n    \
<content contentuid=\"h2\" version=\"1\"/>\n\
</contentList>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_from_xml_preserves_whitespace_and_entities() {
        let xml = r#"<contentList>
    <content contentuid="h1" version="4"> padded &amp; spaced </content>
    <content contentuid="h2" version="1"/>
</contentList>"#;
        let resource = from_xml(xml).unwrap();
        assert_eq!(resource.len(), 2);
        assert_eq!(resource.entries[0].text, " padded & spaced ");
        assert_eq!(resource.entries[0].version, 4);
        assert_eq!(resource.entries[1].text, "");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loca.xml");
        let mut resource = LocaResource::new();
        resource.add_entry("h9", "It's \"quoted\"");

        write_loca_xml(&path, &resource).unwrap();
        assert_eq!(read_loca_xml(&path).unwrap(), resource);
    }

    #[test]
    fn test_unbalanced_markup_is_rejected() {
        let unclosed = r#"<contentList><content contentuid="h" version="1">a</content>"#;
        assert!(matches!(from_xml(unclosed), Err(Error::MalformedDocument(_))));

        let bad_version = r#"<contentList><content contentuid="h" version="v1">a</content></contentList>"#;
        assert!(matches!(
            from_xml(bad_version),
            Err(Error::InvalidAttributeValue { .. })
        ));
    }
}
