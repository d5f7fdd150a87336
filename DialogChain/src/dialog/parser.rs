//! Dialog decoding from LSX
//!
//! Decoding runs in phases: dialog globals, a scan of every `node` element,
//! one pass per node kind, a pass for `ValidatedFlags`, root markers, and
//! finally edge resolution. Element-level problems are collected as
//! [`DecodeWarning`]s and the element is skipped; only a broken document or
//! malformed globals abort.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

use super::attributes::{
    get_bool_attribute, get_bool_attribute_any, get_int_attribute, get_int_attribute_any,
    get_optional_int_attribute, get_optional_string_attribute, get_string_attribute,
};
use super::difficulty::{fallback_difficulty_class, find_difficulty_class};
use super::localization::LocalizationTable;
use super::types::{
    Ability, Alias, DefaultAddressedSpeaker, Dialog, DialogNode, DialogueLine, Edge, Flag,
    FlagType, Jump, LineConstructor, NestedDialog, NodeKind, Roll, RollConstructor, RollResult,
    RollType, Skill, SpeakerInfo, SpeakerLink, TaggedText, Trade, VisualState,
};
use crate::error::{DecodeWarning, Error, Result};
use crate::formats::lsx::{LsxDocument, LsxNode, parse_lsx, parse_lsx_bytes, read_lsx};

/// A decoded dialog together with everything that was skipped or substituted.
#[derive(Debug, Clone, Default)]
pub struct DecodedDialog {
    pub dialog: Dialog,
    pub warnings: Vec<DecodeWarning>,
}

/// Decode a dialog from LSX text.
///
/// # Errors
/// Returns an error if the markup is not well-formed, the dialog region is
/// missing, or a global attribute is malformed.
pub fn decode_dialog(xml: &str, localization: Option<&LocalizationTable>) -> Result<DecodedDialog> {
    parse_dialog(&parse_lsx(xml)?, localization)
}

/// Decode a dialog from raw LSX bytes.
///
/// # Errors
/// See [`decode_dialog`]. Non UTF-8 input is also an error.
pub fn decode_dialog_bytes(
    bytes: &[u8],
    localization: Option<&LocalizationTable>,
) -> Result<DecodedDialog> {
    parse_dialog(&parse_lsx_bytes(bytes)?, localization)
}

/// Read and decode a dialog file.
///
/// # Errors
/// See [`decode_dialog`]. IO failures are also errors.
pub fn read_dialog<P: AsRef<Path>>(
    path: P,
    localization: Option<&LocalizationTable>,
) -> Result<DecodedDialog> {
    let path = path.as_ref();
    tracing::info!("Reading dialog {}", path.display());
    parse_dialog(&read_lsx(path)?, localization)
}

/// Decode a dialog from an already parsed LSX document.
///
/// # Errors
/// Returns an error if the dialog region is missing or a global attribute is malformed.
pub fn parse_dialog(
    doc: &LsxDocument,
    localization: Option<&LocalizationTable>,
) -> Result<DecodedDialog> {
    let region = doc
        .region("dialog")
        .or_else(|| doc.region("Dialog"))
        .ok_or_else(|| Error::MissingDialogRegion("no region with id 'dialog'".to_string()))?;
    let root = region
        .node("dialog")
        .ok_or_else(|| Error::MissingDialogRegion("no 'dialog' node in region".to_string()))?;

    let mut decoder = Decoder::new(localization);
    decoder.read_globals(root)?;

    let candidates = decoder.scan_candidates(root);
    for pass in DecodePass::ALL {
        decoder.run_pass(*pass, &candidates);
    }
    decoder.read_validated_flags(&candidates);
    decoder.sort_nodes();
    if let Some(root_nodes) = root.child("nodes").and_then(|n| n.child("RootNodes")) {
        decoder.read_root_nodes(root_nodes);
    }
    decoder.resolve_edges();

    tracing::info!(
        "Decoded dialog {}: {} nodes, {} edges, {} warnings",
        decoder.dialog.uuid,
        decoder.dialog.nodes.len(),
        decoder.dialog.edges.len(),
        decoder.warnings.len()
    );

    Ok(DecodedDialog {
        dialog: decoder.dialog,
        warnings: decoder.warnings,
    })
}

/// Node kinds in the order their passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodePass {
    Jump,
    DialogueLine,
    Roll,
    RollResult,
    Alias,
    VisualState,
    NestedDialog,
    Trade,
}

impl DecodePass {
    const ALL: &'static [DecodePass] = &[
        DecodePass::Jump,
        DecodePass::DialogueLine,
        DecodePass::Roll,
        DecodePass::RollResult,
        DecodePass::Alias,
        DecodePass::VisualState,
        DecodePass::NestedDialog,
        DecodePass::Trade,
    ];

    fn for_constructor(constructor: &str) -> Option<Self> {
        if LineConstructor::parse(constructor).is_some() {
            return Some(DecodePass::DialogueLine);
        }
        if RollConstructor::parse(constructor).is_some() {
            return Some(DecodePass::Roll);
        }
        match constructor {
            "Jump" => Some(DecodePass::Jump),
            "RollResult" => Some(DecodePass::RollResult),
            "Alias" => Some(DecodePass::Alias),
            "Visual State" => Some(DecodePass::VisualState),
            "Nested Dialog" => Some(DecodePass::NestedDialog),
            "Trade" => Some(DecodePass::Trade),
            _ => None,
        }
    }
}

/// A `node` element with a UUID and constructor.
struct Candidate<'a> {
    position: usize,
    element: &'a LsxNode,
    uuid: String,
    constructor: String,
    pass: Option<DecodePass>,
}

struct Decoder<'t> {
    localization: Option<&'t LocalizationTable>,
    dialog: Dialog,
    warnings: Vec<DecodeWarning>,
    /// UUID -> document position of the element it was decoded from
    positions: HashMap<String, usize>,
    /// UUID -> declared child UUIDs
    declared_children: HashMap<String, Vec<String>>,
}

impl<'t> Decoder<'t> {
    fn new(localization: Option<&'t LocalizationTable>) -> Self {
        Self {
            localization,
            dialog: Dialog::new(),
            warnings: Vec::new(),
            positions: HashMap::new(),
            declared_children: HashMap::new(),
        }
    }

    fn warn(&mut self, warning: DecodeWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn read_globals(&mut self, root: &LsxNode) -> Result<()> {
        self.dialog.category = get_string_attribute(root, "category", "");
        self.dialog.uuid = get_string_attribute(root, "UUID", "");
        self.dialog.timeline_id = get_string_attribute(root, "TimelineId", "");

        if let Some(section) = root.child("DefaultAddressedSpeakers") {
            for object in section.children_with_id("Object") {
                self.dialog
                    .default_addressed_speakers
                    .push(DefaultAddressedSpeaker {
                        map_key: get_int_attribute(object, "MapKey", 0)?,
                        map_value: get_int_attribute(object, "MapValue", -1)?,
                    });
            }
        }

        if let Some(section) = root.child("speakerlist") {
            for speaker in section.children_with_id("speaker") {
                self.dialog.speakers.push(SpeakerInfo {
                    index: get_string_attribute(speaker, "index", ""),
                    list: get_string_attribute(speaker, "list", ""),
                    speaker_mapping_id: get_string_attribute(speaker, "SpeakerMappingId", ""),
                });
            }
        }

        tracing::debug!(
            "Dialog {} ({}): {} speakers, {} default addressed speakers",
            self.dialog.uuid,
            self.dialog.category,
            self.dialog.speakers.len(),
            self.dialog.default_addressed_speakers.len()
        );
        Ok(())
    }

    /// Collect every `node` element, warning once per element that lacks a
    /// UUID or constructor.
    fn scan_candidates<'a>(&mut self, root: &'a LsxNode) -> Vec<Candidate<'a>> {
        let mut candidates = Vec::new();
        for (position, element) in root.descendants_with_id("node").into_iter().enumerate() {
            let uuid = get_optional_string_attribute(element, "UUID")
                .map(str::trim)
                .unwrap_or_default();
            let constructor = get_optional_string_attribute(element, "constructor")
                .map(str::trim)
                .unwrap_or_default();

            if uuid.is_empty() || constructor.is_empty() {
                let field = if uuid.is_empty() { "UUID" } else { "constructor" };
                self.warn(DecodeWarning::MissingRequiredField {
                    node: (!uuid.is_empty()).then(|| uuid.to_string()),
                    field: field.to_string(),
                });
                continue;
            }

            let pass = DecodePass::for_constructor(constructor);
            if pass.is_none() {
                self.warn(DecodeWarning::UnsupportedConstructor {
                    node: uuid.to_string(),
                    constructor: constructor.to_string(),
                });
            }
            candidates.push(Candidate {
                position,
                element,
                uuid: uuid.to_string(),
                constructor: constructor.to_string(),
                pass,
            });
        }
        candidates
    }

    fn run_pass(&mut self, pass: DecodePass, candidates: &[Candidate<'_>]) {
        for candidate in candidates.iter().filter(|c| c.pass == Some(pass)) {
            if self.dialog.nodes.contains_key(&candidate.uuid) {
                self.warn(DecodeWarning::MalformedElement {
                    node: candidate.uuid.clone(),
                    reason: "duplicate UUID".to_string(),
                });
                continue;
            }

            match self.decode_element(pass, candidate) {
                Ok(Some((node, children))) => {
                    tracing::debug!(
                        "Decoded {} node {} ({} declared children)",
                        candidate.constructor,
                        node.uuid,
                        children.len()
                    );
                    self.positions.insert(node.uuid.clone(), candidate.position);
                    self.declared_children.insert(node.uuid.clone(), children);
                    self.dialog.nodes.insert(node.uuid.clone(), node);
                }
                Ok(None) => {}
                Err(e) => self.warn(DecodeWarning::MalformedElement {
                    node: candidate.uuid.clone(),
                    reason: e.to_string(),
                }),
            }
        }
    }

    fn decode_element(
        &mut self,
        pass: DecodePass,
        candidate: &Candidate<'_>,
    ) -> Result<Option<(DialogNode, Vec<String>)>> {
        let el = candidate.element;
        let uuid = candidate.uuid.as_str();

        let kind = match pass {
            DecodePass::Jump => {
                let target = get_optional_string_attribute(el, "jumptarget")
                    .map(str::trim)
                    .unwrap_or_default();
                if target.is_empty() {
                    self.warn(DecodeWarning::MissingRequiredField {
                        node: Some(uuid.to_string()),
                        field: "jumptarget".to_string(),
                    });
                    return Ok(None);
                }
                let jump = Jump {
                    jump_target: target.to_string(),
                    jump_target_point: get_int_attribute(el, "jumptargetpoint", 1)?,
                };
                let node = DialogNode::new(uuid, NodeKind::Jump(jump));
                return Ok(Some((node, vec![target.to_string()])));
            }
            DecodePass::DialogueLine => {
                let constructor =
                    LineConstructor::parse(&candidate.constructor).unwrap_or_default();
                NodeKind::DialogueLine(DialogueLine {
                    constructor,
                    show_once: get_bool_attribute(el, "ShowOnce", false),
                    group_id: get_string_attribute(el, "GroupID", ""),
                    group_index: get_int_attribute(el, "GroupIndex", 0)?,
                    approval_rating_id: approval_rating_id(el),
                    tagged_texts: self.read_tagged_texts(el),
                })
            }
            DecodePass::Roll => NodeKind::Roll(self.read_roll(el, candidate)?),
            DecodePass::RollResult => NodeKind::RollResult(RollResult {
                success: get_bool_attribute(el, "Success", false),
            }),
            DecodePass::Alias => NodeKind::Alias(Alias {
                greeting: get_bool_attribute(el, "Greeting", false),
                source_node: get_string_attribute(el, "SourceNode", ""),
                tagged_texts: self.read_tagged_texts(el),
            }),
            DecodePass::VisualState => NodeKind::VisualState(VisualState {
                group_id: get_string_attribute(el, "GroupID", ""),
                group_index: get_int_attribute(el, "GroupIndex", 0)?,
            }),
            DecodePass::NestedDialog => {
                let mut speaker_linking = Vec::new();
                if let Some(section) = el.find_descendant("SpeakerLinking") {
                    for entry in section.descendants_with_id("SpeakerLinkingEntry") {
                        speaker_linking.push(SpeakerLink {
                            key: get_int_attribute(entry, "Key", 0)?,
                            value: get_int_attribute(entry, "Value", 0)?,
                        });
                    }
                }
                NodeKind::NestedDialog(NestedDialog {
                    nested_dialog_node_id: get_string_attribute(el, "NestedDialogNodeUUID", ""),
                    speaker_linking,
                })
            }
            DecodePass::Trade => NodeKind::Trade(Trade {
                trade_mode: get_int_attribute_any(el, &["TradeMode", "trademode"], 1)?,
            }),
        };

        let mut node = DialogNode::new(uuid, kind);
        if node.kind.supports_root() {
            node.root = get_bool_attribute_any(el, &["Root", "root"], false);
            node.end_node = get_bool_attribute(el, "endnode", false);
        }
        if node.kind.has_speaker() {
            node.speaker = get_int_attribute(el, "speaker", 0)?;
        }
        node.set_flags = self.read_flags(el, uuid, "setflags")?;
        node.check_flags = self.read_flags(el, uuid, "checkflags")?;
        node.cinematic_node_context = read_cinematic_node_context(el);

        let children = self.read_declared_children(el, uuid);
        Ok(Some((node, children)))
    }

    fn read_roll(&mut self, el: &LsxNode, candidate: &Candidate<'_>) -> Result<Roll> {
        let uuid = candidate.uuid.as_str();
        let roll_type = self.read_enum(el, uuid, "RollType", RollType::parse);
        let ability = self.read_enum(el, uuid, "Ability", Ability::parse);
        let skill = self.read_enum(el, uuid, "Skill", Skill::parse);

        let dc = get_string_attribute(el, "DifficultyClassID", "");
        let difficulty_class_id = if find_difficulty_class(&dc).is_some() {
            dc
        } else {
            let fallback = fallback_difficulty_class().id.to_string();
            self.warn(DecodeWarning::InvalidEnumValue {
                node: uuid.to_string(),
                field: "DifficultyClassID".to_string(),
                value: dc,
                fallback: fallback.clone(),
            });
            fallback
        };

        Ok(Roll {
            constructor: RollConstructor::parse(&candidate.constructor).unwrap_or_default(),
            show_once: get_bool_attribute(el, "ShowOnce", false),
            transition_mode: get_int_attribute(el, "transitionmode", 0)?,
            roll_target_speaker: get_int_attribute(el, "RollTargetSpeaker", 0)?,
            roll_type,
            ability,
            skill,
            advantage: get_int_attribute(el, "Advantage", 0)?,
            exclude_companions_optional_bonuses: get_bool_attribute(
                el,
                "ExcludeCompanionsOptionalBonuses",
                false,
            ),
            exclude_speaker_optional_bonuses: get_bool_attribute(
                el,
                "ExcludeSpeakerOptionalBonuses",
                false,
            ),
            difficulty_class_id,
            approval_rating_id: approval_rating_id(el),
            tagged_texts: self.read_tagged_texts(el),
        })
    }

    /// Read an enumerated attribute, substituting the default (with a
    /// warning) for unknown values. Absent attributes take the default silently.
    fn read_enum<T: Default + Copy + std::fmt::Display>(
        &mut self,
        el: &LsxNode,
        uuid: &str,
        id: &str,
        parse: fn(&str) -> Option<T>,
    ) -> T {
        let Some(raw) = get_optional_string_attribute(el, id) else {
            return T::default();
        };
        if let Some(value) = parse(raw.trim()) {
            return value;
        }
        let fallback = T::default();
        self.warn(DecodeWarning::InvalidEnumValue {
            node: uuid.to_string(),
            field: id.to_string(),
            value: raw.to_string(),
            fallback: fallback.to_string(),
        });
        fallback
    }

    /// Shared by `setflags` and `checkflags`.
    fn read_flags(&mut self, el: &LsxNode, uuid: &str, section_id: &str) -> Result<Vec<Flag>> {
        let mut flags = Vec::new();
        let Some(section) = el.child(section_id) else {
            return Ok(flags);
        };

        for group in section.descendants_with_id("flaggroup") {
            let flag_type = self.read_enum(group, uuid, "type", FlagType::parse);
            for flag in group.descendants_with_id("flag") {
                let paramval = get_optional_int_attribute(flag, "paramval")?;
                flags.push(Flag {
                    uuid: get_string_attribute(flag, "UUID", ""),
                    is_true: get_bool_attribute(flag, "value", false),
                    flag_type,
                    has_paramval: paramval.is_some(),
                    paramval: paramval.unwrap_or(0),
                });
            }
        }
        tracing::debug!("{uuid}: {} {section_id}", flags.len());
        Ok(flags)
    }

    fn read_tagged_texts(&self, el: &LsxNode) -> Vec<TaggedText> {
        let mut texts = Vec::new();
        for tagged_text in el.descendants_with_id("TaggedText") {
            let has_tag_rule = get_bool_attribute(tagged_text, "HasTagRule", false);
            for tag_text in tagged_text.descendants_with_id("TagText") {
                let (handle, version) = tag_text
                    .attribute("TagText")
                    .map(|attr| (attr.handle.clone().unwrap_or_default(), attr.version.unwrap_or(1)))
                    .unwrap_or_else(|| (String::new(), 1));
                let text = self
                    .localization
                    .and_then(|table| table.get(&handle))
                    .unwrap_or_default()
                    .to_string();
                texts.push(TaggedText {
                    handle,
                    line_id: get_string_attribute(tag_text, "LineId", ""),
                    text,
                    has_tag_rule,
                    stub: get_bool_attribute(tag_text, "stub", false),
                    version,
                });
            }
        }
        texts
    }

    /// Child UUIDs listed under the element's `children` section, unwrapping
    /// nested `children` wrappers.
    fn read_declared_children(&mut self, el: &LsxNode, uuid: &str) -> Vec<String> {
        let mut children = Vec::new();
        if let Some(section) = el.child("children") {
            self.collect_children(section, uuid, &mut children);
        }
        children
    }

    fn collect_children(&mut self, section: &LsxNode, uuid: &str, out: &mut Vec<String>) {
        for entry in &section.children {
            match entry.id.as_str() {
                "child" => {
                    let child = get_string_attribute(entry, "UUID", "");
                    let child = child.trim();
                    if child.is_empty() {
                        self.warn(DecodeWarning::MalformedElement {
                            node: uuid.to_string(),
                            reason: "child entry without UUID".to_string(),
                        });
                    } else {
                        out.push(child.to_string());
                    }
                }
                "children" => self.collect_children(entry, uuid, out),
                _ => {}
            }
        }
    }

    /// Only the element each node was decoded from contributes.
    fn read_validated_flags(&mut self, candidates: &[Candidate<'_>]) {
        for candidate in candidates {
            if self.positions.get(&candidate.uuid) != Some(&candidate.position) {
                continue;
            }
            let Some(validated) = candidate.element.child("ValidatedFlags") else {
                continue;
            };
            if validated.attribute("ValidatedHasValue").is_some() {
                let has_value = get_bool_attribute(validated, "ValidatedHasValue", false);
                self.dialog
                    .validated_flags
                    .insert(candidate.uuid.clone(), has_value);
            } else {
                tracing::debug!(
                    "Node {} has ValidatedFlags without ValidatedHasValue",
                    candidate.uuid
                );
            }
        }
    }

    /// Restore document order regardless of pass order.
    fn sort_nodes(&mut self) {
        let positions = &self.positions;
        self.dialog
            .nodes
            .sort_by(|a, _, b, _| positions.get(a).cmp(&positions.get(b)));
    }

    fn read_root_nodes(&mut self, section: &LsxNode) {
        let ids: Vec<String> = section
            .attributes
            .iter()
            .filter(|attr| attr.id == "RootNodes")
            .map(|attr| attr.value.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        for id in ids {
            match self.dialog.nodes.get_mut(&id) {
                Some(node) if node.kind.supports_root() => node.root = true,
                Some(node) => tracing::debug!(
                    "Ignoring root marker on {} node {id}",
                    node.kind.display_name()
                ),
                None => self.warn(DecodeWarning::UnresolvedReference {
                    from: "RootNodes".to_string(),
                    target: id,
                }),
            }
        }
    }

    fn resolve_edges(&mut self) {
        let parents: Vec<String> = self.dialog.nodes.keys().cloned().collect();
        for parent in parents {
            let Some(children) = self.declared_children.remove(&parent) else {
                continue;
            };
            for child in children {
                if self.dialog.nodes.contains_key(&child) {
                    tracing::debug!("Linked {parent} -> {child}");
                    self.dialog.edges.insert(Edge::new(parent.clone(), child));
                } else {
                    self.warn(DecodeWarning::UnresolvedReference {
                        from: parent.clone(),
                        target: child,
                    });
                }
            }
        }

        // Group fallback always runs; duplicates of explicit edges collapse.
        let mut groups: IndexMap<String, Vec<(i32, String)>> = IndexMap::new();
        for node in self.dialog.nodes.values() {
            if let Some((group_id, group_index)) = node.kind.group()
                && !group_id.trim().is_empty()
            {
                groups
                    .entry(group_id.to_string())
                    .or_default()
                    .push((group_index, node.uuid.clone()));
            }
        }
        for (group_id, mut members) in groups {
            members.sort_by_key(|(index, _)| *index);
            for pair in members.windows(2) {
                let edge = Edge::new(pair[0].1.clone(), pair[1].1.clone());
                if self.dialog.edges.insert(edge) {
                    tracing::debug!(
                        "Group {group_id}: linked {} -> {}",
                        pair[0].1,
                        pair[1].1
                    );
                }
            }
        }
    }
}

fn approval_rating_id(el: &LsxNode) -> String {
    get_optional_string_attribute(el, "ApprovalRatingID")
        .or_else(|| get_optional_string_attribute(el, "approvalratingid"))
        .unwrap_or_default()
        .to_string()
}

fn read_cinematic_node_context(el: &LsxNode) -> String {
    el.find_descendant("editorData")
        .into_iter()
        .flat_map(|editor_data| editor_data.descendants_with_id("data"))
        .find(|data| get_string_attribute(data, "key", "") == "CinematicNodeContext")
        .map(|data| get_string_attribute(data, "val", ""))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(nodes: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<save>
    <region id="dialog">
        <node id="dialog">
            <attribute id="category" type="LSString" value="Generic NPC Dialog" />
            <attribute id="UUID" type="FixedString" value="d-1" />
            <attribute id="TimelineId" type="FixedString" value="" />
            <children>
                <node id="DefaultAddressedSpeakers">
                    <children>
                        <node id="Object" key="MapKey">
                            <attribute id="MapKey" type="int32" value="1" />
                            <attribute id="MapValue" type="int32" value="0" />
                        </node>
                    </children>
                </node>
                <node id="speakerlist">
                    <children>
                        <node id="speaker" key="index">
                            <attribute id="index" type="FixedString" value="0" />
                            <attribute id="list" type="LSString" value="abc" />
                            <attribute id="SpeakerMappingId" type="guid" value="m-0" />
                        </node>
                    </children>
                </node>
                <node id="nodes">
                    <children>
{nodes}
                    </children>
                </node>
            </children>
        </node>
    </region>
</save>"#
        )
    }

    fn line(uuid: &str, extra: &str, children: &str) -> String {
        format!(
            r#"<node id="node" key="UUID">
    <attribute id="constructor" type="FixedString" value="TagAnswer" />
    <attribute id="UUID" type="FixedString" value="{uuid}" />
    {extra}
    <children>
        <node id="children">
            <children>{children}</children>
        </node>
    </children>
</node>"#
        )
    }

    fn child(uuid: &str) -> String {
        format!(r#"<node id="child"><attribute id="UUID" type="FixedString" value="{uuid}" /></node>"#)
    }

    #[test]
    fn test_globals() {
        let decoded = decode_dialog(&wrap(""), None).unwrap();
        let dialog = decoded.dialog;
        assert_eq!(dialog.category, "Generic NPC Dialog");
        assert_eq!(dialog.uuid, "d-1");
        assert_eq!(
            dialog.default_addressed_speakers,
            vec![DefaultAddressedSpeaker { map_key: 1, map_value: 0 }]
        );
        assert_eq!(dialog.speakers[0].speaker_mapping_id, "m-0");
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_missing_region_is_fatal() {
        let xml = r#"<save><region id="other"><node id="dialog" /></region></save>"#;
        assert!(matches!(
            decode_dialog(xml, None),
            Err(Error::MissingDialogRegion(_))
        ));
    }

    #[test]
    fn test_malformed_global_int_is_fatal() {
        let xml = wrap("").replace(r#"value="1" />"#, r#"value="one" />"#);
        assert!(matches!(
            decode_dialog(&xml, None),
            Err(Error::InvalidAttributeValue { .. })
        ));
    }

    #[test]
    fn test_explicit_children_become_edges() {
        let nodes = format!("{}{}", line("a", "", &child("b")), line("b", "", ""));
        let decoded = decode_dialog(&wrap(&nodes), None).unwrap();
        let dialog = decoded.dialog;
        assert_eq!(dialog.nodes.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(dialog.has_edge("a", "b"));
        assert_eq!(dialog.edges.len(), 1);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_nested_children_wrappers() {
        let nested = format!(
            r#"<node id="children"><children>{}</children></node>"#,
            child("c")
        );
        let nodes = format!(
            "{}{}{}",
            line("a", "", &format!("{}{nested}", child("b"))),
            line("b", "", ""),
            line("c", "", "")
        );
        let dialog = decode_dialog(&wrap(&nodes), None).unwrap().dialog;
        assert!(dialog.has_edge("a", "b"));
        assert!(dialog.has_edge("a", "c"));
    }

    #[test]
    fn test_bad_group_index_skips_node() {
        let nodes = line(
            "a",
            r#"<attribute id="GroupIndex" type="int32" value="x" />"#,
            "",
        );
        let decoded = decode_dialog(&wrap(&nodes), None).unwrap();
        assert!(decoded.dialog.nodes.is_empty());
        assert!(matches!(
            decoded.warnings.as_slice(),
            [DecodeWarning::MalformedElement { .. }]
        ));
    }

    #[test]
    fn test_unsupported_constructor() {
        let nodes = r#"<node id="node" key="UUID">
            <attribute id="constructor" type="FixedString" value="Pop" />
            <attribute id="UUID" type="FixedString" value="p" />
        </node>"#;
        let decoded = decode_dialog(&wrap(nodes), None).unwrap();
        assert!(decoded.dialog.nodes.is_empty());
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::UnsupportedConstructor {
                node: "p".to_string(),
                constructor: "Pop".to_string()
            }]
        );
    }

    #[test]
    fn test_jump_without_target_is_skipped() {
        let nodes = r#"<node id="node" key="UUID">
            <attribute id="constructor" type="FixedString" value="Jump" />
            <attribute id="UUID" type="FixedString" value="j" />
        </node>"#;
        let decoded = decode_dialog(&wrap(nodes), None).unwrap();
        assert!(decoded.dialog.nodes.is_empty());
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::MissingRequiredField {
                node: Some("j".to_string()),
                field: "jumptarget".to_string()
            }]
        );
    }

    #[test]
    fn test_roll_enums_fall_back() {
        let nodes = r#"<node id="node" key="UUID">
            <attribute id="constructor" type="FixedString" value="PassiveRoll" />
            <attribute id="UUID" type="FixedString" value="r" />
            <attribute id="Skill" type="FixedString" value="Juggling" />
            <attribute id="Ability" type="FixedString" value="Charisma" />
            <attribute id="DifficultyClassID" type="guid" value="fa621d38-6f83-4e42-a55c-6aa651a75d46" />
            <attribute id="approvalratingid" type="guid" value="ap" />
        </node>"#;
        let decoded = decode_dialog(&wrap(nodes), None).unwrap();
        let NodeKind::Roll(roll) = &decoded.dialog.nodes["r"].kind else {
            panic!("expected a roll node");
        };
        assert_eq!(roll.constructor, RollConstructor::PassiveRoll);
        assert_eq!(roll.skill, Skill::None);
        assert_eq!(roll.ability, Ability::Charisma);
        assert_eq!(roll.difficulty_class_id, "fa621d38-6f83-4e42-a55c-6aa651a75d46");
        assert_eq!(roll.approval_rating_id, "ap");
        assert_eq!(decoded.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_difficulty_class() {
        let nodes = r#"<node id="node" key="UUID">
            <attribute id="constructor" type="FixedString" value="ActiveRoll" />
            <attribute id="UUID" type="FixedString" value="r" />
            <attribute id="DifficultyClassID" type="guid" value="nope" />
        </node>"#;
        let decoded = decode_dialog(&wrap(nodes), None).unwrap();
        let NodeKind::Roll(roll) = &decoded.dialog.nodes["r"].kind else {
            panic!("expected a roll node");
        };
        assert_eq!(roll.difficulty_class_id, "4dfcb0ff-e02a-4efd-b132-77dfd956055e");
        assert!(matches!(
            decoded.warnings.as_slice(),
            [DecodeWarning::InvalidEnumValue { field, .. }] if field == "DifficultyClassID"
        ));
    }

    #[test]
    fn test_tagged_text_resolution() {
        let texts = r#"<children>
            <node id="TaggedTexts"><children>
                <node id="TaggedText">
                    <attribute id="HasTagRule" type="bool" value="True" />
                    <children>
                        <node id="TagTexts"><children>
                            <node id="TagText">
                                <attribute id="TagText" type="TranslatedString" handle="h1" version="2" />
                                <attribute id="LineId" type="guid" value="l1" />
                                <attribute id="stub" type="bool" value="True" />
                            </node>
                        </children></node>
                    </children>
                </node>
            </children></node>
        </children>"#;
        let nodes = format!(
            r#"<node id="node" key="UUID">
                <attribute id="constructor" type="FixedString" value="TagGreeting" />
                <attribute id="UUID" type="FixedString" value="a" />
                {texts}
            </node>"#
        );
        let mut table = LocalizationTable::new();
        table.insert("h1", "Hello there");

        let dialog = decode_dialog(&wrap(&nodes), Some(&table)).unwrap().dialog;
        let texts = dialog.nodes["a"].kind.tagged_texts().unwrap();
        assert_eq!(
            texts,
            &vec![TaggedText {
                handle: "h1".to_string(),
                line_id: "l1".to_string(),
                text: "Hello there".to_string(),
                has_tag_rule: true,
                stub: true,
                version: 2,
            }]
        );

        let dialog = decode_dialog(&wrap(&nodes), None).unwrap().dialog;
        assert_eq!(dialog.nodes["a"].kind.tagged_texts().unwrap()[0].text, "");
    }

    #[test]
    fn test_root_nodes_section() {
        let nodes = format!(
            r#"{}<node id="RootNodes">
                <attribute id="RootNodes" type="FixedString" value="a" />
                <attribute id="RootNodes" type="FixedString" value="ghost" />
            </node>"#,
            line("a", "", "")
        );
        let decoded = decode_dialog(&wrap(&nodes), None).unwrap();
        assert!(decoded.dialog.nodes["a"].root);
        assert_eq!(
            decoded.warnings,
            vec![DecodeWarning::UnresolvedReference {
                from: "RootNodes".to_string(),
                target: "ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_validated_flags_and_editor_data() {
        let nodes = r#"<node id="node" key="UUID">
            <attribute id="constructor" type="FixedString" value="Trade" />
            <attribute id="UUID" type="FixedString" value="t" />
            <attribute id="trademode" type="uint8" value="3" />
            <children>
                <node id="editorData">
                    <children>
                        <node id="data">
                            <attribute id="key" type="FixedString" value="CinematicNodeContext" />
                            <attribute id="val" type="FixedString" value="shop" />
                        </node>
                    </children>
                </node>
                <node id="ValidatedFlags">
                    <attribute id="ValidatedHasValue" type="bool" value="True" />
                </node>
            </children>
        </node>"#;
        let dialog = decode_dialog(&wrap(nodes), None).unwrap().dialog;
        let node = &dialog.nodes["t"];
        assert_eq!(node.kind, NodeKind::Trade(Trade { trade_mode: 3 }));
        assert_eq!(node.cinematic_node_context, "shop");
        assert_eq!(dialog.validated_flags.get("t"), Some(&true));
    }

    #[test]
    fn test_duplicate_uuid_keeps_first_validated_flags() {
        let validated = |value: &str| {
            format!(
                r#"<node id="ValidatedFlags"><attribute id="ValidatedHasValue" type="bool" value="{value}" /></node>"#
            )
        };
        let nodes = format!(
            "{}{}{}",
            line("x", "", "").replacen("<children>", &format!("<children>{}", validated("True")), 1),
            line("x", "", "").replacen("<children>", &format!("<children>{}", validated("False")), 1),
            r#"<node id="node" key="UUID">
                <attribute id="constructor" type="FixedString" value="Pop" />
                <attribute id="UUID" type="FixedString" value="p" />
                <children>
                    <node id="ValidatedFlags"><attribute id="ValidatedHasValue" type="bool" value="True" /></node>
                </children>
            </node>"#
        );
        let decoded = decode_dialog(&wrap(&nodes), None).unwrap();
        assert_eq!(decoded.dialog.nodes.len(), 1);
        assert_eq!(
            decoded.dialog.validated_flags.iter().collect::<Vec<_>>(),
            vec![(&"x".to_string(), &true)]
        );
        assert!(decoded.warnings.iter().any(|w| matches!(
            w,
            DecodeWarning::MalformedElement { node, .. } if node == "x"
        )));
    }
}
