//! Dialog encoding to LSX
//!
//! Builds an [`LsxDocument`] with the fixed `save > region > dialog` layout
//! and serializes it. Child lists come from the edge set with reroutes
//! resolved, so reroute nodes never appear in the output.

use std::path::Path;

use super::graph::children_of;
use super::types::{Dialog, DialogNode, Flag, NodeKind, TaggedText};
use crate::error::{Error, Result};
use crate::formats::lsx::{LsxAttribute, LsxDocument, LsxNode, LsxRegion, serialize_lsx};

/// Encode a dialog as LSX text.
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn encode_dialog(dialog: &Dialog) -> Result<String> {
    serialize_lsx(&to_lsx_document(dialog))
}

/// Encode a dialog and write it to `path`.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_dialog<P: AsRef<Path>>(dialog: &Dialog, path: P) -> Result<()> {
    let path = path.as_ref();
    let xml = encode_dialog(dialog)?;
    std::fs::write(path, xml).map_err(|e| Error::file_access(path, e))?;
    tracing::info!("Wrote dialog {} to {}", dialog.uuid, path.display());
    Ok(())
}

/// Build the LSX tree for a dialog.
#[must_use]
pub fn to_lsx_document(dialog: &Dialog) -> LsxDocument {
    let mut root = LsxNode::new("dialog");
    root.push_attribute("category", "LSString", &dialog.category);
    root.push_attribute("UUID", "FixedString", &dialog.uuid);
    root.push_attribute("TimelineId", "FixedString", &dialog.timeline_id);

    let default_speakers = root.push_child(LsxNode::new("DefaultAddressedSpeakers"));
    for speaker in &dialog.default_addressed_speakers {
        let object = default_speakers.push_child(LsxNode::with_key("Object", "MapKey"));
        object.push_attribute("MapKey", "int32", speaker.map_key.to_string());
        object.push_attribute("MapValue", "int32", speaker.map_value.to_string());
    }

    let speaker_list = root.push_child(LsxNode::new("speakerlist"));
    for speaker in &dialog.speakers {
        let entry = speaker_list.push_child(LsxNode::with_key("speaker", "index"));
        entry.push_attribute("index", "FixedString", &speaker.index);
        entry.push_attribute("list", "LSString", &speaker.list);
        entry.push_attribute("SpeakerMappingId", "guid", &speaker.speaker_mapping_id);
    }

    let nodes = root.push_child(LsxNode::new("nodes"));
    for node in dialog.nodes.values() {
        if node.kind.is_reroute() {
            continue;
        }
        nodes.push_child(node_element(dialog, node));
    }

    let root_nodes = nodes.push_child(LsxNode::new("RootNodes"));
    for node in dialog
        .nodes
        .values()
        .filter(|n| n.root && n.kind.supports_root())
    {
        root_nodes.push_attribute("RootNodes", "FixedString", &node.uuid);
    }

    let mut region = LsxRegion::new("dialog");
    region.nodes.push(root);
    LsxDocument {
        version: None,
        regions: vec![region],
    }
}

fn bool_value(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn node_element(dialog: &Dialog, node: &DialogNode) -> LsxNode {
    let mut el = LsxNode::with_key("node", "UUID");
    el.push_attribute("constructor", "FixedString", node.kind.constructor());
    el.push_attribute("UUID", "FixedString", &node.uuid);

    match &node.kind {
        NodeKind::DialogueLine(line) => {
            push_group(&mut el, &line.group_id, line.group_index);
            push_root(&mut el, node.root);
            el.push_attribute("speaker", "int32", node.speaker.to_string());
            if line.show_once {
                el.push_attribute("ShowOnce", "bool", bool_value(true));
            }
            push_end_node(&mut el, node.end_node);
            if !line.approval_rating_id.is_empty() {
                el.push_attribute("ApprovalRatingID", "guid", &line.approval_rating_id);
            }
        }
        NodeKind::Jump(jump) => {
            el.push_attribute("jumptarget", "FixedString", &jump.jump_target);
            el.push_attribute("jumptargetpoint", "uint8", jump.jump_target_point.to_string());
            // A jump's only child is its target attribute.
            for section in ["children", "Tags", "setflags", "checkflags"] {
                el.push_child(LsxNode::new(section));
            }
            push_validated_flags(dialog, node, &mut el);
            return el;
        }
        NodeKind::Roll(roll) => {
            if roll.show_once {
                el.push_attribute("ShowOnce", "bool", bool_value(true));
            }
            el.push_attribute("transitionmode", "uint8", roll.transition_mode.to_string());
            el.push_attribute("speaker", "int32", node.speaker.to_string());
            if !roll.approval_rating_id.is_empty() {
                el.push_attribute("ApprovalRatingID", "guid", &roll.approval_rating_id);
            }
            el.push_attribute("RollType", "FixedString", roll.roll_type.as_str());
            el.push_attribute("Ability", "FixedString", roll.ability.as_str());
            el.push_attribute("Skill", "FixedString", roll.skill.as_str());
            el.push_attribute("RollTargetSpeaker", "int32", roll.roll_target_speaker.to_string());
            el.push_attribute("Advantage", "uint8", roll.advantage.to_string());
            el.push_attribute(
                "ExcludeCompanionsOptionalBonuses",
                "bool",
                bool_value(roll.exclude_companions_optional_bonuses),
            );
            el.push_attribute(
                "ExcludeSpeakerOptionalBonuses",
                "bool",
                bool_value(roll.exclude_speaker_optional_bonuses),
            );
            el.push_attribute("DifficultyClassID", "guid", &roll.difficulty_class_id);
        }
        NodeKind::RollResult(result) => {
            el.push_attribute("Success", "bool", bool_value(result.success));
        }
        NodeKind::Alias(alias) => {
            if alias.greeting {
                el.push_attribute("Greeting", "bool", bool_value(true));
            }
            push_root(&mut el, node.root);
            el.push_attribute("speaker", "int32", node.speaker.to_string());
            push_end_node(&mut el, node.end_node);
            if !alias.source_node.is_empty() {
                el.push_attribute("SourceNode", "FixedString", &alias.source_node);
            }
        }
        NodeKind::VisualState(state) => push_group(&mut el, &state.group_id, state.group_index),
        NodeKind::NestedDialog(nested) => {
            push_root(&mut el, node.root);
            push_end_node(&mut el, node.end_node);
            el.push_attribute("NestedDialogNodeUUID", "guid", &nested.nested_dialog_node_id);
        }
        NodeKind::Trade(trade) => {
            el.push_attribute("speaker", "int32", node.speaker.to_string());
            el.push_attribute("trademode", "uint8", trade.trade_mode.to_string());
        }
        NodeKind::Reroute => {}
    }

    el.push_child(children_section(dialog, &node.uuid));
    if matches!(
        node.kind,
        NodeKind::DialogueLine(_)
            | NodeKind::Roll(_)
            | NodeKind::Alias(_)
            | NodeKind::VisualState(_)
            | NodeKind::Trade(_)
    ) {
        el.push_child(game_data_section());
    }
    el.push_child(LsxNode::new("Tags"));
    if !node.cinematic_node_context.is_empty() {
        el.push_child(editor_data_section(&node.cinematic_node_context));
    }
    el.push_child(flags_section("setflags", &node.set_flags));
    el.push_child(flags_section("checkflags", &node.check_flags));

    match &node.kind {
        NodeKind::DialogueLine(line) => {
            el.push_child(tagged_texts_section(&line.tagged_texts));
        }
        NodeKind::Roll(roll) => {
            el.push_child(tagged_texts_section(&roll.tagged_texts));
        }
        NodeKind::Alias(alias) if !alias.tagged_texts.is_empty() => {
            el.push_child(tagged_texts_section(&alias.tagged_texts));
        }
        NodeKind::NestedDialog(nested) => {
            let linking = el.push_child(LsxNode::new("SpeakerLinking"));
            for link in &nested.speaker_linking {
                let entry = linking.push_child(LsxNode::new("SpeakerLinkingEntry"));
                entry.push_attribute("Key", "int32", link.key.to_string());
                entry.push_attribute("Value", "int32", link.value.to_string());
            }
        }
        _ => {}
    }

    push_validated_flags(dialog, node, &mut el);
    el
}

fn push_group(el: &mut LsxNode, group_id: &str, group_index: i32) {
    if !group_id.is_empty() {
        el.push_attribute("GroupID", "FixedString", group_id);
        el.push_attribute("GroupIndex", "int32", group_index.to_string());
    }
}

fn push_root(el: &mut LsxNode, root: bool) {
    if root {
        el.push_attribute("Root", "bool", bool_value(true));
    }
}

fn push_end_node(el: &mut LsxNode, end_node: bool) {
    if end_node {
        el.push_attribute("endnode", "bool", bool_value(true));
    }
}

fn push_validated_flags(dialog: &Dialog, node: &DialogNode, el: &mut LsxNode) {
    if let Some(has_value) = dialog.validated_flags.get(&node.uuid) {
        let validated = el.push_child(LsxNode::new("ValidatedFlags"));
        validated.push_attribute("ValidatedHasValue", "bool", bool_value(*has_value));
    }
}

fn children_section(dialog: &Dialog, uuid: &str) -> LsxNode {
    let mut section = LsxNode::new("children");
    for child in children_of(dialog, uuid) {
        let entry = section.push_child(LsxNode::new("child"));
        entry.push_attribute("UUID", "FixedString", child);
    }
    section
}

fn game_data_section() -> LsxNode {
    let mut game_data = LsxNode::new("GameData");
    game_data.push_child(LsxNode::with_key("AiPersonalities", "AiPersonality"));
    game_data.push_child(LsxNode::new("MusicInstrumentSounds"));
    game_data.push_child(LsxNode::new("OriginSound"));
    game_data
}

fn editor_data_section(context: &str) -> LsxNode {
    let mut editor_data = LsxNode::new("editorData");
    let data = editor_data.push_child(LsxNode::new("data"));
    data.push_attribute("key", "FixedString", "CinematicNodeContext");
    data.push_attribute("val", "FixedString", context);
    editor_data
}

/// Consecutive flags of the same type share one `flaggroup`.
fn flags_section(id: &str, flags: &[Flag]) -> LsxNode {
    let mut section = LsxNode::new(id);
    for run in flags.chunk_by(|a, b| a.flag_type == b.flag_type) {
        let group = section.push_child(LsxNode::with_key("flaggroup", "type"));
        group.push_attribute("type", "FixedString", run[0].flag_type.as_str());
        for flag in run {
            let entry = group.push_child(LsxNode::new("flag"));
            entry.push_attribute("UUID", "FixedString", &flag.uuid);
            entry.push_attribute("value", "bool", if flag.is_true { "true" } else { "false" });
            if flag.has_paramval {
                entry.push_attribute("paramval", "int32", flag.paramval.to_string());
            }
        }
    }
    section
}

fn tagged_texts_section(texts: &[TaggedText]) -> LsxNode {
    let mut section = LsxNode::new("TaggedTexts");
    for text in texts {
        let tagged_text = section.push_child(LsxNode::new("TaggedText"));
        tagged_text.push_attribute("HasTagRule", "bool", bool_value(text.has_tag_rule));

        let tag_texts = tagged_text.push_child(LsxNode::new("TagTexts"));
        let tag_text = tag_texts.push_child(LsxNode::new("TagText"));
        tag_text
            .attributes
            .push(LsxAttribute::translated("TagText", &text.handle, text.version));
        tag_text.push_attribute("LineId", "guid", &text.line_id);
        tag_text.push_attribute("stub", "bool", bool_value(text.stub));

        let rule_group = tagged_text.push_child(LsxNode::new("RuleGroup"));
        rule_group.push_attribute("TagCombineOp", "uint8", "0");
        rule_group.push_child(LsxNode::new("Rules"));
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::types::{DialogueLine, Edge, FlagType, Jump};
    use pretty_assertions::assert_eq;

    fn flag(uuid: &str, flag_type: FlagType) -> Flag {
        Flag {
            uuid: uuid.to_string(),
            is_true: true,
            flag_type,
            ..Flag::default()
        }
    }

    #[test]
    fn test_empty_dialog_layout() {
        let mut dialog = Dialog::new();
        dialog.category = "Generic NPC Dialog".to_string();
        dialog.uuid = "d-1".to_string();

        let xml = encode_dialog(&dialog).unwrap();
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<save>
    <region id="dialog">
        <node id="dialog">
            <attribute id="category" type="LSString" value="Generic NPC Dialog" />
            <attribute id="UUID" type="FixedString" value="d-1" />
            <attribute id="TimelineId" type="FixedString" value="" />
            <children>
                <node id="DefaultAddressedSpeakers" />
                <node id="speakerlist" />
                <node id="nodes">
                    <children>
                        <node id="RootNodes" />
                    </children>
                </node>
            </children>
        </node>
    </region>
</save>"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_line_sections_in_order() {
        let mut dialog = Dialog::new();
        let mut line = DialogNode::new(
            "a",
            NodeKind::DialogueLine(DialogueLine {
                tagged_texts: vec![TaggedText::default()],
                ..DialogueLine::default()
            }),
        );
        line.root = true;
        line.cinematic_node_context = "ctx".to_string();
        dialog.nodes.insert("a".to_string(), line);
        dialog.validated_flags.insert("a".to_string(), false);

        let doc = to_lsx_document(&dialog);
        let nodes = doc.regions[0].nodes[0].child("nodes").unwrap();
        let el = &nodes.children[0];
        let sections: Vec<&str> = el.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            sections,
            vec![
                "children",
                "GameData",
                "Tags",
                "editorData",
                "setflags",
                "checkflags",
                "TaggedTexts",
                "ValidatedFlags"
            ]
        );
        assert_eq!(el.attribute("Root").unwrap().value, "True");
        assert_eq!(
            nodes.child("RootNodes").unwrap().attribute("RootNodes").unwrap().value,
            "a"
        );
    }

    #[test]
    fn test_jump_has_empty_sections() {
        let mut dialog = Dialog::new();
        let jump = Jump {
            jump_target: "b".to_string(),
            jump_target_point: 2,
        };
        dialog
            .nodes
            .insert("j".to_string(), DialogNode::new("j", NodeKind::Jump(jump)));
        dialog.nodes.insert(
            "b".to_string(),
            DialogNode::new("b", NodeKind::DialogueLine(DialogueLine::default())),
        );
        dialog.edges.insert(Edge::new("j", "b"));

        let doc = to_lsx_document(&dialog);
        let el = &doc.regions[0].nodes[0].child("nodes").unwrap().children[0];
        assert_eq!(el.attribute("jumptarget").unwrap().value, "b");
        assert_eq!(el.attribute("jumptargetpoint").unwrap().value, "2");
        assert!(el.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn test_reroutes_are_skipped_and_resolved() {
        let mut dialog = Dialog::new();
        for (uuid, kind) in [
            ("a", NodeKind::DialogueLine(DialogueLine::default())),
            ("r", NodeKind::Reroute),
            ("b", NodeKind::DialogueLine(DialogueLine::default())),
        ] {
            dialog.nodes.insert(uuid.to_string(), DialogNode::new(uuid, kind));
        }
        dialog.edges.insert(Edge::new("a", "r"));
        dialog.edges.insert(Edge::new("r", "b"));

        let doc = to_lsx_document(&dialog);
        let nodes = doc.regions[0].nodes[0].child("nodes").unwrap();
        assert_eq!(nodes.children.len(), 3);
        let children = nodes.children[0].child("children").unwrap();
        assert_eq!(children.children[0].attribute("UUID").unwrap().value, "b");
    }

    #[test]
    fn test_flag_groups() {
        let mut paramval = flag("f3", FlagType::Object);
        paramval.has_paramval = true;
        paramval.paramval = 4;
        let section = flags_section(
            "setflags",
            &[flag("f1", FlagType::Global), flag("f2", FlagType::Global), paramval],
        );
        assert_eq!(section.children.len(), 2);
        assert_eq!(section.children[0].children.len(), 2);
        let object = &section.children[1];
        assert_eq!(object.attribute("type").unwrap().value, "Object");
        assert_eq!(object.children[0].attribute("paramval").unwrap().value, "4");
        assert!(section.children[0].children[0].attribute("paramval").is_none());
    }
}
