//! Editing operations on a [`Dialog`]
//!
//! Plain methods used by editors and scripts. Index-based operations return
//! `false` (or `None`) instead of panicking when the index or node is invalid.

use uuid::Uuid;

use super::types::{
    DefaultAddressedSpeaker, Dialog, DialogNode, DialogueLine, Edge, Flag, LineConstructor,
    NodeKind, SpeakerInfo, SpeakerLink, TaggedText,
};

/// Which flag list of a node an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagList {
    Set,
    Check,
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

impl Dialog {
    /// A new dialog with one root greeting and an answer linked to it.
    #[must_use]
    pub fn new_with_greeting() -> Self {
        let mut dialog = Dialog {
            category: "Generic NPC Dialog".to_string(),
            uuid: new_uuid(),
            ..Dialog::default()
        };

        let greeting = dialog.add_node(NodeKind::DialogueLine(DialogueLine {
            constructor: LineConstructor::TagGreeting,
            ..DialogueLine::default()
        }));
        let answer = dialog.add_node(NodeKind::DialogueLine(DialogueLine {
            constructor: LineConstructor::TagAnswer,
            ..DialogueLine::default()
        }));
        dialog.set_root(&greeting, true);
        dialog.link(&greeting, &answer);
        dialog
    }

    /// Add a node of the given kind with a fresh UUID and return the UUID.
    pub fn add_node(&mut self, kind: NodeKind) -> String {
        let uuid = new_uuid();
        tracing::debug!("Adding {} node {uuid}", kind.display_name());
        self.nodes.insert(uuid.clone(), DialogNode::new(uuid.clone(), kind));
        uuid
    }

    /// Remove a node with its incident edges and validated flag. Jumps that
    /// targeted it are left without a target.
    pub fn remove_node(&mut self, uuid: &str) -> Option<DialogNode> {
        let node = self.nodes.shift_remove(uuid)?;
        self.edges.retain(|e| e.from != uuid && e.to != uuid);
        self.validated_flags.shift_remove(uuid);
        for other in self.nodes.values_mut() {
            if let NodeKind::Jump(jump) = &mut other.kind
                && jump.jump_target == uuid
            {
                tracing::debug!("Jump {} lost its target {uuid}", other.uuid);
                jump.jump_target.clear();
            }
        }
        Some(node)
    }

    /// Add an edge between two existing nodes. Returns `false` if either
    /// node is missing or the edge already exists.
    ///
    /// Linking from a jump retargets it, replacing its previous edge.
    pub fn link(&mut self, from: &str, to: &str) -> bool {
        if !self.nodes.contains_key(from) || !self.nodes.contains_key(to) {
            return false;
        }
        if self.has_edge(from, to) {
            return false;
        }
        if matches!(self.nodes[from].kind, NodeKind::Jump(_)) {
            return self.set_jump_target(from, to);
        }
        self.edges.insert(Edge::new(from, to))
    }

    /// Remove an edge. Unlinking a jump from its target clears the target.
    pub fn unlink(&mut self, from: &str, to: &str) -> bool {
        if !self.edges.shift_remove(&Edge::new(from, to)) {
            return false;
        }
        if let Some(NodeKind::Jump(jump)) = self.nodes.get_mut(from).map(|n| &mut n.kind)
            && jump.jump_target == to
        {
            jump.jump_target.clear();
        }
        true
    }

    /// Point a jump node at `target`, replacing its previous edge.
    pub fn set_jump_target(&mut self, jump: &str, target: &str) -> bool {
        if !self.nodes.contains_key(target) {
            return false;
        }
        let Some(NodeKind::Jump(data)) = self.nodes.get_mut(jump).map(|n| &mut n.kind) else {
            return false;
        };
        let previous = std::mem::replace(&mut data.jump_target, target.to_string());
        self.edges.shift_remove(&Edge::new(jump, previous));
        self.edges.insert(Edge::new(jump, target));
        true
    }

    /// Mark or unmark a node as root. Only kinds that support it are changed.
    pub fn set_root(&mut self, uuid: &str, root: bool) -> bool {
        match self.nodes.get_mut(uuid) {
            Some(node) if node.kind.supports_root() => {
                node.root = root;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn find_node(&self, uuid: &str) -> Option<&DialogNode> {
        self.node(uuid)
    }

    /// Append a speaker whose index is the new table length.
    pub fn add_speaker(&mut self) -> &mut SpeakerInfo {
        let index = self.speakers.len().to_string();
        self.speakers.push(SpeakerInfo {
            index,
            ..SpeakerInfo::default()
        });
        let last = self.speakers.len() - 1;
        &mut self.speakers[last]
    }

    pub fn remove_speaker(&mut self, index: usize) -> bool {
        remove_at(&mut self.speakers, index)
    }

    pub fn add_default_speaker(&mut self) -> &mut DefaultAddressedSpeaker {
        self.default_addressed_speakers
            .push(DefaultAddressedSpeaker::default());
        let last = self.default_addressed_speakers.len() - 1;
        &mut self.default_addressed_speakers[last]
    }

    pub fn remove_default_speaker(&mut self, index: usize) -> bool {
        remove_at(&mut self.default_addressed_speakers, index)
    }

    /// Append an empty tagged text. Fails for kinds without texts.
    pub fn add_handle_text(&mut self, uuid: &str) -> bool {
        let Some(texts) = self.texts_mut(uuid) else {
            return false;
        };
        texts.push(TaggedText::default());
        true
    }

    pub fn remove_handle_text(&mut self, uuid: &str, index: usize) -> bool {
        self.texts_mut(uuid)
            .is_some_and(|texts| remove_at(texts, index))
    }

    /// Set the resolved text of a node's tagged text.
    pub fn set_text(&mut self, uuid: &str, index: usize, text: impl Into<String>) -> bool {
        match self.texts_mut(uuid).and_then(|texts| texts.get_mut(index)) {
            Some(tagged) => {
                tagged.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn add_set_flag(&mut self, uuid: &str) -> bool {
        self.add_flag(uuid, FlagList::Set)
    }

    pub fn remove_set_flag(&mut self, uuid: &str, index: usize) -> bool {
        self.remove_flag(uuid, FlagList::Set, index)
    }

    pub fn add_check_flag(&mut self, uuid: &str) -> bool {
        self.add_flag(uuid, FlagList::Check)
    }

    pub fn remove_check_flag(&mut self, uuid: &str, index: usize) -> bool {
        self.remove_flag(uuid, FlagList::Check, index)
    }

    /// Flip whether a flag carries `paramval`.
    pub fn toggle_paramval(&mut self, uuid: &str, list: FlagList, index: usize) -> bool {
        match self.flags_mut(uuid, list).and_then(|flags| flags.get_mut(index)) {
            Some(flag) => {
                flag.has_paramval = !flag.has_paramval;
                true
            }
            None => false,
        }
    }

    /// Append a speaker link on a nested dialog node. Key and value continue
    /// from the highest existing entry.
    pub fn add_speaker_linking_entry(&mut self, uuid: &str) -> bool {
        let Some(NodeKind::NestedDialog(nested)) = self.nodes.get_mut(uuid).map(|n| &mut n.kind)
        else {
            return false;
        };
        let next_key = nested.speaker_linking.iter().map(|l| l.key).max().map_or(0, |k| k + 1);
        let next_value = nested
            .speaker_linking
            .iter()
            .map(|l| l.value)
            .max()
            .map_or(0, |v| v + 1);
        nested.speaker_linking.push(SpeakerLink {
            key: next_key,
            value: next_value,
        });
        true
    }

    pub fn remove_speaker_linking_entry(&mut self, uuid: &str, index: usize) -> bool {
        match self.nodes.get_mut(uuid).map(|n| &mut n.kind) {
            Some(NodeKind::NestedDialog(nested)) => remove_at(&mut nested.speaker_linking, index),
            _ => false,
        }
    }

    fn add_flag(&mut self, uuid: &str, list: FlagList) -> bool {
        let Some(flags) = self.flags_mut(uuid, list) else {
            return false;
        };
        flags.push(Flag::default());
        true
    }

    fn remove_flag(&mut self, uuid: &str, list: FlagList, index: usize) -> bool {
        self.flags_mut(uuid, list)
            .is_some_and(|flags| remove_at(flags, index))
    }

    fn flags_mut(&mut self, uuid: &str, list: FlagList) -> Option<&mut Vec<Flag>> {
        let node = self.nodes.get_mut(uuid)?;
        if !node.kind.has_flags() {
            return None;
        }
        Some(match list {
            FlagList::Set => &mut node.set_flags,
            FlagList::Check => &mut node.check_flags,
        })
    }

    fn texts_mut(&mut self, uuid: &str) -> Option<&mut Vec<TaggedText>> {
        self.nodes.get_mut(uuid)?.kind.tagged_texts_mut()
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::graph::outgoing;
    use crate::dialog::types::{Jump, NestedDialog, Trade};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_with_greeting() {
        let dialog = Dialog::new_with_greeting();
        assert_eq!(dialog.nodes.len(), 2);
        assert_eq!(dialog.edges.len(), 1);
        let roots = dialog.root_nodes();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind.constructor(), "TagGreeting");
        assert!(Uuid::parse_str(&dialog.uuid).is_ok());
    }

    #[test]
    fn test_remove_node_drops_edges() {
        let mut dialog = Dialog::new_with_greeting();
        let greeting = dialog.root_nodes()[0].uuid.clone();
        dialog.validated_flags.insert(greeting.clone(), true);
        assert!(dialog.remove_node(&greeting).is_some());
        assert!(dialog.edges.is_empty());
        assert!(dialog.validated_flags.is_empty());
        assert!(dialog.remove_node(&greeting).is_none());
    }

    #[test]
    fn test_set_jump_target_moves_edge() {
        let mut dialog = Dialog::new();
        let a = dialog.add_node(NodeKind::DialogueLine(DialogueLine::default()));
        let b = dialog.add_node(NodeKind::DialogueLine(DialogueLine::default()));
        let jump = dialog.add_node(NodeKind::Jump(Jump::default()));

        assert!(dialog.set_jump_target(&jump, &a));
        assert!(dialog.set_jump_target(&jump, &b));
        assert!(!dialog.has_edge(&jump, &a));
        assert!(dialog.has_edge(&jump, &b));
        assert!(!dialog.set_jump_target(&a, &b));
        assert!(!dialog.set_jump_target(&jump, "missing"));
    }

    #[test]
    fn test_link_from_jump_sets_target() {
        let mut dialog = Dialog::new();
        let a = dialog.add_node(NodeKind::DialogueLine(DialogueLine::default()));
        let b = dialog.add_node(NodeKind::DialogueLine(DialogueLine::default()));
        let jump = dialog.add_node(NodeKind::Jump(Jump::default()));

        assert!(dialog.link(&jump, &a));
        assert!(dialog.link(&jump, &b));
        assert!(!dialog.link(&jump, &b));
        let NodeKind::Jump(data) = &dialog.nodes[&jump].kind else {
            panic!("expected a jump");
        };
        assert_eq!(data.jump_target, b);
        assert_eq!(outgoing(&dialog, &jump).count(), 1);

        assert!(dialog.unlink(&jump, &b));
        let NodeKind::Jump(data) = &dialog.nodes[&jump].kind else {
            panic!("expected a jump");
        };
        assert_eq!(data.jump_target, "");
    }

    #[test]
    fn test_remove_node_clears_jump_target() {
        let mut dialog = Dialog::new();
        let a = dialog.add_node(NodeKind::DialogueLine(DialogueLine::default()));
        let jump = dialog.add_node(NodeKind::Jump(Jump::default()));
        assert!(dialog.set_jump_target(&jump, &a));

        dialog.remove_node(&a);
        let NodeKind::Jump(data) = &dialog.nodes[&jump].kind else {
            panic!("expected a jump");
        };
        assert_eq!(data.jump_target, "");
        assert!(dialog.edges.is_empty());
    }

    #[test]
    fn test_root_only_on_supported_kinds() {
        let mut dialog = Dialog::new();
        let trade = dialog.add_node(NodeKind::Trade(Trade::default()));
        assert!(!dialog.set_root(&trade, true));
        assert!(dialog.root_nodes().is_empty());
    }

    #[test]
    fn test_speakers() {
        let mut dialog = Dialog::new();
        dialog.add_speaker();
        dialog.add_speaker().list = "abc".to_string();
        assert_eq!(dialog.speakers[1].index, "1");
        assert!(dialog.remove_speaker(0));
        assert!(!dialog.remove_speaker(5));
        assert_eq!(dialog.add_default_speaker().map_value, -1);
    }

    #[test]
    fn test_texts_and_flags() {
        let mut dialog = Dialog::new();
        let line = dialog.add_node(NodeKind::DialogueLine(DialogueLine::default()));
        let jump = dialog.add_node(NodeKind::Jump(Jump::default()));

        assert!(dialog.add_handle_text(&line));
        assert!(dialog.set_text(&line, 0, "Hello"));
        assert!(!dialog.set_text(&line, 1, "Nope"));
        assert!(!dialog.add_handle_text(&jump));
        assert_eq!(dialog.nodes[&line].kind.tagged_texts().unwrap()[0].text, "Hello");

        assert!(dialog.add_check_flag(&line));
        assert!(dialog.toggle_paramval(&line, FlagList::Check, 0));
        assert!(dialog.nodes[&line].check_flags[0].has_paramval);
        assert!(!dialog.toggle_paramval(&line, FlagList::Set, 0));
        assert!(!dialog.add_set_flag(&jump));
        assert!(dialog.remove_check_flag(&line, 0));
        assert!(dialog.remove_handle_text(&line, 0));
    }

    #[test]
    fn test_speaker_linking_entries() {
        let mut dialog = Dialog::new();
        let nested = dialog.add_node(NodeKind::NestedDialog(NestedDialog::default()));
        assert!(dialog.add_speaker_linking_entry(&nested));
        assert!(dialog.add_speaker_linking_entry(&nested));
        let NodeKind::NestedDialog(data) = &dialog.nodes[&nested].kind else {
            panic!("expected a nested dialog");
        };
        assert_eq!(
            data.speaker_linking,
            vec![SpeakerLink { key: 0, value: 0 }, SpeakerLink { key: 1, value: 1 }]
        );
        assert!(dialog.remove_speaker_linking_entry(&nested, 1));
        assert!(!dialog.remove_speaker_linking_entry(&nested, 1));
    }
}
