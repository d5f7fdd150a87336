//! Dialog document model
//!
//! A [`Dialog`] owns every node (keyed by UUID, in document order) and a flat
//! set of directed edges between node UUIDs. Nodes share a common record and
//! carry a kind-specific payload in [`NodeKind`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::difficulty::DEFAULT_DIFFICULTY_CLASS_ID;

/// Declares a fieldless enum backed by fixed XML strings.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Parse the exact XML spelling.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Constructor of a dialogue line node
    pub enum LineConstructor {
        #[default]
        TagGreeting => "TagGreeting",
        TagQuestion => "TagQuestion",
        TagAnswer => "TagAnswer",
        TagCinematic => "TagCinematic",
    }
}

string_enum! {
    /// Constructor of a roll node
    pub enum RollConstructor {
        #[default]
        ActiveRoll => "ActiveRoll",
        PassiveRoll => "PassiveRoll",
    }
}

string_enum! {
    pub enum RollType {
        #[default]
        SkillCheck => "SkillCheck",
        SavingThrow => "SavingThrow",
        RawAbility => "RawAbility",
    }
}

string_enum! {
    pub enum Ability {
        Strength => "Strength",
        Dexterity => "Dexterity",
        Constitution => "Constitution",
        Intelligence => "Intelligence",
        #[default]
        Wisdom => "Wisdom",
        Charisma => "Charisma",
    }
}

string_enum! {
    /// Skill used by a roll (`None` for raw ability checks and saving throws)
    pub enum Skill {
        #[default]
        None => "None",
        Athletics => "Athletics",
        Acrobatics => "Acrobatics",
        SleightOfHand => "SleightOfHand",
        Stealth => "Stealth",
        Arcana => "Arcana",
        History => "History",
        Investigation => "Investigation",
        Nature => "Nature",
        Religion => "Religion",
        AnimalHandling => "AnimalHandling",
        Insight => "Insight",
        Medicine => "Medicine",
        Perception => "Perception",
        Survival => "Survival",
        Deception => "Deception",
        Intimidation => "Intimidation",
        Performance => "Performance",
        Persuasion => "Persuasion",
    }
}

string_enum! {
    /// Type of flag, written as the `type` key of its flag group
    pub enum FlagType {
        #[default]
        Global => "Global",
        Local => "Local",
        Object => "Object",
        User => "User",
        Tag => "Tag",
        Dialog => "Dialog",
        Script => "Script",
        Quest => "Quest",
    }
}

/// Root dialog structure containing all dialog data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// Dialog category
    pub category: String,
    /// Unique identifier for this dialog
    pub uuid: String,
    /// Timeline ID for cinematics
    pub timeline_id: String,
    /// Whether this dialog modifies an existing one. Controls which text
    /// handles are exported to localization.
    pub is_modification: bool,
    /// Default addressed speakers, in document order
    pub default_addressed_speakers: Vec<DefaultAddressedSpeaker>,
    /// Speaker table, in document order
    pub speakers: Vec<SpeakerInfo>,
    /// Node UUID -> `ValidatedHasValue`, kept as found in the source
    pub validated_flags: IndexMap<String, bool>,
    /// All dialog nodes, indexed by UUID in document order
    pub nodes: IndexMap<String, DialogNode>,
    /// Directed edges in insertion order
    pub edges: IndexSet<Edge>,
}

/// An entry of `DefaultAddressedSpeakers`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAddressedSpeaker {
    pub map_key: i32,
    pub map_value: i32,
}

impl Default for DefaultAddressedSpeaker {
    fn default() -> Self {
        Self {
            map_key: 0,
            map_value: -1,
        }
    }
}

/// Speaker information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerInfo {
    /// Speaker index in the dialog, kept verbatim
    pub index: String,
    /// Speaker list (semicolon separated UUIDs)
    pub list: String,
    /// Speaker mapping ID (UUID)
    pub speaker_mapping_id: String,
}

/// A directed link from one node to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A single dialog node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogNode {
    /// Unique identifier
    pub uuid: String,
    /// Entry point of the dialog. Only meaningful when [`NodeKind::supports_root`].
    pub root: bool,
    /// Whether this is an end node
    pub end_node: bool,
    /// Speaker index
    pub speaker: i32,
    /// Flags to set when this node is reached
    pub set_flags: Vec<Flag>,
    /// Conditions that must be met
    pub check_flags: Vec<Flag>,
    /// Free-form editor note stored in `editorData`
    pub cinematic_node_context: String,
    /// Kind-specific payload
    pub kind: NodeKind,
}

/// Node type with its kind-specific fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    DialogueLine(DialogueLine),
    Jump(Jump),
    Roll(Roll),
    RollResult(RollResult),
    Alias(Alias),
    VisualState(VisualState),
    NestedDialog(NestedDialog),
    Trade(Trade),
    /// Editor-only pass-through point. Never written to or read from XML.
    Reroute,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub constructor: LineConstructor,
    pub show_once: bool,
    pub group_id: String,
    pub group_index: i32,
    pub approval_rating_id: String,
    pub tagged_texts: Vec<TaggedText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jump {
    pub jump_target: String,
    pub jump_target_point: i32,
}

impl Default for Jump {
    fn default() -> Self {
        Self {
            jump_target: String::new(),
            jump_target_point: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub constructor: RollConstructor,
    pub show_once: bool,
    pub transition_mode: i32,
    pub roll_target_speaker: i32,
    pub roll_type: RollType,
    pub ability: Ability,
    pub skill: Skill,
    /// Advantage modifier (0 = normal, 1 = advantage, 2 = disadvantage)
    pub advantage: i32,
    pub exclude_companions_optional_bonuses: bool,
    pub exclude_speaker_optional_bonuses: bool,
    pub difficulty_class_id: String,
    pub approval_rating_id: String,
    pub tagged_texts: Vec<TaggedText>,
}

impl Default for Roll {
    fn default() -> Self {
        Self {
            constructor: RollConstructor::default(),
            show_once: false,
            transition_mode: 0,
            roll_target_speaker: 0,
            roll_type: RollType::default(),
            ability: Ability::default(),
            skill: Skill::default(),
            advantage: 0,
            exclude_companions_optional_bonuses: false,
            exclude_speaker_optional_bonuses: false,
            difficulty_class_id: DEFAULT_DIFFICULTY_CLASS_ID.to_string(),
            approval_rating_id: String::new(),
            tagged_texts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub greeting: bool,
    /// UUID of the node whose text this alias repeats
    pub source_node: String,
    pub tagged_texts: Vec<TaggedText>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualState {
    pub group_id: String,
    pub group_index: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedDialog {
    pub nested_dialog_node_id: String,
    pub speaker_linking: Vec<SpeakerLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_mode: i32,
}

impl Default for Trade {
    fn default() -> Self {
        Self { trade_mode: 1 }
    }
}

/// Maps a speaker of the nested dialog onto one of this dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerLink {
    pub key: i32,
    pub value: i32,
}

/// A single flag entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Flag UUID
    pub uuid: String,
    /// Flag value
    pub is_true: bool,
    pub flag_type: FlagType,
    /// Whether `paramval` is written. `paramval` is ignored otherwise.
    pub has_paramval: bool,
    pub paramval: i32,
}

/// Localized text attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedText {
    /// Localization handle
    pub handle: String,
    /// Line ID for this text
    pub line_id: String,
    /// Text resolved from the localization table. Never written to the dialog XML.
    pub text: String,
    pub has_tag_rule: bool,
    pub stub: bool,
    /// Version of the translation
    pub version: u16,
}

impl Default for TaggedText {
    fn default() -> Self {
        Self {
            handle: String::new(),
            line_id: String::new(),
            text: String::new(),
            has_tag_rule: true,
            stub: true,
            version: 1,
        }
    }
}

impl NodeKind {
    /// The `constructor` value written for this kind.
    #[must_use]
    pub fn constructor(&self) -> &'static str {
        match self {
            NodeKind::DialogueLine(line) => line.constructor.as_str(),
            NodeKind::Jump(_) => "Jump",
            NodeKind::Roll(roll) => roll.constructor.as_str(),
            NodeKind::RollResult(_) => "RollResult",
            NodeKind::Alias(_) => "Alias",
            NodeKind::VisualState(_) => "Visual State",
            NodeKind::NestedDialog(_) => "Nested Dialog",
            NodeKind::Trade(_) => "Trade",
            NodeKind::Reroute => "Reroute",
        }
    }

    /// Returns a display-friendly name for the kind
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::DialogueLine(_) => "Dialogue Line",
            NodeKind::Jump(_) => "Jump",
            NodeKind::Roll(_) => "Roll",
            NodeKind::RollResult(_) => "Roll Result",
            NodeKind::Alias(_) => "Alias",
            NodeKind::VisualState(_) => "Visual State",
            NodeKind::NestedDialog(_) => "Nested Dialog",
            NodeKind::Trade(_) => "Trade",
            NodeKind::Reroute => "Reroute",
        }
    }

    /// Kinds that carry the `Root` and `endnode` attributes.
    #[must_use]
    pub fn supports_root(&self) -> bool {
        matches!(
            self,
            NodeKind::DialogueLine(_) | NodeKind::Alias(_) | NodeKind::NestedDialog(_)
        )
    }

    /// Kinds that carry a `speaker` attribute.
    #[must_use]
    pub fn has_speaker(&self) -> bool {
        matches!(
            self,
            NodeKind::DialogueLine(_) | NodeKind::Roll(_) | NodeKind::Alias(_) | NodeKind::Trade(_)
        )
    }

    /// Kinds that carry set/check flags.
    #[must_use]
    pub fn has_flags(&self) -> bool {
        !matches!(self, NodeKind::Jump(_) | NodeKind::Reroute)
    }

    #[must_use]
    pub fn is_reroute(&self) -> bool {
        matches!(self, NodeKind::Reroute)
    }

    /// Tagged texts for kinds that carry them.
    #[must_use]
    pub fn tagged_texts(&self) -> Option<&Vec<TaggedText>> {
        match self {
            NodeKind::DialogueLine(line) => Some(&line.tagged_texts),
            NodeKind::Roll(roll) => Some(&roll.tagged_texts),
            NodeKind::Alias(alias) => Some(&alias.tagged_texts),
            _ => None,
        }
    }

    pub fn tagged_texts_mut(&mut self) -> Option<&mut Vec<TaggedText>> {
        match self {
            NodeKind::DialogueLine(line) => Some(&mut line.tagged_texts),
            NodeKind::Roll(roll) => Some(&mut roll.tagged_texts),
            NodeKind::Alias(alias) => Some(&mut alias.tagged_texts),
            _ => None,
        }
    }

    /// Group id and index for kinds that take part in group linking.
    #[must_use]
    pub fn group(&self) -> Option<(&str, i32)> {
        match self {
            NodeKind::DialogueLine(line) => Some((&line.group_id, line.group_index)),
            NodeKind::VisualState(state) => Some((&state.group_id, state.group_index)),
            _ => None,
        }
    }
}

impl DialogNode {
    #[must_use]
    pub fn new(uuid: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            uuid: uuid.into(),
            root: false,
            end_node: false,
            speaker: 0,
            set_flags: Vec::new(),
            check_flags: Vec::new(),
            cinematic_node_context: String::new(),
            kind,
        }
    }
}

// Convenience methods for Dialog
impl Dialog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a node by UUID
    #[must_use]
    pub fn node(&self, uuid: &str) -> Option<&DialogNode> {
        self.nodes.get(uuid)
    }

    pub fn node_mut(&mut self, uuid: &str) -> Option<&mut DialogNode> {
        self.nodes.get_mut(uuid)
    }

    /// All nodes flagged as root, in document order
    #[must_use]
    pub fn root_nodes(&self) -> Vec<&DialogNode> {
        self.nodes.values().filter(|n| n.root).collect()
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.contains(&Edge::new(from, to))
    }

    /// Count total nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_enums() {
        assert_eq!(Skill::parse("SleightOfHand"), Some(Skill::SleightOfHand));
        assert_eq!(Skill::parse("sleightofhand"), None);
        assert_eq!(Skill::ALL.len(), 19);
        assert_eq!(Ability::default(), Ability::Wisdom);
        assert_eq!(FlagType::default().as_str(), "Global");
        assert_eq!(LineConstructor::TagCinematic.to_string(), "TagCinematic");
    }

    #[test]
    fn test_kind_capabilities() {
        let line = NodeKind::DialogueLine(DialogueLine::default());
        let roll = NodeKind::Roll(Roll::default());
        assert!(line.supports_root());
        assert!(!roll.supports_root());
        assert!(roll.has_speaker());
        assert!(!NodeKind::Jump(Jump::default()).has_flags());
        assert_eq!(NodeKind::VisualState(VisualState::default()).constructor(), "Visual State");
        assert!(NodeKind::Trade(Trade::default()).tagged_texts().is_none());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Jump::default().jump_target_point, 1);
        assert_eq!(Trade::default().trade_mode, 1);
        assert_eq!(Roll::default().difficulty_class_id, DEFAULT_DIFFICULTY_CLASS_ID);
        assert_eq!(DefaultAddressedSpeaker::default().map_value, -1);
        assert_eq!(TaggedText::default().version, 1);
    }
}
