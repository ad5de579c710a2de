//! Block types and alignment enumerations for screenplay documents
//!
//! This module defines the closed set of semantic roles a block can play
//! in a screenplay, plus the alignment values a block may override.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScreenplayError;

/// Enumeration of all block types a screenplay document can contain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Scene heading / slugline proper (INT. KITCHEN - NIGHT)
    SceneHeading,

    /// Action / description lines
    #[default]
    Action,

    /// Character cue above a speech
    Character,

    /// Spoken dialogue
    Dialogue,

    /// Actor direction inside a speech, printed in parentheses
    Parenthetical,

    /// Transition (CUT TO:, FADE OUT.)
    Transition,

    /// Legacy generic paragraph from older documents
    Paragraph,

    /// Legacy slugline bucket from older documents
    Slugline,
}

impl BlockType {
    /// Every block type, in toolbar order
    pub const ALL: [BlockType; 8] = [
        BlockType::SceneHeading,
        BlockType::Action,
        BlockType::Character,
        BlockType::Dialogue,
        BlockType::Parenthetical,
        BlockType::Transition,
        BlockType::Paragraph,
        BlockType::Slugline,
    ];

    /// Get a human-readable name for this block type
    pub fn name(&self) -> &'static str {
        match self {
            BlockType::SceneHeading => "Scene Heading",
            BlockType::Action => "Action",
            BlockType::Character => "Character",
            BlockType::Dialogue => "Dialogue",
            BlockType::Parenthetical => "Parenthetical",
            BlockType::Transition => "Transition",
            BlockType::Paragraph => "Paragraph",
            BlockType::Slugline => "Slugline",
        }
    }

    /// Get the kebab-case name used in the persisted document shape
    pub fn kebab_case_name(&self) -> &'static str {
        match self {
            BlockType::SceneHeading => "scene-heading",
            BlockType::Action => "action",
            BlockType::Character => "character",
            BlockType::Dialogue => "dialogue",
            BlockType::Parenthetical => "parenthetical",
            BlockType::Transition => "transition",
            BlockType::Paragraph => "paragraph",
            BlockType::Slugline => "slugline",
        }
    }

    /// Look up a block type by its persisted name
    pub fn from_name(name: &str) -> Option<BlockType> {
        match name {
            "scene-heading" => Some(BlockType::SceneHeading),
            "action" => Some(BlockType::Action),
            "character" => Some(BlockType::Character),
            "dialogue" => Some(BlockType::Dialogue),
            "parenthetical" => Some(BlockType::Parenthetical),
            "transition" => Some(BlockType::Transition),
            "paragraph" => Some(BlockType::Paragraph),
            "slugline" => Some(BlockType::Slugline),
            _ => None,
        }
    }

    /// Check if this is one of the legacy buckets kept for older documents
    pub fn is_legacy(&self) -> bool {
        matches!(self, BlockType::Paragraph | BlockType::Slugline)
    }

    /// Check if this block continues a speech started by a character cue
    pub fn continues_speech(&self) -> bool {
        matches!(self, BlockType::Dialogue | BlockType::Parenthetical)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kebab_case_name())
    }
}

impl FromStr for BlockType {
    type Err = ScreenplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::from_name(s).ok_or_else(|| ScreenplayError::UnknownBlockType(s.to_string()))
    }
}

/// Horizontal alignment of a block's text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
}

impl Alignment {
    pub fn from_name(name: &str) -> Option<Alignment> {
        match name {
            "left" => Some(Alignment::Left),
            "right" => Some(Alignment::Right),
            "center" => Some(Alignment::Center),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockType::from_name(block_type.kebab_case_name()), Some(block_type));
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&BlockType::SceneHeading).unwrap();
        assert_eq!(json, "\"scene-heading\"");

        let parsed: BlockType = serde_json::from_str("\"parenthetical\"").unwrap();
        assert_eq!(parsed, BlockType::Parenthetical);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("bogus".parse::<BlockType>().is_err());
        assert_eq!("transition".parse::<BlockType>().unwrap(), BlockType::Transition);
    }

    #[test]
    fn test_default_is_action() {
        assert_eq!(BlockType::default(), BlockType::Action);
        assert_eq!(Alignment::default(), Alignment::Left);
    }

    #[test]
    fn test_legacy_buckets() {
        assert!(BlockType::Paragraph.is_legacy());
        assert!(BlockType::Slugline.is_legacy());
        assert!(!BlockType::SceneHeading.is_legacy());
    }
}
