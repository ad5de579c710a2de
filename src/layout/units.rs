//! Abstract layout units shared by every renderer
//!
//! One unit is a typographic point: 72 units to the inch. The print renderer
//! uses them directly; the screen renderer scales them to pixels.

pub const UNITS_PER_INCH: f32 = 72.0;

/// Left edge of the text column
pub const BASELINE: f32 = 0.0;

/// Left indent of character cues
pub const CHARACTER_COLUMN: f32 = 158.0;

/// Left and right indent of dialogue
pub const DIALOGUE_COLUMN: f32 = 72.0;

/// Left indent of parentheticals
pub const PARENTHETICAL_COLUMN: f32 = 115.0;

/// Maximum dialogue line width (3.5in)
pub const DIALOGUE_WIDTH: f32 = 252.0;

/// Maximum parenthetical line width (3in)
pub const PARENTHETICAL_WIDTH: f32 = 216.0;

/// Space above a scene heading
pub const SCENE_SPACE_ABOVE: f32 = 24.0;

/// One blank line at 12pt
pub const LINE_SPACE: f32 = 12.0;
