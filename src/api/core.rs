//! WASM API for block type prediction, layout and editing sessions
//!
//! The free functions are thin wrappers over the pure state machine and layout
//! mapper. `ScreenplaySession` is an explicit handle the editor surface owns;
//! each editor instance gets its own.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, deserialize_or_default, serialize, to_js_error};
use crate::layout::LayoutDescriptor;
use crate::models::{BlockType, TextRun};
use crate::persistence;
use crate::renderers::{PlainTextSettings, PrintSettings, ScreenLayoutConfig};
use crate::session::{Caret, EditingSession};
use crate::{layout, transitions, wasm_info, wasm_warn};

/// Result of `layoutFor`
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct LayoutResult {
    descriptor: LayoutDescriptor,
    display_runs: Vec<TextRun>,
}

/// Predict the type of the block created by a line break.
///
/// Unknown names are treated as `action`.
#[wasm_bindgen(js_name = nextTypeOnBreak)]
pub fn next_type_on_break(current: &str) -> String {
    let current = BlockType::from_name(current).unwrap_or_default();
    transitions::next_type_on_break(current).to_string()
}

/// Type a block takes on an explicit type cycle.
///
/// Unknown names are returned unchanged (the cycle is a no-op for them).
#[wasm_bindgen(js_name = nextTypeOnCycle)]
pub fn next_type_on_cycle(current: &str) -> String {
    match BlockType::from_name(current) {
        Some(block_type) => transitions::next_type_on_cycle(block_type).to_string(),
        None => current.to_string(),
    }
}

/// Compute the layout descriptor and display runs for a block type
#[wasm_bindgen(js_name = layoutFor)]
pub fn layout_for(block_type: &str, runs_js: JsValue) -> Result<JsValue, JsValue> {
    let runs: Vec<TextRun> = deserialize(runs_js, "Runs deserialization error")?;
    let block_type = BlockType::from_name(block_type).unwrap_or_default();
    let (descriptor, display_runs) = layout::layout_for(block_type, &runs);
    serialize(
        &LayoutResult {
            descriptor,
            display_runs,
        },
        "Layout serialization error",
    )
}

/// Editing session handle owned by the editor surface
#[wasm_bindgen]
pub struct ScreenplaySession {
    inner: EditingSession,
}

impl Default for ScreenplaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenplaySession {
    fn from_report(report: persistence::LoadReport) -> Self {
        if let Some(notice) = report.notice() {
            wasm_warn!("{}", notice);
        }
        Self {
            inner: EditingSession::from_load_report(report),
        }
    }

    /// The underlying session, for Rust callers
    pub fn session(&self) -> &EditingSession {
        &self.inner
    }
}

#[wasm_bindgen]
impl ScreenplaySession {
    /// Start a session on a new document
    #[wasm_bindgen(constructor)]
    pub fn new() -> ScreenplaySession {
        wasm_info!("new screenplay session");
        Self {
            inner: EditingSession::new(),
        }
    }

    /// Open a session from stored JSON text
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<ScreenplaySession, JsValue> {
        let report = persistence::load_document(json).map_err(to_js_error)?;
        Ok(Self::from_report(report))
    }

    /// Open a session from a stored document value (array of block nodes)
    #[wasm_bindgen(js_name = fromValue)]
    pub fn from_value(document_js: JsValue) -> Result<ScreenplaySession, JsValue> {
        let value: serde_json::Value = deserialize(document_js, "Document deserialization error")?;
        let report = persistence::load_document_value(&value).map_err(to_js_error)?;
        Ok(Self::from_report(report))
    }

    /// Stored JSON text for the current document
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        persistence::document_to_json(self.inner.document()).map_err(to_js_error)
    }

    /// Current document as plain JS objects
    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<JsValue, JsValue> {
        serialize(self.inner.document(), "Document serialization error")
    }

    #[wasm_bindgen(js_name = setCaret)]
    pub fn set_caret(&mut self, block: usize, offset: usize) -> Result<(), JsValue> {
        self.inner
            .set_caret(Some(Caret::new(block, offset)))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = clearCaret)]
    pub fn clear_caret(&mut self) {
        // Clearing never fails
        let _ = self.inner.set_caret(None);
    }

    /// Caret as `{block, offset}`, or null
    #[wasm_bindgen(js_name = getCaret)]
    pub fn get_caret(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.caret(), "Caret serialization error")
    }

    #[wasm_bindgen(js_name = currentType)]
    pub fn current_type(&self) -> Option<String> {
        self.inner.current_type().map(|t| t.to_string())
    }

    /// Enter key: returns the new block's type, or undefined without a caret
    #[wasm_bindgen(js_name = lineBreak)]
    pub fn line_break(&mut self) -> Option<String> {
        self.inner.line_break().map(|t| t.to_string())
    }

    /// Tab key: returns the new type, or undefined when nothing changed
    #[wasm_bindgen(js_name = cycleType)]
    pub fn cycle_type(&mut self) -> Option<String> {
        self.inner.cycle_type().map(|t| t.to_string())
    }

    /// Set the caret block's type by name; returns false when it already had it
    #[wasm_bindgen(js_name = setType)]
    pub fn set_type(&mut self, block_type: &str) -> Result<bool, JsValue> {
        let block_type: BlockType = block_type.parse().map_err(to_js_error)?;
        self.inner.set_type(block_type).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.insert_text(text).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = deleteBackward)]
    pub fn delete_backward(&mut self) -> Result<bool, JsValue> {
        self.inner.delete_backward().map_err(to_js_error)
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        self.inner.undo().map_err(to_js_error)
    }

    pub fn redo(&mut self) -> Result<(), JsValue> {
        self.inner.redo().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    /// Screen display list; `config_js` may be undefined for defaults
    #[wasm_bindgen(js_name = displayList)]
    pub fn display_list(&self, config_js: JsValue) -> Result<JsValue, JsValue> {
        let config: ScreenLayoutConfig =
            deserialize_or_default(config_js, "Config deserialization error")?;
        serialize(&self.inner.display_list(&config), "DisplayList serialization error")
    }

    /// Print document definition as JSON; `settings_json` may be null for defaults
    #[wasm_bindgen(js_name = printDocument)]
    pub fn print_document(&self, settings_json: Option<String>) -> Result<String, JsValue> {
        let settings = PrintSettings::from_json(settings_json.as_deref()).map_err(to_js_error)?;
        self.inner
            .print_document(&settings)
            .to_json()
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = plainText)]
    pub fn plain_text(&self) -> String {
        self.inner.plain_text(&PlainTextSettings::default())
    }

    /// Notice about blocks recovered while loading, if any
    #[wasm_bindgen(js_name = anomalyNotice)]
    pub fn anomaly_notice(&self) -> Option<String> {
        self.inner.anomaly_notice()
    }
}
