//! Print export
//!
//! Builds a pdfmake-style document definition for a screenplay. The JS host
//! loads fonts and turns the definition into PDF bytes; everything about block
//! placement is decided here from the shared layout table.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenplayError};
use crate::layout::{layout_block, LaidOutBlock};
use crate::models::serde_helpers::is_false;
use crate::models::{Alignment, Document};

/// Placeholder the host replaces with the current page number
pub const PAGE_NUMBER_PLACEHOLDER: &str = "{page}";

/// Settings for print export
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintSettings {
    pub page_size: String,

    /// Page margins in `[left, top, right, bottom]` layout units
    pub page_margins: [f32; 4],

    pub font: String,
    pub font_size: f32,
    pub line_height: f32,

    /// Emit the right-aligned `N.` page number footer
    pub page_numbers: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            page_size: "LETTER".to_string(),
            page_margins: [108.0, 72.0, 72.0, 72.0],
            font: "CourierPrime".to_string(),
            font_size: 12.0,
            line_height: 1.0,
            page_numbers: true,
        }
    }
}

impl PrintSettings {
    /// Parse optional settings JSON; `None` yields the defaults
    pub fn from_json(settings_json: Option<&str>) -> Result<Self> {
        match settings_json {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| ScreenplayError::InvalidSettings(e.to_string())),
            None => Ok(Self::default()),
        }
    }
}

/// A styled text span in a print block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrintSpan {
    pub text: String,
    pub bold: bool,
    pub italics: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<String>,
}

/// One content entry of the document definition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintBlock {
    pub text: Vec<PrintSpan>,

    /// `[left, top, right, bottom]`
    pub margin: [f32; 4],

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub keep_with_next: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintStyle {
    pub font: String,
    pub font_size: f32,
    pub line_height: f32,
    pub alignment: Alignment,
}

/// Page number footer, with `{page}` substituted per page by the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintFooter {
    pub text_template: String,
    pub alignment: Alignment,
    pub margin: [f32; 4],
    pub color: String,
}

impl PrintFooter {
    pub fn text_for_page(&self, page: usize) -> String {
        self.text_template
            .replace(PAGE_NUMBER_PLACEHOLDER, &page.to_string())
    }
}

/// Complete print document definition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrintDocument {
    pub page_size: String,
    pub page_margins: [f32; 4],
    pub content: Vec<PrintBlock>,
    pub default_style: PrintStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<PrintFooter>,
}

impl PrintDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn print_block(laid_out: &LaidOutBlock) -> PrintBlock {
    let descriptor = &laid_out.descriptor;
    let text = laid_out
        .spans()
        .into_iter()
        .map(|span| PrintSpan {
            text: span.text,
            bold: span.bold,
            italics: span.italic,
            decoration: span.underline.then(|| "underline".to_string()),
        })
        .collect();

    PrintBlock {
        text,
        margin: descriptor.margins(),
        // Left is the document default and is left implicit
        alignment: (descriptor.alignment != Alignment::Left).then_some(descriptor.alignment),
        keep_with_next: descriptor.keep_with_next,
    }
}

/// Build the print document definition for a screenplay
pub fn to_print_document(document: &Document, settings: &PrintSettings) -> PrintDocument {
    let content = document
        .iter()
        .map(|block| print_block(&layout_block(block)))
        .collect();

    let footer = settings.page_numbers.then(|| PrintFooter {
        text_template: format!("{}.", PAGE_NUMBER_PLACEHOLDER),
        alignment: Alignment::Right,
        margin: [0.0, 0.0, 50.0, 0.0],
        color: "gray".to_string(),
    });

    log::debug!("print export: {} blocks", document.len());

    PrintDocument {
        page_size: settings.page_size.clone(),
        page_margins: settings.page_margins,
        content,
        default_style: PrintStyle {
            font: settings.font.clone(),
            font_size: settings.font_size,
            line_height: settings.line_height,
            alignment: Alignment::Left,
        },
        footer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockType, TextRun};

    #[test]
    fn test_parenthetical_gets_italic_parens() {
        let doc = Document::from_blocks(vec![Block::new(
            BlockType::Parenthetical,
            vec![TextRun::new("beat").bold()],
        )]);
        let print = to_print_document(&doc, &PrintSettings::default());
        let spans = &print.content[0].text;

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "(");
        assert!(spans[0].italics);
        assert!(!spans[0].bold);
        assert!(spans[1].bold);
        assert_eq!(spans[2].text, ")");
        assert_eq!(print.content[0].margin, [115.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_underline_becomes_decoration() {
        let doc = Document::from_blocks(vec![Block::new(
            BlockType::Action,
            vec![TextRun::new("Boom").underline()],
        )]);
        let print = to_print_document(&doc, &PrintSettings::default());
        assert_eq!(print.content[0].text[0].decoration.as_deref(), Some("underline"));
    }

    #[test]
    fn test_footer_numbers_pages() {
        let print = to_print_document(&Document::new(), &PrintSettings::default());
        let footer = print.footer.expect("footer enabled by default");
        assert_eq!(footer.text_for_page(3), "3.");
        assert_eq!(footer.alignment, Alignment::Right);
    }

    #[test]
    fn test_settings_json_overrides_defaults() {
        let settings = PrintSettings::from_json(Some(r#"{"pageSize":"A4","pageNumbers":false}"#)).unwrap();
        assert_eq!(settings.page_size, "A4");
        assert!(!settings.page_numbers);
        assert_eq!(settings.font, "CourierPrime");

        assert!(PrintSettings::from_json(Some("not json")).is_err());
    }

    #[test]
    fn test_json_shape() {
        let doc = Document::from_blocks(vec![
            Block::with_text(BlockType::Character, "joe"),
            Block::with_text(BlockType::Transition, "cut to:"),
        ]);
        let json = to_print_document(&doc, &PrintSettings::default()).to_json().unwrap();
        assert!(json.contains(r#""pageSize":"LETTER""#));
        assert!(json.contains(r#""keepWithNext":true"#));
        assert!(json.contains(r#""alignment":"right""#));
        assert!(json.contains(r#""text":"JOE""#));
    }
}
