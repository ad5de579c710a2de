// Typing a short scene through an editing session

use screenplay_wasm::models::{BlockType, Document};
use screenplay_wasm::renderers::PlainTextSettings;
use screenplay_wasm::session::{Caret, EditingSession};

fn types(session: &EditingSession) -> Vec<BlockType> {
    session.document().iter().map(|b| b.block_type).collect()
}

#[test]
fn test_writing_a_scene() {
    let mut session = EditingSession::new();

    // Heading -> action
    session.line_break();
    session.insert_text("Rain hammers the window.").unwrap();

    // Action breaks to action and Tab cannot leave it, so set character directly
    session.line_break();
    assert_eq!(session.current_type(), Some(BlockType::Action));
    assert_eq!(session.cycle_type(), None);
    assert!(session.set_type(BlockType::Character).unwrap());

    session.insert_text("JOHN").unwrap();
    assert_eq!(session.line_break(), Some(BlockType::Dialogue));
    session.insert_text("We should go.").unwrap();

    assert_eq!(
        types(&session),
        vec![
            BlockType::SceneHeading,
            BlockType::Action,
            BlockType::Character,
            BlockType::Dialogue,
        ]
    );
}

#[test]
fn test_empty_document_gains_a_block_on_break() {
    let report = screenplay_wasm::persistence::load_document("[]").unwrap();
    let mut session = EditingSession::from_load_report(report);
    assert!(session.document().is_empty());
    assert_eq!(session.caret(), None);

    session.line_break();
    session.insert_text("FADE IN:").unwrap();

    assert_eq!(types(&session), vec![BlockType::Action]);
    assert_eq!(session.document().blocks[0].text(), "FADE IN:");
    assert_eq!(session.caret(), Some(Caret::new(0, 8)));
}

#[test]
fn test_character_dialogue_sequence() {
    let mut session = EditingSession::with_document(Document::from_blocks(vec![
        screenplay_wasm::Block::with_text(BlockType::Character, "mary"),
    ]));

    assert_eq!(session.line_break(), Some(BlockType::Dialogue));
    session.insert_text("Where were you?").unwrap();
    assert_eq!(session.line_break(), Some(BlockType::Action));

    // Tab on the new action block does nothing
    assert_eq!(session.cycle_type(), None);

    let text = session.plain_text(&PlainTextSettings::default());
    assert!(text.contains("MARY"));
    assert!(text.contains("Where were you?"));
}

#[test]
fn test_newline_in_inserted_text_breaks_blocks() {
    let mut session = EditingSession::with_document(Document::from_blocks(vec![
        screenplay_wasm::Block::empty(BlockType::Transition),
    ]));
    session.insert_text("CUT TO:\nINT. CAR - DAY").unwrap();

    assert_eq!(types(&session), vec![BlockType::Transition, BlockType::SceneHeading]);
    assert_eq!(session.document().blocks[1].text(), "INT. CAR - DAY");
}

#[test]
fn test_undo_restores_document_exactly() {
    let mut session = EditingSession::new();
    let original = session.document().clone();

    session.insert_text(" - NIGHT").unwrap();
    session.line_break();
    session.insert_text("Empty room.").unwrap();
    session.cycle_type();

    while session.can_undo() {
        session.undo().unwrap();
    }
    assert_eq!(session.document(), &original);
    assert_eq!(session.caret(), Some(Caret::new(0, 15)));

    while session.can_redo() {
        session.redo().unwrap();
    }
    assert_eq!(session.document().len(), 2);
    assert_eq!(session.document().blocks[1].text(), "Empty room.");
}

#[test]
fn test_backspace_through_block_boundary() {
    let mut session = EditingSession::new();
    session.line_break();
    session.insert_text("ab").unwrap();

    assert!(session.delete_backward().unwrap());
    assert!(session.delete_backward().unwrap());
    assert!(session.delete_backward().unwrap());

    assert_eq!(session.document(), &Document::new());
    assert_eq!(session.caret(), Some(Caret::new(0, 15)));
}

#[test]
fn test_loading_clears_history() {
    let mut session = EditingSession::new();
    session.insert_text("!").unwrap();
    assert!(session.can_undo());

    let report = screenplay_wasm::persistence::load_document(
        r#"[{"type":"action","children":[{"text":"Loaded"}]}]"#,
    )
    .unwrap();
    session.load_document(report);

    assert!(!session.can_undo());
    assert_eq!(session.document().blocks[0].text(), "Loaded");
    assert_eq!(session.anomaly_notice(), None);
}
