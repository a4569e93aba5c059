//! Mutation sequences as an authoring UI would issue them

use serde_json::json;
use tutorly_editor::mutations::{
    append, append_quiz_option, move_at, remove_at, remove_quiz_option, update_field,
    update_quiz_option,
};
use tutorly_editor::{Direction, History, Mutation, MutationError};
use tutorly_model::{Block, BlockData, BlockDocument, BlockType};

fn lesson() -> BlockDocument {
    BlockDocument::with_blocks(vec![
        Block::header("Loops", 2).with_id("h"),
        Block::paragraph("A loop repeats work.").with_id("p"),
        Block::code("for i in 0..3 {}", "rust").with_id("c"),
        Block::quiz("How many times?", &["2", "3"], 1).with_id("q"),
    ])
}

fn ids(doc: &BlockDocument) -> Vec<String> {
    doc.blocks.iter().filter_map(|b| b.id.clone()).collect()
}

#[test]
fn test_move_down_then_up_restores_order() {
    let doc = lesson();
    for index in 0..doc.len() - 1 {
        let moved = move_at(&doc, index, Direction::Down).unwrap();
        let back = move_at(&moved, index + 1, Direction::Up).unwrap();
        assert_eq!(back, doc, "round trip failed at {}", index);
    }
}

#[test]
fn test_move_at_edges_is_noop() {
    let doc = lesson();
    assert_eq!(move_at(&doc, 0, Direction::Up).unwrap(), doc);
    assert_eq!(move_at(&doc, doc.len() - 1, Direction::Down).unwrap(), doc);
}

#[test]
fn test_remove_then_append_keeps_membership() {
    let doc = lesson();
    let removed = doc.blocks[1].clone();

    let next = remove_at(&doc, 1).unwrap();
    assert_eq!(next.len(), doc.len() - 1);
    let next = append(&next, removed);

    let mut before = ids(&doc);
    let mut after = ids(&next);
    assert_eq!(after, vec!["h", "c", "q", "p"]);
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn test_update_language_leaves_input_untouched() {
    let doc = lesson();
    let next = update_field(&doc, 2, "data.language", json!("python")).unwrap();

    match &next.blocks[2].data {
        BlockData::Code(code) => {
            assert_eq!(code.language, "python");
            assert_eq!(code.code, "for i in 0..3 {}");
        }
        other => panic!("Expected code block, got {:?}", other),
    }
    match &doc.blocks[2].data {
        BlockData::Code(code) => assert_eq!(code.language, "rust"),
        other => panic!("Expected code block, got {:?}", other),
    }
}

#[test]
fn test_update_type_converts_block() {
    let doc = lesson();
    let next = update_field(&doc, 1, "type", json!("quote")).unwrap();
    assert_eq!(next.blocks[1].block_type(), Some(BlockType::Quote));
    assert_eq!(next.blocks[1].id.as_deref(), Some("p"));
}

#[test]
fn test_wrong_value_type_is_rejected() {
    let doc = lesson();

    let result = update_field(&doc, 0, "data.level", json!("two"));
    assert!(matches!(
        result,
        Err(MutationError::InvalidValue { ref path, .. }) if path == "data.level"
    ));
    assert!(!doc.blocks[0].is_unknown());

    let next = update_field(&doc, 0, "data.level", json!(3)).unwrap();
    assert!(matches!(&next.blocks[0].data, BlockData::Header(h) if h.level == 3));
}

#[test]
fn test_unknown_block_stays_editable() {
    let doc = BlockDocument::with_blocks(vec![Block::from_value(
        json!({ "type": "chart", "data": { "points": [1] } }),
    )
    .unwrap()]);

    let next = update_field(&doc, 0, "data.points", json!([1, 2])).unwrap();
    assert!(next.blocks[0].is_unknown());
    assert_eq!(next.blocks[0].type_name(), "chart");
}

#[test]
fn test_missing_block_errors() {
    let doc = lesson();

    assert_eq!(
        update_field(&doc, 9, "data.text", json!("x")),
        Err(MutationError::BlockNotFound { index: 9, len: 4 })
    );
    assert_eq!(
        remove_at(&doc, 4),
        Err(MutationError::IndexOutOfRange { index: 4, len: 4 })
    );
    assert_eq!(
        move_at(&doc, 7, Direction::Up),
        Err(MutationError::IndexOutOfRange { index: 7, len: 4 })
    );
}

#[test]
fn test_quiz_options_grow_only_by_append() {
    let doc = lesson();

    assert_eq!(
        update_quiz_option(&doc, 3, 2, "4"),
        Err(MutationError::OptionOutOfRange { option: 2, len: 2 })
    );

    let next = append_quiz_option(&doc, 3, "4").unwrap();
    let next = update_quiz_option(&next, 3, 2, "four").unwrap();
    match &next.blocks[3].data {
        BlockData::Quiz(quiz) => assert_eq!(quiz.options, vec!["2", "3", "four"]),
        other => panic!("Expected quiz block, got {:?}", other),
    }

    assert_eq!(
        append_quiz_option(&doc, 0, "x"),
        Err(MutationError::NotAQuiz { index: 0 })
    );
}

#[test]
fn test_removing_quiz_option_keeps_correct_answer() {
    let doc = BlockDocument::with_blocks(vec![Block::quiz("Pick", &["a", "b", "c"], 2)]);
    let next = remove_quiz_option(&doc, 0, 0).unwrap();

    match &next.blocks[0].data {
        BlockData::Quiz(quiz) => {
            assert_eq!(quiz.options, vec!["b", "c"]);
            assert_eq!(quiz.correct_option(), Some("c"));
        }
        other => panic!("Expected quiz block, got {:?}", other),
    }
}

#[test]
fn test_serialized_mutations_drive_history() {
    let script = json!([
        { "op": "append", "block": { "type": "delimiter", "data": {} } },
        { "op": "moveAt", "index": 0, "direction": "down" },
        { "op": "updateField", "index": 0, "path": "data.text", "value": "Intro" },
        { "op": "appendQuizOption", "blockIndex": 3, "value": "5" }
    ]);
    let mutations: Vec<Mutation> = serde_json::from_value(script).unwrap();

    let original = lesson();
    let mut history = History::new(original.clone());
    for mutation in &mutations {
        history.apply(mutation).unwrap();
    }

    assert_eq!(history.current().len(), 5);
    assert_eq!(ids(history.current()), vec!["p", "h", "c", "q"]);
    assert_eq!(history.undo_count(), 4);

    while history.can_undo() {
        history.undo().unwrap();
    }
    assert_eq!(history.current(), &original);
}
