use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tutorly_export::{lesson_to_text, to_html};
use tutorly_model::{Block, BlockDocument, LessonDraft, LessonRecord, ListStyle};

fn sample_lesson(sections: usize) -> LessonRecord {
    let mut blocks = Vec::new();
    for i in 0..sections {
        blocks.push(Block::header(format!("Section {}", i), 2));
        blocks.push(Block::paragraph(
            "Ownership rules are checked at <i>compile time</i>, so there is no runtime cost.",
        ));
        blocks.push(Block::code(
            "fn main() {\n    let s = String::from(\"hello\");\n    takes(s);\n}",
            "rust",
        ));
        blocks.push(Block::list(ListStyle::Unordered, &["move", "borrow", "clone"]));
        blocks.push(Block::quiz("Which one copies?", &["move", "borrow", "clone"], 2));
    }

    LessonRecord::from_draft(
        "bench",
        "tutorial",
        LessonDraft::new("Ownership").with_content(BlockDocument::with_blocks(blocks)),
    )
}

fn export_small_lesson(c: &mut Criterion) {
    let lesson = sample_lesson(4);

    c.bench_function("to_html_small", |b| b.iter(|| to_html(black_box(&lesson))));
    c.bench_function("to_text_small", |b| {
        b.iter(|| lesson_to_text(black_box(&lesson)))
    });
}

fn export_large_lesson(c: &mut Criterion) {
    let lesson = sample_lesson(200);

    c.bench_function("to_html_large", |b| b.iter(|| to_html(black_box(&lesson))));
    c.bench_function("to_text_large", |b| {
        b.iter(|| lesson_to_text(black_box(&lesson)))
    });
}

criterion_group!(benches, export_small_lesson, export_large_lesson);
criterion_main!(benches);
