use crate::blocks::{render_blocks, video_frame};
use crate::{ContentShape, DisplayNode, LegacyDocument, LegacySection, LessonView};
use serde_json::Value;
use tracing::{debug, instrument};
use tutorly_model::BlockDocument;

pub const NO_CONTENT_MESSAGE: &str = "This tutorial has no content yet.";
pub const EMPTY_LESSON_MESSAGE: &str = "This lesson has no content yet.";

/// Render a tutorial view in whichever shape it was stored
#[instrument(skip_all)]
pub fn render_tutorial(view: &Value) -> DisplayNode {
    let shape = ContentShape::resolve(view);
    debug!(shape = shape.name(), "Rendering tutorial");

    let root = DisplayNode::element("article").with_class("tutorly-tutorial");
    match shape {
        ContentShape::LegacySections(document) => root.with_children(render_legacy(&document)),
        ContentShape::Lessons(lessons) => root.with_children(
            lessons
                .iter()
                .enumerate()
                .map(|(index, lesson)| render_lesson(lesson, index))
                .collect(),
        ),
        ContentShape::RawHtml(html) => root.with_child(
            DisplayNode::element("div")
                .with_class("tutorly-legacy-html")
                .with_child(DisplayNode::markup(html)),
        ),
        ContentShape::Empty => root.with_child(DisplayNode::placeholder(NO_CONTENT_MESSAGE)),
    }
}

/// Render a single lesson body
pub fn render_document(document: &BlockDocument) -> DisplayNode {
    let root = DisplayNode::element("div").with_class("tutorly-lesson__body");
    if document.is_empty() {
        return root.with_child(DisplayNode::placeholder(EMPTY_LESSON_MESSAGE));
    }
    root.with_children(render_blocks(&document.blocks, "lesson"))
}

fn render_lesson(lesson: &LessonView, index: usize) -> DisplayNode {
    let scope = format!("lesson-{}", index);
    let mut node = DisplayNode::element("section")
        .with_class("tutorly-lesson")
        .with_attr("id", &scope);

    if !lesson.title.is_empty() {
        node = node.with_child(DisplayNode::element("h2").with_child(DisplayNode::text(&lesson.title)));
    }

    if lesson.blocks.is_empty() && lesson.skipped == 0 {
        return node.with_child(DisplayNode::placeholder(EMPTY_LESSON_MESSAGE));
    }

    node = node.with_children(render_blocks(&lesson.blocks, &scope));
    if lesson.skipped > 0 {
        node = node.with_child(DisplayNode::comment(format!(
            "{} malformed block(s) skipped",
            lesson.skipped
        )));
    }
    node
}

fn render_legacy(document: &LegacyDocument) -> Vec<DisplayNode> {
    let mut nodes = Vec::new();

    if !document.title.is_empty() {
        nodes.push(DisplayNode::element("h1").with_child(DisplayNode::text(&document.title)));
    }
    if !document.introduction.is_empty() {
        nodes.push(
            DisplayNode::element("p")
                .with_class("tutorly-intro")
                .with_child(DisplayNode::markup(&document.introduction)),
        );
    }
    if !document.video.is_empty() {
        nodes.push(video(&document.video));
    }
    if !document.narrative.is_empty() {
        nodes.push(
            DisplayNode::element("div")
                .with_class("tutorly-narrative")
                .with_child(DisplayNode::markup(&document.narrative)),
        );
    }
    for section in &document.sections {
        nodes.push(render_section(section));
    }

    nodes
}

fn render_section(section: &LegacySection) -> DisplayNode {
    let mut node = DisplayNode::element("section").with_class("tutorly-section");

    if !section.title.is_empty() {
        node = node.with_child(DisplayNode::element("h2").with_child(DisplayNode::text(&section.title)));
    }
    if !section.text.is_empty() {
        node = node.with_child(
            DisplayNode::element("div")
                .with_class("tutorly-section__text")
                .with_child(DisplayNode::markup(&section.text)),
        );
    }
    if !section.video.is_empty() {
        node = node.with_child(video(&section.video));
    }
    if !section.code.is_empty() {
        let language = if section.language.is_empty() {
            "plaintext"
        } else {
            section.language.as_str()
        };
        node = node.with_child(
            DisplayNode::element("pre").with_child(
                DisplayNode::element("code")
                    .with_class(&format!("language-{}", language))
                    .with_child(DisplayNode::text(&section.code)),
            ),
        );
    }
    if !section.output.is_empty() {
        node = node.with_child(
            DisplayNode::element("div")
                .with_class("tutorly-output")
                .with_child(DisplayNode::markup(&section.output)),
        );
    }
    if !section.note.is_empty() {
        node = node.with_child(
            DisplayNode::element("aside")
                .with_class("tutorly-note")
                .with_child(DisplayNode::markup(&section.note)),
        );
    }
    node
}

fn video(url: &str) -> DisplayNode {
    DisplayNode::element("div")
        .with_class("tutorly-video__frame")
        .with_child(video_frame(url, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tutorly_model::Block;

    #[test]
    fn test_empty_view_shows_placeholder() {
        let node = render_tutorial(&json!({ "title": "Nothing" }));
        assert!(node
            .descendants()
            .iter()
            .any(|n| matches!(n, DisplayNode::Placeholder { .. })));
    }

    #[test]
    fn test_raw_html_is_opaque() {
        let node = render_tutorial(&json!({ "content": "<h1>Old tutorial</h1>" }));
        assert!(node.to_html().contains("<h1>Old tutorial</h1>"));
    }

    #[test]
    fn test_lessons_get_headings_and_scoped_ids() {
        let node = render_tutorial(&json!({
            "lessons": [
                { "title": "First", "content": [{ "type": "quiz", "data": { "question": "?", "options": ["a"], "correctAnswer": 0 } }] },
                { "title": "Second", "content": [] }
            ]
        }));

        let sections = node.find_by_tag("section");
        assert_eq!(sections.len(), 2);
        assert_eq!(node.find_by_tag("h2").len(), 2);
        assert!(node.descendants().iter().any(
            |n| matches!(n, DisplayNode::Quiz { id, .. } if id == "lesson-0-block-0")
        ));
        assert!(sections[1].text_content().contains(EMPTY_LESSON_MESSAGE));
    }

    #[test]
    fn test_legacy_section_fields() {
        let node = render_tutorial(&json!({
            "content": {
                "title": "Loops",
                "video": "https://vimeo.com/1234",
                "sections": [{
                    "title": "While",
                    "code": "while x {}",
                    "language": "rust",
                    "output": "<samp>done</samp>",
                    "note": "Careful"
                }]
            }
        }));

        assert_eq!(node.find_by_tag("h1").len(), 1);
        assert_eq!(
            node.find_by_tag("iframe")[0].attr("src"),
            Some("https://player.vimeo.com/video/1234")
        );
        assert!(node.find_by_tag("code")[0].has_class("language-rust"));
        assert_eq!(node.find_by_tag("aside").len(), 1);
        assert!(node.to_html().contains("<samp>done</samp>"));
    }

    #[test]
    fn test_render_document() {
        let doc = BlockDocument::with_blocks(vec![Block::paragraph("Hi"), Block::delimiter()]);
        let node = render_document(&doc);
        assert_eq!(node.children().len(), 2);

        let empty = render_document(&BlockDocument::empty());
        assert!(empty.text_content().contains(EMPTY_LESSON_MESSAGE));
    }
}
