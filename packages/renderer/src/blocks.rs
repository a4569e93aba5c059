//! Per-block rendering
//!
//! Every block produces exactly one node. Blocks the renderer doesn't know
//! become invisible comments, so a document with a stray block still
//! renders everything else.

use crate::video::embed_url;
use crate::DisplayNode;
use tracing::debug;
use tutorly_model::{
    Block, BlockData, CodeData, EmbedData, ImageData, ListData, ListItem, ListStyle, QuizData,
    TableData, VideoData,
};

/// Render a run of blocks. `scope` prefixes generated ids so two lessons
/// on one page don't share quiz state.
pub fn render_blocks(blocks: &[Block], scope: &str) -> Vec<DisplayNode> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let fallback_id = format!("{}-block-{}", scope, index);
            render_block(block, &fallback_id)
        })
        .collect()
}

pub fn render_block(block: &Block, fallback_id: &str) -> DisplayNode {
    let id = block.id.as_deref().unwrap_or(fallback_id);

    match &block.data {
        BlockData::Paragraph(p) => DisplayNode::element("p").with_child(DisplayNode::markup(&p.text)),

        BlockData::Header(h) => DisplayNode::element(format!("h{}", h.clamped_level()))
            .with_child(DisplayNode::markup(&h.text)),

        BlockData::List(list) => render_list(list),

        BlockData::Code(code) => render_code(code),

        BlockData::Quote(quote) => {
            let mut node = DisplayNode::element("blockquote")
                .with_child(DisplayNode::element("p").with_child(DisplayNode::markup(&quote.text)));
            if !quote.caption.is_empty() {
                node = node.with_child(DisplayNode::element("cite").with_child(DisplayNode::text(&quote.caption)));
            }
            node
        }

        BlockData::Image(image) => render_image(image),

        BlockData::Video(video) => render_video(video),

        BlockData::Table(table) => render_table(table),

        BlockData::Delimiter(_) => DisplayNode::element("hr").with_class("tutorly-delimiter"),

        BlockData::Embed(embed) => render_embed(embed),

        BlockData::Quiz(quiz) => render_quiz(quiz, id),

        BlockData::Text(text) => render_prose(&text.text),

        BlockData::Unknown { kind, .. } => {
            debug!(kind = %kind, "Skipping block of unknown type");
            DisplayNode::comment(format!("unknown block type: {}", kind))
        }
    }
}

/// Plain text with its line breaks kept
fn render_prose(text: &str) -> DisplayNode {
    let mut children = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            children.push(DisplayNode::element("br"));
        }
        if !line.is_empty() {
            children.push(DisplayNode::text(line));
        }
    }
    DisplayNode::element("p")
        .with_class("tutorly-text")
        .with_children(children)
}

fn render_list(list: &ListData) -> DisplayNode {
    list_node(list.style, &list.items)
}

fn list_node(style: ListStyle, items: &[ListItem]) -> DisplayNode {
    let tag = match style {
        ListStyle::Ordered => "ol",
        ListStyle::Unordered => "ul",
    };
    let children = items
        .iter()
        .map(|item| {
            let li = DisplayNode::element("li").with_child(DisplayNode::markup(item.content()));
            if item.children().is_empty() {
                li
            } else {
                li.with_child(list_node(style, item.children()))
            }
        })
        .collect();
    DisplayNode::element(tag).with_children(children)
}

fn render_code(code: &CodeData) -> DisplayNode {
    let language = if code.language.is_empty() {
        "plaintext"
    } else {
        code.language.as_str()
    };

    let toolbar = DisplayNode::element("div")
        .with_class("tutorly-code__toolbar")
        .with_child(
            DisplayNode::element("span")
                .with_class("tutorly-code__language")
                .with_child(DisplayNode::text(language)),
        )
        .with_child(
            DisplayNode::element("button")
                .with_class("tutorly-copy")
                .with_attr("type", "button")
                .with_attr("data-copy", &code.code)
                .with_child(DisplayNode::text("Copy")),
        );

    let pre = DisplayNode::element("pre").with_child(
        DisplayNode::element("code")
            .with_class(&format!("language-{}", language))
            .with_child(DisplayNode::text(&code.code)),
    );

    let mut node = DisplayNode::element("figure")
        .with_class("tutorly-code")
        .with_attr("data-language", language)
        .with_child(toolbar)
        .with_child(pre);
    if !code.caption.is_empty() {
        node = node.with_child(figcaption(&code.caption));
    }
    node
}

fn render_image(image: &ImageData) -> DisplayNode {
    let src = image.source_url();
    if src.is_empty() {
        return DisplayNode::comment("image without a source");
    }

    let alt = if image.alt.is_empty() {
        &image.caption
    } else {
        &image.alt
    };
    let mut node = DisplayNode::element("figure")
        .with_class("tutorly-image")
        .with_child(DisplayNode::element("img").with_attr("src", src).with_attr("alt", alt));
    if !image.caption.is_empty() {
        node = node.with_child(figcaption(&image.caption));
    }
    node
}

fn render_video(video: &VideoData) -> DisplayNode {
    if video.url.trim().is_empty() {
        return DisplayNode::comment("video without a source");
    }

    let mut node = DisplayNode::element("figure").with_class("tutorly-video").with_child(
        DisplayNode::element("div")
            .with_class("tutorly-video__frame")
            .with_child(video_frame(&video.url, &video.caption)),
    );
    if !video.caption.is_empty() {
        node = node.with_child(figcaption(&video.caption));
    }
    node
}

/// Responsive iframe for a video page or file URL
pub(crate) fn video_frame(url: &str, title: &str) -> DisplayNode {
    let title = if title.is_empty() { "Video" } else { title };
    DisplayNode::element("iframe")
        .with_attr("src", embed_url(url))
        .with_attr("title", title)
        .with_attr("allowfullscreen", "true")
        .with_attr("loading", "lazy")
}

fn render_table(table: &TableData) -> DisplayNode {
    let mut node = DisplayNode::element("table").with_class("tutorly-table");
    let mut rows = table.content.iter();

    if table.with_headings {
        if let Some(first) = rows.next() {
            let cells = first
                .iter()
                .map(|cell| DisplayNode::element("th").with_child(DisplayNode::markup(cell)))
                .collect();
            node = node.with_child(
                DisplayNode::element("thead")
                    .with_child(DisplayNode::element("tr").with_children(cells)),
            );
        }
    }

    let body = rows
        .map(|row| {
            let cells = row
                .iter()
                .map(|cell| DisplayNode::element("td").with_child(DisplayNode::markup(cell)))
                .collect();
            DisplayNode::element("tr").with_children(cells)
        })
        .collect();
    node.with_child(DisplayNode::element("tbody").with_children(body))
}

fn render_embed(embed: &EmbedData) -> DisplayNode {
    let src = if embed.embed.is_empty() {
        &embed.source
    } else {
        &embed.embed
    };
    if src.trim().is_empty() {
        return DisplayNode::comment("embed without a source");
    }

    let mut node = DisplayNode::element("figure")
        .with_class("tutorly-embed")
        .with_attr("data-service", &embed.service);

    // Provider markup goes through as is, only bare URLs get a frame
    if src.trim_start().starts_with('<') {
        node = node.with_child(DisplayNode::markup(src));
        if !embed.caption.is_empty() {
            node = node.with_child(figcaption(&embed.caption));
        }
        return node;
    }

    let mut frame = DisplayNode::element("iframe")
        .with_attr("src", src)
        .with_attr("allowfullscreen", "true");
    if let Some(width) = embed.width {
        frame = frame.with_attr("width", width.to_string());
    }
    if let Some(height) = embed.height {
        frame = frame.with_attr("height", height.to_string());
    }

    node = node.with_child(frame);
    if !embed.caption.is_empty() {
        node = node.with_child(figcaption(&embed.caption));
    }
    node
}

fn render_quiz(quiz: &QuizData, id: &str) -> DisplayNode {
    DisplayNode::Quiz {
        id: id.to_string(),
        question: quiz.question.clone(),
        options: quiz.options.clone(),
        correct_answer: quiz.correct_answer,
        explanation: (!quiz.explanation.is_empty()).then(|| quiz.explanation.clone()),
    }
}

fn figcaption(text: &str) -> DisplayNode {
    DisplayNode::element("figcaption").with_child(DisplayNode::text(text))
}
