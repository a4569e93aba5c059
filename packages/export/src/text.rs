use regex::Regex;
use std::sync::OnceLock;
use tutorly_model::{Block, BlockData, BlockDocument, LessonRecord, ListItem, ListStyle};

/// Underline characters for header levels 1 through 6
const UNDERLINES: [char; 6] = ['=', '-', '~', '^', '+', '*'];

fn line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").unwrap())
}

fn tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Drop markup tags from inline editor text, keeping line breaks
pub fn strip_tags(text: &str) -> String {
    let text = line_break().replace_all(text, "\n");
    let text = tag().replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Plain-text transcript of a lesson: title, metadata, then content
pub fn lesson_to_text(lesson: &LessonRecord) -> String {
    let title = if lesson.title.is_empty() {
        "Untitled lesson"
    } else {
        lesson.title.as_str()
    };

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&underline(title, '='));
    out.push_str("\n\n");
    out.push_str(&format!("Duration: {} minutes\n", lesson.duration));
    out.push_str(&format!("Order: {}\n", lesson.order));
    out.push_str(&format!("Status: {}\n\n", lesson.status_label()));
    out.push_str(&to_text(&lesson.content));
    out
}

/// Plain text for the blocks of a document. Embeds and unknown blocks
/// have no text form and are left out.
pub fn to_text(document: &BlockDocument) -> String {
    document.blocks.iter().map(block_to_text).collect()
}

fn block_to_text(block: &Block) -> String {
    match &block.data {
        BlockData::Paragraph(p) => paragraph(&p.text),

        BlockData::Header(h) => {
            let text = strip_tags(&h.text);
            let ch = UNDERLINES[usize::from(h.clamped_level()) - 1];
            format!("{}\n{}\n\n", text, underline(&text, ch))
        }

        BlockData::List(list) => {
            let mut out = String::new();
            list_lines(list.style, &list.items, 0, &mut out);
            out.push('\n');
            out
        }

        BlockData::Code(code) => format!("```\n{}\n```\n\n", code.code),

        BlockData::Quote(quote) => {
            let mut out: String = strip_tags(&quote.text)
                .lines()
                .map(|line| format!("> {}\n", line))
                .collect();
            if out.is_empty() {
                out.push_str(">\n");
            }
            if !quote.caption.is_empty() {
                out.push_str(&format!("— {}\n", strip_tags(&quote.caption)));
            }
            out.push('\n');
            out
        }

        BlockData::Image(image) => {
            let label = [&image.alt, &image.caption]
                .into_iter()
                .find(|s| !s.is_empty())
                .map(|s| strip_tags(s))
                .unwrap_or_else(|| "Image".to_string());
            format!("[{}]\n\n", label)
        }

        BlockData::Video(video) => {
            let label = if video.caption.is_empty() {
                video.url.clone()
            } else {
                strip_tags(&video.caption)
            };
            format!("[Video: {}]\n\n", label)
        }

        BlockData::Table(table) => {
            let mut out = String::new();
            for (i, row) in table.content.iter().enumerate() {
                let cells: Vec<String> = row.iter().map(|c| strip_tags(c)).collect();
                out.push_str(&cells.join(" | "));
                out.push('\n');
                if i == 0 {
                    out.push_str("---\n");
                }
            }
            out.push('\n');
            out
        }

        BlockData::Delimiter(_) => "* * *\n\n".to_string(),

        BlockData::Embed(_) => String::new(),

        BlockData::Quiz(quiz) => {
            let mut out = format!("Q: {}\n", strip_tags(&quiz.question));
            for (i, option) in quiz.options.iter().enumerate() {
                out.push_str(&format!("  {}) {}\n", option_letter(i), strip_tags(option)));
            }
            if let Some(answer) = quiz.correct_option() {
                out.push_str(&format!(
                    "Answer: {}) {}\n",
                    option_letter(quiz.correct_answer),
                    strip_tags(answer)
                ));
            }
            if !quiz.explanation.is_empty() {
                out.push_str(&format!("Explanation: {}\n", strip_tags(&quiz.explanation)));
            }
            out.push('\n');
            out
        }

        BlockData::Text(text) => paragraph(&text.text),

        BlockData::Unknown { .. } => String::new(),
    }
}

fn paragraph(text: &str) -> String {
    format!("{}\n\n", strip_tags(text))
}

fn list_lines(style: ListStyle, items: &[ListItem], depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    for (i, item) in items.iter().enumerate() {
        let marker = match style {
            ListStyle::Ordered => format!("{}.", i + 1),
            ListStyle::Unordered => "•".to_string(),
        };
        out.push_str(&format!("{}{} {}\n", pad, marker, strip_tags(item.content())));
        list_lines(style, item.children(), depth + 1, out);
    }
}

fn underline(text: &str, ch: char) -> String {
    let width = text.chars().count().max(1);
    std::iter::repeat(ch).take(width).collect()
}

fn option_letter(index: usize) -> char {
    // Past 'z' fall back to '?'
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'a' + i))
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Hi</b> &amp; bye<br/>next"), "Hi & bye\nnext");
        assert_eq!(strip_tags("a &lt;tag&gt;"), "a <tag>");
    }

    #[test]
    fn test_header_underlines_by_level() {
        for (level, ch) in (1..=6).zip(UNDERLINES) {
            let doc = BlockDocument::with_blocks(vec![Block::header("Abc", level)]);
            assert_eq!(to_text(&doc), format!("Abc\n{}{}{}\n\n", ch, ch, ch));
        }
    }

    #[test]
    fn test_header_level_out_of_range() {
        let doc = BlockDocument::with_blocks(vec![Block::header("Deep", 9)]);
        assert_eq!(to_text(&doc), "Deep\n****\n\n");
    }

    #[test]
    fn test_option_letters() {
        assert_eq!(option_letter(0), 'a');
        assert_eq!(option_letter(25), 'z');
        assert_eq!(option_letter(26), '?');
        assert_eq!(option_letter(1000), '?');
    }
}
