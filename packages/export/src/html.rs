use tracing::debug;
use tutorly_model::{
    Block, BlockData, BlockDocument, CodeData, EmbedData, ImageData, LessonRecord, ListItem,
    ListStyle, QuizData, TableData,
};

/// Print-safe baseline styling for exported lessons
const BASE_CSS: &[&str] = &[
    "body { font-family: Georgia, 'Times New Roman', serif; line-height: 1.6; color: #111; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }",
    "h1, h2, h3, h4, h5, h6 { line-height: 1.25; page-break-after: avoid; }",
    "pre { background: #f5f5f5; padding: 0.75rem; overflow-x: auto; white-space: pre-wrap; word-wrap: break-word; }",
    "code { font-family: Menlo, Consolas, monospace; font-size: 0.9em; }",
    "img, iframe { max-width: 100%; }",
    "figure { margin: 1.5rem 0; text-align: center; }",
    "blockquote { border-left: 3px solid #ccc; margin: 1rem 0; padding-left: 1rem; color: #444; }",
    "table { border-collapse: collapse; width: 100%; }",
    "th, td { border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }",
    ".meta { color: #555; font-size: 0.9em; }",
    ".meta dt { font-weight: bold; display: inline; }",
    ".meta dd { display: inline; margin: 0 1rem 0 0.25rem; }",
    ".delimiter { text-align: center; letter-spacing: 0.5em; margin: 2rem 0; }",
    ".caption { color: #555; font-size: 0.9em; }",
    ".quiz .correct { font-weight: bold; }",
    "@media print { body { margin: 0; max-width: none; } pre, figure, table, .quiz { page-break-inside: avoid; } iframe { display: none; } }",
];

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Include the baseline stylesheet
    pub include_styles: bool,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            include_styles: true,
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Export a lesson as a standalone HTML document
pub fn to_html(lesson: &LessonRecord) -> String {
    to_html_with_options(lesson, HtmlOptions::default())
}

pub fn to_html_with_options(lesson: &LessonRecord, options: HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    let title = if lesson.title.is_empty() {
        "Untitled lesson"
    } else {
        lesson.title.as_str()
    };

    open_document(title, &mut ctx);

    ctx.add_line("<header>");
    ctx.indent();
    ctx.add_line(&format!("<h1>{}</h1>", escape_html(title)));
    ctx.add_line("<dl class=\"meta\">");
    ctx.indent();
    ctx.add_line(&format!("<dt>Duration</dt><dd>{} minutes</dd>", lesson.duration));
    ctx.add_line(&format!("<dt>Order</dt><dd>{}</dd>", lesson.order));
    ctx.add_line(&format!("<dt>Status</dt><dd>{}</dd>", lesson.status_label()));
    ctx.dedent();
    ctx.add_line("</dl>");
    ctx.dedent();
    ctx.add_line("</header>");

    compile_blocks(&lesson.content, &mut ctx);
    close_document(&mut ctx);

    debug!(lesson = %lesson.id, blocks = lesson.content.len(), "Exported lesson as HTML");
    ctx.get_output()
}

/// Export bare content as a standalone HTML document, without lesson
/// metadata
pub fn blocks_to_html(document: &BlockDocument) -> String {
    let mut ctx = Context::new(HtmlOptions::default());
    open_document("Lesson", &mut ctx);
    compile_blocks(document, &mut ctx);
    close_document(&mut ctx);
    ctx.get_output()
}

fn open_document(title: &str, ctx: &mut Context) {
    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html lang=\"en\">");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));
    if ctx.options.include_styles {
        ctx.add_line("<style>");
        ctx.indent();
        for rule in BASE_CSS {
            ctx.add_line(rule);
        }
        ctx.dedent();
        ctx.add_line("</style>");
    }
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_line("<article class=\"lesson\">");
    ctx.indent();
}

fn close_document(ctx: &mut Context) {
    ctx.dedent();
    ctx.add_line("</article>");
    ctx.dedent();
    ctx.add_line("</body>");
    ctx.dedent();
    ctx.add_line("</html>");
}

fn compile_blocks(document: &BlockDocument, ctx: &mut Context) {
    for block in &document.blocks {
        compile_block(block, ctx);
    }
}

fn compile_block(block: &Block, ctx: &mut Context) {
    match &block.data {
        BlockData::Paragraph(p) => ctx.add_line(&format!("<p>{}</p>", p.text)),

        BlockData::Header(h) => {
            let level = h.clamped_level();
            ctx.add_line(&format!("<h{}>{}</h{}>", level, h.text, level));
        }

        BlockData::List(list) => compile_list(list.style, &list.items, ctx),

        BlockData::Code(code) => compile_code(code, ctx),

        BlockData::Quote(quote) => {
            ctx.add_line("<blockquote>");
            ctx.indent();
            ctx.add_line(&format!("<p>{}</p>", quote.text));
            if !quote.caption.is_empty() {
                ctx.add_line(&format!("<cite>{}</cite>", escape_html(&quote.caption)));
            }
            ctx.dedent();
            ctx.add_line("</blockquote>");
        }

        BlockData::Image(image) => compile_image(image, ctx),

        BlockData::Video(video) => {
            ctx.add_line("<figure class=\"video\">");
            ctx.indent();
            ctx.add_line(&format!(
                "<iframe src=\"{}\" title=\"{}\" allowfullscreen></iframe>",
                escape_html(&video.url),
                escape_html(if video.caption.is_empty() { "Video" } else { &video.caption })
            ));
            if !video.caption.is_empty() {
                ctx.add_line(&format!("<figcaption>{}</figcaption>", escape_html(&video.caption)));
            }
            ctx.dedent();
            ctx.add_line("</figure>");
        }

        BlockData::Table(table) => compile_table(table, ctx),

        BlockData::Delimiter(_) => ctx.add_line("<div class=\"delimiter\">* * *</div>"),

        BlockData::Embed(embed) => compile_embed(embed, ctx),

        BlockData::Quiz(quiz) => compile_quiz(quiz, ctx),

        BlockData::Text(text) => {
            ctx.add_line(&format!("<p>{}</p>", text.text.replace('\n', "<br>")));
        }

        BlockData::Unknown { kind, .. } => {
            ctx.add_line(&format!(
                "<!-- unknown block type: {} -->",
                escape_html(kind).replace("--", "- -")
            ));
        }
    }
}

fn compile_list(style: ListStyle, items: &[ListItem], ctx: &mut Context) {
    let tag = match style {
        ListStyle::Ordered => "ol",
        ListStyle::Unordered => "ul",
    };

    ctx.add_line(&format!("<{}>", tag));
    ctx.indent();
    for item in items {
        if item.children().is_empty() {
            ctx.add_line(&format!("<li>{}</li>", item.content()));
        } else {
            ctx.add_line(&format!("<li>{}", item.content()));
            ctx.indent();
            compile_list(style, item.children(), ctx);
            ctx.dedent();
            ctx.add_line("</li>");
        }
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
}

fn compile_code(code: &CodeData, ctx: &mut Context) {
    let class = if code.language.is_empty() {
        String::new()
    } else {
        format!(" class=\"language-{}\"", escape_html(&code.language))
    };

    // Indentation inside <pre> is significant, so the block goes out as
    // one unindented chunk
    ctx.add_line(&format!(
        "<pre><code{}>{}</code></pre>",
        class,
        escape_html(&code.code)
    ));
    if !code.caption.is_empty() {
        ctx.add_line(&format!("<p class=\"caption\">{}</p>", escape_html(&code.caption)));
    }
}

fn compile_image(image: &ImageData, ctx: &mut Context) {
    ctx.add_line("<figure>");
    ctx.indent();
    ctx.add_line(&format!(
        "<img src=\"{}\" alt=\"{}\">",
        escape_html(image.source_url()),
        escape_html(&image.alt)
    ));
    if !image.caption.is_empty() {
        ctx.add_line(&format!("<figcaption>{}</figcaption>", escape_html(&image.caption)));
    }
    ctx.dedent();
    ctx.add_line("</figure>");
}

fn compile_table(table: &TableData, ctx: &mut Context) {
    ctx.add_line("<table>");
    ctx.indent();
    for (i, row) in table.content.iter().enumerate() {
        let cell = if i == 0 { "th" } else { "td" };
        let cells: String = row
            .iter()
            .map(|value| format!("<{}>{}</{}>", cell, value, cell))
            .collect();
        ctx.add_line(&format!("<tr>{}</tr>", cells));
    }
    ctx.dedent();
    ctx.add_line("</table>");
}

fn compile_embed(embed: &EmbedData, ctx: &mut Context) {
    let markup = embed.embed.trim();

    ctx.add_line("<figure class=\"embed\">");
    ctx.indent();
    if markup.starts_with('<') {
        ctx.add_line(markup);
    } else {
        let src = if markup.is_empty() { embed.source.as_str() } else { markup };
        let mut attrs = format!("src=\"{}\"", escape_html(src));
        if let Some(width) = embed.width {
            attrs.push_str(&format!(" width=\"{}\"", width));
        }
        if let Some(height) = embed.height {
            attrs.push_str(&format!(" height=\"{}\"", height));
        }
        ctx.add_line(&format!("<iframe {} allowfullscreen></iframe>", attrs));
    }
    if !embed.caption.is_empty() {
        ctx.add_line(&format!("<figcaption>{}</figcaption>", escape_html(&embed.caption)));
    }
    ctx.dedent();
    ctx.add_line("</figure>");
}

fn compile_quiz(quiz: &QuizData, ctx: &mut Context) {
    ctx.add_line("<div class=\"quiz\">");
    ctx.indent();
    ctx.add_line(&format!("<p class=\"question\">{}</p>", escape_html(&quiz.question)));
    ctx.add_line("<ol type=\"a\">");
    ctx.indent();
    for (i, option) in quiz.options.iter().enumerate() {
        if i == quiz.correct_answer {
            ctx.add_line(&format!(
                "<li class=\"correct\">{} <em>(correct)</em></li>",
                escape_html(option)
            ));
        } else {
            ctx.add_line(&format!("<li>{}</li>", escape_html(option)));
        }
    }
    ctx.dedent();
    ctx.add_line("</ol>");
    if !quiz.explanation.is_empty() {
        ctx.add_line(&format!("<p class=\"explanation\">{}</p>", escape_html(&quiz.explanation)));
    }
    ctx.dedent();
    ctx.add_line("</div>");
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
