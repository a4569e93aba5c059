//! Markup output for display trees, used by preview panes and the CLI

use crate::DisplayNode;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "source"];

impl DisplayNode {
    /// Render this tree to an HTML fragment
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }
}

fn write_node(node: &DisplayNode, out: &mut String) {
    match node {
        DisplayNode::Element {
            tag,
            attributes,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attributes {
                out.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }

            for child in children {
                write_node(child, out);
            }
            out.push_str(&format!("</{}>", tag));
        }

        DisplayNode::Text { content } => out.push_str(&escape_html(content)),

        DisplayNode::Markup { html } => out.push_str(html),

        DisplayNode::Comment { content } => {
            out.push_str(&format!("<!-- {} -->", content.replace("--", "- -")));
        }

        DisplayNode::Placeholder { message } => {
            out.push_str(&format!(
                "<div class=\"tutorly-empty\">{}</div>",
                escape_html(message)
            ));
        }

        DisplayNode::Quiz {
            id,
            question,
            options,
            explanation,
            ..
        } => {
            let id = escape_html(id);
            out.push_str(&format!(
                "<form class=\"tutorly-quiz\" data-quiz=\"{}\">",
                id
            ));
            out.push_str(&format!(
                "<fieldset><legend>{}</legend>",
                escape_html(question)
            ));
            for (index, option) in options.iter().enumerate() {
                out.push_str(&format!(
                    "<label><input type=\"radio\" name=\"{}\" value=\"{}\"> {}</label>",
                    id,
                    index,
                    escape_html(option)
                ));
            }
            out.push_str("</fieldset>");
            out.push_str("<button type=\"submit\">Check answer</button>");
            if let Some(explanation) = explanation {
                out.push_str(&format!(
                    "<p class=\"tutorly-quiz__explanation\" hidden>{}</p>",
                    escape_html(explanation)
                ));
            }
            out.push_str("</form>");
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
