//! Rich text to inline markup.

use crate::model::{InlineContent, Mention, RichText, TextRun, TextStyle};
use html_escape::{encode_double_quoted_attribute, encode_text};
use once_cell::sync::Lazy;
use regex::Regex;

static LABEL_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+|[a-z]+)\.( |$)").unwrap());

/// Encode rich text as inline markup.
///
/// Adjacent runs with identical annotations are merged first, so the output
/// never splits a run arbitrarily.
pub fn encode_inline(text: &RichText) -> String {
    let mut output = String::new();
    for span in text.normalized().spans() {
        match span {
            InlineContent::Text(run) => output.push_str(&encode_run(run)),
            InlineContent::Mention(mention) => output.push_str(&encode_mention(mention)),
        }
    }
    output
}

/// Escape characters that the inline decoder would otherwise treat as markup.
///
/// Soft line breaks become `<br>`.
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' | '*' | '`' | '~' | '$' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            '<' => {
                if matches!(chars.peek(), Some(n) if n.is_ascii_alphabetic() || *n == '/' || *n == '!')
                {
                    result.push('\\');
                }
                result.push('<');
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape the start of a prefix-less line so it is not read as a block marker.
pub(crate) fn escape_line_start(line: &str) -> String {
    let Some(first) = line.chars().next() else {
        return String::new();
    };

    if matches!(first, '#' | '-' | '+' | '>' | '|' | '_' | ' ' | '\t') {
        return format!("\\{}", line);
    }

    if let Some(m) = LABEL_LIKE.captures(line).and_then(|c| c.get(1)) {
        let dot = m.end();
        return format!("{}\\{}", &line[..dot], &line[dot..]);
    }

    line.to_string()
}

fn encode_run(run: &TextRun) -> String {
    let style = &run.style;
    let result = if style.code {
        code_span(&run.text)
    } else {
        let mut body = escape_text(&run.text);
        if (style.bold || style.italic) && body.starts_with(' ') {
            body.insert(0, '\\');
        }
        apply_text_style(body, style)
    };

    match &run.link {
        Some(url) => format!("[{}]({})", result, escape_url(url)),
        None => result,
    }
}

fn apply_text_style(text: String, style: &TextStyle) -> String {
    // Innermost first
    let mut result = match (style.bold, style.italic) {
        (true, true) => format!("***{}***", text),
        (true, false) => format!("**{}**", text),
        (false, true) => format!("*{}*", text),
        (false, false) => text,
    };
    if style.strikethrough {
        result = format!("~~{}~~", result);
    }
    if style.underline {
        result = format!("<u>{}</u>", result);
    }
    if let Some(ref color) = style.color {
        result = format!(
            "<span color=\"{}\">{}</span>",
            encode_double_quoted_attribute(color),
            result
        );
    }
    result
}

/// Code span with a fence longer than any backtick run in the content.
fn code_span(text: &str) -> String {
    let body = text.replace('\n', " ");
    let fence = "`".repeat(longest_run(&body, '`') + 1);
    let pad = body.starts_with('`')
        || body.ends_with('`')
        || (body.starts_with(' ') && body.ends_with(' ') && !body.trim().is_empty());

    if pad {
        format!("{} {} {}", fence, body, fence)
    } else {
        format!("{}{}{}", fence, body, fence)
    }
}

pub(crate) fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn escape_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\\' | ')' => {
                result.push('\\');
                result.push(c);
            }
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            _ => result.push(c),
        }
    }
    result
}

fn encode_mention(mention: &Mention) -> String {
    match mention {
        Mention::User { id, name } => format!(
            "<notion-user id=\"{}\">{}</notion-user>",
            encode_attribute(id),
            name.as_deref()
                .map(|n| format!("@{}", encode_tag_text(n)))
                .unwrap_or_default()
        ),
        Mention::Page { id } => format!(
            "<notion-page id=\"{}\"></notion-page>",
            encode_attribute(id)
        ),
        Mention::Database { id } => format!(
            "<notion-database id=\"{}\"></notion-database>",
            encode_attribute(id)
        ),
        Mention::Date(date) => {
            let mut attrs = String::new();
            if let Some(ref end) = date.end {
                attrs.push_str(&format!(" end=\"{}\"", encode_attribute(end)));
            }
            if let Some(ref tz) = date.timezone {
                attrs.push_str(&format!(" timezone=\"{}\"", encode_attribute(tz)));
            }
            format!(
                "<notion-date{}>{}</notion-date>",
                attrs,
                encode_tag_text(&date.start)
            )
        }
        Mention::Equation { expression } => {
            let mut result = String::with_capacity(expression.len() + 2);
            result.push('$');
            for c in expression.chars() {
                match c {
                    '\\' | '$' => {
                        result.push('\\');
                        result.push(c);
                    }
                    '\n' => result.push_str("\\n"),
                    '\r' => result.push_str("\\r"),
                    _ => result.push(c),
                }
            }
            result.push('$');
            result
        }
    }
}

/// Line breaks as character references, so a tag never spans lines.
fn single_line(encoded: &str) -> String {
    encoded.replace('\n', "&#10;").replace('\r', "&#13;")
}

fn encode_attribute(value: &str) -> String {
    single_line(&encode_double_quoted_attribute(value))
}

fn encode_tag_text(value: &str) -> String {
    single_line(&encode_text(value))
}
