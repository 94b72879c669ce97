//! Inline markup to rich text.
//!
//! Decoding is a single left-to-right scan. Tokens are tried in priority order
//! (escapes, mention tags, line breaks, equations, code spans, links, then the
//! annotation wrappers); anything that does not close properly stays literal.

use crate::model::{DateMention, InlineContent, Mention, RichText, TextRun, TextStyle};
use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static MENTION_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<notion-(user|page|database|date)((?:\s+[a-z_]+="[^"]*")*)\s*>"#).unwrap()
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"([a-z_]+)="([^"]*)""#).unwrap());

static SPAN_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^<span color="([^"]*)">"#).unwrap());

/// Decode inline markup into rich text. Never fails.
pub fn decode_inline(markup: &str) -> RichText {
    let mut spans = Vec::new();
    decode_into(markup, &TextStyle::default(), None, &mut spans);
    RichText(spans).normalized()
}

fn decode_into(s: &str, style: &TextStyle, link: Option<&str>, out: &mut Vec<InlineContent>) {
    let mut buf = String::new();
    let mut i = 0;

    while let Some(c) = s[i..].chars().next() {
        let rest = &s[i..];
        match c {
            '\\' => {
                if let Some(next) = rest[1..].chars().next() {
                    if is_escapable(next) {
                        buf.push(next);
                        i += 1 + next.len_utf8();
                        continue;
                    }
                }
            }
            '<' => {
                if rest.starts_with("<br>") {
                    buf.push('\n');
                    i += 4;
                    continue;
                }
                if let Some((mention, len)) = parse_mention(rest) {
                    flush(&mut buf, style, link, out);
                    out.push(InlineContent::Mention(mention));
                    i += len;
                    continue;
                }
                if rest.starts_with("<u>") {
                    if let Some(end) = find_closer(rest, 3, "</u>") {
                        flush(&mut buf, style, link, out);
                        let inner = TextStyle {
                            underline: true,
                            ..style.clone()
                        };
                        decode_into(&rest[3..end], &inner, link, out);
                        i += end + "</u>".len();
                        continue;
                    }
                }
                if let Some(caps) = SPAN_OPEN.captures(rest) {
                    let open = caps[0].len();
                    if let Some(end) = find_closer(rest, open, "</span>") {
                        flush(&mut buf, style, link, out);
                        let inner = TextStyle {
                            color: Some(decode_html_entities(&caps[1]).into_owned()),
                            ..style.clone()
                        };
                        decode_into(&rest[open..end], &inner, link, out);
                        i += end + "</span>".len();
                        continue;
                    }
                }
            }
            '$' => {
                if let Some((expression, len)) = parse_equation(rest) {
                    flush(&mut buf, style, link, out);
                    out.push(InlineContent::Mention(Mention::Equation { expression }));
                    i += len;
                    continue;
                }
            }
            '`' => {
                let fence = run_len(rest.as_bytes(), 0, b'`');
                match parse_code(rest, fence) {
                    Some((content, len)) => {
                        flush(&mut buf, style, link, out);
                        out.push(InlineContent::Text(TextRun {
                            text: content,
                            style: TextStyle {
                                code: true,
                                ..Default::default()
                            },
                            link: link.map(str::to_string),
                        }));
                        i += len;
                    }
                    None => {
                        buf.push_str(&rest[..fence]);
                        i += fence;
                    }
                }
                continue;
            }
            '[' => {
                if let Some((label_end, url, len)) = parse_link(rest) {
                    flush(&mut buf, style, link, out);
                    decode_into(&rest[1..label_end], style, Some(url.as_str()), out);
                    i += len;
                    continue;
                }
            }
            '~' if rest.starts_with("~~") => {
                if let Some(end) = find_closer(rest, 2, "~~") {
                    flush(&mut buf, style, link, out);
                    let inner = TextStyle {
                        strikethrough: true,
                        ..style.clone()
                    };
                    decode_into(&rest[2..end], &inner, link, out);
                    i += end + 2;
                    continue;
                }
            }
            '*' => {
                let n = run_len(rest.as_bytes(), 0, b'*');
                if n <= 3 {
                    if let Some(end) = find_star_closer(rest, n) {
                        flush(&mut buf, style, link, out);
                        let inner = TextStyle {
                            bold: style.bold || n >= 2,
                            italic: style.italic || n != 2,
                            ..style.clone()
                        };
                        decode_into(&rest[n..end], &inner, link, out);
                        i += end + n;
                        continue;
                    }
                }
                buf.push_str(&rest[..n]);
                i += n;
                continue;
            }
            _ => {}
        }

        buf.push(c);
        i += c.len_utf8();
    }

    flush(&mut buf, style, link, out);
}

fn is_escapable(c: char) -> bool {
    c.is_ascii_punctuation() || c == ' ' || c == '\t'
}

fn flush(buf: &mut String, style: &TextStyle, link: Option<&str>, out: &mut Vec<InlineContent>) {
    if buf.is_empty() {
        return;
    }
    out.push(InlineContent::Text(TextRun {
        text: std::mem::take(buf),
        style: style.clone(),
        link: link.map(str::to_string),
    }));
}

fn run_len(bytes: &[u8], from: usize, needle: u8) -> usize {
    bytes[from..].iter().take_while(|&&b| b == needle).count()
}

/// Skip over a backslash escape or a complete code span starting at `j`.
///
/// Returns the position after the skipped construct, or `None` when nothing
/// needs skipping.
fn skip_opaque(bytes: &[u8], j: usize) -> Option<usize> {
    match bytes[j] {
        b'\\' => match bytes.get(j + 1) {
            Some(&b) if b.is_ascii() && is_escapable(b as char) => Some(j + 2),
            _ => Some(j + 1),
        },
        b'`' => {
            let n = run_len(bytes, j, b'`');
            Some(match_code_fence(bytes, j + n, n).unwrap_or(j + n))
        }
        _ => None,
    }
}

/// Position right after the closing fence of exactly `n` backticks.
fn match_code_fence(bytes: &[u8], from: usize, n: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let m = run_len(bytes, j, b'`');
            if m == n {
                return Some(j + m);
            }
            j += m;
        } else {
            j += 1;
        }
    }
    None
}

/// First unescaped occurrence of `pat` at or after `from`, outside code spans.
/// The enclosed content must be non-empty.
fn find_closer(s: &str, from: usize, pat: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut j = from;
    while j < bytes.len() {
        if bytes[j..].starts_with(pat.as_bytes()) {
            return if j > from { Some(j) } else { None };
        }
        match skip_opaque(bytes, j) {
            Some(next) => j = next,
            None => j += 1,
        }
    }
    None
}

/// Closing delimiter for an emphasis opener of `n` stars: the first star run
/// at least `n` long.
fn find_star_closer(s: &str, n: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut j = n;
    while j < bytes.len() {
        if bytes[j] == b'*' {
            let m = run_len(bytes, j, b'*');
            if m >= n {
                return Some(j);
            }
            j += m;
            continue;
        }
        match skip_opaque(bytes, j) {
            Some(next) => j = next,
            None => j += 1,
        }
    }
    None
}

fn parse_code(s: &str, n: usize) -> Option<(String, usize)> {
    let end = match_code_fence(s.as_bytes(), n, n)?;
    let content = &s[n..end - n];
    let content = if content.len() >= 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && !content.trim().is_empty()
    {
        &content[1..content.len() - 1]
    } else {
        content
    };
    Some((content.to_string(), end))
}

fn parse_link(s: &str) -> Option<(usize, String, usize)> {
    let label_end = find_closer(s, 1, "](")?;
    let url_start = label_end + 2;

    let mut url = String::new();
    let mut chars = s[url_start..].char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, next)) if is_escapable(next) => url.push(next),
                Some((_, 'n')) => url.push('\n'),
                Some((_, 'r')) => url.push('\r'),
                Some((_, next)) => {
                    url.push('\\');
                    url.push(next);
                }
                None => url.push('\\'),
            },
            ')' => return Some((label_end, url, url_start + offset + 1)),
            _ => url.push(c),
        }
    }
    None
}

fn parse_equation(s: &str) -> Option<(String, usize)> {
    let mut expression = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => expression.push('\n'),
                Some((_, 'r')) => expression.push('\r'),
                Some((_, next @ ('\\' | '$'))) => expression.push(next),
                Some((_, next)) => {
                    expression.push('\\');
                    expression.push(next);
                }
                None => expression.push('\\'),
            },
            '$' => return Some((expression, offset + 1)),
            _ => expression.push(c),
        }
    }
    None
}

fn parse_mention(s: &str) -> Option<(Mention, usize)> {
    let caps = MENTION_OPEN.captures(s)?;
    let kind = caps.get(1)?.as_str();
    let open = caps.get(0)?.end();

    let attrs: HashMap<&str, String> = caps
        .get(2)
        .map(|m| {
            ATTRIBUTE
                .captures_iter(m.as_str())
                .filter_map(|a| {
                    let name = a.get(1)?.as_str();
                    Some((name, decode_html_entities(a.get(2)?.as_str()).into_owned()))
                })
                .collect()
        })
        .unwrap_or_default();

    let closing = format!("</notion-{}>", kind);
    let close_at = open + s[open..].find(&closing)?;
    let content = decode_html_entities(&s[open..close_at]).into_owned();
    let len = close_at + closing.len();

    let mention = match kind {
        "user" => Mention::User {
            id: attrs.get("id")?.clone(),
            name: if content.is_empty() {
                None
            } else {
                Some(content.strip_prefix('@').unwrap_or(&content).to_string())
            },
        },
        "page" => Mention::Page {
            id: attrs.get("id")?.clone(),
        },
        "database" => Mention::Database {
            id: attrs.get("id")?.clone(),
        },
        _ => Mention::Date(DateMention {
            start: content,
            end: attrs.get("end").cloned(),
            timezone: attrs.get("timezone").cloned(),
        }),
    };

    Some((mention, len))
}
