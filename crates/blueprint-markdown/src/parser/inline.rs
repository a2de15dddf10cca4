//! Inline span parsing.

use super::nesting_guard;
use crate::ast::Inline;
use crate::error::MarkdownError;
use regex::Regex;
use std::sync::OnceLock;

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
            .expect("entity regex must compile")
    })
}

fn autolink_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<([A-Za-z][A-Za-z0-9+.-]{1,31}:[^<>\s]*)>").expect("autolink regex must compile")
    })
}

/// Parse inline spans of one block's text.
pub fn parse_inlines(src: &str, depth: usize) -> Result<Vec<Inline>, MarkdownError> {
    nesting_guard(depth)?;
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => match bytes.get(i + 1) {
                Some(b'\n') => {
                    flush(&mut text, &mut out);
                    out.push(Inline::LineBreak);
                    i += 2;
                    continue;
                }
                Some(next) if next.is_ascii_punctuation() => {
                    text.push(*next as char);
                    i += 2;
                    continue;
                }
                _ => {}
            },
            b'\n' => {
                if text.ends_with("  ") {
                    text.truncate(text.trim_end_matches(' ').len());
                    flush(&mut text, &mut out);
                    out.push(Inline::LineBreak);
                } else {
                    text.truncate(text.trim_end_matches(' ').len());
                    text.push('\n');
                }
                i += 1;
                continue;
            }
            b'`' => {
                if let Some((code, end)) = code_span(src, i) {
                    flush(&mut text, &mut out);
                    out.push(Inline::Code(code));
                    i = end;
                } else {
                    let run = run_length(bytes, i, b'`');
                    text.push_str(&src[i..i + run]);
                    i += run;
                }
                continue;
            }
            b'$' => {
                if let Some((span, end)) = math_span(src, i) {
                    flush(&mut text, &mut out);
                    out.push(span);
                    i = end;
                    continue;
                }
            }
            b'!' if bytes.get(i + 1) == Some(&b'[') => {
                if let Some((label, href, end)) = link_parts(src, i + 1) {
                    flush(&mut text, &mut out);
                    let alt = Inline::plain_text(&parse_inlines(label, depth + 1)?);
                    out.push(Inline::Image {
                        src: href.to_string(),
                        alt,
                    });
                    i = end;
                    continue;
                }
            }
            b'[' => {
                if bytes.get(i + 1) == Some(&b'[')
                    && let Some((target, label, end)) = wiki_link(src, i)
                {
                    flush(&mut text, &mut out);
                    out.push(Inline::WikiLink { target, label });
                    i = end;
                    continue;
                }
                if let Some((label, href, end)) = link_parts(src, i) {
                    flush(&mut text, &mut out);
                    out.push(Inline::Link {
                        href: href.to_string(),
                        content: parse_inlines(label, depth + 1)?,
                    });
                    i = end;
                    continue;
                }
            }
            b'<' => {
                if let Some(caps) = autolink_re().captures(&src[i..]) {
                    let href = caps[1].to_string();
                    flush(&mut text, &mut out);
                    out.push(Inline::Link {
                        content: vec![Inline::Text(href.clone())],
                        href,
                    });
                    i += caps[0].len();
                    continue;
                }
            }
            b'&' => {
                if let Some(found) = entity_re().find(&src[i..]) {
                    flush(&mut text, &mut out);
                    out.push(Inline::Entity(found.as_str().to_string()));
                    i += found.end();
                    continue;
                }
            }
            b'~' if bytes.get(i + 1) == Some(&b'~') => {
                if let Some(close) = find_closing(src, i + 2, b'~', 2) {
                    flush(&mut text, &mut out);
                    out.push(Inline::Strikethrough(parse_inlines(
                        &src[i + 2..close],
                        depth + 1,
                    )?));
                    i = close + 2;
                    continue;
                }
            }
            delim @ (b'*' | b'_') => {
                if let Some((span, end)) = emphasis(src, i, delim, depth)? {
                    flush(&mut text, &mut out);
                    out.push(span);
                    i = end;
                    continue;
                }
                let run = run_length(bytes, i, delim);
                text.push_str(&src[i..i + run]);
                i += run;
                continue;
            }
            _ => {}
        }

        let Some(ch) = src[i..].chars().next() else {
            break;
        };
        text.push(ch);
        i += ch.len_utf8();
    }

    flush(&mut text, &mut out);
    Ok(out)
}

fn flush(text: &mut String, out: &mut Vec<Inline>) {
    if !text.is_empty() {
        out.push(Inline::Text(std::mem::take(text)));
    }
}

fn run_length(bytes: &[u8], start: usize, b: u8) -> usize {
    bytes[start..].iter().take_while(|c| **c == b).count()
}

fn char_before(src: &str, idx: usize) -> Option<char> {
    src[..idx].chars().next_back()
}

fn char_at(src: &str, idx: usize) -> Option<char> {
    src.get(idx..).and_then(|rest| rest.chars().next())
}

/// A code span opened by the backtick run at `start`.
fn code_span(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let open = run_length(bytes, start, b'`');
    let mut j = start + open;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let run = run_length(bytes, j, b'`');
            if run == open {
                let raw = src[start + open..j].replace('\n', " ");
                let content = if raw.len() >= 2
                    && raw.starts_with(' ')
                    && raw.ends_with(' ')
                    && !raw.trim().is_empty()
                {
                    raw[1..raw.len() - 1].to_string()
                } else {
                    raw
                };
                return Some((content, j + run));
            }
            j += run;
        } else {
            j += 1;
        }
    }
    None
}

/// A `$...$` or `$$...$$` span starting at `start`. Backslash escapes are
/// not processed inside math.
fn math_span(src: &str, start: usize) -> Option<(Inline, usize)> {
    let bytes = src.as_bytes();
    if bytes.get(start + 1) == Some(&b'$') {
        let body = start + 2;
        let mut j = body;
        while j + 1 < bytes.len() {
            match bytes[j] {
                b'\\' => j += 2,
                b'$' if bytes[j + 1] == b'$' => {
                    if j == body {
                        return None;
                    }
                    return Some((Inline::DisplayMath(src[body..j].to_string()), j + 2));
                }
                _ => j += 1,
            }
        }
        return None;
    }

    let body = start + 1;
    if char_at(src, body).is_none_or(char::is_whitespace) {
        return None;
    }
    let mut j = body;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'$' => {
                let closes = char_before(src, j).is_some_and(|c| !c.is_whitespace())
                    && !char_at(src, j + 1).is_some_and(|c| c.is_ascii_digit());
                if closes {
                    return Some((Inline::Math(src[body..j].to_string()), j + 1));
                }
                j += 1;
            }
            _ => j += 1,
        }
    }
    None
}

/// `[label](href "title")` starting at the `[` at `start`.
fn link_parts(src: &str, start: usize) -> Option<(&str, &str, usize)> {
    let bytes = src.as_bytes();
    let close = matching_bracket(src, start)?;
    if bytes.get(close + 1) != Some(&b'(') {
        return None;
    }
    let dest_start = close + 2;
    let mut depth = 0usize;
    let mut j = dest_start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 1,
            b'(' => depth += 1,
            b')' if depth == 0 => break,
            b')' => depth -= 1,
            b'\n' => return None,
            _ => {}
        }
        j += 1;
    }
    if j >= bytes.len() {
        return None;
    }
    let inner = src[dest_start..j].trim();
    let href = match inner.find(|c: char| c.is_whitespace()) {
        Some(space) => &inner[..space],
        None => inner,
    };
    let href = href
        .strip_prefix('<')
        .and_then(|h| h.strip_suffix('>'))
        .unwrap_or(href);
    Some((&src[start + 1..close], href, j + 1))
}

/// Index of the `]` matching the `[` at `start`, skipping code spans and escapes.
fn matching_bracket(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 1,
            b'`' => {
                if let Some((_, end)) = code_span(src, j) {
                    j = end;
                    continue;
                }
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// `[[target]]` or `[[target|label]]` at `start`.
fn wiki_link(src: &str, start: usize) -> Option<(String, Option<String>, usize)> {
    let body = start + 2;
    let end = body + src[body..].find("]]")?;
    let inner = &src[body..end];
    if inner.is_empty() || inner.contains(['[', ']', '\n']) {
        return None;
    }
    let (target, label) = match inner.split_once('|') {
        Some((target, label)) => (target.trim(), Some(label.trim().to_string())),
        None => (inner.trim(), None),
    };
    if target.is_empty() {
        return None;
    }
    Some((target.to_string(), label, end + 2))
}

/// Find a closing run of exactly `len` copies of `delim` at or after `from`.
///
/// Code spans, math, and escapes are skipped. The closer must follow a
/// non-space character; an underscore closer must not be followed by an
/// alphanumeric character.
fn find_closing(src: &str, from: usize, delim: u8, len: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => {
                j += 2;
                continue;
            }
            b'`' => {
                if let Some((_, end)) = code_span(src, j) {
                    j = end;
                    continue;
                }
            }
            b'$' => {
                if let Some((_, end)) = math_span(src, j) {
                    j = end;
                    continue;
                }
            }
            b if b == delim => {
                let run = run_length(bytes, j, delim);
                let usable = if len == 1 { run == 1 } else { run >= len };
                if usable && j > from {
                    let after_ok = delim != b'_'
                        || !char_at(src, j + len).is_some_and(char::is_alphanumeric);
                    let before_ok = char_before(src, j).is_some_and(|c| !c.is_whitespace());
                    if after_ok && before_ok {
                        return Some(j);
                    }
                }
                j += run;
                continue;
            }
            _ => {}
        }
        j += 1;
    }
    None
}

/// Emphasis, strong, or underline opened by the delimiter run at `start`.
///
/// `*x*` and `_x_` are emphasis, `**x**` is strong, `__x__` is underline.
fn emphasis(
    src: &str,
    start: usize,
    delim: u8,
    depth: usize,
) -> Result<Option<(Inline, usize)>, MarkdownError> {
    let bytes = src.as_bytes();
    let run = run_length(bytes, start, delim);
    if delim == b'_' && char_before(src, start).is_some_and(char::is_alphanumeric) {
        return Ok(None);
    }

    for len in [2usize, 1] {
        if run < len {
            continue;
        }
        let body = start + len;
        if char_at(src, body).is_none_or(char::is_whitespace) {
            continue;
        }
        let Some(close) = find_closing(src, body, delim, len) else {
            continue;
        };
        let inner = parse_inlines(&src[body..close], depth + 1)?;
        let span = match (delim, len) {
            (b'*', 2) => Inline::Strong(inner),
            (b'_', 2) => Inline::Underline(inner),
            _ => Inline::Emphasis(inner),
        };
        return Ok(Some((span, close + len)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Inline> {
        parse_inlines(src, 0).expect("inline parse must succeed")
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn emphasis_strong_underline_and_strike() {
        assert_eq!(
            parse("*a* **b** __c__ ~~d~~"),
            vec![
                Inline::Emphasis(vec![text("a")]),
                text(" "),
                Inline::Strong(vec![text("b")]),
                text(" "),
                Inline::Underline(vec![text("c")]),
                text(" "),
                Inline::Strikethrough(vec![text("d")]),
            ]
        );
    }

    #[test]
    fn intraword_underscores_stay_literal() {
        assert_eq!(parse("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn nested_emphasis_inside_strong() {
        assert_eq!(
            parse("**bold *and* more**"),
            vec![Inline::Strong(vec![
                text("bold "),
                Inline::Emphasis(vec![text("and")]),
                text(" more"),
            ])]
        );
    }

    #[test]
    fn code_spans_protect_their_content() {
        assert_eq!(
            parse("use `Nat.add_comm` here"),
            vec![text("use "), Inline::Code("Nat.add_comm".into()), text(" here")]
        );
        assert_eq!(parse("`` a`b ``"), vec![Inline::Code("a`b".into())]);
        assert_eq!(parse("unclosed `tick"), vec![text("unclosed `tick")]);
    }

    #[test]
    fn inline_and_display_math() {
        assert_eq!(
            parse("let $x_1$ and $$\\sum_i a_i$$"),
            vec![
                text("let "),
                Inline::Math("x_1".into()),
                text(" and "),
                Inline::DisplayMath("\\sum_i a_i".into()),
            ]
        );
    }

    #[test]
    fn prices_are_not_math() {
        assert_eq!(parse("costs $5 or $ 6"), vec![text("costs $5 or $ 6")]);
    }

    #[test]
    fn links_images_and_bare_brackets() {
        assert_eq!(
            parse("[text](http://a.b/c \"t\") ![pic](img.png) [abc]"),
            vec![
                Inline::Link {
                    href: "http://a.b/c".into(),
                    content: vec![text("text")]
                },
                text(" "),
                Inline::Image {
                    src: "img.png".into(),
                    alt: "pic".into()
                },
                text(" [abc]"),
            ]
        );
    }

    #[test]
    fn wiki_links_autolinks_and_entities() {
        assert_eq!(
            parse("[[Foo.bar|the lemma]] <https://x.y> &amp; &#169;"),
            vec![
                Inline::WikiLink {
                    target: "Foo.bar".into(),
                    label: Some("the lemma".into())
                },
                text(" "),
                Inline::Link {
                    href: "https://x.y".into(),
                    content: vec![text("https://x.y")]
                },
                text(" "),
                Inline::Entity("&amp;".into()),
                text(" "),
                Inline::Entity("&#169;".into()),
            ]
        );
    }

    #[test]
    fn hard_and_soft_breaks() {
        assert_eq!(
            parse("one  \ntwo\nthree\\\nfour"),
            vec![
                text("one"),
                Inline::LineBreak,
                text("two\nthree"),
                Inline::LineBreak,
                text("four"),
            ]
        );
    }

    #[test]
    fn backslash_escapes_punctuation_but_keeps_commands() {
        assert_eq!(parse("\\*not\\* \\ref{x}"), vec![text("*not* \\ref{x}")]);
    }

    #[test]
    fn raw_markup_is_literal() {
        assert_eq!(parse("<b>hi</b>"), vec![text("<b>hi</b>")]);
    }
}
