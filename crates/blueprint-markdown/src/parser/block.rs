//! Line-oriented block parsing.

use super::inline::parse_inlines;
use super::nesting_guard;
use crate::ast::Block;
use crate::error::MarkdownError;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet(u8),
    Ordered(u8),
}

#[derive(Debug, Clone, Copy)]
struct ListMarker {
    kind: ListKind,
    /// Byte offset where item content starts.
    content_offset: usize,
    /// Leading spaces before the marker.
    indent: usize,
    number: u64,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    ch: char,
    len: usize,
    indent: usize,
}

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^( *)([-+*]|[0-9]{1,9}[.)])( +|$)").expect("list marker regex must compile")
    })
}

fn html_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:<!--|</?[A-Za-z][A-Za-z0-9-]*(?:\s|/?>|$))")
            .expect("html block regex must compile")
    })
}

fn table_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?$")
            .expect("table separator regex must compile")
    })
}

pub(super) fn parse_blocks(lines: &[&str], depth: usize) -> Result<Vec<Block>, MarkdownError> {
    nesting_guard(depth)?;
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        if let Some(fence) = fence_open(line) {
            let (block, next) = parse_fenced_code(lines, i, fence);
            blocks.push(block);
            i = next;
            continue;
        }

        if let Some((level, content)) = atx_heading(trimmed) {
            blocks.push(Block::Heading {
                level,
                content: parse_inlines(content, depth + 1)?,
            });
            i += 1;
            continue;
        }

        if is_rule(trimmed) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if trimmed.starts_with('>') {
            let mut inner = Vec::new();
            while i < lines.len() && lines[i].trim_start().starts_with('>') {
                inner.push(strip_quote_marker(lines[i]));
                i += 1;
            }
            blocks.push(Block::Quote(parse_blocks(&inner, depth + 1)?));
            continue;
        }

        if is_table_start(lines, i) {
            let mut rows = Vec::new();
            while i < lines.len() && !lines[i].trim().is_empty() && lines[i].contains('|') {
                rows.push(lines[i].trim().to_string());
                i += 1;
            }
            blocks.push(Block::Table(rows));
            continue;
        }

        if html_block_re().is_match(trimmed) {
            let mut raw = Vec::new();
            while i < lines.len() && !lines[i].trim().is_empty() {
                raw.push(lines[i]);
                i += 1;
            }
            blocks.push(Block::Raw(raw.join("\n")));
            continue;
        }

        if let Some(marker) = list_marker(line) {
            let (block, next) = parse_list(lines, i, marker, depth)?;
            blocks.push(block);
            i = next;
            continue;
        }

        let start = i;
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() && !interrupts_paragraph(lines[i]) {
            i += 1;
        }
        let text = paragraph_text(&lines[start..i]);
        blocks.push(Block::Paragraph(parse_inlines(&text, depth + 1)?));
    }

    Ok(blocks)
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn strip_indent(line: &str, max: usize) -> &str {
    let n = leading_spaces(line).min(max);
    &line[n..]
}

fn fence_open(line: &str) -> Option<Fence> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    if ch == '`' && rest[len..].contains('`') {
        return None;
    }
    Some(Fence { ch, len, indent })
}

fn is_fence_close(line: &str, fence: Fence) -> bool {
    let trimmed = line.trim();
    let run = trimmed.chars().take_while(|c| *c == fence.ch).count();
    run >= fence.len && run == trimmed.chars().count()
}

fn parse_fenced_code(lines: &[&str], start: usize, fence: Fence) -> (Block, usize) {
    let info = lines[start].trim()[fence.len..].trim().to_string();
    let mut body = Vec::new();
    let mut i = start + 1;
    while i < lines.len() {
        if is_fence_close(lines[i], fence) {
            i += 1;
            break;
        }
        body.push(strip_indent(lines[i], fence.indent));
        i += 1;
    }
    (
        Block::Code {
            info,
            text: body.join("\n"),
        },
        i,
    )
}

fn atx_heading(trimmed: &str) -> Option<(u8, &str)> {
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let mut content = rest.trim();
    // Optional closing sequence.
    let without_hashes = content.trim_end_matches('#');
    if without_hashes.is_empty() {
        content = "";
    } else if without_hashes.ends_with(' ') {
        content = without_hashes.trim_end();
    }
    Some((level as u8, content))
}

fn is_rule(trimmed: &str) -> bool {
    let compact: Vec<char> = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.first() {
        Some(&first) if matches!(first, '-' | '*' | '_') => {
            compact.len() >= 3 && compact.iter().all(|c| *c == first)
        }
        _ => false,
    }
}

fn strip_quote_marker(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('>').unwrap_or(rest);
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn is_table_start(lines: &[&str], i: usize) -> bool {
    let Some(next) = lines.get(i + 1) else {
        return false;
    };
    lines[i].contains('|') && next.contains('-') && table_separator_re().is_match(next.trim())
}

fn list_marker(line: &str) -> Option<ListMarker> {
    let caps = list_marker_re().captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().len());
    if indent > 3 {
        return None;
    }
    let marker = caps.get(2)?.as_str();
    let spacing = caps.get(3).map_or(0, |m| m.as_str().len());
    let full = caps.get(0)?.end();
    // Five or more spaces after the marker belong to the content.
    let content_offset = if spacing > 4 { full - spacing + 1 } else { full };

    let last = marker.as_bytes()[marker.len() - 1];
    let (kind, number) = if marker.len() == 1 && matches!(last, b'-' | b'+' | b'*') {
        (ListKind::Bullet(last), 0)
    } else {
        let number = marker[..marker.len() - 1].parse().unwrap_or(1);
        (ListKind::Ordered(last), number)
    };
    Some(ListMarker {
        kind,
        content_offset,
        indent,
        number,
    })
}

fn starts_other_block(line: &str) -> bool {
    let trimmed = line.trim_start();
    fence_open(line).is_some()
        || atx_heading(trimmed).is_some()
        || is_rule(trimmed)
        || trimmed.starts_with('>')
}

fn interrupts_paragraph(line: &str) -> bool {
    if starts_other_block(line) {
        return true;
    }
    match list_marker(line) {
        // An ordered item interrupts a paragraph only when it starts at 1.
        Some(ListMarker {
            kind: ListKind::Ordered(_),
            number,
            ..
        }) => number == 1,
        Some(_) => true,
        None => false,
    }
}

fn parse_list(
    lines: &[&str],
    start: usize,
    first: ListMarker,
    depth: usize,
) -> Result<(Block, usize), MarkdownError> {
    let mut items = Vec::new();
    let mut i = start;
    let mut marker = first;

    loop {
        let mut item_lines: Vec<&str> = vec![&lines[i][marker.content_offset.min(lines[i].len())..]];
        i += 1;
        let mut last_blank = false;

        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                let continues = lines[i + 1..]
                    .iter()
                    .find(|l| !l.trim().is_empty())
                    .is_some_and(|l| leading_spaces(l) >= marker.content_offset);
                if !continues {
                    break;
                }
                item_lines.push("");
                last_blank = true;
                i += 1;
                continue;
            }
            if leading_spaces(line) >= marker.content_offset {
                item_lines.push(strip_indent(line, marker.content_offset));
                last_blank = false;
                i += 1;
                continue;
            }
            if !last_blank && list_marker(line).is_none() && !starts_other_block(line) {
                // Lazy paragraph continuation.
                item_lines.push(line.trim_start());
                i += 1;
                continue;
            }
            break;
        }

        items.push(parse_blocks(&item_lines, depth + 1)?);

        // Blank lines may separate items of one list.
        let mut j = i;
        while j < lines.len() && lines[j].trim().is_empty() {
            j += 1;
        }
        match lines.get(j).and_then(|l| list_marker(l)) {
            Some(next) if next.kind == first.kind && next.indent < marker.content_offset => {
                marker = next;
                i = j;
            }
            _ => break,
        }
    }

    let block = match first.kind {
        ListKind::Bullet(_) => Block::BulletList(items),
        ListKind::Ordered(_) => Block::OrderedList(items),
    };
    Ok((block, i))
}

fn paragraph_text(lines: &[&str]) -> String {
    let mut text = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            text.push('\n');
        }
        if idx + 1 == lines.len() {
            text.push_str(line.trim());
        } else {
            text.push_str(line.trim_start());
        }
    }
    text
}
