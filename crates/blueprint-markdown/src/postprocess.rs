//! Text-span postprocessing: special-character escaping and citation brackets.
//!
//! Applied to text spans only. Code and math never pass through here.

/// Where a text span ends up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextContext {
    /// Running prose: `#`, `%`, `_` and `^` are escaped.
    Prose,
    /// Link targets and similar: only `#` and `%` are escaped.
    Url,
}

/// Escape special characters, skipping any already preceded by a backslash
/// so that escaping an escaped string is a no-op.
pub fn escape_text(text: &str, ctx: TextContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        let special = match c {
            '#' | '%' => true,
            '_' | '^' => ctx == TextContext::Prose,
            _ => false,
        };
        if special && prev != Some('\\') {
            out.push('\\');
            out.push(c);
            if c == '^' {
                out.push_str("{}");
            }
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Rewrite `[key]` groups to `\cite{key}`.
///
/// Scans left to right for the nearest closing bracket. A group is left alone
/// when it is empty, spans a line, contains another `[`, or sits next to
/// another bracket group or a `(` (link syntax).
pub fn cite_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(open) = rest.find('[') {
        let before = &rest[..open];
        out.push_str(before);
        let last = before.chars().next_back().or(prev);
        let after_open = &rest[open + 1..];

        let group = after_open.find(']').and_then(|close| {
            let key = &after_open[..close];
            let next = after_open[close + 1..].chars().next();
            let plain = !key.is_empty() && !key.contains(['[', '\n']);
            let linked = matches!(next, Some('(' | '['));
            let escaped = last == Some('\\');
            (plain && !linked && !escaped && last != Some(']')).then_some((key, close))
        });

        match group {
            Some((key, close)) => {
                out.push_str("\\cite{");
                out.push_str(&unescape_key(key.trim()));
                out.push('}');
                prev = Some(']');
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('[');
                prev = Some('[');
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}

fn unescape_key(key: &str) -> String {
    key.replace("\\_", "_")
        .replace("\\#", "#")
        .replace("\\%", "%")
        .replace("\\^{}", "^")
}

/// Both passes in order: escape, then (optionally) citation brackets.
pub fn postprocess(text: &str, ctx: TextContext, cite: bool) -> String {
    let escaped = escape_text(text, ctx);
    if cite && ctx == TextContext::Prose {
        cite_brackets(&escaped)
    } else {
        escaped
    }
}
