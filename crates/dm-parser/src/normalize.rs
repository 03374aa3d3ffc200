//! Canonical comparison form for blocks. Total functions; the block's raw
//! text is never touched.

use dm_core::{Block, BlockKind};

/// Collapse whitespace runs to one space and trim. Case and punctuation
/// are preserved.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip leading and trailing blank lines only. For a fenced block the
/// fence lines are kept (trimmed) and the trimming applies to the body
/// between them, so the info string still counts.
pub fn normalize_code(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    match split_fence(&lines) {
        Some((open, body, close)) => {
            let body = trim_blank_lines(body);
            let mut out = Vec::with_capacity(body.len() + 2);
            out.push(open);
            out.extend_from_slice(body);
            out.push(close);
            out.join("\n")
        }
        None => trim_blank_lines(&lines).join("\n"),
    }
}

pub fn normalize(kind: BlockKind, raw: &str) -> String {
    match kind {
        BlockKind::Code => normalize_code(raw),
        BlockKind::Heading | BlockKind::Paragraph => normalize_text(raw),
    }
}

pub fn normalize_block(block: &Block) -> String {
    normalize(block.kind, &block.raw)
}

fn trim_blank_lines<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return &[];
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(start);
    &lines[start..=end]
}

/// Opening line, body and closing line of a fenced block. The closing line
/// is either the opening marker itself or a run of the opening character.
fn split_fence<'a, 'b>(lines: &'b [&'a str]) -> Option<(&'a str, &'b [&'a str], &'a str)> {
    let (&first, rest) = lines.split_first()?;
    let (&last, body) = rest.split_last()?;
    let open = first.trim();
    let close = last.trim();
    let c = close.chars().next()?;
    if c.is_alphanumeric() {
        return None;
    }
    let run_close = close.chars().all(|ch| ch == c) && open.starts_with(c);
    if !run_close && !open.starts_with(close) {
        return None;
    }
    Some((open, body, close))
}
