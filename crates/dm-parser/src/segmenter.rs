//! Markdown segmenter: splits a draft into heading, paragraph and code
//! blocks in source order.

use crate::normalize::normalize;
use crate::traits::DocumentParser;
use dm_core::{Block, BlockKind, DmError, Document, Result, SegmenterConfig};
use regex::Regex;
use tracing::debug;

/// Segmenter.
pub struct Segmenter {
    heading_re: Regex,
    fence_marker: String,
    /// Set when the marker is a run of one character, e.g. "```".
    fence_char: Option<char>,
    strip_frontmatter: bool,
}

struct OpenFence<'a> {
    run: usize,
    line: usize,
    lines: Vec<&'a str>,
}

struct Builder<'a> {
    blocks: Vec<Block>,
    paragraph: Vec<&'a str>,
    paragraph_line: usize,
}

impl<'a> Builder<'a> {
    fn push(&mut self, kind: BlockKind, raw: String, line: usize) {
        let normalized = normalize(kind, &raw);
        let position = self.blocks.len();
        self.blocks.push(Block {
            kind,
            raw,
            normalized,
            position,
            line,
        });
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let raw = self.paragraph.join("\n");
        self.paragraph.clear();
        self.push(BlockKind::Paragraph, raw, self.paragraph_line);
    }
}

impl Segmenter {
    pub fn new(config: &SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let marker = regex::escape(&config.heading_marker.to_string());
        let heading_re = Regex::new(&format!(r"^(?:{marker}){{1,6}}(?:\s|$)"))
            .map_err(|e| DmError::InvalidConfig(format!("heading marker: {e}")))?;
        let mut chars = config.fence_marker.chars();
        let fence_char = chars
            .next()
            .filter(|&first| chars.all(|c| c == first));
        Ok(Self {
            heading_re,
            fence_marker: config.fence_marker.clone(),
            fence_char,
            strip_frontmatter: config.strip_frontmatter,
        })
    }

    /// Split `text` into blocks. Fails only on an unterminated code fence.
    pub fn segment(&self, doc_id: &str, text: &str) -> Result<Vec<Block>> {
        let lines: Vec<&str> = text.lines().collect();
        let skip = if self.strip_frontmatter {
            frontmatter_len(&lines)
        } else {
            0
        };

        let mut builder = Builder {
            blocks: Vec::new(),
            paragraph: Vec::new(),
            paragraph_line: 0,
        };
        let mut fence: Option<OpenFence> = None;

        for (idx, &line) in lines.iter().enumerate().skip(skip) {
            let line_no = idx + 1;

            if let Some(open) = fence.as_mut() {
                open.lines.push(line);
                if self.closes_fence(line, open.run) {
                    let raw = open.lines.join("\n");
                    let start = open.line;
                    fence = None;
                    builder.push(BlockKind::Code, raw, start);
                }
                continue;
            }

            if let Some(run) = self.fence_run(line) {
                builder.flush_paragraph();
                fence = Some(OpenFence {
                    run,
                    line: line_no,
                    lines: vec![line],
                });
                continue;
            }

            if line.trim().is_empty() {
                builder.flush_paragraph();
                continue;
            }

            if self.is_heading(line) {
                builder.flush_paragraph();
                builder.push(BlockKind::Heading, line.trim_end().to_string(), line_no);
                continue;
            }

            if builder.paragraph.is_empty() {
                builder.paragraph_line = line_no;
            }
            builder.paragraph.push(line);
        }

        if let Some(open) = fence {
            return Err(DmError::MalformedDocument {
                doc: doc_id.to_string(),
                line: open.line,
            });
        }
        builder.flush_paragraph();
        debug!(doc = doc_id, blocks = builder.blocks.len(), "segmented");
        Ok(builder.blocks)
    }

    pub fn segment_document(&self, doc_id: &str, text: &str) -> Result<Document> {
        Ok(Document::new(doc_id, self.segment(doc_id, text)?))
    }

    pub fn is_heading(&self, line: &str) -> bool {
        self.heading_re.is_match(line)
    }

    /// Length of the opening fence run, if `line` opens a fence. A backtick
    /// run followed by more backticks on the same line is inline code.
    fn fence_run(&self, line: &str) -> Option<usize> {
        let trimmed = line.trim_start();
        if !trimmed.starts_with(&self.fence_marker) {
            return None;
        }
        match self.fence_char {
            Some(c) => {
                let run = trimmed.chars().take_while(|&ch| ch == c).count();
                let info = &trimmed[run * c.len_utf8()..];
                if c == '`' && info.contains(c) {
                    return None;
                }
                Some(run)
            }
            None => Some(self.fence_marker.chars().count()),
        }
    }

    fn closes_fence(&self, line: &str, open_run: usize) -> bool {
        let trimmed = line.trim();
        match self.fence_char {
            Some(c) => {
                let run = trimmed.chars().take_while(|&ch| ch == c).count();
                run >= open_run && trimmed.chars().all(|ch| ch == c)
            }
            None => trimmed == self.fence_marker,
        }
    }
}

/// Number of leading lines taken by a `---` front matter block, or 0 when
/// there is none or it is never closed.
fn frontmatter_len(lines: &[&str]) -> usize {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return 0;
    }
    lines
        .iter()
        .skip(1)
        .position(|l| matches!(l.trim_end(), "---" | "..."))
        .map(|p| p + 2)
        .unwrap_or(0)
}

impl DocumentParser for Segmenter {
    fn parse_content(&self, id: &str, content: &str) -> Result<Document> {
        self.segment_document(id, content)
    }

    fn supported_extensions(&self) -> Vec<String> {
        vec![".md".into(), ".markdown".into(), ".mdown".into(), ".mkd".into()]
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&SegmenterConfig::default()).expect("default segmenter config is valid")
    }
}
