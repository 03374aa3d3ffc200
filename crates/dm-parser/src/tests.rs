use crate::*;
use dm_core::{BlockKind, DmError, SegmenterConfig};

fn kinds(text: &str) -> Vec<BlockKind> {
    Segmenter::default()
        .segment("doc.md", text)
        .unwrap()
        .iter()
        .map(|b| b.kind)
        .collect()
}

// ========== Segmenter ==========

#[test]
fn test_segment_basic_structure() {
    let md = "# Title\n\nFirst paragraph\nstill first.\n\n## Section\n\nSecond paragraph.";
    let blocks = Segmenter::default().segment("doc.md", md).unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0].kind, BlockKind::Heading);
    assert_eq!(blocks[0].raw, "# Title");
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    assert_eq!(blocks[1].raw, "First paragraph\nstill first.");
    assert_eq!(blocks[1].normalized, "First paragraph still first.");
    assert_eq!(blocks[1].line, 3);
    assert_eq!(blocks[3].normalized, "Second paragraph.");
    for (i, b) in blocks.iter().enumerate() {
        assert_eq!(b.position, i);
    }
}

#[test]
fn test_segment_empty_and_blank() {
    let seg = Segmenter::default();
    assert!(seg.segment("e.md", "").unwrap().is_empty());
    assert!(seg.segment("e.md", "   \n\n\t\n").unwrap().is_empty());
}

#[test]
fn test_heading_without_blank_line_starts_new_block() {
    assert_eq!(
        kinds("Some text\n## Heading\nMore text"),
        vec![BlockKind::Paragraph, BlockKind::Heading, BlockKind::Paragraph]
    );
}

#[test]
fn test_heading_requires_space_and_max_level() {
    assert_eq!(kinds("#hashtag"), vec![BlockKind::Paragraph]);
    assert_eq!(kinds("###### Deep"), vec![BlockKind::Heading]);
    assert_eq!(kinds("####### Too deep"), vec![BlockKind::Paragraph]);
    assert_eq!(kinds("#"), vec![BlockKind::Heading]);
    assert_eq!(kinds("\\# Escaped"), vec![BlockKind::Paragraph]);
}

#[test]
fn test_code_fence_keeps_blank_lines() {
    let md = "Intro\n\n```swift\nvar x: Int? = nil\n\n\nx = 5\n```\n\nOutro";
    let blocks = Segmenter::default().segment("doc.md", md).unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].kind, BlockKind::Code);
    assert_eq!(blocks[1].raw, "```swift\nvar x: Int? = nil\n\n\nx = 5\n```");
    assert_eq!(blocks[1].line, 3);
    assert_eq!(blocks[2].normalized, "Outro");
}

#[test]
fn test_heading_inside_code_fence() {
    let md = "# Real\n\n```\n# Not a heading\n```\n\n## Also Real";
    assert_eq!(
        kinds(md),
        vec![BlockKind::Heading, BlockKind::Code, BlockKind::Heading]
    );
}

#[test]
fn test_fence_interrupts_paragraph() {
    let md = "Text before\n```\ncode\n```\nText after";
    assert_eq!(
        kinds(md),
        vec![BlockKind::Paragraph, BlockKind::Code, BlockKind::Paragraph]
    );
}

#[test]
fn test_longer_fence_needs_longer_close() {
    let md = "````\n```\nnested\n```\n````";
    let blocks = Segmenter::default().segment("doc.md", md).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].raw, md);
}

#[test]
fn test_code_blank_lines_inside_fence_are_trimmed() {
    let seg = Segmenter::default();
    let padded = seg.segment("a.md", "```\n\nlet x = 1;\n\n```").unwrap();
    let tight = seg.segment("b.md", "```\nlet x = 1;\n```").unwrap();
    assert_eq!(padded[0].raw, "```\n\nlet x = 1;\n\n```");
    assert_eq!(padded[0].normalized, "```\nlet x = 1;\n```");
    assert!(padded[0].same_content(&tight[0]));
}

#[test]
fn test_code_info_string_still_counts() {
    let seg = Segmenter::default();
    let swift = seg.segment("a.md", "```swift\nx = 5\n```").unwrap();
    let plain = seg.segment("b.md", "```\nx = 5\n```").unwrap();
    assert!(!swift[0].same_content(&plain[0]));
}

#[test]
fn test_inline_backticks_do_not_open_fence() {
    let md = "Intro text.\n\n```let``` is a keyword used for constants.\n\nMore prose.";
    let blocks = Segmenter::default().segment("a.md", md).unwrap();
    assert_eq!(
        blocks.iter().map(|b| b.kind).collect::<Vec<_>>(),
        vec![BlockKind::Paragraph; 3]
    );
    assert_eq!(blocks[1].line, 3);
}

#[test]
fn test_tilde_fence_info_may_contain_tildes() {
    let config = SegmenterConfig {
        fence_marker: "~~~".into(),
        ..Default::default()
    };
    let seg = Segmenter::new(&config).unwrap();
    let blocks = seg.segment("doc.md", "~~~ a~b\ncode\n~~~").unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::Code);
}

#[test]
fn test_unterminated_fence_is_malformed() {
    let md = "# Title\n\n```rust\nfn main() {}\n\nno close";
    match Segmenter::default().segment("broken.md", md) {
        Err(DmError::MalformedDocument { doc, line }) => {
            assert_eq!(doc, "broken.md");
            assert_eq!(line, 3);
        }
        other => panic!("expected MalformedDocument, got {other:?}"),
    }
}

#[test]
fn test_custom_markers() {
    let config = SegmenterConfig {
        fence_marker: "~~~".into(),
        heading_marker: '=',
        strip_frontmatter: false,
    };
    let seg = Segmenter::new(&config).unwrap();
    let blocks = seg
        .segment("doc.md", "= Title\n\n~~~\n# comment\n~~~\n\n```\nplain")
        .unwrap();
    let got: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        got,
        vec![BlockKind::Heading, BlockKind::Code, BlockKind::Paragraph]
    );
}

#[test]
fn test_regex_meta_heading_marker() {
    let config = SegmenterConfig {
        heading_marker: '*',
        ..Default::default()
    };
    let seg = Segmenter::new(&config).unwrap();
    assert!(seg.is_heading("** Section"));
    assert!(!seg.is_heading("# Section"));
}

#[test]
fn test_invalid_config_rejected() {
    let config = SegmenterConfig {
        fence_marker: String::new(),
        ..Default::default()
    };
    assert!(matches!(
        Segmenter::new(&config),
        Err(DmError::InvalidConfig(_))
    ));
}

#[test]
fn test_frontmatter_stripping() {
    let md = "---\ntitle: Optionals\nauthor: me\n---\n# Hello\n\nWorld";
    let plain = Segmenter::default().segment("doc.md", md).unwrap();
    assert_eq!(plain.len(), 3);

    let config = SegmenterConfig {
        strip_frontmatter: true,
        ..Default::default()
    };
    let blocks = Segmenter::new(&config).unwrap().segment("doc.md", md).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].raw, "# Hello");
    assert_eq!(blocks[0].line, 5);
}

#[test]
fn test_unclosed_frontmatter_left_alone() {
    let config = SegmenterConfig {
        strip_frontmatter: true,
        ..Default::default()
    };
    let blocks = Segmenter::new(&config)
        .unwrap()
        .segment("doc.md", "---\ntitle: x\n\nBody")
        .unwrap();
    assert_eq!(blocks.len(), 2);
}

#[test]
fn test_crlf_input() {
    let blocks = Segmenter::default()
        .segment("doc.md", "# Title\r\n\r\nLine one\r\nline two\r\n")
        .unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].normalized, "Line one line two");
}

#[test]
fn test_segment_deterministic() {
    let md = "# A\n\npara  one\n\n```\nx\n\ny\n```\n\n## B\ntext";
    let seg = Segmenter::default();
    assert_eq!(seg.segment("d", md).unwrap(), seg.segment("d", md).unwrap());
}

#[test]
fn test_unicode_content() {
    let blocks = Segmenter::default()
        .segment("doc.md", "# 中文标题\n\n内容\u{3000}很好\n\n## 日本語")
        .unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].normalized, "内容 很好");
}

// ========== Normalizer ==========

#[test]
fn test_normalize_text_collapses_whitespace() {
    assert_eq!(normalize_text("  Hello,\t\tWorld!\n  Again  "), "Hello, World! Again");
    assert_eq!(normalize_text("Case Stays"), "Case Stays");
    assert_eq!(normalize_text(""), "");
}

#[test]
fn test_normalize_code_trims_blank_lines_only() {
    let code = "\n  \nfn main() {\n    let  x = 1;\n\n}\n\t\n";
    assert_eq!(normalize_code(code), "fn main() {\n    let  x = 1;\n\n}");
    assert_eq!(normalize_code("\n\n  \n"), "");
}

#[test]
fn test_normalize_code_trims_inside_fences() {
    assert_eq!(normalize_code("```rust\n\n  a  b\n\t\n```"), "```rust\n  a  b\n```");
    assert_eq!(normalize_code("````\n\n`````"), "````\n`````");
    assert_eq!(normalize_code("~~~\n\nx\n\n~~~"), "~~~\nx\n~~~");
}

#[test]
fn test_normalize_dispatch_by_kind() {
    let raw = "a   b";
    assert_eq!(normalize(BlockKind::Paragraph, raw), "a b");
    assert_eq!(normalize(BlockKind::Heading, raw), "a b");
    assert_eq!(normalize(BlockKind::Code, raw), "a   b");
}

#[test]
fn test_normalize_block_matches_segmenter() {
    let blocks = Segmenter::default()
        .segment("doc.md", "Some   spaced\ttext\n\n```\n  indented\n```")
        .unwrap();
    for b in &blocks {
        assert_eq!(normalize_block(b), b.normalized);
    }
}

// ========== DocumentParser ==========

#[test]
fn test_parser_extensions() {
    let seg = Segmenter::default();
    assert!(seg.can_parse("draft.md"));
    assert!(seg.can_parse("draft.markdown"));
    assert!(!seg.can_parse("main.rs"));
}

#[test]
fn test_parse_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("a.md");
    std::fs::write(&path, "# A\n\nBody").unwrap();
    let path = path.to_string_lossy().into_owned();
    let doc = Segmenter::default().parse_file(&path).unwrap();
    assert_eq!(doc.id(), path);
    assert_eq!(doc.len(), 2);

    let missing = dir.path().join("missing.md").to_string_lossy().into_owned();
    assert!(matches!(
        Segmenter::default().parse_file(&missing),
        Err(DmError::NotFound { .. })
    ));
}
