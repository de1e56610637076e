//! Markdown to PDF conversion for the generated reports.
//!
//! The Markdown is parsed with pulldown-cmark into simple blocks, laid out
//! with word wrapping on A4 pages and written as a PDF 1.4 file that only
//! uses the standard Type1 fonts, so no font files are embedded.

use std::path::Path;

use chrono::Utc;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use crate::errors::{AppError, AppResult};

/// Writes a PDF rendering of a Markdown file.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, markdown_path: &Path, pdf_path: &Path) -> AppResult<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfDocumentRenderer;

impl PdfDocumentRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for PdfDocumentRenderer {
    fn render(&self, markdown_path: &Path, pdf_path: &Path) -> AppResult<()> {
        let markdown = std::fs::read_to_string(markdown_path).map_err(|e| {
            AppError::Render(format!(
                "Failed to read {}: {}",
                markdown_path.display(),
                e
            ))
        })?;
        let title = markdown_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("report");

        let pdf = markdown_to_pdf(&markdown, title);
        std::fs::write(pdf_path, &pdf).map_err(|e| {
            AppError::Render(format!("Failed to write {}: {}", pdf_path.display(), e))
        })?;

        log::info!(
            "Rendered {} to {} ({} bytes)",
            markdown_path.display(),
            pdf_path.display(),
            pdf.len()
        );
        Ok(())
    }
}

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 56.0;
const FOOTER_HEIGHT: f32 = 28.0;
const BODY_SIZE: f32 = 11.0;
const CODE_SIZE: f32 = 9.5;
const LIST_INDENT: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Italic,
    Mono,
}

impl Font {
    const ALL: [Font; 4] = [Font::Regular, Font::Bold, Font::Italic, Font::Mono];

    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
            Font::Mono => "F4",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
            Font::Mono => "Courier",
        }
    }

    /// Average glyph advance as a fraction of the font size. Slightly
    /// generous so wrapped lines stay inside the margins.
    fn char_width(&self) -> f32 {
        match self {
            Font::Regular | Font::Italic => 0.52,
            Font::Bold => 0.57,
            Font::Mono => 0.6,
        }
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * self.char_width() * size
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    font: Font,
}

#[derive(Debug, Clone, PartialEq)]
enum BlockKind {
    Heading(u8),
    Paragraph,
    ListItem { depth: usize, marker: String },
    Code,
    TableRow,
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
struct Block {
    kind: BlockKind,
    runs: Vec<Run>,
}

#[derive(Default)]
struct MarkdownCollector {
    blocks: Vec<Block>,
    runs: Vec<Run>,
    kind: Option<BlockKind>,
    lists: Vec<Option<u64>>,
    heading: Option<u8>,
    strong: usize,
    emphasis: usize,
    code: Option<String>,
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

impl MarkdownCollector {
    fn collect(markdown: &str) -> Vec<Block> {
        let mut collector = MarkdownCollector::default();
        for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
            collector.handle(event);
        }
        collector.flush();
        collector.blocks
    }

    fn inline_font(&self) -> Font {
        if self.heading.is_some() || self.strong > 0 {
            Font::Bold
        } else if self.emphasis > 0 {
            Font::Italic
        } else {
            Font::Regular
        }
    }

    fn push_text(&mut self, text: &str, font: Font) {
        if let Some(code) = self.code.as_mut() {
            code.push_str(text);
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.font == font => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                font,
            }),
        }
    }

    fn flush(&mut self) {
        let kind = self.kind.take().unwrap_or(BlockKind::Paragraph);
        let runs = std::mem::take(&mut self.runs);
        let has_text = runs.iter().any(|run| !run.text.trim().is_empty());
        if has_text || matches!(kind, BlockKind::Rule) {
            self.blocks.push(Block { kind, runs });
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                let font = self.inline_font();
                self.push_text(&text, font);
            }
            Event::Code(code) => self.push_text(&code, Font::Mono),
            Event::SoftBreak | Event::HardBreak => {
                let font = self.inline_font();
                self.push_text(" ", font);
            }
            Event::Rule => {
                self.flush();
                self.kind = Some(BlockKind::Rule);
                self.flush();
            }
            Event::Html(_) | Event::FootnoteReference(_) | Event::TaskListMarker(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                let continues_item = matches!(self.kind, Some(BlockKind::ListItem { .. }))
                    && self.runs.is_empty();
                if !continues_item {
                    self.flush();
                    self.kind = Some(match self.lists.len() {
                        0 => BlockKind::Paragraph,
                        depth => BlockKind::ListItem {
                            depth,
                            marker: String::new(),
                        },
                    });
                }
            }
            Tag::Heading(level, _, _) => {
                self.flush();
                let number = heading_number(level);
                self.heading = Some(number);
                self.kind = Some(BlockKind::Heading(number));
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.code = Some(String::new());
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().max(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{}.", next);
                        *next += 1;
                        marker
                    }
                    _ => "\u{2022}".to_string(),
                };
                self.kind = Some(BlockKind::ListItem { depth, marker });
            }
            Tag::TableHead | Tag::TableRow => {
                self.flush();
                self.kind = Some(BlockKind::TableRow);
                if matches!(tag, Tag::TableHead) {
                    self.strong += 1;
                }
            }
            Tag::TableCell => {
                if !self.runs.is_empty() {
                    let font = self.inline_font();
                    self.push_text(" | ", font);
                }
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::Table(_)
            | Tag::BlockQuote
            | Tag::Strikethrough
            | Tag::Link(..)
            | Tag::Image(..)
            | Tag::FootnoteDefinition(_) => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::Item | Tag::TableRow => self.flush(),
            Tag::Heading(..) => {
                self.flush();
                self.heading = None;
            }
            Tag::TableHead => {
                self.flush();
                self.strong = self.strong.saturating_sub(1);
            }
            Tag::CodeBlock(_) => {
                if let Some(code) = self.code.take() {
                    for line in code.trim_end_matches('\n').split('\n') {
                        self.blocks.push(Block {
                            kind: BlockKind::Code,
                            runs: vec![Run {
                                text: line.to_string(),
                                font: Font::Mono,
                            }],
                        });
                    }
                }
            }
            Tag::List(_) => {
                self.flush();
                self.lists.pop();
            }
            Tag::Strong => self.strong = self.strong.saturating_sub(1),
            Tag::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    font: Font,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    x: f32,
    size: f32,
    space_before: f32,
    segments: Vec<Segment>,
    rule: bool,
}

impl Line {
    fn height(&self) -> f32 {
        if self.rule {
            6.0
        } else {
            self.size * 1.4
        }
    }
}

struct Token {
    font: Font,
    text: String,
    space_before: bool,
}

fn tokenize(runs: &[Run]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending_space = false;
    for run in runs {
        let mut current = String::new();
        let mut current_space = false;
        for c in run.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    tokens.push(Token {
                        font: run.font,
                        text: std::mem::take(&mut current),
                        space_before: current_space,
                    });
                }
                pending_space = true;
            } else {
                if current.is_empty() {
                    current_space = pending_space;
                    pending_space = false;
                }
                current.push(c);
            }
        }
        if !current.is_empty() {
            tokens.push(Token {
                font: run.font,
                text: current,
                space_before: current_space,
            });
        }
    }
    tokens
}

fn push_segment(segments: &mut Vec<Segment>, font: Font, text: &str) {
    match segments.last_mut() {
        Some(last) if last.font == font => last.text.push_str(text),
        _ => segments.push(Segment {
            font,
            text: text.to_string(),
        }),
    }
}

/// Greedy word wrap. Words longer than a whole line are split by characters.
fn wrap_runs(runs: &[Run], size: f32, max_width: f32) -> Vec<Vec<Segment>> {
    let mut lines = Vec::new();
    let mut line: Vec<Segment> = Vec::new();
    let mut width = 0.0;

    for token in tokenize(runs) {
        let space = if token.space_before && !line.is_empty() {
            token.font.text_width(" ", size)
        } else {
            0.0
        };
        let word_width = token.font.text_width(&token.text, size);

        if !line.is_empty() && width + space + word_width > max_width {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        }

        if line.is_empty() && word_width > max_width {
            let per_line = ((max_width / (token.font.char_width() * size)) as usize).max(1);
            let chars: Vec<char> = token.text.chars().collect();
            let mut chunks = chars.chunks(per_line).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(vec![Segment {
                        font: token.font,
                        text: piece,
                    }]);
                } else {
                    width = token.font.text_width(&piece, size);
                    push_segment(&mut line, token.font, &piece);
                }
            }
            continue;
        }

        if !line.is_empty() && token.space_before {
            push_segment(&mut line, token.font, " ");
            width += space;
        }
        push_segment(&mut line, token.font, &token.text);
        width += word_width;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn wrap_code(text: &str, size: f32, max_width: f32) -> Vec<Vec<Segment>> {
    let per_line = ((max_width / (Font::Mono.char_width() * size)) as usize).max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![vec![Segment {
            font: Font::Mono,
            text: String::new(),
        }]];
    }
    chars
        .chunks(per_line)
        .map(|chunk| {
            vec![Segment {
                font: Font::Mono,
                text: chunk.iter().collect(),
            }]
        })
        .collect()
}

fn layout(blocks: &[Block]) -> Vec<Line> {
    let content_width = PAGE_WIDTH - 2.0 * MARGIN;
    let mut lines = Vec::new();
    let mut previous_was_code = false;

    for block in blocks {
        let (size, indent, space_before) = match &block.kind {
            BlockKind::Heading(level) => {
                let size = match level {
                    1 => 20.0,
                    2 => 16.0,
                    3 => 13.5,
                    _ => 12.0,
                };
                (size, 0.0, if *level <= 2 { 14.0 } else { 10.0 })
            }
            BlockKind::Paragraph => (BODY_SIZE, 0.0, 6.0),
            BlockKind::ListItem { depth, .. } => (BODY_SIZE, LIST_INDENT * *depth as f32, 3.0),
            BlockKind::Code => (CODE_SIZE, 10.0, if previous_was_code { 0.0 } else { 6.0 }),
            BlockKind::TableRow => (BODY_SIZE - 1.0, 0.0, 2.0),
            BlockKind::Rule => (BODY_SIZE, 0.0, 8.0),
        };
        previous_was_code = matches!(block.kind, BlockKind::Code);

        if matches!(block.kind, BlockKind::Rule) {
            lines.push(Line {
                x: MARGIN,
                size,
                space_before,
                segments: Vec::new(),
                rule: true,
            });
            continue;
        }

        let wrapped = match &block.kind {
            BlockKind::Code => {
                let text = block.runs.first().map(|run| run.text.as_str()).unwrap_or_default();
                wrap_code(text, size, content_width - indent)
            }
            _ => wrap_runs(&block.runs, size, content_width - indent),
        };

        for (index, mut segments) in wrapped.into_iter().enumerate() {
            if let (0, BlockKind::ListItem { marker, .. }) = (index, &block.kind) {
                if !marker.is_empty() {
                    segments.insert(
                        0,
                        Segment {
                            font: Font::Regular,
                            text: format!("{} ", marker),
                        },
                    );
                }
            }
            let hanging = match &block.kind {
                BlockKind::ListItem { marker, .. } if index > 0 || marker.is_empty() => {
                    Font::Regular.text_width("\u{2022} ", size)
                }
                _ => 0.0,
            };
            lines.push(Line {
                x: MARGIN + indent + hanging,
                size,
                space_before: if index == 0 { space_before } else { 0.0 },
                segments,
                rule: false,
            });
        }
    }
    lines
}

fn paginate(lines: Vec<Line>) -> Vec<Vec<(f32, Line)>> {
    let top = PAGE_HEIGHT - MARGIN;
    let bottom = MARGIN + FOOTER_HEIGHT;
    let mut pages = Vec::new();
    let mut page: Vec<(f32, Line)> = Vec::new();
    let mut cursor = top;

    for line in lines {
        let gap = if page.is_empty() { 0.0 } else { line.space_before };
        if !page.is_empty() && cursor - gap - line.height() < bottom {
            pages.push(std::mem::take(&mut page));
            cursor = top;
        }
        let gap = if page.is_empty() { 0.0 } else { line.space_before };
        cursor -= gap;
        let baseline = cursor - line.size;
        cursor -= line.height();
        page.push((baseline, line));
    }

    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

/// Encodes `text` as the body of a PDF literal string in WinAnsiEncoding.
/// Characters outside that encoding become `?`.
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let byte: u32 = match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
                continue;
            }
            ' '..='~' => {
                out.push(c);
                continue;
            }
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{20ac}' => 0x80,
            '\u{a0}'..='\u{ff}' => c as u32,
            '\t' => {
                out.push_str("    ");
                continue;
            }
            _ => {
                out.push('?');
                continue;
            }
        };
        out.push_str(&format!("\\{:03o}", byte));
    }
    out
}

fn page_stream(lines: &[(f32, Line)], page_number: usize, page_count: usize) -> String {
    let mut stream = String::new();

    for (baseline, line) in lines {
        if line.rule {
            let y = baseline + line.size - 3.0;
            stream.push_str(&format!(
                "q\n0.6 G\n0.5 w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                MARGIN,
                y,
                PAGE_WIDTH - MARGIN,
                y
            ));
            continue;
        }
        if line.segments.iter().all(|s| s.text.is_empty()) {
            continue;
        }
        stream.push_str("BT\n");
        stream.push_str(&format!("{:.2} {:.2} Td\n", line.x, baseline));
        for segment in &line.segments {
            stream.push_str(&format!(
                "/{} {:.1} Tf\n({}) Tj\n",
                segment.font.resource(),
                line.size,
                pdf_string(&segment.text)
            ));
        }
        stream.push_str("ET\n");
    }

    let footer = format!("Page {} of {}", page_number, page_count);
    let footer_x = PAGE_WIDTH - MARGIN - Font::Regular.text_width(&footer, 9.0);
    stream.push_str(&format!(
        "q\n0.8 G\n0.5 w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
        MARGIN,
        MARGIN + FOOTER_HEIGHT - 10.0,
        PAGE_WIDTH - MARGIN,
        MARGIN + FOOTER_HEIGHT - 10.0
    ));
    stream.push_str(&format!(
        "BT\n/F1 9.0 Tf\n0.3 g\n{:.2} {:.2} Td\n({}) Tj\nET\n",
        footer_x,
        MARGIN,
        pdf_string(&footer)
    ));
    stream
}

/// Renders Markdown into the bytes of a standalone PDF document.
pub fn markdown_to_pdf(markdown: &str, title: &str) -> Vec<u8> {
    let pages = paginate(layout(&MarkdownCollector::collect(markdown)));
    let page_count = pages.len();

    // 1 catalog, 2 page tree, 3..=6 fonts, 7 info, then a page and a content object per page.
    let font_ids: Vec<usize> = (3..3 + Font::ALL.len()).collect();
    let info_id = 3 + Font::ALL.len();
    let first_page_id = info_id + 1;
    let page_ids: Vec<usize> = (0..page_count).map(|i| first_page_id + 2 * i).collect();

    let mut objects: Vec<(usize, String)> = Vec::new();
    objects.push((1, "<< /Type /Catalog /Pages 2 0 R >>".to_string()));
    objects.push((
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            page_ids
                .iter()
                .map(|id| format!("{} 0 R", id))
                .collect::<Vec<_>>()
                .join(" "),
            page_count
        ),
    ));
    for (font, id) in Font::ALL.iter().zip(&font_ids) {
        objects.push((
            *id,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            ),
        ));
    }
    objects.push((
        info_id,
        format!(
            "<< /Title ({}) /Producer (site-audit-server) /CreationDate ({}) >>",
            pdf_string(title),
            Utc::now().format("D:%Y%m%d%H%M%SZ")
        ),
    ));

    let font_resources = Font::ALL
        .iter()
        .zip(&font_ids)
        .map(|(font, id)| format!("/{} {} 0 R", font.resource(), id))
        .collect::<Vec<_>>()
        .join(" ");

    for (index, lines) in pages.iter().enumerate() {
        let page_id = page_ids[index];
        let content_id = page_id + 1;
        let stream = page_stream(lines, index + 1, page_count);
        objects.push((
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_id, font_resources
            ),
        ));
        objects.push((
            content_id,
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ),
        ));
    }
    objects.sort_by_key(|(id, _)| *id);

    let mut pdf: Vec<u8> = Vec::new();
    pdf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (id, body) in &objects {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    let xref_start = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            info_id,
            xref_start
        )
        .as_bytes(),
    );
    pdf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_texts(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .map(|b| b.runs.iter().map(|r| r.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_collects_headings_lists_and_code() {
        let markdown = "# Title\n\nSome **bold** text.\n\n- one\n- two\n\n1. first\n2. second\n\n```\nlet x = 1;\n  indented\n```\n\n---\n";
        let blocks = MarkdownCollector::collect(markdown);

        assert_eq!(blocks[0].kind, BlockKind::Heading(1));
        assert_eq!(blocks[1].runs[1], Run { text: "bold".to_string(), font: Font::Bold });
        assert_eq!(
            blocks[2].kind,
            BlockKind::ListItem { depth: 1, marker: "\u{2022}".to_string() }
        );
        assert_eq!(
            blocks[5].kind,
            BlockKind::ListItem { depth: 1, marker: "2.".to_string() }
        );
        assert_eq!(blocks[6].kind, BlockKind::Code);
        assert_eq!(block_texts(&blocks)[7], "  indented");
        assert_eq!(blocks.last().unwrap().kind, BlockKind::Rule);
    }

    #[test]
    fn test_emphasis_and_loose_list_paragraphs() {
        let markdown = "Check *contrast* first.\n\n- one\n\n  more about one\n- two\n";
        let blocks = MarkdownCollector::collect(markdown);

        assert_eq!(blocks[0].runs[1], Run { text: "contrast".to_string(), font: Font::Italic });
        assert_eq!(
            blocks[1].kind,
            BlockKind::ListItem { depth: 1, marker: "\u{2022}".to_string() }
        );
        assert_eq!(
            blocks[2].kind,
            BlockKind::ListItem { depth: 1, marker: String::new() }
        );
        assert_eq!(block_texts(&blocks)[2], "more about one");
        assert_eq!(block_texts(&blocks)[3], "two");
    }

    #[test]
    fn test_table_rows_are_flattened() {
        let markdown = "| Metric | Score |\n| --- | --- |\n| LCP | 2.1s |\n";
        let blocks = MarkdownCollector::collect(markdown);

        assert_eq!(block_texts(&blocks), vec!["Metric | Score", "LCP | 2.1s"]);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::TableRow));
        assert_eq!(blocks[0].runs[0].font, Font::Bold);
    }

    #[test]
    fn test_wrap_respects_width() {
        let runs = vec![Run {
            text: "word ".repeat(200),
            font: Font::Regular,
        }];
        let max_width = 300.0;
        let lines = wrap_runs(&runs, BODY_SIZE, max_width);

        assert!(lines.len() > 1);
        for line in &lines {
            let width: f32 = line
                .iter()
                .map(|s| s.font.text_width(&s.text, BODY_SIZE))
                .sum();
            assert!(width <= max_width + 0.01);
        }
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        let runs = vec![Run {
            text: "x".repeat(500),
            font: Font::Regular,
        }];
        let lines = wrap_runs(&runs, BODY_SIZE, 100.0);
        let total: usize = lines
            .iter()
            .flat_map(|l| l.iter())
            .map(|s| s.text.chars().count())
            .sum();
        assert!(lines.len() > 1);
        assert_eq!(total, 500);
    }

    #[test]
    fn test_adjacent_runs_keep_punctuation_attached() {
        let runs = vec![
            Run { text: "Use ".to_string(), font: Font::Regular },
            Run { text: "alt".to_string(), font: Font::Mono },
            Run { text: ", always.".to_string(), font: Font::Regular },
        ];
        let lines = wrap_runs(&runs, BODY_SIZE, 400.0);
        let text: String = lines[0].iter().map(|s| s.text.as_str()).collect();
        assert_eq!(text, "Use alt, always.");
    }

    #[test]
    fn test_pdf_string_escaping() {
        assert_eq!(pdf_string("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(pdf_string("caf\u{e9}"), "caf\\351");
        assert_eq!(pdf_string("\u{2014}"), "\\227");
        assert_eq!(pdf_string("\u{1f600}"), "?");
    }

    #[test]
    fn test_long_document_paginates() {
        let markdown = (0..200)
            .map(|i| format!("Paragraph number {} with some filler text to wrap.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let pages = paginate(layout(&MarkdownCollector::collect(&markdown)));
        assert!(pages.len() > 1);
        for page in &pages {
            for (baseline, _) in page {
                assert!(*baseline >= MARGIN + FOOTER_HEIGHT - BODY_SIZE);
            }
        }
    }

    #[test]
    fn test_pdf_structure() {
        let pdf = markdown_to_pdf("# Report\n\nAll good.", "seo_report");
        let text = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("(Report) Tj"));
        assert!(text.contains("/Title (seo_report)"));
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn test_empty_markdown_still_has_a_page() {
        let pdf = markdown_to_pdf("", "empty");
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn test_render_writes_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let markdown_path = dir.path().join("frontend_report.md");
        let pdf_path = dir.path().join("frontend_report.pdf");
        std::fs::write(&markdown_path, "# Front-End\n\n- fix alt text").unwrap();

        PdfDocumentRenderer::new()
            .render(&markdown_path, &pdf_path)
            .unwrap();

        let bytes = std::fs::read(&pdf_path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_render_missing_input_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfDocumentRenderer::new().render(
            &dir.path().join("missing.md"),
            &dir.path().join("missing.pdf"),
        );
        assert!(matches!(result, Err(AppError::Render(_))));
    }
}
