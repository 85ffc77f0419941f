//! Layout extraction for PDF pages.
//!
//! Interprets a page's content stream into positioned text spans, groups them
//! into lines and blocks, and produces the read-only [`Page`] view with
//! top-left-origin coordinates.

use crate::error::Result;
use crate::model::{Line, Page, Rect, Span, TextBlock};

use super::backend::{operand_number, ContentOp, FontResource, Operand, PageId, PdfBackend};

/// Average glyph advance as a fraction of the font size. There are no glyph
/// metrics at this level, so widths are estimates.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Portion of the font size above the baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Portion of the font size below the baseline.
const DESCENT_RATIO: f32 = 0.2;

/// Stream-adjacent spans further apart than this many ems start a new line.
const LINE_BREAK_GAP_EMS: f32 = 3.0;

/// TJ adjustments (thousandths of an em) larger than this read as word breaks.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// A positioned text fragment in top-left page coordinates.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Baseline Y position, measured from the top of the page
    pub baseline: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Times-Roman")
    pub font_name: String,
    /// Position of the span in content-stream order
    pub seq: usize,
}

impl TextSpan {
    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge of the span (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.baseline - self.font_size * ASCENT_RATIO
    }

    /// Bottom edge of the span (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.baseline + self.font_size * DESCENT_RATIO
    }
}

/// A line of stream-adjacent spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, in stream order
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    fn first(&self) -> &TextSpan {
        &self.spans[0]
    }

    /// Leftmost X position.
    pub fn x(&self) -> f32 {
        self.spans.iter().map(|s| s.x).fold(f32::INFINITY, f32::min)
    }

    /// Baseline of the first span.
    pub fn baseline(&self) -> f32 {
        self.first().baseline
    }

    /// Largest font size in the line.
    pub fn font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }

    /// Stream position of the line.
    pub fn seq(&self) -> usize {
        self.first().seq
    }

    /// Bounding box of the line.
    pub fn bbox(&self) -> Rect {
        let mut rect = Rect::new(
            self.x(),
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NEG_INFINITY,
        );
        for span in &self.spans {
            rect.y0 = rect.y0.min(span.top());
            rect.x1 = rect.x1.max(span.right());
            rect.y1 = rect.y1.max(span.bottom());
        }
        rect
    }

    /// Convert to a model line, merging neighbouring spans that share a font.
    pub fn to_line(&self) -> Line {
        let mut spans: Vec<Span> = Vec::new();
        let mut prev: Option<&TextSpan> = None;

        for span in &self.spans {
            let same_font = prev.is_some_and(|p| {
                p.font_name == span.font_name && (p.font_size - span.font_size).abs() < 0.01
            });
            match (prev, spans.last_mut()) {
                (Some(p), Some(last)) if same_font => {
                    if needs_space(p, span) {
                        last.text.push(' ');
                    }
                    last.text.push_str(&span.text);
                }
                _ => spans.push(Span::new(
                    span.text.clone(),
                    span.font_name.clone(),
                    span.font_size,
                )),
            }
            prev = Some(span);
        }

        Line::new(self.bbox(), spans)
    }
}

/// Decide whether a space separates two spans of the same line.
///
/// A gap wider than 20% of the average character width reads as a space,
/// except between characters of scripts that do not use word spaces.
fn needs_space(prev: &TextSpan, curr: &TextSpan) -> bool {
    let char_count = curr.text.chars().count();
    let avg_char_width = if char_count > 0 && curr.width > 0.0 {
        curr.width / char_count as f32
    } else {
        curr.font_size * APPROX_CHAR_WIDTH_RATIO
    };
    let gap = curr.x - prev.right();

    let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
    let curr_starts_with_space = curr.text.starts_with(' ') || curr.text.starts_with('\u{00A0}');
    if prev_ends_with_space || curr_starts_with_space || gap <= avg_char_width * 0.2 {
        return false;
    }

    let prev_is_cjk = prev
        .text
        .chars()
        .last()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    let curr_is_cjk = curr
        .text
        .chars()
        .next()
        .map(is_spaceless_script_char)
        .unwrap_or(false);
    !(prev_is_cjk && curr_is_cjk)
}

/// Text positions and images collected from one content stream.
#[derive(Debug, Default)]
pub struct PageContent {
    pub spans: Vec<TextSpan>,
    /// Image placements with their stream positions
    pub images: Vec<(usize, Rect)>,
}

/// Layout analyzer for extracting structured pages through a [`PdfBackend`].
pub struct LayoutAnalyzer<'a> {
    backend: &'a dyn PdfBackend,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self { backend }
    }

    /// Extract the full page view: geometry, fonts, and blocks.
    pub fn extract_page(&self, page_num: u32, page_id: PageId) -> Result<Page> {
        let (width, height) = self.backend.page_size(page_id);
        let mut page = Page::new(page_num, width, height);

        let fonts = self.backend.page_fonts(page_id)?;
        for font in &fonts {
            page.add_font(font.base_font.clone());
        }

        let content = self.extract_page_content(page_id, &fonts, height)?;
        log::debug!(
            "Page {}: {} spans, {} images",
            page_num,
            content.spans.len(),
            content.images.len()
        );

        page.blocks = build_blocks(content);
        Ok(page)
    }

    /// Interpret a page's content stream into spans and image placements.
    pub fn extract_page_content(
        &self,
        page_id: PageId,
        fonts: &[FontResource],
        page_height: f32,
    ) -> Result<PageContent> {
        let data = self.backend.page_content(page_id)?;
        if data.is_empty() {
            return Ok(PageContent::default());
        }
        let ops = self.backend.decode_content(&data)?;
        Ok(self.interpret(&ops, page_id, fonts, page_height))
    }

    fn interpret(
        &self,
        ops: &[ContentOp],
        page_id: PageId,
        fonts: &[FontResource],
        page_height: f32,
    ) -> PageContent {
        let mut content = PageContent::default();
        let mut ctm = IDENTITY_MATRIX;
        let mut ctm_stack: Vec<[f32; 6]> = Vec::new();
        let mut state = TextState::default();
        let mut in_text_block = false;
        let mut seq = 0usize;

        for op in ops {
            match op.operator.as_str() {
                "q" => ctm_stack.push(ctm),
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operands(op) {
                        ctm = multiply(&m, &ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.text_matrix = IDENTITY_MATRIX;
                    state.line_matrix = IDENTITY_MATRIX;
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(Operand::Name(key)) = op.operands.first() {
                        let base_font = fonts
                            .iter()
                            .find(|f| &f.name == key)
                            .map(|f| f.base_font.clone())
                            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                        state.font_key = key.clone();
                        state.font_name = base_font;
                    }
                    state.font_size = op.number(1).unwrap_or(12.0);
                }
                "Tc" => state.char_spacing = op.number(0).unwrap_or(0.0),
                "Tw" => state.word_spacing = op.number(0).unwrap_or(0.0),
                "Tz" => state.horiz_scale = op.number(0).unwrap_or(100.0) / 100.0,
                "TL" => state.leading = op.number(0).unwrap_or(0.0),
                "Td" => {
                    state.translate_line(op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
                }
                "TD" => {
                    let ty = op.number(1).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(op.number(0).unwrap_or(0.0), ty);
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(op) {
                        state.text_matrix = m;
                        state.line_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" {
                        state.next_line();
                    }
                    if op.operator == "\"" {
                        state.word_spacing = op.number(0).unwrap_or(state.word_spacing);
                        state.char_spacing = op.number(1).unwrap_or(state.char_spacing);
                        state.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(span) =
                        self.show_text(op, text_idx, &mut state, &ctm, page_id, page_height, seq)
                    {
                        content.spans.push(span);
                        seq += 1;
                    }
                }
                "Do" => {
                    let rect = image_rect(&ctm, page_height);
                    content.images.push((seq, rect));
                    seq += 1;
                }
                _ => {}
            }
        }

        content
    }

    /// Show a text operand, advancing the text matrix, and return the span.
    #[allow(clippy::too_many_arguments)]
    fn show_text(
        &self,
        op: &ContentOp,
        text_idx: usize,
        state: &mut TextState,
        ctm: &[f32; 6],
        page_id: PageId,
        page_height: f32,
        seq: usize,
    ) -> Option<TextSpan> {
        let start = multiply(&state.text_matrix, ctm);
        let mut text = String::new();

        match op.operands.get(text_idx)? {
            Operand::Str(bytes) => {
                let decoded = self.backend.decode_text(page_id, &state.font_key, bytes);
                state.advance(&decoded);
                text.push_str(&decoded);
            }
            Operand::Array(items) => {
                for item in items {
                    match item {
                        Operand::Str(bytes) => {
                            let decoded =
                                self.backend.decode_text(page_id, &state.font_key, bytes);
                            state.advance(&decoded);
                            text.push_str(&decoded);
                        }
                        Operand::Integer(_) | Operand::Real(_) => {
                            let adjustment = -operand_number(item)?;
                            state.kern(adjustment);
                            if adjustment > TJ_SPACE_THRESHOLD
                                && !text.is_empty()
                                && !text.ends_with(' ')
                                && !text.ends_with('\u{00A0}')
                                && !text.chars().last().is_some_and(is_spaceless_script_char)
                            {
                                text.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => return None,
        }

        if text.trim().is_empty() {
            return None;
        }

        let end = multiply(&state.text_matrix, ctm);
        let (x, y) = (start[4], start[5]);
        let vertical_scale = (start[2] * start[2] + start[3] * start[3]).sqrt();
        let font_size = (state.font_size * vertical_scale).abs();

        Some(TextSpan {
            text,
            x: x.min(end[4]),
            baseline: page_height - y,
            width: (end[4] - x).abs(),
            font_size,
            font_name: state.font_name.clone(),
            seq,
        })
    }
}

/// Text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Translate the line matrix (Td) and reset the text matrix to it.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let m = &self.line_matrix;
        let e = m[0] * tx + m[2] * ty + m[4];
        let f = m[1] * tx + m[3] * ty + m[5];
        self.line_matrix[4] = e;
        self.line_matrix[5] = f;
        self.text_matrix = self.line_matrix;
    }

    /// Move to the start of the next line (T*).
    fn next_line(&mut self) {
        // Without a TL, assume single spacing.
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.translate_line(0.0, -leading);
    }

    /// Advance past rendered text using estimated glyph widths.
    fn advance(&mut self, text: &str) {
        let mut dx = 0.0;
        for ch in text.chars() {
            dx += self.font_size * APPROX_CHAR_WIDTH_RATIO + self.char_spacing;
            if ch == ' ' {
                dx += self.word_spacing;
            }
        }
        self.move_x(dx * self.horiz_scale);
    }

    /// Apply a TJ position adjustment (thousandths of an em, positive moves right).
    fn kern(&mut self, adjustment: f32) {
        self.move_x(adjustment / 1000.0 * self.font_size * self.horiz_scale);
    }

    fn move_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }
}

/// Six numeric operands as a matrix.
fn matrix_operands(op: &ContentOp) -> Option<[f32; 6]> {
    let mut m = [0.0; 6];
    for (i, slot) in m.iter_mut().enumerate() {
        *slot = op.number(i)?;
    }
    Some(m)
}

/// Matrix product `a × b` in PDF's row-vector convention.
fn multiply(a: &[f32; 6], b: &[f32; 6]) -> [f32; 6] {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

/// Page rectangle covered by the unit square under `ctm`, in top-left coordinates.
fn image_rect(ctm: &[f32; 6], page_height: f32) -> Rect {
    let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
    let mut rect = Rect::new(
        f32::INFINITY,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::NEG_INFINITY,
    );
    for (u, v) in corners {
        let x = ctm[0] * u + ctm[2] * v + ctm[4];
        let y = page_height - (ctm[1] * u + ctm[3] * v + ctm[5]);
        rect.x0 = rect.x0.min(x);
        rect.y0 = rect.y0.min(y);
        rect.x1 = rect.x1.max(x);
        rect.y1 = rect.y1.max(y);
    }
    rect
}

/// Group stream-adjacent spans that share a baseline into lines.
///
/// Only neighbours in content-stream order can join, so two columns that happen
/// to share a baseline stay on separate lines.
pub fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();

    for span in spans {
        if let Some(last) = current.last() {
            let size = last.font_size.max(span.font_size);
            let same_baseline = (span.baseline - last.baseline).abs() <= size * 0.3;
            let close = span.x >= last.x && span.x - last.right() <= size * LINE_BREAK_GAP_EMS;
            if !(same_baseline && close) {
                lines.push(TextLine {
                    spans: std::mem::take(&mut current),
                });
            }
        }
        current.push(span);
    }

    if !current.is_empty() {
        lines.push(TextLine { spans: current });
    }

    lines
}

/// Group consecutive lines into blocks (paragraphs) based on spacing.
pub fn group_lines_into_blocks(lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
    let avg_spacing = calculate_avg_line_spacing(&lines);
    let mut blocks: Vec<Vec<TextLine>> = Vec::new();
    let mut current: Vec<TextLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Average downward baseline step between consecutive lines.
fn calculate_avg_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| w[1].baseline() - w[0].baseline())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Determine if a new block should start.
fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    let spacing = curr.baseline() - prev.baseline();

    // Same row or moving up the page: another column or region
    if spacing <= 0.1 {
        return true;
    }

    // Large spacing indicates new paragraph; large type sets its own leading
    if spacing > avg_spacing.max(prev.font_size() * 1.2) * 1.5 {
        return true;
    }

    // Significant font size change
    if (prev.font_size() - curr.font_size()).abs() > 1.0 {
        return true;
    }

    // Significant left margin change
    (prev.x() - curr.x()).abs() > 20.0
}

/// Assemble text and image blocks in content-stream order.
fn build_blocks(content: PageContent) -> Vec<TextBlock> {
    let lines = group_spans_into_lines(content.spans);
    let mut blocks: Vec<(usize, TextBlock)> = group_lines_into_blocks(lines)
        .into_iter()
        .map(|block_lines| {
            let seq = block_lines[0].seq();
            let lines = block_lines.iter().map(TextLine::to_line).collect();
            (seq, TextBlock::text(lines))
        })
        .collect();

    blocks.extend(
        content
            .images
            .into_iter()
            .map(|(seq, rect)| (seq, TextBlock::image(rect))),
    );
    blocks.sort_by_key(|(seq, _)| *seq);
    blocks.into_iter().map(|(_, block)| block).collect()
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
