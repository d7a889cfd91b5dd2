//! PDF builder
//!
//! Lays out A4 pages with the standard Helvetica and Courier fonts. Text is
//! sanitized to Latin-1 before measuring, so layout never fails on content.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};

use super::sanitize::{encode_latin1, sanitize_latin1};
use super::{DocumentBuilder, DocumentHeader, DocumentKind, MethodSection};
use crate::constants::generation;
use crate::types::{ParameterInfo, Result};

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN_X: f32 = 56.0;
const CONTENT_TOP: f32 = PAGE_HEIGHT - 72.0;
const CONTENT_BOTTOM: f32 = 64.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;

const RUNNING_HEADER: &str = "API Documentation";

const BODY_SIZE: f32 = 10.5;
const BODY_LEADING: f32 = 14.0;
const TITLE_SIZE: f32 = 13.0;
const TITLE_BAND: f32 = 20.0;
const CODE_SIZE: f32 = 9.0;
const CODE_LEADING: f32 = 11.5;
const BAND_PADDING: f32 = 6.0;

const TITLE_FILL: (f32, f32, f32) = (0.82, 0.90, 0.98);
const CODE_FILL: (f32, f32, f32) = (0.94, 0.94, 0.94);

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    fn resource_name(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
            Font::Mono => Name(b"F3"),
        }
    }

    fn base_font(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"Helvetica"),
            Font::Bold => Name(b"Helvetica-Bold"),
            Font::Mono => Name(b"Courier"),
        }
    }

    /// Advance width of one character in em units
    fn char_width(self, c: char) -> f32 {
        match self {
            Font::Regular => helvetica_width(c),
            Font::Bold => helvetica_width(c) * 1.06,
            Font::Mono => 0.6,
        }
    }

    fn text_width(self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c)).sum::<f32>() * size
    }
}

/// Approximate Helvetica advance widths, grouped by glyph shape
fn helvetica_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' | '!' => 0.24,
        'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '-' | '/' => 0.32,
        'm' | 'M' | 'W' => 0.84,
        'w' => 0.72,
        'A'..='Z' | '@' | '%' | '&' => 0.68,
        _ => 0.56,
    }
}

/// Greedy word wrap; words wider than a line are split across lines
fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let space = font.char_width(' ') * size;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunk = String::new();
            for c in word.chars() {
                if !chunk.is_empty()
                    && font.text_width(&chunk, size) + font.char_width(c) * size > max_width
                {
                    lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(c);
            }
            current = chunk;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if font.text_width(&current, size) + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a code line into fixed-width chunks, keeping indentation
fn wrap_code_line(line: &str, max_chars: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

struct PageState {
    id: Ref,
    content_id: Ref,
    content: Content,
}

pub struct PdfBuilder {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    page_tree_id: Ref,
    info_id: Ref,
    font_ids: [Ref; 3],
    pages: Vec<Ref>,
    current: Option<PageState>,
    cursor_y: f32,
    title: String,
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            pdf: Pdf::new(),
            next_id: 1,
            catalog_id: Ref::new(1),
            page_tree_id: Ref::new(1),
            info_id: Ref::new(1),
            font_ids: [Ref::new(1); 3],
            pages: Vec::new(),
            current: None,
            cursor_y: CONTENT_TOP,
            title: RUNNING_HEADER.to_string(),
        };
        builder.catalog_id = builder.alloc();
        builder.page_tree_id = builder.alloc();
        builder.info_id = builder.alloc();
        builder.font_ids = [builder.alloc(), builder.alloc(), builder.alloc()];
        builder
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn new_page(&mut self) {
        self.close_page();

        let id = self.alloc();
        let content_id = self.alloc();
        let page_number = self.pages.len() + 1;
        let mut content = Content::new();

        draw_text(
            &mut content,
            Font::Regular,
            8.0,
            MARGIN_X,
            PAGE_HEIGHT - 40.0,
            RUNNING_HEADER,
        );
        let footer = format!("Page {}", page_number);
        let footer_x = (PAGE_WIDTH - Font::Regular.text_width(&footer, 8.0)) / 2.0;
        draw_text(&mut content, Font::Regular, 8.0, footer_x, 30.0, &footer);

        self.current = Some(PageState {
            id,
            content_id,
            content,
        });
        self.cursor_y = CONTENT_TOP;
    }

    fn close_page(&mut self) {
        use pdf_writer::Finish;

        let Some(page) = self.current.take() else {
            return;
        };

        self.pdf.stream(page.content_id, &page.content.finish());

        let mut writer = self.pdf.page(page.id);
        writer.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        writer.parent(self.page_tree_id);
        writer.contents(page.content_id);
        writer
            .resources()
            .fonts()
            .pair(Font::Regular.resource_name(), self.font_ids[0])
            .pair(Font::Bold.resource_name(), self.font_ids[1])
            .pair(Font::Mono.resource_name(), self.font_ids[2]);
        writer.finish();

        self.pages.push(page.id);
    }

    fn draw(&mut self, op: impl FnOnce(&mut Content)) {
        if self.current.is_none() {
            self.new_page();
        }
        if let Some(page) = self.current.as_mut() {
            op(&mut page.content);
        }
    }

    fn ensure_space(&mut self, height: f32) {
        if self.current.is_none() || self.cursor_y - height < CONTENT_BOTTOM {
            self.new_page();
        }
    }

    fn space(&mut self, height: f32) {
        self.cursor_y -= height;
    }

    fn chapter_title(&mut self, text: &str) {
        let text = sanitize_latin1(text);
        let lines = wrap_text(
            &text,
            Font::Bold,
            TITLE_SIZE,
            CONTENT_WIDTH - 2.0 * BAND_PADDING,
        );

        self.space(4.0);
        for line in lines {
            self.ensure_space(TITLE_BAND);
            let y = self.cursor_y;
            self.draw(|content| {
                fill_band(content, y - TITLE_BAND, TITLE_BAND, TITLE_FILL);
                draw_text(
                    content,
                    Font::Bold,
                    TITLE_SIZE,
                    MARGIN_X + BAND_PADDING,
                    y - TITLE_BAND + 6.0,
                    &line,
                );
            });
            self.cursor_y -= TITLE_BAND;
        }
        self.space(8.0);
    }

    fn body_with(&mut self, text: &str, font: Font) {
        let text = sanitize_latin1(text);

        for paragraph in text.split('\n') {
            if paragraph.trim().is_empty() {
                self.space(BODY_LEADING / 2.0);
                continue;
            }
            for line in wrap_text(paragraph, font, BODY_SIZE, CONTENT_WIDTH) {
                self.ensure_space(BODY_LEADING);
                let baseline = self.cursor_y - BODY_SIZE;
                self.draw(|content| {
                    draw_text(content, font, BODY_SIZE, MARGIN_X, baseline, &line)
                });
                self.cursor_y -= BODY_LEADING;
            }
        }
        self.space(4.0);
    }

    fn body(&mut self, text: &str) {
        self.body_with(text, Font::Regular);
    }

    fn code_block(&mut self, code: &str) {
        let code = sanitize_latin1(code);
        let max_chars =
            ((CONTENT_WIDTH - 2.0 * BAND_PADDING) / (Font::Mono.char_width(' ') * CODE_SIZE))
                as usize;

        for source_line in code.split('\n') {
            for line in wrap_code_line(source_line, max_chars) {
                self.ensure_space(CODE_LEADING);
                let y = self.cursor_y;
                self.draw(|content| {
                    fill_band(content, y - CODE_LEADING, CODE_LEADING, CODE_FILL);
                    draw_text(
                        content,
                        Font::Mono,
                        CODE_SIZE,
                        MARGIN_X + BAND_PADDING,
                        y - CODE_LEADING + 3.0,
                        &line,
                    );
                });
                self.cursor_y -= CODE_LEADING;
            }
        }
        self.space(8.0);
    }

    fn parameters(&mut self, parameters: &[ParameterInfo]) {
        if parameters.is_empty() {
            return;
        }
        self.body_with("Parameters", Font::Bold);
        for param in parameters {
            let mut qualifiers = Vec::new();
            if let Some(kind) = &param.param_type {
                qualifiers.push(kind.as_str());
            }
            if let Some(location) = &param.location {
                qualifiers.push(location.as_str());
            }
            if param.required {
                qualifiers.push("required");
            }
            let line = if qualifiers.is_empty() {
                format!("- {}: {}", param.name, param.description)
            } else {
                format!(
                    "- {} ({}): {}",
                    param.name,
                    qualifiers.join(", "),
                    param.description
                )
            };
            self.body(&line);
        }
    }
}

/// Draw one line of already-sanitized text with its baseline at `y`
fn draw_text(content: &mut Content, font: Font, size: f32, x: f32, y: f32, text: &str) {
    content.set_fill_rgb(0.0, 0.0, 0.0);
    content.begin_text();
    content.set_font(font.resource_name(), size);
    content.next_line(x, y);
    content.show(Str(&encode_latin1(text)));
    content.end_text();
}

fn fill_band(content: &mut Content, y: f32, height: f32, (r, g, b): (f32, f32, f32)) {
    content.set_fill_rgb(r, g, b);
    content.rect(MARGIN_X, y, CONTENT_WIDTH, height);
    content.fill_nonzero();
}

/// Placeholders are Markdown-emphasized for the notebook; the PDF shows them plain
fn plain_placeholder(placeholder: &str) -> &str {
    placeholder.trim_matches('*')
}

impl DocumentBuilder for PdfBuilder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn header(&mut self, header: &DocumentHeader) {
        self.title = format!("{} API Documentation", header.api_name);
        self.new_page();
        self.chapter_title(&format!("{} API Documentation", header.api_name));
        self.body(&format!(
            "{}\nVersion: {}\nGenerated: {}",
            header.api_title, header.display_version, header.generated_on
        ));
        if let Some(description) = &header.description {
            self.body(description);
        }
    }

    fn intro(&mut self, text: Option<&str>) {
        self.chapter_title("API Overview");
        let body = text.unwrap_or_else(|| plain_placeholder(generation::INTRO_PLACEHOLDER));
        self.body(body);
    }

    fn method(&mut self, section: &MethodSection<'_>) {
        let method = section.method;
        self.new_page();
        self.chapter_title(&format!("Endpoint: {}", method.full_name));
        self.body(&format!("HTTP Method: {}", method.http_method));
        self.body(&format!("Path: {}", method.path));
        self.body(&format!("Description: {}", method.description));
        self.parameters(&method.parameters);

        self.chapter_title("AI-Generated Documentation");
        let narrative = match &section.narrative {
            Some(text) => text.as_str(),
            None => plain_placeholder(generation::NARRATIVE_PLACEHOLDER),
        };
        self.body(narrative);

        self.chapter_title("Example Code");
        self.code_block(section.example_text());
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.current.is_none() && self.pages.is_empty() {
            self.new_page();
        }
        self.close_page();

        let page_count = self.pages.len() as i32;
        self.pdf.catalog(self.catalog_id).pages(self.page_tree_id);
        self.pdf
            .pages(self.page_tree_id)
            .kids(self.pages.iter().copied())
            .count(page_count);

        for (font, id) in [Font::Regular, Font::Bold, Font::Mono]
            .into_iter()
            .zip(self.font_ids)
        {
            self.pdf
                .type1_font(id)
                .base_font(font.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        self.pdf
            .document_info(self.info_id)
            .title(TextStr(&self.title))
            .creator(TextStr(env!("CARGO_PKG_NAME")));

        Ok(self.pdf.finish())
    }
}
