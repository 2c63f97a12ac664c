//! Page layout for the PDF story.
//!
//! Positions are in millimetres from the bottom-left corner of an A4
//! page, with y at the text baseline. Text width is estimated from an
//! average glyph width, which is enough to keep wrapped cells inside
//! their columns with the built-in fonts.

use super::story::Block;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// 0.75 in
pub const MARGIN_MM: f32 = 19.05;

const PT_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.25;
const FOOTER_MM: f32 = 8.0;
const CELL_PADDING_MM: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Regular,
    Bold,
    Mono,
}

impl FontKind {
    /// Average glyph width as a fraction of the font size
    fn width_factor(self) -> f32 {
        match self {
            FontKind::Regular => 0.5,
            FontKind::Bold => 0.55,
            FontKind::Mono => 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub font: FontKind,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<TextItem>,
}

impl Page {
    /// All text on the page, one item per line
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn content_width() -> f32 {
    PAGE_WIDTH_MM - 2.0 * MARGIN_MM
}

fn content_height() -> f32 {
    PAGE_HEIGHT_MM - 2.0 * MARGIN_MM - FOOTER_MM
}

fn line_height(size_pt: f32) -> f32 {
    size_pt * PT_MM * LINE_SPACING
}

/// Characters of `font` at `size_pt` that fit in `width_mm`
fn chars_per_line(width_mm: f32, size_pt: f32, font: FontKind) -> usize {
    let glyph = size_pt * PT_MM * font.width_factor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (width_mm / glyph).floor().max(1.0) as usize;
    count
}

/// Greedy word wrap on character counts.
///
/// Words longer than a line are split. Empty input yields one empty line.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max {
            if len > 0 {
                lines.push(std::mem::take(&mut current));
                len = 0;
            }
            let rest = chars.split_off(max);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        if len > 0 && len + 1 + chars.len() > max {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        len += chars.len();
        current.extend(chars);
    }

    if len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

struct Style {
    size_pt: f32,
    font: FontKind,
    space_before_mm: f32,
}

const TITLE: Style = Style { size_pt: 24.0, font: FontKind::Bold, space_before_mm: 4.0 };
const HEADING: Style = Style { size_pt: 16.0, font: FontKind::Bold, space_before_mm: 4.0 };
const SUB_HEADING: Style = Style { size_pt: 14.0, font: FontKind::Bold, space_before_mm: 3.0 };
const MINOR: Style = Style { size_pt: 12.0, font: FontKind::Bold, space_before_mm: 2.0 };
const PARAGRAPH: Style = Style { size_pt: 10.0, font: FontKind::Regular, space_before_mm: 0.5 };
const CODE: Style = Style { size_pt: 8.0, font: FontKind::Mono, space_before_mm: 1.0 };
const CELL_SIZE_PT: f32 = 9.0;

struct Layout {
    pages: Vec<Page>,
    /// Distance from the top of the content area
    cursor_mm: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor_mm: 0.0,
        }
    }

    fn page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn page_is_empty(&self) -> bool {
        self.pages.last().is_none_or(|p| p.items.is_empty())
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_mm = 0.0;
    }

    fn page_break(&mut self) {
        if self.page_is_empty() {
            self.cursor_mm = 0.0;
        } else {
            self.new_page();
        }
    }

    /// Starts a new page unless `height` fits below the cursor
    fn ensure(&mut self, height: f32) {
        if self.cursor_mm + height > content_height() && !self.page_is_empty() {
            self.new_page();
        }
    }

    fn baseline(&self, size_pt: f32) -> f32 {
        PAGE_HEIGHT_MM - MARGIN_MM - self.cursor_mm - size_pt * PT_MM
    }

    fn place(&mut self, x_mm: f32, size_pt: f32, font: FontKind, text: String) {
        let y_mm = self.baseline(size_pt);
        self.page().items.push(TextItem {
            x_mm,
            y_mm,
            size_pt,
            font,
            text,
        });
    }

    fn spacer(&mut self, mm: f32) {
        self.cursor_mm = (self.cursor_mm + mm).min(content_height());
    }

    fn text(&mut self, style: &Style, text: &str, indent_mm: f32) {
        if !self.page_is_empty() {
            self.spacer(style.space_before_mm);
        }
        let width = content_width() - indent_mm;
        let max_chars = chars_per_line(width, style.size_pt, style.font);
        let height = line_height(style.size_pt);

        let lines: Vec<String> = if style.font == FontKind::Mono {
            text.lines().flat_map(|l| wrap(l, max_chars)).collect()
        } else {
            wrap(text, max_chars)
        };

        for line in lines {
            self.ensure(height);
            self.place(MARGIN_MM + indent_mm, style.size_pt, style.font, line);
            self.cursor_mm += height;
        }
    }

    fn row(&mut self, cells: &[Vec<String>], widths_mm: &[f32], font: FontKind) {
        let height = line_height(CELL_SIZE_PT);
        let mut x = MARGIN_MM;
        for (lines, width) in cells.iter().zip(widths_mm) {
            for (n, line) in lines.iter().enumerate() {
                let y_mm = self.baseline(CELL_SIZE_PT) - n as f32 * height - CELL_PADDING_MM;
                self.page().items.push(TextItem {
                    x_mm: x + CELL_PADDING_MM,
                    y_mm,
                    size_pt: CELL_SIZE_PT,
                    font,
                    text: line.clone(),
                });
            }
            x += width;
        }
        self.cursor_mm += row_height(cells);
    }

    /// Cell lines that fit in one row below the cursor
    fn row_lines_available(&self) -> usize {
        let free = content_height() - self.cursor_mm - 2.0 * CELL_PADDING_MM;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lines = (free / line_height(CELL_SIZE_PT)).floor().max(0.0) as usize;
        lines
    }

    /// Places one body row, continuing it on following pages when it
    /// is taller than a page.
    fn body_row(
        &mut self,
        mut cells: Vec<Vec<String>>,
        header: &[Vec<String>],
        widths_mm: &[f32],
    ) {
        let header_height = row_height(header);
        let mut fresh_page = false;
        loop {
            let height = row_height(&cells);
            if self.cursor_mm + height <= content_height() {
                self.row(&cells, widths_mm, FontKind::Regular);
                return;
            }
            let fits_on_new_page = header_height + height <= content_height();
            if !fresh_page && (fits_on_new_page || self.row_lines_available() == 0) {
                self.new_page();
                self.row(header, widths_mm, FontKind::Bold);
                fresh_page = true;
                continue;
            }

            // Always place at least one line
            let take = self.row_lines_available().max(1);
            let rest: Vec<Vec<String>> = cells
                .iter_mut()
                .map(|lines| lines.split_off(take.min(lines.len())))
                .collect();
            self.row(&cells, widths_mm, FontKind::Regular);
            cells = rest;
            self.new_page();
            self.row(header, widths_mm, FontKind::Bold);
            fresh_page = true;
        }
    }

    fn table(&mut self, header: &[String], rows: &[Vec<String>], widths_mm: &[f32]) {
        let wrap_cells = |cells: &[String], font: FontKind| -> Vec<Vec<String>> {
            cells
                .iter()
                .zip(widths_mm)
                .map(|(cell, width)| {
                    let inner = (width - 2.0 * CELL_PADDING_MM).max(1.0);
                    wrap(cell, chars_per_line(inner, CELL_SIZE_PT, font))
                })
                .collect()
        };

        let header_cells = wrap_cells(header, FontKind::Bold);
        let header_height = row_height(&header_cells);

        if !self.page_is_empty() {
            self.spacer(1.0);
        }
        let one_line = line_height(CELL_SIZE_PT) + 2.0 * CELL_PADDING_MM;
        let first_height = rows
            .first()
            .map(|r| row_height(&wrap_cells(r, FontKind::Regular)))
            .map_or(0.0, |h| {
                if header_height + h > content_height() { one_line } else { h }
            });
        self.ensure(header_height + first_height);
        self.row(&header_cells, widths_mm, FontKind::Bold);

        for cells in rows {
            self.body_row(wrap_cells(cells, FontKind::Regular), &header_cells, widths_mm);
        }
    }
}

fn row_height(cells: &[Vec<String>]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f32 * line_height(CELL_SIZE_PT) + 2.0 * CELL_PADDING_MM
}

/// Lays a story out on A4 pages.
///
/// Always returns at least one page. When `page_numbers` is set each
/// page gets a "Page n of m" footer.
pub fn layout(story: &[Block], page_numbers: bool) -> Vec<Page> {
    let mut layout = Layout::new();

    for block in story {
        match block {
            Block::Title(text) => layout.text(&TITLE, text, 0.0),
            Block::Heading(text) => layout.text(&HEADING, text, 0.0),
            Block::SubHeading(text) => layout.text(&SUB_HEADING, text, 0.0),
            Block::Minor(text) => layout.text(&MINOR, text, 0.0),
            Block::Paragraph(text) => layout.text(&PARAGRAPH, text, 0.0),
            Block::Code(text) => layout.text(&CODE, text, 3.5),
            Block::Table {
                header,
                rows,
                widths_mm,
            } => layout.table(header, rows, widths_mm),
            Block::Spacer(mm) => layout.spacer(*mm),
            Block::PageBreak => layout.page_break(),
        }
    }

    let mut pages = layout.pages;
    if pages.len() > 1 && pages.last().is_some_and(|p| p.items.is_empty()) {
        pages.pop();
    }

    if page_numbers {
        let total = pages.len();
        for (i, page) in pages.iter_mut().enumerate() {
            let text = format!("Page {} of {}", i + 1, total);
            let width =
                text.chars().count() as f32 * 8.0 * PT_MM * FontKind::Regular.width_factor();
            page.items.push(TextItem {
                x_mm: (PAGE_WIDTH_MM - width) / 2.0,
                y_mm: MARGIN_MM / 2.0,
                size_pt: 8.0,
                font: FontKind::Regular,
                text,
            });
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 10), vec![String::new()]);
        assert_eq!(wrap("  spaced   out  ", 20), vec!["spaced out"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn test_wrap_respects_limit() {
        let text = "SELECT c.customer_id, c.first_name FROM customers c LEFT JOIN orders o";
        for line in wrap(text, 12) {
            assert!(line.chars().count() <= 12, "{line}");
        }
    }

    #[test]
    fn test_layout_empty_story_has_one_page() {
        let pages = layout(&[], true);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text(), "Page 1 of 1");
    }

    #[test]
    fn test_layout_page_break_skips_empty_pages() {
        let story = vec![
            Block::PageBreak,
            Block::Paragraph("first".to_string()),
            Block::PageBreak,
            Block::PageBreak,
            Block::Paragraph("second".to_string()),
            Block::PageBreak,
        ];
        let pages = layout(&story, false);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text(), "first");
        assert_eq!(pages[1].text(), "second");
    }

    #[test]
    fn test_layout_long_table_repeats_header() {
        let rows = (0..120).map(|i| vec![format!("row{}", i), "x".to_string()]).collect();
        let story = vec![Block::Table {
            header: vec!["Name".to_string(), "Value".to_string()],
            rows,
            widths_mm: vec![50.0, 50.0],
        }];
        let pages = layout(&story, false);

        assert!(pages.len() > 1);
        for page in &pages {
            assert_eq!(page.items[0].text, "Name");
            for item in &page.items {
                assert!(item.y_mm >= MARGIN_MM, "{} at {}", item.text, item.y_mm);
            }
        }
        let cells: usize = pages
            .iter()
            .map(|p| p.items.iter().filter(|i| i.text.starts_with("row")).count())
            .sum();
        assert_eq!(cells, 120);
    }

    #[test]
    fn test_layout_splits_row_taller_than_page() {
        let story = vec![Block::Table {
            header: vec!["Property".to_string(), "Value".to_string()],
            rows: vec![
                vec!["Schema".to_string(), "word ".repeat(4000)],
                vec!["Type".to_string(), "BASE TABLE".to_string()],
            ],
            widths_mm: vec![40.0, 100.0],
        }];
        let pages = layout(&story, false);

        assert!(pages.len() > 1);
        for page in &pages {
            assert_eq!(page.items[0].text, "Property");
            for item in &page.items {
                assert!(item.y_mm >= MARGIN_MM, "{} at {}", item.text, item.y_mm);
            }
        }
        let words: usize = pages
            .iter()
            .flat_map(|p| &p.items)
            .map(|i| i.text.matches("word").count())
            .sum();
        assert_eq!(words, 4000);
        let last = pages.last().map(Page::text).unwrap_or_default();
        assert!(last.contains("BASE TABLE"));
    }

    #[test]
    fn test_layout_wraps_paragraph_within_width() {
        let story = vec![Block::Paragraph("word ".repeat(200))];
        let pages = layout(&story, false);
        let max = chars_per_line(content_width(), PARAGRAPH.size_pt, PARAGRAPH.font);
        assert!(pages[0].items.len() > 1);
        for item in &pages[0].items {
            assert!(item.text.chars().count() <= max);
        }
    }
}
