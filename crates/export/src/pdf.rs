//! Page layout for text-only exports, rendered with `printpdf`.
//!
//! Lines are placed top to bottom on A4 pages using the built-in Helvetica
//! and Courier faces. Free text is only ever set in Courier, whose fixed
//! 600/1000 em advance makes wrapping exact; Helvetica is reserved for short
//! labels. Characters outside Latin-1 are dropped.

use std::collections::HashMap;

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 56.0;

const COURIER_ADVANCE: f32 = 0.6;
const LAYER: &str = "Layer 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    Courier,
}

impl Font {
    const ALL: [Font; 4] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::HelveticaOblique,
        Font::Courier,
    ];

    fn builtin(self) -> BuiltinFont {
        match self {
            Font::Helvetica => BuiltinFont::Helvetica,
            Font::HelveticaBold => BuiltinFont::HelveticaBold,
            Font::HelveticaOblique => BuiltinFont::HelveticaOblique,
            Font::Courier => BuiltinFont::Courier,
        }
    }
}

/// One positioned line of text. Coordinates are points from the bottom-left.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub font: Font,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Keep tab-expanded Latin-1 text; drop everything else.
pub fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| (0x20..=0xFF).contains(&(*c as u32)) && *c != '\u{7F}')
        .collect()
}

/// Lays out lines top to bottom, breaking pages as needed.
#[derive(Debug)]
pub struct Layout {
    pages: Vec<Vec<PlacedLine>>,
    cursor: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Usable text width in points.
    pub fn text_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// Number of Courier glyphs at `size` that fit on one line.
    pub fn courier_chars_per_line(size: f32) -> usize {
        ((Self::text_width() / (COURIER_ADVANCE * size)) as usize).max(1)
    }

    /// Move down by `points` without drawing.
    pub fn skip(&mut self, points: f32) {
        self.cursor -= points;
    }

    /// Place a single unwrapped line. Meant for short labels.
    pub fn label(&mut self, font: Font, size: f32, leading: f32, text: &str) {
        self.place(font, size, leading, printable(text));
    }

    /// Place `text` in Courier, wrapped at word boundaries to the text width.
    pub fn monospace(&mut self, size: f32, leading: f32, text: &str) {
        let width = Self::courier_chars_per_line(size);
        for piece in wrap(&printable(text), width) {
            self.place(Font::Courier, size, leading, piece);
        }
    }

    fn place(&mut self, font: Font, size: f32, leading: f32, text: String) {
        if self.cursor - leading < MARGIN {
            self.pages.push(Vec::new());
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
        self.cursor -= leading;

        let y = self.cursor;
        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                font,
                size,
                x: MARGIN,
                y,
                text,
            });
        }
    }

    pub fn pages(&self) -> &[Vec<PlacedLine>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Render the laid-out pages as PDF bytes.
    pub fn render(&self, title: &str) -> Result<Vec<u8>, printpdf::Error> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER);

        let mut fonts = HashMap::new();
        for font in Font::ALL {
            fonts.insert(font, doc.add_builtin_font(font.builtin())?);
        }

        for (index, lines) in self.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER)
            };
            let layer = doc.get_page(page).get_layer(layer);
            for line in lines {
                if let Some(font) = fonts.get(&line.font) {
                    layer.use_text(line.text.clone(), line.size, mm(line.x), mm(line.y), font);
                }
            }
        }

        doc.save_to_bytes()
    }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

/// Greedy word wrap to at most `width` chars per piece. Words longer than
/// `width` are split hard. Empty input yields one empty piece.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while chars.len() - start > width {
        let window = &chars[start..=start + width];
        match window.iter().rposition(|c| *c == ' ').filter(|at| *at > 0) {
            Some(at) => {
                pieces.push(window[..at].iter().collect());
                start += at + 1;
            }
            None => {
                pieces.push(window[..width].iter().collect());
                start += width;
            }
        }
    }
    pieces.push(chars[start..].iter().collect());
    pieces
}
