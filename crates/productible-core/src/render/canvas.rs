use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

/// Landscape US Letter, in points.
pub const PAGE_WIDTH: f32 = 792.0;
pub const PAGE_HEIGHT: f32 = 612.0;
pub const MARGIN: f32 = 72.0;

pub const TOP: f32 = PAGE_HEIGHT - MARGIN;
pub const BOTTOM: f32 = MARGIN;

pub type Rgb = (f32, f32, f32);

pub const BLACK: Rgb = (0.0, 0.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name in the page's font dictionary.
    pub fn resource(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }
}

/// Approximate advance width of `text` in Helvetica, in points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            ' ' | '.' | ',' | ':' | ';' | 'i' | 'l' | 'j' | '\'' | '|' => 0.278,
            'f' | 't' | 'r' | 'I' | '/' | '(' | ')' | '-' | '°' => 0.333,
            '0'..='9' | '_' | '²' => 0.556,
            'm' | 'M' | 'W' | 'w' => 0.833,
            c if c.is_uppercase() => 0.667,
            _ => 0.53,
        })
        .sum();
    let weight = match font {
        Font::Regular => 1.0,
        Font::Bold => 1.06,
    };
    em * size * weight
}

/// Encode text for a standard font with WinAnsiEncoding.
///
/// Latin-1 characters map to the same byte; anything else becomes '?'.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            0x20ac => 0x80,
            0x2019 => 0x92,
            0x2013 => 0x96,
            0x2014 => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Page-by-page drawing surface with a top-down cursor.
pub struct Canvas {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Baseline of the next block, measured from the page bottom.
    pub y: f32,
}

impl Canvas {
    pub fn new() -> Self {
        Canvas {
            pages: Vec::new(),
            ops: Vec::new(),
            y: TOP,
        }
    }

    /// Start a new page unless the current one is still blank.
    pub fn page_break(&mut self) {
        if !self.ops.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.y = TOP;
    }

    /// Break the page if a block of `height` would cross the bottom margin.
    pub fn ensure_room(&mut self, height: f32) {
        if self.y - height < BOTTOM {
            self.page_break();
        }
    }

    pub fn space(&mut self, height: f32) {
        self.y -= height;
    }

    /// Draw runs of text that continue one after the other on a baseline.
    pub fn text_runs(&mut self, x: f32, baseline: f32, runs: &[(Font, f32, &str)]) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Td", vec![x.into(), baseline.into()]));
        for (font, size, text) in runs {
            self.ops.push(Operation::new(
                "Tf",
                vec![Object::Name(font.resource().to_vec()), (*size).into()],
            ));
            self.ops.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ));
        }
        self.ops.push(Operation::new("ET", vec![]));
    }

    pub fn text(&mut self, x: f32, baseline: f32, font: Font, size: f32, text: &str) {
        self.text_runs(x, baseline, &[(font, size, text)]);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), w.into(), h.into()],
        ));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "RG",
            vec![BLACK.0.into(), BLACK.1.into(), BLACK.2.into()],
        ));
        self.ops.push(Operation::new("w", vec![width.into()]));
        self.ops
            .push(Operation::new("m", vec![from.0.into(), from.1.into()]));
        self.ops.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Paint a named image XObject into the given box.
    pub fn image(&mut self, name: &[u8], x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                w.into(),
                0.0f32.into(),
                0.0f32.into(),
                h.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops
            .push(Operation::new("Do", vec![Object::Name(name.to_vec())]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Operations of every page drawn so far, the current one included.
    pub fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.pages
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
