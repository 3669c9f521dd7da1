//! Base-14 font metrics for layout measurement.
//!
//! The invoice layout centers and right-aligns text, which requires advance
//! widths. Both faces used by the layout are Base-14 fonts whose AFM
//! metrics are fixed by the PDF standard, so the widths are compiled in
//! (units of 1/1000 em, ASCII range). Characters outside the table measure
//! at the fallback width, matching how they are encoded (see
//! [`encode_win_ansi`]).

/// Advance width used for characters without a table entry.
const FALLBACK_WIDTH: u16 = 500;

/// Helvetica advance widths for `0x20..=0x7E`.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for `0x20..=0x7E`.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// The two faces the invoice layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica, the body face.
    Regular,
    /// Helvetica-Bold, for headings, labels, and the total row.
    Bold,
}

impl Font {
    /// PostScript base font name.
    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    /// Name under which the font is registered in page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// Width of a single character in font units (1/1000 em).
    pub fn char_width(&self, ch: char) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            table[(code - 0x20) as usize]
        } else {
            FALLBACK_WIDTH
        }
    }

    /// Width of a string in points at the given font size.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }

    /// Longest prefix of the text that fits within `max_width` points.
    pub fn truncate_to_width(&self, text: &str, size: f32, max_width: f32) -> String {
        let mut width = 0.0;
        let mut out = String::new();
        for ch in text.chars() {
            width += self.char_width(ch) as f32 * size / 1000.0;
            if width > max_width {
                break;
            }
            out.push(ch);
        }
        out
    }

    /// Greedy word wrap to a maximum line width in points.
    ///
    /// A single word wider than the limit gets a line of its own rather
    /// than being split mid-word.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if self.text_width(&candidate, size) <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Encode text as WinAnsi (CP1252) bytes for literal-string output.
///
/// ASCII and Latin-1 code points map directly; everything else degrades to
/// `?`. This is the visible fallback contract for currency symbols outside
/// the encoding (Ξ, ₿) rather than incidental mojibake.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            match code {
                0x20..=0x7E => code as u8,
                0xA0..=0xFF => code as u8,
                0x20AC => 0x80, // Euro sign has a WinAnsi slot
                _ => b'?',
            }
        })
        .collect()
}
