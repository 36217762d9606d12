//! Standard-14 Helvetica faces and their advance widths
//!
//! Widths come from the Adobe core font metrics (units of 1/1000 em), so
//! line breaking measures text exactly as a viewer will lay it out.

use pdf_writer::Name;

use crate::unicode_utils::fold_accents;

/// The two faces the report template draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name used in page content streams
    pub fn resource_name(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }

    pub fn base_font(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"Helvetica"),
            Font::Bold => Name(b"Helvetica-Bold"),
        }
    }

    fn ascii_widths(self) -> &'static [u16; 95] {
        match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_width(self, ch: char) -> u16 {
        if let Some(width) = self.ascii_width(ch) {
            return width;
        }
        match (self, ch) {
            (_, 'í' | 'ì' | 'î' | 'ï') => 278,
            (Font::Regular, 'Í' | 'Ì' | 'Î' | 'Ï') => 278,
            (Font::Bold, 'Í' | 'Ì' | 'Î' | 'Ï') => 278,
            (_, '¿') => 611,
            (_, '¡') => 333,
            (_, '–' | '€' | '\u{a0}') => 556,
            (_, '—' | '…' | '‰') => 1000,
            (_, '°') => 400,
            (_, '•') => 350,
            (_, '×' | '÷' | '±' | '¬') => 584,
            (_, 'ª') => 370,
            (_, 'º') => 365,
            (Font::Regular, '\u{2018}' | '\u{2019}' | '‚') => 222,
            (Font::Bold, '\u{2018}' | '\u{2019}' | '‚') => 278,
            (Font::Regular, '\u{201C}' | '\u{201D}' | '„') => 333,
            (Font::Bold, '\u{201C}' | '\u{201D}' | '„') => 500,
            _ => fold_accents(&ch.to_string())
                .chars()
                .next()
                .and_then(|base| self.ascii_width(base))
                .unwrap_or(556),
        }
    }

    fn ascii_width(self, ch: char) -> Option<u16> {
        let code = ch as u32;
        (0x20..=0x7E)
            .contains(&code)
            .then(|| self.ascii_widths()[(code - 0x20) as usize])
    }

    /// Width of `text` in points at `size`
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| u32::from(self.char_width(ch))).sum();
        f64::from(units) * size / 1000.0
    }
}

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
