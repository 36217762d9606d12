//! Unicode utilities for PDF text rendering
//!
//! The report uses the standard Helvetica faces with WinAnsiEncoding, which
//! covers every Spanish letter and punctuation mark the template needs.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// WinAnsi code points 0x80-0x9F that differ from Latin-1
fn winansi_special(ch: char) -> Option<u8> {
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Map one character to its WinAnsiEncoding byte, if it has one
pub fn winansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E => Some(code as u8),
        0xA0..=0xFF => Some(code as u8),
        _ => winansi_special(ch),
    }
}

/// Convert Unicode text to WinAnsiEncoding bytes
///
/// Characters outside the encoding are first stripped of diacritics
/// (`ą` becomes `a`); anything still unmappable becomes `?`. Control
/// characters, tabs included, become spaces.
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_control() {
            result.push(b' ');
            continue;
        }
        if let Some(byte) = winansi_byte(ch) {
            result.push(byte);
            continue;
        }
        let folded: Vec<u8> = fold_accents(&ch.to_string())
            .chars()
            .filter_map(winansi_byte)
            .collect();
        if folded.is_empty() {
            result.push(b'?');
        } else {
            result.extend(folded);
        }
    }
    result
}

/// Remove diacritics by canonical decomposition (`Peña` becomes `Pena`)
pub fn fold_accents(text: &str) -> String {
    text.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}
