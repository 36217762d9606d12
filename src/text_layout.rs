//! Text layout and line breaking
//!
//! Greedy word wrapping measured with the Helvetica metrics. Words wider
//! than a whole line are split at character boundaries so nothing ever
//! overflows the column.

use crate::font_metrics::Font;

/// Wraps text into lines no wider than a column
#[derive(Debug, Clone, Copy)]
pub struct LineBreaker {
    font: Font,
    font_size: f64,
    max_width: f64,
    first_line_width: Option<f64>,
}

impl LineBreaker {
    pub fn new(font: Font, font_size: f64, max_width: f64) -> Self {
        Self {
            font,
            font_size,
            max_width,
            first_line_width: None,
        }
    }

    /// Use a narrower first line, e.g. when a label precedes the text
    pub fn with_first_line_width(mut self, width: f64) -> Self {
        self.first_line_width = Some(width);
        self
    }

    pub fn measure(&self, text: &str) -> f64 {
        self.font.text_width(text, self.font_size)
    }

    fn width_for_line(&self, index: usize) -> f64 {
        match (index, self.first_line_width) {
            (0, Some(width)) => width,
            _ => self.max_width,
        }
    }

    /// Break one paragraph into lines
    ///
    /// Whitespace runs collapse to a single space. Blank input yields one
    /// empty line.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if !current.is_empty() {
                let candidate = format!("{} {}", current, word);
                if self.measure(&candidate) <= self.width_for_line(lines.len()) {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }
            self.place_word(word, &mut lines, &mut current);
        }

        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    /// Start a fresh line with `word`, splitting it while it is too wide
    fn place_word(&self, word: &str, lines: &mut Vec<String>, current: &mut String) {
        let mut rest = word;
        while !rest.is_empty() {
            let limit = self.width_for_line(lines.len());
            if self.measure(rest) <= limit {
                *current = rest.to_string();
                return;
            }
            let split = self.fitting_prefix_len(rest, limit);
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
        }
    }

    /// Byte length of the longest prefix that fits, at least one char
    fn fitting_prefix_len(&self, word: &str, limit: f64) -> usize {
        let mut units = 0u32;
        let mut end = 0;
        for (offset, ch) in word.char_indices() {
            units += u32::from(self.font.char_width(ch));
            if f64::from(units) * self.font_size / 1000.0 > limit && end > 0 {
                break;
            }
            end = offset + ch.len_utf8();
        }
        end
    }

    /// Wrap text paragraph by paragraph (`\n` separated)
    ///
    /// Blank paragraphs come back as empty vectors so callers can render
    /// them as vertical gaps.
    pub fn wrap_paragraphs(&self, text: &str) -> Vec<Vec<String>> {
        text.split('\n')
            .map(|paragraph| {
                if paragraph.trim().is_empty() {
                    Vec::new()
                } else {
                    self.wrap(paragraph)
                }
            })
            .collect()
    }
}
