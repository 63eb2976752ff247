//! Approximate text metrics for the standard PDF fonts.
//!
//! Widths are in 1/1000 em, taken from the Helvetica AFM for ASCII 0x20..=0x7E.
//! Index = (char as usize) - 32. Other characters use the digit width.
//! Bold and serif faces are scaled from the same table; the error is small
//! enough for wrapping resume text inside a fixed cell width.

use crate::styles::FontDecoration;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const DEFAULT_WIDTH: u16 = 556;
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Font families the metrics distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFamily {
    Sans,
    Serif,
    Mono,
}

impl MetricFamily {
    /// Family of a PDF base font name.
    pub fn of_base_font(base_font: &str) -> Self {
        if base_font.starts_with("Courier") {
            MetricFamily::Mono
        } else if base_font.starts_with("Times") {
            MetricFamily::Serif
        } else {
            MetricFamily::Sans
        }
    }
}

fn char_width(c: char, family: MetricFamily) -> f32 {
    if family == MetricFamily::Mono {
        return 600.0;
    }
    let base = match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    } as f32;
    match family {
        MetricFamily::Serif => base * 0.92,
        _ => base,
    }
}

/// Width of `text` in millimetres at `size` points.
pub fn text_width_mm(text: &str, size: f32, family: MetricFamily, decoration: FontDecoration) -> f32 {
    let units: f32 = text.chars().map(|c| char_width(c, family)).sum();
    let scale = if decoration == FontDecoration::Bold && family != MetricFamily::Mono {
        1.06
    } else {
        1.0
    };
    units * scale / 1000.0 * size * MM_PER_PT
}

/// Greedy word wrap. Explicit newlines always break; words wider than
/// `max_width` are split between characters. Returns at least one line.
pub fn wrap_lines<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    let mut next = current.clone();
                    next.push(c);
                    if !current.is_empty() && measure(&next) > max_width {
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    } else {
                        current = next;
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_lines("the quick brown fox jumps", 10.0, by_chars);
        assert_eq!(lines, ["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_keeps_newlines_and_empty() {
        assert_eq!(wrap_lines("", 10.0, by_chars), [""]);
        assert_eq!(wrap_lines("a\nb", 10.0, by_chars), ["a", "b"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_lines("abcdefghij", 4.0, by_chars);
        assert_eq!(lines, ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_width_scales_with_size_and_weight() {
        let regular = text_width_mm("Resume", 8.0, MetricFamily::Sans, FontDecoration::Regular);
        let larger = text_width_mm("Resume", 16.0, MetricFamily::Sans, FontDecoration::Regular);
        let bold = text_width_mm("Resume", 8.0, MetricFamily::Sans, FontDecoration::Bold);
        assert!((larger - 2.0 * regular).abs() < 1e-4);
        assert!(bold > regular);
        assert_eq!(MetricFamily::of_base_font("Courier-Bold"), MetricFamily::Mono);
    }
}
