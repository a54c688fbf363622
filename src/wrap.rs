//! Greedy line filling shared by word wrapping and chip wrapping.

use std::ops::Range;

use crate::fonts::TextMeasure;
use crate::style::FontDescriptor;

/// Packs tokens of the given widths into lines no wider than `max_width`.
///
/// Tokens are accumulated while `width + gap + next` still fits; the first
/// token that overflows starts the next line.  A token wider than `max_width`
/// is never split: it occupies a line on its own.  Returns the index range of
/// each line.
pub fn pack_tokens(widths: &[f64], gap: f64, max_width: f64) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut line_width = 0.0;

    for (index, &width) in widths.iter().enumerate() {
        if index == start {
            line_width = width;
            continue;
        }

        if line_width + gap + width > max_width {
            lines.push(start..index);
            start = index;
            line_width = width;
        } else {
            line_width += gap + width;
        }
    }

    if start < widths.len() {
        lines.push(start..widths.len());
    }

    lines
}

/// Word-wraps `text` to `max_width` using `font`.
///
/// Runs of whitespace collapse to a single space.  Explicit newlines start a new
/// line; blank paragraphs are dropped.
pub fn wrap_text(
    text: &str,
    font: &FontDescriptor,
    measure: &dyn TextMeasure,
    max_width: f64,
) -> Vec<String> {
    let space = measure.text_width_mm(" ", font);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let widths: Vec<f64> = words
            .iter()
            .map(|word| measure.text_width_mm(word, font))
            .collect();

        lines.extend(
            pack_tokens(&widths, space, max_width)
                .into_iter()
                .map(|range| words[range].join(" ")),
        );
    }

    lines
}

/// Packs whole chip labels into rows no wider than `max_width`.
///
/// `padding` is the horizontal padding applied on each side of a label and
/// `gap` the distance between neighbouring chips.
pub fn pack_chips(
    labels: &[String],
    font: &FontDescriptor,
    measure: &dyn TextMeasure,
    padding: f64,
    gap: f64,
    max_width: f64,
) -> Vec<Vec<String>> {
    let widths: Vec<f64> = labels
        .iter()
        .map(|label| chip_width(label, font, measure, padding))
        .collect();

    pack_tokens(&widths, gap, max_width)
        .into_iter()
        .map(|range| labels[range].to_vec())
        .collect()
}

/// Outer width of a boxed chip.
pub fn chip_width(label: &str, font: &FontDescriptor, measure: &dyn TextMeasure, padding: f64) -> f64 {
    measure.text_width_mm(label, font) + 2.0 * padding
}
