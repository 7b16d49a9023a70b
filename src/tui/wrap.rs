use unicode_segmentation::UnicodeSegmentation;

use crate::util::unicode::{display_width, grapheme_display_width};

/// Word-wrap `text` into rows at most `width` cells wide.
///
/// Breaks at whitespace (which is dropped at row edges); a word wider than
/// the row is split by grapheme. Explicit newlines always start a new row.
/// Empty input yields no rows.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, width.max(1), &mut rows);
    }
    while rows.last().is_some_and(|r: &String| r.is_empty()) {
        rows.pop();
    }
    rows
}

fn wrap_paragraph(paragraph: &str, width: usize, rows: &mut Vec<String>) {
    let mut row = String::new();
    let mut row_w = 0;

    for word in paragraph.split_whitespace() {
        let word_w = display_width(word);
        let sep = usize::from(row_w > 0);

        if row_w + sep + word_w <= width {
            if sep == 1 {
                row.push(' ');
            }
            row.push_str(word);
            row_w += sep + word_w;
            continue;
        }

        if row_w > 0 {
            rows.push(std::mem::take(&mut row));
            row_w = 0;
        }

        if word_w <= width {
            row.push_str(word);
            row_w = word_w;
            continue;
        }

        // Too wide for any row: split by grapheme
        for g in word.graphemes(true) {
            let gw = grapheme_display_width(g);
            if row_w + gw > width && row_w > 0 {
                rows.push(std::mem::take(&mut row));
                row_w = 0;
            }
            row.push_str(g);
            row_w += gw;
        }
    }
    rows.push(row);
}
