use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_display_width).sum()
}

/// Display width of a grapheme cluster.
pub fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // room for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = grapheme_display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Pad `s` with spaces on the right to exactly `cells` wide (truncating if longer).
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let t = truncate_to_width(s, cells);
    let w = display_width(&t);
    format!("{}{}", t, " ".repeat(cells.saturating_sub(w)))
}

/// Remove the last grapheme cluster of `s`.
pub fn pop_grapheme(s: &mut String) {
    if let Some((i, _)) = s.grapheme_indices(true).next_back() {
        s.truncate(i);
    }
}

/// Remove the last whitespace-delimited word of `s`, along with trailing spaces.
pub fn pop_word(s: &mut String) {
    let trimmed = s.trim_end().len();
    let start = s[..trimmed]
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + s[i..].chars().next().map_or(1, char::len_utf8));
    s.truncate(start);
}
