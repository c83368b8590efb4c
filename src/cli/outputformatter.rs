use terminal_size::{terminal_size, Height, Width};

/// Render rows as an ASCII table sized to the current terminal.
pub fn render_table(cols: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let termw = get_terminal_width();
    crate::tprintln!("[cli.outputformatter] detected terminal width={} columns", termw);
    format_table(cols, rows, termw)
}

/// Render rows as an ASCII table no wider than `termw` visible characters.
/// Numeric-looking cells are right-aligned; the header is coloured green.
pub fn format_table(cols: &[String], rows: &[Vec<String>], termw: usize) -> Vec<String> {
    let mut widths: Vec<usize> = cols.iter().map(|s| visible_len(s).min(termw)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(cols.len()) {
            let w = visible_len(cell);
            if w > widths[i] { widths[i] = w.min(termw); }
        }
    }

    let sep = build_separator(&widths);
    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(fit_line_to_width(&sep, termw));
    out.push(fit_line_to_width(&build_row_header_colored(cols, &widths), termw));
    out.push(fit_line_to_width(&sep, termw));
    for r in rows {
        out.push(fit_line_to_width(&build_row(r, &widths), termw));
    }
    out.push(fit_line_to_width(&sep, termw));
    out
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let (text, align_right) = (truncate(&cell, *w), is_numeric_like(&cell));
        let pad = w.saturating_sub(visible_len(&text));
        s.push(' ');
        if align_right {
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

// Header cells in green; padding is computed from the visible width.
fn build_row_header_colored(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        s.push(' ');
        s.push_str(&format!("\x1b[32m{}\x1b[0m", text));
        s.push_str(&" ".repeat(w.saturating_sub(visible_len(&text))));
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    s.chars().take(max - 1).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to right
    let st = s.trim().trim_end_matches('%');
    if st.is_empty() { return false; }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() { has_digit = true; continue; }
        if ".-+eE,_".contains(ch) { continue; }
        return false;
    }
    has_digit
}

// --- Terminal fitting & ANSI helpers ---

fn get_terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), Height(_h))) => (w as usize).saturating_sub(4).max(20),
        None => 80,
    }
}

fn fit_line_to_width(s: &str, maxw: usize) -> String {
    if visible_len(s) <= maxw { return s.to_string(); }
    // Cut after `maxw - 1` visible chars, keeping escape sequences intact
    let mut out = String::new();
    let mut vis = 0usize;
    let mut in_escape = false;
    for ch in s.chars() {
        if ch == '\x1b' { in_escape = true; }
        if in_escape {
            out.push(ch);
            if ch.is_ascii_alphabetic() { in_escape = false; }
            continue;
        }
        if vis + 1 >= maxw { break; }
        out.push(ch);
        vis += 1;
    }
    out.push('…');
    // reset colour in case the cut landed inside a coloured cell
    out.push_str("\x1b[0m");
    out
}

pub(crate) fn visible_len(s: &str) -> usize {
    // Count visible chars, skipping ANSI CSI sequences
    let mut count = 0;
    let mut in_escape = false;
    for ch in s.chars() {
        if ch == '\x1b' { in_escape = true; continue; }
        if in_escape {
            if ch.is_ascii_alphabetic() { in_escape = false; }
            continue;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn table_aligns_numbers_right() {
        let lines = format_table(&strs(&["label", "value"]), &[strs(&["H00", "1,200"]), strs(&["H01", "7"])], 80);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "+-------+-------+");
        assert_eq!(lines[3], "| H00   | 1,200 |");
        assert_eq!(lines[4], "| H01   |     7 |");
        assert_eq!(visible_len(&lines[1]), lines[0].chars().count());
    }

    #[test]
    fn long_lines_are_cut_to_width() {
        let lines = format_table(&strs(&["label"]), &[strs(&["a very long hierarchy member name"])], 12);
        for l in lines {
            assert!(visible_len(&l) <= 12, "{}", l);
        }
    }

    #[test]
    fn visible_len_ignores_ansi() {
        assert_eq!(visible_len("\x1b[32mabc\x1b[0m"), 3);
        assert_eq!(visible_len("✅ ok"), 4);
    }
}
