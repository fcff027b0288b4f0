//! Helpers for the whitespace gaps between sibling blocks.

/// Returns true if `line` holds nothing but whitespace and block quote
/// markers, i.e. it is blank inside its container.
fn is_blank(line: &str) -> bool {
    line.trim_matches(|c: char| c.is_whitespace() || c == '>').is_empty()
}

/// Returns true if `gap` contains at least one blank line between two line
/// endings.
pub(crate) fn has_blank_line(gap: &str) -> bool {
    match (gap.find('\n'), gap.rfind('\n')) {
        (Some(first), Some(last)) if first < last => {
            gap[first + 1..last].split('\n').any(is_blank)
        }
        _ => false,
    }
}

/// Removes blank lines from a gap, keeping the text before the first line
/// ending and the container prefix after the last one.
pub(crate) fn strip_blank_lines(gap: &str) -> String {
    let (Some(first), Some(last)) = (gap.find('\n'), gap.rfind('\n')) else {
        return gap.to_string();
    };
    if first == last {
        return gap.to_string();
    }

    let mut out = String::with_capacity(gap.len());
    out.push_str(&gap[..=first]);
    for line in gap[first + 1..last].split('\n') {
        if !is_blank(line) {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(&gap[last + 1..]);
    out
}

/// Strips trailing blank lines, line endings included, from a block's text.
///
/// Parsers may end a block after the line ending that closes it; the bytes
/// removed here belong to the gap that follows the block.
pub(crate) fn trim_trailing_blank_lines(text: &str) -> &str {
    let mut end = text.len();
    while let Some(pos) = text[..end].rfind('\n') {
        if !is_blank(&text[pos + 1..end]) {
            break;
        }
        end = pos;
        if text[..end].ends_with('\r') {
            end -= 1;
        }
    }
    &text[..end]
}

/// Produces the gap placed before a list item according to its
/// `blank_before` hint.
///
/// `at_line_start` tells whether the output rendered so far ends with a line
/// ending; a gap must never glue two items onto one line.
pub(crate) fn list_gap(gap: &str, blank_before: bool, at_line_start: bool) -> String {
    if blank_before {
        if has_blank_line(gap) {
            return gap.to_string();
        }
        return match gap.find('\n') {
            Some(pos) => {
                // The inserted line repeats the container prefix, so a gap
                // inside a block quote stays inside it.
                let prefix = gap[gap.rfind('\n').unwrap_or(pos) + 1..].trim_end();
                let line_ending = if gap[..pos].ends_with('\r') { "\r\n" } else { "\n" };
                let mut out = String::with_capacity(gap.len() + prefix.len() + 2);
                out.push_str(&gap[..=pos]);
                out.push_str(prefix);
                out.push_str(line_ending);
                out.push_str(&gap[pos + 1..]);
                out
            }
            None if at_line_start => format!("\n{gap}"),
            None => format!("\n\n{gap}"),
        };
    }

    let stripped = strip_blank_lines(gap);
    if !at_line_start && !stripped.contains('\n') {
        return format!("\n{stripped}");
    }
    stripped
}
