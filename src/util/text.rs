use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
///
/// Emoji count as two columns, combining marks as zero.
///
/// ```
/// use makedon_news::util::display_width;
///
/// assert_eq!(display_width("Вест"), 4);
/// assert_eq!(display_width("⚽ Спорт"), 8);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, appending `...` when cut.
///
/// Widths of three columns or fewer leave no room for the ellipsis, so the
/// result is just the characters that fit.
///
/// ```
/// use makedon_news::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Кратко", 10), "Кратко");
/// assert_eq!(truncate_to_width("Најнови Вести", 10), "Најнови...");
/// assert_eq!(truncate_to_width("Вест", 2), "Ве");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let end = prefix_within(s, max_width);
        return if end == s.len() {
            Cow::Borrowed(s)
        } else {
            Cow::Owned(s[..end].to_string())
        };
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let cut = prefix_within(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}

/// Byte length of the longest prefix of `s` fitting in `width` columns.
fn prefix_within(s: &str, width: usize) -> usize {
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }
    end
}

/// Greedy word wrap to `width` columns.
///
/// Words wider than a line are hard-split. Returns at least one line.
pub fn wrap_to_width(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in s.split_whitespace() {
        let mut word = word;
        let mut word_width = display_width(word);

        if line_width > 0 && line_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }

        // The line is empty here: an overlong word always flushed it above.
        while word_width > width {
            // At least one char, so a glyph wider than the line cannot stall.
            let first = word.chars().next().map(char::len_utf8).unwrap_or(0);
            let end = prefix_within(word, width).max(first);
            lines.push(word[..end].to_string());
            word = &word[end..];
            word_width = display_width(word);
        }

        if word.is_empty() {
            continue;
        }
        if line_width > 0 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Collapse runs of whitespace into single spaces and trim both ends.
///
/// ```
/// use makedon_news::util::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Вест\n\tод   денес "), "Вест од денес");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d)
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Feed text is rendered straight into the terminal, so CSI (`ESC [`) and
/// OSC (`ESC ]`, ended by BEL or `ESC \`) sequences, bare ESC, DEL and C0
/// controls are removed. Tab, newline and carriage return are kept.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b == 0x1b {
            match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < len {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < len {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        } else if is_stripped_control(b) {
            i += 1;
        } else {
            let start = i;
            while i < len && !is_stripped_control(bytes[i]) {
                i += 1;
            }
            // Only ASCII bytes end a run, so the slice stays on a char boundary.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}
