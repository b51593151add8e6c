//! Text utilities: color markup, tokenizing, and column layout.
//!
//! Outbound game text carries `#`-prefixed color markup (`#r`, `#G`, ...)
//! which the writer task resolves to ANSI escape sequences just before the
//! bytes hit the socket. Everything upstream works with the markup form.

const ANSI_RESET: &str = "\x1b[0;0m";
const ANSI_DULLBLACK: &str = "\x1b[0;30m";
const ANSI_DULLRED: &str = "\x1b[0;31m";
const ANSI_DULLGREEN: &str = "\x1b[0;32m";
const ANSI_DULLYELLOW: &str = "\x1b[0;33m";
const ANSI_DULLBLUE: &str = "\x1b[0;34m";
const ANSI_DULLPURPLE: &str = "\x1b[0;35m";
const ANSI_DULLCYAN: &str = "\x1b[0;36m";
const ANSI_DULLWHITE: &str = "\x1b[0;37m";
const ANSI_RED: &str = "\x1b[1;31m";
const ANSI_GREEN: &str = "\x1b[1;32m";
const ANSI_YELLOW: &str = "\x1b[1;33m";
const ANSI_BLUE: &str = "\x1b[1;34m";
const ANSI_PURPLE: &str = "\x1b[1;35m";
const ANSI_CYAN: &str = "\x1b[1;36m";
const ANSI_WHITE: &str = "\x1b[1;37m";

fn color_code(c: char) -> Option<&'static str> {
    match c {
        'n' => Some(ANSI_RESET),
        'g' => Some(ANSI_DULLGREEN),
        'G' => Some(ANSI_GREEN),
        'y' => Some(ANSI_DULLYELLOW),
        'Y' => Some(ANSI_YELLOW),
        'r' => Some(ANSI_DULLRED),
        'R' => Some(ANSI_RED),
        'b' => Some(ANSI_DULLBLUE),
        'B' => Some(ANSI_BLUE),
        'p' => Some(ANSI_DULLPURPLE),
        'P' => Some(ANSI_PURPLE),
        'c' => Some(ANSI_DULLCYAN),
        'C' => Some(ANSI_CYAN),
        'w' => Some(ANSI_DULLWHITE),
        'W' => Some(ANSI_WHITE),
        's' => Some(ANSI_DULLBLACK),
        _ => None,
    }
}

/// Resolve `#x` markup to ANSI escapes. A `#` followed by anything that is
/// not a color letter passes through untouched.
pub fn colorize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '#' {
            match chars.peek().copied().and_then(color_code) {
                Some(code) => {
                    out.push_str(code);
                    chars.next();
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Visible length of a markup string (color codes occupy no columns).
pub fn visible_len(text: &str) -> usize {
    let mut len = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '#' && chars.peek().copied().and_then(color_code).is_some() {
            chars.next();
        } else {
            len += 1;
        }
    }
    len
}

/// Pull the first whitespace-delimited token from a string.
pub fn one_argument(argument: &str) -> &str {
    argument.split_whitespace().next().unwrap_or("")
}

/// Get the nth (1-based) whitespace-delimited word, or "".
pub fn argument_n(argument: &str, n: usize) -> &str {
    argument.split_whitespace().nth(n.saturating_sub(1)).unwrap_or("")
}

/// Upper-case the first letter, leaving the rest as typed.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Re-wrap a markup string so no visible line exceeds `width` columns.
/// Existing newlines are respected.
pub fn wrap(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        if visible_len(line) <= width {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        let mut col = 0;
        let mut current = String::new();
        for word in line.split(' ') {
            let wlen = visible_len(word);
            if col > 0 && col + 1 + wlen > width {
                out.push_str(&current);
                out.push('\n');
                current.clear();
                col = 0;
            }
            if col > 0 {
                current.push(' ');
                col += 1;
            }
            current.push_str(word);
            col += wlen;
        }
        out.push_str(&current);
        out.push('\n');
    }
    out
}

/// Merge two blocks of text into two columns: `left` (fixed-width, e.g. a
/// minimap) and `right` (room text). Lines are paired top to bottom; the
/// shorter block is padded with blanks.
pub fn smush_left(left: &str, right: &str) -> String {
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();
    let width = left_lines
        .iter()
        .map(|l| visible_len(l))
        .max()
        .unwrap_or(0);

    let rows = left_lines.len().max(right_lines.len());
    let mut out = String::new();
    for i in 0..rows {
        let l = left_lines.get(i).copied().unwrap_or("");
        let pad = width.saturating_sub(visible_len(l));
        out.push_str(l);
        for _ in 0..pad {
            out.push(' ');
        }
        out.push_str("  ");
        out.push_str(right_lines.get(i).copied().unwrap_or(""));
        out.push_str("\n\r");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_basic() {
        assert_eq!(colorize("#rhot#n"), "\x1b[0;31mhot\x1b[0;0m");
    }

    #[test]
    fn test_colorize_passes_unknown_hash() {
        assert_eq!(colorize("#1 room"), "#1 room");
        assert_eq!(colorize("tail#"), "tail#");
    }

    #[test]
    fn test_visible_len_skips_codes() {
        assert_eq!(visible_len("#rhot#n"), 3);
        assert_eq!(visible_len("plain"), 5);
    }

    #[test]
    fn test_one_argument() {
        assert_eq!(one_argument("  look east  "), "look");
        assert_eq!(one_argument(""), "");
    }

    #[test]
    fn test_argument_n() {
        assert_eq!(argument_n("hangman play x", 2), "play");
        assert_eq!(argument_n("hangman", 3), "");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("alice"), "Alice");
        assert_eq!(capitalize_first("BOB"), "BOB");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_smush_left_pads_columns() {
        let merged = smush_left("ab\na\n", "one\ntwo\nthree\n");
        // Rows end in "\n\r", so strip the stray carriage returns here
        let lines: Vec<String> = merged
            .lines()
            .map(|l| l.trim_matches('\r').trim_end().to_string())
            .collect();
        assert_eq!(lines[0], "ab  one");
        assert_eq!(lines[1], "a   two");
        // Left column exhausted, still padded
        assert_eq!(lines[2], "    three");
    }
}
