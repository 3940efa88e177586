//! Table row splitting and cell escapes.

/// Split a trimmed `| a | b |` line into unescaped, trimmed cells.
///
/// Cells are separated by unescaped pipes. Each raw cell is trimmed before
/// escapes are expanded so an escaped newline at a cell boundary survives.
///
/// # Errors
///
/// Returns a message when the row does not end with an unescaped `|`.
pub(crate) fn split_row(content: &str) -> Result<Vec<String>, String> {
    let Some(body) = content.strip_prefix('|') else {
        return Err("table row must start with '|'".to_string());
    };

    let mut cells = Vec::new();
    let mut raw = String::new();
    let mut closed = true;
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '|' => {
                cells.push(unescape(raw.trim()));
                raw.clear();
                closed = true;
            }
            '\\' => {
                raw.push(ch);
                if let Some(next) = chars.next() {
                    raw.push(next);
                }
                closed = false;
            }
            _ => {
                raw.push(ch);
                closed = false;
            }
        }
    }

    if closed {
        Ok(cells)
    } else {
        Err("table row must end with '|'".to_string())
    }
}

/// Expand `\|`, `\n` and `\\`; any other backslash is kept as written.
pub(crate) fn unescape(raw: &str) -> String {
    let mut cell = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            cell.push(ch);
            continue;
        }
        match chars.peek() {
            Some('|') => {
                cell.push('|');
                chars.next();
            }
            Some('n') => {
                cell.push('\n');
                chars.next();
            }
            Some('\\') => {
                cell.push('\\');
                chars.next();
            }
            _ => cell.push('\\'),
        }
    }
    cell
}

/// Inverse of [`unescape`], used when rendering cells.
pub(crate) fn escape(cell: &str) -> String {
    let mut raw = String::with_capacity(cell.len());
    for ch in cell.chars() {
        match ch {
            '\\' => raw.push_str("\\\\"),
            '|' => raw.push_str("\\|"),
            '\n' => raw.push_str("\\n"),
            _ => raw.push(ch),
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("| a | b |", &["a", "b"])]
    #[case("|a|b|", &["a", "b"])]
    #[case("| |", &[""])]
    #[case(r"| a \| b | c |", &["a | b", "c"])]
    #[case(r"| line\nbreak |", &["line\nbreak"])]
    #[case(r"| back\\slash |", &["back\\slash"])]
    #[case(r"| C:\temp |", &["C:\\temp"])]
    #[case(r"| ends with \\|", &["ends with \\"])]
    fn splits_cells(#[case] line: &str, #[case] expected: &[&str]) {
        let cells = split_row(line).unwrap_or_else(|err| panic!("{line}: {err}"));
        assert_eq!(cells, expected);
    }

    #[rstest]
    #[case("| a | b")]
    #[case(r"| a \|")]
    fn rejects_unterminated_rows(#[case] line: &str) {
        let Err(message) = split_row(line) else {
            panic!("'{line}' should be rejected");
        };
        assert_eq!(message, "table row must end with '|'");
    }

    #[test]
    fn escape_is_the_inverse_of_unescape() {
        let cell = "a|b\nc\\d";
        assert_eq!(unescape(&escape(cell)), cell);
    }
}
