//! Multiline string bodies.

use crate::model::DocStringDelimiter;

/// Outcome of dedenting one content line.
pub(crate) enum Dedent<'a> {
    /// The line carried at least the expected indentation.
    Exact(&'a str),
    /// The line was indented less than the opening delimiter and had all of
    /// its leading whitespace removed instead.
    Short(&'a str),
}

/// Remove `indent` leading characters from `line`.
///
/// Blank lines always dedent to the empty string.
pub(crate) fn dedent(line: &str, indent: usize) -> Dedent<'_> {
    if line.trim().is_empty() {
        return Dedent::Exact("");
    }
    let leading = line.chars().take_while(|ch| ch.is_whitespace()).count();
    if leading < indent {
        return Dedent::Short(line.trim_start());
    }
    let start = line
        .char_indices()
        .nth(indent)
        .map_or(line.len(), |(index, _)| index);
    Dedent::Exact(line.get(start..).unwrap_or_default())
}

/// Replace escaped delimiters inside a content line.
pub(crate) fn unescape(line: &str, delimiter: DocStringDelimiter) -> String {
    line.replace(delimiter.escaped(), delimiter.as_str())
}

/// Join content lines, dropping one blank line adjacent to each delimiter.
pub(crate) fn assemble(mut lines: Vec<String>) -> String {
    if lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(line: &str, indent: usize) -> &str {
        match dedent(line, indent) {
            Dedent::Exact(text) => text,
            Dedent::Short(text) => panic!("'{line}' unexpectedly short: {text:?}"),
        }
    }

    #[test]
    fn dedents_by_character_count() {
        assert_eq!(exact("      hello", 4), "  hello");
        assert_eq!(exact("    été", 4), "été");
        assert_eq!(exact("   ", 4), "");
    }

    #[test]
    fn under_indented_lines_lose_all_leading_whitespace() {
        let Dedent::Short(text) = dedent("  short", 4) else {
            panic!("expected a short line");
        };
        assert_eq!(text, "short");
    }

    #[test]
    fn strips_one_blank_line_at_each_end() {
        let lines = ["", "", "body", "", ""].map(str::to_string).to_vec();
        assert_eq!(assemble(lines), "\nbody\n");
    }

    #[test]
    fn unescapes_only_the_active_delimiter() {
        assert_eq!(
            unescape(r#"say \"\"\" and \`\`\`"#, DocStringDelimiter::Quotes),
            r#"say """ and \`\`\`"#
        );
        assert_eq!(
            unescape(r"fence \`\`\`", DocStringDelimiter::Backticks),
            "fence ```"
        );
    }
}
