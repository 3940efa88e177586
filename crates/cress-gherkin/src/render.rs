//! Canonical Gherkin rendering.
//!
//! Every node renders to text that parses back to the same model: tables are
//! column-aligned with their cells escaped, and multiline strings gain an
//! extra blank line wherever the parser would strip one. Features written in
//! a language other than English start with a `# language:` header.

use std::fmt;

use crate::language::DEFAULT_LANGUAGE;
use crate::lexer::table::escape;
use crate::model::{Background, Description, DocString, Examples, Feature, Scenario, Step, Table};

const INDENT: usize = 2;

fn write_header(f: &mut fmt::Formatter<'_>, indent: usize, keyword: &str, name: &str) -> fmt::Result {
    if name.is_empty() {
        writeln!(f, "{:indent$}{keyword}:", "")
    } else {
        writeln!(f, "{:indent$}{keyword}: {name}", "")
    }
}

fn write_tags(f: &mut fmt::Formatter<'_>, indent: usize, tags: &[String]) -> fmt::Result {
    if tags.is_empty() {
        return Ok(());
    }
    let line: Vec<String> = tags.iter().map(|tag| format!("@{tag}")).collect();
    writeln!(f, "{:indent$}{}", "", line.join(" "))
}

fn write_description(
    f: &mut fmt::Formatter<'_>,
    indent: usize,
    description: Option<&Description>,
) -> fmt::Result {
    for line in description.map(Description::lines).unwrap_or_default() {
        writeln!(f, "{:indent$}{line}", "")?;
    }
    Ok(())
}

fn write_steps(f: &mut fmt::Formatter<'_>, indent: usize, steps: &[Step]) -> fmt::Result {
    steps.iter().try_for_each(|step| write_step(f, indent, step))
}

fn write_step(f: &mut fmt::Formatter<'_>, indent: usize, step: &Step) -> fmt::Result {
    writeln!(f, "{:indent$}{}{}", "", step.literal(), step.text())?;
    if let Some(table) = step.table() {
        write_table(f, indent + INDENT, table)?;
    }
    if let Some(docstring) = step.docstring() {
        write_docstring(f, indent + INDENT, docstring)?;
    }
    Ok(())
}

fn write_table(f: &mut fmt::Formatter<'_>, indent: usize, table: &Table) -> fmt::Result {
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| escape(cell)).collect())
        .collect();
    let mut widths = vec![0; table.width()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    for row in &rows {
        write!(f, "{:indent$}|", "")?;
        for (cell, width) in row.iter().zip(&widths) {
            let fill = width.saturating_sub(cell.chars().count());
            write!(f, " {cell}{:fill$} |", "")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_docstring(f: &mut fmt::Formatter<'_>, indent: usize, docstring: &DocString) -> fmt::Result {
    let delimiter = docstring.delimiter();
    writeln!(
        f,
        "{:indent$}{}{}",
        "",
        delimiter.as_str(),
        docstring.content_type().unwrap_or_default()
    )?;
    let content = docstring.content();
    if !content.is_empty() {
        let lines: Vec<&str> = content.split('\n').collect();
        let blank = |line: Option<&&str>| line.is_some_and(|line| line.trim().is_empty());
        if blank(lines.first()) {
            writeln!(f)?;
        }
        for line in &lines {
            if line.trim().is_empty() {
                writeln!(f)?;
            } else {
                let line = line.replace(delimiter.as_str(), delimiter.escaped());
                writeln!(f, "{:indent$}{line}", "")?;
            }
        }
        if blank(lines.last()) {
            writeln!(f)?;
        }
    }
    writeln!(f, "{:indent$}{}", "", delimiter.as_str())
}

fn write_background(f: &mut fmt::Formatter<'_>, indent: usize, background: &Background) -> fmt::Result {
    write_header(f, indent, background.keyword(), background.name())?;
    write_description(f, indent + INDENT, background.description())?;
    write_steps(f, indent + INDENT, background.steps())
}

fn write_examples(f: &mut fmt::Formatter<'_>, indent: usize, examples: &Examples) -> fmt::Result {
    write_tags(f, indent, examples.tags())?;
    write_header(f, indent, examples.keyword(), examples.name())?;
    write_description(f, indent + INDENT, examples.description())?;
    write_table(f, indent + INDENT, examples.table())
}

fn write_scenario(f: &mut fmt::Formatter<'_>, indent: usize, scenario: &Scenario) -> fmt::Result {
    write_tags(f, indent, scenario.tags())?;
    write_header(f, indent, scenario.keyword(), scenario.name())?;
    write_description(f, indent + INDENT, scenario.description())?;
    write_steps(f, indent + INDENT, scenario.steps())?;
    for examples in scenario.examples() {
        writeln!(f)?;
        write_examples(f, indent + INDENT, examples)?;
    }
    Ok(())
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.language().code();
        if code != DEFAULT_LANGUAGE {
            writeln!(f, "# language: {code}")?;
        }
        write_tags(f, 0, self.tags())?;
        write_header(f, 0, self.keyword(), self.name())?;
        write_description(f, INDENT, self.description())?;
        if let Some(background) = self.background() {
            writeln!(f)?;
            write_background(f, INDENT, background)?;
        }
        for scenario in self.scenarios() {
            writeln!(f)?;
            write_scenario(f, INDENT, scenario)?;
        }
        Ok(())
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_background(f, 0, self)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_scenario(f, 0, self)
    }
}

impl fmt::Display for Examples {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_examples(f, 0, self)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_step(f, 0, self)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_table(f, 0, self)
    }
}

impl fmt::Display for DocString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_docstring(f, 0, self)
    }
}
