//! Reduce grammar productions into the document model.
//!
//! The builder owns every semantic rule the grammar cannot express: names
//! must be non-empty, features need scenarios, tables must be rectangular and
//! Examples blocks need a table. Step owners are assigned here, exactly once.

use crate::errors::SyntaxError;
use crate::grammar::ParseTree;
use crate::grammar::productions::{
    Argument, BlockProduction, ExamplesProduction, FeatureProduction, Header, Production, Row,
    StepProduction, Text,
};
use crate::keyword::StepKeyword;
use crate::location::{Location, Span};
use crate::model::{
    Background, BlockId, Description, DocString, Examples, Feature, Scenario, Step, Table,
    normalise_sentence,
};

pub(crate) fn feature(tree: ParseTree) -> Result<Feature, SyntaxError> {
    let ParseTree {
        root,
        language,
        source,
        path,
        warnings,
    } = tree;
    let production = match root {
        Production::Feature(production) => production,
        Production::Steps(_) => {
            return Err(SyntaxError::new(
                Location::new(path, 1, 1),
                "expected a Feature, but the document was parsed as steps",
                "",
            ));
        }
    };
    let FeatureProduction {
        header,
        description,
        background,
        scenarios,
    } = production;

    if header.name.is_empty() {
        return Err(header.error("Feature must have a name"));
    }
    if scenarios.is_empty() {
        return Err(header.error("Feature must contain at least one Scenario"));
    }

    let background = background.map(build_background).transpose()?;
    let scenarios = scenarios
        .into_iter()
        .enumerate()
        .map(|(index, production)| build_scenario(index, production))
        .collect::<Result<Vec<_>, _>>()?;
    let span = scenarios
        .last()
        .map_or(header.span, |last| header.span.join(last.span));

    log::debug!(
        "built feature '{}' with {} scenario(s) in {}",
        header.name,
        scenarios.len(),
        language.code()
    );
    Ok(Feature {
        keyword: header.keyword,
        name: header.name,
        tags: header.tags,
        description: build_description(description),
        background,
        scenarios,
        language,
        source,
        warnings,
        location: header.location,
        span,
    })
}

pub(crate) fn steps(tree: ParseTree) -> Result<Vec<Step>, SyntaxError> {
    match tree.root {
        Production::Steps(steps) => build_steps(steps, None),
        Production::Feature(production) => Err(production
            .header
            .error("expected steps, but the document was parsed as a Feature")),
    }
}

fn build_background(production: BlockProduction) -> Result<Background, SyntaxError> {
    let BlockProduction {
        header,
        description,
        steps,
        examples: _,
    } = production;
    let steps = build_steps(steps, Some(BlockId::Background))?;
    Ok(Background {
        span: block_span(&header, &steps),
        keyword: header.keyword,
        name: header.name,
        description: build_description(description),
        steps,
        location: header.location,
    })
}

fn build_scenario(index: usize, production: BlockProduction) -> Result<Scenario, SyntaxError> {
    let BlockProduction {
        header,
        description,
        steps,
        examples,
    } = production;
    if header.name.is_empty() {
        return Err(header.error("Scenario must have a name"));
    }

    let steps = build_steps(steps, Some(BlockId::Scenario(index)))?;
    let mut span = block_span(&header, &steps);
    let examples = examples
        .into_iter()
        .map(build_examples)
        .collect::<Result<Vec<_>, _>>()?;
    let mut outlines = Vec::new();
    for block in &examples {
        span = span.join(block.span);
        outlines.extend(block.table.hashes());
    }

    Ok(Scenario {
        keyword: header.keyword,
        kind: header.kind,
        name: header.name,
        tags: header.tags,
        description: build_description(description),
        steps,
        examples,
        outlines,
        index,
        location: header.location,
        span,
    })
}

fn build_examples(production: ExamplesProduction) -> Result<Examples, SyntaxError> {
    let ExamplesProduction {
        header,
        description,
        rows,
    } = production;
    if rows.is_empty() {
        return Err(header.error("Examples must have a table"));
    }
    let table = build_table(rows)?;
    Ok(Examples {
        span: header.span.join(table.span),
        keyword: header.keyword,
        name: header.name,
        tags: header.tags,
        description: build_description(description),
        table,
        location: header.location,
    })
}

fn build_steps(
    productions: Vec<StepProduction>,
    owner: Option<BlockId>,
) -> Result<Vec<Step>, SyntaxError> {
    let mut previous = None;
    productions
        .into_iter()
        .map(|production| build_step(production, owner, &mut previous))
        .collect()
}

fn build_step(
    production: StepProduction,
    owner: Option<BlockId>,
    previous: &mut Option<StepKeyword>,
) -> Result<Step, SyntaxError> {
    let StepProduction {
        keyword,
        literal,
        text,
        location,
        mut span,
        argument,
    } = production;

    let (table, docstring) = match argument {
        Some(Argument::Table(rows)) => {
            let table = build_table(rows)?;
            span = span.join(table.span);
            (Some(table), None)
        }
        Some(Argument::DocString(docstring)) => {
            span = span.join(docstring.span);
            let docstring = DocString {
                content: docstring.content,
                content_type: docstring.content_type,
                delimiter: docstring.delimiter,
                location: docstring.location,
                span: docstring.span,
            };
            (None, Some(docstring))
        }
        None => (None, None),
    };

    Ok(Step {
        sentence: normalise_sentence(&format!("{literal}{text}")),
        literal,
        kind: keyword,
        phase: keyword.resolve(previous),
        text,
        table,
        docstring,
        owner,
        location,
        span,
    })
}

fn build_table(rows: Vec<Row>) -> Result<Table, SyntaxError> {
    let Some(first) = rows.first() else {
        return Err(SyntaxError::new(
            Location::new(None, 1, 1),
            "table must have at least one row",
            "",
        ));
    };
    let width = first.cells.len();
    let location = first.location.clone();
    let mut span = first.span;
    for row in &rows {
        if row.cells.len() != width {
            return Err(row.error(format!(
                "inconsistent table row: expected {width} cell(s), found {}",
                row.cells.len()
            )));
        }
        span = span.join(row.span);
    }
    Ok(Table {
        rows: rows.into_iter().map(|row| row.cells).collect(),
        location,
        span,
    })
}

fn build_description(lines: Vec<Text>) -> Option<Description> {
    let first = lines.first()?;
    let location = first.location.clone();
    let span = lines
        .iter()
        .fold(first.span, |span, line| span.join(line.span));
    Some(Description {
        lines: lines.into_iter().map(|line| line.text).collect(),
        location,
        span,
    })
}

fn block_span(header: &Header, steps: &[Step]) -> Span {
    steps
        .last()
        .map_or(header.span, |last| header.span.join(last.span))
}
