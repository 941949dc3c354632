use std::time::Instant;

use crate::blob::Blob;
use crate::error::Failure;
use crate::log::{blob_tags, elapsed_tag, Level};
use crate::runtime::Interpreter;
use crate::term::Term;

use super::{fixed, format_assignment_error, Assignment, Parser, SyntaxParser};

/// Run `parser` over `blob`, logging timings and assignment problems.
pub(crate) async fn run_parser(
    interpreter: &Interpreter,
    parser: &Parser,
    blob: &Blob,
) -> Result<Term, Failure> {
    match parser {
        Parser::Syntax(syntax) => Ok(parse_syntax(interpreter, syntax.as_ref(), blob).await),
        Parser::Assigned { syntax, assignment } => {
            let tree = parse_syntax(interpreter, syntax.as_ref(), blob).await;
            assign(interpreter, assignment.as_ref(), &tree, blob).await
        }
        Parser::Markdown => Ok(fixed::parse_markdown(&blob.source)),
        Parser::LineByLine => Ok(fixed::parse_lines(&blob.source)),
    }
}

async fn parse_syntax(interpreter: &Interpreter, syntax: &dyn SyntaxParser, blob: &Blob) -> Term {
    let started = Instant::now();
    let tree = syntax.parse(&blob.source);
    let mut tags = blob_tags(None, blob);
    tags.push(elapsed_tag(started.elapsed()));
    interpreter.log(Level::Info, "parse", tags).await;
    tree
}

async fn assign(
    interpreter: &Interpreter,
    assignment: &dyn Assignment,
    tree: &Term,
    blob: &Blob,
) -> Result<Term, Failure> {
    let started = Instant::now();
    let assigned = assignment.assign(tree, &blob.source);
    let elapsed = started.elapsed();

    match assigned {
        Err(err) => {
            let echo = interpreter.options().echo_source_on_error;
            let diagnostic = format_assignment_error(blob, &err, echo);
            interpreter
                .log(Level::Error, diagnostic, blob_tags(None, blob))
                .await;
            Err(Failure::new(format!(
                "{}:{} failed assignment",
                blob.path_display(),
                blob.language_name()
            )))
        }
        Ok(term) if term.contains_errors() => {
            interpreter
                .log(
                    Level::Warning,
                    format!(
                        "{}:{} has parse errors",
                        blob.path_display(),
                        blob.language_name()
                    ),
                    Vec::new(),
                )
                .await;
            Ok(term)
        }
        Ok(term) => {
            let mut tags = blob_tags(None, blob);
            tags.push(elapsed_tag(elapsed));
            interpreter.log(Level::Info, "assign", tags).await;
            Ok(term)
        }
    }
}
