mod common;

use pretty_assertions::assert_eq;

use common::{options, run_captured, MemoryReader};
use semflow_core::log::Level;
use semflow_core::parse::Parser;
use semflow_core::task::{self, distribute_map};
use semflow_core::term::Term;
use semflow_core::{AssignmentError, Blob, Language, Source};

fn tokens(source: &[u8]) -> Term {
    let children = source
        .split(|b| *b == b' ')
        .scan(0usize, |offset, word| {
            let start = *offset;
            *offset += word.len() + 1;
            Some(Term::leaf("Token", start..start + word.len()))
        })
        .collect();
    Term::node("Tokens", 0..source.len(), children)
}

fn assign_ok(tree: &Term, _source: &[u8]) -> Result<Term, AssignmentError> {
    Ok(Term::node("Program", tree.range.clone(), tree.children.clone()))
}

fn assign_partial(tree: &Term, _source: &[u8]) -> Result<Term, AssignmentError> {
    let mut children = tree.children.clone();
    children.push(Term::error(0..1));
    Ok(Term::node("Program", tree.range.clone(), children))
}

fn assign_fail(_tree: &Term, _source: &[u8]) -> Result<Term, AssignmentError> {
    Err(AssignmentError::at("unexpected token", 6..7))
}

fn python(source: &str) -> Blob {
    Blob::new("foo.py", Some(Language::Python), source.to_string())
}

#[tokio::test]
async fn syntax_and_assignment_stages_are_timed() {
    let parser = Parser::assigned(tokens, assign_ok);
    let (outcome, _, diag) = run_captured(
        options(Some(Level::Info)),
        MemoryReader::default(),
        task::parse(parser, python("a b c")),
    )
    .await;

    let term = outcome.unwrap();
    assert_eq!(term.category, "Program");
    assert_eq!(term.children.len(), 3);

    let messages = diag.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("INFO parse path=foo.py language=Python time="));
    assert!(messages[1].starts_with("INFO assign path=foo.py language=Python time="));
}

#[tokio::test]
async fn partial_parse_is_a_success_with_one_warning() {
    let parser = Parser::assigned(tokens, assign_partial);
    let (outcome, _, diag) = run_captured(
        options(Some(Level::Debug)),
        MemoryReader::default(),
        task::parse(parser, python("a b")),
    )
    .await;

    assert!(outcome.unwrap().contains_errors());
    let warnings: Vec<_> = diag
        .messages()
        .into_iter()
        .filter(|m| m.starts_with("WARN"))
        .collect();
    assert_eq!(warnings, vec!["WARN foo.py:Python has parse errors"]);
    assert!(!diag.contents().contains("INFO assign"));
}

#[tokio::test]
async fn assignment_failure_fails_the_run_with_a_fixed_message() {
    let parser = Parser::assigned(tokens, assign_fail);
    let (outcome, _, diag) = run_captured(
        options(Some(Level::Error)),
        MemoryReader::default(),
        task::parse(parser, python("x = 1\ny ) 2\n")),
    )
    .await;

    assert_eq!(outcome.unwrap_err().to_string(), "foo.py:Python failed assignment");
    assert_eq!(
        diag.messages(),
        vec!["ERROR foo.py:2:1: error: unexpected token path=foo.py language=Python"]
    );
}

#[tokio::test]
async fn echo_source_includes_the_offending_line() {
    let mut opts = options(Some(Level::Error));
    opts.echo_source_on_error = true;
    let parser = Parser::assigned(tokens, assign_fail);
    let (outcome, _, diag) = run_captured(
        opts,
        MemoryReader::default(),
        task::parse(parser, python("x = 1\ny ) 2\n")),
    )
    .await;

    assert!(outcome.is_err());
    assert!(diag.contents().contains("error: unexpected token\ny ) 2\n^ path=foo.py"));
}

#[tokio::test]
async fn untagged_inputs_report_unknown_language() {
    let parser = Parser::assigned(tokens, assign_fail);
    let blob = Blob::new("notes", None, "a b c d");
    let (outcome, _, _) = run_captured(options(None), MemoryReader::default(), task::parse(parser, blob)).await;
    assert_eq!(outcome.unwrap_err().message(), "notes:Unknown failed assignment");
}

#[tokio::test]
async fn fixed_format_parsers_are_silent() {
    let reader = MemoryReader {
        blobs: vec![
            Blob::new("README.md", Some(Language::Markdown), "# Title\n\ntext\n"),
            Blob::new("notes.txt", None, "one\ntwo\n"),
        ],
        ..MemoryReader::default()
    };
    let task = task::read_blobs(Source::Stdin).and_then(|blobs| {
        distribute_map(blobs, |blob| {
            let parser = match blob.language {
                Some(Language::Markdown) => Parser::Markdown,
                _ => Parser::LineByLine,
            };
            task::parse(parser, blob)
        })
    });
    let (outcome, _, diag) = run_captured(options(Some(Level::Debug)), reader, task).await;

    let terms = outcome.unwrap();
    assert_eq!(terms[0].children.len(), 2);
    assert_eq!(terms[1].children.len(), 2);
    assert_eq!(terms[1].children[0].category, "Line");
    assert_eq!(diag.contents(), "");
}

#[tokio::test]
async fn syntax_only_parser_returns_the_raw_tree() {
    let parser = Parser::syntax(tokens);
    let (outcome, _, diag) = run_captured(
        options(Some(Level::Warning)),
        MemoryReader::default(),
        task::parse(parser, python("a b")),
    )
    .await;
    assert_eq!(outcome.unwrap().category, "Tokens");
    assert_eq!(diag.contents(), "");
}
