use std::sync::Arc;

use semflow_core::diff::Differ;
use semflow_core::parse::Parser;
use semflow_core::runtime::Collaborators;
use semflow_core::Language;

use crate::diff::StructuralDiffer;
use crate::io::{FsOutputSink, FsSourceReader};
use crate::render::OutputFormat;

/// The parser for an input's language. Markdown gets the block parser;
/// everything else, tagged or not, is parsed line by line.
pub fn build_parser(language: Option<Language>) -> Parser {
    match language {
        Some(Language::Markdown) => Parser::Markdown,
        _ => Parser::LineByLine,
    }
}

pub fn build_differ() -> Arc<dyn Differ> {
    Arc::new(StructuralDiffer)
}

pub fn build_collaborators() -> Collaborators {
    Collaborators::new(FsSourceReader, FsOutputSink)
}

pub fn build_format(format: &str) -> anyhow::Result<OutputFormat> {
    format.parse::<OutputFormat>().map_err(anyhow::Error::msg)
}
