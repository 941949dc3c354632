//! Task descriptions for the `parse` and `diff` commands.
//!
//! Every input becomes one `Distribute` unit that parses, optionally
//! annotates and renders it; the rendered units are concatenated in input
//! order and written once.

use std::sync::Arc;

use bytes::Bytes;

use semflow_core::diff::{Diff, Differ};
use semflow_core::task::{self, distribute, distribute_map, Task};
use semflow_core::term::{SubtreeSize, Term};
use semflow_core::{Blob, BlobPair, Destination, Pair, PairSource, Source};
use semflow_plugins::factory::build_parser;
use semflow_plugins::render::{DiffedPair, OutputFormat, ParsedBlob};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    SubtreeSize,
}

#[derive(Debug, Clone)]
pub struct ParsePlan {
    pub source: Source,
    pub format: OutputFormat,
    pub annotation: Option<Annotation>,
    pub destination: Destination,
}

#[derive(Clone)]
pub struct DiffPlan {
    pub source: PairSource,
    pub format: OutputFormat,
    pub differ: Arc<dyn Differ>,
    pub destination: Destination,
}

pub fn parse_task(plan: ParsePlan) -> Task<()> {
    let ParsePlan {
        source,
        format,
        annotation,
        destination,
    } = plan;

    task::read_blobs(source)
        .and_then(move |blobs| {
            distribute_map(blobs, move |blob| {
                parse_blob(blob.clone(), annotation)
                    .map(move |term| ParsedBlob { blob, term })
                    .and_then(move |parsed| task::render(move |p: &ParsedBlob| format.render_term(p), parsed))
            })
        })
        .and_then(move |rendered| write_all(destination, rendered))
}

pub fn diff_task(plan: DiffPlan) -> Task<()> {
    let DiffPlan {
        source,
        format,
        differ,
        destination,
    } = plan;

    task::read_blob_pairs(source)
        .and_then(move |pairs| {
            distribute_map(pairs, move |pair| {
                diff_pair(differ.clone(), pair).and_then(move |diffed| {
                    task::render(move |d: &DiffedPair| format.render_diff(d), diffed)
                })
            })
        })
        .and_then(move |rendered| write_all(destination, rendered))
}

fn parse_blob(blob: Blob, annotation: Option<Annotation>) -> Task<Term> {
    let parser = build_parser(blob.language);
    task::parse(parser, blob).and_then(move |term| match annotation {
        Some(Annotation::SubtreeSize) => task::annotate(SubtreeSize, term),
        None => Task::pure(term),
    })
}

/// Both sides are parsed concurrently; a one-sided pair needs no differ.
fn diff_pair(differ: Arc<dyn Differ>, pair: BlobPair) -> Task<DiffedPair> {
    match pair {
        Pair::Both(before, after) => {
            let sides = vec![parse_blob(before.clone(), None), parse_blob(after.clone(), None)];
            distribute(sides).and_then(move |mut terms| {
                let after_term = terms.pop();
                let before_term = terms.pop();
                match (before_term, after_term) {
                    (Some(b), Some(a)) => {
                        let blobs = Pair::Both(before, after);
                        task::diff(differ, blobs.clone(), (b, a)).map(move |diff| DiffedPair { blobs, diff })
                    }
                    _ => Task::fail("diff lost a parsed side"),
                }
            })
        }
        Pair::Before(before) => parse_blob(before.clone(), None).map(move |term| DiffedPair {
            blobs: Pair::Before(before),
            diff: Diff::Deleted { term },
        }),
        Pair::After(after) => parse_blob(after.clone(), None).map(move |term| DiffedPair {
            blobs: Pair::After(after),
            diff: Diff::Inserted { term },
        }),
    }
}

fn write_all(destination: Destination, rendered: Vec<Bytes>) -> Task<()> {
    task::write(destination, Bytes::from(rendered.concat()))
}
