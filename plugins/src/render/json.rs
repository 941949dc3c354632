use bytes::Bytes;
use serde::Serialize;

use semflow_core::diff::Diff;
use semflow_core::term::Term;
use semflow_core::Blob;

use super::{DiffedPair, ParsedBlob};

#[derive(Serialize)]
struct Side {
    path: String,
    language: &'static str,
}

impl From<&Blob> for Side {
    fn from(blob: &Blob) -> Self {
        Self {
            path: blob.path_display(),
            language: blob.language_name(),
        }
    }
}

#[derive(Serialize)]
struct TreeEntry<'a> {
    path: String,
    language: &'static str,
    tree: &'a Term,
}

#[derive(Serialize)]
struct DiffEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<Side>,
    changes: usize,
    diff: &'a Diff,
}

/// One `{"path", "language", "tree"}` object per line.
pub fn render_json_terms(parsed: &[ParsedBlob]) -> Bytes {
    lines(parsed.iter().map(|p| TreeEntry {
        path: p.blob.path_display(),
        language: p.blob.language_name(),
        tree: &p.term,
    }))
}

/// One `{"before", "after", "changes", "diff"}` object per line; an absent
/// side is omitted.
pub fn render_json_diffs(diffs: &[DiffedPair]) -> Bytes {
    lines(diffs.iter().map(|d| DiffEntry {
        before: d.blobs.before().map(Side::from),
        after: d.blobs.after().map(Side::from),
        changes: d.diff.change_count(),
        diff: &d.diff,
    }))
}

fn lines<T: Serialize>(entries: impl Iterator<Item = T>) -> Bytes {
    let mut out = Vec::new();
    for entry in entries {
        out.extend(to_line(&entry));
    }
    Bytes::from(out)
}

fn to_line(value: &impl Serialize) -> Vec<u8> {
    let mut out = match serde_json::to_vec(value) {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(error = %err, "json render fell back to an error document");
            serde_json::json!({ "error": err.to_string() }).to_string().into_bytes()
        }
    };
    out.push(b'\n');
    out
}
