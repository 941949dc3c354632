//! Output renderers. Every renderer is total: it turns a fully computed value
//! into bytes and never fails the run.

mod json;
mod sexpr;

use bytes::Bytes;

use semflow_core::diff::Diff;
use semflow_core::term::Term;
use semflow_core::{Blob, BlobPair};

pub use json::{render_json_diffs, render_json_terms};
pub use sexpr::{render_sexpr_diffs, render_sexpr_terms, sexpr_diff, sexpr_term};

/// A parsed input, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBlob {
    pub blob: Blob,
    pub term: Term,
}

/// A diffed input pair, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffedPair {
    pub blobs: BlobPair,
    pub diff: Diff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Sexpr,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sexp" | "sexpr" => Ok(Self::Sexpr),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Both formats are line oriented, so rendering inputs one at a time and
/// concatenating gives the same bytes as rendering them together.
impl OutputFormat {
    pub fn render_term(self, parsed: &ParsedBlob) -> Bytes {
        self.render_terms(std::slice::from_ref(parsed))
    }

    pub fn render_diff(self, diffed: &DiffedPair) -> Bytes {
        self.render_diffs(std::slice::from_ref(diffed))
    }

    pub fn render_terms(self, parsed: &[ParsedBlob]) -> Bytes {
        match self {
            Self::Json => render_json_terms(parsed),
            Self::Sexpr => render_sexpr_terms(parsed),
        }
    }

    pub fn render_diffs(self, diffs: &[DiffedPair]) -> Bytes {
        match self {
            Self::Json => render_json_diffs(diffs),
            Self::Sexpr => render_sexpr_diffs(diffs),
        }
    }
}
