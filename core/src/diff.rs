use serde::Serialize;

use crate::term::Term;

/// The result of comparing two terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Diff {
    Unchanged { term: Term },
    Deleted { term: Term },
    Inserted { term: Term },
    Replaced { before: Term, after: Term },
    Merge { category: String, children: Vec<Diff> },
}

impl Diff {
    /// Number of non-unchanged leaves of the diff.
    pub fn change_count(&self) -> usize {
        match self {
            Self::Unchanged { .. } => 0,
            Self::Deleted { .. } | Self::Inserted { .. } | Self::Replaced { .. } => 1,
            Self::Merge { children, .. } => children.iter().map(Diff::change_count).sum(),
        }
    }
}

/// A tree-diff algorithm. Implementations must be total and deterministic.
pub trait Differ: Send + Sync {
    fn diff(&self, before: &Term, after: &Term) -> Diff;
}

impl<F> Differ for F
where
    F: Fn(&Term, &Term) -> Diff + Send + Sync,
{
    fn diff(&self, before: &Term, after: &Term) -> Diff {
        self(before, after)
    }
}
