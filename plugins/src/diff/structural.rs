use semflow_core::diff::{Diff, Differ};
use semflow_core::term::Term;

/// Diffs two terms by aligning children on their shape.
///
/// Two subtrees have the same shape when their categories and children agree
/// recursively; byte ranges and attributes are ignored, so moving code within
/// a file does not register as a change. Children are aligned with a longest
/// common subsequence. Unmatched runs are paired positionally: same-category
/// pairs recurse into a merge, mismatched pairs become replacements, and any
/// remainder becomes deletions or insertions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralDiffer;

impl Differ for StructuralDiffer {
    fn diff(&self, before: &Term, after: &Term) -> Diff {
        diff_terms(before, after)
    }
}

fn same_shape(a: &Term, b: &Term) -> bool {
    a.category == b.category
        && a.children.len() == b.children.len()
        && a.children.iter().zip(&b.children).all(|(x, y)| same_shape(x, y))
}

fn diff_terms(before: &Term, after: &Term) -> Diff {
    if same_shape(before, after) {
        return Diff::Unchanged { term: after.clone() };
    }
    if before.category != after.category {
        return Diff::Replaced {
            before: before.clone(),
            after: after.clone(),
        };
    }
    Diff::Merge {
        category: after.category.clone(),
        children: diff_children(&before.children, &after.children),
    }
}

fn diff_children(before: &[Term], after: &[Term]) -> Vec<Diff> {
    let anchors = lcs(before, after);
    let mut out = Vec::with_capacity(before.len().max(after.len()));
    let (mut i, mut j) = (0, 0);

    for (bi, aj) in anchors.into_iter().chain(std::iter::once((before.len(), after.len()))) {
        align_gap(&before[i..bi], &after[j..aj], &mut out);
        if bi < before.len() && aj < after.len() {
            out.push(Diff::Unchanged {
                term: after[aj].clone(),
            });
        }
        i = bi + 1;
        j = aj + 1;
    }
    out
}

fn align_gap(before: &[Term], after: &[Term], out: &mut Vec<Diff>) {
    let paired = before.len().min(after.len());
    for (b, a) in before.iter().zip(after) {
        out.push(diff_terms(b, a));
    }
    out.extend(before[paired..].iter().map(|term| Diff::Deleted { term: term.clone() }));
    out.extend(after[paired..].iter().map(|term| Diff::Inserted { term: term.clone() }));
}

/// Index pairs of a longest common subsequence under `same_shape`.
fn lcs(before: &[Term], after: &[Term]) -> Vec<(usize, usize)> {
    let (n, m) = (before.len(), after.len());
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if same_shape(&before[i], &after[j]) {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if same_shape(&before[i], &after[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}
