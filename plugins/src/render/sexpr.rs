use std::fmt::Write;

use bytes::Bytes;

use semflow_core::diff::Diff;
use semflow_core::term::Term;

use super::{DiffedPair, ParsedBlob};

/// `(Category child child ...)` with no ranges or attributes.
pub fn sexpr_term(term: &Term) -> String {
    let mut out = String::new();
    write_term(&mut out, term);
    out
}

/// Diff markers: `{+inserted+}`, `{-deleted-}`, `{ before ->after }`.
pub fn sexpr_diff(diff: &Diff) -> String {
    let mut out = String::new();
    write_diff(&mut out, diff);
    out
}

/// One line per input.
pub fn render_sexpr_terms(parsed: &[ParsedBlob]) -> Bytes {
    let mut out = String::new();
    for p in parsed {
        write_term(&mut out, &p.term);
        out.push('\n');
    }
    Bytes::from(out)
}

pub fn render_sexpr_diffs(diffs: &[DiffedPair]) -> Bytes {
    let mut out = String::new();
    for d in diffs {
        write_diff(&mut out, &d.diff);
        out.push('\n');
    }
    Bytes::from(out)
}

fn write_term(out: &mut String, term: &Term) {
    out.push('(');
    out.push_str(&term.category);
    for child in &term.children {
        out.push(' ');
        write_term(out, child);
    }
    out.push(')');
}

fn write_diff(out: &mut String, diff: &Diff) {
    match diff {
        Diff::Unchanged { term } => write_term(out, term),
        Diff::Inserted { term } => {
            out.push_str("{+");
            write_term(out, term);
            out.push_str("+}");
        }
        Diff::Deleted { term } => {
            out.push_str("{-");
            write_term(out, term);
            out.push_str("-}");
        }
        Diff::Replaced { before, after } => {
            out.push_str("{ ");
            write_term(out, before);
            out.push_str(" ->");
            write_term(out, after);
            out.push_str(" }");
        }
        Diff::Merge { category, children } => {
            let _ = write!(out, "({category}");
            for child in children {
                out.push(' ');
                write_diff(out, child);
            }
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn terms_and_diffs() {
        let term = Term::node("Document", 0..4, vec![Term::leaf("Heading", 0..2), Term::leaf("Paragraph", 2..4)]);
        assert_eq!(sexpr_term(&term), "(Document (Heading) (Paragraph))");

        let diff = Diff::Merge {
            category: "Document".into(),
            children: vec![
                Diff::Unchanged {
                    term: Term::leaf("Heading", 0..1),
                },
                Diff::Replaced {
                    before: Term::leaf("Paragraph", 1..2),
                    after: Term::leaf("List", 1..2),
                },
                Diff::Deleted {
                    term: Term::leaf("CodeBlock", 2..3),
                },
                Diff::Inserted {
                    term: Term::leaf("ThematicBreak", 2..3),
                },
            ],
        };
        assert_eq!(
            sexpr_diff(&diff),
            "(Document (Heading) { (Paragraph) ->(List) } {-(CodeBlock)-} {+(ThematicBreak)+})"
        );
    }
}
