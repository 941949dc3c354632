use std::ops::Range;

use serde::Serialize;
use serde_json::Value;

/// Category carried by nodes a parser could not make sense of.
pub const ERROR_CATEGORY: &str = "ParseError";

/// A syntax term: a labelled node over a byte range of the source, with a
/// stack of attributes layered on by successive annotation passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    pub category: String,
    pub range: Range<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Term>,
}

impl Term {
    pub fn leaf(category: impl Into<String>, range: Range<usize>) -> Self {
        Self::node(category, range, Vec::new())
    }

    pub fn node(category: impl Into<String>, range: Range<usize>, children: Vec<Term>) -> Self {
        Self {
            category: category.into(),
            range,
            attributes: Vec::new(),
            children,
        }
    }

    pub fn error(range: Range<usize>) -> Self {
        Self::leaf(ERROR_CATEGORY, range)
    }

    pub fn is_error(&self) -> bool {
        self.category == ERROR_CATEGORY
    }

    /// True if this node or any descendant is an error node.
    pub fn contains_errors(&self) -> bool {
        self.first_error().is_some()
    }

    /// The first error node in pre-order, if any.
    pub fn first_error(&self) -> Option<&Term> {
        if self.is_error() {
            return Some(self);
        }
        self.children.iter().find_map(Term::first_error)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Term::size).sum::<usize>()
    }

    /// Layer one more attribute onto every node, computed bottom-up.
    ///
    /// When `attribute` sees a node, each of its children already carries the
    /// new attribute as its last entry.
    pub fn annotate(self, attribute: &dyn Attribute) -> Term {
        let Term {
            category,
            range,
            attributes,
            children,
        } = self;
        let children = children
            .into_iter()
            .map(|child| child.annotate(attribute))
            .collect();
        let mut term = Term {
            category,
            range,
            attributes,
            children,
        };
        let value = attribute.compute(&term);
        term.attributes.push(value);
        term
    }
}

/// A bottom-up attribute computation used by the annotate step.
pub trait Attribute: Send + Sync {
    fn compute(&self, node: &Term) -> Value;
}

impl<F> Attribute for F
where
    F: Fn(&Term) -> Value + Send + Sync,
{
    fn compute(&self, node: &Term) -> Value {
        self(node)
    }
}

/// Counts the nodes below and including each node, reusing the children's
/// already-computed counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtreeSize;

impl Attribute for SubtreeSize {
    fn compute(&self, node: &Term) -> Value {
        let below: u64 = node
            .children
            .iter()
            .filter_map(|child| child.attributes.last().and_then(Value::as_u64))
            .sum();
        Value::from(below + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Term {
        Term::node(
            "Program",
            0..10,
            vec![
                Term::leaf("Identifier", 0..3),
                Term::node("Call", 4..10, vec![Term::leaf("Identifier", 4..7)]),
            ],
        )
    }

    #[test]
    fn annotate_is_bottom_up_and_layers_attributes() {
        let once = sample().annotate(&SubtreeSize);
        assert_eq!(once.attributes, vec![json!(4)]);
        assert_eq!(once.children[1].attributes, vec![json!(2)]);

        let twice = once.annotate(&|node: &Term| json!(node.category.len()));
        assert_eq!(twice.attributes, vec![json!(4), json!(7)]);
        assert_eq!(twice.children[0].attributes, vec![json!(1), json!(10)]);
    }

    #[test]
    fn finds_embedded_errors() {
        let mut term = sample();
        assert!(!term.contains_errors());
        term.children[1].children.push(Term::error(8..9));
        assert!(term.contains_errors());
        assert_eq!(term.first_error().map(|t| t.range.clone()), Some(8..9));
        assert_eq!(term.size(), 5);
    }
}
