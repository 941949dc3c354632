//! Parser selection and the instrumented parse step.

mod diagnostic;
mod dispatch;
pub mod fixed;

use std::fmt;
use std::sync::Arc;

use crate::error::AssignmentError;
use crate::term::Term;

pub use diagnostic::format_assignment_error;
pub(crate) use dispatch::run_parser;

/// A low-level, language-bound syntax tree builder. Total at this layer:
/// unrecognised input shows up as error nodes, not as a failure.
pub trait SyntaxParser: Send + Sync {
    fn parse(&self, source: &[u8]) -> Term;
}

impl<F> SyntaxParser for F
where
    F: Fn(&[u8]) -> Term + Send + Sync,
{
    fn parse(&self, source: &[u8]) -> Term {
        self(source)
    }
}

/// The structural pass from a raw syntax tree to a typed term.
pub trait Assignment: Send + Sync {
    fn assign(&self, tree: &Term, source: &[u8]) -> Result<Term, AssignmentError>;
}

impl<F> Assignment for F
where
    F: Fn(&Term, &[u8]) -> Result<Term, AssignmentError> + Send + Sync,
{
    fn assign(&self, tree: &Term, source: &[u8]) -> Result<Term, AssignmentError> {
        self(tree, source)
    }
}

#[derive(Clone)]
pub enum Parser {
    /// Raw syntax tree only.
    Syntax(Arc<dyn SyntaxParser>),
    /// Syntax tree followed by an assignment pass.
    Assigned {
        syntax: Arc<dyn SyntaxParser>,
        assignment: Arc<dyn Assignment>,
    },
    Markdown,
    LineByLine,
}

impl Parser {
    pub fn syntax(parser: impl SyntaxParser + 'static) -> Self {
        Self::Syntax(Arc::new(parser))
    }

    pub fn assigned(
        syntax: impl SyntaxParser + 'static,
        assignment: impl Assignment + 'static,
    ) -> Self {
        Self::Assigned {
            syntax: Arc::new(syntax),
            assignment: Arc::new(assignment),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "syntax",
            Self::Assigned { .. } => "assigned",
            Self::Markdown => "markdown",
            Self::LineByLine => "line",
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser({})", self.kind())
    }
}
