use crate::blob::Blob;
use crate::error::AssignmentError;

/// `<path>:<line>:<column>: error: <message>`, 1-based, optionally followed by
/// the offending source line and a caret under the failing column.
pub fn format_assignment_error(blob: &Blob, err: &AssignmentError, echo_source: bool) -> String {
    let source = &blob.source[..];
    let offset = err
        .range
        .as_ref()
        .map(|r| r.start.min(source.len()))
        .unwrap_or(0);
    let line_start = source[..offset]
        .iter()
        .rposition(|b| *b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let line = source[..offset].iter().filter(|b| **b == b'\n').count() + 1;
    let column = offset - line_start + 1;

    let mut out = format!(
        "{}:{}:{}: error: {}",
        blob.path_display(),
        line,
        column,
        err.message
    );
    if echo_source {
        let line_end = source[line_start..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|i| line_start + i)
            .unwrap_or(source.len());
        let text = String::from_utf8_lossy(&source[line_start..line_end]);
        out.push('\n');
        out.push_str(text.trim_end_matches('\r'));
        out.push('\n');
        out.push_str(&" ".repeat(column - 1));
        out.push('^');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Language;

    fn blob() -> Blob {
        Blob::new("foo.py", Some(Language::Python), "x = 1\ndef (:\n")
    }

    #[test]
    fn reports_line_and_column() {
        let err = AssignmentError::at("unexpected '('", 10..11);
        assert_eq!(
            format_assignment_error(&blob(), &err, false),
            "foo.py:2:5: error: unexpected '('"
        );
    }

    #[test]
    fn echoes_the_offending_line() {
        let err = AssignmentError::at("unexpected '('", 10..11);
        assert_eq!(
            format_assignment_error(&blob(), &err, true),
            "foo.py:2:5: error: unexpected '('\ndef (:\n    ^"
        );
    }

    #[test]
    fn missing_range_points_at_start() {
        let err = AssignmentError::new("no root");
        assert_eq!(
            format_assignment_error(&blob(), &err, false),
            "foo.py:1:1: error: no root"
        );
    }
}
