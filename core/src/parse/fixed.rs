//! Fixed-format parsers: pure, total, and never instrumented.

use crate::term::Term;

/// A `Document` with one `Line` child per line. Ranges exclude the newline.
pub fn parse_lines(source: &[u8]) -> Term {
    let children = split_lines(source)
        .into_iter()
        .map(|line| Term::leaf("Line", line.start..line.end))
        .collect();
    Term::node("Document", 0..source.len(), children)
}

/// Block-level markdown: headings, paragraphs, lists, fenced code, block
/// quotes and thematic breaks.
pub fn parse_markdown(source: &[u8]) -> Term {
    let lines = split_lines(source);
    let mut children = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        match classify(line.text) {
            Block::Blank => i += 1,
            Block::Fence(marker) => {
                let mut j = i + 1;
                while j < lines.len() && !trim_start(lines[j].text).starts_with(marker) {
                    j += 1;
                }
                let last = &lines[j.min(lines.len() - 1)];
                children.push(Term::leaf("CodeBlock", line.start..last.end));
                i = j + 1;
            }
            Block::Heading => {
                children.push(Term::leaf("Heading", line.start..line.end));
                i += 1;
            }
            Block::Break => {
                children.push(Term::leaf("ThematicBreak", line.start..line.end));
                i += 1;
            }
            Block::Quote => {
                let j = run_of(&lines, i, Block::Quote);
                children.push(Term::leaf("BlockQuote", line.start..lines[j - 1].end));
                i = j;
            }
            Block::Item => {
                let j = run_of(&lines, i, Block::Item);
                let items = lines[i..j]
                    .iter()
                    .map(|item| Term::leaf("ListItem", item.start..item.end))
                    .collect();
                children.push(Term::node("List", line.start..lines[j - 1].end, items));
                i = j;
            }
            Block::Text => {
                let j = run_of(&lines, i, Block::Text);
                children.push(Term::leaf("Paragraph", line.start..lines[j - 1].end));
                i = j;
            }
        }
    }

    Term::node("Document", 0..source.len(), children)
}

struct Line<'a> {
    start: usize,
    end: usize,
    text: &'a [u8],
}

fn split_lines(source: &[u8]) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    while start < source.len() {
        let end = source[start..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|i| start + i)
            .unwrap_or(source.len());
        let mut text_end = end;
        if text_end > start && source[text_end - 1] == b'\r' {
            text_end -= 1;
        }
        out.push(Line {
            start,
            end: text_end,
            text: &source[start..text_end],
        });
        start = end + 1;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Blank,
    Fence(&'static [u8]),
    Heading,
    Break,
    Quote,
    Item,
    Text,
}

fn trim_start(text: &[u8]) -> &[u8] {
    let skip = text.iter().take_while(|b| **b == b' ' || **b == b'\t').count();
    &text[skip..]
}

fn classify(text: &[u8]) -> Block {
    let t = trim_start(text);
    if t.is_empty() {
        return Block::Blank;
    }
    if t.starts_with(b"```") {
        return Block::Fence(b"```");
    }
    if t.starts_with(b"~~~") {
        return Block::Fence(b"~~~");
    }
    let hashes = t.iter().take_while(|b| **b == b'#').count();
    if (1..=6).contains(&hashes) && t.get(hashes).map_or(true, |b| *b == b' ') {
        return Block::Heading;
    }
    if is_thematic_break(t) {
        return Block::Break;
    }
    if t[0] == b'>' {
        return Block::Quote;
    }
    if is_list_marker(t) {
        return Block::Item;
    }
    Block::Text
}

fn is_thematic_break(t: &[u8]) -> bool {
    let marker = t[0];
    if !matches!(marker, b'-' | b'*' | b'_') {
        return false;
    }
    let mut count = 0;
    for b in t {
        match *b {
            b' ' | b'\t' => {}
            c if c == marker => count += 1,
            _ => return false,
        }
    }
    count >= 3
}

fn is_list_marker(t: &[u8]) -> bool {
    if matches!(t[0], b'-' | b'*' | b'+') {
        return t.get(1).map_or(true, |b| *b == b' ');
    }
    let digits = t.iter().take_while(|b| b.is_ascii_digit()).count();
    digits > 0
        && matches!(t.get(digits), Some(b'.') | Some(b')'))
        && t.get(digits + 1).map_or(true, |b| *b == b' ')
}

fn run_of(lines: &[Line<'_>], from: usize, kind: Block) -> usize {
    let mut j = from;
    while j < lines.len() && classify(lines[j].text) == kind {
        j += 1;
    }
    j
}
