//! Source locations for field paths
//!
//! Walks a [`FieldPath`] through the raw JSON or YAML text, one key or array
//! index at a time, so a label lands on the node the path names rather than
//! on the first key elsewhere in the document that happens to share its name.

use miette::SourceSpan;

use crate::core::{FieldPath, PathSegment};

/// Span to label for a field path.
///
/// A resolved key is labelled at the key and a resolved array element at the
/// element. When a step cannot be resolved (typically a missing field) the
/// enclosing node is labelled instead. Paths that stop at the document root
/// fall back to the first line.
pub fn path_span(source: &str, path: &FieldPath) -> SourceSpan {
    let trimmed = source.trim_start();
    let found = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        json::locate(source, path.segments())
    } else {
        yaml::locate(source, path.segments())
    };
    found.unwrap_or_else(|| first_line(source))
}

fn first_line(source: &str) -> SourceSpan {
    let len = source
        .find('\n')
        .unwrap_or(source.len())
        .max(1)
        .min(source.len());
    (0, len).into()
}

mod json {
    use super::*;

    struct Cursor<'a> {
        src: &'a str,
        pos: usize,
    }

    impl Cursor<'_> {
        fn peek(&self) -> Option<u8> {
            self.src.as_bytes().get(self.pos).copied()
        }

        fn eat(&mut self, byte: u8) -> bool {
            if self.peek() == Some(byte) {
                self.pos += 1;
                true
            } else {
                false
            }
        }

        fn skip_ws(&mut self) {
            while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
                self.pos += 1;
            }
        }

        fn skip_string(&mut self) -> Option<()> {
            if !self.eat(b'"') {
                return None;
            }
            while let Some(byte) = self.peek() {
                self.pos += 1;
                match byte {
                    b'\\' => self.pos += 1,
                    b'"' => return Some(()),
                    _ => {}
                }
            }
            None
        }

        fn skip_value(&mut self) -> Option<()> {
            self.skip_ws();
            match self.peek()? {
                b'"' => self.skip_string(),
                b'{' | b'[' => {
                    let mut depth = 0usize;
                    while let Some(byte) = self.peek() {
                        match byte {
                            b'"' => {
                                self.skip_string()?;
                                continue;
                            }
                            b'{' | b'[' => depth += 1,
                            b'}' | b']' => {
                                depth = depth.saturating_sub(1);
                                if depth == 0 {
                                    self.pos += 1;
                                    return Some(());
                                }
                            }
                            _ => {}
                        }
                        self.pos += 1;
                    }
                    None
                }
                _ => {
                    while let Some(byte) = self.peek() {
                        if matches!(byte, b',' | b'}' | b']' | b' ' | b'\t' | b'\r' | b'\n') {
                            break;
                        }
                        self.pos += 1;
                    }
                    Some(())
                }
            }
        }

        /// Move to the value of `key` in the object at the cursor, returning
        /// the span of the key
        fn find_member(&mut self, key: &str) -> Option<SourceSpan> {
            if !self.eat(b'{') {
                return None;
            }
            loop {
                self.skip_ws();
                let key_start = self.pos;
                self.skip_string()?;
                let raw = &self.src[key_start..self.pos];
                self.skip_ws();
                if !self.eat(b':') {
                    return None;
                }
                self.skip_ws();
                if serde_json::from_str::<String>(raw).ok().as_deref() == Some(key) {
                    return Some((key_start, raw.len()).into());
                }
                self.skip_value()?;
                self.skip_ws();
                if !self.eat(b',') {
                    return None;
                }
            }
        }

        /// Move to element `index` of the array at the cursor
        fn find_element(&mut self, index: usize) -> Option<()> {
            if !self.eat(b'[') {
                return None;
            }
            for _ in 0..index {
                self.skip_value()?;
                self.skip_ws();
                if !self.eat(b',') {
                    return None;
                }
            }
            self.skip_ws();
            match self.peek()? {
                b']' => None,
                _ => Some(()),
            }
        }
    }

    fn value_span(src: &str, start: usize) -> SourceSpan {
        let mut cursor = Cursor { src, pos: start };
        let end = match cursor.skip_value() {
            Some(()) => cursor.pos.min(src.len()),
            None => src.len(),
        };
        (start, end - start).into()
    }

    pub(super) fn locate(src: &str, segments: &[PathSegment]) -> Option<SourceSpan> {
        let mut cursor = Cursor { src, pos: 0 };
        cursor.skip_ws();

        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            let node_start = cursor.pos;
            let step = match segment {
                PathSegment::Key(key) => cursor.find_member(key),
                PathSegment::Index(index) => cursor
                    .find_element(*index)
                    .map(|()| value_span(src, cursor.pos)),
            };
            match step {
                Some(label) if last => return Some(label),
                Some(_) => {}
                None if i == 0 => return None,
                None => return Some(value_span(src, node_start)),
            }
        }
        None
    }
}

mod yaml {
    use super::*;

    struct Line<'a> {
        offset: usize,
        text: &'a str,
    }

    impl Line<'_> {
        fn indent(&self) -> usize {
            self.text.len() - self.text.trim_start_matches(' ').len()
        }

        fn is_blank(&self) -> bool {
            let trimmed = self.text.trim();
            trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---"
        }
    }

    /// A mapping or sequence whose entries start at column `col`. The first
    /// entry may share its line with a `- ` marker.
    #[derive(Debug, Clone, Copy)]
    struct Node {
        line: usize,
        col: usize,
        end: usize,
    }

    fn split_lines(src: &str) -> Vec<Line<'_>> {
        let mut offset = 0;
        src.split_inclusive('\n')
            .map(|raw| {
                let line = Line {
                    offset,
                    text: raw.trim_end_matches(&['\n', '\r'][..]),
                };
                offset += raw.len();
                line
            })
            .collect()
    }

    fn is_item(text: &str) -> bool {
        text == "-" || text.starts_with("- ")
    }

    /// Lines of `node` holding one of its own entries
    fn entries<'a>(lines: &'a [Line<'a>], node: Node) -> impl Iterator<Item = usize> + 'a {
        (node.line..node.end).filter(move |&l| {
            let line = &lines[l];
            let col = if l == node.line { node.col } else { line.indent() };
            !line.is_blank() && col == node.col && line.text.len() > col
        })
    }

    /// Length of the key token when `text` starts with `key:`
    fn key_len(text: &str, key: &str) -> Option<usize> {
        [key.to_string(), format!("\"{}\"", key), format!("'{}'", key)]
            .into_iter()
            .find_map(|token| {
                let rest = text.strip_prefix(token.as_str())?.strip_prefix(':')?;
                (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(token.len())
            })
    }

    /// Block content nested under the key on `key_line`
    fn child_node(lines: &[Line], key_line: usize, key_col: usize, limit: usize) -> Option<Node> {
        let mut start = None;
        let mut end = limit;
        for l in key_line + 1..limit {
            let line = &lines[l];
            if line.is_blank() {
                continue;
            }
            let indent = line.indent();
            let nested = indent > key_col || (indent == key_col && is_item(&line.text[indent..]));
            if !nested {
                end = l;
                break;
            }
            start.get_or_insert(l);
        }
        start.map(|l| Node {
            line: l,
            col: lines[l].indent(),
            end,
        })
    }

    fn find_key(lines: &[Line], node: Node, key: &str) -> Option<(SourceSpan, Option<Node>)> {
        for l in entries(lines, node) {
            let text = &lines[l].text[node.col..];
            let Some(len) = key_len(text, key) else {
                continue;
            };
            let label = (lines[l].offset + node.col, len).into();
            let rest = text[len + 1..].trim();
            if !rest.is_empty() && !rest.starts_with('#') {
                return Some((label, None));
            }
            return Some((label, child_node(lines, l, node.col, node.end)));
        }
        None
    }

    fn find_item(lines: &[Line], node: Node, index: usize) -> Option<(SourceSpan, Option<Node>)> {
        let items: Vec<usize> = entries(lines, node)
            .filter(|&l| is_item(&lines[l].text[node.col..]))
            .collect();
        let l = *items.get(index)?;
        let end = items.get(index + 1).copied().unwrap_or(node.end);

        let text = &lines[l].text[node.col..];
        let label = (lines[l].offset + node.col, text.len()).into();
        let after_dash = &text[1..];
        let content = after_dash.trim_start();

        let child = if content.is_empty() || content.starts_with('#') {
            (l + 1..end)
                .find(|&n| !lines[n].is_blank())
                .map(|n| Node {
                    line: n,
                    col: lines[n].indent(),
                    end,
                })
        } else {
            Some(Node {
                line: l,
                col: node.col + 1 + (after_dash.len() - content.len()),
                end,
            })
        };
        Some((label, child))
    }

    fn node_span(lines: &[Line], node: Node) -> SourceSpan {
        let line = &lines[node.line];
        (line.offset + node.col, line.text.len() - node.col).into()
    }

    pub(super) fn locate(src: &str, segments: &[PathSegment]) -> Option<SourceSpan> {
        let lines = split_lines(src);
        let first = lines.iter().position(|l| !l.is_blank())?;
        let mut node = Node {
            line: first,
            col: lines[first].indent(),
            end: lines.len(),
        };

        for (i, segment) in segments.iter().enumerate() {
            let last = i + 1 == segments.len();
            let step = match segment {
                PathSegment::Key(key) => find_key(&lines, node, key),
                PathSegment::Index(index) => find_item(&lines, node, *index),
            };
            match step {
                Some((label, _)) if last => return Some(label),
                Some((_, Some(child))) => node = child,
                Some((label, None)) => return Some(label),
                None if i == 0 => return None,
                None => return Some(node_span(&lines, node)),
            }
        }
        None
    }
}
