//! Text positions for JSON values.
//!
//! `serde_json::Value` keeps no source positions, so validation errors are
//! mapped back to the text through a separate index: one scan over the
//! document records where every value starts, keyed by its JSON pointer,
//! together with the dotted display path used in error reports.

use std::collections::HashMap;

/// 1-based line and column (counted in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Where a value starts and how it is named in error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub position: Position,
    pub path: String,
}

/// Start position of every value in a JSON document, keyed by JSON pointer.
#[derive(Debug, Default)]
pub struct PositionIndex {
    entries: HashMap<String, Located>,
}

impl PositionIndex {
    /// Index `text`.
    ///
    /// Meant for text that already parsed as JSON. Scanning stops at the first
    /// byte that does not fit the grammar; everything before it stays indexed.
    #[must_use]
    pub fn build(text: &str) -> Self {
        let mut scanner = Scanner {
            text,
            pos: 0,
            line: 1,
            column: 1,
            entries: HashMap::new(),
        };
        let _ = scanner.value(String::new(), String::new());
        Self {
            entries: scanner.entries,
        }
    }

    /// Look up a value by JSON pointer (`""` is the root).
    #[must_use]
    pub fn get(&self, pointer: &str) -> Option<&Located> {
        self.entries.get(pointer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append an object property to a display path.
///
/// Identifier-like keys use dot notation, anything else uses `['key']`.
#[must_use]
pub fn join_property(parent: &str, key: &str) -> String {
    let is_identifier = key
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_alphanumeric() || c == '_');

    if !is_identifier {
        return format!("{parent}['{key}']");
    }
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Append an array index to a display path.
#[must_use]
pub fn join_index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Best-effort display path for a pointer the index does not know.
///
/// All-digit segments are treated as array indices.
#[must_use]
pub fn pointer_to_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(unescape_segment)
        .fold(String::new(), |path, segment| match segment.parse::<usize>() {
            Ok(index) => join_index(&path, index),
            Err(_) => join_property(&path, &segment),
        })
}

fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    entries: HashMap<String, Located>,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn expect(&mut self, want: char) -> Option<()> {
        (self.bump()? == want).then_some(())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.bump();
        }
    }

    fn value(&mut self, pointer: String, path: String) -> Option<()> {
        self.skip_whitespace();
        let position = Position {
            line: self.line,
            column: self.column,
        };
        let kind = self.peek()?;
        self.entries.insert(
            pointer.clone(),
            Located {
                position,
                path: path.clone(),
            },
        );

        match kind {
            '{' => self.object(&pointer, &path),
            '[' => self.array(&pointer, &path),
            '"' => self.string().map(drop),
            _ => {
                self.scalar();
                Some(())
            }
        }
    }

    fn object(&mut self, pointer: &str, path: &str) -> Option<()> {
        self.expect('{')?;
        self.skip_whitespace();
        if self.peek()? == '}' {
            self.bump();
            return Some(());
        }

        loop {
            self.skip_whitespace();
            let key = self.string()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.value(
                format!("{pointer}/{}", escape_segment(&key)),
                join_property(path, &key),
            )?;
            self.skip_whitespace();
            match self.bump()? {
                ',' => {}
                '}' => return Some(()),
                _ => return None,
            }
        }
    }

    fn array(&mut self, pointer: &str, path: &str) -> Option<()> {
        self.expect('[')?;
        self.skip_whitespace();
        if self.peek()? == ']' {
            self.bump();
            return Some(());
        }

        let mut index = 0usize;
        loop {
            self.value(format!("{pointer}/{index}"), join_index(path, index))?;
            self.skip_whitespace();
            match self.bump()? {
                ',' => index += 1,
                ']' => return Some(()),
                _ => return None,
            }
        }
    }

    /// Consume a string literal and return its decoded contents.
    fn string(&mut self) -> Option<String> {
        let start = self.pos;
        self.expect('"')?;
        loop {
            match self.bump()? {
                '\\' => {
                    self.bump()?;
                }
                '"' => break,
                _ => {}
            }
        }
        serde_json::from_str(&self.text[start..self.pos]).ok()
    }

    fn scalar(&mut self) {
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']' | ' ' | '\t' | '\n' | '\r') {
                break;
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const DOC: &str = "{\n  \"deviceId\": \"arc\",\n  \"tests\": [\n    {\"codec\": \"h264\", \"maxStreams\": 4},\n    {\"codec\": \"hevc\"}\n  ],\n  \"odd key\": null\n}";

    fn at(index: &PositionIndex, pointer: &str) -> (usize, usize, String) {
        let located = index.get(pointer).unwrap_or_else(|| panic!("no entry for {pointer}"));
        (located.position.line, located.position.column, located.path.clone())
    }

    #[rstest]
    #[case("", 1, 1, "")]
    #[case("/deviceId", 2, 15, "deviceId")]
    #[case("/tests", 3, 12, "tests")]
    #[case("/tests/0", 4, 5, "tests[0]")]
    #[case("/tests/0/maxStreams", 4, 37, "tests[0].maxStreams")]
    #[case("/tests/1/codec", 5, 15, "tests[1].codec")]
    #[case("/odd key", 7, 14, "['odd key']")]
    fn indexes_value_starts(
        #[case] pointer: &str,
        #[case] line: usize,
        #[case] column: usize,
        #[case] path: &str,
    ) {
        let index = PositionIndex::build(DOC);
        assert_eq!(at(&index, pointer), (line, column, path.to_string()));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let index = PositionIndex::build("{\"é\": 1, \"b\": 2}");
        assert_eq!(index.get("/b").unwrap().position.column, 15);
    }

    #[test]
    fn escaped_keys_are_decoded_and_pointer_escaped() {
        let index = PositionIndex::build(r#"{"a/b": {"c~d": 1}, "q\"x": 2}"#);
        assert!(index.get("/a~1b/c~0d").is_some());
        assert!(index.get("/q\"x").is_some());
    }

    #[test]
    fn truncated_text_keeps_prefix() {
        let index = PositionIndex::build(r#"{"a": 1, "b": "#);
        assert!(index.get("").is_some());
        assert!(index.get("/a").is_some());
        assert!(index.get("/b").is_none());
    }

    #[rstest]
    #[case("", "")]
    #[case("/deviceId", "deviceId")]
    #[case("/tests/0/codec", "tests[0].codec")]
    #[case("/a~1b", "['a/b']")]
    fn pointer_fallback_paths(#[case] pointer: &str, #[case] expected: &str) {
        assert_eq!(pointer_to_path(pointer), expected);
    }
}
