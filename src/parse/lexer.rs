//! Byte-offset scanner over the pattern source (spec §4.1). Plain
//! `&str` slicing rather than a `Peekable<CharIndices>`: the grammar
//! needs unbounded lookahead to classify a group's prefix (`?:`,
//! `<name>:`, or neither) before committing to consume anything, which
//! is awkward over a peekable iterator but falls out of slicing for
//! free.

/// Scans `source` left to right. `pos` is always a char boundary.
pub(super) struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    pub(super) fn pos(&self) -> usize {
        self.pos
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    pub(super) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(super) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consumes `?:` if that's what comes next.
    pub(super) fn try_consume_non_capturing_prefix(&mut self) -> bool {
        if self.starts_with("?:") {
            self.pos += 2;
            true
        } else {
            false
        }
    }

    /// Consumes `<name>:` if that's what comes next, where `name` is
    /// `[A-Za-z0-9_]*`. All of those characters are single-byte ASCII,
    /// so the match length doubles as the byte count to advance.
    /// Lookahead only: leaves the scanner untouched on a non-match, so
    /// the caller can fall back to parsing an ordinary capturing group
    /// (which may itself start with a `<token>` leaf).
    pub(super) fn try_consume_named_prefix(&mut self) -> Option<String> {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return None;
        }
        let after = &rest[1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let tail = &after[name_len..];
        if !tail.starts_with(">:") {
            return None;
        }
        let name = after[..name_len].to_string();
        self.pos += 1 + name_len + 2;
        Some(name)
    }

    /// Scans a bracketed token body (`<…>` or `[…]`), counting nested
    /// same-delimiter pairs so `<a<b>c>` scans as one token. Returns
    /// the interior text with the `open`/`close` already consumed.
    pub(super) fn scan_bracketed(&mut self, open: char, close: char) -> Result<String, (usize, char)> {
        let start = self.pos;
        self.bump();
        let mut depth = 1u32;
        let mut inner = String::new();
        loop {
            match self.bump() {
                Some(c) if c == open && open != close => {
                    depth += 1;
                    inner.push(c);
                }
                Some(c) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(inner);
                    }
                    inner.push(c);
                }
                Some(c) => inner.push(c),
                None => return Err((start, open)),
            }
        }
    }
}
