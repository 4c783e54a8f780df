// Quote-aware scanning of filter strings.
//
// A double quote toggles "inside value" state; delimiters and whitespace
// inside a quoted run are ordinary characters. Backslash escapes are not
// recognised, so a value containing `"` cannot be represented.

/// Split `input` on every `delimiter` that is not inside double quotes.
/// An unterminated quote swallows the rest of the input.
pub fn split_unquoted(input: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quote = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if c == '"' {
            in_quote = !in_quote;
        } else if c == delimiter && !in_quote {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Cursor over the whitespace separated words of one clause.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let remaining = &self.input[self.pos..];
        self.pos += remaining.len() - remaining.trim_start().len();
    }

    /// Next word, keeping quoted runs (with their quotes) intact.
    pub fn next_word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        let mut in_quote = false;
        let mut end = self.input.len();
        for (i, c) in self.input[start..].char_indices() {
            if c == '"' {
                in_quote = !in_quote;
            } else if c.is_whitespace() && !in_quote {
                end = start + i;
                break;
            }
        }

        self.pos = end;
        Some(&self.input[start..end])
    }

    /// Everything not consumed yet, trimmed.
    pub fn rest(&self) -> &'a str {
        self.input[self.pos..].trim()
    }
}

/// Drop grouping parentheses around a clause, e.g. `(a == 1)` or the
/// halves `(a == 1` / `b == 2)` left over from splitting a group.
pub fn strip_grouping(clause: &str) -> &str {
    clause
        .trim()
        .trim_start_matches(|c: char| c == '(' || c.is_whitespace())
        .trim_end_matches(|c: char| c == ')' || c.is_whitespace())
}

/// Remove surrounding double quotes. Returns the inner text and whether the
/// value was quoted. A missing closing quote is tolerated.
pub fn unquote(raw: &str) -> (&str, bool) {
    match raw.strip_prefix('"') {
        Some(inner) => (inner.strip_suffix('"').unwrap_or(inner), true),
        None => (raw, false),
    }
}

pub fn has_unbalanced_quotes(s: &str) -> bool {
    s.matches('"').count() % 2 == 1
}
