use crate::error::{PragmashError, Result};

/// Source text split into logical lines.
///
/// `line_starts[i]` is the 1-based physical line on which logical line `i`
/// begins. The two vectors always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub logical_lines: Vec<String>,
    pub line_starts: Vec<usize>,
}

impl Script {
    pub fn len(&self) -> usize {
        self.logical_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logical_lines.is_empty()
    }

    pub fn line(&self, index: usize) -> &str {
        &self.logical_lines[index]
    }

    /// Physical line number for the logical line at `index`.
    pub fn line_number(&self, index: usize) -> usize {
        self.line_starts[index]
    }

    fn push(&mut self, text: String, start: usize) {
        self.logical_lines.push(text);
        self.line_starts.push(start);
    }
}

/// Split source text into logical lines.
///
/// A physical line ending in an unescaped `\` is joined to the next one with
/// a single space. Blank lines are kept so the index mapping stays explicit.
pub fn parse_script(source: &str) -> Result<Script> {
    let mut script = Script::default();
    if source.is_empty() {
        return Ok(script);
    }

    // A final newline terminates the last line rather than starting a new one.
    let body = source.strip_suffix('\n').unwrap_or(source);
    let mut pending: Option<(String, usize)> = None;

    for (idx, raw) in body.split('\n').enumerate() {
        let lineno = idx + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        let (text, continues) = match continuation_body(raw) {
            Some(body) => (body, true),
            None => (raw, false),
        };

        let (joined, start) = match pending.take() {
            Some((mut acc, start)) => {
                acc.push(' ');
                acc.push_str(text);
                (acc, start)
            }
            None => (text.to_string(), lineno),
        };

        if continues {
            pending = Some((joined, start));
        } else {
            script.push(joined, start);
        }
    }

    if let Some((_, start)) = pending {
        return Err(PragmashError::DanglingContinuation { line: start });
    }

    Ok(script)
}

/// If `line` ends with an odd run of backslashes, return it without the last one.
fn continuation_body(line: &str) -> Option<&str> {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        Some(&line[..line.len() - 1])
    } else {
        None
    }
}
