use std::iter::{Enumerate, Peekable};
use std::str::Chars;

use crate::error::{PragmashError, Result};

/// A single token on a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word or a `"..."` string (escape sequences already resolved).
    Literal(String),
    /// `(...)`: raw source of a nested command, tokenized again on demand.
    Command(String),
}

impl Token {
    /// True when this is a literal token with exactly this text.
    pub fn is_literal(&self, text: &str) -> bool {
        matches!(self, Token::Literal(t) if t == text)
    }
}

type CharStream<'a> = Peekable<Enumerate<Chars<'a>>>;

/// Tokenize one logical line.
/// Blank lines and comment-only lines yield no tokens.
pub fn tokenize(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars: CharStream = line.chars().enumerate().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        let column = pos + 1;

        if c.is_whitespace() {
            chars.next();
            continue;
        }

        match c {
            '#' => break, // comment runs to end of line
            '"' => {
                chars.next();
                tokens.push(Token::Literal(read_quoted(&mut chars, column)?));
            }
            '(' => {
                chars.next();
                tokens.push(Token::Command(read_command(&mut chars, column)?));
            }
            ')' => return Err(PragmashError::UnexpectedCloseParen { column }),
            _ => {
                let mut word = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_whitespace() || matches!(ch, '"' | '(' | ')') {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Token::Literal(word));
            }
        }
    }

    Ok(tokens)
}

/// Read the rest of a quoted string; the opening `"` is already consumed.
fn read_quoted(chars: &mut CharStream, start: usize) -> Result<String> {
    let mut s = String::new();
    loop {
        match chars.next() {
            None => return Err(PragmashError::UnterminatedString { column: start }),
            Some((_, '"')) => return Ok(s),
            Some((pos, '\\')) => match chars.next() {
                Some((_, '"')) => s.push('"'),
                Some((_, '\\')) => s.push('\\'),
                Some((_, 'n')) => s.push('\n'),
                Some((_, 't')) => s.push('\t'),
                Some((_, 'r')) => s.push('\r'),
                Some((_, '(')) => s.push('('),
                Some((_, ')')) => s.push(')'),
                Some((_, escape)) => {
                    return Err(PragmashError::InvalidEscape {
                        escape,
                        column: pos + 1,
                    })
                }
                None => return Err(PragmashError::UnterminatedString { column: start }),
            },
            Some((_, ch)) => s.push(ch),
        }
    }
}

/// Read the raw text of an embedded command; the opening `(` is already
/// consumed. Parentheses nest; those inside quoted strings do not count.
fn read_command(chars: &mut CharStream, start: usize) -> Result<String> {
    let mut text = String::new();
    let mut depth = 1usize;
    let mut in_string = false;

    loop {
        let Some((_, ch)) = chars.next() else {
            return Err(PragmashError::UnclosedCommand { column: start });
        };

        if in_string {
            text.push(ch);
            match ch {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        text.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text);
                }
            }
            _ => {}
        }
        text.push(ch);
    }
}
