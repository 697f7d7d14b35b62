use log::{debug, trace};

use crate::ast::{Block, Blocks, ForBlock, LoopKind, WhileBlock};
use crate::command::{build_arguments, build_command};
use crate::error::{PragmashError, Result};
use crate::lexer::{self, Token};
use crate::limits::ParseLimits;
use crate::script::{self, Script};

/// Ends a loop header (as its last token) and closes a body (as the first
/// token of a line). The same symbol serves both roles.
pub const BODY_MARKER: &str = "}";

/// Parse a full pragmash source string into its top-level blocks.
pub fn parse_program(source: &str) -> Result<Blocks> {
    parse_program_with_limits(source, &ParseLimits::default())
}

pub fn parse_program_with_limits(source: &str, limits: &ParseLimits) -> Result<Blocks> {
    limits.check_input(source)?;
    let script = script::parse_script(source)?;
    parse_script_blocks(&script, limits)
}

/// Parse an already split script.
pub fn parse_script_blocks(script: &Script, limits: &ParseLimits) -> Result<Blocks> {
    debug!("parsing {} logical lines", script.len());

    let mut ctx = ParseContext::new(script, limits);
    let mut blocks = Vec::new();
    while !ctx.at_end() {
        if let Some(block) = ctx.next_block()? {
            blocks.push(block);
        }
    }

    debug!("parsed {} top-level blocks", blocks.len());
    Ok(blocks)
}

// ---------------------------------------------------------------------------
// Internal parser state
// ---------------------------------------------------------------------------

/// Cursor over the logical lines of one script. Only moves forward.
struct ParseContext<'a> {
    script: &'a Script,
    limits: &'a ParseLimits,
    cursor: usize,
    /// Number of enclosing block bodies.
    depth: usize,
}

impl<'a> ParseContext<'a> {
    fn new(script: &'a Script, limits: &'a ParseLimits) -> Self {
        Self {
            script,
            limits,
            cursor: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.script.len()
    }

    /// Tokenize the line under the cursor without consuming it.
    fn tokenize_current(&self) -> Result<Vec<Token>> {
        lexer::tokenize(self.script.line(self.cursor))
            .map_err(|e| PragmashError::at_line(self.script.line_number(self.cursor), e))
    }

    /// Read the block starting at the cursor.
    /// `None` means the line was blank: skip it, it is not end of input.
    fn next_block(&mut self) -> Result<Option<Block>> {
        if self.at_end() {
            return Ok(None);
        }
        let tokens = self.tokenize_current()?;
        self.block_from_line(tokens)
    }

    /// Consume the current line, whose tokens are already known.
    fn block_from_line(&mut self, tokens: Vec<Token>) -> Result<Option<Block>> {
        let lineno = self.script.line_number(self.cursor);
        self.cursor += 1;
        trace!("line {}: {} tokens", lineno, tokens.len());

        if tokens.is_empty() {
            return Ok(None);
        }

        self.read_statement(&tokens, lineno)
            .map(Some)
            .map_err(|e| PragmashError::at_line(lineno, e))
    }

    fn read_statement(&mut self, tokens: &[Token], lineno: usize) -> Result<Block> {
        let keyword = match &tokens[0] {
            Token::Literal(word) => LoopKind::from_keyword(word),
            Token::Command(_) => None,
        };

        match keyword {
            Some(LoopKind::For) => {
                debug!("line {}: for-loop", lineno);
                self.read_for_loop(tokens).map(Block::For)
            }
            Some(LoopKind::While) => {
                debug!("line {}: while-loop", lineno);
                self.read_while_loop(tokens).map(Block::While)
            }
            None => build_command(tokens, self.limits, self.depth).map(Block::Command),
        }
    }

    // -----------------------------------------------------------------------
    // Control blocks
    // -----------------------------------------------------------------------

    /// `for value }` or `for key value }`, followed by a body.
    fn read_for_loop(&mut self, tokens: &[Token]) -> Result<ForBlock> {
        if !has_body_open_marker(tokens) {
            return Err(PragmashError::MissingBodyOpen(LoopKind::For));
        }
        if tokens.len() != 3 && tokens.len() != 4 {
            return Err(PragmashError::ForLoopArity(tokens.len().saturating_sub(2)));
        }

        let header = &tokens[1..tokens.len() - 1];
        let mut args = build_arguments(header, self.limits, self.depth)?.into_iter();
        let (key, value) = match (args.next(), args.next()) {
            (Some(value), None) => (None, value),
            (Some(key), Some(value)) => (Some(key), value),
            _ => return Err(PragmashError::ForLoopArity(header.len())),
        };

        let body = self.read_block_body(false)?;
        Ok(ForBlock { key, value, body })
    }

    /// `while arg* }`, followed by a body. The condition may be empty.
    fn read_while_loop(&mut self, tokens: &[Token]) -> Result<WhileBlock> {
        if !has_body_open_marker(tokens) {
            return Err(PragmashError::MissingBodyOpen(LoopKind::While));
        }

        let header = &tokens[1..tokens.len() - 1];
        let condition = build_arguments(header, self.limits, self.depth)?;

        let body = self.read_block_body(false)?;
        Ok(WhileBlock { condition, body })
    }

    /// Read blocks up to and including the line that starts with the close
    /// marker.
    fn read_block_body(&mut self, allow_trailing: bool) -> Result<Blocks> {
        self.depth += 1;
        let body = self.limits.check_depth(self.depth).and_then(|()| self.read_body_lines(allow_trailing));
        self.depth -= 1;
        body
    }

    fn read_body_lines(&mut self, allow_trailing: bool) -> Result<Blocks> {
        let mut body = Vec::new();

        while !self.at_end() {
            let tokens = self.tokenize_current()?;

            if tokens.first().is_some_and(|t| t.is_literal(BODY_MARKER)) {
                if !allow_trailing && tokens.len() > 1 {
                    return Err(PragmashError::TrailingTokensAfterClose);
                }
                trace!("line {}: close marker", self.script.line_number(self.cursor));
                self.cursor += 1;
                return Ok(body);
            }

            if let Some(block) = self.block_from_line(tokens)? {
                body.push(block);
            }
        }

        Err(PragmashError::MissingClose)
    }
}

/// A loop header opens a body when it has more than one token and its last
/// token is the literal marker.
fn has_body_open_marker(tokens: &[Token]) -> bool {
    tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_literal(BODY_MARKER))
}
