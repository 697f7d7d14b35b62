//! Turning a flat token list into a [`Command`].
//!
//! An embedded-command token is tokenized again and built into a nested
//! command, so arguments nest as deep as the source does (up to the
//! configured nesting limit).

use crate::ast::{Argument, Command};
use crate::error::{PragmashError, Result};
use crate::lexer::{self, Token};
use crate::limits::ParseLimits;

/// Convert one token into an argument using the default limits.
pub fn argument_from_token(token: &Token) -> Result<Argument> {
    build_argument(token, &ParseLimits::default(), 0)
}

/// Build a command from a token list using the default limits.
/// The first token is the name; the rest are arguments, in order.
pub fn command_from_tokens(tokens: &[Token]) -> Result<Command> {
    build_command(tokens, &ParseLimits::default(), 0)
}

pub(crate) fn build_argument(token: &Token, limits: &ParseLimits, depth: usize) -> Result<Argument> {
    match token {
        Token::Literal(text) => Ok(Argument::Literal(text.clone())),
        Token::Command(source) => {
            limits.check_depth(depth + 1)?;
            let tokens = lexer::tokenize(source)?;
            let command = build_command(&tokens, limits, depth + 1)?;
            Ok(Argument::Command(Box::new(command)))
        }
    }
}

pub(crate) fn build_command(tokens: &[Token], limits: &ParseLimits, depth: usize) -> Result<Command> {
    let (first, rest) = tokens.split_first().ok_or(PragmashError::EmptyCommand)?;

    let name = build_argument(first, limits, depth)?;
    let args = build_arguments(rest, limits, depth)?;

    Ok(Command { name, args })
}

pub(crate) fn build_arguments(tokens: &[Token], limits: &ParseLimits, depth: usize) -> Result<Vec<Argument>> {
    tokens
        .iter()
        .map(|t| build_argument(t, limits, depth))
        .collect()
}
