//! Parser for pragmash, a small line-oriented scripting language.
//!
//! A script is a sequence of logical lines. Each line is either a plain
//! command (`echo hi (upper there)`) or the header of a `for`/`while` loop
//! whose body runs until a line starting with `}`:
//!
//! ```text
//! for name }
//!     echo hello (upper name)
//! }
//! ```
//!
//! [`parse_program`] turns source text into a tree of [`Block`]s. Nothing
//! here evaluates the tree.

pub mod ast;
pub mod command;
pub mod error;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod script;

pub use ast::{Argument, Block, Blocks, Command, Condition, ForBlock, LoopKind, WhileBlock};
pub use command::{argument_from_token, command_from_tokens};
pub use error::{PragmashError, Result};
pub use lexer::{tokenize, Token};
pub use limits::ParseLimits;
pub use parser::{parse_program, parse_program_with_limits, parse_script_blocks, BODY_MARKER};
pub use script::{parse_script, Script};
