use std::fmt;

use serde::Serialize;

/// A single argument to a command or loop header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// Literal text, taken from a bare word or a quoted string.
    Literal(String),
    /// A nested command: `(add 1 2)` used as an argument.
    Command(Box<Command>),
}

impl Argument {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            Self::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Literal(_) => None,
            Self::Command(cmd) => Some(cmd),
        }
    }
}

/// A command invocation: a name followed by zero or more arguments.
///
/// The name is itself an [`Argument`], so `(pick a b) x` calls whatever
/// command `(pick a b)` evaluates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub name: Argument,
    pub args: Vec<Argument>,
}

/// The header arguments of a `while` loop, in source order.
pub type Condition = Vec<Argument>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForBlock {
    /// Present only for the two-argument form `for k v }`.
    pub key: Option<Argument>,
    pub value: Argument,
    pub body: Blocks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhileBlock {
    pub condition: Condition,
    pub body: Blocks,
}

/// One statement-level unit of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Command(Command),
    For(ForBlock),
    While(WhileBlock),
}

/// Blocks in execution order.
pub type Blocks = Vec<Block>;

/// The two control constructs, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    While,
}

impl LoopKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::For => "for",
            Self::While => "while",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "for" => Some(Self::For),
            "while" => Some(Self::While),
            _ => None,
        }
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
