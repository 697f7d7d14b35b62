use thiserror::Error;

use crate::ast::LoopKind;

#[derive(Debug, Error)]
pub enum PragmashError {
    // -----------------------------------------------------------------------
    // Line splitting
    // -----------------------------------------------------------------------
    #[error("line continuation at end of script (line {line})")]
    DanglingContinuation { line: usize },

    // -----------------------------------------------------------------------
    // Tokenizing
    // -----------------------------------------------------------------------
    #[error("unterminated string starting at column {column}")]
    UnterminatedString { column: usize },
    #[error("invalid escape sequence '\\{escape}' at column {column}")]
    InvalidEscape { escape: char, column: usize },
    #[error("missing ) for sub-command starting at column {column}")]
    UnclosedCommand { column: usize },
    #[error("unexpected ) at column {column}")]
    UnexpectedCloseParen { column: usize },

    // -----------------------------------------------------------------------
    // Block structure
    // -----------------------------------------------------------------------
    #[error("no tokens in command")]
    EmptyCommand,
    #[error("missing body-open marker '}}' in {0}-loop")]
    MissingBodyOpen(LoopKind),
    #[error("invalid number of arguments for for-loop: expected 1 or 2, found {0}")]
    ForLoopArity(usize),
    #[error("unexpected tokens after close marker '}}'")]
    TrailingTokensAfterClose,
    #[error("missing close marker '}}'")]
    MissingClose,

    // -----------------------------------------------------------------------
    // Limits
    // -----------------------------------------------------------------------
    #[error("nesting too deep: {depth} levels (max {max})")]
    NestingTooDeep { depth: usize, max: usize },
    #[error("input too large: {size} bytes (max {max})")]
    InputTooLarge { size: usize, max: usize },

    /// A failure raised while processing one logical line, tagged with the
    /// physical line that logical line started on.
    #[error("Error at line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<PragmashError>,
    },

    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PragmashError {
    pub(crate) fn at_line(line: usize, source: PragmashError) -> Self {
        Self::AtLine {
            line,
            source: Box::new(source),
        }
    }

    /// Outermost source line this error was decorated with, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The undecorated failure underneath every `Error at line N:` layer.
    pub fn root_cause(&self) -> &PragmashError {
        let mut err = self;
        while let Self::AtLine { source, .. } = err {
            err = source;
        }
        err
    }
}

pub type Result<T> = std::result::Result<T, PragmashError>;
