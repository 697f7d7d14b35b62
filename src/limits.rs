// Parser safety limits
//
// Bounds input size and nesting depth so pathological scripts fail with an
// error instead of exhausting memory or the stack. Defaults are permissive
// and can be overridden from a `[limits]` table in a TOML file.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{PragmashError, Result};

/// Highest `max_nesting_depth` that `validate` accepts.
pub const MAX_NESTING_DEPTH: usize = 1_024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_input_size: usize,    // bytes of source text
    pub max_nesting_depth: usize, // block bodies and embedded commands combined
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000, // 10 MB
            max_nesting_depth: 256,
        }
    }
}

impl ParseLimits {
    /// Load limits from a TOML file, falling back to defaults.
    ///
    /// Returns an error only if the file is unreadable or malformed, not if
    /// it is missing.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("no limits file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            PragmashError::Config(msg) => PragmashError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse limits from TOML text; only the keys present override defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LimitsFile =
            toml::from_str(content).map_err(|e| PragmashError::Config(e.to_string()))?;

        let mut limits = Self::default();
        if let Some(section) = config.limits {
            if let Some(v) = section.max_input_size {
                limits.max_input_size = v;
            }
            if let Some(v) = section.max_nesting_depth {
                limits.max_nesting_depth = v;
            }
        }

        limits.validate()?;
        Ok(limits)
    }

    /// Reject zero and absurdly large values.
    ///
    /// Nesting recurses on the call stack, so the depth cap must stay
    /// reachable on a default 8 MB main-thread stack.
    pub fn validate(&self) -> Result<()> {
        const MAX_REASONABLE_INPUT: usize = 100_000_000; // 100 MB

        if self.max_input_size == 0 || self.max_input_size > MAX_REASONABLE_INPUT {
            return Err(invalid("max_input_size", self.max_input_size));
        }
        if self.max_nesting_depth == 0 || self.max_nesting_depth > MAX_NESTING_DEPTH {
            return Err(invalid("max_nesting_depth", self.max_nesting_depth));
        }
        Ok(())
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_nesting_depth {
            return Err(PragmashError::NestingTooDeep {
                depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn check_input(&self, source: &str) -> Result<()> {
        if source.len() > self.max_input_size {
            return Err(PragmashError::InputTooLarge {
                size: source.len(),
                max: self.max_input_size,
            });
        }
        Ok(())
    }
}

fn invalid(name: &str, value: usize) -> PragmashError {
    PragmashError::Config(format!(
        "invalid limit '{}': {} (must be positive and reasonable)",
        name, value
    ))
}

#[derive(Debug, Deserialize)]
struct LimitsFile {
    limits: Option<LimitsSection>,
}

#[derive(Debug, Deserialize)]
struct LimitsSection {
    max_input_size: Option<usize>,
    max_nesting_depth: Option<usize>,
}
