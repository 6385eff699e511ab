use thiserror::Error;

use crate::{GrammarError, ParseError, SemanticError};

/// Unified error type covering grammar construction, parsing, configuration
/// and I/O.
///
/// Returned by convenience constructors like
/// [`Interpreter::from_file()`](crate::booking::Interpreter::from_file).
#[derive(Debug, Error)]
pub enum RegramError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for RegramError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Grammar(err) => RegramError::Grammar(err),
            ParseError::Semantic(err) => RegramError::Semantic(err),
        }
    }
}
