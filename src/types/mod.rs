mod args;
mod error;
mod grammar;
mod outcome;
mod piece;
mod rule;

pub use args::Args;
pub use error::{GrammarError, ParseError, SemanticError};
pub use grammar::{Grammar, GrammarBuilder};
pub use outcome::{ParseOutcome, Parsed};
pub use piece::{lit, repeat, rule_ref, Binding, Piece};
pub use rule::{Action, Anchor, CompiledPattern, RuleId};

pub(crate) use piece::is_identifier;
pub(crate) use rule::{CompiledRule, DeclaredRule, Link, Segment};
