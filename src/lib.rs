pub mod booking;
mod compile;
mod dispatch;
mod error;
mod resolve;
pub mod template;
mod types;

pub use error::RegramError;
pub use resolve::Registry;
pub use types::{
    lit, repeat, rule_ref, Action, Anchor, Args, Binding, CompiledPattern, Grammar,
    GrammarBuilder, GrammarError, ParseError, ParseOutcome, Parsed, Piece, RuleId, SemanticError,
};
