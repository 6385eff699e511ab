use std::fmt;

/// Result of trying one top-level rule against a piece of text.
///
/// `NoMatch` means the caller should try its next candidate rule. `Failed`
/// is an authoritative rejection carrying a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ParseOutcome<T> {
    Matched(T),
    NoMatch,
    Failed(String),
}

impl<T> ParseOutcome<T> {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, ParseOutcome::Matched(_))
    }

    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, ParseOutcome::NoMatch)
    }

    #[must_use]
    pub fn matched(self) -> Option<T> {
        match self {
            ParseOutcome::Matched(value) => Some(value),
            _ => None,
        }
    }

    /// The rejection message, if the attempt failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            ParseOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            ParseOutcome::Matched(value) => ParseOutcome::Matched(f(value)),
            ParseOutcome::NoMatch => ParseOutcome::NoMatch,
            ParseOutcome::Failed(message) => ParseOutcome::Failed(message),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ParseOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseOutcome::Matched(value) => write!(f, "matched: {value}"),
            ParseOutcome::NoMatch => write!(f, "no match"),
            ParseOutcome::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// A successful match of a top-level rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<'i, V> {
    pub value: V,
    /// The text consumed by the rule.
    pub matched: &'i str,
    /// Unconsumed input; always empty for [`Anchor::Full`](super::Anchor::Full) rules.
    pub rest: &'i str,
}
