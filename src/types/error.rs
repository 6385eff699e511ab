use thiserror::Error;

use crate::template::TemplateError;

/// Configuration errors raised while declaring, resolving or compiling rules.
///
/// These are programmer errors: a grammar that produces one should abort
/// startup rather than serve requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("invalid rule or binding name '{name}'")]
    InvalidName { name: String },

    #[error("duplicate rule name '{name}'")]
    DuplicateRule { name: String },

    #[error("binding '{binding}' occurs more than once in rule '{rule}'")]
    DuplicateBinding { rule: String, binding: String },

    #[error("rule '{rule}' is unresolved; missing: {}", missing.join(", "))]
    UnresolvedRule { rule: String, missing: Vec<String> },

    #[error("cyclic dependency detected: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    #[error("rule '{rule}' compiles to an invalid pattern: {message}")]
    InvalidPattern { rule: String, message: String },

    #[error("invalid template for rule '{rule}': {source}")]
    InvalidTemplate {
        rule: String,
        #[source]
        source: TemplateError,
    },
}

/// The input matched a rule's shape but its content is not acceptable.
///
/// Raised by semantic actions. The reason is user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct SemanticError {
    reason: String,
}

impl SemanticError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The standard rejection for text that could not be understood.
    pub fn unrecognized(text: &str) -> Self {
        Self::new(format!("不能识别\"{text}\""))
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn into_reason(self) -> String {
        self.reason
    }
}

/// Failure of a single parse attempt. A structural no-match is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
