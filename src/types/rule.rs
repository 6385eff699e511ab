use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::args::Args;
use super::error::{GrammarError, SemanticError};
use super::piece::Binding;

/// Semantic action of a rule: receives the matched text, the values of its
/// named references and the caller's context.
pub type Action<V, C> = Box<dyn Fn(&str, Args<V>, &C) -> Result<V, SemanticError> + Send + Sync>;

/// Matching discipline used when a rule is invoked at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// The rule must consume the whole input.
    #[default]
    Full,
    /// The rule must match at the start of the input; trailing text is left over.
    Prefix,
}

/// Non-owning handle to a rule: its position in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A template piece after binding assignment. References carry the target's
/// name until resolution fills in its handle.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Literal(String),
    Repeat(usize),
    Reference {
        binding: Binding,
        rule: String,
        target: Option<RuleId>,
    },
}

/// A segment of a resolved rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Link {
    Literal(String),
    Repeat(usize),
    Reference { binding: Binding, target: RuleId },
}

/// A rule as held by the [`Registry`](crate::Registry) during declaration.
pub(crate) struct DeclaredRule<V, C> {
    pub(crate) name: String,
    pub(crate) anchor: Anchor,
    pub(crate) segments: Vec<Segment>,
    /// Referenced rules that are not resolvable yet.
    pub(crate) pending: BTreeSet<String>,
    pub(crate) resolved: bool,
    pub(crate) action: Action<V, C>,
}

impl<V, C> fmt::Debug for DeclaredRule<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredRule")
            .field("name", &self.name)
            .field("anchor", &self.anchor)
            .field("segments", &self.segments)
            .field("pending", &self.pending)
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

/// The regular expression derived from a rule, built on first use.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub(crate) source: String,
    pub(crate) regex: Regex,
}

impl CompiledPattern {
    /// The full regular-expression source, anchors included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// A resolved, immutable rule stored inside a [`Grammar`](crate::Grammar).
pub(crate) struct CompiledRule<V, C> {
    pub(crate) name: String,
    pub(crate) anchor: Anchor,
    pub(crate) links: Vec<Link>,
    pub(crate) action: Action<V, C>,
    pub(crate) pattern: OnceLock<Result<CompiledPattern, GrammarError>>,
}

impl<V, C> CompiledRule<V, C> {
    pub(crate) fn references(&self) -> impl Iterator<Item = (&Binding, RuleId)> {
        self.links.iter().filter_map(|link| match link {
            Link::Reference { binding, target } => Some((binding, *target)),
            _ => None,
        })
    }
}

impl<V, C> fmt::Debug for CompiledRule<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("name", &self.name)
            .field("anchor", &self.anchor)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}
