use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::args::Args;
use super::error::{GrammarError, ParseError, SemanticError};
use super::outcome::{ParseOutcome, Parsed};
use super::piece::Piece;
use super::rule::{Action, Anchor, CompiledPattern, CompiledRule, Link, RuleId};
use crate::resolve::Registry;
use crate::template::parse_template;

enum Body {
    Template(String),
    Pieces(Vec<Piece>),
}

struct RuleDef<V, C> {
    name: String,
    anchor: Anchor,
    body: Body,
    action: Action<V, C>,
}

/// Fluent builder for a [`Grammar`].
///
/// Rules are recorded in order and declared against a [`Registry`] by
/// [`build()`](Self::build), so references may point at rules defined further
/// down.
///
/// # Example
///
/// ```
/// use regram::{GrammarBuilder, SemanticError};
///
/// let grammar = GrammarBuilder::<i64>::new()
///     .rule("minutes", "#(number:n)分", |_, mut args, _| {
///         let n = args.take("n").unwrap_or(0);
///         if n < 60 { Ok(n) } else { Err(SemanticError::new("minute out of range")) }
///     })
///     .rule("number", "[0-9]+", |text, _, _| {
///         text.parse().map_err(|_| SemanticError::unrecognized(text))
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(grammar.parse("minutes", "45分", &()).unwrap().unwrap().value, 45);
/// assert!(grammar.parse("minutes", "75分", &()).is_err());
/// assert!(grammar.parse("minutes", "半", &()).unwrap().is_none());
/// ```
pub struct GrammarBuilder<V, C = ()> {
    defs: Vec<RuleDef<V, C>>,
}

impl<V, C> Default for GrammarBuilder<V, C> {
    fn default() -> Self {
        Self { defs: Vec::new() }
    }
}

impl<V, C> GrammarBuilder<V, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a whole-string rule from a template such as `#(hour:hour)#(minute)?`.
    #[must_use]
    pub fn rule<F>(self, name: &str, template: &str, action: F) -> Self
    where
        F: Fn(&str, Args<V>, &C) -> Result<V, SemanticError> + Send + Sync + 'static,
    {
        self.push(name, Anchor::Full, Body::Template(template.to_owned()), Box::new(action))
    }

    /// Define a rule that, invoked at the top level, only has to match a prefix
    /// of the input.
    #[must_use]
    pub fn prefix_rule<F>(self, name: &str, template: &str, action: F) -> Self
    where
        F: Fn(&str, Args<V>, &C) -> Result<V, SemanticError> + Send + Sync + 'static,
    {
        self.push(name, Anchor::Prefix, Body::Template(template.to_owned()), Box::new(action))
    }

    /// Define a rule from already assembled pieces.
    #[must_use]
    pub fn rule_pieces<F>(self, name: &str, anchor: Anchor, pieces: Vec<Piece>, action: F) -> Self
    where
        F: Fn(&str, Args<V>, &C) -> Result<V, SemanticError> + Send + Sync + 'static,
    {
        self.push(name, anchor, Body::Pieces(pieces), Box::new(action))
    }

    fn push(mut self, name: &str, anchor: Anchor, body: Body, action: Action<V, C>) -> Self {
        self.defs.push(RuleDef {
            name: name.to_owned(),
            anchor,
            body,
            action,
        });
        self
    }

    /// Declare every recorded rule and resolve the grammar.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidTemplate`] for malformed templates and
    /// any declaration or resolution error from [`Registry`].
    pub fn build(self) -> Result<Grammar<V, C>, GrammarError> {
        let mut registry = Registry::new();
        for def in self.defs {
            let pieces = match def.body {
                Body::Pieces(pieces) => pieces,
                Body::Template(template) => {
                    parse_template(&template).map_err(|source| GrammarError::InvalidTemplate {
                        rule: def.name.clone(),
                        source,
                    })?
                }
            };
            registry.declare_boxed(&def.name, def.anchor, pieces, def.action)?;
        }
        registry.finish()
    }
}

/// A resolved, immutable set of rules. Thread-safe and designed to live behind `Arc`.
///
/// Each rule's regular expression is compiled on first use and cached.
pub struct Grammar<V, C = ()> {
    pub(crate) rules: Vec<CompiledRule<V, C>>,
    pub(crate) index: HashMap<String, RuleId>,
    pub(crate) resolution_order: Vec<RuleId>,
}

impl<V, C> Grammar<V, C> {
    /// Match `rule` against `input` and decompose the match into a value.
    ///
    /// Returns `Ok(None)` when the input does not have the rule's shape.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Semantic`] when any action along the match
    /// rejects its text, and [`ParseError::Grammar`] for an unknown rule or an
    /// invalid pattern.
    pub fn parse<'i>(
        &self,
        rule: &str,
        input: &'i str,
        ctx: &C,
    ) -> Result<Option<Parsed<'i, V>>, ParseError> {
        let id = self.lookup(rule)?;
        let pattern = self.compiled(id)?;

        let Some(caps) = pattern.regex.captures(input) else {
            trace!(rule, input, "no match");
            return Ok(None);
        };
        let end = caps.get(0).map_or(0, |m| m.end());

        let value = crate::dispatch::dispatch(&self.rules, id, &caps, ctx).map_err(|err| {
            debug!(rule, input, reason = err.reason(), "semantic rejection");
            err
        })?;

        Ok(Some(Parsed {
            value,
            matched: &input[..end],
            rest: &input[end..],
        }))
    }

    /// Match `rule` against `input`, folding semantic errors into the outcome.
    ///
    /// # Errors
    ///
    /// Only configuration errors are returned as `Err`.
    pub fn try_parse(&self, rule: &str, input: &str, ctx: &C) -> Result<ParseOutcome<V>, GrammarError> {
        match self.parse(rule, input, ctx) {
            Ok(Some(parsed)) => Ok(ParseOutcome::Matched(parsed.value)),
            Ok(None) => Ok(ParseOutcome::NoMatch),
            Err(ParseError::Semantic(err)) => Ok(ParseOutcome::Failed(err.into_reason())),
            Err(ParseError::Grammar(err)) => Err(err),
        }
    }

    /// The compiled top-level pattern of `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownRule`] or [`GrammarError::InvalidPattern`].
    pub fn pattern(&self, rule: &str) -> Result<&CompiledPattern, GrammarError> {
        let id = self.lookup(rule)?;
        self.compiled(id)
    }

    /// Compile every rule now instead of on first use.
    ///
    /// # Errors
    ///
    /// Returns the first [`GrammarError::InvalidPattern`] encountered.
    pub fn precompile(&self) -> Result<(), GrammarError> {
        for index in 0..self.rules.len() {
            self.compiled(RuleId(index))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, rule: &str) -> bool {
        self.index.contains_key(rule)
    }

    #[must_use]
    pub fn anchor(&self, rule: &str) -> Option<Anchor> {
        self.index.get(rule).map(|id| self.rules[id.0].anchor)
    }

    /// Rule names in declaration order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Rule names in the order they became resolved.
    ///
    /// Every rule appears after all the rules it references.
    #[must_use]
    pub fn resolution_order(&self) -> Vec<&str> {
        self.resolution_order
            .iter()
            .map(|id| self.rules[id.0].name.as_str())
            .collect()
    }

    /// Names of the rules referenced directly by `rule`, in template order.
    ///
    /// Returns `None` if the rule name is not found.
    #[must_use]
    pub fn dependencies_of(&self, rule: &str) -> Option<Vec<&str>> {
        self.index.get(rule).map(|id| {
            self.rules[id.0]
                .links
                .iter()
                .filter_map(|link| match link {
                    Link::Reference { target, .. } => Some(self.rules[target.0].name.as_str()),
                    _ => None,
                })
                .collect()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn lookup(&self, rule: &str) -> Result<RuleId, GrammarError> {
        self.index
            .get(rule)
            .copied()
            .ok_or_else(|| GrammarError::UnknownRule {
                name: rule.to_owned(),
            })
    }

    fn compiled(&self, id: RuleId) -> Result<&CompiledPattern, GrammarError> {
        self.rules[id.0]
            .pattern
            .get_or_init(|| crate::compile::compile(&self.rules, id))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl<V, C> fmt::Debug for Grammar<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<V, C> fmt::Display for Grammar<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compiled = self.rules.iter().filter(|r| r.pattern.get().is_some()).count();
        write!(f, "Grammar({} rules, {} compiled)", self.rules.len(), compiled)
    }
}
