use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, info, trace};

use crate::types::{
    is_identifier, Action, Anchor, Args, Binding, CompiledRule, DeclaredRule, Grammar,
    GrammarError, Link, Piece, RuleId, Segment, SemanticError,
};

/// Collects rule declarations and resolves forward references as they become
/// satisfiable.
///
/// A rule may reference rules that have not been declared yet. It stays
/// unresolved until every rule it references is itself resolved; the registry
/// keeps a reverse map from each outstanding name to the rules waiting on it
/// and resolves dependents depth-first the moment their last dependency lands.
///
/// Declaration is single-threaded. [`finish()`](Self::finish) freezes the
/// registry into an immutable, shareable [`Grammar`].
///
/// # Example
///
/// ```
/// use regram::{lit, rule_ref, Anchor, Registry};
///
/// let mut registry: Registry<i64> = Registry::new();
/// // `pair` refers to `digit` before it exists.
/// registry
///     .declare(
///         "pair",
///         Anchor::Full,
///         vec![rule_ref("digit").bind("a"), lit(","), rule_ref("digit").bind("b")],
///         |_, mut args, _| Ok(args.take("a").unwrap_or(0) * 10 + args.take("b").unwrap_or(0)),
///     )
///     .unwrap();
/// registry
///     .declare("digit", Anchor::Full, vec![lit("[0-9]")], |text, _, _| {
///         Ok(text.parse::<i64>().unwrap_or(0))
///     })
///     .unwrap();
///
/// let grammar = registry.finish().unwrap();
/// assert_eq!(grammar.parse("pair", "4,2", &()).unwrap().unwrap().value, 42);
/// ```
pub struct Registry<V, C = ()> {
    rules: Vec<DeclaredRule<V, C>>,
    index: HashMap<String, RuleId>,
    /// dependents[X] = rules whose resolution waits on X
    dependents: HashMap<String, BTreeSet<String>>,
    resolution_order: Vec<RuleId>,
}

impl<V, C> Default for Registry<V, C> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::new(),
            dependents: HashMap::new(),
            resolution_order: Vec::new(),
        }
    }
}

impl<V, C> Registry<V, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule.
    ///
    /// Unbound references receive positional bindings numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidName`] for a name that is not an
    /// identifier, [`GrammarError::DuplicateRule`] if `name` is taken, and
    /// [`GrammarError::DuplicateBinding`] if two references share a binding.
    pub fn declare<F>(
        &mut self,
        name: &str,
        anchor: Anchor,
        pieces: Vec<Piece>,
        action: F,
    ) -> Result<RuleId, GrammarError>
    where
        F: Fn(&str, Args<V>, &C) -> Result<V, SemanticError> + Send + Sync + 'static,
    {
        self.declare_boxed(name, anchor, pieces, Box::new(action))
    }

    pub(crate) fn declare_boxed(
        &mut self,
        name: &str,
        anchor: Anchor,
        pieces: Vec<Piece>,
        action: Action<V, C>,
    ) -> Result<RuleId, GrammarError> {
        if !is_identifier(name) {
            return Err(GrammarError::InvalidName {
                name: name.to_owned(),
            });
        }
        if self.index.contains_key(name) {
            return Err(GrammarError::DuplicateRule {
                name: name.to_owned(),
            });
        }

        let segments = assign_bindings(name, pieces)?;

        let pending: BTreeSet<String> = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Reference { rule, .. } if !self.is_resolved(rule) => Some(rule.clone()),
                _ => None,
            })
            .collect();
        for dependency in &pending {
            self.dependents
                .entry(dependency.clone())
                .or_default()
                .insert(name.to_owned());
        }

        let id = RuleId(self.rules.len());
        let resolvable = pending.is_empty();
        debug!(rule = name, pending = ?pending, "rule declared");

        self.rules.push(DeclaredRule {
            name: name.to_owned(),
            anchor,
            segments,
            pending,
            resolved: false,
            action,
        });
        self.index.insert(name.to_owned(), id);

        if resolvable {
            self.resolve(id);
        }
        Ok(id)
    }

    /// Whether `name` is declared and resolved.
    #[must_use]
    pub fn is_resolved(&self, name: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|id| self.rules[id.0].resolved)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Unresolved rules in declaration order, each with the names it still waits on.
    #[must_use]
    pub fn unresolved(&self) -> Vec<(&str, Vec<&str>)> {
        self.rules
            .iter()
            .filter(|rule| !rule.resolved)
            .map(|rule| {
                (
                    rule.name.as_str(),
                    rule.pending.iter().map(String::as_str).collect(),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// End the declaration phase and freeze the registry into a [`Grammar`].
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnresolvedRule`] naming the undeclared rules an
    /// unresolved rule depends on, or [`GrammarError::CyclicDependency`] when
    /// the rule only waits on other rules of a reference cycle.
    pub fn finish(self) -> Result<Grammar<V, C>, GrammarError> {
        if let Some(stuck) = self.rules.iter().position(|rule| !rule.resolved) {
            let id = RuleId(stuck);
            let missing = self.missing_names(id);
            if missing.is_empty() {
                return Err(GrammarError::CyclicDependency {
                    path: self.find_cycle(id),
                });
            }
            return Err(GrammarError::UnresolvedRule {
                rule: self.rules[stuck].name.clone(),
                missing,
            });
        }
        debug_assert!(self.dependents.is_empty());

        let rules = self
            .rules
            .into_iter()
            .map(|rule| {
                let links = rule
                    .segments
                    .into_iter()
                    .map(|segment| into_link(&rule.name, segment))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledRule {
                    name: rule.name,
                    anchor: rule.anchor,
                    links,
                    action: rule.action,
                    pattern: OnceLock::new(),
                })
            })
            .collect::<Result<Vec<CompiledRule<V, C>>, GrammarError>>()?;

        info!(rules = rules.len(), "grammar resolved");

        Ok(Grammar {
            rules,
            index: self.index,
            resolution_order: self.resolution_order,
        })
    }

    /// Bind a resolvable rule's references to their targets, then resolve
    /// every dependent that was only waiting on it, depth-first.
    /// Iterative, so forward chains of any length resolve in constant stack.
    fn resolve(&mut self, root: RuleId) {
        let mut worklist = vec![root];
        while let Some(id) = worklist.pop() {
            let index = &self.index;
            let rule = &mut self.rules[id.0];
            for segment in &mut rule.segments {
                if let Segment::Reference { rule, target, .. } = segment {
                    *target = index.get(rule.as_str()).copied();
                }
            }
            rule.resolved = true;
            let name = rule.name.clone();
            self.resolution_order.push(id);
            trace!(rule = %name, "rule resolved");

            let Some(waiting) = self.dependents.remove(&name) else {
                continue;
            };
            // reversed so the first dependent is popped first
            for dependent in waiting.iter().rev() {
                let Some(&dependent_id) = self.index.get(dependent) else {
                    continue;
                };
                let rule = &mut self.rules[dependent_id.0];
                rule.pending.remove(&name);
                if rule.pending.is_empty() && !rule.resolved {
                    worklist.push(dependent_id);
                }
            }
        }
    }

    /// Undeclared names reachable through the pending sets of `id`.
    fn missing_names(&self, id: RuleId) -> Vec<String> {
        let mut missing = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for name in &self.rules[current.0].pending {
                match self.index.get(name) {
                    Some(&next) => stack.push(next),
                    None => {
                        missing.insert(name.clone());
                    }
                }
            }
        }
        missing.into_iter().collect()
    }

    /// Follow pending edges from `start` until a rule repeats.
    fn find_cycle(&self, start: RuleId) -> Vec<String> {
        let mut path: Vec<RuleId> = vec![start];
        let mut current = start;
        loop {
            let next = self.rules[current.0]
                .pending
                .iter()
                .find_map(|name| self.index.get(name).copied());
            let Some(next) = next else {
                break;
            };
            if let Some(pos) = path.iter().position(|&id| id == next) {
                let mut cycle: Vec<String> = path[pos..]
                    .iter()
                    .map(|id| self.rules[id.0].name.clone())
                    .collect();
                cycle.push(self.rules[next.0].name.clone());
                return cycle;
            }
            path.push(next);
            current = next;
        }
        path.iter()
            .map(|id| self.rules[id.0].name.clone())
            .collect()
    }
}

impl<V, C> fmt::Debug for Registry<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.rules)
            .field("dependents", &self.dependents)
            .finish_non_exhaustive()
    }
}

/// Turn pieces into segments, numbering unbound references and rejecting
/// repeated or malformed binding names.
fn assign_bindings(rule: &str, pieces: Vec<Piece>) -> Result<Vec<Segment>, GrammarError> {
    let mut seen = HashSet::new();
    let mut positional = 0;
    let mut segments = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let segment = match piece {
            Piece::Literal(text) => Segment::Literal(text),
            Piece::Repeat(n) => Segment::Repeat(n),
            Piece::Reference {
                rule: target,
                binding,
            } => {
                if !is_identifier(&target) {
                    return Err(GrammarError::InvalidName { name: target });
                }
                let binding = match binding {
                    Some(name) => {
                        if !is_identifier(&name) {
                            return Err(GrammarError::InvalidName { name });
                        }
                        if !seen.insert(name.clone()) {
                            return Err(GrammarError::DuplicateBinding {
                                rule: rule.to_owned(),
                                binding: name,
                            });
                        }
                        Binding::Named(name)
                    }
                    None => {
                        positional += 1;
                        Binding::Positional(positional)
                    }
                };
                Segment::Reference {
                    binding,
                    rule: target,
                    target: None,
                }
            }
        };
        segments.push(segment);
    }
    Ok(segments)
}

fn into_link(owner: &str, segment: Segment) -> Result<Link, GrammarError> {
    Ok(match segment {
        Segment::Literal(text) => Link::Literal(text),
        Segment::Repeat(n) => Link::Repeat(n),
        Segment::Reference {
            binding,
            rule,
            target,
        } => Link::Reference {
            binding,
            target: target.ok_or_else(|| GrammarError::UnresolvedRule {
                rule: owner.to_owned(),
                missing: vec![rule],
            })?,
        },
    })
}
