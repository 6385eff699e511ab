use regex::Captures;

use crate::compile::GroupPath;
use crate::types::{Args, Binding, CompiledRule, RuleId, SemanticError};

/// Decompose a successful top-level match of `id` into its value.
pub(crate) fn dispatch<V, C>(
    rules: &[CompiledRule<V, C>],
    id: RuleId,
    caps: &Captures<'_>,
    ctx: &C,
) -> Result<V, SemanticError> {
    let text = caps.get(0).map_or("", |m| m.as_str());
    decompose(rules, id, caps, &GroupPath::root(), text, ctx)
}

/// Evaluate the children of `id` bottom-up, then its own action.
///
/// Children are visited in template order; the first semantic error aborts
/// the walk. A child whose group did not participate contributes `None`.
fn decompose<V, C>(
    rules: &[CompiledRule<V, C>],
    id: RuleId,
    caps: &Captures<'_>,
    path: &GroupPath,
    text: &str,
    ctx: &C,
) -> Result<V, SemanticError> {
    let rule = &rules[id.0];
    let mut args = Args::new();

    for (binding, target) in rule.references() {
        let child = path.child(binding);
        let value = match caps.name(child.as_str()) {
            Some(m) => Some(decompose(rules, target, caps, &child, m.as_str(), ctx)?),
            None => None,
        };
        if let Binding::Named(name) = binding {
            args.insert(name, value);
        }
    }

    (rule.action)(text, args, ctx)
}
