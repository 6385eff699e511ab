use regex::Regex;
use tracing::debug;

use crate::types::{Anchor, Binding, CompiledPattern, CompiledRule, GrammarError, Link, RuleId};

/// Fully qualified capture-group name of one reference site.
///
/// The top-level rule is `root`; each reference appends `.binding` or `[n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupPath(String);

impl GroupPath {
    pub(crate) fn root() -> Self {
        GroupPath("root".to_owned())
    }

    pub(crate) fn child(&self, binding: &Binding) -> Self {
        GroupPath(format!("{}{binding}", self.0))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Build the anchored top-level expression for `id`.
pub(crate) fn compile<V, C>(
    rules: &[CompiledRule<V, C>],
    id: RuleId,
) -> Result<CompiledPattern, GrammarError> {
    let rule = &rules[id.0];
    let mut body = String::new();
    write_body(rules, id, &GroupPath::root(), &mut body);

    let source = match rule.anchor {
        Anchor::Full => format!(r"\A(?:{body})\z"),
        Anchor::Prefix => format!(r"\A(?:{body})"),
    };
    let regex = Regex::new(&source).map_err(|e| GrammarError::InvalidPattern {
        rule: rule.name.clone(),
        message: e.to_string(),
    })?;

    debug!(
        rule = %rule.name,
        groups = regex.captures_len(),
        "pattern compiled"
    );
    Ok(CompiledPattern { source, regex })
}

/// Concatenate a rule's pieces, wrapping every reference in a named group
/// that holds the referenced rule's own body.
fn write_body<V, C>(rules: &[CompiledRule<V, C>], id: RuleId, path: &GroupPath, out: &mut String) {
    for link in &rules[id.0].links {
        match link {
            Link::Literal(text) => out.push_str(text),
            Link::Repeat(n) => out.push_str(&format!(r"\S{{{n}}}")),
            Link::Reference { binding, target } => {
                let child = path.child(binding);
                out.push_str(&format!("(?P<{}>", child.as_str()));
                write_body(rules, *target, &child, out);
                out.push(')');
            }
        }
    }
}
