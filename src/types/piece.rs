use std::fmt;

/// One segment of a rule's template.
///
/// Templates are usually written in the compact notation parsed by
/// [`parse_template`](crate::template::parse_template), but pieces can also be
/// assembled directly with [`lit()`], [`rule_ref()`] and [`repeat()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Regular-expression text emitted verbatim.
    Literal(String),
    /// Exactly `n` repetitions of one arbitrary non-whitespace character.
    Repeat(usize),
    /// A reference to another rule. Without a binding the reference is
    /// matched (and its action still runs) but its value is not handed to the
    /// enclosing rule's action.
    Reference {
        rule: String,
        binding: Option<String>,
    },
}

impl Piece {
    /// Bind a reference's value under `name` in the enclosing action's arguments.
    /// Has no effect on literal pieces.
    #[must_use]
    pub fn bind(self, name: &str) -> Piece {
        match self {
            Piece::Reference { rule, .. } => Piece::Reference {
                rule,
                binding: Some(name.to_owned()),
            },
            other => other,
        }
    }

    /// The referenced rule name, if this piece is a reference.
    #[must_use]
    pub fn referenced_rule(&self) -> Option<&str> {
        match self {
            Piece::Reference { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

/// A literal regular-expression fragment.
#[must_use]
pub fn lit(text: &str) -> Piece {
    Piece::Literal(text.to_owned())
}

/// An unbound reference to the rule `name`. Use [`Piece::bind`] to pass its
/// value to the enclosing action.
#[must_use]
pub fn rule_ref(name: &str) -> Piece {
    Piece::Reference {
        rule: name.to_owned(),
        binding: None,
    }
}

/// Exactly `n` arbitrary non-whitespace characters.
#[must_use]
pub fn repeat(n: usize) -> Piece {
    Piece::Repeat(n)
}

/// How a reference's capture group is addressed inside its parent.
///
/// Named bindings are visible to the parent's action; positional ones are
/// numbered from 1 in template order and only exist so that every group has a
/// unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    Named(String),
    Positional(usize),
}

impl Binding {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Binding::Named(name) => Some(name),
            Binding::Positional(_) => None,
        }
    }
}

/// Renders the path segment a binding contributes to a capture-group name.
/// Names are identifiers, so `.` and `[]` never appear inside them.
impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Named(name) => write!(f, ".{name}"),
            Binding::Positional(n) => write!(f, "[{n}]"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Literal(text) => write!(f, "{text}"),
            Piece::Repeat(n) => write!(f, "#({n})"),
            Piece::Reference {
                rule,
                binding: Some(binding),
            } => write!(f, "#({rule}:{binding})"),
            Piece::Reference {
                rule,
                binding: None,
            } => write!(f, "#({rule})"),
        }
    }
}

/// Whether `name` is usable as a rule or binding name.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_sets_binding() {
        let piece = rule_ref("time").bind("start");
        assert_eq!(
            piece,
            Piece::Reference {
                rule: "time".into(),
                binding: Some("start".into()),
            }
        );
    }

    #[test]
    fn referenced_rule_only_for_references() {
        assert_eq!(rule_ref("time").bind("end").referenced_rule(), Some("time"));
        assert_eq!(rule_ref("to").referenced_rule(), Some("to"));
        assert_eq!(lit("#(to)").referenced_rule(), None);
        assert_eq!(repeat(2).referenced_rule(), None);
    }

    #[test]
    fn bind_ignores_literals() {
        assert_eq!(lit("到").bind("x"), lit("到"));
    }

    #[test]
    fn display_round_trips_template_notation() {
        let pieces = [
            lit("(?:"),
            rule_ref("date").bind("date"),
            lit("的?)?"),
            rule_ref("to"),
            repeat(3),
        ];
        let text: String = pieces.iter().map(ToString::to_string).collect();
        assert_eq!(text, "(?:#(date:date)的?)?#(to)#(3)");
    }

    #[test]
    fn binding_path_segments() {
        assert_eq!(Binding::Named("hour".into()).to_string(), ".hour");
        assert_eq!(Binding::Positional(2).to_string(), "[2]");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("week_date"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier("a[1]"));
        assert!(!is_identifier(""));
    }
}
