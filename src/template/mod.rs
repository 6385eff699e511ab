mod error;
mod grammar;

pub use error::TemplateError;

use crate::Piece;

/// Parse a rule template into pieces.
///
/// Everything is regular-expression text except references:
///
/// - `#(rule)` references `rule` without passing its value on,
/// - `#(rule:binding)` passes its value to the action as `binding`,
/// - `#(n)` matches exactly `n` arbitrary non-whitespace characters.
///
/// A `#` not followed by `(` is literal text.
///
/// # Errors
///
/// Returns [`TemplateError`] if a reference is malformed.
pub fn parse_template(input: &str) -> Result<Vec<Piece>, TemplateError> {
    use winnow::Parser;
    grammar::template.parse(input).map_err(|e| {
        let message = e.inner().to_string();
        let message = if message.is_empty() {
            "malformed reference".to_owned()
        } else {
            message.replace('\n', "; ")
        };
        TemplateError::new(e.offset(), message)
    })
}
