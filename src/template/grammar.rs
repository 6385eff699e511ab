use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

use crate::Piece;

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- References -------------------------------------------------------------

fn repeat_count(input: &mut &str) -> ModalResult<Piece> {
    digit1
        .try_map(str::parse::<usize>)
        .map(Piece::Repeat)
        .parse_next(input)
}

fn rule_reference(input: &mut &str) -> ModalResult<Piece> {
    let (rule, binding) = (
        ident,
        opt(preceded(
            ':',
            cut_err(ident).context(StrContext::Expected(StrContextValue::Description(
                "binding name",
            ))),
        )),
    )
        .parse_next(input)?;
    Ok(Piece::Reference {
        rule: rule.to_owned(),
        binding: binding.map(str::to_owned),
    })
}

fn reference(input: &mut &str) -> ModalResult<Piece> {
    preceded(
        "#(",
        cut_err(terminated(
            alt((repeat_count, rule_reference)).context(StrContext::Expected(
                StrContextValue::Description("rule name or repeat count"),
            )),
            ')'.context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
        )),
    )
    .parse_next(input)
}

// -- Literal text -----------------------------------------------------------

fn literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((take_till(1.., '#'), "#")).parse_next(input)
}

// -- Top-level parser -------------------------------------------------------

fn piece(input: &mut &str) -> ModalResult<Piece> {
    alt((reference, literal.map(|s: &str| Piece::Literal(s.to_owned())))).parse_next(input)
}

pub(super) fn template(input: &mut &str) -> ModalResult<Vec<Piece>> {
    let pieces: Vec<Piece> = repeat(0.., piece).parse_next(input)?;

    let mut merged: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let (Some(Piece::Literal(prev)), Piece::Literal(text)) = (merged.last_mut(), &piece) {
            prev.push_str(text);
            continue;
        }
        merged.push(piece);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use crate::template::parse_template;
    use crate::{lit, repeat, rule_ref, Piece};

    #[test]
    fn plain_literal() {
        assert_eq!(parse_template(r"[0-9]+").unwrap(), vec![lit("[0-9]+")]);
    }

    #[test]
    fn empty_template() {
        assert_eq!(parse_template("").unwrap(), Vec::<Piece>::new());
    }

    #[test]
    fn named_and_positional_references() {
        let pieces = parse_template(r"#(time:start)\s*#(to)\s*#(time:end)").unwrap();
        assert_eq!(
            pieces,
            vec![
                rule_ref("time").bind("start"),
                lit(r"\s*"),
                rule_ref("to"),
                lit(r"\s*"),
                rule_ref("time").bind("end"),
            ]
        );
    }

    #[test]
    fn optional_group_around_reference() {
        let pieces = parse_template("(?:#(year:year)?#(month:month))?#(day:day)").unwrap();
        assert_eq!(
            pieces,
            vec![
                lit("(?:"),
                rule_ref("year").bind("year"),
                lit("?"),
                rule_ref("month").bind("month"),
                lit(")?"),
                rule_ref("day").bind("day"),
            ]
        );
    }

    #[test]
    fn repeat_count() {
        assert_eq!(
            parse_template("#(2)后天").unwrap(),
            vec![repeat(2), lit("后天")]
        );
    }

    #[test]
    fn lone_hash_is_literal() {
        assert_eq!(parse_template("#1#x").unwrap(), vec![lit("#1#x")]);
    }

    #[test]
    fn unclosed_reference_fails() {
        let err = parse_template("ab#(time").unwrap_err();
        assert_eq!(err.offset(), 8);
    }

    #[test]
    fn missing_binding_name_fails() {
        assert!(parse_template("#(time:)").is_err());
    }

    #[test]
    fn bad_rule_name_fails() {
        let err = parse_template("#(-x)").unwrap_err();
        assert_eq!(err.offset(), 2);
        assert!(!err.message().is_empty());
        assert!(err.to_string().starts_with("template error at offset 2: "));
    }
}
