use std::path::Path;

use tracing::debug;

use super::clock::Clock;
use super::config::GrammarConfig;
use super::normalize::normalize;
use super::rules::{self, COMMANDS};
use super::value::{Command, Value};
use crate::{Grammar, GrammarError, ParseError, ParseOutcome, RegramError, SemanticError};

/// Turns chat messages into [`Command`]s.
///
/// Commands are tried in a fixed order. The first verb that matches a prefix
/// of the message decides the command; the rest of the message must then
/// parse as that command's body.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use regram::booking::{Clock, Command, GrammarConfig, Interpreter};
/// use regram::ParseOutcome;
///
/// let interpreter = Interpreter::new(GrammarConfig::default()).unwrap();
/// let clock = Clock::fixed(
///     NaiveDate::from_ymd_opt(2016, 4, 27).unwrap().and_hms_opt(8, 0, 0).unwrap(),
/// );
///
/// let outcome = interpreter.interpret("查询我的预约", &clock).unwrap();
/// assert_eq!(outcome, ParseOutcome::Matched(Command::QueryMine));
/// ```
#[derive(Debug)]
pub struct Interpreter {
    grammar: Grammar<Value, Clock>,
    config: GrammarConfig,
}

impl Interpreter {
    /// Build and fully compile the booking grammar.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] if a rule fails to resolve or compile.
    pub fn new(config: GrammarConfig) -> Result<Self, GrammarError> {
        let grammar = rules::grammar(&config)?;
        grammar.precompile()?;
        debug!(rules = grammar.len(), "booking grammar ready");
        Ok(Self { grammar, config })
    }

    /// Build from a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns [`RegramError`] if the file cannot be read or parsed, or the
    /// grammar fails to build.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegramError> {
        let config = GrammarConfig::from_file(path)?;
        Ok(Self::new(config)?)
    }

    #[must_use]
    pub fn grammar(&self) -> &Grammar<Value, Clock> {
        &self.grammar
    }

    #[must_use]
    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Interpret already normalized text.
    ///
    /// A matching verb followed by a body that does not parse yields
    /// `Failed("不能识别\"<body>\"")`; no matching verb yields `NoMatch`.
    ///
    /// # Errors
    ///
    /// Only configuration errors are returned as `Err`.
    pub fn interpret(&self, text: &str, clock: &Clock) -> Result<ParseOutcome<Command>, GrammarError> {
        for (verb, body) in COMMANDS {
            let prefix = match self.grammar.parse(verb, text, clock) {
                Ok(Some(prefix)) => prefix,
                Ok(None) => continue,
                Err(ParseError::Semantic(err)) => return Ok(ParseOutcome::Failed(err.into_reason())),
                Err(ParseError::Grammar(err)) => return Err(err),
            };

            let rest = prefix.rest.trim();
            let outcome = match self.grammar.try_parse(body, rest, clock)? {
                ParseOutcome::Matched(value) => match Command::try_from(value) {
                    Ok(command) => ParseOutcome::Matched(command),
                    Err(err) => ParseOutcome::Failed(err.into_reason()),
                },
                ParseOutcome::NoMatch => {
                    ParseOutcome::Failed(SemanticError::unrecognized(rest).into_reason())
                }
                ParseOutcome::Failed(reason) => ParseOutcome::Failed(reason),
            };
            debug!(verb = prefix.matched, body, %outcome, "command interpreted");
            return Ok(outcome);
        }
        Ok(ParseOutcome::NoMatch)
    }

    /// Normalize a raw message and interpret it.
    ///
    /// Returns `None` when nothing is left after normalization.
    ///
    /// # Errors
    ///
    /// Only configuration errors are returned as `Err`.
    pub fn respond(&self, raw: &str, clock: &Clock) -> Result<Option<ParseOutcome<Command>>, GrammarError> {
        let text = normalize(raw, &self.config.punctuation);
        if text.is_empty() {
            return Ok(None);
        }
        self.interpret(&text, clock).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::new(GrammarConfig::default()).unwrap()
    }

    fn wednesday_morning() -> Clock {
        Clock::fixed(
            NaiveDate::from_ymd_opt(2016, 4, 27)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn register() {
        let outcome = interpreter().interpret("我是 张三", &wednesday_morning()).unwrap();
        assert_eq!(outcome, ParseOutcome::Matched(Command::Register { name: "张三".into() }));
    }

    #[test]
    fn verb_commits_to_command() {
        let outcome = interpreter().interpret("预约随便什么", &wednesday_morning()).unwrap();
        assert_eq!(outcome, ParseOutcome::Failed("不能识别\"随便什么\"".into()));
    }

    #[test]
    fn longer_verb_wins() {
        let i = interpreter();
        let clock = wednesday_morning();
        assert_eq!(
            i.interpret("查询我的预约", &clock).unwrap(),
            ParseOutcome::Matched(Command::QueryMine)
        );
        assert!(i.interpret("取消预约明天三点", &clock).unwrap().is_matched());
        assert!(i.interpret("查询预约明天", &clock).unwrap().is_matched());
    }

    #[test]
    fn unrelated_text_is_no_match() {
        let outcome = interpreter().interpret("你好", &wednesday_morning()).unwrap();
        assert!(outcome.is_no_match());
    }

    #[test]
    fn respond_normalizes_and_skips_empty() {
        let i = interpreter();
        let clock = wednesday_morning();
        assert_eq!(i.respond("  ！？ ", &clock).unwrap(), None);
        assert_eq!(
            i.respond(" 查询我的预约！", &clock).unwrap(),
            Some(ParseOutcome::Matched(Command::QueryMine))
        );
    }
}
