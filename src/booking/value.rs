use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Inclusive time-of-day range of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SectionRange {
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Morning,
    Evening,
}

/// A named part of the day used to disambiguate 12-hour readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub range: SectionRange,
}

impl Section {
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.range.contains(time)
    }
}

/// A time of day together with the section it was stated in, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub time: NaiveTime,
    pub section: Option<Section>,
}

/// Half-open `[start, end)` range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// How many weeks ahead a week expression points; `None` when no
/// qualifier was given at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCount(pub Option<u32>);

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `我是…`: associate the sender with a name.
    Register { name: String },
    Reserve {
        start: NaiveDateTime,
        end: NaiveDateTime,
        room: Option<String>,
    },
    /// The end time of a cancellation is accepted but not used.
    Cancel {
        start: NaiveDateTime,
        room: Option<String>,
    },
    QueryMine,
    Query {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Register { name } => write!(f, "register {name}"),
            Command::Reserve { start, end, room } => {
                write!(f, "reserve {start}..{end}")?;
                if let Some(room) = room {
                    write!(f, " in {room}")?;
                }
                Ok(())
            }
            Command::Cancel { start, room } => {
                write!(f, "cancel {start}")?;
                if let Some(room) = room {
                    write!(f, " in {room}")?;
                }
                Ok(())
            }
            Command::QueryMine => write!(f, "query mine"),
            Command::Query { start, end } => write!(f, "query {start}..{end}"),
        }
    }
}

/// Values produced by the booking grammar's semantic actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    /// A day offset relative to today.
    Offset(TimeDelta),
    Date(NaiveDate),
    Section(Section),
    Time(TimeOfDay),
    Week(WeekSpan),
    WeekCount(WeekCount),
    Text(String),
    Command(Command),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Offset(_) => "offset",
            Value::Date(_) => "date",
            Value::Section(_) => "section",
            Value::Time(_) => "time",
            Value::Week(_) => "week",
            Value::WeekCount(_) => "week count",
            Value::Text(_) => "text",
            Value::Command(_) => "command",
        }
    }

    fn mismatch(self, expected: &str) -> SemanticError {
        SemanticError::new(format!("expected {expected}, found {}", self.kind()))
    }
}

macro_rules! value_conversions {
    ($($variant:ident => $ty:ty, $expected:literal;)*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = SemanticError;

                fn try_from(value: Value) -> Result<Self, SemanticError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other.mismatch($expected)),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    Int => i64, "int";
    Offset => TimeDelta, "offset";
    Date => NaiveDate, "date";
    Section => Section, "section";
    Time => TimeOfDay, "time";
    Week => WeekSpan, "week";
    WeekCount => WeekCount, "week count";
    Text => String, "text";
    Command => Command, "command";
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Offset(v) => write!(f, "+{}d", v.num_days()),
            Value::Date(v) => write!(f, "{v}"),
            Value::Section(v) => write!(f, "{:?} {}-{}", v.kind, v.range.start, v.range.end),
            Value::Time(v) => write!(f, "{}", v.time),
            Value::Week(v) => write!(f, "{}..{}", v.start, v.end),
            Value::WeekCount(WeekCount(Some(n))) => write!(f, "{n} weeks ahead"),
            Value::WeekCount(WeekCount(None)) => write!(f, "rolling week"),
            Value::Text(v) => write!(f, "\"{v}\""),
            Value::Command(v) => write!(f, "{v}"),
        }
    }
}
