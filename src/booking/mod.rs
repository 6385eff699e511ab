//! Booking commands written in everyday Chinese.
//!
//! Recognizes name registration (`我是张三`), reservations
//! (`预约明天下午三点到五点 B252`), cancellations, and queries by day or week.
//! [`Interpreter`] is the entry point; [`grammar()`] exposes the underlying
//! rule set for callers that want individual rules such as `date` or `time`.

mod calendar;
mod clock;
mod config;
mod interpreter;
mod normalize;
pub mod numeral;
mod rules;
mod value;

pub use calendar::{first_weekday_from, monday_of, next_monday, roll_forward};
pub use clock::Clock;
pub use config::GrammarConfig;
pub use interpreter::Interpreter;
pub use normalize::normalize;
pub use rules::{grammar, COMMANDS};
pub use value::{Command, Section, SectionKind, SectionRange, TimeOfDay, Value, WeekCount, WeekSpan};
