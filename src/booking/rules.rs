//! The booking grammar: command verbs and bodies down to single numerals.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike};

use super::calendar::{first_weekday_from, monday_of, next_monday, roll_forward};
use super::clock::Clock;
use super::config::GrammarConfig;
use super::numeral;
use super::value::{Command, Section, SectionKind, SectionRange, TimeOfDay, Value, WeekCount, WeekSpan};
use crate::{Args, Grammar, GrammarBuilder, GrammarError, SemanticError};

type Outcome = Result<Value, SemanticError>;

/// Verb prefix rule and body rule of each command, in the order they are tried.
pub const COMMANDS: [(&str, &str); 5] = [
    ("register_verb", "registration"),
    ("reserve_verb", "reservation"),
    ("cancel_verb", "cancellation"),
    ("query_mine_verb", "query_mine"),
    ("query_verb", "query"),
];

/// Build the booking grammar.
///
/// # Errors
///
/// Only fails if the rule set itself is inconsistent.
pub fn grammar(config: &GrammarConfig) -> Result<Grammar<Value, Clock>, GrammarError> {
    let horizon = config.year_horizon;
    let morning = config.morning;
    let evening = config.evening;

    GrammarBuilder::<Value, Clock>::new()
        // Commands
        .prefix_rule("register_verb", "我是", matched_text)
        .prefix_rule("reserve_verb", "预约", matched_text)
        .prefix_rule("cancel_verb", "取消预约|取消", matched_text)
        .prefix_rule("query_mine_verb", "查询我的预约", matched_text)
        .prefix_rule("query_verb", "查询预约|查询", matched_text)
        .rule(
            "reservation",
            r"(?:#(date:date)的?)?\s*#(time:start)\s*#(to)\s*#(time:end)\s*(?:[的\s]#(room_name:room))?",
            reservation,
        )
        .rule(
            "cancellation",
            r"#(date:date)?的?\s*#(time:time)\s*(?:#(to)\s*#(time)\s*)?(?:[的\s]#(room_name:room))?",
            cancellation,
        )
        .prefix_rule("query", "#(date:date)|#(week:week)", query)
        .rule("query_mine", "", |_, _, _| Ok(Value::Command(Command::QueryMine)))
        .rule("registration", r"\s*\S+", |text, _, _| {
            Ok(Value::Command(Command::Register { name: text.trim().to_owned() }))
        })
        .rule("room_name", r"\w+", matched_text)
        // Dates
        .rule(
            "date",
            "#(rel_date:rel)|#(abs_date:abs)|#(week_date:week_date)",
            date,
        )
        .rule(
            "rel_date",
            "#(today:today)|#(tomorrow:tomorrow)|#(after_tomorrow:after)",
            |text, mut args, _| first_of(text, &mut args, &["today", "tomorrow", "after"]),
        )
        .rule("abs_date", "(?:#(year:year)?#(month:month))?#(day:day)", abs_date)
        .rule("week", "#(week_count:count)(?:星期|礼拜|周)", week)
        .rule("week_date", "#(week:week)#(weekday:weekday)", week_date)
        .rule("week_count", "这|本|下*", week_count)
        .rule("weekday", "#(number:number)|[日天]", weekday)
        .rule("year", "#(number:number)年", move |text, mut args, clock: &Clock| {
            let year: i64 = required(text, args.take_as("number")?)?;
            let offset = year - i64::from(clock.today().year());
            if (0..i64::from(horizon)).contains(&offset) {
                Ok(Value::Int(year))
            } else {
                Err(SemanticError::unrecognized(text))
            }
        })
        .rule("month", "#(number:number)月", |text, mut args, _| {
            number_in(text, &mut args, 1..=12).map(Value::Int)
        })
        .rule("day", "#(number:number)(?:日|号)", |text, mut args, _| {
            number_in(text, &mut args, 1..=31).map(Value::Int)
        })
        .rule("today", "今天?", |_, _, _| Ok(Value::Offset(TimeDelta::zero())))
        .rule("tomorrow", "明天?", |_, _, _| Ok(Value::Offset(TimeDelta::days(1))))
        .rule("after_tomorrow", "大*后天?", |text, _, _| {
            let days = i64::try_from(text.chars().count()).map_err(|_| SemanticError::unrecognized(text))?;
            TimeDelta::try_days(days)
                .map(Value::Offset)
                .ok_or_else(|| SemanticError::unrecognized(text))
        })
        // Times
        .rule("time", "#(section:section)?#(hour:hour)#(minute:minute)?", time)
        .rule(
            "section",
            "#(morning:morning)|#(evening:evening)",
            |text, mut args, _| first_of(text, &mut args, &["morning", "evening"]),
        )
        .rule("morning", "早上?|上午", move |_, _, _| {
            Ok(section(SectionKind::Morning, morning))
        })
        .rule("evening", "晚上?|下午|傍晚", move |_, _, _| {
            Ok(section(SectionKind::Evening, evening))
        })
        .rule("hour", "#(number:number)[点时:：]", |text, mut args, _| {
            number_in(text, &mut args, 0..=23).map(Value::Int)
        })
        .rule("minute", "#(number:number)分?|#(big_minute:big)", |text, mut args, _| {
            match args.take("big") {
                Some(big) => Ok(big),
                None => number_in(text, &mut args, 0..=59).map(Value::Int),
            }
        })
        .rule(
            "big_minute",
            "#(half_hour:half)|#(quarters:quarters)",
            |text, mut args, _| first_of(text, &mut args, &["half", "quarters"]),
        )
        .rule("half_hour", "半", |_, _, _| Ok(Value::Int(30)))
        .rule("quarters", "#(number:number)刻", |text, mut args, _| {
            number_in(text, &mut args, 1..=3).map(|n| Value::Int(n * 15))
        })
        .rule("to", "[-~～－—–−到至]", matched_text)
        // Numbers
        .rule(
            "number",
            "#(arabic_number:arabic)|#(chinese_number:chinese)",
            |text, mut args, _| first_of(text, &mut args, &["arabic", "chinese"]),
        )
        .rule("arabic_number", "[0-9]+", |text, _, _| {
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| SemanticError::unrecognized(text))
        })
        .rule("chinese_number", "[零一二两三四五六七八九十廿]+", |text, _, _| {
            numeral::decode(text)
                .map(|n| Value::Int(i64::from(n)))
                .ok_or_else(|| SemanticError::unrecognized(text))
        })
        .build()
}

// -- Helpers ----------------------------------------------------------------

fn matched_text(text: &str, _: Args<Value>, _: &Clock) -> Outcome {
    Ok(Value::Text(text.to_owned()))
}

fn section(kind: SectionKind, range: SectionRange) -> Value {
    Value::Section(Section { kind, range })
}

/// The value of the first alternative that took part in the match.
fn first_of(text: &str, args: &mut Args<Value>, names: &[&str]) -> Outcome {
    names
        .iter()
        .find_map(|name| args.take(name))
        .ok_or_else(|| SemanticError::unrecognized(text))
}

fn required<T>(text: &str, value: Option<T>) -> Result<T, SemanticError> {
    value.ok_or_else(|| SemanticError::unrecognized(text))
}

/// The `number` argument, which must lie in `range`.
fn number_in(text: &str, args: &mut Args<Value>, range: RangeInclusive<i64>) -> Result<i64, SemanticError> {
    let n: i64 = required(text, args.take_as("number")?)?;
    if range.contains(&n) {
        Ok(n)
    } else {
        Err(SemanticError::unrecognized(text))
    }
}

fn clock_time(hour: i64, minute: i64) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(u32::try_from(hour).ok()?, u32::try_from(minute).ok()?, 0)
}

fn at_midnight(date: NaiveDate) -> chrono::NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

// -- Dates ------------------------------------------------------------------

fn date(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    if let Some(offset) = args.take_as::<TimeDelta>("rel")? {
        return clock
            .today()
            .checked_add_signed(offset)
            .map(Value::Date)
            .ok_or_else(|| SemanticError::unrecognized(text));
    }
    first_of(text, &mut args, &["abs", "week_date"])
}

fn abs_date(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    let year = args.take_as::<i64>("year")?.map(i32::try_from).transpose();
    let month = args.take_as::<i64>("month")?.map(u32::try_from).transpose();
    let day = u32::try_from(required(text, args.take_as::<i64>("day")?)?);
    let (Ok(year), Ok(month), Ok(day)) = (year, month, day) else {
        return Err(SemanticError::unrecognized(text));
    };
    roll_forward(clock.today(), year, month, day)
        .map(Value::Date)
        .ok_or_else(|| SemanticError::unrecognized(text))
}

fn week_count(text: &str, _: Args<Value>, _: &Clock) -> Outcome {
    if text.is_empty() {
        return Ok(Value::WeekCount(WeekCount(None)));
    }
    let ahead = text.chars().filter(|&c| c == '下').count();
    let ahead = u32::try_from(ahead).map_err(|_| SemanticError::unrecognized(text))?;
    Ok(Value::WeekCount(WeekCount(Some(ahead))))
}

/// `[start, end)` of the week expression: the rest of the current week when
/// unqualified, otherwise the whole week `count` weeks from this one.
fn week(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    let WeekCount(count) = required(text, args.take_as("count")?)?;
    let today = clock.today();
    let start = match count {
        None => today,
        Some(ahead) => monday_of(today)
            .checked_add_signed(TimeDelta::weeks(i64::from(ahead)))
            .ok_or_else(|| SemanticError::unrecognized(text))?,
    };
    Ok(Value::Week(WeekSpan {
        start,
        end: next_monday(start),
    }))
}

/// Weekday index, Monday = 0.
fn weekday(text: &str, mut args: Args<Value>, _: &Clock) -> Outcome {
    match args.take_as::<i64>("number")? {
        None => Ok(Value::Int(6)),
        Some(n) if (1..=7).contains(&n) => Ok(Value::Int(n - 1)),
        Some(_) => Err(SemanticError::unrecognized(text)),
    }
}

fn week_date(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    let week: WeekSpan = required(text, args.take_as("week")?)?;
    let weekday: i64 = required(text, args.take_as("weekday")?)?;
    let weekday = u32::try_from(weekday).map_err(|_| SemanticError::unrecognized(text))?;
    let date = first_weekday_from(week.start, weekday);
    if date < clock.today() {
        return Err(SemanticError::unrecognized(text));
    }
    Ok(Value::Date(date))
}

// -- Times ------------------------------------------------------------------

/// A section moves an hour before noon into the afternoon when that is the
/// only way to land inside it.
fn time(text: &str, mut args: Args<Value>, _: &Clock) -> Outcome {
    let section: Option<Section> = args.take_as("section")?;
    let hour: i64 = required(text, args.take_as("hour")?)?;
    let minute: i64 = args.take_as("minute")?.unwrap_or(0);
    let mut time = required(text, clock_time(hour, minute))?;

    if let Some(section) = section {
        if !section.contains(time) && hour < 12 {
            time = required(text, clock_time(hour + 12, minute))?;
        }
        if !section.contains(time) {
            return Err(SemanticError::unrecognized(text));
        }
    }
    Ok(Value::Time(TimeOfDay { time, section }))
}

// -- Command bodies ---------------------------------------------------------

fn reservation(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    let date = args.take_as::<NaiveDate>("date")?.unwrap_or_else(|| clock.today());
    let start: TimeOfDay = required(text, args.take_as("start")?)?;
    let mut end: TimeOfDay = required(text, args.take_as("end")?)?;
    let room: Option<String> = args.take_as("room")?;

    if start.time >= end.time {
        // "下午三点到五点": the end inherits the start's section.
        let Some(section) = start.section else {
            return Err(SemanticError::unrecognized(text));
        };
        if end.time.hour() < 12 {
            end.time = required(text, end.time.with_hour(end.time.hour() + 12))?;
        }
        if !(start.time < end.time && section.contains(end.time)) {
            return Err(SemanticError::unrecognized(text));
        }
    }

    let start = date.and_time(start.time);
    let end = date.and_time(end.time);
    if start < clock.now() {
        return Err(SemanticError::new("不能预约过去的时间"));
    }
    Ok(Value::Command(Command::Reserve { start, end, room }))
}

fn cancellation(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    let date = args.take_as::<NaiveDate>("date")?.unwrap_or_else(|| clock.today());
    let time: TimeOfDay = required(text, args.take_as("time")?)?;
    let room: Option<String> = args.take_as("room")?;
    Ok(Value::Command(Command::Cancel {
        start: date.and_time(time.time),
        room,
    }))
}

fn query(text: &str, mut args: Args<Value>, clock: &Clock) -> Outcome {
    if let Some(date) = args.take_as::<NaiveDate>("date")? {
        let next = required(text, date.succ_opt())?;
        return Ok(Value::Command(Command::Query {
            start: at_midnight(date),
            end: at_midnight(next),
        }));
    }
    let week: WeekSpan = required(text, args.take_as("week")?)?;
    Ok(Value::Command(Command::Query {
        start: at_midnight(week.start.max(clock.today())),
        end: at_midnight(week.end),
    }))
}
