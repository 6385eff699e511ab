use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regram::booking::{Clock, Command, GrammarConfig, Interpreter, SectionRange};
use regram::{ParseOutcome, RegramError};

fn interpreter() -> Interpreter {
    Interpreter::new(GrammarConfig::default()).unwrap()
}

/// Wednesday 2016-04-27 at the given hour.
fn wednesday(hour: u32) -> Clock {
    Clock::fixed(at(4, 27, hour, 0))
}

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn respond(message: &str, clock: &Clock) -> ParseOutcome<Command> {
    interpreter().respond(message, clock).unwrap().unwrap()
}

fn reserve(start: NaiveDateTime, end: NaiveDateTime, room: Option<&str>) -> ParseOutcome<Command> {
    ParseOutcome::Matched(Command::Reserve {
        start,
        end,
        room: room.map(str::to_owned),
    })
}

#[test]
fn reservations() {
    let clock = wednesday(8);
    assert_eq!(
        respond("预约明天下午三点到五点", &clock),
        reserve(at(4, 28, 15, 0), at(4, 28, 17, 0), None)
    );
    assert_eq!(
        respond("预约后天的10:00-11:30 B252！", &clock),
        reserve(at(4, 29, 10, 0), at(4, 29, 11, 30), Some("B252"))
    );
    assert_eq!(
        respond("预约5月3号晚上七点到九点半的报告厅", &clock),
        reserve(at(5, 3, 19, 0), at(5, 3, 21, 30), Some("报告厅"))
    );
    assert_eq!(
        respond("预约下周一上午九点至十一点", &clock),
        reserve(at(5, 2, 9, 0), at(5, 2, 11, 0), None)
    );
    assert_eq!(
        respond("预约今天十点到十二点", &clock),
        reserve(at(4, 27, 10, 0), at(4, 27, 12, 0), None)
    );
}

#[test]
fn reservation_rejections() {
    let clock = wednesday(8);
    assert_eq!(
        respond("预约五点到三点", &clock),
        ParseOutcome::Failed("不能识别\"五点到三点\"".into())
    );
    assert_eq!(
        respond("预约今天早上七点到八点", &clock),
        ParseOutcome::Failed("不能预约过去的时间".into())
    );
    assert_eq!(
        respond("预约明天25点到26点", &clock),
        ParseOutcome::Failed("不能识别\"25点\"".into())
    );
    // 上午十一点到一点: the repaired end (13:00) leaves the morning.
    assert_eq!(
        respond("预约明天上午十一点到一点", &clock),
        ParseOutcome::Failed("不能识别\"明天上午十一点到一点\"".into())
    );
}

#[test]
fn cancellations() {
    let clock = wednesday(8);
    assert_eq!(
        respond("取消明天下午三点", &clock),
        ParseOutcome::Matched(Command::Cancel {
            start: at(4, 28, 15, 0),
            room: None,
        })
    );
    assert_eq!(
        respond("取消预约周五的上午9点到10点 B252", &clock),
        ParseOutcome::Matched(Command::Cancel {
            start: at(4, 29, 9, 0),
            room: Some("B252".into()),
        })
    );
    assert_eq!(
        respond("取消下午两点半", &clock),
        ParseOutcome::Matched(Command::Cancel {
            start: at(4, 27, 14, 30),
            room: None,
        })
    );
}

#[test]
fn cancellation_end_time_is_still_validated() {
    let clock = wednesday(8);
    assert_eq!(
        respond("取消明天三点到25点", &clock),
        ParseOutcome::Failed("不能识别\"25点\"".into())
    );
    assert_eq!(
        respond("取消明天三点到上午十四点", &clock),
        ParseOutcome::Failed("不能识别\"上午十四点\"".into())
    );
}

#[test]
fn queries() {
    let clock = wednesday(8);
    assert_eq!(respond("查询我的预约", &clock), ParseOutcome::Matched(Command::QueryMine));
    assert_eq!(
        respond("查询大后天", &clock),
        ParseOutcome::Matched(Command::Query {
            start: at(4, 30, 0, 0),
            end: at(5, 1, 0, 0),
        })
    );
    assert_eq!(
        respond("查询预约下周", &clock),
        ParseOutcome::Matched(Command::Query {
            start: at(5, 2, 0, 0),
            end: at(5, 9, 0, 0),
        })
    );
    // Trailing words after the date are allowed.
    assert_eq!(
        respond("查询本周的预约情况", &clock),
        ParseOutcome::Matched(Command::Query {
            start: at(4, 27, 0, 0),
            end: at(5, 2, 0, 0),
        })
    );
    assert_eq!(
        respond("查询什么", &clock),
        ParseOutcome::Failed("不能识别\"什么\"".into())
    );
}

#[test]
fn registration() {
    let clock = wednesday(8);
    assert_eq!(
        respond("我是 李四", &clock),
        ParseOutcome::Matched(Command::Register { name: "李四".into() })
    );
    assert_eq!(
        respond("我是张 三", &clock),
        ParseOutcome::Failed("不能识别\"张 三\"".into())
    );
}

#[test]
fn unrelated_messages() {
    let clock = wednesday(8);
    assert!(respond("😀", &clock).is_no_match());
    assert!(respond("明天下午三点", &clock).is_no_match());
    assert_eq!(interpreter().respond("  。。 ", &clock).unwrap(), None);
}

#[test]
fn year_horizon_comes_from_config() {
    let clock = wednesday(8);
    let narrow = Interpreter::new(GrammarConfig {
        year_horizon: 1,
        ..GrammarConfig::default()
    })
    .unwrap();

    assert!(narrow.respond("查询2016年5月1号", &clock).unwrap().unwrap().is_matched());
    assert_eq!(
        narrow.respond("查询2017年5月1号", &clock).unwrap().unwrap(),
        ParseOutcome::Failed("不能识别\"2017年\"".into())
    );
    assert!(respond("查询2017年5月1号", &clock).is_matched());
}

#[test]
fn sections_come_from_config() {
    let clock = wednesday(8);
    let yaml = "evening:\n  start: \"18:00:00\"\n  end: \"23:59:59\"\n";
    let config = GrammarConfig::from_yaml(yaml).unwrap();
    assert_eq!(
        config.evening,
        SectionRange::new(
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        )
    );

    let interpreter = Interpreter::new(config).unwrap();
    // 15:00 is no longer an evening hour.
    assert_eq!(
        interpreter.respond("取消晚上三点", &clock).unwrap().unwrap(),
        ParseOutcome::Failed("不能识别\"晚上三点\"".into())
    );
    assert!(interpreter.respond("取消晚上七点", &clock).unwrap().unwrap().is_matched());
}

#[test]
fn interpreter_from_missing_file() {
    let err = Interpreter::from_file("/nonexistent/regram.yaml").unwrap_err();
    assert!(matches!(err, RegramError::Io(_)));
}
