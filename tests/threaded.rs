use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use regram::booking::{Clock, Command, GrammarConfig, Interpreter};
use regram::ParseOutcome;

#[test]
fn interpret_across_threads() {
    let interpreter = Arc::new(Interpreter::new(GrammarConfig::default()).unwrap());
    let clock = Clock::fixed(
        NaiveDate::from_ymd_opt(2016, 4, 27)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap(),
    );
    let at = |d: u32, h: u32, m: u32| {
        NaiveDate::from_ymd_opt(2016, 4, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    };

    let messages = [
        "预约明天下午三点到五点 B252",
        "取消明天下午三点",
        "查询我的预约",
        "我是张三",
        "预约五点到三点",
    ];

    let mut handles = vec![];
    for message in messages {
        let interpreter = Arc::clone(&interpreter);
        handles.push(thread::spawn(move || {
            interpreter.respond(message, &clock).unwrap()
        }));
    }

    let results: Vec<Option<ParseOutcome<Command>>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(
        results[0],
        Some(ParseOutcome::Matched(Command::Reserve {
            start: at(28, 15, 0),
            end: at(28, 17, 0),
            room: Some("B252".into()),
        }))
    );
    assert_eq!(
        results[1],
        Some(ParseOutcome::Matched(Command::Cancel {
            start: at(28, 15, 0),
            room: None,
        }))
    );
    assert_eq!(results[2], Some(ParseOutcome::Matched(Command::QueryMine)));
    assert_eq!(
        results[3],
        Some(ParseOutcome::Matched(Command::Register { name: "张三".into() }))
    );
    assert_eq!(
        results[4],
        Some(ParseOutcome::Failed("不能识别\"五点到三点\"".into()))
    );
}

#[test]
fn lazy_compilation_across_threads() {
    let grammar = Arc::new(
        regram::GrammarBuilder::<String>::new()
            .rule("pair", "#(word:a)-#(word:b)", |_, mut args, _| {
                Ok(format!(
                    "{}+{}",
                    args.take("a").unwrap_or_default(),
                    args.take("b").unwrap_or_default()
                ))
            })
            .rule("word", "[a-z]+", |t, _, _| Ok(t.to_owned()))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let grammar = Arc::clone(&grammar);
            thread::spawn(move || {
                let input = if i % 2 == 0 { "ab-cd" } else { "ab_cd" };
                grammar.try_parse("pair", input, &()).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(outcome, ParseOutcome::Matched("ab+cd".to_owned()));
        } else {
            assert!(outcome.is_no_match());
        }
    }
    assert_eq!(grammar.to_string(), "Grammar(2 rules, 1 compiled)");
}
