use regram::booking::{Clock, Interpreter};
use regram::ParseOutcome;
use tracing_subscriber::EnvFilter;

const MESSAGES: &[&str] = &[
    "我是张三",
    "预约明天下午三点到五点 B252",
    "预约后天的10:00-11:30",
    "取消预约下周一上午九点",
    "查询我的预约",
    "查询下周",
    "预约五点到三点",
    "今天天气不错！",
];

fn main() {
    // RUST_LOG=regram=debug shows each interpreted command.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let interpreter = Interpreter::from_file("demos/booking.yaml").expect("failed to load config");
    println!("{}", interpreter.grammar());

    let clock = Clock::system();
    for message in MESSAGES {
        match interpreter.respond(message, &clock) {
            Ok(Some(ParseOutcome::Matched(command))) => println!("{message} => {command}"),
            Ok(Some(ParseOutcome::Failed(reason))) => println!("{message} => {reason}"),
            Ok(Some(ParseOutcome::NoMatch)) => println!("{message} => (not a command)"),
            Ok(None) => {}
            Err(err) => eprintln!("{message} => grammar error: {err}"),
        }
    }
}
