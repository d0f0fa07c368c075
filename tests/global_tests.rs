//! Tests for the process-wide logger
//!
//! Kept in their own binary: the default logger can be installed only once
//! per process.

use rust_kvlog::{global, LogArg, LogFlags, LogMap, Logger, LoggerError, MemorySink};

#[test]
fn test_default_logger_lifecycle() {
    let sink = MemorySink::new();
    global::init(Logger::new(sink.clone(), LogFlags::NONE)).expect("first init succeeds");

    let second = global::init(Logger::default());
    assert!(matches!(second, Err(LoggerError::AlreadyInitialized)));

    global::info("hello %s", &[LogArg::from("world")]);
    global::debug("hidden", &[]);
    assert!(!global::has_debug());
    assert!(!global::has_timestamp());

    global::set_flags(LogFlags::DEBUG | LogFlags::SORT);
    assert_eq!(global::flags(), LogFlags::DEBUG | LogFlags::SORT);

    let attrs = LogMap::new().with("b", 2).with("a", 1);
    let line = line!() + 1;
    global::debug("visible", &[LogArg::from(&attrs)]);

    global::set_debug(false);
    global::warning("careful", &[]);
    assert!(global::toggle_debug());
    global::set_debug(false);

    assert_eq!(
        sink.lines(),
        vec![
            r#"level="info" msg="hello world""#.to_string(),
            format!(
                r#"level="debug" caller="{}:{}" msg="visible" a="1" b="2""#,
                file!(),
                line
            ),
            r#"level="warning" msg="careful""#.to_string(),
        ]
    );

    let redirected = MemorySink::new();
    global::set_output(redirected.clone());
    global::error("moved", &[]);
    global::flush().expect("flush succeeds");
    assert_eq!(redirected.lines(), vec![r#"level="error" msg="moved""#]);
    assert_eq!(global::logger().metrics().lines_written(), 4);
}
