use std::sync::Arc;
use tracing::{info, warn};
use tracing_flexible::handler::ConsoleHandler;
use tracing::Level;
use tracing_flexible::{Channel, Color, FlexibleFormatter, Handler, Logger, Record};
use tracing_subscriber::layer::SubscriberExt;

mod common;
use common::{channel, starts_with_default_date, Buffer};

fn with_channel<R>(channel: &Channel, f: impl FnOnce() -> R) -> R {
    let subscriber = tracing_subscriber::registry().with(channel.clone());
    tracing::subscriber::with_default(subscriber, f)
}

#[test]
fn test_attach_level() {
    let (logger, parent) = channel("test");
    let out = Buffer::new();

    let formatter = FlexibleFormatter::new();
    formatter.enable_level(true).attach_with_writer(&logger, out.clone());

    with_channel(&logger, || info!(target: "test", "test"));

    assert_eq!(out.take(), "[INFO] test\n");
    assert_eq!(parent.take(), "");
}

#[test]
fn test_attach_color() {
    let (logger, _parent) = channel("test");
    let out = Buffer::new();

    FlexibleFormatter::new()
        .set_color(Color::Red)
        .attach_with_writer(&logger, out.clone());

    with_channel(&logger, || info!(target: "test", "hello"));

    assert_eq!(out.take(), "\x1b[31mhello\x1b[0m\n");
}

#[test]
fn test_attach_defaults() {
    let (logger, _parent) = channel("test");
    let out = Buffer::new();

    FlexibleFormatter::new().attach_with_writer(&logger, out.clone());

    with_channel(&logger, || info!(target: "test", "test"));

    assert_eq!(out.take(), "test\n");
}

#[test]
fn test_attach_is_idempotent() {
    let (logger, _parent) = channel("test");
    let out = Buffer::new();
    let formatter = FlexibleFormatter::new();

    formatter.attach_with_writer(&logger, out.clone());
    formatter.attach_with_writer(&logger, out.clone());
    formatter.attach(&logger);

    assert_eq!(logger.handlers().len(), 1);
    assert!(formatter.is_attached(&logger));

    with_channel(&logger, || info!(target: "test", "once"));
    assert_eq!(out.take(), "once\n");
}

#[test]
fn test_attach_through_clone_is_same_logger() {
    let (logger, _parent) = channel("test");
    let formatter = FlexibleFormatter::new();

    formatter.attach_with_writer(&logger, Buffer::new());
    formatter.attach_with_writer(&logger.clone(), Buffer::new());

    assert_eq!(logger.handlers().len(), 1);
}

#[test]
fn test_same_name_loggers_are_distinct() {
    let (first, _) = channel("test");
    let (second, _) = channel("test");
    let formatter = FlexibleFormatter::new();

    assert_ne!(first.id(), second.id());
    assert!(first.id().into_u64() < second.id().into_u64());

    formatter.attach_with_writer(&first, Buffer::new());
    assert!(formatter.is_attached(&first));
    assert!(!formatter.is_attached(&second));

    formatter.attach_with_writer(&second, Buffer::new());
    assert_eq!(first.handlers().len(), 1);
    assert_eq!(second.handlers().len(), 1);
}

#[test]
fn test_detach_unattached_is_noop() {
    let (logger, parent) = channel("test");
    let formatter = FlexibleFormatter::new();
    formatter.enable_level(true);

    let before = formatter.config();
    formatter.detach(&logger).detach(&logger);

    assert_eq!(formatter.config(), before);
    assert!(logger.use_parent_handlers());
    assert!(logger.handlers().is_empty());

    with_channel(&logger, || info!(target: "test", "test"));
    assert_eq!(parent.take(), "INFO  test: test\n");
}

#[test]
fn test_detach_restores_parent_output() {
    let (logger, parent) = channel("test");
    let out = Buffer::new();
    let formatter = FlexibleFormatter::new();
    formatter.enable_name(true);

    formatter.attach_with_writer(&logger, out.clone());
    assert!(!logger.use_parent_handlers());

    with_channel(&logger, || {
        info!(target: "test", "formatted");
        formatter.detach(&logger);
        warn!(target: "test", "plain");
    });

    assert_eq!(out.take(), "[test] formatted\n");
    assert_eq!(parent.take(), "WARN  test: plain\n");
    assert!(logger.use_parent_handlers());
    assert!(logger.handlers().is_empty());
    assert!(!formatter.is_attached(&logger));
}

#[test]
fn test_detach_removes_every_handler_of_formatter() {
    let (logger, _parent) = channel("test");
    let out = Buffer::new();
    let formatter = FlexibleFormatter::new();
    let other = FlexibleFormatter::new();

    formatter.attach_with_writer(&logger, Buffer::new());
    // Installed behind the formatter's back, through a clone of it
    logger.add_handler(Arc::new(ConsoleHandler::with_writer(formatter.clone(), Buffer::new())));
    logger.add_handler(Arc::new(ConsoleHandler::with_writer(other.clone(), out.clone())));
    assert_eq!(logger.handlers().len(), 3);

    formatter.detach(&logger);

    let handlers = logger.handlers();
    assert_eq!(handlers.len(), 1);
    let remaining = handlers[0]
        .renderer()
        .and_then(|r| r.downcast_ref::<FlexibleFormatter>())
        .map(|f| f.ptr_eq(&other));
    assert_eq!(remaining, Some(true));

    with_channel(&logger, || info!(target: "test", "still here"));
    assert_eq!(out.take(), "still here\n");
}

#[test]
fn test_reattach_after_detach() {
    let (logger, parent) = channel("test");
    let out = Buffer::new();
    let formatter = FlexibleFormatter::new();
    formatter.enable_level(true);

    formatter
        .attach_with_writer(&logger, out.clone())
        .detach(&logger)
        .attach_with_writer(&logger, out.clone());

    assert_eq!(logger.handlers().len(), 1);

    with_channel(&logger, || info!(target: "test", "again"));
    assert_eq!(out.take(), "[INFO] again\n");
    assert_eq!(parent.take(), "");
}

#[test]
fn test_config_change_applies_to_attached_loggers() {
    let (first, _) = channel("first");
    let (second, _) = channel("second");
    let out = Buffer::new();
    let formatter = FlexibleFormatter::new();

    formatter
        .attach_with_writer(&first, out.clone())
        .attach_with_writer(&second, out.clone());

    let subscriber = tracing_subscriber::registry()
        .with(first.clone())
        .with(second.clone());
    tracing::subscriber::with_default(subscriber, || {
        info!(target: "first", "a");
        formatter.enable_name(true).enable_date(true);
        info!(target: "second", "b");
    });

    let output = out.take();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "a");
    assert!(starts_with_default_date(lines[1]), "{:?}", lines[1]);
    assert!(lines[1].ends_with("] [second] b"));
}

#[test]
fn test_channel_routes_by_target() {
    let (logger, parent) = channel("app");
    let out = Buffer::new();
    FlexibleFormatter::new()
        .enable_name(true)
        .attach_with_writer(&logger, out.clone());

    with_channel(&logger, || {
        info!(target: "app", "root");
        info!(target: "app::db", "child");
        info!(target: "application", "unrelated");
        info!(target: "other", "unrelated");
    });

    assert_eq!(out.take(), "[app] root\n[app::db] child\n");
    assert_eq!(parent.take(), "");
}

#[test]
fn test_render_failure_does_not_panic() {
    let (logger, _parent) = channel("test");
    let broken = Buffer::new();
    let healthy = Buffer::new();

    let formatter = FlexibleFormatter::new();
    formatter
        .enable_date(true)
        .set_date_pattern("not a pattern")
        .attach_with_writer(&logger, broken.clone());
    logger.add_handler(Arc::new(ConsoleHandler::with_writer(
        FlexibleFormatter::new(),
        healthy.clone(),
    )));

    with_channel(&logger, || info!(target: "test", "survives"));

    assert_eq!(broken.take(), "");
    assert_eq!(healthy.take(), "survives\n");
}

#[test]
fn test_attach_from_many_threads() {
    let (logger, _parent) = channel("test");
    let formatter = FlexibleFormatter::new();

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let logger = logger.clone();
            let formatter = formatter.clone();
            std::thread::spawn(move || {
                formatter.attach_with_writer(&logger, Buffer::new());
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(logger.handlers().len(), 1);
}

#[test]
fn test_console_handler_switches_writer() {
    let out = Buffer::new();
    let formatter = FlexibleFormatter::new();
    formatter.enable_level(true);

    let handler = ConsoleHandler::new(formatter).writer(out.clone());
    handler.publish(&Record::new(Level::WARN, "test", "moved")).unwrap();

    assert_eq!(out.take(), "[WARN] moved\n");
}

#[test]
fn test_nested_channels_publish_once() {
    let (app, parent) = channel("app");
    let db = app.child("db");
    let out = Buffer::new();

    FlexibleFormatter::new()
        .enable_name(true)
        .attach_with_writer(&app, out.clone());
    FlexibleFormatter::new()
        .enable_level(true)
        .attach_with_writer(&db, out.clone());

    // Layering the child as well must not publish twice
    let subscriber = tracing_subscriber::registry()
        .with(app.clone())
        .with(db.clone());
    tracing::subscriber::with_default(subscriber, || {
        info!(target: "app::db", "once");
        info!(target: "app", "root");
    });

    assert_eq!(out.take(), "[INFO] once\n[app] root\n");
    assert_eq!(parent.take(), "");
}

#[test]
fn test_unattached_child_forwards_to_parent() {
    let (app, parent) = channel("app");
    let db = app.child("db");
    let out = Buffer::new();

    assert_eq!(db.name(), "app::db");
    assert!(db.use_parent_handlers());

    FlexibleFormatter::new().attach_with_writer(&app, out.clone());

    with_channel(&app, || info!(target: "app::db::pool", "x"));

    assert_eq!(out.take(), "x\n");
    assert_eq!(parent.take(), "");
}

#[test]
fn test_child_with_parent_output_reaches_root_output() {
    let (app, parent) = channel("app");
    let db = app.child("db");
    let out = Buffer::new();

    let formatter = FlexibleFormatter::new();
    formatter.enable_level(true).attach_with_writer(&db, out.clone());
    db.set_use_parent_handlers(true);

    with_channel(&app, || info!(target: "app::db", "both"));
    assert_eq!(out.take(), "[INFO] both\n");
    assert_eq!(parent.take(), "INFO  app::db: both\n");

    formatter.detach(&db);
    with_channel(&app, || info!(target: "app::db", "plain"));
    assert_eq!(out.take(), "");
    assert_eq!(parent.take(), "INFO  app::db: plain\n");
}

#[test]
fn test_dropped_child_routes_to_parent() {
    let (app, parent) = channel("app");
    let db = app.child("db");
    assert_eq!(app.route("app::db").map(|c| c.id()), Some(db.id()));

    drop(db);
    assert_eq!(app.route("app::db").map(|c| c.id()), Some(app.id()));
    assert!(app.route("other").is_none());

    with_channel(&app, || info!(target: "app::db", "gone"));
    assert_eq!(parent.take(), "INFO  app::db: gone\n");
}
