//! The log records that loggers hand to their handlers.
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level};

/// A single log record, as seen by a [`Handler`].
///
/// Records are built from [`tracing`] events by [`Channel`], but can also be
/// built by hand, which is mostly useful for testing renderers.
///
/// # Examples
///
/// ```
/// use tracing::Level;
/// use tracing_flexible::Record;
///
/// let record = Record::new(Level::INFO, "app::db", "connected");
///
/// assert_eq!(record.logger_name(), "app::db");
/// assert_eq!(record.message(), "connected");
/// ```
///
/// [`Handler`]: crate::handler::Handler
/// [`Channel`]: crate::logger::Channel
#[derive(Clone, Debug)]
pub struct Record<'a> {
    level: Level,
    logger_name: &'a str,
    message: Cow<'a, str>,
    timestamp: DateTime<Local>,
}

impl<'a> Record<'a> {
    /// Returns a new [`Record`] created now.
    pub fn new(level: Level, logger_name: &'a str, message: impl Into<Cow<'a, str>>) -> Self {
        Record {
            level,
            logger_name,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// Builds a [`Record`] from a [`tracing`] event.
    ///
    /// The logger name is the event's target. Fields other than `message` are
    /// not part of the record.
    pub fn from_event(event: &Event<'_>) -> Self {
        let mut visitor = MessageVisitor { message: None };
        event.record(&mut visitor);

        let metadata = event.metadata();

        Record::new(
            *metadata.level(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        )
    }

    /// Replaces the creation time of the record.
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns the severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the name of the logger the record was emitted through.
    pub fn logger_name(&self) -> &str {
        self.logger_name
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the time the record was created.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" && self.message.is_none() {
            self.message = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" && self.message.is_none() {
            self.message = Some(format!("{:?}", value));
        }
    }
}
