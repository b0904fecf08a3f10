//! Configurable line formatting for [`tracing`] events.
//!
//! # Overview
//!
//! [`tracing`] is a framework for instrumenting programs to collect structured
//! and async-aware diagnostics via the [`Subscriber`] trait. This crate
//! provides [`FlexibleFormatter`], which controls how each log line looks:
//! an optional timestamp, the logger name, the severity level, an ANSI color,
//! and the message.
//! ```log
//! [10/17/2026 09:05:03] [app::db] [INFO] connected
//! ```
//!
//! Formatters are attached to named loggers. [`Channel`] is a logger that is
//! also a [`Layer`], so it slots into any [`tracing-subscriber`] stack and
//! receives the events whose target is its name. Channels nest with
//! [`Channel::child`], and a record is published once, by the most specific
//! channel for its target.
//!
//! [`tracing-subscriber`]: tracing_subscriber
//! [`Layer`]: tracing_subscriber::layer::Layer
//! [`Subscriber`]: tracing::subscriber::Subscriber
//!
//! # Getting started
//!
//! The easiest way to get started is the [`builder`], which creates a
//! channel, attaches a formatter to it, and builds a subscriber around it:
//! ```
//! use tracing_flexible::Color;
//!
//! tracing_flexible::builder("app")
//!     .enable_level(true)
//!     .color(Color::Red)
//!     .build()
//!     .on_closure(|| {
//!         tracing::info!(target: "app", "hello");
//!     })
//! ```
//! ```log
//! [INFO] hello
//! ```
//! For more configuration options, see the
//! [`builder` module documentation][mod@crate::builder].
//!
//! # Attaching and detaching
//!
//! A formatter can be attached to any number of loggers, and is configured
//! through `&self`, so changes apply to every attached logger right away.
//! Attaching switches the logger's default output off, so lines aren't written
//! twice, and detaching switches it back on.
//! ```
//! use tracing_flexible::{Channel, FlexibleFormatter, Logger};
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let channel = Channel::new("app");
//! let formatter = FlexibleFormatter::new();
//!
//! formatter.enable_name(true).attach(&channel);
//! // Attaching again changes nothing
//! formatter.attach(&channel);
//! assert_eq!(channel.handlers().len(), 1);
//!
//! let subscriber = tracing_subscriber::registry().with(channel.clone());
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(target: "app", "formatted");
//!     formatter.detach(&channel);
//!     tracing::info!(target: "app", "back to the default output");
//! });
//! ```
//! ```log
//! [app] formatted
//! INFO  app: back to the default output
//! ```
//!
//! # Date patterns
//!
//! Dates are written with [`DatePattern`]s, which use the letters of
//! `SimpleDateFormat`. The default is `MM/dd/yyyy HH:mm:ss`.
//!
//! By default, the date shows when the line was rendered rather than when the
//! event was recorded. Set [`TimestampSource::Record`] to show the latter.
//!
//! # Feature flags
//!
//! * `full`: Enables all features listed below.
//! * `serde`: Enables (de)serializing [`FormatterConfig`] and [`Color`].
//! * `smallvec`: Keeps compiled date patterns on the stack.
//! * `env-filter`: Enables [`SubscriberBuilder::with_env_filter`].
//!
//! [`SubscriberBuilder::with_env_filter`]: crate::builder::SubscriberBuilder
pub mod builder;
pub mod color;
pub mod config;
pub mod formatter;
pub mod handler;
pub mod logger;
pub mod pattern;
pub mod record;
#[doc(hidden)]
#[macro_use]
mod cfg;
mod fail;

pub use crate::builder::builder;
pub use crate::color::Color;
pub use crate::config::{FormatterConfig, TimestampSource};
pub use crate::formatter::{FlexibleFormatter, Plain, Render, RenderError};
pub use crate::handler::{ConsoleHandler, Handler};
pub use crate::logger::{Channel, Logger, LoggerId};
pub use crate::pattern::{DatePattern, PatternError};
pub use crate::record::Record;
