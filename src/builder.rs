//! Build a [`Subscriber`] around a formatted [`Channel`].
//!
//! To start, call [`builder`] with the name of the channel to create a
//! [`LoggerBuilder`], which configures the [`FlexibleFormatter`] by chaining
//! methods.
//!
//! After the formatter is configured, call [`build`] on the [`LoggerBuilder`]
//! to get a [`SubscriberBuilder`]. At this point, other [`Layer`]s can be
//! composed onto it by chaining calls to the [`with`] method.
//!
//! Finally, code can be run in the context of the [`Subscriber`] by calling
//! [`on_closure`], or the subscriber can be installed for the whole program
//! with [`init`].
//!
//! # Examples
//!
//! Writing colored lines with levels to stderr, filtering out some logs.
//! ```
//! use tracing_flexible::Color;
//! use tracing_subscriber::filter::LevelFilter;
//!
//! tracing_flexible::builder("app")
//!     .enable_level(true)
//!     .color(Color::Yellow)
//!     .build()
//!     .with(LevelFilter::INFO)
//!     .on_closure(|| {
//!         tracing::debug!(target: "app", "filtered out");
//!         tracing::info!(target: "app", "ready");
//!     })
//! ```
//! ```log
//! [INFO] ready
//! ```
//!
//! [`build`]: LoggerBuilder::build
//! [`with`]: SubscriberBuilder::with
//! [`on_closure`]: SubscriberBuilder::on_closure
//! [`init`]: SubscriberBuilder::init
use crate::cfg_env_filter;
use crate::color::Color;
use crate::config::FormatterConfig;
use crate::formatter::FlexibleFormatter;
use crate::handler::MakeStderr;
use crate::logger::Channel;
use tracing::subscriber::{DefaultGuard, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_subscriber::fmt::{MakeWriter, TestWriter};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{Layer, Registry};

cfg_env_filter! {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::registry::LookupSpan;
}

/// Creates a new [`LoggerBuilder`] for a [`Channel`] named `name`.
///
/// See the [module level documentation] for details on using [`builder`].
///
/// [module level documentation]: self
pub fn builder(name: impl Into<String>) -> LoggerBuilder<MakeStderr> {
    LoggerBuilder {
        name: name.into(),
        formatter: FlexibleFormatter::new(),
        make_writer: MakeStderr,
    }
}

/// A type for configuring the formatter of a [`Channel`].
///
/// See the [module level documentation] for details on using [`LoggerBuilder`].
///
/// [module level documentation]: self
#[derive(Debug)]
pub struct LoggerBuilder<W> {
    name: String,
    formatter: FlexibleFormatter,
    make_writer: W,
}

impl<W> LoggerBuilder<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    /// Sets the color lines are wrapped in.
    pub fn color(self, color: Color) -> Self {
        self.formatter.set_color(color);
        self
    }

    /// Enables or disables the `[date]` fragment.
    pub fn enable_date(self, enable: bool) -> Self {
        self.formatter.enable_date(enable);
        self
    }

    /// Enables or disables the `[LEVEL]` fragment.
    pub fn enable_level(self, enable: bool) -> Self {
        self.formatter.enable_level(enable);
        self
    }

    /// Enables or disables the `[logger name]` fragment.
    pub fn enable_name(self, enable: bool) -> Self {
        self.formatter.enable_name(enable);
        self
    }

    /// Sets the pattern of the date fragment.
    ///
    /// See [`FlexibleFormatter::set_date_pattern`] for how invalid patterns
    /// are handled.
    pub fn date_pattern(self, pattern: impl Into<String>) -> Self {
        self.formatter.set_date_pattern(pattern);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(self, config: FormatterConfig) -> Self {
        self.formatter.set_config(config);
        self
    }

    /// Uses an existing formatter instead of a fresh one.
    ///
    /// Configuration applied before this call is discarded, and configuration
    /// applied after it changes the shared formatter.
    pub fn formatter(self, formatter: FlexibleFormatter) -> Self {
        LoggerBuilder {
            name: self.name,
            formatter,
            make_writer: self.make_writer,
        }
    }

    /// Applies a writer that is suitable for test environments.
    ///
    /// # Examples
    /// ```
    /// tracing_flexible::builder("app")
    ///     .with_test_writer()
    ///     .build()
    ///     .on_closure(|| {
    ///         tracing::info!(target: "app", "Hello, world!");
    ///     })
    /// ```
    pub fn with_test_writer(self) -> LoggerBuilder<TestWriter> {
        self.with_writer(TestWriter::new())
    }

    /// Applies the specified [`MakeWriter`].
    pub fn with_writer<W2>(self, make_writer: W2) -> LoggerBuilder<W2>
    where
        W2: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        LoggerBuilder {
            name: self.name,
            formatter: self.formatter,
            make_writer,
        }
    }

    /// Creates the [`Channel`], attaches the formatter to it, and layers it
    /// onto a [`Registry`].
    pub fn build(self) -> SubscriberBuilder<Layered<Channel, Registry>> {
        let channel = Channel::new(self.name);
        self.formatter.attach_with_writer(&channel, self.make_writer);

        SubscriberBuilder {
            subscriber: channel.clone().with_subscriber(Registry::default()),
            channel,
            formatter: self.formatter,
        }
    }
}

/// A type for building [`Subscriber`]s by composing many [`Layer`]s, while
/// keeping hold of the [`Channel`] and [`FlexibleFormatter`] it was built
/// with.
#[derive(Debug)]
pub struct SubscriberBuilder<S> {
    subscriber: S,
    channel: Channel,
    formatter: FlexibleFormatter,
}

impl<S> SubscriberBuilder<S>
where
    S: Subscriber + Send + Sync,
{
    /// Wraps the inner subscriber with the provided `layer`.
    pub fn with<L>(self, layer: L) -> SubscriberBuilder<Layered<L, S>>
    where
        L: Layer<S>,
    {
        SubscriberBuilder {
            subscriber: layer.with_subscriber(self.subscriber),
            channel: self.channel,
            formatter: self.formatter,
        }
    }

    /// Returns the channel the formatter is attached to.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the formatter, which can still be reconfigured.
    pub fn formatter(&self) -> &FlexibleFormatter {
        &self.formatter
    }

    /// Runs the provided closure in the context of the subscriber.
    pub fn on_closure<R>(self, closure: impl FnOnce() -> R) -> R {
        let _guard = tracing::subscriber::set_default(self.subscriber);
        closure()
    }

    /// Sets the subscriber as the default for the current thread until the
    /// returned guard is dropped.
    pub fn set_default(self) -> DefaultGuard {
        tracing::subscriber::set_default(self.subscriber)
    }

    /// Sets the subscriber as the global default.
    ///
    /// # Errors
    ///
    /// Returns an error if a global default subscriber was already set.
    pub fn init(self) -> Result<(), SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(self.subscriber)
    }

    /// Returns the parts of the builder.
    pub fn into_parts(self) -> (S, Channel, FlexibleFormatter) {
        (self.subscriber, self.channel, self.formatter)
    }
}

cfg_env_filter! {
    impl<S> SubscriberBuilder<S>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
    {
        /// Adds an environment filter to this subscriber. This is based on the
        /// [`tracing_subscriber`] [`EnvFilter`] and uses the same `RUST_LOG`
        /// syntax.
        ///
        /// If the `RUST_LOG` environment value is not found or is invalid,
        /// this will default to `info`.
        pub fn with_env_filter(self) -> SubscriberBuilder<Layered<EnvFilter, S>> {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            self.with(filter)
        }
    }
}
