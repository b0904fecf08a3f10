use crate::color::Color;
use crate::config::{FormatterConfig, TimestampSource};
use crate::formatter::Render;
use crate::handler::{ConsoleHandler, Handler, MakeStderr};
use crate::logger::{Logger, LoggerId};
use crate::pattern::{DatePattern, PatternError};
use crate::record::Record;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Render log lines with an optional date, logger name, level and color.
///
/// Lines are laid out as follows, where each bracketed fragment is only
/// present if enabled, and the color escapes are only present if a color other
/// than [`Color::Default`] is set:
/// ```txt
/// <COLOR>[<DATE>] [<NAME>] [<LEVEL>] <MESSAGE><RESET>
/// ```
///
/// A [`FlexibleFormatter`] is a handle: clones share configuration and
/// attachments, and count as the same formatter when detaching. Setters take
/// `&self` and return it, so they can be chained and can be called while the
/// formatter is attached. The configuration is read on every render, so a
/// change applies to every attached logger at once.
///
/// # Examples
///
/// ```
/// use tracing::Level;
/// use tracing_flexible::{Color, FlexibleFormatter, Record, Render};
///
/// let formatter = FlexibleFormatter::new();
/// formatter.enable_level(true).enable_name(true).set_color(Color::Green);
///
/// let line = formatter.render(&Record::new(Level::INFO, "app", "ready"))?;
/// assert_eq!(line, "\x1b[32m[app] [INFO] ready\x1b[0m\n");
/// # Ok::<(), tracing_flexible::RenderError>(())
/// ```
///
/// Attaching to a [`Channel`] makes it render every event of that channel:
/// ```
/// use tracing_flexible::{Channel, FlexibleFormatter};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let channel = Channel::new("app");
/// let formatter = FlexibleFormatter::new();
/// formatter.enable_level(true).attach(&channel);
///
/// let subscriber = tracing_subscriber::registry().with(channel.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     tracing::info!(target: "app", "ready");
/// });
///
/// formatter.detach(&channel);
/// ```
/// ```log
/// [INFO] ready
/// ```
///
/// # Concurrency
///
/// Renders read the configuration under a read lock, so a setter racing with a
/// render either fully applies to it or not at all. Attaching and detaching
/// are serialized per formatter.
///
/// [`Channel`]: crate::logger::Channel
#[derive(Clone)]
pub struct FlexibleFormatter {
    shared: Arc<Shared>,
}

struct Shared {
    state: RwLock<State>,
    attached: Mutex<HashSet<LoggerId>>,
}

struct State {
    config: FormatterConfig,
    pattern: Result<DatePattern, PatternError>,
}

impl State {
    fn new(config: FormatterConfig) -> Self {
        let pattern = DatePattern::parse(&config.date_pattern);
        State { config, pattern }
    }
}

impl FlexibleFormatter {
    /// Returns a new [`FlexibleFormatter`] with the default configuration,
    /// which renders only the message.
    pub fn new() -> Self {
        FlexibleFormatter::from_config(FormatterConfig::default())
    }

    /// Returns a new [`FlexibleFormatter`] with the given configuration.
    ///
    /// An invalid `date_pattern` is accepted, and reported when a line with
    /// a date is rendered.
    pub fn from_config(config: FormatterConfig) -> Self {
        FlexibleFormatter {
            shared: Arc::new(Shared {
                state: RwLock::new(State::new(config)),
                attached: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Sets the color lines are wrapped in.
    pub fn set_color(&self, color: Color) -> &Self {
        self.write().config.color = color;
        self
    }

    /// Returns the color lines are wrapped in.
    pub fn color(&self) -> Color {
        self.read().config.color
    }

    /// Enables or disables the `[date]` fragment.
    pub fn enable_date(&self, enable: bool) -> &Self {
        self.write().config.show_date = enable;
        self
    }

    /// Enables or disables the `[LEVEL]` fragment.
    pub fn enable_level(&self, enable: bool) -> &Self {
        self.write().config.show_level = enable;
        self
    }

    /// Enables or disables the `[logger name]` fragment.
    pub fn enable_name(&self, enable: bool) -> &Self {
        self.write().config.show_name = enable;
        self
    }

    /// Sets the pattern of the date fragment.
    ///
    /// Any string is accepted. If it isn't a valid [`DatePattern`], rendering
    /// a line with a date returns [`RenderError::Pattern`]. Use
    /// [`try_set_date_pattern`] to reject invalid patterns up front.
    ///
    /// [`try_set_date_pattern`]: FlexibleFormatter::try_set_date_pattern
    pub fn set_date_pattern(&self, pattern: impl Into<String>) -> &Self {
        let pattern = pattern.into();
        let compiled = DatePattern::parse(&pattern);

        let mut state = self.write();
        state.config.date_pattern = pattern;
        state.pattern = compiled;
        drop(state);

        self
    }

    /// Sets the pattern of the date fragment if it is a valid
    /// [`DatePattern`].
    ///
    /// # Errors
    ///
    /// If the pattern cannot be compiled, the error is returned and the
    /// configured pattern is left unchanged.
    pub fn try_set_date_pattern(&self, pattern: &str) -> Result<&Self, PatternError> {
        let compiled = DatePattern::parse(pattern)?;

        let mut state = self.write();
        state.config.date_pattern = pattern.to_owned();
        state.pattern = Ok(compiled);
        drop(state);

        Ok(self)
    }

    /// Returns the pattern of the date fragment.
    pub fn date_pattern(&self) -> String {
        self.read().config.date_pattern.clone()
    }

    /// Sets which clock the date fragment reads.
    ///
    /// Lines show the time they are rendered at by default.
    pub fn set_timestamp_source(&self, source: TimestampSource) -> &Self {
        self.write().config.timestamp = source;
        self
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> FormatterConfig {
        self.read().config.clone()
    }

    /// Replaces the whole configuration.
    pub fn set_config(&self, config: FormatterConfig) -> &Self {
        let state = State::new(config);
        *self.write() = state;
        self
    }

    /// Makes `logger` write its records to stderr through this formatter.
    ///
    /// The logger's parent output is switched off so records aren't written
    /// twice. Attaching to a logger this formatter is already attached to
    /// does nothing.
    pub fn attach<L>(&self, logger: &L) -> &Self
    where
        L: Logger + ?Sized,
    {
        self.attach_with_writer(logger, MakeStderr)
    }

    /// Makes `logger` write its records through this formatter to the
    /// provided [`MakeWriter`].
    ///
    /// Attaching to a logger this formatter is already attached to does
    /// nothing, and the writer is dropped.
    pub fn attach_with_writer<L, W>(&self, logger: &L, make_writer: W) -> &Self
    where
        L: Logger + ?Sized,
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let mut attached = self.attached();
        if !attached.insert(logger.id()) {
            return self;
        }

        logger.set_use_parent_handlers(false);
        logger.add_handler(Arc::new(ConsoleHandler::with_writer(
            self.clone(),
            make_writer,
        )));
        drop(attached);

        tracing::trace!(logger = logger.name(), "attached formatter");
        self
    }

    /// Undoes [`attach`] on `logger`.
    ///
    /// The logger's parent output is switched back on, and every handler of
    /// the logger that renders with this formatter is removed, including ones
    /// that were added by other means than [`attach`]. Detaching from a logger
    /// this formatter isn't attached to does nothing.
    ///
    /// [`attach`]: FlexibleFormatter::attach
    pub fn detach<L>(&self, logger: &L) -> &Self
    where
        L: Logger + ?Sized,
    {
        let mut attached = self.attached();
        if !attached.remove(&logger.id()) {
            return self;
        }

        logger.set_use_parent_handlers(true);

        for handler in logger.handlers() {
            if self.renders_for(handler.as_ref()) {
                logger.remove_handler(&handler);
            }
        }
        drop(attached);

        tracing::trace!(logger = logger.name(), "detached formatter");
        self
    }

    /// Returns `true` if this formatter is attached to `logger`.
    pub fn is_attached<L>(&self, logger: &L) -> bool
    where
        L: Logger + ?Sized,
    {
        self.attached().contains(&logger.id())
    }

    /// Returns `true` if both handles refer to the same formatter.
    pub fn ptr_eq(&self, other: &FlexibleFormatter) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Renders `record` as if the wall clock read `now`.
    ///
    /// With [`TimestampSource::Record`], `now` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Pattern`] if the date fragment is enabled and
    /// the date pattern is invalid.
    pub fn render_at(&self, record: &Record<'_>, now: DateTime<Local>) -> Result<String, RenderError> {
        let state = self.read();
        let config = &state.config;

        let mut line = String::with_capacity(record.message().len() + 64);
        line.push_str(config.color.ansi());

        if config.show_date {
            let pattern = state.pattern.as_ref().map_err(|e| RenderError::Pattern(*e))?;
            let time = match config.timestamp {
                TimestampSource::RenderTime => now,
                TimestampSource::Record => record.timestamp(),
            };

            line.push('[');
            pattern.write(&time, &mut line)?;
            line.push_str("] ");
        }

        if config.show_name {
            write!(line, "[{}] ", record.logger_name())?;
        }

        if config.show_level {
            write!(line, "[{}] ", record.level())?;
        }

        line.push_str(record.message());
        line.push_str(config.color.reset());
        line.push('\n');

        Ok(line)
    }

    fn renders_for(&self, handler: &dyn Handler) -> bool {
        handler
            .renderer()
            .and_then(|renderer| renderer.downcast_ref::<FlexibleFormatter>())
            .map_or(false, |formatter| self.ptr_eq(formatter))
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.shared.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.shared.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn attached(&self) -> MutexGuard<'_, HashSet<LoggerId>> {
        self.shared.attached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FlexibleFormatter {
    fn default() -> Self {
        FlexibleFormatter::new()
    }
}

impl fmt::Debug for FlexibleFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlexibleFormatter")
            .field("config", &self.read().config)
            .field("attached", &self.attached().len())
            .finish()
    }
}

impl Render for FlexibleFormatter {
    type Error = RenderError;

    fn render(&self, record: &Record<'_>) -> Result<String, RenderError> {
        self.render_at(record, Local::now())
    }
}

/// Error returned by [`FlexibleFormatter`] when a line cannot be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The date fragment is enabled and the configured pattern is invalid.
    Pattern(PatternError),
    /// Writing into the line failed.
    Fmt(fmt::Error),
}

impl From<fmt::Error> for RenderError {
    fn from(error: fmt::Error) -> Self {
        RenderError::Fmt(error)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Pattern(error) => write!(f, "invalid date pattern: {}", error),
            RenderError::Fmt(error) => error.fmt(f),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RenderError::Pattern(error) => Some(error),
            RenderError::Fmt(error) => Some(error),
        }
    }
}
