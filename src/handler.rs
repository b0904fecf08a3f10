//! Destinations that loggers publish records to.
//!
//! See [`Handler`] for more details.
use crate::formatter::{Plain, Render};
use crate::record::Record;
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

/// A type that receives the records of a [`Logger`].
///
/// `Handler`s are responsible for both rendering and writing records to their
/// intended destination. This is typically implemented using a [`Render`]
/// type and a [`MakeWriter`], which is what [`ConsoleHandler`] does.
///
/// [`Logger`]: crate::logger::Logger
pub trait Handler: Send + Sync + 'static {
    /// Publishes a record.
    ///
    /// # Errors
    ///
    /// If the record cannot be rendered or written, an error is returned.
    /// Loggers report it and carry on with their other handlers.
    fn publish(&self, record: &Record<'_>) -> Result<(), PublishError>;

    /// Returns the renderer of this handler, if it has one.
    ///
    /// Formatters downcast this to find the handlers they render for.
    fn renderer(&self) -> Option<&dyn Any> {
        None
    }
}

/// A [`Handler`] that renders records and writes them to a console stream.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tracing_flexible::handler::{ConsoleHandler, MakeStdout};
/// use tracing_flexible::{Channel, FlexibleFormatter, Logger};
///
/// let channel = Channel::new("app");
/// let formatter = FlexibleFormatter::new();
/// formatter.enable_level(true);
///
/// channel.add_handler(Arc::new(ConsoleHandler::with_writer(formatter, MakeStdout)));
/// assert_eq!(channel.handlers().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ConsoleHandler<R, W = MakeStderr> {
    renderer: R,
    make_writer: W,
}

impl<R> ConsoleHandler<R, MakeStderr>
where
    R: Render,
{
    /// Returns a new [`ConsoleHandler`] that writes to stderr.
    pub fn new(renderer: R) -> Self {
        ConsoleHandler {
            renderer,
            make_writer: MakeStderr,
        }
    }
}

impl<R, W> ConsoleHandler<R, W>
where
    R: Render,
    W: for<'a> MakeWriter<'a>,
{
    /// Returns a new [`ConsoleHandler`] that writes to the provided
    /// [`MakeWriter`].
    pub fn with_writer(renderer: R, make_writer: W) -> Self {
        ConsoleHandler {
            renderer,
            make_writer,
        }
    }

    /// Set the writer.
    pub fn writer<W2>(self, make_writer: W2) -> ConsoleHandler<R, W2>
    where
        W2: for<'a> MakeWriter<'a>,
    {
        ConsoleHandler {
            renderer: self.renderer,
            make_writer,
        }
    }
}

impl Default for ConsoleHandler<Plain, MakeStderr> {
    fn default() -> Self {
        ConsoleHandler::new(Plain::new())
    }
}

impl<R, W> Handler for ConsoleHandler<R, W>
where
    R: Render + Send + Sync + 'static,
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fn publish(&self, record: &Record<'_>) -> Result<(), PublishError> {
        let line = self
            .renderer
            .render(record)
            .map_err(|e| PublishError::Render(e.into()))?;

        self.make_writer
            .make_writer()
            .write_all(line.as_bytes())
            .map_err(PublishError::Io)
    }

    fn renderer(&self) -> Option<&dyn Any> {
        Some(&self.renderer as &dyn Any)
    }
}

/// A [`MakeWriter`] that writes to stdout.
///
/// This is functionally the same as using [`std::io::stdout`] as a `MakeWriter`,
/// except it has a named type and can therefore be used in type signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeStdout;

/// A [`MakeWriter`] that writes to stderr.
///
/// This is functionally the same as using [`std::io::stderr`] as a `MakeWriter`,
/// except it has a named type and can therefore be used in type signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeStderr;

impl<'a> MakeWriter<'a> for MakeStdout {
    type Writer = io::Stdout;

    fn make_writer(&'a self) -> Self::Writer {
        io::stdout()
    }
}

impl<'a> MakeWriter<'a> for MakeStderr {
    type Writer = io::Stderr;

    fn make_writer(&'a self) -> Self::Writer {
        io::stderr()
    }
}

/// Error returned by [`Handler::publish`].
#[derive(Debug)]
pub enum PublishError {
    /// The renderer failed.
    Render(Box<dyn Error + Send + Sync>),
    /// Writing the rendered line failed.
    Io(io::Error),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Render(reason) => write!(f, "rendering failed: {}", reason),
            PublishError::Io(reason) => write!(f, "writing failed: {}", reason),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Render(reason) => Some(&**reason),
            PublishError::Io(reason) => Some(reason),
        }
    }
}

impl From<io::Error> for PublishError {
    fn from(error: io::Error) -> Self {
        PublishError::Io(error)
    }
}
