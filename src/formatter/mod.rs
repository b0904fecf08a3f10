//! Trait for rendering log records into lines.
//!
//! See [`Render`] for more details.
use crate::record::Record;
use std::error::Error;
use std::fmt::{self, Write};

mod flexible;
pub use flexible::{FlexibleFormatter, RenderError};

/// Render a [`Record`] into the exact text written for it.
///
/// [`Render`] types are used by [`ConsoleHandler`]s, which write whatever the
/// renderer returns without adding anything, so renderers are responsible for
/// the trailing newline.
///
/// # Examples
///
/// This trait is implemented for all `Fn(&Record) -> Result<String, E>` types,
/// where `E: Error + Send + Sync`.
/// ```
/// use std::fmt;
/// use tracing::Level;
/// use tracing_flexible::{Record, Render};
///
/// let shout = |record: &Record| -> Result<String, fmt::Error> {
///     Ok(format!("{}!\n", record.message().to_uppercase()))
/// };
///
/// let line = shout.render(&Record::new(Level::WARN, "app", "careful"))?;
/// assert_eq!(line, "CAREFUL!\n");
/// # Ok::<(), fmt::Error>(())
/// ```
///
/// [`ConsoleHandler`]: crate::handler::ConsoleHandler
pub trait Render {
    /// The error type if the record cannot be rendered.
    type Error: Error + Send + Sync + 'static;

    /// Renders the record, or returns an error.
    ///
    /// # Errors
    ///
    /// If the record cannot be rendered to a string, an error is returned.
    fn render(&self, record: &Record<'_>) -> Result<String, Self::Error>;
}

impl<F, E> Render for F
where
    F: Fn(&Record<'_>) -> Result<String, E>,
    E: Error + Send + Sync + 'static,
{
    type Error = E;

    #[inline]
    fn render(&self, record: &Record<'_>) -> Result<String, E> {
        self(record)
    }
}

/// Render records as `LEVEL name: message`.
///
/// This is what a [`Channel`] writes through its parent output when no
/// formatter is attached to it.
///
/// # Examples
///
/// ```log
/// INFO  app::db: connected
/// WARN  app: disk almost full
/// ```
///
/// [`Channel`]: crate::logger::Channel
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain {
    _priv: (),
}

impl Plain {
    /// Returns a new [`Plain`] renderer.
    pub const fn new() -> Self {
        Plain { _priv: () }
    }
}

impl Render for Plain {
    type Error = fmt::Error;

    fn render(&self, record: &Record<'_>) -> Result<String, fmt::Error> {
        let mut writer = String::with_capacity(record.message().len() + 32);
        writeln!(
            writer,
            "{:<5} {}: {}",
            record.level(),
            record.logger_name(),
            record.message()
        )?;
        Ok(writer)
    }
}
