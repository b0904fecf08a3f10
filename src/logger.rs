//! Named loggers that own a list of handlers.
//!
//! [`tracing`] routes events to subscribers, not to named loggers. A
//! [`Channel`] fills that gap: it is a [`Layer`] that picks up the events whose
//! target is its name (or a path below it) and publishes them to its
//! [`Handler`]s. The [`Logger`] trait is the part of a channel that formatters
//! need, so other logging backends can be attached to as well.
//!
//! Channels form a hierarchy. A child created with [`Channel::child`] is
//! named below its parent, and its records travel up to the parent's handlers
//! while [`use_parent_handlers`] is `true`. Only the root of a hierarchy needs
//! to be layered onto a subscriber: it hands each event to the most specific
//! channel for its target, so every record is published once.
//!
//! # Examples
//!
//! ```
//! use tracing_flexible::{Channel, FlexibleFormatter};
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let app = Channel::new("app");
//! let db = app.child("db");
//!
//! FlexibleFormatter::new().enable_name(true).attach(&db);
//!
//! let subscriber = tracing_subscriber::registry().with(app.clone());
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(target: "app::db", "connected");
//!     tracing::info!(target: "app::http", "listening");
//! });
//! ```
//! ```log
//! [app::db] connected
//! INFO  app::http: listening
//! ```
//!
//! [`use_parent_handlers`]: Logger::use_parent_handlers
//! [`Layer`]: tracing_subscriber::Layer
use crate::fail;
use crate::formatter::Plain;
use crate::handler::{ConsoleHandler, Handler};
use crate::record::Record;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// The identity of a logger.
///
/// Two loggers with the same name are still different loggers, so formatters
/// track the loggers they are attached to by [`LoggerId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoggerId(u64);

impl LoggerId {
    /// Returns an id that no other call has returned.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        LoggerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the id as a number.
    pub fn into_u64(self) -> u64 {
        self.0
    }
}

/// A named logger with a list of [`Handler`]s.
///
/// Besides its own handlers, a logger has a parent output that receives its
/// records while [`use_parent_handlers`] is `true`.
///
/// [`use_parent_handlers`]: Logger::use_parent_handlers
pub trait Logger {
    /// Returns the identity of this logger.
    fn id(&self) -> LoggerId;

    /// Returns the name of this logger.
    fn name(&self) -> &str;

    /// Adds a handler.
    fn add_handler(&self, handler: Arc<dyn Handler>);

    /// Removes a handler, compared by address.
    ///
    /// Returns `true` if the handler was present.
    fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool;

    /// Returns the handlers currently installed.
    fn handlers(&self) -> Vec<Arc<dyn Handler>>;

    /// Sets whether records are also published to the parent output.
    fn set_use_parent_handlers(&self, enable: bool);

    /// Returns whether records are also published to the parent output.
    fn use_parent_handlers(&self) -> bool;
}

/// A [`Logger`] that is fed by [`tracing`] events.
///
/// A channel accepts the events whose target is its name, or starts with its
/// name followed by `::`. A root channel's parent output is a
/// [`ConsoleHandler`] rendering with [`Plain`] to stderr, unless another one
/// is given with [`Channel::with_parent`]. A child's parent output is its
/// parent channel.
///
/// Channels are handles: clones are the same logger.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<Inner>,
}

struct Inner {
    id: LoggerId,
    name: String,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    use_parent_handlers: AtomicBool,
    parent: Parent,
    children: RwLock<Vec<Weak<Inner>>>,
}

enum Parent {
    Output(Arc<dyn Handler>),
    Channel(Channel),
}

impl Channel {
    /// Returns a new root [`Channel`] whose parent output writes
    /// `LEVEL name: message` to stderr.
    pub fn new(name: impl Into<String>) -> Self {
        Channel::with_parent(name, ConsoleHandler::new(Plain::new()))
    }

    /// Returns a new root [`Channel`] with a custom parent output.
    pub fn with_parent<H>(name: impl Into<String>, parent: H) -> Self
    where
        H: Handler,
    {
        Channel::from_parts(name.into(), Parent::Output(Arc::new(parent)))
    }

    /// Returns a new [`Channel`] named `name` below this one.
    ///
    /// The child of `app` named `db` is `app::db`. It receives the events for
    /// `app::db` and the paths below it, and its parent output is `app`. The
    /// parent only routes to the child while a handle to the child is alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracing_flexible::{Channel, Logger};
    ///
    /// let app = Channel::new("app");
    /// let db = app.child("db");
    ///
    /// assert_eq!(db.name(), "app::db");
    /// assert_eq!(db.parent().map(Logger::id), Some(app.id()));
    /// assert_eq!(app.route("app::db::pool").map(|c| c.id()), Some(db.id()));
    /// ```
    pub fn child(&self, name: &str) -> Channel {
        let full_name = if self.inner.name.is_empty() {
            name.to_owned()
        } else {
            format!("{}::{}", self.inner.name, name)
        };

        let child = Channel::from_parts(full_name, Parent::Channel(self.clone()));

        let mut children = self.inner.children.write().unwrap_or_else(PoisonError::into_inner);
        children.retain(|weak| weak.strong_count() > 0);
        children.push(Arc::downgrade(&child.inner));
        drop(children);

        child
    }

    fn from_parts(name: String, parent: Parent) -> Self {
        Channel {
            inner: Arc::new(Inner {
                id: LoggerId::next(),
                name,
                handlers: RwLock::new(Vec::new()),
                use_parent_handlers: AtomicBool::new(true),
                parent,
                children: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Returns the parent channel, or `None` for a root channel.
    pub fn parent(&self) -> Option<&Channel> {
        match &self.inner.parent {
            Parent::Channel(parent) => Some(parent),
            Parent::Output(_) => None,
        }
    }

    /// Returns `true` if events with this target belong to this channel or
    /// one of its descendants.
    ///
    /// A channel with an empty name accepts every target.
    pub fn accepts(&self, target: &str) -> bool {
        let name = self.inner.name.as_str();
        if name.is_empty() {
            return true;
        }

        match target.strip_prefix(name) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }

    /// Returns the most specific channel of this hierarchy, starting here,
    /// that accepts `target`.
    pub fn route(&self, target: &str) -> Option<Channel> {
        if !self.accepts(target) {
            return None;
        }

        let children = self.inner.children.read().unwrap_or_else(PoisonError::into_inner);
        for inner in children.iter().filter_map(Weak::upgrade) {
            if let Some(found) = (Channel { inner }).route(target) {
                return Some(found);
            }
        }

        Some(self.clone())
    }

    /// Publishes a record to every handler, then up the hierarchy for as long
    /// as parent output is in use.
    ///
    /// Failures are reported on stderr and don't stop the other handlers.
    pub fn publish(&self, record: &Record<'_>) {
        let mut current = self;

        loop {
            for handler in current.handlers().iter() {
                if let Err(error) = handler.publish(record) {
                    fail::publish_failed(current.name(), &error);
                }
            }

            if !current.use_parent_handlers() {
                return;
            }

            match &current.inner.parent {
                Parent::Channel(parent) => current = parent,
                Parent::Output(output) => {
                    if let Err(error) = output.publish(record) {
                        fail::parent_publish_failed(current.name(), &error);
                    }
                    return;
                }
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Handler>>> {
        self.inner.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn Handler>>> {
        self.inner.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Logger for Channel {
    fn id(&self) -> LoggerId {
        self.inner.id
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.write().push(handler);
    }

    fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        let mut handlers = self.write();
        match handlers.iter().position(|h| same_handler(h, handler)) {
            Some(index) => {
                handlers.remove(index);
                true
            }
            None => false,
        }
    }

    fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.read().clone()
    }

    fn set_use_parent_handlers(&self, enable: bool) {
        self.inner.use_parent_handlers.store(enable, Ordering::Release);
    }

    fn use_parent_handlers(&self) -> bool {
        self.inner.use_parent_handlers.load(Ordering::Acquire)
    }
}

// Compares addresses only, vtable pointers of the same type can differ
// between codegen units.
fn same_handler(a: &Arc<dyn Handler>, b: &Arc<dyn Handler>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(Logger::name))
            .field("handlers", &self.read().len())
            .field("use_parent_handlers", &self.use_parent_handlers())
            .finish()
    }
}

impl<S> Layer<S> for Channel
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Children are fed by their root
        if self.parent().is_some() {
            return;
        }

        if let Some(channel) = self.route(event.metadata().target()) {
            channel.publish(&Record::from_event(event));
        }
    }
}
