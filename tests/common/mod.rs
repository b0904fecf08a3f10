#![allow(dead_code)]
use regex::Regex;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_flexible::handler::ConsoleHandler;
use tracing_flexible::{Channel, Plain};
use tracing_subscriber::fmt::MakeWriter;

/// A `MakeWriter` that appends everything to a shared buffer.
#[derive(Clone, Debug, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Returns everything written so far and empties the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8(bytes).unwrap()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Buffer {
    type Writer = Buffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Returns a channel whose parent output is captured in the returned buffer.
pub fn channel(name: &str) -> (Channel, Buffer) {
    let parent = Buffer::new();
    let channel = Channel::with_parent(name, ConsoleHandler::with_writer(Plain::new(), parent.clone()));
    (channel, parent)
}

/// Returns `true` if `line` starts with `[MM/dd/yyyy HH:mm:ss]`.
pub fn starts_with_default_date(line: &str) -> bool {
    Regex::new(r"^\[\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}\]")
        .unwrap()
        .is_match(line)
}
