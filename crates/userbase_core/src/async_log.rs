//! Channel-fed background logger.
//!
//! # Responsibility
//! - Hand string messages from producers to one dedicated consumer thread.
//! - Expose an explicit close signal and a joinable completion handle.
//!
//! # Invariants
//! - Messages are processed in the order they were sent.
//! - With capacity 0 every `send` blocks until the consumer has taken the message.
//! - The consumer exits only after every sender is closed and the channel is drained,
//!   so `LoggerHandle::wait` returning means no message is outstanding.

use log::{error, info, log_enabled, Level};
use std::io::Write;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

const CONSUMER_THREAD_NAME: &str = "async-logger";

type Sink = Box<dyn FnMut(String) + Send + 'static>;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to spawn logger thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("logger consumer is no longer receiving")]
    Disconnected,
    #[error("logger consumer panicked")]
    ConsumerPanicked,
}

/// Entry point for starting a background logger.
pub struct AsyncLogger;

impl AsyncLogger {
    /// Starts an unbuffered logger that forwards messages to the `log` facade.
    pub fn spawn() -> Result<(LogSender, LoggerHandle), LogError> {
        Self::builder().spawn()
    }

    pub fn builder() -> AsyncLoggerBuilder {
        AsyncLoggerBuilder {
            capacity: 0,
            sink: Box::new(default_sink),
        }
    }
}

/// Configures channel capacity and message sink before spawning.
pub struct AsyncLoggerBuilder {
    capacity: usize,
    sink: Sink,
}

impl AsyncLoggerBuilder {
    /// Channel buffer size. `0` makes every send a rendezvous with the consumer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Replaces the default `log`-facade sink.
    pub fn sink(mut self, sink: impl FnMut(String) + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn spawn(self) -> Result<(LogSender, LoggerHandle), LogError> {
        let (tx, rx) = mpsc::sync_channel::<String>(self.capacity);
        let sink = self.sink;

        let join = thread::Builder::new()
            .name(CONSUMER_THREAD_NAME.to_string())
            .spawn(move || drain(rx, sink))?;

        Ok((LogSender { tx }, LoggerHandle { join }))
    }
}

fn drain(rx: Receiver<String>, mut sink: Sink) -> usize {
    let mut processed = 0;
    for message in rx {
        sink(message);
        processed += 1;
    }
    processed
}

// Without an active `log` backend the record would be dropped silently.
fn default_sink(message: String) {
    if log_enabled!(Level::Info) {
        info!("event=async_log module=logger message={message}");
    } else {
        let _ = write_fallback(&mut std::io::stderr().lock(), &message);
    }
}

fn write_fallback(out: &mut impl Write, message: &str) -> std::io::Result<()> {
    writeln!(out, "event=async_log module=logger message={message}")
}

/// Producer side of the logger channel.
#[derive(Clone)]
pub struct LogSender {
    tx: SyncSender<String>,
}

impl LogSender {
    /// Sends one message, blocking until the channel accepts it.
    pub fn send(&self, message: impl Into<String>) -> Result<(), LogError> {
        self.tx
            .send(message.into())
            .map_err(|_| LogError::Disconnected)
    }

    /// Signals that this producer has no more messages.
    ///
    /// The consumer stops once all clones of the sender are closed or dropped.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Completion handle for the consumer thread.
pub struct LoggerHandle {
    join: JoinHandle<usize>,
}

impl LoggerHandle {
    /// Waits for the consumer to drain the channel and exit.
    ///
    /// Returns the number of messages the consumer processed. Blocks forever if a
    /// sender is still alive, so close every sender first.
    pub fn wait(self) -> Result<usize, LogError> {
        self.join.join().map_err(|_| {
            error!("event=async_log_join module=logger status=error reason=consumer_panicked");
            LogError::ConsumerPanicked
        })
    }
}
