//! Logging capability handed to every engine operation.
//!
//! The engine never writes to stdout/stderr itself; it emits progress lines
//! through a [`LogSink`]. The CLI plugs in [`TracingSink`]; library callers
//! get [`NoopSink`] unless they choose otherwise.

use std::sync::{Arc, Mutex};

pub trait LogSink: Send + Sync {
    fn emit(&self, msg: &str);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn emit(&self, _msg: &str) {}
}

/// Forwards every message to `tracing` at INFO under the `fsplit` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, msg: &str) {
        tracing::info!(target: "fsplit", "{msg}");
    }
}

/// Keeps messages in memory; handy for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn emit(&self, msg: &str) {
        match self.lines.lock() {
            Ok(mut g) => g.push(msg.to_string()),
            Err(poisoned) => poisoned.into_inner().push(msg.to_string()),
        }
    }
}
