use crate::hash::sha256::DEFAULT_BLOCK_SIZE;
use crate::log::{LogSink, NoopSink};
use std::fmt;
use std::sync::Arc;

/// Per-call environment: where progress goes and how large I/O blocks are.
#[derive(Clone)]
pub struct Context {
    /// When false, progress messages are dropped; failures in batch runs are
    /// still emitted.
    pub verbose: bool,
    pub sink: Arc<dyn LogSink>,
    pub block_size: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            verbose: false,
            sink: Arc::new(NoopSink),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("verbose", &self.verbose)
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(verbose: bool, sink: Arc<dyn LogSink>) -> Self {
        Self {
            verbose,
            sink,
            ..Default::default()
        }
    }

    pub(crate) fn log(&self, msg: impl AsRef<str>) {
        if self.verbose {
            self.sink.emit(msg.as_ref());
        }
    }

    pub(crate) fn alert(&self, msg: impl AsRef<str>) {
        self.sink.emit(msg.as_ref());
    }

    pub(crate) fn block_size(&self) -> usize {
        self.block_size.max(1)
    }
}
