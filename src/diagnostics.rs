//! User-facing diagnostics sink.
//!
//! Non-fatal problems (an image that cannot be found, a discarded source that
//! could not be moved) are reported here instead of aborting the compile.

use parking_lot::Mutex;

/// Receives progress and problem messages meant for the user.
pub trait Diagnostics {
    /// A problem the user should look at. Never aborts the operation.
    fn warn(&self, module: &str, message: &str);

    /// Progress information.
    fn info(&self, module: &str, message: &str) {
        crate::debug!(module; "{}", message);
    }
}

/// Prints diagnostics through the terminal logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl Diagnostics for TerminalSink {
    fn warn(&self, module: &str, message: &str) {
        crate::log!(module; "{}", message);
    }
}

/// Collects warnings in memory, to print them later or inspect in tests.
#[derive(Debug, Default)]
pub struct CollectSink {
    warnings: Mutex<Vec<String>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.warnings.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.warnings.lock().is_empty()
    }
}

impl Diagnostics for CollectSink {
    fn warn(&self, _module: &str, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn info(&self, _module: &str, _message: &str) {}
}
