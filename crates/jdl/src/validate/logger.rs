//! Warning sink for the validators.

use std::sync::Mutex;

use log::warn;

/// Receives the non-fatal findings of validation.
///
/// Warnings never abort an import; they are handed to the logger and the
/// validation goes on.
pub trait Logger: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn warn(&self, message: &str) {
        warn!(target: "jdl::validate", "{message}");
    }
}

/// Keeps every warning in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    warnings: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The warnings received so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|warnings| warnings.clone())
            .unwrap_or_default()
    }
}

impl Logger for MemoryLogger {
    fn warn(&self, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_keeps_order() {
        let logger = MemoryLogger::new();
        logger.warn("first");
        logger.warn("second");
        assert_eq!(logger.warnings(), vec!["first", "second"]);
    }
}
