//! Progress events emitted while synchronizing loader configurations.
//!
//! A [`Logger`] is a cheap, cloneable handle onto one multicast stream of
//! [`LogEntry`] values. Every subscriber receives every entry published after
//! it subscribed, in publication order. Terminal outcomes are not part of the
//! stream: operations return a `Result` instead.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Action,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Action => "action",
            Level::Warn => "warn",
            Level::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: Level,
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Logger {
    subscribers: Arc<Mutex<Vec<UnboundedSender<LogEntry>>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an independent receiver for entries published from now on.
    pub fn subscribe(&self) -> UnboundedReceiver<LogEntry> {
        let (tx, rx) = unbounded_channel();
        self.lock().push(tx);
        rx
    }

    pub fn log(&self, level: Level, id: &str, message: impl Into<String>, data: Option<Value>) {
        let entry = LogEntry {
            level,
            id: id.to_string(),
            message: message.into(),
            data,
        };
        log::debug!("[{}] {}: {}", entry.level, entry.id, entry.message);

        // Closed receivers are dropped from the fan-out
        self.lock().retain(|tx| tx.send(entry.clone()).is_ok());
    }

    pub fn info(&self, id: &str, message: impl Into<String>) {
        self.log(Level::Info, id, message, None);
    }

    pub fn action(&self, id: &str, message: impl Into<String>) {
        self.log(Level::Action, id, message, None);
    }

    pub fn warn(&self, id: &str, message: impl Into<String>) {
        self.log(Level::Warn, id, message, None);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UnboundedSender<LogEntry>>> {
        // A panic while holding the lock leaves the list itself intact
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Drain whatever is currently buffered on a receiver.
#[cfg(test)]
pub fn drain(rx: &mut UnboundedReceiver<LogEntry>) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    while let Ok(entry) = rx.try_recv() {
        entries.push(entry);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscriber_receives_entries_in_order() {
        let logger = Logger::new();
        let mut rx = logger.subscribe();

        logger.info("updating", "first");
        logger.warn("missing", "second");
        logger.log(Level::Action, "pruned", "third", Some(json!({"name": "a"})));

        let entries = drain(&mut rx);
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["updating", "missing", "pruned"]);
        assert_eq!(entries[1].level, Level::Warn);
        assert_eq!(entries[2].data, Some(json!({"name": "a"})));
    }

    #[test]
    fn test_multiple_subscribers_each_get_every_entry() {
        let logger = Logger::new();
        let mut first = logger.subscribe();
        let mut second = logger.clone().subscribe();

        logger.info("a", "one");
        logger.clone().info("b", "two");

        assert_eq!(drain(&mut first).len(), 2);
        assert_eq!(drain(&mut second).len(), 2);
    }

    #[test]
    fn test_late_subscriber_and_dropped_receiver() {
        let logger = Logger::new();
        logger.info("early", "nobody listening");

        let rx = logger.subscribe();
        drop(rx);
        logger.info("after-drop", "still fine");

        let mut late = logger.subscribe();
        logger.info("late", "seen");
        let entries = drain(&mut late);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "late");
    }

    #[test]
    fn test_entry_serializes_without_empty_data() {
        let entry = LogEntry {
            level: Level::Warn,
            id: "missing".into(),
            message: "m".into(),
            data: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, json!({"level": "warn", "id": "missing", "message": "m"}));
    }
}
