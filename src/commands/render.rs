use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::error::SyncError;
use crate::event::{Level, LogEntry};

const PREFIX: &str = "bower";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Standard,
    Json,
}

pub fn format_entry(entry: &LogEntry, format: OutputFormat) -> String {
    match format {
        OutputFormat::Standard => format!("{} {:<12} {}", PREFIX, entry.id, entry.message),
        OutputFormat::Json => serde_json::to_string(entry).unwrap_or_default(),
    }
}

pub fn format_error(err: &SyncError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Standard => format!("{} {:<12} {}", PREFIX, err.id(), err),
        OutputFormat::Json => json!({
            "level": Level::Error,
            "id": err.id(),
            "message": err.to_string(),
        })
        .to_string(),
    }
}

/// Print entries until every sender of the stream is gone.
pub fn spawn_renderer(mut rx: UnboundedReceiver<LogEntry>, format: OutputFormat) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(entry) = rx.recv().await {
            let line = format_entry(&entry, format);
            match entry.level {
                Level::Warn | Level::Error => eprintln!("{}", line),
                Level::Debug => log::debug!("{}", line),
                Level::Info | Level::Action => println!("{}", line),
            }
        }
    })
}
