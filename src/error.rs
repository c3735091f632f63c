//! Error types for loader synchronization.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("AMD vendor \"{0}\" is not supported.")]
    UnsupportedVendor(String),

    #[error("Which vendor of AMD you're targeting?")]
    MissingVendor,

    #[error("{vendor} config file not found in:\n{}", path.display())]
    ConfigNotFound { vendor: String, path: PathBuf },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Upstream(anyhow::Error),
}

impl SyncError {
    /// Errors caused by what the user asked for, as opposed to I/O or upstream failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SyncError::UnsupportedVendor(_)
                | SyncError::MissingVendor
                | SyncError::ConfigNotFound { .. }
                | SyncError::InvalidEndpoint(_)
        )
    }

    /// Short event id used when the error is rendered.
    pub fn id(&self) -> &'static str {
        match self {
            SyncError::UnsupportedVendor(_) | SyncError::MissingVendor => "wrong argument",
            SyncError::ConfigNotFound { .. } => "ENOENT",
            SyncError::InvalidEndpoint(_) => "EINVEND",
            SyncError::Io { .. } => "EIO",
            SyncError::Parse { .. } => "EPARSE",
            SyncError::Upstream(_) => "EUPSTREAM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(SyncError::UnsupportedVendor("seajs".into()).is_user_error());
        assert!(SyncError::MissingVendor.is_user_error());
        assert!(
            SyncError::ConfigNotFound {
                vendor: "rjs".into(),
                path: PathBuf::from("/project/main.js"),
            }
            .is_user_error()
        );
        assert!(!SyncError::Upstream(anyhow::anyhow!("boom")).is_user_error());
        assert!(
            !SyncError::Parse {
                path: PathBuf::from("main.js"),
                message: "bad".into(),
            }
            .is_user_error()
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SyncError::UnsupportedVendor("seajs".into()).to_string(),
            "AMD vendor \"seajs\" is not supported."
        );
        assert_eq!(
            SyncError::MissingVendor.to_string(),
            "Which vendor of AMD you're targeting?"
        );
        assert_eq!(SyncError::MissingVendor.id(), "wrong argument");
    }
}
