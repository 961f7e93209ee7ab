//! Error types for the trip_core library.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of entity an error or record refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Itinerary,
    PackingItem,
    Expense,
}

impl EntityKind {
    /// Plural label used for collection files and log messages
    pub fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Itinerary => "itineraries",
            EntityKind::PackingItem => "packing items",
            EntityKind::Expense => "expenses",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Itinerary => "Itinerary",
            EntityKind::PackingItem => "Packing item",
            EntityKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Coarse classification of failures, for callers that branch on the cause
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Io,
    Parse,
}

/// Core error type for trip_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record is not in its collection
    #[error("{entity} with ID '{id}' not found")]
    NotFound { entity: EntityKind, id: String },

    /// Input rejected at the store or export boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading or writing a collection or export file failed
    #[error("Failed to {action} {}: {source}", path.display())]
    Storage {
        action: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn storage(action: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            action: action.into(),
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Storage { .. } | Error::Io(_) => ErrorKind::Io,
            Error::Json(_) | Error::Csv(_) | Error::Toml(_) => ErrorKind::Parse,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let err = Error::not_found(EntityKind::Expense, "123-abc");
        assert_eq!(err.to_string(), "Expense with ID '123-abc' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_message_names_action_and_path() {
        let err = Error::storage(
            "write itineraries to",
            "/tmp/data/itineraries.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.starts_with("Failed to write itineraries to /tmp/data/itineraries.json"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_kinds_are_distinguishable() {
        assert_eq!(Error::validation("bad").kind(), ErrorKind::Validation);
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), ErrorKind::Parse);
    }
}
