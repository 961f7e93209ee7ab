#![forbid(unsafe_code)]

//! Core record keeping for the trip planner.
//!
//! This crate provides:
//! - Domain types (itineraries, packing items, expenses)
//! - Whole-file JSON repositories with forgiving loads and atomic saves
//! - Stores for each collection
//! - Markdown and CSV export

pub mod types;
pub mod error;
pub mod ids;
pub mod config;
pub mod logging;
pub mod repository;
mod store;
pub mod itinerary_store;
pub mod packing_store;
pub mod expense_store;
pub mod markdown;
pub mod csv_export;
pub mod export;

// Re-export commonly used types
pub use error::{EntityKind, Error, ErrorKind, Result};
pub use types::*;
pub use ids::{Clock, FixedClock, IdGenerator, OsRandom, RandomSource, SeededRandom, SystemClock};
pub use config::{Config, DataPaths};
pub use repository::{JsonFileRepository, LoadReport, MemoryRepository, Repository, SkippedRecord};
pub use itinerary_store::ItineraryStore;
pub use packing_store::PackingStore;
pub use expense_store::ExpenseStore;
pub use export::{ExportEngine, ExportFormat, ExportKind};
