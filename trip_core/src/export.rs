//! Export of one itinerary's data to Markdown or CSV files.
//!
//! The engine only reads from the stores. Output files are named after the
//! itinerary, made filesystem-safe, and written atomically into the export
//! directory.

use crate::csv_export;
use crate::error::{Error, Result};
use crate::expense_store::ExpenseStore;
use crate::itinerary_store::ItineraryStore;
use crate::markdown;
use crate::packing_store::PackingStore;
use crate::repository::write_atomic;
use crate::types::Itinerary;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Characters replaced by `_` in export file names
const UNSAFE_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', ' '];

/// Output document format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    /// Accepts exactly `md` or `csv`
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(Error::validation(format!(
                "Unknown export format '{}': expected 'md' or 'csv'",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which data of the itinerary to export
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Itinerary,
    Packing,
    Expenses,
}

impl ExportKind {
    /// Suffix appended to the file name
    pub fn file_tag(self) -> &'static str {
        match self {
            ExportKind::Itinerary => "itinerary",
            ExportKind::Packing => "packing",
            ExportKind::Expenses => "expenses",
        }
    }
}

impl FromStr for ExportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "itinerary" => Ok(ExportKind::Itinerary),
            "packing" => Ok(ExportKind::Packing),
            "expenses" => Ok(ExportKind::Expenses),
            other => Err(Error::validation(format!(
                "Unknown export type '{}': expected 'itinerary', 'packing' or 'expenses'",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_tag())
    }
}

/// Replace characters that are unsafe in file names with `_`
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// `<safe name>_<kind>.<ext>`
pub fn export_file_name(itinerary_name: &str, kind: ExportKind, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        safe_filename(itinerary_name),
        kind.file_tag(),
        format.extension()
    )
}

/// Renders store data into export files
pub struct ExportEngine<'a> {
    itineraries: &'a ItineraryStore,
    packing: &'a PackingStore,
    expenses: &'a ExpenseStore,
    export_dir: PathBuf,
}

impl<'a> ExportEngine<'a> {
    pub fn new(
        itineraries: &'a ItineraryStore,
        packing: &'a PackingStore,
        expenses: &'a ExpenseStore,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            itineraries,
            packing,
            expenses,
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Write the export file and return its path
    pub fn export(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        itinerary_id: &str,
    ) -> Result<PathBuf> {
        let (itinerary, contents) = self.render(kind, format, itinerary_id)?;

        std::fs::create_dir_all(&self.export_dir).map_err(|e| {
            Error::storage("create export directory", &self.export_dir, e)
        })?;

        let path = self
            .export_dir
            .join(export_file_name(&itinerary.name, kind, format));
        write_atomic(&path, &contents)
            .map_err(|e| Error::storage(format!("write {} export", kind), &path, e))?;

        tracing::info!(
            "Exported {} of itinerary {} as {} to {:?}",
            kind,
            itinerary.id,
            format,
            path
        );
        Ok(path)
    }

    /// Render the document without touching the export directory
    pub fn render(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        itinerary_id: &str,
    ) -> Result<(Itinerary, Vec<u8>)> {
        let itinerary = self.itineraries.find(itinerary_id)?;

        let contents = match (kind, format) {
            (ExportKind::Itinerary, ExportFormat::Markdown) => {
                markdown::itinerary_markdown(&itinerary).into_bytes()
            }
            (ExportKind::Itinerary, ExportFormat::Csv) => csv_export::itinerary_csv(&itinerary)?,
            (ExportKind::Packing, format) => {
                let items = self.packing.list_items(&itinerary.id)?;
                match format {
                    ExportFormat::Markdown => {
                        markdown::packing_markdown(&itinerary, &items).into_bytes()
                    }
                    ExportFormat::Csv => csv_export::packing_csv(&items)?,
                }
            }
            (ExportKind::Expenses, format) => {
                let expenses = self.expenses.list_expenses(&itinerary.id)?;
                match format {
                    ExportFormat::Markdown => {
                        markdown::expenses_markdown(&itinerary, &expenses).into_bytes()
                    }
                    ExportFormat::Csv => csv_export::expenses_csv(&expenses)?,
                }
            }
        };

        Ok((itinerary, contents))
    }
}
