//! Itinerary collection: creation, lookup, edits, tags and favorites.

use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use crate::repository::{JsonFileRepository, LoadReport, Repository};
use crate::store::RecordStore;
use crate::types::{
    parse_date, require_text, Itinerary, ItineraryUpdate, NewItinerary, TagOutcome, DATE_FORMAT,
};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Owns the itinerary collection file
pub struct ItineraryStore {
    records: RecordStore<Itinerary>,
    ids: IdGenerator,
}

impl ItineraryStore {
    pub fn new(repo: impl Repository<Itinerary> + 'static, ids: IdGenerator) -> Self {
        Self {
            records: RecordStore::new(repo),
            ids,
        }
    }

    /// Store backed by the JSON file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileRepository::new(path), IdGenerator::default())
    }

    pub fn load_all(&self) -> Result<Vec<Itinerary>> {
        self.records.load_all()
    }

    /// Like `load_all`, also listing the records that could not be loaded
    pub fn load_report(&self) -> Result<LoadReport<Itinerary>> {
        self.records.load_report()
    }

    pub fn save_all(&self, itineraries: &[Itinerary]) -> Result<()> {
        self.records.save_all(itineraries)
    }

    pub fn add(&self, new: NewItinerary) -> Result<Itinerary> {
        let name = require_text("Name", &new.name)?;
        let start_date = checked_date("Start date", &new.start_date)?;
        let end_date = checked_date("End date", &new.end_date)?;
        warn_if_reversed(&name, &start_date, &end_date);

        let mut tags: Vec<String> = Vec::new();
        for tag in new.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }

        let itinerary = Itinerary {
            id: self.ids.itinerary_id(),
            name,
            start_date,
            end_date,
            description: new.description.trim().to_string(),
            tags,
            is_favorite: false,
        };

        let itinerary = self.records.append(itinerary)?;
        tracing::info!("Added itinerary {} ({})", itinerary.id, itinerary.name);
        Ok(itinerary)
    }

    pub fn find(&self, id: &str) -> Result<Itinerary> {
        self.records.find(id)
    }

    pub fn list(&self) -> Result<Vec<Itinerary>> {
        self.load_all()
    }

    pub fn update(&self, id: &str, update: ItineraryUpdate) -> Result<Itinerary> {
        if update.is_empty() {
            return Err(Error::validation("No changes given for itinerary update"));
        }

        let updated = self.records.modify(id, |itinerary| {
            if let Some(name) = &update.name {
                itinerary.name = require_text("Name", name)?;
            }
            if let Some(start) = &update.start_date {
                itinerary.start_date = checked_date("Start date", start)?;
            }
            if let Some(end) = &update.end_date {
                itinerary.end_date = checked_date("End date", end)?;
            }
            if update.start_date.is_some() || update.end_date.is_some() {
                warn_if_reversed(&itinerary.name, &itinerary.start_date, &itinerary.end_date);
            }
            if let Some(description) = &update.description {
                itinerary.description = description.trim().to_string();
            }
            Ok((itinerary.clone(), true))
        })?;

        tracing::info!("Updated itinerary {}", id);
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<Itinerary> {
        let removed = self.records.remove(id)?;
        tracing::info!("Deleted itinerary {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    /// Append `tag`; adding a tag that is already present changes nothing
    pub fn add_tag(&self, id: &str, tag: &str) -> Result<TagOutcome> {
        let tag = require_text("Tag", tag)?;
        let outcome = self.records.modify(id, |itinerary| {
            if itinerary.has_tag(&tag) {
                return Ok((TagOutcome::AlreadyExists, false));
            }
            itinerary.tags.push(tag.clone());
            Ok((TagOutcome::Added, true))
        })?;

        tracing::info!("{} on itinerary {}", outcome.describe(&tag), id);
        Ok(outcome)
    }

    pub fn remove_tag(&self, id: &str, tag: &str) -> Result<TagOutcome> {
        let tag = tag.trim();
        let outcome = self.records.modify(id, |itinerary| {
            let before = itinerary.tags.len();
            itinerary.tags.retain(|t| !t.eq_ignore_ascii_case(tag));
            if itinerary.tags.len() == before {
                Ok((TagOutcome::DoesNotExist, false))
            } else {
                Ok((TagOutcome::Removed, true))
            }
        })?;

        tracing::info!("{} on itinerary {}", outcome.describe(tag), id);
        Ok(outcome)
    }

    pub fn set_favorite(&self, id: &str, favorite: bool) -> Result<Itinerary> {
        self.records.modify(id, |itinerary| {
            let changed = itinerary.is_favorite != favorite;
            itinerary.is_favorite = favorite;
            Ok((itinerary.clone(), changed))
        })
    }

    /// Case-insensitive substring match on the name
    pub fn search_by_name(&self, query: &str) -> Result<Vec<Itinerary>> {
        let query = query.to_lowercase();
        self.records
            .filter(|itinerary| itinerary.name.to_lowercase().contains(&query))
    }

    /// Case-insensitive substring match on the name or description
    pub fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Itinerary>> {
        let keyword = keyword.to_lowercase();
        self.records.filter(|itinerary| {
            itinerary.name.to_lowercase().contains(&keyword)
                || itinerary.description.to_lowercase().contains(&keyword)
        })
    }

    pub fn list_by_tag(&self, tag: &str) -> Result<Vec<Itinerary>> {
        let tag = tag.trim();
        self.records.filter(|itinerary| itinerary.has_tag(tag))
    }

    pub fn list_favorites(&self) -> Result<Vec<Itinerary>> {
        self.records.filter(|itinerary| itinerary.is_favorite)
    }
}

/// Supplied dates must look like `YYYY-MM-DD`; stored dates are never re-checked
fn checked_date(field: &str, value: &str) -> Result<String> {
    parse_date(field, value)?;
    Ok(value.trim().to_string())
}

fn warn_if_reversed(name: &str, start: &str, end: &str) {
    if let (Ok(start_date), Ok(end_date)) = (
        NaiveDate::parse_from_str(start, DATE_FORMAT),
        NaiveDate::parse_from_str(end, DATE_FORMAT),
    ) {
        if end_date < start_date {
            tracing::warn!(
                "Itinerary '{}' ends ({}) before it starts ({})",
                name,
                end,
                start
            );
        }
    }
}
