//! Core domain types for the trip planner.
//!
//! This module defines the persisted records and the inputs used to create
//! or edit them:
//! - Itineraries with tags and a favorite flag
//! - Packing items attached to an itinerary
//! - Expenses attached to an itinerary

use crate::error::{EntityKind, Error, Result};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Date format used by every stored date field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Record Trait
// ============================================================================

/// A record persisted in a collection file
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Check the invariants a stored record must hold
    fn validate(&self) -> Result<()> {
        if self.id().trim().is_empty() {
            return Err(Error::validation(format!(
                "{} record has an empty ID",
                Self::KIND
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Itinerary
// ============================================================================

/// A planned trip
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Itinerary {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Record for Itinerary {
    const KIND: EntityKind = EntityKind::Itinerary;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating an itinerary
#[derive(Clone, Debug, Default)]
pub struct NewItinerary {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Partial edit of an itinerary; `None` fields are left unchanged
#[derive(Clone, Debug, Default)]
pub struct ItineraryUpdate {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl ItineraryUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
    }
}

/// Result of a tag mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagOutcome {
    Added,
    AlreadyExists,
    Removed,
    DoesNotExist,
}

impl TagOutcome {
    pub fn describe(self, tag: &str) -> String {
        match self {
            TagOutcome::Added => format!("Tag '{}' added", tag),
            TagOutcome::AlreadyExists => format!("Tag '{}' already exists", tag),
            TagOutcome::Removed => format!("Tag '{}' removed", tag),
            TagOutcome::DoesNotExist => format!("Tag '{}' does not exist", tag),
        }
    }
}

// ============================================================================
// Packing Item
// ============================================================================

fn default_quantity() -> u32 {
    1
}

/// An item on an itinerary's packing list
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PackingItem {
    pub id: String,
    pub itinerary_id: String,
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub packed: bool,
}

impl Record for PackingItem {
    const KIND: EntityKind = EntityKind::PackingItem;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("Packing item record has an empty ID"));
        }
        validate_quantity(self.quantity)
    }
}

pub(crate) fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(Error::validation("Quantity must be greater than zero"));
    }
    Ok(())
}

// ============================================================================
// Expense
// ============================================================================

/// Money spent during an itinerary
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: String,
    pub itinerary_id: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl Record for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::validation("Expense record has an empty ID"));
        }
        validate_amount(self.amount)
    }
}

pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::validation(format!(
            "Amount must be a positive number, got {}",
            amount
        )));
    }
    Ok(())
}

/// Input for recording an expense
#[derive(Clone, Debug, Default)]
pub struct NewExpense {
    pub itinerary_id: String,
    pub amount: f64,
    pub category: String,
    /// Defaults to today when not given
    pub date: Option<String>,
    pub description: String,
}

// ============================================================================
// Shared validation
// ============================================================================

/// Parse a `YYYY-MM-DD` date, naming the field on failure
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        Error::validation(format!(
            "{} must be in YYYY-MM-DD format, got '{}'",
            field, value
        ))
    })
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
