//! CSV rendering of itineraries, packing lists and expenses.
//!
//! Text fields are quoted only when they contain a comma, quote or line
//! break. Empty text fields are written as `""` so they stay visible.

use crate::types::{Expense, Itinerary, PackingItem};
use crate::Result;

/// Quote a text field for CSV output
pub fn quote_field(field: &str) -> String {
    if field.is_empty() {
        return "\"\"".to_string();
    }

    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header plus one row holding the itinerary
pub fn itinerary_csv(itinerary: &Itinerary) -> Result<Vec<u8>> {
    let row = vec![
        quote_field(&itinerary.id),
        quote_field(&itinerary.name),
        quote_field(&itinerary.start_date),
        quote_field(&itinerary.end_date),
        quote_field(&itinerary.description),
        quote_field(&itinerary.tags.join(";")),
        yes_no(itinerary.is_favorite).to_string(),
    ];
    write_rows(
        &[
            "ID",
            "Name",
            "Start Date",
            "End Date",
            "Description",
            "Tags",
            "Favorite",
        ],
        std::iter::once(row),
    )
}

pub fn packing_csv(items: &[PackingItem]) -> Result<Vec<u8>> {
    let rows = items.iter().map(|item| {
        vec![
            quote_field(&item.id),
            quote_field(&item.name),
            item.quantity.to_string(),
            yes_no(item.packed).to_string(),
        ]
    });
    write_rows(&["ID", "Name", "Quantity", "Packed"], rows)
}

pub fn expenses_csv(expenses: &[Expense]) -> Result<Vec<u8>> {
    let rows = expenses.iter().map(|expense| {
        vec![
            quote_field(&expense.id),
            quote_field(&expense.date),
            quote_field(&expense.category),
            format!("{:.2}", expense.amount),
            quote_field(&expense.description),
        ]
    });
    write_rows(&["ID", "Date", "Category", "Amount", "Description"], rows)
}

/// Write pre-quoted fields; the writer itself must not quote again.
///
/// The csv writer leaves empty fields bare, so quoting happens in
/// `quote_field` and the writer only handles delimiters and line endings.
fn write_rows<I>(header: &[&str], rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    writer.flush()?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(bytes)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
