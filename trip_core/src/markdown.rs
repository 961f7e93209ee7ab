//! Markdown rendering of itineraries, packing lists and expenses.

use crate::expense_store::summarize;
use crate::types::{Expense, Itinerary, PackingItem};
use std::collections::BTreeMap;

pub fn itinerary_markdown(itinerary: &Itinerary) -> String {
    let tags = if itinerary.tags.is_empty() {
        "None".to_string()
    } else {
        itinerary.tags.join(", ")
    };

    let lines = vec![
        format!("# {}", itinerary.name),
        String::new(),
        format!("**Itinerary ID:** {}", itinerary.id),
        format!("**Start Date:** {}", itinerary.start_date),
        format!("**End Date:** {}", itinerary.end_date),
        format!("**Favorite:** {}", yes_no(itinerary.is_favorite)),
        format!("**Tags:** {}", tags),
        String::new(),
        "## Description".to_string(),
        String::new(),
        itinerary.description.clone(),
    ];
    finish(lines)
}

/// Unpacked items first, then packed items, then a progress summary
pub fn packing_markdown(itinerary: &Itinerary, items: &[PackingItem]) -> String {
    let mut lines = vec![format!("# Packing List for {}", itinerary.name), String::new()];

    if items.is_empty() {
        lines.push("No packing items found for this itinerary.".to_string());
        return finish(lines);
    }

    let (packed, unpacked): (Vec<&PackingItem>, Vec<&PackingItem>) =
        items.iter().partition(|item| item.packed);

    lines.push("## Unpacked Items".to_string());
    lines.push(String::new());
    if unpacked.is_empty() {
        lines.push("All items have been packed!".to_string());
    } else {
        lines.extend(unpacked.iter().map(|item| checklist_line(item)));
    }
    lines.push(String::new());

    lines.push("## Packed Items".to_string());
    lines.push(String::new());
    if packed.is_empty() {
        lines.push("No items have been packed yet.".to_string());
    } else {
        lines.extend(packed.iter().map(|item| checklist_line(item)));
    }
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!("**Total Items:** {}", items.len()));
    lines.push(format!("**Packed:** {}", packed.len()));
    lines.push(format!("**Unpacked:** {}", unpacked.len()));
    lines.push(format!(
        "**Progress:** {}%",
        progress_percent(packed.len(), items.len())
    ));
    finish(lines)
}

/// One table per category in sorted order, then the overall total
pub fn expenses_markdown(itinerary: &Itinerary, expenses: &[Expense]) -> String {
    let mut lines = vec![format!("# Expenses for {}", itinerary.name), String::new()];

    if expenses.is_empty() {
        lines.push("No expenses recorded for this itinerary.".to_string());
        return finish(lines);
    }

    let mut by_category: BTreeMap<&str, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        by_category
            .entry(expense.category.as_str())
            .or_default()
            .push(expense);
    }
    let subtotals = summarize(expenses);

    for (category, group) in &by_category {
        let subtotal = subtotals.get(*category).copied().unwrap_or_default();
        lines.push(format!("## {} (${:.2})", category, subtotal));
        lines.push(String::new());
        lines.push("| Date | Description | Amount |".to_string());
        lines.push("|------|-------------|--------|".to_string());
        for expense in group {
            lines.push(format!(
                "| {} | {} | ${:.2} |",
                expense.date,
                table_cell(&expense.description),
                expense.amount
            ));
        }
        lines.push(String::new());
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!("**Total Expenses:** ${:.2}", total));
    lines.push(format!("**Number of Expenses:** {}", expenses.len()));
    finish(lines)
}

/// Share of packed items, rounded down; zero for an empty list
pub fn progress_percent(packed: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        packed * 100 / total
    }
}

fn checklist_line(item: &PackingItem) -> String {
    let mark = if item.packed { "x" } else { " " };
    format!(
        "- [{}] {}x {} (ID: {})",
        mark, item.quantity, item.name, item.id
    )
}

// Pipes and newlines would break the table row
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip() -> Itinerary {
        Itinerary {
            id: "trip-1".into(),
            name: "Alps Hike".into(),
            start_date: "2024-07-01".into(),
            end_date: "2024-07-09".into(),
            description: "Hut to hut".into(),
            tags: vec!["hiking".into(), "summer".into()],
            is_favorite: true,
        }
    }

    fn item(id: &str, name: &str, quantity: u32, packed: bool) -> PackingItem {
        PackingItem {
            id: id.into(),
            itinerary_id: "trip-1".into(),
            name: name.into(),
            quantity,
            packed,
        }
    }

    fn expense(category: &str, amount: f64, description: &str) -> Expense {
        Expense {
            id: format!("{}-{}", category, amount),
            itinerary_id: "trip-1".into(),
            amount,
            category: category.into(),
            date: "2024-07-02".into(),
            description: description.into(),
        }
    }

    #[test]
    fn test_packing_sections_and_progress() {
        let items = vec![item("p1", "Boots", 2, false), item("p2", "Map", 1, true)];
        let md = packing_markdown(&trip(), &items);

        let unpacked_at = md.find("## Unpacked Items").unwrap();
        let packed_at = md.find("## Packed Items").unwrap();
        let p1_at = md.find("- [ ] 2x Boots (ID: p1)").unwrap();
        let p2_at = md.find("- [x] 1x Map (ID: p2)").unwrap();

        assert!(unpacked_at < p1_at && p1_at < packed_at);
        assert!(packed_at < p2_at);
        assert!(md.contains("**Total Items:** 2"));
        assert!(md.contains("**Progress:** 50%"));
    }

    #[test]
    fn test_packing_placeholders() {
        let md = packing_markdown(&trip(), &[]);
        assert!(md.contains("No packing items found for this itinerary."));
        assert!(!md.contains("## Summary"));

        let md = packing_markdown(&trip(), &[item("p1", "Boots", 1, true)]);
        assert!(md.contains("All items have been packed!"));
        assert!(md.contains("**Progress:** 100%"));

        let md = packing_markdown(&trip(), &[item("p1", "Boots", 1, false)]);
        assert!(md.contains("No items have been packed yet."));
        assert!(md.contains("**Progress:** 0%"));
    }

    #[test]
    fn test_progress_rounds_down() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn test_expenses_grouped_in_sorted_order() {
        let expenses = vec![
            expense("Travel", 20.0, "Train"),
            expense("Food", 10.0, "Lunch"),
            expense("Food", 5.5, "Coffee | cake"),
        ];
        let md = expenses_markdown(&trip(), &expenses);

        let food_at = md.find("## Food ($15.50)").unwrap();
        let travel_at = md.find("## Travel ($20.00)").unwrap();
        assert!(food_at < travel_at);
        assert!(md.contains("| 2024-07-02 | Lunch | $10.00 |"));
        assert!(md.contains("| 2024-07-02 | Coffee \\| cake | $5.50 |"));
        assert!(md.contains("**Total Expenses:** $35.50"));
        assert!(md.contains("**Number of Expenses:** 3"));
    }

    #[test]
    fn test_no_expenses() {
        let md = expenses_markdown(&trip(), &[]);
        assert!(md.contains("No expenses recorded for this itinerary."));
    }

    #[test]
    fn test_itinerary_markdown() {
        let md = itinerary_markdown(&trip());
        assert!(md.starts_with("# Alps Hike\n"));
        assert!(md.contains("**Itinerary ID:** trip-1"));
        assert!(md.contains("**Tags:** hiking, summer"));
        assert!(md.contains("**Favorite:** Yes"));
        assert!(md.ends_with("Hut to hut\n"));
    }
}
