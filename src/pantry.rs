use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::shopping::names_match;

const NAME_COL: &str = "name";
const QUANTITY_COL: &str = "quantity";
const UNIT_COL: &str = "unit";
const CATEGORY_COL: &str = "category";
const EXPIRY_COLS: &[&str] = &["expiry_date", "expiry"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PantryItem {
    pub name: String,
    pub quantity: Option<f32>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// `YYYY-MM-DD`, optionally followed by a time (`2024-05-01T00:00:00`), which is
/// dropped.
fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let (date_part, rest) = match (trimmed.get(..10), trimmed.get(10..)) {
        (Some(date), Some(rest)) => (date, rest),
        _ => (trimmed, ""),
    };
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Loads a pantry export. Only the `name` column is required; rows with a blank
/// name are skipped and unparsable quantities are read as missing.
pub fn load_pantry_csv(csv_path: &Path) -> Result<Vec<PantryItem>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Pantry CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open pantry CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let name_idx =
        column(NAME_COL).ok_or_else(|| anyhow::anyhow!("Column '{}' not found", NAME_COL))?;
    let quantity_idx = column(QUANTITY_COL);
    let unit_idx = column(UNIT_COL);
    let category_idx = column(CATEGORY_COL);
    let expiry_idx = EXPIRY_COLS.iter().find_map(|name| column(*name));

    let mut items = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("Failed to read pantry record at row index {}", row_index))?;

        let Some(name) = non_empty(record.get(name_idx)) else {
            continue;
        };

        items.push(PantryItem {
            name,
            quantity: quantity_idx
                .and_then(|idx| record.get(idx))
                .and_then(|s| s.trim().parse::<f32>().ok()),
            unit: unit_idx.and_then(|idx| non_empty(record.get(idx))),
            category: category_idx.and_then(|idx| non_empty(record.get(idx))),
            expiry_date: expiry_idx
                .and_then(|idx| non_empty(record.get(idx)))
                .and_then(|raw| {
                    let parsed = parse_expiry(&raw);
                    if parsed.is_none() {
                        warn!(row = row_index, value = %raw, "Ignoring unreadable expiry date");
                    }
                    parsed
                }),
        });
    }

    Ok(items)
}

/// Writes items back out with a header row, in the layout `load_pantry_csv` reads.
pub fn save_pantry_csv(csv_path: &Path, items: &[PantryItem]) -> Result<()> {
    let mut writer = Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create pantry CSV file at {:?}", csv_path))?;
    for item in items {
        writer
            .serialize(item)
            .with_context(|| format!("Failed to write pantry item '{}'", item.name))?;
    }
    writer.flush().context("Failed to flush pantry CSV file")?;
    Ok(())
}

/// Items with an expiry date on or before `today + days`, soonest first.
/// Already expired items are included; items without a date never are.
pub fn expiring_within(items: &[PantryItem], today: NaiveDate, days: u32) -> Vec<PantryItem> {
    let cutoff = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);

    let mut expiring: Vec<PantryItem> = items
        .iter()
        .filter(|item| item.expiry_date.is_some_and(|date| date <= cutoff))
        .cloned()
        .collect();
    expiring.sort_by_key(|item| item.expiry_date);
    expiring
}

/// Splits the pantry into what is left after cooking and what the recipe used
/// up. An item is used when its name and a recipe ingredient match partially
/// in either direction, as in the shopping list.
pub fn consume_ingredients<S: AsRef<str>>(
    items: &[PantryItem],
    recipe_ingredients: &[S],
) -> (Vec<PantryItem>, Vec<PantryItem>) {
    let (removed, remaining): (Vec<PantryItem>, Vec<PantryItem>) =
        items.iter().cloned().partition(|item| {
            recipe_ingredients
                .iter()
                .any(|ingredient| names_match(ingredient.as_ref(), &item.name))
        });
    (remaining, removed)
}

/// Resolves pantry items into the ingredient list handed to the generator:
/// trimmed, blanks dropped, first spelling kept for case-insensitive repeats.
pub fn pantry_ingredient_names(items: &[PantryItem]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for item in items {
        let name = item.name.trim();
        if name.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn item(name: &str) -> PantryItem {
        PantryItem {
            name: name.to_string(),
            quantity: None,
            unit: None,
            category: None,
            expiry_date: None,
        }
    }

    fn dated(name: &str, date: &str) -> PantryItem {
        PantryItem {
            expiry_date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            ..item(name)
        }
    }

    #[test]
    fn test_load_pantry_csv_success() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Name,Quantity,Unit,Category")?;
        writeln!(file, "Chicken breast,2,pieces,meat")?;
        writeln!(file, "Rice,,g,")?;
        writeln!(file, " ,1,kg,")?;
        writeln!(file, "Butter,lots,,dairy")?;
        file.flush()?;

        let items = load_pantry_csv(file.path())?;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Chicken breast");
        assert_eq!(items[0].quantity, Some(2.0));
        assert_eq!(items[0].unit.as_deref(), Some("pieces"));
        assert_eq!(items[1].quantity, None);
        assert_eq!(items[1].category, None);
        assert_eq!(items[2].quantity, None);
        assert_eq!(items[2].category.as_deref(), Some("dairy"));
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_name_only() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "name")?;
        writeln!(file, "egg")?;
        file.flush()?;

        let items = load_pantry_csv(file.path())?;
        assert_eq!(items, vec![item("egg")]);
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_missing_name_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "item,quantity")?;
        writeln!(file, "egg,2")?;
        file.flush()?;

        let result = load_pantry_csv(file.path());
        assert!(result.unwrap_err().to_string().contains("Column 'name' not found"));
        Ok(())
    }

    #[test]
    fn test_load_pantry_csv_file_not_found() {
        let result = load_pantry_csv(Path::new("this_pantry_does_not_exist.csv"));
        assert!(result.unwrap_err().to_string().contains("Pantry CSV file not found"));
    }

    #[test]
    fn test_pantry_ingredient_names_dedupes() {
        let items = vec![item(" Egg "), item("rice"), item("egg"), item("  "), item("RICE")];
        assert_eq!(pantry_ingredient_names(&items), vec!["Egg", "rice"]);
    }

    #[test]
    fn test_load_pantry_csv_reads_expiry_dates() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "name,expiry_date")?;
        writeln!(file, "milk,2024-05-03")?;
        writeln!(file, "yogurt,2024-05-04T00:00:00")?;
        writeln!(file, "rice,")?;
        writeln!(file, "eggs,next week")?;
        file.flush()?;

        let items = load_pantry_csv(file.path())?;
        assert_eq!(items[0], dated("milk", "2024-05-03"));
        assert_eq!(items[1], dated("yogurt", "2024-05-04"));
        assert_eq!(items[2].expiry_date, None);
        assert_eq!(items[3].expiry_date, None);
        Ok(())
    }

    #[test]
    fn test_expiring_within_sorts_and_skips_undated() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let items = vec![
            dated("cheese", "2024-05-20"),
            dated("milk", "2024-05-05"),
            item("rice"),
            dated("bread", "2024-04-28"),
            dated("yogurt", "2024-05-08"),
        ];

        let names: Vec<String> = expiring_within(&items, today, 7)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["bread", "milk", "yogurt"]);
        assert!(expiring_within(&items, today, 0).iter().all(|i| i.name == "bread"));
    }

    #[test]
    fn test_consume_ingredients_uses_partial_matches() {
        let items = vec![item("Chicken breast"), item("butter"), item("rice"), item("tomato")];
        let (remaining, removed) =
            consume_ingredients(&items, &["chicken", "Butter", "tomato sauce"]);

        let removed: Vec<&str> = removed.iter().map(|i| i.name.as_str()).collect();
        let remaining: Vec<&str> = remaining.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(removed, vec!["Chicken breast", "butter", "tomato"]);
        assert_eq!(remaining, vec!["rice"]);
    }

    #[test]
    fn test_saved_pantry_loads_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pantry.csv");
        let items = vec![
            PantryItem {
                quantity: Some(2.0),
                unit: Some("l".to_string()),
                category: Some("dairy".to_string()),
                ..dated("milk", "2024-05-03")
            },
            item("rice"),
        ];

        save_pantry_csv(&path, &items)?;
        assert_eq!(load_pantry_csv(&path)?, items);
        Ok(())
    }
}
