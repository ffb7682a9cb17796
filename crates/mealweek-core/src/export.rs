//! Shopping-list rendering and file export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use mealweek_db::models::ShoppingEntry;

/// One exported line: the bare name for a single unit, `"<name> x<qty>"`
/// otherwise.
pub fn render_entry(entry: &ShoppingEntry) -> String {
    if entry.quantity > 1 {
        format!("{} x{}", entry.ingredient, entry.quantity)
    } else {
        entry.ingredient.clone()
    }
}

/// Write one line per entry, in the order given.
pub fn write_shopping_list<W: Write>(writer: &mut W, entries: &[ShoppingEntry]) -> Result<()> {
    for entry in entries {
        writeln!(writer, "{}", render_entry(entry)).context("failed to write shopping list")?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write the shopping list into it.
///
/// Callers guard against an empty plan before getting here; an empty file is
/// never silently produced.
pub fn export_to_file(path: &Path, entries: &[ShoppingEntry]) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("cannot create output file: {}", path.display()))?;
    write_shopping_list(&mut file, entries)
}
