//! Terminal presentation of resolution and ranking results.

use estante_core::engine::RankedResult;
use estante_core::models::BookRecord;

/// Print the resolved record's detail line.
pub fn print_detected(record: &BookRecord) {
    let year = record
        .published_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "?".into());
    println!("Detected book: {} — {} ({year})", record.title, record.authors);
    if !record.subtitle.is_empty() {
        println!("               {}", record.subtitle);
    }
}

/// Print the ranking as a fixed-width table.
pub fn print_table(results: &[RankedResult]) {
    if results.is_empty() {
        println!("The catalog holds no other books to compare against.");
        return;
    }

    println!(
        "{:>4}  {:<32} {:<24} {:>5}  {:<20} {:>7}",
        "#", "TITLE", "AUTHORS", "YEAR", "CATEGORIES", "MATCH"
    );
    for result in results {
        let year = result
            .published_year
            .map(|y| y.to_string())
            .unwrap_or_default();
        println!(
            "{:>4}  {:<32} {:<24} {:>5}  {:<20} {:>6.2}%",
            result.rank,
            truncate(&result.title, 32),
            truncate(&result.authors, 24),
            year,
            truncate(&result.categories, 20),
            result.similarity_percent,
        );
    }
}

/// Print the detected record and ranking as one JSON document.
pub fn print_json(record: &BookRecord, results: &[RankedResult]) -> anyhow::Result<()> {
    let doc = serde_json::json!({
        "detected": record,
        "recommendations": results,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
