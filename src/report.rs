//! Console and file output for flattened summaries

use crate::{FlatSummary, FlightError};
use std::path::Path;
use tracing::info;

const HEADERS: [&str; 5] = ["(index)", "airline", "flightNumber", "seatClass", "price"];

/// Pretty JSON array with camelCase keys
pub fn to_json_pretty(summaries: &[FlatSummary]) -> Result<String, FlightError> {
    Ok(serde_json::to_string_pretty(summaries)?)
}

/// Write the summaries to `path` as pretty JSON
pub fn write_json(path: impl AsRef<Path>, summaries: &[FlatSummary]) -> Result<(), FlightError> {
    let path = path.as_ref();
    std::fs::write(path, to_json_pretty(summaries)?)?;
    info!(path = %path.display(), count = summaries.len(), "Wrote summaries");
    Ok(())
}

/// Boxed text table, one row per summary, columns sized to their content
pub fn render_table(summaries: &[FlatSummary]) -> String {
    let rows: Vec<[String; 5]> = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            [
                i.to_string(),
                s.airline.clone(),
                s.flight_number.clone(),
                s.seat_class.clone(),
                s.price.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |left: char, mid: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
    };
    let line = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!(" {:<width$} ", cell, width = *w))
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let mut table = border('┌', '┬', '┐');
    table.push_str(&line(&HEADERS[..]));
    table.push_str(&border('├', '┼', '┤'));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        table.push_str(&line(&cells[..]));
    }
    table.push_str(&border('└', '┴', '┘'));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(airline: &str, number: &str, cabin: &str, price: &str) -> FlatSummary {
        FlatSummary {
            airline: airline.to_string(),
            flight_number: number.to_string(),
            seat_class: cabin.to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[
            summary("AA", "100", "Y", "250 USD"),
            summary("B6", "2315", "N/A", "1099.5 USD"),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "│ (index) │ airline │ flightNumber │ seatClass │ price      │");
        assert_eq!(lines[3], "│ 0       │ AA      │ 100          │ Y         │ 250 USD    │");
        assert_eq!(lines[4], "│ 1       │ B6      │ 2315         │ N/A       │ 1099.5 USD │");
        assert!(lines[0].starts_with('┌') && lines[5].starts_with('└'));
    }

    #[test]
    fn test_render_empty_table() {
        let table = render_table(&[]);
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&[summary("AA", "100", "Y", "250 USD")]).unwrap();
        assert!(json.contains("\"flightNumber\": \"100\""));
        assert!(json.contains("\"seatClass\": \"Y\""));
        assert_eq!(to_json_pretty(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_json() {
        let path = std::env::temp_dir().join(format!("gds-flights-{}.json", std::process::id()));
        write_json(&path, &[summary("UA", "1", "J", "10 EUR")]).unwrap();

        let written: Vec<FlatSummary> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, vec![summary("UA", "1", "J", "10 EUR")]);
        std::fs::remove_file(&path).unwrap();
    }
}
