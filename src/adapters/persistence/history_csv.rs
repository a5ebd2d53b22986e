//! CSV export of the session trend. Uses the `csv` crate for safe serialization.

use crate::domain::TrendPoint;

/// Convert trend points to a CSV string with a header row.
///
/// Format: `Date,Warnings,UnfocusedMinutes`, one row per session, oldest first.
pub fn trend_to_csv(points: &[TrendPoint]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(["Date", "Warnings", "UnfocusedMinutes"])?;
    for p in points {
        let warnings = p.warnings.to_string();
        let minutes = p.unfocused_minutes.to_string();
        wtr.write_record([p.date.as_str(), warnings.as_str(), minutes.as_str()])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_trend_has_header_only() {
        let csv = trend_to_csv(&[]).unwrap();
        assert_eq!(csv, "Date,Warnings,UnfocusedMinutes\n");
    }

    #[test]
    fn test_rows() {
        let points = vec![
            TrendPoint {
                date: "2026-01-02".to_string(),
                warnings: 3,
                unfocused_minutes: 12,
            },
            TrendPoint {
                date: "2026-01-03".to_string(),
                warnings: 0,
                unfocused_minutes: 0,
            },
        ];
        let csv = trend_to_csv(&points).unwrap();
        assert_eq!(
            csv.lines().collect::<Vec<_>>(),
            vec![
                "Date,Warnings,UnfocusedMinutes",
                "2026-01-02,3,12",
                "2026-01-03,0,0"
            ]
        );
    }
}
