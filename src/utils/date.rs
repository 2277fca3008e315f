// Calendar date parsing and the backend's date wire format

use chrono::{Local, NaiveDate};
use anyhow::Result;

/// Parse a date expression entered on the command line.
///
/// Accepts absolute dates (`2026-01-10`) and the relative words
/// `today` and `tomorrow`.
pub fn parse_date_expr(expr: &str) -> Result<NaiveDate> {
    let expr = expr.trim();
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Ok(date);
    }

    let today = Local::now().date_naive();
    match expr.to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .succ_opt()
            .ok_or_else(|| anyhow::anyhow!("Date out of range")),
        _ => anyhow::bail!("Invalid date: '{}'. Use YYYY-MM-DD, 'today' or 'tomorrow'.", expr),
    }
}

/// Format an optional date for display, `-` when absent
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Parse a date sent by the backend. Datetime strings are cut to their date part.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Serde adapter for optional ISO dates (`dateDebut`, `dateFin`)
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_wire_date(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
        }
    }
}
