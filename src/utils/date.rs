use chrono::{Local, NaiveDate};

/// Parse ett datum från en sträng (flexibelt format)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Försök olika format
    let formats = [
        "%Y-%m-%d",    // 2024-01-15
        "%Y/%m/%d",    // 2024/01/15
        "%d-%m-%Y",    // 15-01-2024
        "%d/%m/%Y",    // 15/01/2024
        "%Y%m%d",      // 20240115
    ];

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    None
}

/// Formatera ett datum för visning
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Dagens datum, används i exportfilnamn
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

/// Formatera ett projekts period ("2024-01-15 - 2024-06-30")
pub fn format_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{} - {}", format_date(s), format_date(e)),
        (Some(s), None) => format!("{} -", format_date(s)),
        (None, Some(e)) => format!("- {}", format_date(e)),
        (None, None) => String::new(),
    }
}
