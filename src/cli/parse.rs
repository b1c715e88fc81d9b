//! Value parsers for clap arguments backed by tally-core types

use chrono::{DateTime, NaiveDate, Utc};
use tally_core::format::OutputFormat;
use tally_core::leaderboard::{SortDirection, SortField, TeamScorePolicy};

pub fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

pub fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse::<SortField>().map_err(|e| e.to_string())
}

pub fn parse_direction(s: &str) -> Result<SortDirection, String> {
    s.parse::<SortDirection>().map_err(|e| e.to_string())
}

pub fn parse_team_score(s: &str) -> Result<TeamScorePolicy, String> {
    s.parse::<TeamScorePolicy>().map_err(|e| e.to_string())
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("expected RFC 3339 timestamp or YYYY-MM-DD, got '{}'", s))
}

/// `key=value` pair for `score set`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2026-03-01").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-03-01T00:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2026-03-01T02:00:00+02:00").unwrap(),
            expected
        );
        assert!(parse_timestamp("March 1st").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("impact=8.5").unwrap(),
            ("impact".to_string(), "8.5".to_string())
        );
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("=3").is_err());
        assert!(parse_assignment("impact").is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(parse_sort_field("total").unwrap(), SortField::TotalScore);
        assert_eq!(parse_direction("asc").unwrap(), SortDirection::Ascending);
        assert_eq!(parse_team_score("sum").unwrap(), TeamScorePolicy::Sum);
        assert!(parse_format("xml").is_err());
    }
}
