//! Output format handling for tally
//!
//! - human: readable, aligned output for terminal use
//! - json: stable, machine-readable JSON (camelCase fields)
//! - records: line-oriented records, one fact per line

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TallyError;

/// Output format for tally commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
    /// Line-oriented records
    Records,
}

impl FromStr for OutputFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "records" => Ok(OutputFormat::Records),
            other => Err(TallyError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Records => write!(f, "records"),
        }
    }
}

/// Render a score with a fixed number of decimals
pub fn format_score(score: f64, precision: usize) -> String {
    format!("{:.*}", precision, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(
            "human".parse::<OutputFormat>().unwrap(),
            OutputFormat::Human
        );
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "RECORDS".parse::<OutputFormat>().unwrap(),
            OutputFormat::Records
        );
    }

    #[test]
    fn test_unknown_format() {
        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, TallyError::UnknownFormat(_)));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(80.0, 2), "80.00");
        assert_eq!(format_score(66.666_666, 1), "66.7");
        assert_eq!(format_score(5.6, 0), "6");
    }
}
