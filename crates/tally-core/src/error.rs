//! Error types and exit codes for tally
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, invalid rubric, rejected score, etc.)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tally CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, validation failure (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Structured validation failures returned by the engine.
///
/// These never leave a partially built value behind: the operation that
/// produced one returns nothing else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid rubric: {}", errors.join("; "))]
    InvalidRubric { errors: Vec<String> },

    #[error("criterion '{key}' is not part of rubric '{rubric_id}'")]
    UnknownCriterion { rubric_id: String, key: String },

    #[error("invalid value for criterion '{key}' from judge '{judge_id}': {reason}")]
    InvalidScoreValue {
        key: String,
        judge_id: String,
        reason: String,
    },

    #[error("judge '{judge_id}' has more than one score record for submission '{submission_id}'")]
    DuplicateJudge {
        submission_id: String,
        judge_id: String,
    },

    #[error("score records span several submissions ('{expected}' and '{found}')")]
    MixedSubmissions { expected: String, found: String },

    #[error("team '{team_id}' appears more than once")]
    DuplicateTeam { team_id: String },

    #[error("leaderboard positions are not contiguous: expected {expected}, found {found}")]
    NonContiguousPositions { expected: u32, found: u32 },

    #[error("negative score {score} for team '{team_id}'")]
    NegativeScore { team_id: String, score: f64 },

    #[error("score {score} for team '{team_id}' is out of range (max {max})")]
    ScoreOutOfRange {
        team_id: String,
        score: f64,
        max: f64,
    },

    #[error("entry at {timestamp} is older than the latest entry at {latest}")]
    OutOfOrderEntry { timestamp: String, latest: String },
}

impl ValidationError {
    /// Stable identifier used in structured output
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidRubric { .. } => "invalid_rubric",
            ValidationError::UnknownCriterion { .. } => "unknown_criterion",
            ValidationError::InvalidScoreValue { .. } => "invalid_score_value",
            ValidationError::DuplicateJudge { .. } => "duplicate_judge",
            ValidationError::MixedSubmissions { .. } => "mixed_submissions",
            ValidationError::DuplicateTeam { .. } => "duplicate_team",
            ValidationError::NonContiguousPositions { .. } => "non_contiguous_positions",
            ValidationError::NegativeScore { .. } => "negative_score",
            ValidationError::ScoreOutOfRange { .. } => "score_out_of_range",
            ValidationError::OutOfOrderEntry { .. } => "out_of_order_entry",
        }
    }
}

/// Errors that can occur during tally operations
#[derive(Error, Debug)]
pub enum TallyError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for TallyError {
    fn from(err: rusqlite::Error) -> Self {
        TallyError::Other(err.to_string())
    }
}

impl TallyError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        TallyError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        TallyError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that already exists
    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        TallyError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        TallyError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        TallyError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TallyError::UnknownFormat(_)
            | TallyError::UsageError(_)
            | TallyError::InvalidValue { .. }
            | TallyError::Unsupported { .. } => ExitCode::Usage,

            TallyError::StoreNotFound { .. }
            | TallyError::NotFound { .. }
            | TallyError::AlreadyExists { .. }
            | TallyError::Validation(_) => ExitCode::Data,

            TallyError::Io(_)
            | TallyError::Yaml(_)
            | TallyError::Json(_)
            | TallyError::Toml(_)
            | TallyError::FailedOperation { .. }
            | TallyError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            TallyError::UnknownFormat(_) => "unknown_format",
            TallyError::UsageError(_) => "usage_error",
            TallyError::InvalidValue { .. } => "invalid_value",
            TallyError::Unsupported { .. } => "unsupported",
            TallyError::StoreNotFound { .. } => "store_not_found",
            TallyError::NotFound { .. } => "not_found",
            TallyError::AlreadyExists { .. } => "already_exists",
            TallyError::Validation(inner) => inner.kind(),
            TallyError::Io(_) => "io_error",
            TallyError::Yaml(_) => "yaml_error",
            TallyError::Json(_) => "json_error",
            TallyError::Toml(_) => "toml_error",
            TallyError::FailedOperation { .. } => "failed_operation",
            TallyError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let TallyError::Validation(ValidationError::InvalidRubric { errors }) = self {
            error_obj["errors"] = serde_json::json!(errors);
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
