//! Error types
//!
//!     Table construction and evaluation fail through separate enums. Table errors are
//!     configuration mistakes found while rules are added. Evaluation errors abort a single
//!     `evaluate` call; there is no partial token list returned alongside them.

/// Error type accepted from match callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a rule table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("a rule named '{0}' already exists in the table")]
    DuplicateName(String),
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("invalid pattern for rule '{name}': {message}")]
    InvalidPattern { name: String, message: String },
}

/// Errors raised while evaluating text against a rule table
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(
        "rule '{rule}' selects capture group {group}, which is missing from the match at line {line}, column {column}"
    )]
    CaptureGroupIndex {
        rule: String,
        group: usize,
        line: usize,
        column: usize,
    },

    #[error("rule '{rule}' matched an empty string at line {line}, column {column}")]
    ZeroWidthMatch {
        rule: String,
        line: usize,
        column: usize,
    },

    #[error("Illegal character at line {line}, column {column}: '{text}'")]
    UnexpectedToken {
        line: usize,
        column: usize,
        text: String,
    },

    /// Raised from a [CustomError] descriptor
    #[error("{message}")]
    Custom {
        kind: String,
        message: String,
        line: usize,
        column: usize,
        text: String,
    },

    /// An error returned by an `on_match` callback, passed through untouched
    #[error(transparent)]
    Callback(BoxError),
}

impl EvaluationError {
    /// Error kind tag. Custom errors report their own tag.
    pub fn kind(&self) -> &str {
        match self {
            EvaluationError::CaptureGroupIndex { .. } => "CaptureGroupIndex",
            EvaluationError::ZeroWidthMatch { .. } => "ZeroWidthMatch",
            EvaluationError::UnexpectedToken { .. } => "UnexpectedToken",
            EvaluationError::Custom { kind, .. } => kind,
            EvaluationError::Callback(_) => "Callback",
        }
    }

    /// Line of the failure, when the error carries a position
    pub fn line(&self) -> Option<usize> {
        match self {
            EvaluationError::CaptureGroupIndex { line, .. }
            | EvaluationError::ZeroWidthMatch { line, .. }
            | EvaluationError::UnexpectedToken { line, .. }
            | EvaluationError::Custom { line, .. } => Some(*line),
            EvaluationError::Callback(_) => None,
        }
    }

    /// Character column of the failure, when the error carries a position
    pub fn column(&self) -> Option<usize> {
        match self {
            EvaluationError::CaptureGroupIndex { column, .. }
            | EvaluationError::ZeroWidthMatch { column, .. }
            | EvaluationError::UnexpectedToken { column, .. }
            | EvaluationError::Custom { column, .. } => Some(*column),
            EvaluationError::Callback(_) => None,
        }
    }
}

/// A user-defined error descriptor attached to a rule or a table.
///
/// The message is a template. `[[LINE]]`, `[[COLUMN]]` and `[[TEXT]]` are replaced with the
/// failing line index, the character column and the unmatched text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomError {
    #[serde(default = "CustomError::default_kind")]
    pub kind: String,
    pub message: String,
}

impl CustomError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        CustomError {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// A descriptor with the default `SyntaxError` kind
    pub fn message(message: impl Into<String>) -> Self {
        CustomError::new(Self::default_kind(), message)
    }

    fn default_kind() -> String {
        "SyntaxError".to_string()
    }

    pub fn render(&self, line: usize, column: usize, text: &str) -> EvaluationError {
        let message = self
            .message
            .replace("[[LINE]]", &line.to_string())
            .replace("[[COLUMN]]", &column.to_string())
            .replace("[[TEXT]]", text);
        EvaluationError::Custom {
            kind: self.kind.clone(),
            message,
            line,
            column,
            text: text.to_string(),
        }
    }
}
