//! Tokens emitted by the evaluator.
//!
//!     A token is the `(type, value, line)` triple produced by a successful rule match. The
//!     triple is the stable contract with consumers: it serializes as
//!     `{"type": .., "value": .., "line": ..}` and nothing else.
//!
//!     Tokens are immutable once produced. Callbacks that want a different token build a new
//!     one with [Token::with_value] or [Token::with_kind] and hand it back through
//!     [MatchAction::Replace](crate::lex::rule::MatchAction::Replace).

use std::fmt;

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    line: usize,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Token {
            kind: kind.into(),
            value: value.into(),
            line,
        }
    }

    /// The token type, normally the name of the rule that produced it
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Zero-based line index where the match started
    pub fn line(&self) -> usize {
        self.line
    }

    /// A copy of this token carrying a different value
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Token {
            kind: self.kind.clone(),
            value: value.into(),
            line: self.line,
        }
    }

    /// A copy of this token carrying a different type
    pub fn with_kind(&self, kind: impl Into<String>) -> Self {
        Token {
            kind: kind.into(),
            value: self.value.clone(),
            line: self.line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) @{}", self.kind, self.value, self.line)
    }
}
