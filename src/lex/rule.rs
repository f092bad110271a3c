//! Rules
//!
//!     A rule is a named pattern plus its matching policy:
//!
//!     - capture selector: the token value is sub-capture N instead of the whole match
//!     - dependency: the rule is only eligible right after the named rule matched
//!     - callback: inspects every produced token and may keep, replace or suppress it
//!     - custom error: replaces the default error when the rule is the reason a scan failed
//!     - skip: the match consumes input but emits nothing and is invisible to dependencies
//!
//!     Rules are built with [Rule::new] and the builder methods, then added to a
//!     [RuleTable](crate::lex::table::RuleTable).

use crate::lex::error::{BoxError, CustomError, TableError};
use crate::lex::matcher::Pattern;
use crate::lex::token::Token;
use std::fmt;
use std::sync::Arc;

/// What a callback wants done with a freshly produced token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchAction {
    /// Append the token unchanged
    Keep,
    /// Append this token instead
    Replace(Token),
    /// Drop the token. The cursor still advances and the rule still counts as matched.
    Suppress,
}

/// Callback invoked on every match of a rule
pub trait OnMatch: Send + Sync {
    fn on_match(&self, token: &Token) -> Result<MatchAction, BoxError>;
}

impl<F> OnMatch for F
where
    F: Fn(&Token) -> Result<MatchAction, BoxError> + Send + Sync,
{
    fn on_match(&self, token: &Token) -> Result<MatchAction, BoxError> {
        self(token)
    }
}

/// A named tokenizer rule
#[derive(Clone)]
pub struct Rule {
    name: String,
    pattern: Pattern,
    capturing_group: Option<usize>,
    depends_on: Option<String>,
    on_match: Option<Arc<dyn OnMatch>>,
    custom_error: Option<CustomError>,
    skip: bool,
}

impl Rule {
    /// Create a rule from a single regular expression
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, TableError> {
        Self::with_patterns(name, [pattern])
    }

    /// Create a rule from alternative expressions, tried in order
    pub fn with_patterns<I, S>(name: impl Into<String>, patterns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let pattern = Pattern::alternatives(patterns).map_err(|e| TableError::InvalidPattern {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Rule {
            name,
            pattern,
            capturing_group: None,
            depends_on: None,
            on_match: None,
            custom_error: None,
            skip: false,
        })
    }

    /// Use capture group `group` as the token value
    pub fn capture(mut self, group: usize) -> Self {
        self.capturing_group = Some(group);
        self
    }

    /// Only attempt this rule right after `rule` matched on the same line
    pub fn depends_on(mut self, rule: impl Into<String>) -> Self {
        self.depends_on = Some(rule.into());
        self
    }

    pub fn on_match(mut self, callback: impl OnMatch + 'static) -> Self {
        self.on_match = Some(Arc::new(callback));
        self
    }

    pub fn custom_error(mut self, error: CustomError) -> Self {
        self.custom_error = Some(error);
        self
    }

    /// Consume matches without emitting tokens
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn capturing_group(&self) -> Option<usize> {
        self.capturing_group
    }

    pub fn dependency(&self) -> Option<&str> {
        self.depends_on.as_deref()
    }

    pub fn callback(&self) -> Option<&dyn OnMatch> {
        self.on_match.as_deref()
    }

    pub fn error(&self) -> Option<&CustomError> {
        self.custom_error.as_ref()
    }

    pub fn is_skip(&self) -> bool {
        self.skip
    }

    /// Whether the rule may be attempted given the last matched rule name
    pub(crate) fn is_eligible(&self, last_matched: Option<&str>) -> bool {
        match &self.depends_on {
            Some(dependency) => last_matched == Some(dependency.as_str()),
            None => true,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("patterns", &self.pattern.sources())
            .field("capturing_group", &self.capturing_group)
            .field("depends_on", &self.depends_on)
            .field("on_match", &self.on_match.is_some())
            .field("custom_error", &self.custom_error)
            .field("skip", &self.skip)
            .finish()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule(name: '{}', pattern: r'{}')",
            self.name,
            self.pattern.sources().join("' | r'")
        )
    }
}
