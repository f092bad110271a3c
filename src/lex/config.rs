//! Grammar files
//!
//! `defaults/sblex.default.toml` is embedded into every binary. Grammar files are layered on
//! top of it via [Loader] and deserialized into a [Grammar], which then builds a
//! [RuleTable] plus the [EvalOptions] to evaluate it with.
//!
//! A grammar file looks like:
//!
//! ```toml
//! [settings]
//! max_error_text = 20
//!
//! [fallback_error]
//! kind = "SyntaxError"
//! message = "unexpected '[[TEXT]]' at [[LINE]]:[[COLUMN]]"
//!
//! [[rules]]
//! premade = "whitespace"
//!
//! [[rules]]
//! name = "KW"
//! pattern = "if|else"
//!
//! [[rules]]
//! name = "PAREN"
//! pattern = "\\("
//! depends_on = "KW"
//! error = { kind = "ExpectedParen", message = "expected '(' at [[COLUMN]]" }
//! ```

use crate::lex::error::{CustomError, TableError};
use crate::lex::evaluator::{EvalOptions, Evaluator};
use crate::lex::premades;
use crate::lex::rule::Rule;
use crate::lex::table::RuleTable;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/sblex.default.toml");

/// Errors raised while loading a grammar
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("unknown premade '{0}'")]
    UnknownPremade(String),
    #[error("rule '{0}' needs a `pattern` or `patterns`")]
    MissingPattern(String),
    #[error("a rule entry needs a `name` or a `premade`")]
    MissingName,
    #[error("premade '{0}' can't be combined with other rule keys")]
    PremadeOverride(String),
}

/// A deserialized grammar document
#[derive(Debug, Clone, Deserialize)]
pub struct Grammar {
    pub settings: Settings,
    #[serde(default)]
    pub fallback_error: Option<CustomError>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub max_error_text: usize,
}

/// One `[[rules]]` entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleSpec {
    pub name: Option<String>,
    pub pattern: Option<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    pub capturing_group: Option<usize>,
    pub depends_on: Option<String>,
    #[serde(default)]
    pub skip: bool,
    pub premade: Option<String>,
    pub error: Option<CustomError>,
}

impl RuleSpec {
    /// Rules described by this entry: one for a plain rule, possibly several for a premade
    pub fn to_rules(&self) -> Result<Vec<Rule>, GrammarError> {
        if let Some(premade) = &self.premade {
            if self.name.is_some()
                || self.pattern.is_some()
                || !self.patterns.is_empty()
                || self.capturing_group.is_some()
                || self.depends_on.is_some()
                || self.skip
                || self.error.is_some()
            {
                return Err(GrammarError::PremadeOverride(premade.clone()));
            }
            return premades::by_name(premade)
                .ok_or_else(|| GrammarError::UnknownPremade(premade.clone()));
        }

        let name = self.name.clone().ok_or(GrammarError::MissingName)?;
        let mut sources: Vec<&str> = self.pattern.iter().map(String::as_str).collect();
        sources.extend(self.patterns.iter().map(String::as_str));
        if sources.is_empty() {
            return Err(GrammarError::MissingPattern(name));
        }

        let mut rule = Rule::with_patterns(name, sources)?;
        if let Some(group) = self.capturing_group {
            rule = rule.capture(group);
        }
        if let Some(dependency) = &self.depends_on {
            rule = rule.depends_on(dependency.clone());
        }
        if let Some(error) = &self.error {
            rule = rule.custom_error(error.clone());
        }
        if self.skip {
            rule = rule.skip();
        }
        Ok(vec![rule])
    }
}

impl Grammar {
    pub fn options(&self) -> EvalOptions {
        EvalOptions {
            max_error_text: self.settings.max_error_text,
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::with_options(self.options())
    }

    /// Build the rule table, rules added in file order
    pub fn build_table(&self) -> Result<RuleTable, GrammarError> {
        let mut table = RuleTable::new();
        if let Some(error) = &self.fallback_error {
            table = table.with_fallback_error(error.clone());
        }
        for spec in &self.rules {
            table.extend(spec.to_rules()?)?;
        }
        tracing::debug!(rules = table.len(), "grammar table built");
        Ok(table)
    }
}

/// Stacks grammar sources on the embedded defaults. Later sources override earlier keys.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Grammar file that must exist; `build` fails otherwise
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Grammar file used only when present
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), false)
    }

    /// Grammar given as TOML text
    pub fn with_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Force one dotted key, e.g. `settings.max_error_text`, over every source
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, GrammarError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone: no rules, default settings
pub fn load_defaults() -> Result<Grammar, GrammarError> {
    Loader::new().build()
}
