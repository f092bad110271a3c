//! Rule Table
//!
//! Ordered collection of rules. Insertion order is priority order: during evaluation the
//! first rule (by insertion) whose pattern matches at the cursor wins, even when a later rule
//! would consume more text. There is no longest-match policy.

use crate::lex::error::{CustomError, EvaluationError, TableError};
use crate::lex::evaluator::Evaluator;
use crate::lex::rule::Rule;
use crate::lex::token::Token;
use std::collections::HashMap;

/// Ordered set of named rules
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    index: HashMap<String, usize>,
    fallback_error: Option<CustomError>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `error` instead of the built-in unexpected-token error when nothing matches
    pub fn with_fallback_error(mut self, error: CustomError) -> Self {
        self.fallback_error = Some(error);
        self
    }

    /// Append a rule at the lowest priority.
    ///
    /// Fails if the name is taken, or if the rule depends on a rule that is not in the
    /// table yet. Dependencies must therefore be added first.
    pub fn add(&mut self, rule: Rule) -> Result<(), TableError> {
        if self.index.contains_key(rule.name()) {
            return Err(TableError::DuplicateName(rule.name().to_string()));
        }
        if let Some(dependency) = rule.dependency() {
            self.get(dependency)?;
        }

        tracing::debug!(rule = rule.name(), priority = self.rules.len(), "adding rule");
        self.index.insert(rule.name().to_string(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Add several rules in order, stopping at the first failure
    pub fn extend<I>(&mut self, rules: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = Rule>,
    {
        for rule in rules {
            self.add(rule)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Rule, TableError> {
        self.index
            .get(name)
            .map(|&i| &self.rules[i])
            .ok_or_else(|| TableError::UnknownRule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Rules in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Rule names in priority order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn fallback_error(&self) -> Option<&CustomError> {
        self.fallback_error.as_ref()
    }

    /// Tokenize `text` with the default evaluator
    pub fn evaluate(&self, text: &str) -> Result<Vec<Token>, EvaluationError> {
        Evaluator::new().evaluate(self, text)
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
