//! Evaluator
//!
//!     Scans input line by line. On each line the cursor starts at column 0 with no previous
//!     match, then repeatedly:
//!
//!     1. walks the rules in priority order, skipping rules whose dependency is not the last
//!        matched rule, and attempts an anchored match at the cursor;
//!     2. on the first match, builds the token (whole match or selected capture), runs the
//!        rule's callback, appends the token unless suppressed, advances the cursor and
//!        records the rule as the last match;
//!     3. when nothing matches, raises an error and abandons the whole call.
//!
//!     Skip rules advance the cursor without emitting a token and without touching the last
//!     match, so they can sit between a rule and its dependent.
//!
//! Error selection
//!
//!     When no rule matches, the error comes from the first of:
//!     - a dependent rule that was eligible and attempted, and carries a custom error;
//!     - a rule skipped because its dependency was not satisfied, with a custom error;
//!     - the table's fallback error;
//!     - the default unexpected-token error.

use crate::lex::error::{CustomError, EvaluationError};
use crate::lex::rule::{MatchAction, Rule};
use crate::lex::table::RuleTable;
use crate::lex::token::Token;

/// Default number of characters of unmatched text quoted in errors
pub const DEFAULT_MAX_ERROR_TEXT: usize = 40;

/// Evaluation knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EvalOptions {
    /// Unmatched text longer than this is cut and suffixed with `...` in errors
    pub max_error_text: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_error_text: DEFAULT_MAX_ERROR_TEXT,
        }
    }
}

/// Stateless tokenizer driver. All per-call state lives in a cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

/// Per-call scan position
#[derive(Debug)]
struct Cursor<'t> {
    line: usize,
    offset: usize,
    last_matched: Option<&'t str>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Evaluator { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Tokenize `text` against `table`
    pub fn evaluate(&self, table: &RuleTable, text: &str) -> Result<Vec<Token>, EvaluationError> {
        tracing::debug!(rules = table.len(), bytes = text.len(), "evaluating");

        let mut tokens = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let mut cursor = Cursor {
                line: line_no,
                offset: 0,
                last_matched: None,
            };
            while cursor.offset < line.len() {
                self.step(table, line, &mut cursor, &mut tokens)?;
            }
        }

        tracing::debug!(tokens = tokens.len(), "evaluation finished");
        Ok(tokens)
    }

    /// Consume one match at the cursor
    fn step<'t>(
        &self,
        table: &'t RuleTable,
        line: &str,
        cursor: &mut Cursor<'t>,
        tokens: &mut Vec<Token>,
    ) -> Result<(), EvaluationError> {
        for rule in table {
            if !rule.is_eligible(cursor.last_matched) {
                continue;
            }
            let Some(found) = rule.pattern().try_match(line, cursor.offset) else {
                continue;
            };

            let column = char_column(line, cursor.offset);
            if found.is_empty() {
                return Err(EvaluationError::ZeroWidthMatch {
                    rule: rule.name().to_string(),
                    line: cursor.line,
                    column,
                });
            }

            tracing::trace!(
                rule = rule.name(),
                line = cursor.line,
                column,
                text = %found.text,
                "matched"
            );
            cursor.offset = found.span.end;

            if rule.is_skip() {
                return Ok(());
            }

            let group = rule.capturing_group().unwrap_or(0);
            let value = found
                .group(group)
                .ok_or_else(|| EvaluationError::CaptureGroupIndex {
                    rule: rule.name().to_string(),
                    group,
                    line: cursor.line,
                    column,
                })?;
            let token = Token::new(rule.name(), value, cursor.line);

            let action = match rule.callback() {
                Some(callback) => callback
                    .on_match(&token)
                    .map_err(EvaluationError::Callback)?,
                None => MatchAction::Keep,
            };
            match action {
                MatchAction::Keep => tokens.push(token),
                MatchAction::Replace(replacement) => tokens.push(replacement),
                MatchAction::Suppress => {
                    tracing::trace!(rule = rule.name(), "token suppressed by callback")
                }
            }

            cursor.last_matched = Some(rule.name());
            return Ok(());
        }

        Err(self.no_match_error(table, line, cursor))
    }

    fn no_match_error(
        &self,
        table: &RuleTable,
        line: &str,
        cursor: &Cursor<'_>,
    ) -> EvaluationError {
        let column = char_column(line, cursor.offset);
        let text = truncate(&line[cursor.offset..], self.options.max_error_text);
        tracing::debug!(line = cursor.line, column, text = %text, "no rule matched");

        let descriptor = self
            .failed_dependent(table, cursor.last_matched)
            .or_else(|| self.gated_dependent(table, cursor.last_matched))
            .or_else(|| table.fallback_error());

        match descriptor {
            Some(custom) => custom.render(cursor.line, column, &text),
            None => EvaluationError::UnexpectedToken {
                line: cursor.line,
                column,
                text,
            },
        }
    }

    /// A dependent rule whose dependency was satisfied but whose pattern failed
    fn failed_dependent<'t>(
        &self,
        table: &'t RuleTable,
        last_matched: Option<&str>,
    ) -> Option<&'t CustomError> {
        table
            .iter()
            .filter(|rule| rule.dependency().is_some() && rule.is_eligible(last_matched))
            .find_map(Rule::error)
    }

    /// A dependent rule that was never attempted because its dependency was not satisfied
    fn gated_dependent<'t>(
        &self,
        table: &'t RuleTable,
        last_matched: Option<&str>,
    ) -> Option<&'t CustomError> {
        table
            .iter()
            .filter(|rule| !rule.is_eligible(last_matched))
            .find_map(Rule::error)
    }
}

/// Tokenize `text` against `table` with default options
pub fn evaluate(table: &RuleTable, text: &str) -> Result<Vec<Token>, EvaluationError> {
    Evaluator::new().evaluate(table, text)
}

fn char_column(line: &str, offset: usize) -> usize {
    line[..offset].chars().count()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::error::BoxError;

    fn table(rules: Vec<Rule>) -> RuleTable {
        let mut table = RuleTable::new();
        table.extend(rules).unwrap();
        table
    }

    fn rule(name: &str, pattern: &str) -> Rule {
        Rule::new(name, pattern).unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::kind).collect()
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let table = table(vec![rule("SHORT", "ab"), rule("LONG", "abc"), rule("C", "c")]);
        let tokens = table.evaluate("abc").unwrap();
        assert_eq!(kinds(&tokens), vec!["SHORT", "C"]);
    }

    #[test]
    fn test_lines_are_numbered_from_zero() {
        let table = table(vec![rule("WORD", "[a-z]+"), rule("WS", " +").skip()]);
        let tokens = table.evaluate("one two\nthree\n").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("WORD", "one", 0),
                Token::new("WORD", "two", 0),
                Token::new("WORD", "three", 1),
            ]
        );
    }

    #[test]
    fn test_empty_lines_and_crlf() {
        let table = table(vec![rule("WORD", "[a-z]+")]);
        let tokens = table.evaluate("a\r\n\r\nb").unwrap();
        assert_eq!(tokens, vec![Token::new("WORD", "a", 0), Token::new("WORD", "b", 2)]);
    }

    #[test]
    fn test_empty_input() {
        let table = table(vec![rule("WORD", "[a-z]+")]);
        assert!(table.evaluate("").unwrap().is_empty());
    }

    #[test]
    fn test_capture_group_value() {
        let table = table(vec![rule("STR", r#""([^"]*)""#).capture(1)]);
        let tokens = table.evaluate(r#""hi there""#).unwrap();
        assert_eq!(tokens, vec![Token::new("STR", "hi there", 0)]);
    }

    #[test]
    fn test_capture_group_out_of_range() {
        let table = table(vec![rule("X", "(x)").capture(2)]);
        let err = table.evaluate("x").unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::CaptureGroupIndex { ref rule, group: 2, line: 0, column: 0 } if rule == "X"
        ));
    }

    #[test]
    fn test_capture_group_not_participating() {
        let table = table(vec![rule("X", "(x)|(y)").capture(2)]);
        let err = table.evaluate("x").unwrap_err();
        assert!(matches!(err, EvaluationError::CaptureGroupIndex { group: 2, .. }));
    }

    #[test]
    fn test_zero_width_match_rejected() {
        let table = table(vec![rule("MAYBE", "a*"), rule("B", "b")]);
        let err = table.evaluate("b").unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::ZeroWidthMatch { ref rule, line: 0, column: 0 } if rule == "MAYBE"
        ));
    }

    #[test]
    fn test_dependency_resets_per_line() {
        let table = table(vec![rule("KW", "if"), rule("PAREN", r"\(").depends_on("KW")]);
        assert!(table.evaluate("if(").is_ok());
        let err = table.evaluate("if\n(").unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::UnexpectedToken { line: 1, column: 0, .. }
        ));
    }

    #[test]
    fn test_dependency_chain() {
        let table = table(vec![
            rule("A", "a"),
            rule("B", "b").depends_on("A"),
            rule("C", "c").depends_on("B"),
        ]);
        assert_eq!(kinds(&table.evaluate("abcab").unwrap()), vec!["A", "B", "C", "A", "B"]);
        assert!(table.evaluate("ac").is_err());
    }

    #[test]
    fn test_skip_rules_are_transparent_to_dependencies() {
        let table = table(vec![
            rule("WS", r"\s+").skip(),
            rule("VAR", "var"),
            rule("NAME", "[a-z]+").depends_on("VAR"),
        ]);
        let tokens = table.evaluate("var   x").unwrap();
        assert_eq!(tokens, vec![Token::new("VAR", "var", 0), Token::new("NAME", "x", 0)]);
    }

    #[test]
    fn test_callback_replace_and_suppress() {
        let table = table(vec![
            rule("NUM", "[0-9]+").on_match(|token: &Token| -> Result<MatchAction, BoxError> {
                let doubled = token.value().parse::<u64>()? * 2;
                Ok(MatchAction::Replace(token.with_value(doubled.to_string())))
            }),
            rule("COMMA", ",").on_match(|_: &Token| -> Result<MatchAction, BoxError> {
                Ok(MatchAction::Suppress)
            }),
        ]);
        let tokens = table.evaluate("1,20,3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("NUM", "2", 0),
                Token::new("NUM", "40", 0),
                Token::new("NUM", "6", 0),
            ]
        );
    }

    #[test]
    fn test_suppressed_match_still_satisfies_dependency() {
        let table = table(vec![
            rule("OPEN", r"\(").on_match(|_: &Token| -> Result<MatchAction, BoxError> {
                Ok(MatchAction::Suppress)
            }),
            rule("INNER", "[a-z]+").depends_on("OPEN"),
        ]);
        let tokens = table.evaluate("(abc").unwrap();
        assert_eq!(tokens, vec![Token::new("INNER", "abc", 0)]);
    }

    #[test]
    fn test_callback_error_aborts() {
        let table = table(vec![rule("NUM", "[0-9]+").on_match(
            |token: &Token| -> Result<MatchAction, BoxError> {
                let _: u8 = token.value().parse()?;
                Ok(MatchAction::Keep)
            },
        )]);
        let err = table.evaluate("1000").unwrap_err();
        match err {
            EvaluationError::Callback(inner) => {
                assert!(inner.downcast_ref::<std::num::ParseIntError>().is_some())
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failed_dependent_supplies_custom_error() {
        let table = table(vec![
            rule("WS", " +").skip(),
            rule("VAR", "var"),
            rule("NAME", "[a-z]+")
                .depends_on("VAR")
                .custom_error(CustomError::new(
                    "ExpectedName",
                    "line [[LINE]]: expected a name, got '[[TEXT]]'",
                )),
        ]);
        let err = table.evaluate("var 9").unwrap_err();
        assert_eq!(err.kind(), "ExpectedName");
        assert_eq!(err.to_string(), "line 0: expected a name, got '9'");
        assert_eq!(err.column(), Some(4));
    }

    #[test]
    fn test_gated_rule_supplies_custom_error() {
        let table = table(vec![
            rule("KW", "if"),
            rule("PAREN", r"\(")
                .depends_on("KW")
                .custom_error(CustomError::message("'(' must follow 'if' ([[COLUMN]])")),
        ]);
        assert!(table.evaluate("if(").is_ok());
        let err = table.evaluate("(").unwrap_err();
        assert_eq!(err.kind(), "SyntaxError");
        assert_eq!(err.to_string(), "'(' must follow 'if' (0)");
    }

    #[test]
    fn test_fallback_error() {
        let table = table(vec![rule("A", "a")])
            .with_fallback_error(CustomError::new("Lexing", "bad [[TEXT]] at [[LINE]]"));
        let err = table.evaluate("a\nab").unwrap_err();
        assert_eq!(err.kind(), "Lexing");
        assert_eq!(err.to_string(), "bad b at 1");
    }

    #[test]
    fn test_default_error_truncates_remainder() {
        let table = table(vec![rule("A", "a")]);
        let evaluator = Evaluator::with_options(EvalOptions { max_error_text: 3 });
        let err = evaluator.evaluate(&table, "aaxyzw").unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::UnexpectedToken { line: 0, column: 2, ref text } if text == "xyz..."
        ));
    }

    #[test]
    fn test_column_counts_characters() {
        let table = table(vec![rule("E", "é")]);
        let err = table.evaluate("ééx").unwrap_err();
        assert_eq!(err.column(), Some(2));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcd", 3), "abc...");
        assert_eq!(truncate("ééé", 1), "é...");
    }
}
