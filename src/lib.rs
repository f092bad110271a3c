//! # sblex
//!
//! A rule-driven lexical tokenizer. Given an ordered set of named regex rules and a text, it
//! produces `(type, value, line)` tokens by taking, at each position, the first rule (in
//! insertion order) that matches there.
//!
//! Rules can select a capture group as the token value, depend on the previous match of
//! another rule, run a callback that keeps, replaces or suppresses each token, and carry
//! their own error message for when they were the reason a scan failed.
//!
//! ```rust
//! use sblex::{new_table, Rule};
//!
//! let mut table = new_table();
//! table.add(Rule::new("KW", "if")?)?;
//! table.add(Rule::new("PAREN", r"\(")?.depends_on("KW"))?;
//!
//! let tokens = table.evaluate("if(")?;
//! assert_eq!(tokens[1].kind(), "PAREN");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Tables are plain values: build one, share it (it is `Send + Sync`), and evaluate as many
//! texts against it as needed. There is no global registry.

pub mod lex;

pub use lex::error::{BoxError, CustomError, EvaluationError, TableError};
pub use lex::evaluator::{evaluate, EvalOptions, Evaluator};
pub use lex::rule::{MatchAction, OnMatch, Rule};
pub use lex::table::RuleTable;
pub use lex::token::Token;

/// An empty rule table
pub fn new_table() -> RuleTable {
    RuleTable::new()
}
