//! Rule-driven tokenizer
//!
//! Layout, leaf first:
//!   matcher     anchored regex matching with sub-captures
//!   rule        a named pattern plus its matching policy
//!   table       ordered rules; insertion order is priority
//!   evaluator   the scan loop
//!   token       emitted tokens
//!   error       table and evaluation errors, custom error descriptors
//!   premades    ready-made rules for common token shapes
//!   config      TOML grammar files

pub mod config;
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod premades;
pub mod rule;
pub mod table;
pub mod token;
