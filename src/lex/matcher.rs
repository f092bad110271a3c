//! Pattern Matcher
//!
//!     Wraps the regular expressions of a single rule. A match attempt is anchored at the
//!     given offset: the match must start exactly there, it never searches forward. This is
//!     what makes rule order meaningful token by token.
//!
//!     Each source pattern is compiled as `\A(?:<pattern>)` and run against the suffix of the
//!     line starting at the offset. The wrapping group is non-capturing, so capture group
//!     numbers are those the user wrote.
//!
//!     A rule may carry several alternative patterns. They are tried in the order given and
//!     the first one that matches wins.

use regex::Regex;
use std::ops::Range;

/// Result of a successful match attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Byte span of the whole match, relative to the start of the text
    pub span: Range<usize>,
    /// Whole match text (group 0)
    pub text: String,
    /// Sub-captures in group order, starting at group 1. `None` for groups that did not
    /// participate in the match.
    pub captures: Vec<Option<String>>,
}

impl PatternMatch {
    /// Length of the match in bytes
    pub fn len(&self) -> usize {
        self.span.end - self.span.start
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Text of group `index`. Group 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return Some(&self.text);
        }
        self.captures.get(index - 1)?.as_deref()
    }
}

/// One or more compiled expressions, tried in order
#[derive(Debug, Clone)]
pub struct Pattern {
    sources: Vec<String>,
    compiled: Vec<Regex>,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Self::alternatives([source])
    }

    /// Build from several alternative expressions
    pub fn alternatives<I, S>(sources: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pattern = Pattern {
            sources: Vec::new(),
            compiled: Vec::new(),
        };
        for source in sources {
            let source = source.as_ref();
            pattern
                .compiled
                .push(Regex::new(&format!(r"\A(?:{})", source))?);
            pattern.sources.push(source.to_string());
        }
        if pattern.compiled.is_empty() {
            return Err(regex::Error::Syntax("a rule needs at least one pattern".into()));
        }
        Ok(pattern)
    }

    /// The expressions as written by the user
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Attempt an anchored match at `offset`.
    ///
    /// Returns `None` when no alternative matches there, or when `offset` is out of range or
    /// not on a char boundary.
    pub fn try_match(&self, text: &str, offset: usize) -> Option<PatternMatch> {
        let rest = text.get(offset..)?;
        self.compiled.iter().find_map(|regex| {
            let caps = regex.captures(rest)?;
            let whole = caps.get(0)?;
            Some(PatternMatch {
                span: offset + whole.start()..offset + whole.end(),
                text: whole.as_str().to_string(),
                captures: caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect(),
            })
        })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.sources == other.sources
    }
}
