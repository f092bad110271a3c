//! Ready-made rules
//!
//!     Common token shapes that most small languages need. Each function returns a fresh
//!     [Rule] that can be added to a table as is, or adjusted with the builder methods first
//!     (for instance to attach a callback).
//!
//!     Patterns are compiled once per process and cloned on use.
//!
//!     The regex engine has no backreferences, so quoted strings are two alternatives (double
//!     and single quotes) with the body in group 1 of each. The same split is used for the
//!     string elements of lists, tuples and dicts.

use crate::lex::error::CustomError;
use crate::lex::rule::Rule;
use once_cell::sync::Lazy;

const STRING_PATTERNS: &[&str] = &[r#""((?:\\.|[^"\\])*)""#, r"'((?:\\.|[^'\\])*)'"];
const FLOAT_PATTERN: &str = r"[0-9]*[.,][0-9]+";
const INT_PATTERN: &str = r"[0-9]+";
const BOOL_PATTERN: &str = r"True|False";
const IDENTIFIER_PATTERN: &str = r"(?:[a-zA-Z]|_[a-zA-Z])[a-zA-Z0-9_]*";
const OPERATOR_PATTERN: &str = r"[+\-*%=&|~^<>?:!/]+";
const OPERATOR_ARITHMETIC_PATTERN: &str = r"[*+\-/]";
const COMMENT_PATTERN: &str = r"/\*.*?\*/|//.*";
const WHITESPACE_PATTERN: &str = r"[ \t]+";
const ARITHMETIC_EXPRESSION_PATTERN: &str = r"[\d ()+\-*/]+$";

/// Quoted string with its quotes, no groups
const QUOTED_PATTERN: &str = r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#;
/// A literal inside a list, tuple or dict: signed number, bool or quoted string
const LITERAL_PATTERN: &str =
    r#"[+-]?[0-9]+\.[0-9]+|[+-]?[0-9]+|True|False|"(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#;

/// Comma separated literals between `open` and `close`, possibly none
fn sequence_pattern(open: &str, close: &str) -> String {
    format!(r"{open} *(?:(?:{LITERAL_PATTERN})(?: *, *(?:{LITERAL_PATTERN}))*)? *{close}")
}

static LIST_PATTERN: Lazy<String> = Lazy::new(|| sequence_pattern(r"\[", r"\]"));
static TUPLE_PATTERN: Lazy<String> = Lazy::new(|| sequence_pattern(r"\(", r"\)"));
static DICT_PATTERN: Lazy<String> = Lazy::new(|| {
    let entry = format!(r"(?:{QUOTED_PATTERN}) *: *(?:{LITERAL_PATTERN})");
    format!(r"\{{ *(?:{entry}(?: *, *{entry})*)? *\}}")
});

fn premade<S: AsRef<str>>(name: &str, patterns: &[S]) -> Rule {
    Rule::with_patterns(name, patterns).expect("premade patterns are valid regular expressions")
}

static STRING: Lazy<Rule> = Lazy::new(|| premade("STRING", STRING_PATTERNS).capture(1));
static FLOAT: Lazy<Rule> = Lazy::new(|| premade("FLOAT", &[FLOAT_PATTERN]));
static INT: Lazy<Rule> = Lazy::new(|| premade("INT", &[INT_PATTERN]));
static BOOL: Lazy<Rule> = Lazy::new(|| premade("BOOL", &[BOOL_PATTERN]));
static LIST: Lazy<Rule> = Lazy::new(|| premade("LIST", &[LIST_PATTERN.as_str()]));
static TUPLE: Lazy<Rule> = Lazy::new(|| premade("TUPLE", &[TUPLE_PATTERN.as_str()]));
static DICT: Lazy<Rule> = Lazy::new(|| premade("DICTIONARY", &[DICT_PATTERN.as_str()]));
static IDENTIFIER: Lazy<Rule> = Lazy::new(|| premade("IDENTIFIER", &[IDENTIFIER_PATTERN]));
static OPERATOR: Lazy<Rule> = Lazy::new(|| premade("OPERATOR", &[OPERATOR_PATTERN]));
static OPERATOR_ARITHMETIC: Lazy<Rule> =
    Lazy::new(|| premade("OPERATOR_ARITHMETIC", &[OPERATOR_ARITHMETIC_PATTERN]));
static COMMENT: Lazy<Rule> = Lazy::new(|| premade("COMMENT", &[COMMENT_PATTERN]).skip());
static WHITESPACE: Lazy<Rule> = Lazy::new(|| premade("WHITESPACE", &[WHITESPACE_PATTERN]).skip());

static VAR_DECLARATION: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut expression = vec![ARITHMETIC_EXPRESSION_PATTERN];
    expression.extend_from_slice(STRING_PATTERNS);
    expression.extend_from_slice(&[
        FLOAT_PATTERN,
        INT_PATTERN,
        LIST_PATTERN.as_str(),
        TUPLE_PATTERN.as_str(),
        DICT_PATTERN.as_str(),
        BOOL_PATTERN,
    ]);

    vec![
        premade("VAR_DECLARATION", &[r"var\b"]),
        premade("VAR_NAME", &[IDENTIFIER_PATTERN])
            .depends_on("VAR_DECLARATION")
            .custom_error(CustomError::new(
                "ExpectedIdentifier",
                "line [[LINE]]: expected an IDENTIFIER after 'var' but got '[[TEXT]]'",
            )),
        premade("EQ_OPERATOR", &["="])
            .depends_on("VAR_NAME")
            .custom_error(CustomError::new(
                "ExpectedAssignment",
                "line [[LINE]]: expected '=' but got '[[TEXT]]'",
            )),
        premade("EXPRESSION", &expression)
            .depends_on("EQ_OPERATOR")
            .custom_error(CustomError::new(
                "ExpectedExpression",
                "line [[LINE]]: expected one of [STRING, FLOAT, INT, LIST, TUPLE, DICT, BOOL] but got '[[TEXT]]'",
            )),
    ]
});

/// Quoted string; the value is the text between the quotes
pub fn string() -> Rule {
    STRING.clone()
}

/// Decimal number with a `.` or `,` separator, integer part optional
pub fn float() -> Rule {
    FLOAT.clone()
}

pub fn int() -> Rule {
    INT.clone()
}

/// `True` or `False`
pub fn bool() -> Rule {
    BOOL.clone()
}

/// `[1, -2.5, 'a', True]`, literals only
pub fn list() -> Rule {
    LIST.clone()
}

/// `(1, "b")`, literals only
pub fn tuple() -> Rule {
    TUPLE.clone()
}

/// `{"key": 1, 'other': False}`: quoted keys, literal values. The token type is `DICTIONARY`.
pub fn dict() -> Rule {
    DICT.clone()
}

pub fn identifier() -> Rule {
    IDENTIFIER.clone()
}

/// Run of operator characters, e.g. `==`, `&&`, `->`
pub fn operator() -> Rule {
    OPERATOR.clone()
}

/// One of `+ - * /`
pub fn operator_arithmetic() -> Rule {
    OPERATOR_ARITHMETIC.clone()
}

/// `// ...` to end of line, or a `/* ... */` block closed on the same line. Skipped.
pub fn comment() -> Rule {
    COMMENT.clone()
}

/// Spaces and tabs, skipped
pub fn whitespace() -> Rule {
    WHITESPACE.clone()
}

/// `var NAME = EXPRESSION` as a dependency chain.
///
/// Returns `VAR_DECLARATION`, `VAR_NAME`, `EQ_OPERATOR` and `EXPRESSION`, in that order,
/// each depending on the previous one and carrying its own error message. Add
/// [whitespace] before these to allow spaces between the parts. The names don't clash with
/// the other premades, so [identifier] and friends can be added after them.
pub fn var_declaration() -> Vec<Rule> {
    VAR_DECLARATION.clone()
}

/// Names accepted by [by_name]
pub const NAMES: &[&str] = &[
    "string",
    "float",
    "int",
    "bool",
    "list",
    "tuple",
    "dict",
    "identifier",
    "operator",
    "operator_arithmetic",
    "comment",
    "whitespace",
    "var_declaration",
];

/// Look up premade rules by name
pub fn by_name(name: &str) -> Option<Vec<Rule>> {
    let rules = match name {
        "string" => vec![string()],
        "float" => vec![float()],
        "int" => vec![int()],
        "bool" => vec![bool()],
        "list" => vec![list()],
        "tuple" => vec![tuple()],
        "dict" => vec![dict()],
        "identifier" => vec![identifier()],
        "operator" => vec![operator()],
        "operator_arithmetic" => vec![operator_arithmetic()],
        "comment" => vec![comment()],
        "whitespace" => vec![whitespace()],
        "var_declaration" => var_declaration(),
        _ => return None,
    };
    Some(rules)
}
