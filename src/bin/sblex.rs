//! Command-line interface for sblex
//! Tokenizes a text file with the rules of a grammar file and/or premade rules, and prints the
//! tokens.
//!
//! Usage:
//!   sblex `<path>` --grammar `<grammar.toml>` [--format `<format>`]   - Tokenize with a grammar file
//!   sblex `<path>` --premades whitespace,int,identifier              - Tokenize with premade rules
//!   sblex --list-premades                                            - List premade rule sets
//!
//! `<path>` may be `-` to read standard input. Set `RUST_LOG=sblex=debug` to see what the
//! evaluator is doing.

use clap::{Arg, ArgAction, Command};
use sblex::lex::config::Loader;
use sblex::lex::premades;
use sblex::Token;
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("sblex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize text with ordered regex rules")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the text to tokenize, or '-' for stdin")
                .required_unless_present("list-premades")
                .index(1),
        )
        .arg(
            Arg::new("grammar")
                .long("grammar")
                .short('g')
                .help("TOML grammar file describing the rules"),
        )
        .arg(
            Arg::new("premades")
                .long("premades")
                .short('p')
                .help("Comma separated premade rule sets, added after the grammar rules")
                .value_delimiter(','),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["json", "yaml", "simple"])
                .default_value("json"),
        )
        .arg(
            Arg::new("max-error-text")
                .long("max-error-text")
                .help("Characters of unmatched text quoted in errors")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("list-premades")
                .long("list-premades")
                .help("List available premade rule sets")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-premades") {
        handle_list_premades_command();
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing premades");
    let grammar = matches.get_one::<String>("grammar");
    let premade_names: Vec<&String> = matches
        .get_many::<String>("premades")
        .map(|names| names.collect())
        .unwrap_or_default();
    let max_error_text = matches.get_one::<u32>("max-error-text").copied();
    let format = matches
        .get_one::<String>("format")
        .expect("format has a default");

    if grammar.is_none() && premade_names.is_empty() {
        fail("no rules given: pass --grammar and/or --premades");
    }

    handle_tokenize_command(path, grammar, &premade_names, max_error_text, format);
}

/// Handle the tokenize command
fn handle_tokenize_command(
    path: &str,
    grammar: Option<&String>,
    premade_names: &[&String],
    max_error_text: Option<u32>,
    format: &str,
) {
    let mut loader = Loader::new();
    if let Some(grammar) = grammar {
        loader = loader.with_file(grammar);
    }
    if let Some(max) = max_error_text {
        loader = loader
            .set_override("settings.max_error_text", i64::from(max))
            .unwrap_or_else(|e| fail(&format!("Configuration error: {}", e)));
    }
    let grammar = loader
        .build()
        .unwrap_or_else(|e| fail(&format!("Grammar error: {}", e)));
    let mut table = grammar
        .build_table()
        .unwrap_or_else(|e| fail(&format!("Grammar error: {}", e)));

    for name in premade_names {
        let rules = premades::by_name(name).unwrap_or_else(|| {
            fail(&format!(
                "Unknown premade '{}'. Available premades: {}",
                name,
                premades::NAMES.join(", ")
            ))
        });
        table
            .extend(rules)
            .unwrap_or_else(|e| fail(&format!("Grammar error: {}", e)));
    }

    let text = read_input(path).unwrap_or_else(|e| fail(&format!("IO error: {}", e)));
    let tokens = grammar
        .evaluator()
        .evaluate(&table, &text)
        .unwrap_or_else(|e| fail(&format!("{}: {}", e.kind(), e)));

    print!("{}", format_tokens(&tokens, format));
}

/// Handle the list-premades command
fn handle_list_premades_command() {
    println!("Available premades:\n");
    for name in premades::NAMES {
        let rules = premades::by_name(name).unwrap_or_default();
        println!("  {}", name);
        for rule in rules {
            println!("    {}", rule);
        }
    }
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

fn format_tokens(tokens: &[Token], format: &str) -> String {
    match format {
        "yaml" => serde_yaml::to_string(tokens)
            .unwrap_or_else(|e| fail(&format!("Error formatting tokens: {}", e))),
        "simple" => tokens.iter().map(|token| format!("{}\n", token)).collect(),
        _ => {
            let mut json = serde_json::to_string_pretty(tokens)
                .unwrap_or_else(|e| fail(&format!("Error formatting tokens: {}", e)));
            json.push('\n');
            json
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
