use clap::{Parser, ValueEnum};
use pollspec_parser::config::{ParserPreferences, RuntimeConfig};
use pollspec_parser::macros::ReferenceMode;
use pollspec_parser::{logging, pipeline, GrammarKind, ParseReport, ParseRequest};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Reference {
    #[value(name = "none")]
    Off,
    Numeric,
    String,
}

impl From<Reference> for ReferenceMode {
    fn from(reference: Reference) -> Self {
        match reference {
            Reference::Off => ReferenceMode::None,
            Reference::Numeric => ReferenceMode::Numeric,
            Reference::String => ReferenceMode::String,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pollspec",
    version,
    about = "Parse monitoring configuration strings: macros, addresses, time expressions, polling intervals, formulas"
)]
struct Args {
    /// Grammar to apply
    #[arg(value_enum)]
    grammar: GrammarKind,

    /// Text to parse
    text: String,

    /// Byte offset to start parsing at
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Run the semantic validation pass
    #[arg(long)]
    validate: bool,

    /// Accept a match that stops before the end of the text
    #[arg(long)]
    partial: bool,

    /// TOML file with parser preferences
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept `{#MACRO}` operands
    #[arg(long)]
    lld_macros: bool,

    /// Built-in macro name for the `macro` grammar (repeatable)
    #[arg(long = "macro-name")]
    macro_names: Vec<String>,

    /// Reference suffix accepted by the `macro` grammar
    #[arg(long, value_enum, default_value_t = Reference::Off)]
    reference: Reference,

    /// Allow negative numbers in ranges and simple intervals
    #[arg(long)]
    allow_negative: bool,

    /// Accept month and year suffixes in simple intervals
    #[arg(long)]
    with_year: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    let args = Args::parse();

    let mut prefs = match &args.config {
        Some(path) => RuntimeConfig::load(path)?.parser,
        None => ParserPreferences::default(),
    };
    prefs.validate_semantics |= args.validate;
    prefs.allow_lld_macros |= args.lld_macros;
    if args.partial {
        prefs.require_full_match = false;
    }

    let mut request = ParseRequest::new(args.grammar).at(args.offset);
    request.macro_names = args.macro_names;
    request.reference = args.reference.into();
    request.allow_negative = args.allow_negative;
    request.with_year = args.with_year;

    let report = pipeline::run(&request, &args.text, &prefs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &ParseReport) {
    println!("Grammar: {}", report.grammar);
    println!("Outcome: {:?}", report.outcome);
    println!(
        "Match:   [{}, {}) {:?}",
        report.start,
        report.start + report.matched_length,
        report.matched_text
    );

    if let Some(error) = &report.error {
        println!("Error:   {} at offset {} ({})", error.message, error.offset, error.code);
    }

    if let Some(value) = &report.value {
        match serde_json::to_string_pretty(value) {
            Ok(json) => {
                println!("Value:");
                for line in json.lines() {
                    println!("    {}", line);
                }
            }
            Err(err) => eprintln!("Warning: could not render value: {}", err),
        }
    }

    if !report.issues.is_empty() {
        println!("Issues:");
        for issue in &report.issues {
            println!("    {:?} {} {}", issue.severity, issue.code, issue);
        }
    }
}
