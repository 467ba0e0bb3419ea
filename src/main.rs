//! CLI entry point for the registration generator.
//!
//! Loads layered settings, applies command-line overrides and runs one
//! Parse → Scan → Emit pass.

use autoreg::io::ExitCode;
use autoreg::{GenError, GenerationReport, Generator, LanguageStandard, Settings, logging};
use clap::{
    Parser,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Generate RTTR registration code from marked C/C++ headers
#[derive(Parser)]
#[command(
    name = "autoreg",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate RTTR registration code from marked C/C++ headers",
    long_about = "Scans headers for REGISTER_CLASS, REGISTER_PROPERTY, \
                  REGISTER_READONLY_PROPERTY and REGISTER_ENUM markers and writes \
                  a source file that registers the marked entities.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Header file, or directory scanned recursively for headers
    #[arg(required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// Generated source file
    #[arg(required_unless_present = "print_config")]
    output: Option<PathBuf>,

    /// Path to custom autoreg.toml file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional include search directory (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Language standard, e.g. c++17 or c11 (overrides config)
    #[arg(long = "std", value_name = "STD")]
    standard: Option<LanguageStandard>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the merged configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(config_path) => Settings::load_from(config_path).unwrap_or_else(|e| {
            eprintln!(
                "Configuration error loading from {}: {e}",
                config_path.display()
            );
            std::process::exit(ExitCode::ConfigError.into());
        }),
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            std::process::exit(ExitCode::ConfigError.into());
        }),
    };

    // CLI overrides
    settings.frontend.include_paths.extend(cli.include.iter().cloned());
    if let Some(standard) = cli.standard {
        settings.frontend.language_standard = standard;
    }

    logging::init(cli.verbose, settings.debug);

    if cli.print_config {
        match toml::to_string_pretty(&settings) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("Error displaying config: {e}");
                std::process::exit(ExitCode::GeneralError.into());
            }
        }
        return;
    }

    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        eprintln!("Error: both <INPUT> and <OUTPUT> are required");
        std::process::exit(ExitCode::GeneralError.into());
    };

    let result = settings
        .validate()
        .and_then(|()| Generator::new(settings).run(&input, &output));

    match result {
        Ok(report) => print_report(&report, cli.json),
        Err(e) => fail(&e),
    }
}

fn print_report(report: &GenerationReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                std::process::exit(ExitCode::GeneralError.into());
            }
        }
        return;
    }

    println!("Generated code written to {}", report.output.display());
    println!(
        "Processed {} header(s): {} classes, {} enums registered",
        report.headers_scanned, report.classes, report.enums
    );
    if !report.diagnostics.is_empty() {
        println!(
            "{} marker(s) skipped, see warnings above",
            report.diagnostics.len()
        );
    }
}

fn fail(error: &GenError) -> ! {
    eprintln!("Error: {error}");
    for suggestion in error.recovery_suggestions() {
        eprintln!("  - {suggestion}");
    }
    std::process::exit(ExitCode::from_error(error).into());
}
