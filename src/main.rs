// Fri Oct 16 2026 - Alex

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use df_codegen::{config::Config, EmitReport};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Generates C++ headers from lowered XML type definitions", long_about = None)]
struct Args {
    /// Directory holding the df.*.xml definitions
    #[arg(default_value = ".")]
    input_directory: PathBuf,

    /// Existing directory the headers are written to
    #[arg(default_value = "codegen")]
    output_directory: PathBuf,

    /// Namespace used for qualified type names
    #[arg(default_value = "df")]
    main_namespace: String,
}

fn main() {
    let args = Args::parse();
    setup_logging();

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::new()
        .with_input_directory(args.input_directory)
        .with_output_directory(args.output_directory)
        .with_main_namespace(args.main_namespace);

    println!("{} Reading {} from {}", "[*]".blue(), config.input_pattern, config.input_directory.display());
    let start_time = Instant::now();

    let report = df_codegen::run(&config)
        .with_context(|| format!("code generation from {} failed", config.input_directory.display()))?;

    print_summary(&report, &config);
    println!("{} Done in {:.2}s", "[+]".green(), start_time.elapsed().as_secs_f64());
    Ok(())
}

fn print_summary(report: &EmitReport, config: &Config) {
    println!(
        "{} Wrote {} headers to {}",
        "[+]".green(),
        report.written_count().to_string().green(),
        config.output_directory.display()
    );

    for unhandled in &report.unhandled {
        println!(
            "{} Skipped {} ({}) from {}",
            "[!]".yellow(),
            unhandled.name.cyan(),
            unhandled.kind,
            unhandled.source.display()
        );
    }
}
