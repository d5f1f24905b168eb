//! machinedoc CLI - regenerate TinyGo machine package documentation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use machinedoc::{DocGenError, FeatureReport, GeneratorOptions, MachineDocCore};
use std::path::PathBuf;
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "machinedoc")]
#[command(about = "Machine package reference and board documentation generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root of the microcontroller reference docs
    #[arg(long, global = true, value_name = "DIR")]
    docs_root: Option<PathBuf>,

    /// Compiler command used to query target info
    #[arg(long, global = true, value_name = "CMD")]
    toolchain: Option<String>,

    /// Directory with package snapshots (<target>.json)
    #[arg(long, global = true, value_name = "DIR")]
    packages: Option<PathBuf>,

    /// Read target info from <packages>/<target>.info instead of running the toolchain
    #[arg(long, global = true)]
    offline: bool,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate reference pages and board documents
    Generate {
        /// Target names, e.g. feather-nrf52840
        #[arg(value_name = "TARGET", required = true)]
        targets: Vec<String>,
    },

    /// Show detected interfaces and pins of a target without writing anything
    Features {
        #[arg(value_name = "TARGET")]
        target: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::default();
        if let Some(dir) = &self.docs_root {
            options.docs_root = dir.clone();
        }
        if let Some(toolchain) = &self.toolchain {
            options.toolchain = toolchain.clone();
        }
        if let Some(dir) = &self.packages {
            options.packages_dir = dir.clone();
        }
        options.offline = self.offline;
        options
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let options = cli.options();
    let exit_code = match &cli.command {
        Commands::Generate { targets } => handle_generate(targets, &options),
        Commands::Features { target, format } => handle_features(target, format, &options),
    };

    process::exit(exit_code);
}

fn handle_generate(targets: &[String], options: &GeneratorOptions) -> i32 {
    for target in targets {
        if !MachineDocCore::has_board_document(target, options) {
            println!("{:<29} {}", "Skipping:", target);
            continue;
        }
        println!("{:<29} {}", "Generating documentation for:", target);
        if let Err(e) = MachineDocCore::update_documentation(target, options) {
            report_error(&e);
            return 1;
        }
    }
    0
}

fn handle_features(target: &str, format: &OutputFormat, options: &GeneratorOptions) -> i32 {
    match MachineDocCore::report(target, options) {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_human(&report),
                OutputFormat::Json => output_json(&report),
            }
            0
        }
        Err(e) => {
            report_error(&e);
            1
        }
    }
}

fn report_error(e: &DocGenError) {
    for error in e.load_errors() {
        eprintln!("{}", error);
    }
    eprintln!("Error: {}", e);
}

fn output_human(report: &FeatureReport) {
    println!("\nTarget: {}", report.target);
    println!("{}", "─".repeat(60));

    println!("\n  Interfaces:");
    for (capability, supported) in report.capabilities.iter() {
        println!(
            "    {:<9}  {}",
            capability,
            if supported { "YES" } else { "Not yet" }
        );
    }

    println!("\n  Pins:");
    if report.pins.is_empty() {
        println!("    No board pins");
    }
    for pin in &report.pins {
        let alternatives = pin.alternative_names().join(", ");
        if alternatives.is_empty() {
            println!("    {:<12} {}", pin.primary_name(), pin.hardware_name);
        } else {
            println!(
                "    {:<12} {:<8} ({})",
                pin.primary_name(),
                pin.hardware_name,
                alternatives
            );
        }
    }
}

fn output_json(report: &FeatureReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}
