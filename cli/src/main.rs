//! ieeecheck CLI - IEEE manuscript format checker

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use ieeecheck::render::{self, JsonFormat};
use ieeecheck::{
    check_bytes_with_options, parse_bytes_with_options, CheckOptions, ParseOptions, Report,
    RuleId,
};

#[derive(Parser)]
#[command(name = "ieeecheck")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Check a PDF manuscript against the IEEE two-column format", long_about = None)]
struct Cli {
    /// Input PDF file (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    thresholds: ThresholdArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone, Copy)]
struct OutputArgs {
    /// Output compact JSON (default when reading stdin)
    #[arg(long)]
    compact: bool,

    /// Output indented JSON (default when reading a file)
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Print a rule summary table on stderr
    #[arg(long)]
    summary: bool,
}

#[derive(clap::Args, Clone, Copy, Default)]
struct ThresholdArgs {
    /// Number of leading pages sampled for layout and fonts
    #[arg(long, value_name = "N")]
    sample_pages: Option<usize>,

    /// Lines starting above this offset from the top are ignored for columns
    #[arg(long, value_name = "PT")]
    header_margin: Option<f32>,

    /// Height of the first-page region searched for a title
    #[arg(long, value_name = "PT")]
    title_region: Option<f32>,

    /// Smallest accepted body font size
    #[arg(long, value_name = "PT")]
    min_body_size: Option<f32>,

    /// Largest accepted body font size
    #[arg(long, value_name = "PT")]
    max_body_size: Option<f32>,
}

impl ThresholdArgs {
    fn to_options(self) -> CheckOptions {
        let mut options = CheckOptions::new();
        if let Some(pages) = self.sample_pages {
            options = options.with_sample_pages(pages);
        }
        if let Some(points) = self.header_margin {
            options = options.with_header_margin(points);
        }
        if let Some(points) = self.title_region {
            options = options.with_title_region(points);
        }
        if self.min_body_size.is_some() || self.max_body_size.is_some() {
            let min = self.min_body_size.unwrap_or(*options.body_size.start());
            let max = self.max_body_size.unwrap_or(*options.body_size.end());
            options = options.with_body_size(min..=max);
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check a manuscript and print the JSON report
    Check {
        /// Input PDF file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Dump the extracted page layout as JSON
    Layout {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Check {
            input,
            output,
            thresholds,
        }) => cmd_check(input.as_deref(), output, thresholds),
        Some(Commands::Layout { input, compact }) => cmd_layout(&input, compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        None => cmd_check(cli.input.as_deref(), cli.output, cli.thresholds),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// Report format: explicit flags win, otherwise single-line for stdin and
/// indented for files.
fn report_format(input: Option<&Path>, output: OutputArgs) -> JsonFormat {
    if output.compact {
        JsonFormat::Compact
    } else if output.pretty {
        JsonFormat::Pretty
    } else {
        json_format(input.is_none())
    }
}

/// Read the whole input, from a file or stdin.
fn read_input(input: Option<&Path>) -> Result<Vec<u8>, String> {
    match input {
        Some(path) => {
            log::info!("Reading PDF from {}", path.display());
            fs::read(path).map_err(|e| format!("Failed to read file: {}", e))
        }
        None => {
            log::info!("Reading PDF from stdin");
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(data)
        }
    }
}

fn cmd_check(
    input: Option<&Path>,
    output: OutputArgs,
    thresholds: ThresholdArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = match read_input(input) {
        Ok(data) => {
            log::info!("Checking {} bytes", data.len());
            check_bytes_with_options(&data, &thresholds.to_options())
        }
        Err(message) => {
            log::warn!("{}", message);
            Report::degraded(RuleId::Input, message)
        }
    };

    if output.summary {
        print_summary(&report);
    }

    println!("{}", render::to_json(&report, report_format(input, output))?);
    Ok(())
}

fn print_summary(report: &Report) {
    eprintln!("{}", "IEEE Format Check".cyan().bold());
    eprintln!("{}", "─".repeat(60).dimmed());

    for detail in &report.details {
        let status = if detail.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        eprintln!("{} {:<26} {}", status, detail.rule.name().bold(), detail.message);
        if let Some(ref suggestion) = detail.suggestion {
            eprintln!("     {} {}", "└─".dimmed(), suggestion.yellow());
        }
    }

    eprintln!("{}", "─".repeat(60).dimmed());
    let score = format!("{}%", report.percentage);
    let score = if report.percentage >= 80.0 {
        score.green().bold()
    } else if report.percentage >= 50.0 {
        score.yellow().bold()
    } else {
        score.red().bold()
    };
    eprintln!(
        "{}: {} ({}/{} rules passed)",
        "Compliance".bold(),
        score,
        report.passed_count(),
        report.details.len()
    );
}

fn cmd_layout(input: &Path, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Reading PDF from {}", input.display());
    let data = fs::read(input)?;
    let doc = parse_bytes_with_options(&data, ParseOptions::new().lenient())?;

    println!("{}", render::document_to_json(&doc, json_format(compact))?);
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Reading PDF from {}", input.display());
    let data = fs::read(input)?;
    let doc = parse_bytes_with_options(&data, ParseOptions::new().lenient())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: PDF {}",
        "Format".bold(),
        doc.version.as_deref().unwrap_or("unknown")
    );
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Fonts".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in &doc.pages {
        let fonts: Vec<_> = page.fonts.iter().map(String::as_str).collect();
        println!(
            "{} {} ({:.0} x {:.0} pt): {}",
            "Page".bold(),
            page.number,
            page.width,
            page.height,
            if fonts.is_empty() {
                "-".dimmed().to_string()
            } else {
                fonts.join(", ")
            }
        );
    }

    Ok(())
}
