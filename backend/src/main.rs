//! fmsparse CLI - Convert FMS score reports to TBA match records
//!
//! # Main Commands
//!
//! ```bash
//! fmsparse parse Q12.html               # Report → TBA match JSON
//! fmsparse parse F1.html --playoff      # Playoff match (no ranking points)
//! fmsparse rankings rankings.csv --year 2022
//! fmsparse serve                        # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! fmsparse rows Q12.html                # Show extracted table rows
//! fmsparse defaults                     # Show default breakdown values
//! fmsparse validate match.json          # Validate a record against the schema
//! ```

use clap::{Parser, Subcommand};
use fmsparse::{
    default_breakdown, parse_report_file, read_report_file, read_rankings, validate_match_record,
    ParseOptions, ServerConfig,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fmsparse")]
#[command(about = "Convert FMS match score reports to The Blue Alliance format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an FMS report into a TBA match record
    Parse {
        /// Input report (HTML)
        input: PathBuf,

        /// Playoff match: ranking points are zeroed
        #[arg(long)]
        playoff: bool,

        /// Sidecar JSON (default: <input>.extrajson if present)
        #[arg(short, long)]
        extra: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip schema validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Show the table rows extracted from a report
    Rows {
        /// Input report (HTML)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the default breakdown values
    Defaults,

    /// Validate a match record JSON file against the schema
    Validate {
        /// Input JSON file (one record or an array of records)
        input: PathBuf,
    },

    /// Convert FMS rankings (JSON or CSV) to TBA rankings
    Rankings {
        /// Input rankings file (.json or .csv)
        input: PathBuf,

        /// Season the rankings belong to
        #[arg(short, long)]
        year: u16,

        /// Event code, e.g. 2022miket
        #[arg(long)]
        event: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: FMSPARSE_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            playoff,
            extra,
            output,
            no_validate,
        } => {
            let options = ParseOptions {
                playoff,
                extra_path: extra,
                skip_validation: no_validate,
            };
            cmd_parse(&input, &options, output.as_deref())
        }

        Commands::Rows { input, output } => cmd_rows(&input, output.as_deref()),

        Commands::Defaults => cmd_defaults(),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Rankings {
            input,
            year,
            event,
            output,
        } => cmd_rankings(&input, year, event.as_deref(), output.as_deref()),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(
    input: &Path,
    options: &ParseOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let outcome = parse_report_file(input, options)?;

    eprintln!("   Encoding: {}", outcome.report.encoding);
    eprintln!("   Rows: {} ({} data rows)", outcome.report.row_count, outcome.report.data_row_count);
    if let Some(ref sidecar) = outcome.report.sidecar {
        eprintln!("   Sidecar: {}", sidecar);
    }

    if !options.skip_validation {
        if outcome.is_valid() {
            eprintln!("   ✅ Record valid");
        } else {
            eprintln!("   ⚠️  {} schema violation(s)", outcome.schema_errors.len());
            for err in outcome.schema_errors.iter().take(5) {
                eprintln!("     - {}", err);
            }
        }
    }

    let json = serde_json::to_string_pretty(&outcome.record)?;
    write_output(&json, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_rows(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Reading: {}", input.display());

    let report = read_report_file(input)?;
    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("✅ Extracted {} rows ({} data rows)", report.rows.len(), report.data_row_count());

    let rows: Vec<&Vec<String>> = report.rows.iter().map(|r| &r.cells).collect();
    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_defaults() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&default_breakdown())?);
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let records = match serde_json::from_str::<Value>(&content)? {
        Value::Array(records) => records,
        record => vec![record],
    };

    let mut valid = 0;
    let mut invalid = 0;

    for (i, record) in records.iter().enumerate() {
        match validate_match_record(record) {
            Ok(()) => valid += 1,
            Err(errors) => {
                invalid += 1;
                if invalid <= 5 {
                    eprintln!("\n❌ Record {} invalid:", i);
                    for err in errors.iter().take(3) {
                        eprintln!("   - {}", err);
                    }
                }
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_rankings(
    input: &Path,
    year: u16,
    event: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🏆 Rankings: {} ({})", input.display(), year);

    if !fmsparse::rankings::is_valid_year(&year.to_string()) {
        return Err(format!("No ranking names known for {}", year).into());
    }
    if let Some(code) = event {
        if !fmsparse::rankings::is_valid_event_code(code) {
            return Err(format!("Invalid event code: {}", code).into());
        }
        eprintln!("   Event: {}", code);
    }

    let rankings = read_rankings(input)?;
    let upload = fmsparse::rankings::convert(year, &rankings)?;
    eprintln!("✅ Converted {} teams", upload.rankings.len());

    let json = serde_json::to_string_pretty(&upload)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env().with_port(port);
    fmsparse::server::start_server(config).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
