use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

use bank_partners::app::combine_use_case::{CombineSummary, CombineUseCase};
use bank_partners::app::scrape_use_case::{ScrapeOutcome, ScrapeStatus, ScrapeUseCase};
use bank_partners::config::Config;
use bank_partners::infra::http_client::ReqwestFetcher;
use bank_partners::infra::table_store::CsvTableStore;
use bank_partners::logging;
use bank_partners::types::Source;

#[derive(Parser)]
#[command(name = "bank_partners")]
#[command(about = "Bank mortgage-partner listing scraper and normalizer")]
#[command(version)]
struct Cli {
    /// TOML config file; built-in defaults are used when omitted
    #[arg(long, global = true, env = "BANK_PARTNERS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the per-source tables and the unified output
    #[arg(long, global = true, env = "BANK_PARTNERS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch each source page and write its intermediate table
    Scrape {
        /// Sources to scrape (comma-separated). Available: pashabank, abbhome, xalqbank, birbank
        #[arg(long)]
        sources: Option<String>,
    },
    /// Normalize all intermediate tables into the unified table
    Combine {
        /// Exit successfully even when no source produced a row
        #[arg(long)]
        allow_empty: bool,
        /// Print the summary as JSON; progress moves to stderr
        #[arg(long)]
        json: bool,
    },
    /// Run scrape then combine
    Run {
        /// Sources to scrape (comma-separated); all are combined regardless
        #[arg(long)]
        sources: Option<String>,
        /// Exit successfully even when no source produced a row
        #[arg(long)]
        allow_empty: bool,
        /// Print the combine summary as JSON; progress moves to stderr
        #[arg(long)]
        json: bool,
    },
}

fn parse_sources(list: Option<&str>) -> anyhow::Result<Vec<Source>> {
    match list {
        None => Ok(Source::ALL.to_vec()),
        Some(list) => list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Source>().map_err(anyhow::Error::from))
            .collect(),
    }
}

/// Progress output. Under `--json` it goes to stderr so stdout holds only the JSON document.
macro_rules! progress {
    ($json:expr, $($arg:tt)*) => {
        if $json {
            eprintln!($($arg)*)
        } else {
            println!($($arg)*)
        }
    };
}

async fn scrape(config: &Config, sources: &[Source], json: bool) -> Vec<ScrapeOutcome> {
    let use_case = ScrapeUseCase::new(
        Box::new(ReqwestFetcher),
        CsvTableStore::new(&config.data_dir),
    );
    let outcomes = use_case.run(config, sources).await;

    progress!(json, "\n📥 Scrape results:");
    for outcome in &outcomes {
        match &outcome.status {
            ScrapeStatus::Saved { tactic, records, path } => progress!(
                json,
                "   {}: {} records via {} -> {}",
                outcome.source,
                records,
                tactic,
                path.display()
            ),
            ScrapeStatus::NotScraped => progress!(json, "   {}: no url, not scraped", outcome.source),
            ScrapeStatus::NoRecords => progress!(json, "   {}: no records found", outcome.source),
            ScrapeStatus::FetchFailed { reason } => {
                progress!(json, "   {}: fetch failed ({})", outcome.source, reason)
            }
            ScrapeStatus::WriteFailed { reason } => {
                progress!(json, "   {}: write failed ({})", outcome.source, reason)
            }
        }
    }
    outcomes
}

fn combine(
    config: &Config,
    allow_empty: bool,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<CombineSummary> {
    let use_case = CombineUseCase::with_default_registry(CsvTableStore::new(&config.data_dir));
    let output = config.output_path();
    let summary = use_case
        .run(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(
            out,
            "✅ {} written: {} total rows",
            summary.output_file.display(),
            summary.total_rows
        )?;
        for count in &summary.per_source {
            let note = if count.missing { " (missing)" } else { "" };
            writeln!(out, "   {}: {}{}", count.tag, count.rows, note)?;
        }
    }

    if summary.total_rows == 0 && !allow_empty {
        error!("No rows were produced by any source");
        bail!("unified table is empty; every source failed or was missing");
    }
    Ok(summary)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let _guard = logging::init_logging(&config.log_dir);
    info!("Using data directory {}", config.data_dir.display());

    match cli.command {
        Commands::Scrape { sources } => {
            println!("🔄 Running scraper...");
            let sources = parse_sources(sources.as_deref())?;
            scrape(&config, &sources, false).await;
        }
        Commands::Combine { allow_empty, json } => {
            progress!(json, "🔨 Combining source tables...");
            combine(&config, allow_empty, json, &mut io::stdout())?;
        }
        Commands::Run {
            sources,
            allow_empty,
            json,
        } => {
            progress!(json, "🚀 Running full pipeline (scrape + combine)...");
            let sources = parse_sources(sources.as_deref())?;

            progress!(json, "\n📥 Step 1: Scraping...");
            scrape(&config, &sources, json).await;

            progress!(json, "\n🔨 Step 2: Combining...");
            combine(&config, allow_empty, json, &mut io::stdout())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_table(dir: &TempDir, table: Option<&str>) -> Config {
        if let Some(table) = table {
            std::fs::write(dir.path().join("pashabank.csv"), table).unwrap();
        }
        Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_combine_json_output_is_a_single_json_document() {
        let dir = TempDir::new().unwrap();
        let config = config_with_table(&dir, Some("name,phone\nAlpha,012\nBeta,013\n"));
        let mut out = Vec::new();

        combine(&config, false, true, &mut out).unwrap();

        let summary: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(summary["total_rows"], 2);
        assert_eq!(summary["per_source"].as_array().unwrap().len(), 4);
        assert_eq!(summary["per_source"][0]["tag"], "PASHA Bank");
        assert_eq!(summary["per_source"][1]["missing"], true);
    }

    #[test]
    fn test_combine_text_output_lists_every_source() {
        let dir = TempDir::new().unwrap();
        let config = config_with_table(&dir, Some("name\nAlpha\n"));
        let mut out = Vec::new();

        combine(&config, false, false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("written: 1 total rows"));
        assert_eq!(lines[1], "   PASHA Bank: 1");
        assert_eq!(lines[2], "   ABB Home: 0 (missing)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_combine_without_rows_fails_unless_allowed() {
        let dir = TempDir::new().unwrap();
        let config = config_with_table(&dir, None);

        assert!(combine(&config, false, true, &mut Vec::new()).is_err());
        assert!(combine(&config, true, true, &mut Vec::new()).is_ok());
        assert!(dir.path().join("data.csv").exists());
    }

    #[test]
    fn test_parse_sources_defaults_to_all() {
        assert_eq!(parse_sources(None).unwrap(), Source::ALL.to_vec());
    }

    #[test]
    fn test_parse_sources_keeps_given_order() {
        assert_eq!(
            parse_sources(Some("birbank, pashabank")).unwrap(),
            vec![Source::BirBank, Source::PashaBank]
        );
        assert!(parse_sources(Some("pashabank,nobank")).is_err());
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "bank_partners",
            "--data-dir",
            "out",
            "run",
            "--sources",
            "pashabank",
            "--allow-empty",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("out")));
        match cli.command {
            Commands::Run {
                sources,
                allow_empty,
                json,
            } => {
                assert_eq!(sources.as_deref(), Some("pashabank"));
                assert!(allow_empty);
                assert!(!json);
            }
            _ => panic!("expected run"),
        }
    }
}
