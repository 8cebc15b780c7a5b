use company_finder_lib::{exporter, input_loader, logger};
use company_finder_lib::{CompanyFinder, RunParams, SearchConfig, Settings};

use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "company-url-finder")]
#[command(about = "LinkedIn Company URL - Mass Finder")]
struct Args {
    /// Text file with one company name per line, or a CSV with a Company column
    #[arg(short, long, default_value = "data/sample_input.txt")]
    input: PathBuf,

    /// Where to write the results (.json, or .csv for CSV output)
    #[arg(short, long, default_value = "data/sample_output.json")]
    output: PathBuf,

    /// JSON settings file
    #[arg(short, long, default_value = "config/settings.json")]
    settings: PathBuf,

    /// Maximum number of LinkedIn URLs per company (overrides settings)
    #[arg(short, long, allow_negative_numbers = true)]
    results_per_company: Option<i64>,

    /// 1-based search page to start from (overrides settings)
    #[arg(long, allow_negative_numbers = true)]
    start_page: Option<i64>,

    /// Maximum number of pages to scan per company (overrides settings)
    #[arg(long, allow_negative_numbers = true)]
    max_pages: Option<i64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::load(&args.settings).context("Could not load settings")?;
    let config = SearchConfig::from_settings(&settings).context("Invalid settings")?;

    let mut params = RunParams::from_settings(&settings);
    if let Some(value) = args.results_per_company {
        params.results_per_company = value;
    }
    if let Some(value) = args.start_page {
        params.start_page = value;
    }
    if let Some(value) = args.max_pages {
        params.max_pages = value;
    }

    let companies = input_loader::load_names(&args.input).context("Could not read input companies")?;

    info!(
        "Starting LinkedIn company URL search for {} companies (results_per_company={}, start_page={}, max_pages={})",
        companies.len(),
        params.results_per_company,
        params.start_page,
        params.max_pages
    );

    let finder = CompanyFinder::new(config).context("Could not set up the search client")?;
    let report = finder.search_for_companies(&companies, &params);

    let failed = report.failures().count();
    if failed > 0 {
        warn!("{} of {} companies could not be searched.", failed, report.outcomes.len());
    }

    let results = report.into_records();
    exporter::export_results(&results, &args.output).context("Failed to export results")?;

    info!("Finished. {} LinkedIn records written to {:?}", results.len(), args.output);
    Ok(())
}
