use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use careerspace_scraper::config::{
    CHART_FILE, DEFAULT_CONFIG_PATH, DEFAULT_OUTPUT_DIR, SPREADSHEET_FILE, WORKBOOK_FILE,
};
use careerspace_scraper::{
    CareerspaceClient, CrawlPipeline, Result, ScraperConfig, prepare_output_dir,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON crawler config
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory receiving the spreadsheet and the chart
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl vacancies, then write the spreadsheet and the chart (default)
    Scrape,
    /// Re-render the chart from an existing spreadsheet
    Chart {
        /// Spreadsheet to read; defaults to the one in the output directory
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("careerspace_scraper=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Scrape) {
        Command::Scrape => scrape(&cli.config, &cli.out_dir),
        Command::Chart { input } => {
            let input = input.unwrap_or_else(|| cli.out_dir.join(SPREADSHEET_FILE));
            let pipeline = CrawlPipeline::new().from_spreadsheet(&input)?;

            std::fs::create_dir_all(&cli.out_dir)?;
            pipeline.chart(cli.out_dir.join(CHART_FILE))?.finish();
            Ok(())
        }
    }
}

fn scrape(config_path: &Path, out_dir: &Path) -> Result<()> {
    let config = ScraperConfig::load(config_path)?;
    prepare_output_dir(out_dir)?;

    CrawlPipeline::new()
        .crawl(CareerspaceClient::new(config)?)?
        .save_and_then(out_dir.join(SPREADSHEET_FILE))?
        .save_xlsx_and_then(out_dir.join(WORKBOOK_FILE))?
        .chart(out_dir.join(CHART_FILE))?
        .finish();

    Ok(())
}
