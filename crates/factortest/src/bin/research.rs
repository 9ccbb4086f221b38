//! Build the research panel from CSV exports of the Wind tables and report
//! factor information coefficients.
//!
//! Usage: `cargo run --bin research --features cli -- --data-dir DIR --prefix-table FILE --start YYYYMMDD --end YYYYMMDD`
//! Example: `cargo run --bin research --features cli -- --data-dir data --prefix-table wind_industry_prefix.csv --start 20100101 --end 20241231 --regime-code 8841388.WI --regime-code 882010.WI --benchmark-out nav.csv`

use std::{fs, path::PathBuf};

use clap::Parser;
use factortest::{
    analysis::{
        LOW_INFLATION_YEARS, daily_returns, information_coefficients, net_asset_value,
        pct_change_returns, regime_performance,
    },
    data::{CsvSource, export_csv, export_sample, load_prefix_table, wind},
    panel::{PanelPipeline, PipelineConfig},
    primitives::{Date, DateRange, columns::FORWARD_RETURN},
};
use tracing_subscriber::EnvFilter;

/// Point-in-time factor research on A-share equities.
#[derive(Debug, Parser)]
#[command(name = "research", version)]
struct Args {
    /// Directory holding one `<TABLE>.csv` per Wind table.
    #[arg(long)]
    data_dir: PathBuf,

    /// Industry prefix table (`INDUSTRIESCODE_PREFIX`, `WIND_NAME_ENG`).
    #[arg(long)]
    prefix_table: PathBuf,

    /// First trading date, `YYYYMMDD`.
    #[arg(long, value_parser = parse_date, required_unless_present = "config")]
    start: Option<Date>,

    /// Last trading date, `YYYYMMDD`.
    #[arg(long, value_parser = parse_date, required_unless_present = "config")]
    end: Option<Date>,

    /// Universe index code [default: 000852.SH].
    #[arg(long)]
    index_code: Option<String>,

    /// Pipeline configuration as JSON. Command line dates and index code
    /// take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the panel rows of every `--sample-date` to this CSV file.
    #[arg(long, requires = "sample_date")]
    sample_out: Option<PathBuf>,

    /// Date to export, `YYYYMMDD`. Repeatable.
    #[arg(long, value_parser = parse_date)]
    sample_date: Vec<Date>,

    /// Index to report in and out of low-inflation years, e.g. `8841388.WI`
    /// for the market or `882001.WI` for Energy. Repeatable.
    #[arg(long)]
    regime_code: Vec<String>,

    /// Write the `8841388.WI` benchmark NAV to this CSV file.
    #[arg(long)]
    benchmark_out: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse_from_str(raw, "%Y%m%d").map_err(|e| format!("{raw}: {e}"))
}

fn load_config(args: &Args) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<PipelineConfig>(&fs::read_to_string(path)?)?,
        None => {
            let (Some(start), Some(end)) = (args.start, args.end) else {
                return Err("--start and --end are required without --config".into());
            };
            PipelineConfig::new(DateRange::new(start, end).ok_or("start is after end")?)
        }
    };

    let start = args.start.unwrap_or_else(|| config.range.start());
    let end = args.end.unwrap_or_else(|| config.range.end());
    config.range = DateRange::new(start, end).ok_or("start is after end")?;
    if let Some(index_code) = &args.index_code {
        config.index_code.clone_from(index_code);
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let range = config.range;
    let source = CsvSource::new(&args.data_dir);
    let prefixes = load_prefix_table(&args.prefix_table)?;

    tracing::info!(
        start = %range.start(),
        end = %range.end(),
        index = %config.index_code,
        factor = %config.factor_column,
        "building panel"
    );
    let pipeline = PanelPipeline::new(config, prefixes)?;
    let panel = pipeline.run(&source)?;
    let factor = pipeline.factor_column();

    let report = information_coefficients(&panel, &factor, FORWARD_RETURN)?;
    println!("\n{factor} vs {FORWARD_RETURN} ({} rows)", panel.height());
    println!("  IC       {}", report.ic);
    println!("  rank IC  {}", report.rank_ic);

    if let Some(path) = &args.sample_out {
        let rows = export_sample(&panel, &args.sample_date, path)?;
        println!("\nWrote {rows} sample rows to {}", path.display());
    }

    if let Some(path) = &args.benchmark_out {
        let benchmark = wind::fetch_industry_index(&source, wind::WIND_ALL_A, range)?;
        let mut nav = net_asset_value(&pct_change_returns(&benchmark)?)?;
        let rows = export_csv(&mut nav, path)?;
        println!("\nWrote {rows} {} NAV rows to {}", wind::WIND_ALL_A, path.display());
    }

    if !args.regime_code.is_empty() {
        let industries = wind::fetch_all_industries(&source, range)?;
        for code in &args.regime_code {
            let returns = daily_returns(&industries, code)?;
            let performance = regime_performance(&returns, &LOW_INFLATION_YEARS)?;
            println!("\n{code} in low-inflation years");
            println!("  in       {}", performance.in_regime);
            println!("  out      {}", performance.out_of_regime);
            println!("  full     {}", performance.full);
        }
    }

    Ok(())
}
