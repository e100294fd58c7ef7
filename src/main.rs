use clap::{ArgAction, Parser};
use log::{debug, info};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use stress_survey::config::{ReportConfig, DEFAULT_INPUT};
use stress_survey::predict::predict_stress_level;
use stress_survey::prepare::{load_and_prepare, LabeledDataset};
use stress_survey::report::render_all;
use stress_survey::stats::{describe, level_counts, missing_counts, preview, summarize_dataset};
use stress_survey::telemetry::{init_logging, level_for, monitor_memory};

#[derive(Parser, Debug)]
#[command(author, version, about = "Score stress levels in a yes/no survey export", long_about = None)]
pub struct Args {
    #[arg(short, long, default_value = DEFAULT_INPUT, help = "Survey CSV export")]
    input: PathBuf,
    #[arg(short, long, help = "Directory for the rendered charts")]
    output_dir: Option<PathBuf>,
    #[arg(short, long, help = "TOML file with report settings")]
    config: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, help = "Verbose level")]
    verbose: u8,
    #[arg(long, help = "Print the dataset summary as JSON")]
    json: bool,
    #[arg(long, help = "Skip chart rendering")]
    no_plots: bool,
    #[arg(long, help = "Skip the interactive questionnaire")]
    no_prompt: bool,
}

async fn print_summary(labeled: &LabeledDataset, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        let summary = summarize_dataset(labeled)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", preview(labeled, 5));

    println!("\nRespondents per stress level:");
    for count in level_counts(&labeled.levels()?) {
        println!("  {:<15}{:>6}", count.level.label(), count.respondents);
    }

    println!(
        "\n{:<20}{:>8}{:>9}{:>8}{:>8}{:>5}{:>5}",
        "", "count", "missing", "mean", "std", "min", "max"
    );
    let fmt_f = |v: Option<f64>| v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".into());
    let fmt_i = |v: Option<i32>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    for column in describe(labeled)? {
        println!(
            "{:<20}{:>8}{:>9}{:>8}{:>8}{:>5}{:>5}",
            column.name,
            column.count,
            column.missing,
            fmt_f(column.mean),
            fmt_f(column.std),
            fmt_i(column.min),
            fmt_i(column.max)
        );
    }

    println!("\nMissing values per column:");
    for (name, missing) in missing_counts(labeled) {
        println!("  {name:<95}{missing:>6}");
    }
    Ok(())
}

async fn render_reports(labeled: &LabeledDataset, config: &ReportConfig) -> Result<(), Box<dyn Error>> {
    let written = render_all(labeled, config)?;
    for path in &written {
        debug!("chart {}", path.display());
    }
    println!("\n{} charts written to {}", written.len(), config.output_dir.display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(level_for(args.verbose));
    debug!("Arguments {:#?}", args);

    let start_time = Instant::now();
    let start_memory = monitor_memory();

    let config =
        ReportConfig::load_or_default(args.config.as_deref())?.with_output_dir(args.output_dir.clone());
    let labeled = load_and_prepare(&args.input).await?;

    print_summary(&labeled, args.json).await?;
    if !args.no_plots {
        render_reports(&labeled, &config).await?;
    }
    if !args.no_prompt {
        predict_stress_level()?;
    }

    let end_memory = monitor_memory();
    let duration = start_time.elapsed();

    info!("Time elapsed: {:?}", duration);
    info!("Memory used: {} bytes", end_memory.saturating_sub(start_memory));

    Ok(())
}
