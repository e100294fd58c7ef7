use clap::Parser;
use log::LevelFilter;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use stress_survey::config::ReportConfig;
use stress_survey::form::tui::{FormApp, FormTerminal};
use stress_survey::telemetry::{init_logging, monitor_memory, usage_report};

#[derive(Parser, Debug)]
#[command(author, version, about = "Stress level questionnaire and CSV analysis form", long_about = None)]
struct Args {
    #[arg(short, long, default_value = ".", help = "Directory offered by the CSV file chooser")]
    dir: PathBuf,
    #[arg(short, long, help = "Directory for the rendered heatmap")]
    output_dir: Option<PathBuf>,
    #[arg(short, long, help = "TOML file with report settings")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    // Anything below warnings would draw over the form.
    init_logging(LevelFilter::Warn);

    let start_time = Instant::now();
    let start_memory = monitor_memory();

    let config =
        ReportConfig::load_or_default(args.config.as_deref())?.with_output_dir(args.output_dir);
    let mut form = FormTerminal::new(FormApp::new(config, args.dir))?;
    form.run().await?;
    drop(form);

    println!(
        "{}",
        usage_report(start_time.elapsed(), monitor_memory().saturating_sub(start_memory))
    );
    Ok(())
}
