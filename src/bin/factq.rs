//! factq CLI: factorial of every integer line in a file, written in input order.

use clap::{CommandFactory, Parser};
use factq::config::{Config, parse_worker_count};
use factq::pipeline::{Pipeline, PipelineConfig};
use factq::telemetry::{TelemetryConfig, init_telemetry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "factq",
    about = "Compute factorials of integer lines in parallel, preserving line order",
    allow_negative_numbers = true
)]
struct Cli {
    /// Number of worker tasks
    worker_count: Option<i64>,
    /// File to read, one record per line
    input: Option<PathBuf>,
    /// Where to write the results (default: $FACTQ_OUTPUT or out.txt)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (Some(worker_count), Some(input)) = (cli.worker_count, cli.input) else {
        println!("{}", Cli::command().render_usage());
        return Ok(());
    };

    let worker_count = match parse_worker_count(worker_count) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("{e}");
            return Ok(());
        }
    };

    let config = Config::from_env()?.with_output(cli.output);

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "factq".to_string(),
        log_level: config.log_level.clone(),
    })?;

    let pipeline = Pipeline::new(PipelineConfig {
        worker_count: worker_count.get(),
    })?;

    let summary = pipeline.run_files(&input, &config.output_path).await?;
    info!(
        run_id = %summary.run_id,
        records = summary.records,
        output = %config.output_path.display(),
        "done"
    );

    Ok(())
}
