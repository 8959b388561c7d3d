use std::sync::Arc;
use clap::Parser;
use filebench::bench::Driver;
use filebench::cli::Cli;
use filebench::io::PlatformDiskIO;
use filebench::report::{self, LogSink};
use filebench::Result;
use tracing::error;

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;
    let driver = Driver::new(config)?;

    let sink = Arc::new(LogSink);
    let reports = driver.run(Arc::new(PlatformDiskIO::new()), sink.clone()).await?;

    report::print_final_reports(&reports, sink.as_ref());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    report::init_logging(cli.verbosity());

    if let Err(e) = run(&cli).await {
        error!("{}", e);
        // Exit without waiting for workers still blocked on disk I/O
        std::process::exit(1);
    }
}
