//! tcgameta — GDC sample/clinical metadata cleaner.
//! Entry point for the `tcgameta` binary.

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    // .env may set TCGAMETA_CONFIG / RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tcgameta=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("tcgameta v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.resolve_config()?;
    info!(
        "Sample sheet: {}, clinical sheet: {}, output: {}",
        config.input.file_sheet.display(),
        config.input.clinical_sheet.display(),
        config.output.path.display()
    );

    let report = tcgameta_pipeline::run_pipeline(&config).context("Metadata pipeline failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(
            "✅ Run {} done: {} of {} joined rows kept ({} without grades, {} duplicates) in {}ms",
            report.run_id,
            report.stats.output_rows,
            report.stats.joined_rows,
            report.stats.incomplete_rows_dropped,
            report.stats.duplicate_rows_dropped,
            report.duration_ms
        );
    }

    Ok(())
}
