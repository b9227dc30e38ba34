use anyhow::Result;
use langsplit::config::Config;
use langsplit::constants::{EXIT_FAILURE, EXIT_MALFORMED};
use langsplit::pipeline::{MalformedDocument, Pipeline, RunMode};
use langsplit::split::Splitter;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::from_cli();

    let default_level = if config.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(config) {
        eprintln!("Error: {e:#}");
        let code = if e.downcast_ref::<MalformedDocument>().is_some() {
            EXIT_MALFORMED
        } else {
            EXIT_FAILURE
        };
        std::process::exit(code);
    }
}

fn run(config: Config) -> Result<()> {
    let mode = if config.check {
        RunMode::Check
    } else if config.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Write
    };

    let mut pipeline = Pipeline::new();
    pipeline.expand_roots(&config.roots)?;
    pipeline.find_documents(&config.walk)?;
    pipeline.apply_excludes(&config.exclude)?;

    let splitter = Splitter::new(config.markers);
    let report = pipeline.run(&splitter, &config.outputs, mode)?;

    if report.skipped > 0 {
        eprintln!(
            "OK {} documents ({} regions), {} skipped",
            report.processed, report.regions, report.skipped
        );
    } else {
        eprintln!("OK {} documents ({} regions)", report.processed, report.regions);
    }
    Ok(())
}
