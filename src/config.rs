use crate::cli::Cli;
use crate::document::walk::WalkOptions;
use crate::io::output::OutputNames;
use crate::split::MarkerPair;
use clap::{CommandFactory, Parser, error::ErrorKind};
use globset::Glob;

/// Application configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct Config {
    pub roots: Vec<String>,
    pub markers: MarkerPair,
    pub walk: WalkOptions,
    pub outputs: OutputNames,
    pub exclude: Vec<String>,
    pub check: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Config {
    /// Parse CLI arguments into a Config, exiting with a usage error if they are inconsistent.
    pub fn from_cli() -> Self {
        Self::from_args(Cli::parse()).unwrap_or_else(|e| e.exit())
    }

    pub fn from_args(cli: Cli) -> Result<Self, clap::Error> {
        let markers = if cli.regex {
            MarkerPair::regex(&cli.start, &cli.end)
        } else {
            MarkerPair::literal(cli.start.as_str(), cli.end.as_str())
        };
        let markers =
            markers.map_err(|e| usage_error(ErrorKind::ValueValidation, e.to_string()))?;

        if cli.primary_name == cli.secondary_name {
            return Err(usage_error(
                ErrorKind::ArgumentConflict,
                format!(
                    "--primary-name and --secondary-name must differ (both are {:?})",
                    cli.primary_name
                ),
            ));
        }
        for name in [&cli.primary_name, &cli.secondary_name] {
            if *name == cli.source_name {
                return Err(usage_error(
                    ErrorKind::ArgumentConflict,
                    format!("output name {name:?} would overwrite the source document"),
                ));
            }
        }
        for name in [&cli.source_name, &cli.primary_name, &cli.secondary_name] {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(usage_error(
                    ErrorKind::ValueValidation,
                    format!("{name:?} is not a plain file name"),
                ));
            }
        }

        let any_valid = cli
            .exclude
            .iter()
            .any(|p| Glob::new(&p.replace('\\', "/")).is_ok());
        if !cli.exclude.is_empty() && !any_valid {
            return Err(usage_error(
                ErrorKind::ValueValidation,
                format!("every --exclude pattern was invalid: {:?}", cli.exclude),
            ));
        }

        Ok(Config {
            roots: cli.paths,
            markers,
            walk: WalkOptions {
                source_name: cli.source_name,
                standard_filters: !cli.no_ignore,
            },
            outputs: OutputNames {
                primary: cli.primary_name,
                secondary: cli.secondary_name,
            },
            exclude: cli.exclude,
            check: cli.check,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }
}

fn usage_error(
    kind: ErrorKind,
    message: String,
) -> clap::Error {
    Cli::command().error(kind, message)
}
