use crate::client::{CaseStatus, RunOptions, SparkClient};
use crate::commands::validators;
use crate::core::error::SparkError;
use crate::core::logger::Logger;
use crate::core::paths::{clean_path, recreate_dir, resolve_output_dir};
use clap::Args;
use spark_lib::{Config, MissingProperty, Properties, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value_t = format!("./{DEFAULT_CONFIG_FILE}"),
        help = "Path to the spark config file"
    )]
    pub config: String,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory for response files, replaces the config's output. Emptied before each run",
        value_parser = validators::validate_output_dir
    )]
    pub output: Option<String>,

    #[arg(
        short = 'p',
        long = "property",
        value_name = "NAME=VALUE",
        help = "Override config properties",
        value_parser = validators::validate_property
    )]
    pub property: Vec<String>,

    #[arg(long = "strict", help = "Fail a case when a placeholder has no property")]
    pub strict: bool,
}

impl RunArgs {
    pub fn missing_property(&self) -> MissingProperty {
        if self.strict {
            MissingProperty::Fail
        } else {
            MissingProperty::Blank
        }
    }
}

/// Splits `NAME=VALUE` pairs; later pairs win.
pub fn parse_properties(pairs: &[String]) -> Properties {
    pairs
        .iter()
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

pub async fn execute_run(args: &RunArgs, logger: &Logger) -> Result<(), SparkError> {
    let config_path = Path::new(&args.config);
    debug!("Loading config from {}", clean_path(config_path));
    let config = Config::load(config_path)?.with_properties(parse_properties(&args.property));

    let output_dir: PathBuf =
        resolve_output_dir(args.output.as_deref(), config.output.as_deref())?;
    recreate_dir(&output_dir)?;

    let options = RunOptions {
        output_dir: output_dir.clone(),
        missing: args.missing_property(),
    };
    let client = SparkClient::new(config, options, logger)?;
    let summary = client.run().await;

    for outcome in &summary.outcomes {
        match &outcome.status {
            CaseStatus::Saved { file, http_status } => debug!(
                "{} '{}' ({}) -> {http_status}, saved to {}",
                outcome.index,
                outcome.name,
                outcome.path,
                clean_path(file)
            ),
            CaseStatus::Failed(reason) | CaseStatus::WriteFailed(reason) => debug!(
                "{} '{}' ({}) failed: {reason}",
                outcome.index, outcome.name, outcome.path
            ),
        }
    }

    logger.info(format!(
        "💥 Responses saved to {} ({} succeeded, {} failed)",
        clean_path(&output_dir),
        summary.succeeded(),
        summary.failed()
    ));
    Ok(())
}
