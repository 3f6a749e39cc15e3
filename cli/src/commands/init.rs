use crate::core::error::SparkError;
use crate::core::logger::Logger;
use crate::core::paths::{clean_path, init_target};
use clap::Args;
use spark_lib::Config;
use std::fs;
use tracing::debug;

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(help = "File or directory to write the config to [default: ./spark.json]")]
    pub path: Option<String>,

    #[arg(short = 'f', long = "force", help = "Replace an existing config file")]
    pub force: bool,
}

pub fn execute_init(args: &InitArgs, logger: &Logger) -> Result<(), SparkError> {
    let target = init_target(args.path.as_deref());
    if target.exists() && !args.force {
        return Err(SparkError::ConfigExists(target));
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&Config::template()?)?;
    fs::write(&target, content)?;
    debug!("Wrote config template to {}", clean_path(&target));

    logger.info(format!(
        "💥 Created spark config file {}. Update then run spark",
        clean_path(&target)
    ));
    Ok(())
}
