use super::http::{self, HttpError};
use super::spark_client_models::{CaseOutcome, CaseStatus, RunOptions, RunSummary};
use crate::core::error::SparkError;
use crate::core::logger::Logger;
use crate::core::paths::{clean_path, response_path};
use spark_lib::{BuildError, Case, Config, RequestBuilder};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
enum CaseError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("Unable to write {}: {source}", clean_path(.path))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Runs every case of a config, one after another, saving each response body.
pub struct SparkClient<'a> {
    config: Config,
    options: RunOptions,
    logger: &'a Logger,
    http: reqwest::Client,
}

impl<'a> SparkClient<'a> {
    pub fn new(
        config: Config,
        options: RunOptions,
        logger: &'a Logger,
    ) -> Result<Self, SparkError> {
        Ok(Self {
            config,
            options,
            logger,
            http: http::build_client()?,
        })
    }

    /// A failed case is reported and the run moves on to the next one.
    pub async fn run(&self) -> RunSummary {
        self.logger.print(format!(
            "Running {} cases to {}",
            self.config.cases.len(),
            self.config.service
        ));

        let builder = RequestBuilder::new(&self.config).with_policy(self.options.missing);
        let mut summary = RunSummary::default();

        for (i, case) in self.config.cases.iter().enumerate() {
            let index = i + 1;
            let status = match self.run_case(&builder, case).await {
                Ok((file, http_status)) => {
                    self.logger.print(format!("{index} ✅: {}", case.path));
                    CaseStatus::Saved { file, http_status }
                }
                Err(error @ CaseError::Write { .. }) => {
                    self.logger.error(&error);
                    self.logger
                        .print(format!("{index} ❌ [FAILED WRITE]: {}", case.path));
                    CaseStatus::WriteFailed(error.to_string())
                }
                Err(error) => {
                    self.logger.error(&error);
                    self.logger.print(format!("{index} ❌: {}", case.path));
                    CaseStatus::Failed(error.to_string())
                }
            };
            summary.outcomes.push(CaseOutcome {
                index,
                name: case.name.clone(),
                path: case.path.clone(),
                status,
            });
        }

        summary
    }

    async fn run_case(
        &self,
        builder: &RequestBuilder<'_>,
        case: &Case,
    ) -> Result<(PathBuf, u16), CaseError> {
        let request = builder.build(case)?;
        for warning in &request.warnings {
            warn!("{warning}");
        }

        let start_time = Instant::now();
        let response = http::execute_request(&self.http, &request).await?;
        debug!(
            "Case '{}' answered {} in {} ms",
            case.name,
            response.status,
            start_time.elapsed().as_millis()
        );

        let file = response_path(&self.options.output_dir, &case.name);
        tokio::fs::write(&file, &response.body)
            .await
            .map_err(|source| CaseError::Write {
                path: file.clone(),
                source,
            })?;

        Ok((file, response.status))
    }
}
