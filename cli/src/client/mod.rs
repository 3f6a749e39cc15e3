mod http;
mod spark_client;
mod spark_client_models;

pub use spark_client::SparkClient;
pub use spark_client_models::{CaseStatus, RunOptions};
