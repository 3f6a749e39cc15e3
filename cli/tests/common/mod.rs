#![allow(dead_code)]
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn spark_bin() -> &'static str {
    env!("CARGO_BIN_EXE_spark")
}

pub fn spark_cmd() -> Command {
    let mut cmd = Command::new(spark_bin());
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn spark_async_cmd() -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(spark_bin());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Writes `spark.json` into `dir` with `service` pointing at a test server.
pub fn write_config(dir: &Path, service: &str, rest: &str) -> PathBuf {
    let path = dir.join("spark.json");
    let content = format!(r#"{{"service": "{service}", {rest}}}"#);
    fs::write(&path, content).expect("Failed to write config");
    path
}

pub fn read_response(dir: &Path, case: &str) -> String {
    fs::read_to_string(dir.join(format!("{case}.json")))
        .unwrap_or_else(|e| panic!("Missing response file for {case}: {e}"))
}
