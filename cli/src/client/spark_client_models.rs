use spark_lib::MissingProperty;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub missing: MissingProperty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Saved { file: PathBuf, http_status: u16 },
    Failed(String),
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub index: usize,
    pub name: String,
    pub path: String,
    pub status: CaseStatus,
}

impl CaseOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, CaseStatus::Saved { .. })
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<CaseOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}
