use crate::core::error::SparkError;
use spark_lib::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

pub const RESPONSE_EXTENSION: &str = "json";

pub fn clean_path(path: &Path) -> String {
    let s = path.display().to_string();
    #[cfg(windows)]
    {
        if let Some(stripped) = s.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }
    s
}

/// `-o/--output` wins over the config's `output`.
pub fn resolve_output_dir(
    cli: Option<&str>,
    config: Option<&str>,
) -> Result<PathBuf, SparkError> {
    match cli.or(config).map(str::trim) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Err(SparkError::MissingOutput),
    }
}

/// Removes anything at `dir` and creates it again, empty.
pub fn recreate_dir(dir: &Path) -> Result<(), SparkError> {
    let fail = |source| SparkError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };
    if dir.is_dir() {
        fs::remove_dir_all(dir).map_err(fail)?;
    } else if dir.exists() {
        fs::remove_file(dir).map_err(fail)?;
    }
    fs::create_dir_all(dir).map_err(fail)
}

pub fn response_path(dir: &Path, case_name: &str) -> PathBuf {
    dir.join(format!("{case_name}.{RESPONSE_EXTENSION}"))
}

/// Where `spark init` writes: directories get `spark.json` appended.
pub fn init_target(path: Option<&str>) -> PathBuf {
    match path {
        None => Path::new(".").join(DEFAULT_CONFIG_FILE),
        Some(raw) => {
            let path = PathBuf::from(raw);
            if path.is_dir() || raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR) {
                path.join(DEFAULT_CONFIG_FILE)
            } else {
                path
            }
        }
    }
}
