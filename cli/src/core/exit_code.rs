use crate::core::error::SparkError;
use spark_lib::ConfigError;

/// Exit codes for the spark CLI
/// Following standard Unix/POSIX conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    /// Success, including runs where individual cases failed
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Configuration error (malformed or invalid config, bad flags)
    ConfigError = 3,
    /// File, directory or IO error
    FileError = 4,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<&SparkError> for ExitCode {
    fn from(error: &SparkError) -> Self {
        match error {
            SparkError::Io(_) | SparkError::OutputDir { .. } => ExitCode::FileError,
            SparkError::Config(ConfigError::Read { .. }) => ExitCode::FileError,
            SparkError::Config(_) | SparkError::MissingOutput | SparkError::ConfigExists(_) => {
                ExitCode::ConfigError
            }
            SparkError::Serialize(_) | SparkError::Client(_) => ExitCode::GeneralError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::GeneralError.code(), 1);
        assert_eq!(ExitCode::ConfigError.code(), 3);
        assert_eq!(ExitCode::FileError.code(), 4);
    }

    #[test]
    fn test_from_error() {
        let read = SparkError::Config(ConfigError::Read {
            path: "spark.json".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(ExitCode::from(&read), ExitCode::FileError);

        let invalid = SparkError::Config(ConfigError::Invalid("dup".to_string()));
        assert_eq!(ExitCode::from(&invalid), ExitCode::ConfigError);

        assert_eq!(
            ExitCode::from(&SparkError::MissingOutput),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from(&SparkError::ConfigExists(PathBuf::from("x"))),
            ExitCode::ConfigError
        );
        let dir = SparkError::OutputDir {
            path: PathBuf::from("out"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(ExitCode::from(&dir), ExitCode::FileError);
    }
}
