use crate::http_method::HttpMethod;
use crate::inject::Properties;
use crate::json::{NodePath, Value};
use crate::oauth1::{Credential, OAuth};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "spark.json";

const TEMPLATE_SERVICE: &str = "http://api.myservice.com";
const TEMPLATE_OUTPUT: &str = "./SparkResponses";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        ConfigError::Parse {
            path: NodePath(error.path()).to_string(),
            source: error.into_inner(),
        }
    }
}

/// A loaded config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub service: Url,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuth>,
    pub cases: Vec<Case>,
}

/// One named request template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Case {
    pub fn new(name: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            body: None,
            token: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let config: Config = serde_path_to_error::deserialize(&mut deserializer)?;
        deserializer.end().map_err(|source| ConfigError::Parse {
            path: "$".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.service.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "service '{}' must be an http or https URL",
                self.service
            )));
        }

        let mut seen = HashSet::new();
        for (index, case) in self.cases.iter().enumerate() {
            if case.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "cases[{index}].name must not be empty"
                )));
            }
            if case.name == "." || case.name == ".." || case.name.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "cases[{index}].name '{}' cannot be used as a file name",
                    case.name
                )));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "cases[{index}].name '{}' is used by more than one case",
                    case.name
                )));
            }
        }

        Ok(())
    }

    /// Overlays `overrides` on top of the document's properties.
    pub fn with_properties(mut self, overrides: Properties) -> Self {
        self.properties.extend(overrides);
        self
    }

    /// The document written by `spark init`.
    pub fn template() -> Result<Self, ConfigError> {
        let service = Url::parse(TEMPLATE_SERVICE)
            .map_err(|e| ConfigError::Invalid(format!("template service URL: {e}")))?;

        let mut headers = BTreeMap::new();
        headers.insert("x-service-header".to_string(), "header-value".to_string());

        Ok(Self {
            service,
            headers,
            output: Some(TEMPLATE_OUTPUT.to_string()),
            properties: Properties::new(),
            oauth: Some(OAuth {
                consumer: Credential::new("consumer-key", "consumer-secret"),
                token: Some(Credential::new("token-key", "token-secret")),
                tokens: None,
            }),
            cases: vec![Case::new("test-case-one", HttpMethod::GET, "/v1/endpoint")],
        })
    }
}
