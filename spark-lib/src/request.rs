use crate::config::{Case, Config};
use crate::http_method::HttpMethod;
use crate::inject::{InjectError, Injector, MissingProperty};
use crate::json::{self, Value};
use crate::oauth1::{self, SignError, SignableRequest, Stamp};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Case '{case}': {source}")]
    Inject {
        case: String,
        #[source]
        source: InjectError,
    },
    #[error("Case '{case}': {source}")]
    Sign {
        case: String,
        #[source]
        source: SignError,
    },
}

/// Non-fatal findings while building a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    UnknownToken { case: String, token: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::UnknownToken { case, token } => write!(
                f,
                "No token found for key {token} in case '{case}', using default."
            ),
        }
    }
}

/// A fully resolved request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub name: String,
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub warnings: Vec<BuildWarning>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub struct RequestBuilder<'a> {
    config: &'a Config,
    injector: Injector<'a>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            injector: Injector::new(&config.properties),
        }
    }

    pub fn with_policy(mut self, policy: MissingProperty) -> Self {
        self.injector = self.injector.with_policy(policy);
        self
    }

    pub fn build(&self, case: &Case) -> Result<PreparedRequest, BuildError> {
        self.build_with_stamp(case, &Stamp::fresh())
    }

    /// Same as [`build`](Self::build) with a caller-provided nonce and timestamp.
    pub fn build_with_stamp(
        &self,
        case: &Case,
        stamp: &Stamp,
    ) -> Result<PreparedRequest, BuildError> {
        let inject_err = |source| BuildError::Inject {
            case: case.name.clone(),
            source,
        };

        let path = self.injector.inject_str(&case.path).map_err(inject_err)?;
        let mut url = join_path(&self.config.service, &path);

        let params = self.injector.inject_map(&case.params).map_err(inject_err)?;
        apply_query(&mut url, &params);

        let defaults = self
            .injector
            .inject_map(&self.config.headers)
            .map_err(inject_err)?;
        let overrides = self.injector.inject_map(&case.headers).map_err(inject_err)?;
        let mut headers = merge_headers(&defaults, &overrides);

        let body = match &case.body {
            Some(value) => {
                let value = self.injector.inject_value(value).map_err(inject_err)?;
                Some(encode_body(&value, &mut headers))
            }
            None => None,
        };

        let mut warnings = Vec::new();
        if let Some(oauth) = &self.config.oauth {
            let choice = oauth.select_token(case.token.as_deref());
            if let Some(token) = choice.unresolved {
                warnings.push(BuildWarning::UnknownToken {
                    case: case.name.clone(),
                    token,
                });
            }
            let request = SignableRequest {
                method: case.method.as_str(),
                url: &url,
                content_type: find_header(&headers, CONTENT_TYPE),
                body: body.as_deref(),
            };
            let authorization = oauth1::sign(&request, &oauth.consumer, choice.credential, stamp)
                .map_err(|source| BuildError::Sign {
                    case: case.name.clone(),
                    source,
                })?;
            set_header(&mut headers, AUTHORIZATION, authorization);
        }

        Ok(PreparedRequest {
            name: case.name.clone(),
            method: case.method,
            url,
            headers,
            body,
            warnings,
        })
    }
}

/// Appends `path` to the service URL as a relative component.
fn join_path(service: &Url, path: &str) -> Url {
    let mut url = service.clone();
    let relative = path.trim_start_matches('/');
    if !relative.is_empty() {
        let base = service.path().trim_end_matches('/');
        url.set_path(&format!("{base}/{relative}"));
    }
    url
}

/// Case params replace same-named items already in the URL.
fn apply_query(url: &mut Url, params: &BTreeMap<String, String>) {
    if params.is_empty() {
        return;
    }
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !params.contains_key(key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(params.iter())
        .extend_pairs(kept);
}

fn find_header<'h>(headers: &'h [(String, String)], name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers
        .iter()
        .position(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        Some(i) => headers[i] = (name.to_string(), value),
        None => headers.push((name.to_string(), value)),
    }
}

fn merge_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    for (key, value) in overrides {
        match merged
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(key))
        {
            Some(i) => merged[i] = (key.clone(), value.clone()),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}

/// Encodes the body for its declared content type, defaulting to JSON.
fn encode_body(value: &Value, headers: &mut Vec<(String, String)>) -> Vec<u8> {
    let form = find_header(headers, CONTENT_TYPE).is_some_and(oauth1::is_form_encoded);
    match value {
        Value::Object(map) if form => {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, member) in map {
                match member {
                    Value::String(text) => serializer.append_pair(key, text),
                    other => serializer.append_pair(key, &other.to_string()),
                };
            }
            serializer.finish().into_bytes()
        }
        Value::String(text) if form => text.clone().into_bytes(),
        _ => {
            if find_header(headers, CONTENT_TYPE).is_none() {
                headers.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
            }
            json::encode(value)
        }
    }
}
