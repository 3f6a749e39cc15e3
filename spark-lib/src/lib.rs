//! Request construction for spark: the JSON value model, `<key>` property
//! injection, OAuth1 signing and the builder that turns a config case into a
//! ready-to-send request. Nothing here performs network I/O.

pub mod config;
pub mod http_method;
pub mod inject;
pub mod json;
pub mod oauth1;
pub mod request;

pub use config::{Case, Config, ConfigError, DEFAULT_CONFIG_FILE};
pub use http_method::HttpMethod;
pub use inject::{inject, inject_value, InjectError, Injector, MissingProperty, Properties};
pub use json::{decode, encode, DecodeError, Value};
pub use oauth1::{Credential, OAuth, Stamp};
pub use request::{BuildError, BuildWarning, PreparedRequest, RequestBuilder};
