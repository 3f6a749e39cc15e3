//! Single-legged OAuth1 request signing (HMAC-SHA1).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const VERSION: &str = "1.0";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub key: String,
    pub secret: String,
}

impl Credential {
    pub fn new(key: &str, secret: &str) -> Self {
        Self {
            key: key.to_string(),
            secret: secret.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuth {
    pub consumer: Credential,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<BTreeMap<String, Credential>>,
}

/// The token credential picked for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChoice<'a> {
    pub credential: Option<&'a Credential>,
    /// Set when the case named a token id that is not configured.
    pub unresolved: Option<String>,
}

impl OAuth {
    /// Named tokens win; an unknown id falls back to the default token.
    pub fn select_token(&self, token_id: Option<&str>) -> TokenChoice<'_> {
        let Some(id) = token_id else {
            return TokenChoice {
                credential: self.token.as_ref(),
                unresolved: None,
            };
        };
        match self.tokens.as_ref().and_then(|tokens| tokens.get(id)) {
            Some(credential) => TokenChoice {
                credential: Some(credential),
                unresolved: None,
            },
            None => TokenChoice {
                credential: self.token.as_ref(),
                unresolved: Some(id.to_string()),
            },
        }
    }
}

/// Per-signature nonce and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub nonce: String,
    pub timestamp: i64,
}

impl Stamp {
    pub fn new(nonce: &str, timestamp: i64) -> Self {
        Self {
            nonce: nonce.to_string(),
            timestamp,
        }
    }

    pub fn fresh() -> Self {
        Self {
            nonce: Uuid::new_v4().simple().to_string(),
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// The parts of an outbound request that take part in the signature.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub url: &'a Url,
    pub content_type: Option<&'a str>,
    pub body: Option<&'a [u8]>,
}

impl SignableRequest<'_> {
    fn form_body(&self) -> Option<&[u8]> {
        match self.content_type {
            Some(content_type) if is_form_encoded(content_type) => self.body,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    #[error("Unable to initialise HMAC-SHA1 with the signing key")]
    InvalidKey,
}

pub fn is_form_encoded(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with(FORM_CONTENT_TYPE)
}

/// RFC 3986 percent-encoding: only `A-Z a-z 0-9 - . _ ~` pass through.
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Scheme, host, non-default port and path; no query or fragment.
pub fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
        None => format!("{}://{host}{}", url.scheme(), url.path()),
    }
}

pub fn protocol_params(
    consumer: &Credential,
    token: Option<&Credential>,
    stamp: &Stamp,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("oauth_consumer_key".to_string(), consumer.key.clone()),
        ("oauth_nonce".to_string(), stamp.nonce.clone()),
        (
            "oauth_signature_method".to_string(),
            SIGNATURE_METHOD.to_string(),
        ),
        ("oauth_timestamp".to_string(), stamp.timestamp.to_string()),
        ("oauth_version".to_string(), VERSION.to_string()),
    ];
    if let Some(token) = token {
        params.push(("oauth_token".to_string(), token.key.clone()));
    }
    params
}

/// Protocol, query and form parameters, encoded, sorted and joined with `&`.
pub fn parameter_string(request: &SignableRequest<'_>, protocol: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = protocol
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();

    pairs.extend(
        request
            .url
            .query_pairs()
            .map(|(key, value)| (percent_encode(&key), percent_encode(&value))),
    );

    if let Some(body) = request.form_body() {
        pairs.extend(
            url::form_urlencoded::parse(body)
                .map(|(key, value)| (percent_encode(&key), percent_encode(&value))),
        );
    }

    pairs.sort();
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn signature_base_string(
    request: &SignableRequest<'_>,
    protocol: &[(String, String)],
) -> String {
    format!(
        "{}&{}&{}",
        request.method.to_ascii_uppercase(),
        percent_encode(&base_url(request.url)),
        percent_encode(&parameter_string(request, protocol))
    )
}

pub fn signing_key(consumer: &Credential, token: Option<&Credential>) -> String {
    let token_secret = token.map(|t| t.secret.as_str()).unwrap_or_default();
    format!(
        "{}&{}",
        percent_encode(&consumer.secret),
        percent_encode(token_secret)
    )
}

pub fn signature(
    base_string: &str,
    consumer: &Credential,
    token: Option<&Credential>,
) -> Result<String, SignError> {
    let key = signing_key(consumer, token);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| SignError::InvalidKey)?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Computes the `Authorization` header value for `request`.
pub fn sign(
    request: &SignableRequest<'_>,
    consumer: &Credential,
    token: Option<&Credential>,
    stamp: &Stamp,
) -> Result<String, SignError> {
    let mut params = protocol_params(consumer, token, stamp);
    let base_string = signature_base_string(request, &params);
    params.push((
        "oauth_signature".to_string(),
        signature(&base_string, consumer, token)?,
    ));
    params.sort();

    let fields = params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference request from Twitter's "Creating a signature" walkthrough.
    const TWITTER_URL: &str = "https://api.twitter.com/1.1/statuses/update.json?include_entities=true";
    const TWITTER_BODY: &[u8] =
        b"status=Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21";

    fn twitter_consumer() -> Credential {
        Credential::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        )
    }

    fn twitter_token() -> Credential {
        Credential::new(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    fn twitter_stamp() -> Stamp {
        Stamp::new("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg", 1318622958)
    }

    fn twitter_request(url: &Url) -> SignableRequest<'_> {
        SignableRequest {
            method: "post",
            url,
            content_type: Some(FORM_CONTENT_TYPE),
            body: Some(TWITTER_BODY),
        }
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("AZaz09-._~"), "AZaz09-._~");
        assert_eq!(percent_encode("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
        assert_eq!(percent_encode("☃"), "%E2%98%83");
    }

    #[test]
    fn test_base_url() {
        let url = Url::parse("HTTPS://Example.COM:443/a/b?x=1#frag").unwrap();
        assert_eq!(base_url(&url), "https://example.com/a/b");
        let url = Url::parse("http://example.com:8080/").unwrap();
        assert_eq!(base_url(&url), "http://example.com:8080/");
    }

    #[test]
    fn test_reference_base_string() {
        let url = Url::parse(TWITTER_URL).unwrap();
        let request = twitter_request(&url);
        let consumer = twitter_consumer();
        let token = twitter_token();
        let params = protocol_params(&consumer, Some(&token), &twitter_stamp());

        assert_eq!(
            signature_base_string(&request, &params),
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn test_reference_signature() {
        let url = Url::parse(TWITTER_URL).unwrap();
        let consumer = twitter_consumer();
        let token = twitter_token();
        let params = protocol_params(&consumer, Some(&token), &twitter_stamp());
        let base = signature_base_string(&twitter_request(&url), &params);

        assert_eq!(
            signing_key(&consumer, Some(&token)),
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw&LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"
        );
        assert_eq!(
            signature(&base, &consumer, Some(&token)).unwrap(),
            "hCtSmYh+iHYCEqBWrE7C7hYmtUk="
        );
    }

    #[test]
    fn test_reference_authorization_header() {
        let url = Url::parse(TWITTER_URL).unwrap();
        let header = sign(
            &twitter_request(&url),
            &twitter_consumer(),
            Some(&twitter_token()),
            &twitter_stamp(),
        )
        .unwrap();

        assert_eq!(
            header,
            "OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", \
             oauth_nonce=\"kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg\", \
             oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\", \
             oauth_signature_method=\"HMAC-SHA1\", \
             oauth_timestamp=\"1318622958\", \
             oauth_token=\"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\", \
             oauth_version=\"1.0\""
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let url = Url::parse("http://x.test/p?q=a b").unwrap();
        let request = SignableRequest {
            method: "GET",
            url: &url,
            content_type: None,
            body: None,
        };
        let consumer = Credential::new("ck", "cs");
        let stamp = Stamp::new("nonce", 1);
        let first = sign(&request, &consumer, None, &stamp).unwrap();
        let second = sign(&request, &consumer, None, &stamp).unwrap();
        assert_eq!(first, second);
        assert!(!first.contains("oauth_token"));
    }

    #[test]
    fn test_json_body_is_not_signed() {
        let url = Url::parse("http://x.test/p").unwrap();
        let consumer = Credential::new("ck", "cs");
        let params = protocol_params(&consumer, None, &Stamp::new("n", 1));
        let request = SignableRequest {
            method: "POST",
            url: &url,
            content_type: Some("application/json"),
            body: Some(br#"{"a":"b"}"#),
        };
        let base = signature_base_string(&request, &params);
        assert!(!base.contains("%7B"));
        assert!(base.ends_with("oauth_version%3D1.0"));
    }

    #[test]
    fn test_query_space_encodes_as_percent_20() {
        let url = Url::parse("http://x.test/search?q=hello+world").unwrap();
        let request = SignableRequest {
            method: "GET",
            url: &url,
            content_type: None,
            body: None,
        };
        let params = parameter_string(&request, &[]);
        assert_eq!(params, "q=hello%20world");
    }

    #[test]
    fn test_signing_key_without_token() {
        let consumer = Credential::new("ck", "c&s");
        assert_eq!(signing_key(&consumer, None), "c%26s&");
    }

    #[test]
    fn test_select_token() {
        let mut tokens = BTreeMap::new();
        tokens.insert("admin".to_string(), Credential::new("admin-key", "admin-secret"));
        let oauth = OAuth {
            consumer: Credential::new("ck", "cs"),
            token: Some(Credential::new("tk", "ts")),
            tokens: Some(tokens),
        };

        let choice = oauth.select_token(None);
        assert_eq!(choice.credential.map(|c| c.key.as_str()), Some("tk"));
        assert_eq!(choice.unresolved, None);

        let choice = oauth.select_token(Some("admin"));
        assert_eq!(choice.credential.map(|c| c.key.as_str()), Some("admin-key"));
        assert_eq!(choice.unresolved, None);

        let choice = oauth.select_token(Some("ghost"));
        assert_eq!(choice.credential.map(|c| c.key.as_str()), Some("tk"));
        assert_eq!(choice.unresolved.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_is_form_encoded() {
        assert!(is_form_encoded("application/x-www-form-urlencoded"));
        assert!(is_form_encoded("Application/X-WWW-Form-Urlencoded; charset=utf-8"));
        assert!(!is_form_encoded("application/json"));
    }
}
