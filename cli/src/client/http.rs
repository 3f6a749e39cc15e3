use spark_lib::{HttpMethod, PreparedRequest};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
#[error("HTTP Error: {0}")]
pub struct HttpError(#[from] reqwest::Error);

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
    }
}

pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(crate::core::version::user_agent())
        .build()
}

/// Sends the request and returns the raw response bytes, whatever the status.
pub async fn execute_request(
    client: &reqwest::Client,
    request: &PreparedRequest,
) -> Result<HttpResponse, HttpError> {
    debug!(
        "Executing {} request '{}' to URL: {}",
        request.method, request.name, request.url
    );

    let mut req_builder = client.request(to_reqwest_method(request.method), request.url.clone());

    for (key, value) in &request.headers {
        debug!("Adding header: {key}: {value}");
        req_builder = req_builder.header(key, value);
    }

    if let Some(body) = &request.body {
        req_builder = req_builder.body(body.clone());
    }

    let response = req_builder.send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?.to_vec();

    debug!("Response status: {status} ({} bytes)", body.len());

    Ok(HttpResponse { status, body })
}
