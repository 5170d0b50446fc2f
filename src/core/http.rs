use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

use crate::core::error::{LauncherError, LauncherResult};

const APP_USER_AGENT: &str = concat!("mc-launcher/", env!("CARGO_PKG_VERSION"));

/// Shared client for every fetch. No timeout is configured: a stalled server
/// stalls the operation, callers wrap it if they need a deadline.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}

/// GET `url` and return the body as text, failing on non-2xx.
pub async fn fetch_text(client: &Client, url: &str) -> LauncherResult<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LauncherError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}
