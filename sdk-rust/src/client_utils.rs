use crate::{LanguageModelError, LanguageModelResult};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

/// Turn caller supplied extra headers into a `HeaderMap`, naming `provider`
/// in the error when a name or value is not valid HTTP.
pub fn extra_headers(
    provider: &str,
    extra: &HashMap<String, String>,
) -> LanguageModelResult<HeaderMap> {
    extra
        .iter()
        .map(|(name, value)| -> LanguageModelResult<(HeaderName, HeaderValue)> {
            let invalid = |what: &str| {
                LanguageModelError::InvalidInput(format!("{provider} header {what} {name:?}"))
            };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid("name"))?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid("value for"))?;
            Ok((name, value))
        })
        .collect()
}

/// POST `body` as JSON and decode the JSON reply. Any non-2xx status is an
/// error carrying the reply text.
///
/// Transport errors are stripped of the request URL, which may carry an API
/// key in its query string.
pub async fn post_json<B, R>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    body: &B,
) -> LanguageModelResult<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LanguageModelError::StatusCode { status, body });
    }

    Ok(response.json().await.map_err(reqwest::Error::without_url)?)
}
