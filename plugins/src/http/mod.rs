mod error;

pub use error::HttpError;

use serde_json::Value;

use error::preview_body;

/// Shared `reqwest` client for the REST providers.
pub fn build_client(timeout_ms: u64, user_agent: Option<&str>) -> anyhow::Result<reqwest::Client> {
    let mut builder =
        reqwest::Client::builder().timeout(std::time::Duration::from_millis(timeout_ms));
    if let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) {
        builder = builder.user_agent(ua.to_string());
    }
    Ok(builder.build()?)
}

pub(crate) async fn send(req: reqwest::RequestBuilder, url: &str) -> anyhow::Result<reqwest::Response> {
    req.send()
        .await
        .map_err(|err| HttpError::transport(err, url.to_string()).into())
}

/// Decode a JSON body; any non-2xx status is an error.
pub(crate) async fn parse_json_response(resp: reqwest::Response) -> anyhow::Result<Value> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| HttpError::transport(err, url.clone()))?;

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(HttpError::NotFound { url }.into());
    }

    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            url,
            body: preview_body(&body),
        }
        .into());
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(&body).map_err(|source| {
        HttpError::Decode {
            url,
            body: preview_body(&body),
            source,
        }
        .into()
    })
}

/// Like [`parse_json_response`], but a 404 is `Ok(None)`.
pub(crate) async fn parse_optional_json(resp: reqwest::Response) -> anyhow::Result<Option<Value>> {
    match parse_json_response(resp).await {
        Ok(v) => Ok(Some(v)),
        Err(err) if is_not_found(&err) => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<HttpError>()
        .is_some_and(|e| matches!(e, HttpError::NotFound { .. }))
}
