use tracing::debug;

use crate::server::error::{AppResult, Error};

/// pull the `url` parameter out of a raw query string, form decoding it on the way
pub fn extract_url_param(raw_query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(raw_query?.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

/// turns the raw `url` parameter into an absolute http(s) url or explains why it can't
pub fn validate_target(raw: Option<&str>) -> AppResult<String> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(Error::MissingParameter);
    };

    // the query layer already decoded once, anything still hiding its scheme separator was
    // encoded twice by the client
    let decoded = if raw.contains("://") {
        raw.to_string()
    } else {
        urlencoding::decode(raw)
            .map(|s| s.into_owned())
            .map_err(|_| Error::MalformedUrl)?
    };

    let parsed = url::Url::parse(&decoded).map_err(|e| {
        debug!("rejecting target {}: {}", decoded, e);
        Error::MalformedUrl
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        debug!("rejecting target {}: unsupported scheme or no host", decoded);
        return Err(Error::MalformedUrl);
    }

    Ok(decoded)
}

/// percent-encode a url so it survives as a single query value
pub fn encode_param(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
