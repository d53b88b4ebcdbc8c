const BODY_PREVIEW_LIMIT: usize = 512;

/// Failure talking to a Taskcluster or Treeherder REST endpoint.
#[derive(thiserror::Error, Debug)]
pub enum HttpError {
    #[error("{phase} error for {url}: {source}")]
    Transport {
        phase: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("not found: {url}")]
    NotFound { url: String },
    #[error("status {status} from {url}: {body}")]
    Status { status: u16, url: String, body: String },
    #[error("undecodable body from {url}: {source} | body={body}")]
    Decode {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::NotFound { .. } => Some(404),
            Self::Status { status, .. } => Some(*status),
            Self::Decode { .. } => None,
        }
    }

    pub(crate) fn transport(source: reqwest::Error, url: String) -> Self {
        let phase = if source.is_timeout() {
            "timeout"
        } else if source.is_connect() {
            "connect"
        } else {
            "request"
        };
        Self::Transport { phase, url, source }
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        out.push_str("...");
    }
    out
}
