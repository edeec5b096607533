use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("subwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) attempts: usize,
    pub(crate) retry_delay: Duration,
}

#[derive(Debug, Error)]
pub(crate) enum HttpError {
    #[error("request failed: {0}")]
    Rejected(String),
    #[error("request failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: usize, last: String },
    #[error("request failed: response decode failed: {0}")]
    Decode(#[source] std::io::Error),
}

fn should_retry_http_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

fn describe_status(status: u16, response: ureq::Response) -> String {
    let body = response.into_string().unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP status {status}")
    } else {
        let truncated = body.chars().take(240).collect::<String>();
        format!("HTTP status {status} ({truncated})")
    }
}

/// GETs `url` as text. Throttling, server errors and transport failures are
/// retried up to `policy.attempts` times; other statuses fail immediately.
pub(crate) fn get_text_with_retries(url: &str, policy: &RetryPolicy) -> Result<String, HttpError> {
    let attempts = policy.attempts.max(1);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(policy.connect_timeout)
        .timeout_read(policy.read_timeout)
        .timeout_write(policy.read_timeout)
        .user_agent(USER_AGENT)
        .build();

    let mut last = String::from("no attempt made");
    for attempt in 1..=attempts {
        debug!(url, attempt, "requesting feed");
        match agent.get(url).call() {
            Ok(response) => return response.into_string().map_err(HttpError::Decode),
            Err(ureq::Error::Status(status, response)) => {
                let described = describe_status(status, response);
                if !should_retry_http_status(status) {
                    return Err(HttpError::Rejected(described));
                }
                last = described;
            }
            Err(ureq::Error::Transport(err)) => {
                last = format!("transport error: {err}");
            }
        }

        if attempt < attempts {
            warn!(url, attempt, error = %last, "retrying request");
            thread::sleep(policy.retry_delay);
        }
    }

    Err(HttpError::Exhausted { attempts, last })
}
