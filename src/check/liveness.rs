//! Liveness check: a one-token chat completion

use std::time::Instant;

use serde_json::json;

use super::Verdict;
use super::status::{StatusClass, classify_status, status_reason};

pub(super) fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

pub(super) fn check_liveness(agent: &ureq::Agent, base_url: &str, model: &str, key: &str) -> Verdict {
    let url = chat_completions_url(base_url);
    let body = json!({
        "model": model,
        "messages": [{"role": "user", "content": "hi"}],
        "max_tokens": 1,
    });

    let start = Instant::now();
    let result = agent
        .post(&url)
        .header("Authorization", format!("Bearer {key}"))
        .send_json(&body);

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(%url, error = %e, "liveness request failed");
            return Verdict::Transient(format!("request failed: {e}"));
        }
    };

    let status = response.status().as_u16();
    tracing::debug!(
        %url,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "liveness response"
    );

    match classify_status(status) {
        StatusClass::Ok => Verdict::Valid { balance: None },
        StatusClass::Remove => Verdict::Invalid(status_reason(status)),
        StatusClass::Keep => Verdict::Transient(status_reason(status)),
    }
}
