//! Balance check: ask the provider how much credit a key has left

use std::time::Instant;

use serde_json::Value;

use crate::utils::{get_path, value_as_f64};

use super::Verdict;
use super::status::{StatusClass, classify_status, status_reason};

/// Read the balance at `field` from a balance response.
pub(super) fn parse_balance(body: &Value, field: &str) -> Verdict {
    let Some(raw) = get_path(body, field) else {
        return Verdict::Invalid(format!("no '{field}' in balance response"));
    };
    match value_as_f64(raw) {
        Some(balance) if balance > 0.0 => Verdict::Valid {
            balance: Some(balance),
        },
        Some(balance) => Verdict::Invalid(format!("insufficient balance ({balance})")),
        None => Verdict::Invalid(format!("unreadable balance: {raw}")),
    }
}

pub(super) fn check_balance(agent: &ureq::Agent, url: &str, field: &str, key: &str) -> Verdict {
    let start = Instant::now();
    let result = agent
        .get(url)
        .header("Authorization", format!("Bearer {key}"))
        .call();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(%url, error = %e, "balance request failed");
            return Verdict::Transient(format!("request failed: {e}"));
        }
    };

    let status = response.status().as_u16();
    tracing::debug!(
        %url,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "balance response"
    );

    match classify_status(status) {
        StatusClass::Ok => {}
        StatusClass::Remove => return Verdict::Invalid(status_reason(status)),
        StatusClass::Keep => return Verdict::Transient(status_reason(status)),
    }

    let mut body = response.into_body();
    match serde_json::from_reader::<_, Value>(body.as_reader()) {
        Ok(json) => parse_balance(&json, field),
        Err(e) => Verdict::Transient(format!("unreadable balance response: {e}")),
    }
}
