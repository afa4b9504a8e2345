use std::time::Duration;

use crate::pool::Candidate;

use super::balance::check_balance;
use super::liveness::check_liveness;
use super::{KeyChecker, Verdict};

pub(crate) fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Checks keys against the provider's HTTP API, one blocking request per key.
///
/// Providers with a `balance_url` are judged by balance, the rest by a
/// one-token chat completion against `base_url`.
pub(crate) struct HttpChecker {
    agent: ureq::Agent,
}

impl HttpChecker {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
        }
    }
}

impl KeyChecker for HttpChecker {
    fn check(&self, candidate: &Candidate) -> Verdict {
        let endpoint = &candidate.endpoint;
        if let Some(url) = &endpoint.balance_url {
            return check_balance(&self.agent, url, &endpoint.balance_field, &candidate.key);
        }
        if let Some(base_url) = &endpoint.base_url {
            return check_liveness(&self.agent, base_url, &endpoint.model_name, &candidate.key);
        }
        Verdict::Transient("no endpoint configured".to_string())
    }
}
