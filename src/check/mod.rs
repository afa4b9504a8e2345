//! Key checking
//!
//! A check never fails: network errors, odd status codes and unreadable
//! bodies all fold into a [`Verdict`].

mod balance;
mod http;
mod liveness;
mod status;

pub(crate) use http::HttpChecker;

use crate::pool::Candidate;

/// Outcome of checking one key
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict {
    /// Usable. `balance` is set when the provider reports one.
    Valid { balance: Option<f64> },
    /// Dead: remove from the credential file
    Invalid(String),
    /// Could not decide right now: keep the key, skip it this run
    Transient(String),
}

impl Verdict {
    pub(crate) fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }

    pub(crate) fn should_remove(&self) -> bool {
        matches!(self, Verdict::Invalid(_))
    }
}

/// Decides whether a candidate key is usable
pub(crate) trait KeyChecker {
    fn check(&self, candidate: &Candidate) -> Verdict;
}
