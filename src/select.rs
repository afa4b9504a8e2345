//! Choosing which key to activate
//!
//! `order`, `reverse` and `random` stop at the first valid key.
//! `best` checks every key and takes the highest reported balance.
//! `pick` checks every key and leaves the choice to the user.

use std::cmp::Ordering;
use std::io::BufRead;

use rand::seq::SliceRandom;

use crate::check::{KeyChecker, Verdict};
use crate::cli::SelectionMode;
use crate::error::AppError;
use crate::pool::Candidate;

#[derive(Debug, Clone)]
pub(crate) struct CheckOutcome {
    pub(crate) candidate: Candidate,
    pub(crate) verdict: Verdict,
}

impl CheckOutcome {
    pub(crate) fn balance(&self) -> Option<f64> {
        match self.verdict {
            Verdict::Valid { balance } => balance,
            _ => None,
        }
    }
}

/// Everything observed in one run, in check order
#[derive(Debug, Default)]
pub(crate) struct Selection {
    pub(crate) outcomes: Vec<CheckOutcome>,
    /// Index into `outcomes` of the chosen key
    pub(crate) winner: Option<usize>,
}

impl Selection {
    pub(crate) fn winner(&self) -> Option<&CheckOutcome> {
        self.winner.map(|i| &self.outcomes[i])
    }

    pub(crate) fn invalid(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.verdict.should_remove())
    }

    /// Indices into `outcomes` of every valid key, in check order
    pub(crate) fn valid_indices(&self) -> Vec<usize> {
        (0..self.outcomes.len())
            .filter(|&i| self.outcomes[i].verdict.is_valid())
            .collect()
    }
}

/// Put candidates in the order they will be checked.
pub(crate) fn arrange(mut candidates: Vec<Candidate>, mode: SelectionMode) -> Vec<Candidate> {
    match mode {
        SelectionMode::Order | SelectionMode::Best | SelectionMode::Pick => {}
        SelectionMode::Reverse => candidates.reverse(),
        SelectionMode::Random => candidates.shuffle(&mut rand::thread_rng()),
    }
    candidates
}

/// Check candidates in order and stop at the first valid one.
pub(crate) fn first_match<F>(
    candidates: Vec<Candidate>,
    checker: &dyn KeyChecker,
    mut on_result: F,
) -> Selection
where
    F: FnMut(&CheckOutcome),
{
    let mut selection = Selection::default();

    for candidate in candidates {
        let verdict = checker.check(&candidate);
        let outcome = CheckOutcome { candidate, verdict };
        on_result(&outcome);

        let valid = outcome.verdict.is_valid();
        selection.outcomes.push(outcome);
        if valid {
            selection.winner = Some(selection.outcomes.len() - 1);
            break;
        }
    }

    selection
}

/// Higher balance first; keys without a reported balance after all scored keys.
fn compare_balance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Check every candidate without choosing a winner.
pub(crate) fn check_all<F>(
    candidates: Vec<Candidate>,
    checker: &dyn KeyChecker,
    mut on_result: F,
) -> Selection
where
    F: FnMut(&CheckOutcome),
{
    let outcomes = candidates
        .into_iter()
        .map(|candidate| {
            let verdict = checker.check(&candidate);
            let outcome = CheckOutcome { candidate, verdict };
            on_result(&outcome);
            outcome
        })
        .collect();

    Selection {
        outcomes,
        winner: None,
    }
}

/// Check every candidate, then pick the valid one with the highest balance.
/// Ties go to the candidate checked first.
pub(crate) fn best_of<F>(candidates: Vec<Candidate>, checker: &dyn KeyChecker, on_result: F) -> Selection
where
    F: FnMut(&CheckOutcome),
{
    let mut selection = check_all(candidates, checker, on_result);

    let mut ranked = selection.valid_indices();
    // sort_by is stable, so equal balances keep enumeration order
    let outcomes = &selection.outcomes;
    ranked.sort_by(|&a, &b| compare_balance(outcomes[a].balance(), outcomes[b].balance()));

    selection.winner = ranked.first().copied();
    selection
}

/// Read a 1-based choice among the valid keys from `input`.
///
/// Returns the index into `selection.outcomes` of the chosen key. Anything
/// other than a number within range is an error.
pub(crate) fn read_choice(selection: &Selection, input: &mut dyn BufRead) -> Result<usize, AppError> {
    let valid = selection.valid_indices();
    let mut line = String::new();
    input.read_line(&mut line).map_err(AppError::Prompt)?;

    let answer = line.trim();
    let invalid = || AppError::InvalidChoice {
        input: answer.to_string(),
        max: valid.len(),
    };
    let choice: usize = answer.parse().map_err(|_| invalid())?;
    if choice == 0 {
        return Err(invalid());
    }
    valid.get(choice - 1).copied().ok_or_else(invalid)
}

pub(crate) fn select<F>(
    candidates: Vec<Candidate>,
    mode: SelectionMode,
    checker: &dyn KeyChecker,
    on_result: F,
) -> Selection
where
    F: FnMut(&CheckOutcome),
{
    let candidates = arrange(candidates, mode);
    match mode {
        SelectionMode::Best => best_of(candidates, checker, on_result),
        SelectionMode::Pick => check_all(candidates, checker, on_result),
        SelectionMode::Order | SelectionMode::Reverse | SelectionMode::Random => {
            first_match(candidates, checker, on_result)
        }
    }
}
