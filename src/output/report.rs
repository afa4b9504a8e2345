//! Run report: per-key progress lines, the summary table and the final switch notice

use std::io::Write;
use std::path::{Path, PathBuf};

use comfy_table::Color;

use crate::check::Verdict;
use crate::select::{CheckOutcome, Selection};
use crate::utils::mask_key;

use super::format::{
    create_styled_table, format_balance, header_cell, paint, right_cell, styled_cell, verdict_mark,
};

fn describe(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Valid { balance: Some(b) } => format!("balance {}", format_balance(Some(*b))),
        Verdict::Valid { balance: None } => "valid".to_string(),
        Verdict::Invalid(reason) => format!("removing: {reason}"),
        Verdict::Transient(reason) => format!("skipped: {reason}"),
    }
}

/// One line per checked key, printed as soon as the verdict is known
pub(crate) fn print_check_line(outcome: &CheckOutcome, use_color: bool) {
    let (mark, color) = verdict_mark(&outcome.verdict);
    println!(
        "{} {} {} - {}",
        paint(mark, color, use_color),
        outcome.candidate.provider,
        mask_key(&outcome.candidate.key),
        describe(&outcome.verdict)
    );
}

fn action(selection: &Selection, index: usize, dry_run: bool) -> (&'static str, Color) {
    if selection.winner == Some(index) {
        return ("selected", Color::Green);
    }
    match selection.outcomes[index].verdict {
        Verdict::Valid { .. } => ("valid", Color::Green),
        Verdict::Invalid(_) if dry_run => ("would remove", Color::Red),
        Verdict::Invalid(_) => ("removed", Color::Red),
        Verdict::Transient(_) => ("kept", Color::Yellow),
    }
}

/// Summary table of every key checked this run, in check order
pub(crate) fn print_summary_table(selection: &Selection, dry_run: bool, use_color: bool) {
    if selection.outcomes.is_empty() {
        return;
    }

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", use_color),
        header_cell("Provider", use_color),
        header_cell("Key", use_color),
        header_cell("Result", use_color),
        header_cell("Balance", use_color),
        header_cell("Action", use_color),
    ]);

    for (i, outcome) in selection.outcomes.iter().enumerate() {
        let (mark, verdict_color) = verdict_mark(&outcome.verdict);
        let (action_text, action_color) = action(selection, i, dry_run);
        let color = |c: Color| use_color.then_some(c);
        let selected = selection.winner == Some(i);
        let result = match &outcome.verdict {
            Verdict::Valid { .. } => mark.to_string(),
            Verdict::Invalid(reason) | Verdict::Transient(reason) => format!("{mark} {reason}"),
        };

        table.add_row(vec![
            right_cell(&(i + 1).to_string(), None, false),
            styled_cell(&outcome.candidate.provider, color(Color::Magenta), false),
            styled_cell(&mask_key(&outcome.candidate.key), None, selected),
            styled_cell(&result, color(verdict_color), false),
            right_cell(&format_balance(outcome.balance()), None, false),
            styled_cell(action_text, color(action_color), selected),
        ]);
    }

    println!("\n{table}");
}

/// Where the credential file backup went and how many keys were dropped
pub(crate) fn print_cleanup(removed: usize, backup: Option<&Path>, use_color: bool) {
    if let Some(path) = backup {
        println!("{} Backed up config to {}", paint("ℹ", Color::Blue, use_color), path.display());
    }
    println!(
        "{} Removed {removed} invalid key{}",
        paint("✓", Color::Green, use_color),
        if removed == 1 { "" } else { "s" }
    );
}

/// Numbered table of the valid keys, followed by the selection prompt
pub(crate) fn print_pick_table(selection: &Selection, use_color: bool) {
    let valid = selection.valid_indices();

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", use_color),
        header_cell("Provider", use_color),
        header_cell("Key", use_color),
        header_cell("Balance", use_color),
    ]);
    for (n, &i) in valid.iter().enumerate() {
        let outcome = &selection.outcomes[i];
        table.add_row(vec![
            right_cell(&(n + 1).to_string(), None, false),
            styled_cell(&outcome.candidate.provider, use_color.then_some(Color::Magenta), false),
            styled_cell(&mask_key(&outcome.candidate.key), None, false),
            right_cell(&format_balance(outcome.balance()), None, false),
        ]);
    }

    println!("\nValid keys:\n{table}");
    print!("Select a key [1-{}]: ", valid.len());
    let _ = std::io::stdout().flush();
}

pub(crate) fn print_switched(winner: &CheckOutcome, settings_path: &Path, use_color: bool) {
    let balance = winner
        .balance()
        .map(|b| format!(" (balance {})", format_balance(Some(b))))
        .unwrap_or_default();
    println!(
        "\n{} Switched to {} key {}{}",
        paint("✓", Color::Green, use_color),
        paint(&winner.candidate.provider, Color::Magenta, use_color),
        mask_key(&winner.candidate.key),
        balance
    );
    println!("{} Settings file: {}", paint("ℹ", Color::Blue, use_color), settings_path.display());
}

pub(crate) fn print_backups(path: &Path, backups: &[PathBuf]) {
    if backups.is_empty() {
        println!("No backups found for {}", path.display());
        return;
    }
    for backup in backups {
        println!("{}", backup.display());
    }
}
