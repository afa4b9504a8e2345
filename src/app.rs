use std::io::BufRead;
use std::path::Path;

use crate::backup::{list_backups, restore_latest};
use crate::check::{HttpChecker, KeyChecker};
use crate::cli::{Cli, Commands, SelectionMode};
use crate::error::AppError;
use crate::output::{
    print_backups, print_check_line, print_cleanup, print_pick_table, print_summary_table,
    print_switched,
};
use crate::pool::{CredentialFile, write_default};
use crate::select::{Selection, read_choice, select};
use crate::settings::{ActiveKey, write_settings};

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Some(Commands::Restore) => handle_restore(cli),
        Some(Commands::Backups) => handle_backups(cli),
        None => {
            let checker = HttpChecker::new(cli.timeout());
            handle_switch(cli, &checker)
        }
    }
}

/// Options for one check-and-switch run
pub(crate) struct SwitchOptions<'a> {
    pub(crate) mode: SelectionMode,
    pub(crate) settings_path: &'a Path,
    pub(crate) dry_run: bool,
    pub(crate) use_color: bool,
}

fn handle_switch(cli: &Cli, checker: &dyn KeyChecker) -> Result<(), AppError> {
    let (config_path, explicit) = cli.credential_path();

    if !config_path.exists() {
        if explicit {
            return Err(AppError::ConfigNotFound { path: config_path });
        }
        eprintln!("⚠ Config file not found: {}", config_path.display());
        write_default(&config_path)?;
        println!("✓ Created default config file: {}", config_path.display());
        println!("⚠ Edit it to add your API keys, then run keyswitch again");
        return Ok(());
    }

    println!("✓ Found config file: {}", config_path.display());
    let mut file = CredentialFile::load(&config_path)?;
    println!("✓ Config format OK");

    let settings_path = cli.settings_path();
    let options = SwitchOptions {
        mode: cli.selection_mode(),
        settings_path: &settings_path,
        dry_run: cli.dry_run,
        use_color: cli.use_color(),
    };
    switch_key(&mut file, checker, &options, &mut std::io::stdin().lock()).map(|_| ())
}

/// Check keys, prune the dead ones and write the winner into the settings file.
/// In `pick` mode the winner is read from `input`.
pub(crate) fn switch_key(
    file: &mut CredentialFile,
    checker: &dyn KeyChecker,
    options: &SwitchOptions<'_>,
    input: &mut dyn BufRead,
) -> Result<Selection, AppError> {
    let candidates = file.candidates();
    if candidates.is_empty() {
        return Err(AppError::NoValidKey);
    }

    println!(
        "\nChecking {} keys (mode: {})...",
        candidates.len(),
        options.mode.label()
    );
    tracing::debug!(
        path = %file.path().display(),
        providers = file.providers().len(),
        keys = file.key_count(),
        "credential pool loaded"
    );

    let mut selection = select(candidates, options.mode, checker, |outcome| {
        print_check_line(outcome, options.use_color)
    });

    let mut removed = 0;
    for outcome in selection.invalid() {
        if file.remove_key(&outcome.candidate.provider, &outcome.candidate.key) {
            removed += 1;
        }
    }

    print_summary_table(&selection, options.dry_run, options.use_color);

    if removed > 0 && !options.dry_run {
        let backup = file.save()?;
        print_cleanup(removed, backup.as_deref(), options.use_color);
    }

    if options.mode == SelectionMode::Pick && !selection.valid_indices().is_empty() {
        print_pick_table(&selection, options.use_color);
        selection.winner = Some(read_choice(&selection, input)?);
    }

    let Some(winner) = selection.winner() else {
        return Err(AppError::NoValidKey);
    };

    if options.dry_run {
        println!("\nDry run: {} not modified", options.settings_path.display());
        return Ok(selection);
    }

    let endpoint = &winner.candidate.endpoint;
    let active = ActiveKey {
        api_key: &winner.candidate.key,
        base_url: endpoint.base_url.as_deref().unwrap_or_default(),
        model_name: &endpoint.model_name,
    };
    write_settings(options.settings_path, &active)?;
    print_switched(winner, options.settings_path, options.use_color);

    Ok(selection)
}

fn handle_restore(cli: &Cli) -> Result<(), AppError> {
    let (config_path, _) = cli.credential_path();
    let restored = restore_latest(&config_path)?;
    println!(
        "✓ Restored {} from {}",
        config_path.display(),
        restored.display()
    );
    Ok(())
}

fn handle_backups(cli: &Cli) -> Result<(), AppError> {
    let (config_path, _) = cli.credential_path();
    print_backups(&config_path, &list_backups(&config_path));
    Ok(())
}
