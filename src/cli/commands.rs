//! CLI subcommand definitions

use clap::Subcommand;

/// Subcommands. Without one, keyswitch checks keys and switches to a valid one.
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Restore the credential file from its most recent backup
    Restore,
    /// List backups of the credential file, oldest first
    Backups,
}
