//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigMode, default_credential_path, default_settings_path};
use crate::consts::DEFAULT_TIMEOUT;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum SelectionMode {
    /// Check keys in file order, use the first valid one (default)
    #[default]
    Order,
    /// Check keys from the end of the file, use the first valid one
    Reverse,
    /// Check keys in random order, use the first valid one
    Random,
    /// Check every key, use the one with the highest balance
    Best,
    /// Check every key, then choose one of the valid keys by number
    Pick,
}

impl SelectionMode {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SelectionMode::Order => "order",
            SelectionMode::Reverse => "reverse",
            SelectionMode::Random => "random",
            SelectionMode::Best => "best",
            SelectionMode::Pick => "pick",
        }
    }
}

impl From<ConfigMode> for SelectionMode {
    fn from(mode: ConfigMode) -> Self {
        match mode {
            ConfigMode::Order => SelectionMode::Order,
            ConfigMode::Reverse => SelectionMode::Reverse,
            ConfigMode::Random => SelectionMode::Random,
            ConfigMode::Best => SelectionMode::Best,
            ConfigMode::Pick => SelectionMode::Pick,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "keyswitch")]
#[command(about = "Check API keys, prune dead ones and switch the consumer config to a valid key", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Credential file (YAML) [default: ~/.keyswitch/provider.yml]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Consumer settings file (JSON) [default: ~/.qwen/settings.json]
    #[arg(short, long, visible_alias = "qwen-config", short_alias = 'q', value_name = "PATH")]
    pub(crate) settings: Option<PathBuf>,

    /// How to pick the key to activate
    #[arg(short, long, value_enum)]
    pub(crate) mode: Option<SelectionMode>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) timeout: Option<u64>,

    /// Check keys and report, but do not modify any file
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging (request URLs, status codes, file writes)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.config.is_none() {
            self.config = config.config.clone();
        }
        if self.settings.is_none() {
            self.settings = config.settings.clone();
        }
        if self.mode.is_none() {
            self.mode = config.mode.map(SelectionMode::from);
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs.map(NonZeroU64::get);
        }
        self
    }

    /// Credential file path, and whether the user named it explicitly
    pub(crate) fn credential_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (default_credential_path(), false),
        }
    }

    pub(crate) fn settings_path(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(default_settings_path)
    }

    pub(crate) fn selection_mode(&self) -> SelectionMode {
        self.mode.unwrap_or_default()
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout.map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}
