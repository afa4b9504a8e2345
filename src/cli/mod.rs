pub(crate) mod args;
pub(crate) mod commands;

pub(crate) use args::{Cli, SelectionMode};
pub(crate) use commands::Commands;
