mod app;
mod backup;
mod check;
mod cli;
mod config;
mod consts;
mod error;
mod logging;
mod output;
mod pool;
mod select;
mod settings;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    // Tool config supplies defaults; explicit CLI flags win
    let cli = cli.with_config(&Config::load());

    match app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}
