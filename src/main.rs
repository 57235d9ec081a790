use std::process::ExitCode;

use clap::Parser;
use console::style;
use log::{debug, warn};
use organizer::{
    App, AppState, Cli, Config, FileBackend, PersistedStore, Result, StorageKeys,
    ViewCoordinator,
};

pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    debug!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // An unusable data directory degrades to in-memory defaults.
    let backend = FileBackend::open(&config.data_dir).unwrap_or_else(|e| {
        warn!("{}; changes will not be saved", e);
        FileBackend::at(&config.data_dir)
    });
    let store = PersistedStore::new(backend).pretty(config.pretty_json);
    let state = AppState::load(store, StorageKeys::from(&config));

    let mut app = App::new(ViewCoordinator::new(state), config, config_path, cli.verbose);
    app.run(cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
