use clap::Parser;
use folio::cli::commands::Cli;
use folio::cli::handlers;
use folio::io::catalog_io::load_catalog;
use folio::io::config_io::read_config;
use folio::io::logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_log_file(cli.log_file.clone());
    if let Err(e) = init_logging(&log_config, interactive) {
        eprintln!("error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    let result = if interactive {
        // No subcommand → launch TUI
        launch_tui(&cli)
    } else {
        handlers::dispatch(cli)
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn launch_tui(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let config = read_config(cli.config.as_deref())?;
    let capable = config.reveal.enabled && !cli.no_reveal;
    folio::tui::run(catalog, config, capable)
}
