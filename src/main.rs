mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn init_logging() -> anyhow::Result<()> {
    let level = match std::env::var("JABPREFS_LOG")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let prefs = commands::open_preferences(&cli)?;
    match &cli.command {
        Commands::List {
            patterns,
            output_type,
        } => commands::list(&prefs, patterns, *output_type),
        Commands::Get { key } => commands::get(&prefs, key),
        Commands::Set { key, value } => commands::set(&prefs, key, value),
        Commands::Delete { key } => commands::delete(&prefs, key),
        Commands::Defaults => commands::defaults(&prefs),
        Commands::Export { file } => commands::export(&prefs, file),
        Commands::Import { file } => commands::import(&prefs, file),
        Commands::Reset => commands::reset(&prefs),
    }
}
