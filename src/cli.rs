use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for jabprefs
#[derive(Parser, Debug)]
#[command(name = "jabprefs")]
#[command(about = "Inspect and edit a reference manager's preference store")]
#[command(version)]
pub struct Cli {
    /// Preference store file (default: <config dir>/jabprefs/preferences.xml)
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Keep secrets in this JSON vault file instead of the OS keyring
    #[arg(long, global = true, value_name = "FILE")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print stored preferences as JSON
    List {
        /// Glob patterns to filter keys (e.g. "proxy*", "*Column*")
        #[arg(value_name = "PATTERN")]
        patterns: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputType::JsonObject)]
        output_type: OutputType,
    },

    /// Print the raw value of one preference
    Get {
        key: String,
    },

    /// Store a string value
    Set {
        key: String,
        value: String,
    },

    /// Remove a stored preference
    Delete {
        key: String,
    },

    /// Print the built-in defaults for this machine as JSON
    Defaults,

    /// Write the preference tree to an XML file
    Export {
        file: PathBuf,
    },

    /// Merge a preference XML file into the store
    Import {
        file: PathBuf,
    },

    /// Remove every stored preference
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    /// A single JSON object keyed by preference name
    JsonObject,
    /// An array of {"key", "value"} objects
    JsonArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_patterns() {
        let cli = Cli::parse_from(["jabprefs", "list", "proxy*", "--output-type", "json-array"]);
        match cli.command {
            Commands::List {
                patterns,
                output_type,
            } => {
                assert_eq!(patterns, vec!["proxy*".to_string()]);
                assert_eq!(output_type, OutputType::JsonArray);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_store_flag_after_subcommand() {
        let cli = Cli::parse_from(["jabprefs", "get", "proxyPort", "--store", "/tmp/p.xml"]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/p.xml")));
        assert!(cli.vault.is_none());
    }
}
