use crate::cli::{self, Cli};
use anyhow::{anyhow, Context};
use jabprefs::{
    default_config_dir, query_preferences, FileVault, KeyringVault, PreferenceEntry,
    PreferenceMap, Preferences, PreferencesConfig, SecretVault, DEFAULT_STORE_FILE,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Open the preference store selected on the command line
///
/// Secrets go to the OS keyring unless `--vault` names a vault file.
pub fn open_preferences(cli: &Cli) -> anyhow::Result<Preferences> {
    let store = cli
        .store
        .clone()
        .unwrap_or_else(|| default_config_dir().join(DEFAULT_STORE_FILE));
    let vault: Arc<dyn SecretVault> = match &cli.vault {
        Some(path) => Arc::new(FileVault::new(path)),
        None => Arc::new(KeyringVault::new()),
    };

    Preferences::open_store_file(&store, vault, PreferencesConfig::default()).with_context(|| {
        format!(
            "Failed to open preference store at {}. The file may be corrupted or not a preferences document.",
            store.display()
        )
    })
}

/// Print stored preferences, optionally filtered by glob patterns
pub fn list(
    prefs: &Preferences,
    patterns: &[String],
    output_type: cli::OutputType,
) -> anyhow::Result<()> {
    let all = prefs.all_preferences();
    let selected = if patterns.is_empty() {
        all
    } else {
        let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
        query_preferences(&all, &patterns).context("Failed to apply query")?
    };
    print_map(&selected, output_type)
}

/// Print one preference value in raw form (no JSON wrapping)
pub fn get(prefs: &Preferences, key: &str) -> anyhow::Result<()> {
    if !prefs.store().has_key(key) && !prefs.defaults().contains(key) {
        return Err(anyhow!("Preference '{}' not found", key));
    }
    println!("{}", prefs.store().get_object(key));
    Ok(())
}

pub fn set(prefs: &Preferences, key: &str, value: &str) -> anyhow::Result<()> {
    prefs.store().put_string(key, value);
    flush(prefs)
}

pub fn delete(prefs: &Preferences, key: &str) -> anyhow::Result<()> {
    prefs
        .delete_key(key)
        .with_context(|| format!("Failed to delete '{key}'"))?;
    flush(prefs)
}

/// Print the default table as a JSON object
pub fn defaults(prefs: &Preferences) -> anyhow::Result<()> {
    let table: BTreeMap<&str, _> = prefs.defaults().iter().collect();
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

pub fn export(prefs: &Preferences, file: &Path) -> anyhow::Result<()> {
    prefs
        .export_preferences(file)
        .with_context(|| format!("Failed to export preferences to {}", file.display()))
}

pub fn import(prefs: &Preferences, file: &Path) -> anyhow::Result<()> {
    prefs
        .import_preferences(file)
        .with_context(|| format!("Failed to import preferences from {}", file.display()))?;
    flush(prefs)
}

pub fn reset(prefs: &Preferences) -> anyhow::Result<()> {
    prefs.clear().context("Failed to clear preferences")?;
    flush(prefs)
}

/// Write the store back, surfacing failures the library only logs
fn flush(prefs: &Preferences) -> anyhow::Result<()> {
    prefs
        .store()
        .flush()
        .context("Failed to write the preference store")
}

fn print_map(map: &PreferenceMap, output_type: cli::OutputType) -> anyhow::Result<()> {
    let json = match output_type {
        cli::OutputType::JsonObject => serde_json::to_string_pretty(map)?,
        cli::OutputType::JsonArray => {
            let entries: Vec<PreferenceEntry> = map
                .iter()
                .map(|(key, value)| PreferenceEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect();
            serde_json::to_string_pretty(&entries)?
        }
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use jabprefs::keys::{PROXY_SECRET_ACCOUNT, PROXY_SECRET_NAMESPACE};
    use std::ffi::OsString;
    use tempfile::TempDir;

    #[test]
    fn test_vault_flag_selects_file_vault() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("preferences.xml");
        let vault = dir.path().join("secrets.json");
        let cli = Cli::parse_from([
            OsString::from("jabprefs"),
            "--store".into(),
            store.into_os_string(),
            "--vault".into(),
            vault.clone().into_os_string(),
            "reset".into(),
        ]);

        let prefs = open_preferences(&cli).unwrap();
        prefs.proxy().persist_password.set(true);
        prefs.proxy().password.set("hunter2".to_string());
        prefs.flush();
        drop(prefs);

        let file_vault = FileVault::new(&vault);
        let stored = file_vault
            .open()
            .unwrap()
            .get_password(PROXY_SECRET_NAMESPACE, PROXY_SECRET_ACCOUNT)
            .unwrap();
        assert!(!stored.contains("hunter2"));
        assert_eq!(open_preferences(&cli).unwrap().proxy().password.get(), "hunter2");
    }
}
