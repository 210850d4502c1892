// Integration tests for the preferences service: caching, write-back and invalidation
use jabprefs::keys::*;
use jabprefs::{
    AbbreviationStyle, CitationKeyDependency, DatabaseMode, DisplayStyle, Environment,
    FetcherApiKey, KeySuffix, MemoryStore, MemoryVault, NameFormat, Preferences,
    PreferencesConfig, SaveOrderType, SearchDisplayMode, UnavailableVault,
};
use std::sync::Arc;
use tempfile::TempDir;

fn config(dir: &TempDir) -> PreferencesConfig {
    PreferencesConfig {
        environment: Environment::isolated("alice", "box", dir.path()),
        ..PreferencesConfig::default()
    }
}

struct Setup {
    dir: TempDir,
    store: Arc<MemoryStore>,
    vault: Arc<MemoryVault>,
}

impl Setup {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            store: Arc::new(MemoryStore::new()),
            vault: Arc::new(MemoryVault::new()),
        }
    }

    fn open(&self) -> Preferences {
        Preferences::open(self.store.clone(), self.vault.clone(), config(&self.dir))
    }
}

#[test]
fn test_groups_are_cached() {
    let setup = Setup::new();
    let prefs = setup.open();
    assert!(Arc::ptr_eq(&prefs.proxy(), &prefs.proxy()));
    assert!(Arc::ptr_eq(&prefs.entry_editor(), &prefs.entry_editor()));
    assert!(Arc::ptr_eq(&prefs.file(), &prefs.file()));
    assert!(!Arc::ptr_eq(
        &prefs.main_table_columns(),
        &prefs.search_dialog_columns()
    ));

    let clone = prefs.clone();
    assert!(Arc::ptr_eq(&prefs.library(), &clone.library()));
}

#[test]
fn test_write_back_survives_restart() {
    let setup = Setup::new();
    {
        let prefs = setup.open();
        prefs.library().default_mode.set(DatabaseMode::Biblatex);
        prefs.workspace().main_font_size.set(14);
        prefs.auto_link().citation_key_dependency.set(CitationKeyDependency::Regex);
        prefs
            .citation_key_patterns()
            .key_suffix
            .set(KeySuffix::SecondWithB);
        prefs.export().export_save_order.update(|order| {
            order.order_type = SaveOrderType::Original;
        });
    }

    let prefs = setup.open();
    assert_eq!(prefs.library().default_mode.get(), DatabaseMode::Biblatex);
    assert_eq!(prefs.workspace().main_font_size.get(), 14);
    assert_eq!(
        prefs.auto_link().citation_key_dependency.get(),
        CitationKeyDependency::Regex
    );
    assert_eq!(
        prefs.citation_key_patterns().key_suffix.get(),
        KeySuffix::SecondWithB
    );
    assert_eq!(
        prefs.export().export_save_order.get().order_type,
        SaveOrderType::Original
    );
}

#[test]
fn test_write_back_through_file_store() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("preferences.xml");
    let vault_path = dir.path().join("vault.json");
    {
        let prefs = Preferences::open_files(&store_path, &vault_path, config(&dir)).unwrap();
        prefs.grobid().url.set("http://grobid.local".to_string());
        prefs.proxy().persist_password.set(true);
        prefs.proxy().password.set("hunter2".to_string());
        prefs.flush();
    }

    let prefs = Preferences::open_files(&store_path, &vault_path, config(&dir)).unwrap();
    assert_eq!(prefs.grobid().url.get(), "http://grobid.local");
    assert_eq!(prefs.proxy().password.get(), "hunter2");

    let plain = std::fs::read_to_string(&store_path).unwrap();
    assert!(!plain.contains("hunter2"));
}

#[test]
fn test_owner_change_invalidates_identity_groups() {
    let setup = Setup::new();
    let prefs = setup.open();
    let internal = prefs.internal();
    let files = prefs.file();
    assert_eq!(internal.user_and_host, "alice-box");
    assert_eq!(files.user_and_host, "alice-box");

    prefs.owner().default_owner.set("bob".to_string());

    assert_eq!(prefs.user_and_host(), "bob-box");
    assert_eq!(prefs.internal().user_and_host, "bob-box");
    assert_eq!(prefs.file().user_and_host, "bob-box");
    assert!(!Arc::ptr_eq(&internal, &prefs.internal()));
    // groups without identity stay cached
    let remote = prefs.remote();
    prefs.owner().default_owner.set("carol".to_string());
    assert!(Arc::ptr_eq(&remote, &prefs.remote()));
}

#[test]
fn test_unavailable_vault_keeps_groups_usable() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let prefs = Preferences::open(store, Arc::new(UnavailableVault), config(&dir));

    prefs.proxy().persist_password.set(true);
    for _ in 0..100 {
        prefs.proxy().password.set("secret".to_string());
    }
    prefs.clear().unwrap();
    prefs.store().put_bool(PROXY_PERSIST_PASSWORD, true);
    assert_eq!(prefs.proxy().password.get(), "");
}

#[test]
fn test_flag_priority_tables() {
    let setup = Setup::new();
    let prefs = setup.open();
    let store = prefs.store();

    store.put_bool(NAMES_NATBIB, true);
    store.put_bool(NAMES_AS_IS, true);
    store.put_bool(ABBR_AUTHOR_NAMES, true);
    store.put_bool(NAMES_LAST_ONLY, true);
    store.put_bool(SEARCH_DISPLAY_MODE, false);
    store.put_bool(AUTOCOMPLETER_FIRST_LAST, true);
    store.put_bool(AUTOCOMPLETER_LAST_FIRST, true);
    store.put_bool(BIBLATEX_DEFAULT_MODE, true);

    let prefs = setup.open();
    assert_eq!(prefs.name_display().display_style.get(), DisplayStyle::Natbib);
    assert_eq!(
        prefs.name_display().abbreviation_style.get(),
        AbbreviationStyle::Full
    );
    assert_eq!(prefs.search().display_mode.get(), SearchDisplayMode::Float);
    assert_eq!(prefs.auto_complete().name_format.get(), NameFormat::LastFirst);
    assert_eq!(prefs.library().default_mode.get(), DatabaseMode::Biblatex);
}

#[test]
fn test_portable_file_lifecycle() {
    let setup = Setup::new();
    let portable = setup.dir.path().join("jabref.xml");

    let prefs = setup.open();
    prefs.internal().memory_stick_mode.set(true);
    prefs.remote().port.set(7000);
    prefs.flush();
    assert!(portable.exists());

    // a fresh machine picks the settings up from the portable file
    let moved = Preferences::open(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryVault::new()),
        config(&setup.dir),
    );
    assert_eq!(moved.remote().port.get(), 7000);

    moved.internal().memory_stick_mode.set(false);
    assert!(!portable.exists());
}

#[test]
fn test_fetcher_keys_follow_persistence_flag() {
    let setup = Setup::new();
    let prefs = setup.open();
    let importer = prefs.importer();
    importer.persist_custom_keys.set(true);
    importer.api_keys.set(vec![
        FetcherApiKey::new("IEEEXplore", true, "k-1"),
        FetcherApiKey::new("Springer", false, "k-2"),
    ]);

    let reopened = setup.open();
    let keys = reopened.importer().api_keys.get();
    assert_eq!(keys[0], FetcherApiKey::new("IEEEXplore", true, "k-1"));
    assert_eq!(keys[1], FetcherApiKey::new("Springer", false, "k-2"));

    reopened.importer().persist_custom_keys.set(false);
    reopened.importer().api_keys.set(keys);
    assert!(setup.vault.stored(FETCHER_SECRET_NAMESPACE, "IEEEXplore").is_none());
    assert!(setup.vault.stored(FETCHER_SECRET_NAMESPACE, "Springer").is_none());
}

#[test]
fn test_export_and_import_round_trip() {
    let setup = Setup::new();
    let file = setup.dir.path().join("backup.xml");
    let prefs = setup.open();
    prefs
        .citation_key_patterns()
        .key_patterns
        .update(|patterns| patterns.set_pattern("article", "[auth:lower][year]"));
    prefs.export_preferences(&file).unwrap();

    let other = Setup::new();
    let target = other.open();
    let cached = target.citation_key_patterns();
    target.import_preferences(&file).unwrap();

    assert!(!Arc::ptr_eq(&cached, &target.citation_key_patterns()));
    assert_eq!(
        target
            .citation_key_patterns()
            .key_patterns
            .get()
            .pattern_for("article"),
        "[auth:lower][year]"
    );
}

#[test]
fn test_groups_outlive_their_handle() {
    let setup = Setup::new();
    let remote = setup.open().remote();
    remote.port.set(1234);
    assert_eq!(remote.port.get(), 1234);
    assert_ne!(setup.open().remote().port.get(), 1234);
}

#[test]
fn test_concurrent_getters_share_one_group() {
    let setup = Setup::new();
    let prefs = setup.open();
    let start = Arc::new(std::sync::Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let prefs = prefs.clone();
            let start = Arc::clone(&start);
            std::thread::spawn(move || {
                start.wait();
                (prefs.workspace(), prefs.entry_editor())
            })
        })
        .collect();
    let groups: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let (workspace, entry_editor) = &groups[0];
    for (other_workspace, other_entry_editor) in &groups[1..] {
        assert!(Arc::ptr_eq(workspace, other_workspace));
        assert!(Arc::ptr_eq(entry_editor, other_entry_editor));
    }
    assert!(Arc::ptr_eq(workspace, &prefs.workspace()));
}
