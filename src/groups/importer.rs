use super::{bind_bool, bind_path, bind_string, bind_string_list, bind_with, Link, PreferenceGroup};
use crate::formats::{self, ImporterRegistry};
use crate::keys::*;
use crate::observable::Property;
use crate::service::Shared;
use std::path::PathBuf;

named_enum! {
    /// Engine that turns a plain-text reference into an entry
    pub enum PlainCitationParser {
        RuleBased => "RULE_BASED",
        Grobid => "GROBID",
        Llm => "LLM",
    }
}

/// API key for one online fetcher
///
/// The key itself is kept in the secret vault, never in the plain store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherApiKey {
    pub name: String,
    pub use_key: bool,
    pub key: String,
}

impl FetcherApiKey {
    pub fn new(name: &str, use_key: bool, key: &str) -> Self {
        Self {
            name: name.to_string(),
            use_key,
            key: key.to_string(),
        }
    }
}

fn load_api_keys(shared: &Shared) -> Vec<FetcherApiKey> {
    let names = shared.store.get_string_list(FETCHER_CUSTOM_KEY_NAMES);
    let uses = shared.store.get_string_list(FETCHER_CUSTOM_KEY_USES);
    let identity = shared.user_and_host();
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let use_key = uses
                .get(index)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
            let key = shared
                .credentials
                .get_secret(FETCHER_SECRET_NAMESPACE, name, &identity)
                .unwrap_or_default();
            FetcherApiKey::new(name, use_key, &key)
        })
        .collect()
}

fn store_api_keys(shared: &Shared, keys: &[FetcherApiKey]) {
    let names: Vec<&str> = keys.iter().map(|k| k.name.as_str()).collect();
    let uses: Vec<String> = keys.iter().map(|k| k.use_key.to_string()).collect();
    shared
        .store
        .put_string_list(FETCHER_CUSTOM_KEY_NAMES, Some(names.as_slice()));
    shared
        .store
        .put_string_list(FETCHER_CUSTOM_KEY_USES, Some(uses.as_slice()));

    if shared.store.get_bool(FETCHER_CUSTOM_KEY_PERSIST) {
        let identity = shared.user_and_host();
        for key in keys {
            shared
                .credentials
                .set_secret(FETCHER_SECRET_NAMESPACE, &key.name, &key.key, &identity);
        }
    } else {
        shared
            .credentials
            .delete_all_secrets(FETCHER_SECRET_NAMESPACE, names.as_slice());
    }
}

#[derive(Debug)]
pub struct ImporterPreferences {
    pub importer_enabled: Property<bool>,
    pub generate_new_key_on_import: Property<bool>,
    pub import_working_directory: Property<PathBuf>,
    pub warn_about_duplicates_on_import: Property<bool>,
    pub custom_importers: Property<ImporterRegistry>,
    pub api_keys: Property<Vec<FetcherApiKey>>,
    /// Keep fetcher API keys in the vault between sessions
    pub persist_custom_keys: Property<bool>,
    pub catalogs: Property<Vec<String>>,
    pub default_plain_citation_parser: Property<PlainCitationParser>,
}

impl PreferenceGroup for ImporterPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        let parser = PlainCitationParser::parse_or(
            &store.get_string(DEFAULT_PLAIN_CITATION_PARSER),
            PlainCitationParser::RuleBased,
        );

        Self {
            importer_enabled: Property::new(store.get_bool(IMPORTERS_ENABLED)),
            generate_new_key_on_import: Property::new(store.get_bool(GENERATE_KEY_ON_IMPORT)),
            import_working_directory: Property::new(
                store.get_path(IMPORT_WORKING_DIRECTORY, &shared.config.environment.home_dir),
            ),
            warn_about_duplicates_on_import: Property::new(
                store.get_bool(WARN_ABOUT_DUPLICATES_IN_INSPECTION),
            ),
            custom_importers: Property::new(formats::load_importers(store)),
            api_keys: Property::new(load_api_keys(shared)),
            persist_custom_keys: Property::new(store.get_bool(FETCHER_CUSTOM_KEY_PERSIST)),
            catalogs: Property::new(store.get_string_list(SEARCH_CATALOGS)),
            default_plain_citation_parser: Property::new(parser),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.importer_enabled, link, IMPORTERS_ENABLED);
        bind_bool(&self.generate_new_key_on_import, link, GENERATE_KEY_ON_IMPORT);
        bind_path(&self.import_working_directory, link, IMPORT_WORKING_DIRECTORY);
        bind_bool(
            &self.warn_about_duplicates_on_import,
            link,
            WARN_ABOUT_DUPLICATES_IN_INSPECTION,
        );
        bind_with(&self.custom_importers, link, |s, registry| {
            formats::store_importers(&s.store, registry)
        });
        bind_with(&self.api_keys, link, |s, keys| store_api_keys(s, keys));
        bind_bool(&self.persist_custom_keys, link, FETCHER_CUSTOM_KEY_PERSIST);
        bind_string_list(&self.catalogs, link, SEARCH_CATALOGS);
        bind_with(&self.default_plain_citation_parser, link, |s, parser| {
            s.store.put_string(DEFAULT_PLAIN_CITATION_PARSER, parser.name())
        });
    }
}

#[derive(Debug)]
pub struct GrobidPreferences {
    pub enabled: Property<bool>,
    /// The user declined the Grobid prompt
    pub opt_out: Property<bool>,
    pub url: Property<String>,
}

impl PreferenceGroup for GrobidPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            enabled: Property::new(shared.store.get_bool(GROBID_ENABLED)),
            opt_out: Property::new(shared.store.get_bool(GROBID_OPT_OUT)),
            url: Property::new(shared.store.get_string(GROBID_URL)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.enabled, link, GROBID_ENABLED);
        bind_bool(&self.opt_out, link, GROBID_OPT_OUT);
        bind_string(&self.url, link, GROBID_URL);
    }
}

#[derive(Debug)]
pub struct JournalAbbreviationPreferences {
    pub external_lists: Property<Vec<String>>,
    pub use_fjournal_field: Property<bool>,
}

impl PreferenceGroup for JournalAbbreviationPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            external_lists: Property::new(shared.store.get_string_list(EXTERNAL_JOURNAL_LISTS)),
            use_fjournal_field: Property::new(shared.store.get_bool(USE_AMS_FJOURNAL)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string_list(&self.external_lists, link, EXTERNAL_JOURNAL_LISTS);
        bind_bool(&self.use_fjournal_field, link, USE_AMS_FJOURNAL);
    }
}

/// Term lists whose words are protected from case changes
#[derive(Debug)]
pub struct ProtectedTermsPreferences {
    pub enabled_internal: Property<Vec<String>>,
    pub enabled_external: Property<Vec<String>>,
    pub disabled_internal: Property<Vec<String>>,
    pub disabled_external: Property<Vec<String>>,
}

impl PreferenceGroup for ProtectedTermsPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            enabled_internal: Property::new(store.get_string_list(PROTECTED_TERMS_ENABLED_INTERNAL)),
            enabled_external: Property::new(store.get_string_list(PROTECTED_TERMS_ENABLED_EXTERNAL)),
            disabled_internal: Property::new(store.get_string_list(PROTECTED_TERMS_DISABLED_INTERNAL)),
            disabled_external: Property::new(store.get_string_list(PROTECTED_TERMS_DISABLED_EXTERNAL)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_string_list(&self.enabled_internal, link, PROTECTED_TERMS_ENABLED_INTERNAL);
        bind_string_list(&self.enabled_external, link, PROTECTED_TERMS_ENABLED_EXTERNAL);
        bind_string_list(&self.disabled_internal, link, PROTECTED_TERMS_DISABLED_INTERNAL);
        bind_string_list(&self.disabled_external, link, PROTECTED_TERMS_DISABLED_EXTERNAL);
    }
}

/// Fields kept out of XMP metadata written to PDFs
#[derive(Debug)]
pub struct XmpPreferences {
    pub use_privacy_filter: Property<bool>,
    pub privacy_filter: Property<Vec<String>>,
}

impl PreferenceGroup for XmpPreferences {
    fn load(shared: &Shared) -> Self {
        Self {
            use_privacy_filter: Property::new(shared.store.get_bool(USE_XMP_PRIVACY_FILTER)),
            privacy_filter: Property::new(shared.store.get_string_list(XMP_PRIVACY_FILTERS)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.use_privacy_filter, link, USE_XMP_PRIVACY_FILTER);
        bind_string_list(&self.privacy_filter, link, XMP_PRIVACY_FILTERS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::CustomImporter;
    use crate::groups::testing::Fixture;

    #[test]
    fn test_api_key_uses_parse_case_insensitively() {
        let fx = Fixture::new();
        fx.prefs
            .store()
            .put_string(FETCHER_CUSTOM_KEY_USES, "TRUE;false;True;yes");
        let keys = fx.prefs.importer().api_keys.get();
        let uses: Vec<bool> = keys.iter().map(|k| k.use_key).collect();
        assert_eq!(uses, vec![true, false, true, false, false]);
        assert!(keys.iter().all(|k| k.key.is_empty()));
    }

    #[test]
    fn test_api_keys_persisted_to_vault() {
        let fx = Fixture::new();
        let importer = fx.prefs.importer();
        importer.persist_custom_keys.set(true);
        importer
            .api_keys
            .set(vec![FetcherApiKey::new("Springer", true, "abc123")]);

        assert!(fx.vault.stored(FETCHER_SECRET_NAMESPACE, "Springer").is_some());
        assert_eq!(fx.prefs.store().get_string(FETCHER_CUSTOM_KEY_NAMES), "Springer");
        assert_eq!(fx.prefs.store().get_string(FETCHER_CUSTOM_KEY_USES), "true");

        let reloaded = fx.reopen().importer().api_keys.get();
        assert_eq!(reloaded, vec![FetcherApiKey::new("Springer", true, "abc123")]);
    }

    #[test]
    fn test_api_keys_deleted_without_persistence() {
        let fx = Fixture::new();
        let importer = fx.prefs.importer();
        importer.persist_custom_keys.set(true);
        importer
            .api_keys
            .set(vec![FetcherApiKey::new("Springer", true, "abc123")]);

        importer.persist_custom_keys.set(false);
        importer
            .api_keys
            .set(vec![FetcherApiKey::new("Springer", false, "abc123")]);
        assert!(fx.vault.stored(FETCHER_SECRET_NAMESPACE, "Springer").is_none());
        assert_eq!(fx.vault.live_handles(), 0);
    }

    #[test]
    fn test_custom_importers_write_series() {
        let fx = Fixture::new();
        let importer = fx.prefs.importer();
        importer.custom_importers.update(|registry| {
            registry.insert(CustomImporter::new("/opt/ris.jar", "org.example.RisImporter").unwrap());
        });
        assert!(fx.prefs.store().has_key("customImportFormat0"));
        assert!(fx
            .reopen()
            .importer()
            .custom_importers
            .get()
            .contains("org.example.RisImporter"));
    }

    #[test]
    fn test_unknown_parser_falls_back() {
        let fx = Fixture::new();
        fx.prefs
            .store()
            .put_string(DEFAULT_PLAIN_CITATION_PARSER, "CROSSREF_MAGIC");
        assert_eq!(
            fx.prefs.importer().default_plain_citation_parser.get(),
            PlainCitationParser::RuleBased
        );
    }
}
