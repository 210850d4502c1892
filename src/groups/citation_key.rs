use super::{
    bind_bool, bind_flags, bind_string, bind_with, derive_from_flags, Link, PreferenceGroup,
};
use crate::accessor::TypedStore;
use crate::keys::*;
use crate::observable::Property;
use crate::service::Shared;
use std::collections::BTreeMap;

named_enum! {
    /// How generated keys are disambiguated when they collide
    pub enum KeySuffix {
        /// Always append a letter, starting at `a`
        Always => "ALWAYS",
        /// The first duplicate gets `a`
        SecondWithA => "SECOND_WITH_A",
        /// The first duplicate gets `b`
        SecondWithB => "SECOND_WITH_B",
    }
}

const KEY_SUFFIX_FLAGS: &[(&str, KeySuffix)] = &[
    (KEY_GEN_ALWAYS_ADD_LETTER, KeySuffix::Always),
    (KEY_GEN_FIRST_LETTER_A, KeySuffix::SecondWithA),
];

/// Citation key patterns: one default plus per-entry-type overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalCitationKeyPatterns {
    default_pattern: String,
    overrides: BTreeMap<String, String>,
}

impl GlobalCitationKeyPatterns {
    pub fn new(default_pattern: &str) -> Self {
        Self {
            default_pattern: default_pattern.to_string(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn default_pattern(&self) -> &str {
        &self.default_pattern
    }

    pub fn set_default_pattern(&mut self, pattern: &str) {
        self.default_pattern = pattern.to_string();
    }

    /// Pattern used for `entry_type`, falling back to the default
    pub fn pattern_for(&self, entry_type: &str) -> &str {
        self.overrides
            .get(entry_type)
            .map(String::as_str)
            .unwrap_or(&self.default_pattern)
    }

    pub fn set_pattern(&mut self, entry_type: &str, pattern: &str) {
        self.overrides
            .insert(entry_type.to_string(), pattern.to_string());
    }

    pub fn remove_pattern(&mut self, entry_type: &str) -> Option<String> {
        self.overrides.remove(entry_type)
    }

    /// True when `entry_type` has no pattern of its own
    pub fn is_default(&self, entry_type: &str) -> bool {
        self.overrides
            .get(entry_type)
            .is_none_or(|p| p.is_empty() || *p == self.default_pattern)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|(t, p)| (t.as_str(), p.as_str()))
    }

    fn load(store: &TypedStore) -> Self {
        let mut patterns = Self::new(&store.get_string(DEFAULT_CITATION_KEY_PATTERN));
        for entry_type in store.node_keys(CITATION_KEY_PATTERNS_NODE) {
            if let Some(pattern) = store.node_get(CITATION_KEY_PATTERNS_NODE, &entry_type) {
                patterns.set_pattern(&entry_type, &pattern);
            }
        }
        patterns
    }

    fn save(&self, store: &TypedStore) {
        store.put_string(DEFAULT_CITATION_KEY_PATTERN, &self.default_pattern);
        store.node_clear(CITATION_KEY_PATTERNS_NODE);
        for (entry_type, pattern) in self.overrides() {
            if !self.is_default(entry_type) {
                store.node_put(CITATION_KEY_PATTERNS_NODE, entry_type, pattern);
            }
        }
    }
}

#[derive(Debug)]
pub struct CitationKeyPatternPreferences {
    pub avoid_overwriting: Property<bool>,
    pub warn_before_overwriting: Property<bool>,
    pub generate_before_saving: Property<bool>,
    pub key_suffix: Property<KeySuffix>,
    pub key_pattern_regex: Property<String>,
    pub key_pattern_replacement: Property<String>,
    pub unwanted_characters: Property<String>,
    pub key_patterns: Property<GlobalCitationKeyPatterns>,
}

impl PreferenceGroup for CitationKeyPatternPreferences {
    fn load(shared: &Shared) -> Self {
        let store = &shared.store;
        Self {
            avoid_overwriting: Property::new(store.get_bool(AVOID_OVERWRITING_KEY)),
            warn_before_overwriting: Property::new(store.get_bool(WARN_BEFORE_OVERWRITING_KEY)),
            generate_before_saving: Property::new(store.get_bool(GENERATE_KEYS_BEFORE_SAVING)),
            key_suffix: Property::new(derive_from_flags(
                shared,
                KEY_SUFFIX_FLAGS,
                KeySuffix::SecondWithB,
            )),
            key_pattern_regex: Property::new(store.get_string(KEY_PATTERN_REGEX)),
            key_pattern_replacement: Property::new(store.get_string(KEY_PATTERN_REPLACEMENT)),
            unwanted_characters: Property::new(store.get_string(UNWANTED_CITATION_KEY_CHARACTERS)),
            key_patterns: Property::new(GlobalCitationKeyPatterns::load(store)),
        }
    }

    fn bind(&self, link: &Link) {
        bind_bool(&self.avoid_overwriting, link, AVOID_OVERWRITING_KEY);
        bind_bool(&self.warn_before_overwriting, link, WARN_BEFORE_OVERWRITING_KEY);
        bind_bool(&self.generate_before_saving, link, GENERATE_KEYS_BEFORE_SAVING);
        bind_flags(&self.key_suffix, link, KEY_SUFFIX_FLAGS);
        bind_string(&self.key_pattern_regex, link, KEY_PATTERN_REGEX);
        bind_string(&self.key_pattern_replacement, link, KEY_PATTERN_REPLACEMENT);
        bind_string(&self.unwanted_characters, link, UNWANTED_CITATION_KEY_CHARACTERS);
        bind_with(&self.key_patterns, link, |s, patterns| patterns.save(&s.store));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::testing::Fixture;

    #[test]
    fn test_key_suffix_priority() {
        let fx = Fixture::new();
        // defaults: keyGenFirstLetterA on, keyGenAlwaysAddLetter off
        assert_eq!(fx.prefs.citation_key_patterns().key_suffix.get(), KeySuffix::SecondWithA);

        let store = fx.prefs.store();
        store.put_bool(KEY_GEN_ALWAYS_ADD_LETTER, true);
        assert_eq!(fx.reopen().citation_key_patterns().key_suffix.get(), KeySuffix::Always);

        store.put_bool(KEY_GEN_ALWAYS_ADD_LETTER, false);
        store.put_bool(KEY_GEN_FIRST_LETTER_A, false);
        assert_eq!(
            fx.reopen().citation_key_patterns().key_suffix.get(),
            KeySuffix::SecondWithB
        );
    }

    #[test]
    fn test_key_suffix_write_back_sets_flags() {
        let fx = Fixture::new();
        fx.prefs.citation_key_patterns().key_suffix.set(KeySuffix::Always);
        assert!(fx.prefs.store().get_bool(KEY_GEN_ALWAYS_ADD_LETTER));
        assert!(!fx.prefs.store().get_bool(KEY_GEN_FIRST_LETTER_A));

        fx.prefs.citation_key_patterns().key_suffix.set(KeySuffix::SecondWithB);
        assert!(!fx.prefs.store().get_bool(KEY_GEN_ALWAYS_ADD_LETTER));
        assert!(!fx.prefs.store().get_bool(KEY_GEN_FIRST_LETTER_A));
    }

    #[test]
    fn test_patterns_use_child_node() {
        let fx = Fixture::new();
        let group = fx.prefs.citation_key_patterns();
        group.key_patterns.update(|p| {
            p.set_pattern("article", "[auth][year][shorttitle]");
            p.set_pattern("book", "[auth][year]");
        });

        let store = fx.prefs.store();
        assert_eq!(
            store.node_get(CITATION_KEY_PATTERNS_NODE, "article").as_deref(),
            Some("[auth][year][shorttitle]")
        );
        // same as the default, so not an override
        assert_eq!(store.node_get(CITATION_KEY_PATTERNS_NODE, "book"), None);

        let reloaded = fx.reopen().citation_key_patterns().key_patterns.get();
        assert_eq!(reloaded.pattern_for("article"), "[auth][year][shorttitle]");
        assert_eq!(reloaded.pattern_for("misc"), "[auth][year]");
    }

    #[test]
    fn test_removed_override_is_cleared_from_node() {
        let fx = Fixture::new();
        let group = fx.prefs.citation_key_patterns();
        group.key_patterns.update(|p| p.set_pattern("article", "[title]"));
        group.key_patterns.update(|p| {
            p.remove_pattern("article");
            p.set_default_pattern("");
        });
        assert!(fx.prefs.store().node_keys(CITATION_KEY_PATTERNS_NODE).is_empty());
        assert_eq!(fx.prefs.store().raw(DEFAULT_CITATION_KEY_PATTERN).as_deref(), Some(""));
    }
}
