use crate::error::{Error, Result};
use crate::types::PreferenceMap;
use glob::Pattern;

/// Filter preferences by glob patterns (OR logic)
///
/// Returns the preferences whose key matches any of `patterns`.
pub fn query_preferences(preferences: &PreferenceMap, patterns: &[&str]) -> Result<PreferenceMap> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{p}': {e}"))))
        .collect::<Result<Vec<_>>>()?;

    let queried: PreferenceMap = preferences
        .iter()
        .filter(|(key, _)| compiled_patterns.iter().any(|pattern| pattern.matches(key)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(queried)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefValue;

    fn create_test_preferences() -> PreferenceMap {
        let mut prefs = PreferenceMap::new();
        prefs.insert("proxyHostname".to_string(), PrefValue::from("proxy.example.com"));
        prefs.insert("proxyPort".to_string(), PrefValue::from("8080"));
        prefs.insert("useProxy".to_string(), PrefValue::Bool(false));
        prefs.insert("mainFontSize".to_string(), PrefValue::Integer(9));
        prefs.insert("searchWindowHeight".to_string(), PrefValue::Float(176.0));
        prefs
    }

    #[test]
    fn test_query_single_pattern() {
        let prefs = create_test_preferences();
        let queried = query_preferences(&prefs, &["proxy*"]).unwrap();
        assert_eq!(queried.len(), 2);
        assert!(queried.contains_key("proxyHostname"));
        assert!(queried.contains_key("proxyPort"));
    }

    #[test]
    fn test_query_multiple_patterns_or_logic() {
        let prefs = create_test_preferences();
        let queried = query_preferences(&prefs, &["proxy*", "mainFontSize"]).unwrap();
        assert_eq!(queried.len(), 3);
        assert_eq!(queried["mainFontSize"], PrefValue::Integer(9));
    }

    #[test]
    fn test_query_is_case_sensitive() {
        let prefs = create_test_preferences();
        let queried = query_preferences(&prefs, &["*Proxy"]).unwrap();
        assert_eq!(queried.len(), 1);
        assert!(queried.contains_key("useProxy"));
    }

    #[test]
    fn test_query_no_matches() {
        let prefs = create_test_preferences();
        let queried = query_preferences(&prefs, &["nonexistent*"]).unwrap();
        assert!(queried.is_empty());
    }

    #[test]
    fn test_query_invalid_pattern() {
        let prefs = create_test_preferences();
        let result = query_preferences(&prefs, &["[invalid"]);
        assert!(matches!(result, Err(Error::InvalidGlobPattern(_))));
    }
}
