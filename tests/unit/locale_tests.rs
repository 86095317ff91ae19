/*!
 * Tests for locale detection from file names
 */

use std::collections::BTreeMap;
use xlifftranslate::errors::LocaleError;
use xlifftranslate::locale::{
    FileMatch, LocaleFile, LocaleFileMatcher, RegionalOverrides, base_language,
};

/// Test the locale and base language of common file names
#[test]
fn test_fromFileName_withCommonNames_shouldExtractLocale() {
    let cases = [
        ("messages.fr.xlf", "fr", "fr"),
        ("messages.pt-BR.xlf", "pt-BR", "pt"),
        ("messages.zh_TW.xlf", "zh_TW", "zh"),
        ("app.messages.de.xlf", "messages", "messages"),
        ("es.xlf", "es", "es"),
    ];

    for (name, locale, lang) in cases {
        let file = LocaleFile::from_file_name(name).unwrap();
        assert_eq!(file.locale, locale, "locale of {}", name);
        assert_eq!(file.lang, lang, "language of {}", name);
    }
}

/// Test that names without a locale part are rejected
#[test]
fn test_fromFileName_withoutLocale_shouldBeUnrecognized() {
    for name in ["README", ".xlf"] {
        assert!(matches!(
            LocaleFile::from_file_name(name),
            Err(LocaleError::UnrecognizedFileName(_))
        ));
    }
}

/// Test that files outside the prefix are reported as mismatches, not errors
#[test]
fn test_classify_withPrefix_shouldSeparateMismatchFromErrors() {
    let matcher = LocaleFileMatcher::new(Some("messages.".to_string()));

    assert_eq!(matcher.classify("source.xlf").unwrap(), FileMatch::PrefixMismatch);
    assert!(matcher.classify("messages").is_err());
    assert_eq!(
        matcher.classify("messages.it.xlf").unwrap(),
        FileMatch::Locale(LocaleFile::from_file_name("messages.it.xlf").unwrap())
    );
}

/// Test that an empty prefix accepts every name
#[test]
fn test_classify_withEmptyPrefix_shouldAcceptAll() {
    let matcher = LocaleFileMatcher::new(Some(String::new()));
    assert!(matches!(matcher.classify("other.nl.xlf").unwrap(), FileMatch::Locale(_)));
}

/// Test that the override table is consulted before the base language
#[test]
fn test_serviceLanguage_withoutOverride_shouldFallBackToBaseLanguage() {
    let mut rules = BTreeMap::new();
    rules.insert("pt-BR".to_string(), "pt".to_string());
    let overrides = RegionalOverrides::new(rules);

    let file = LocaleFile::from_file_name("messages.es-MX.xlf").unwrap();
    assert_eq!(file.service_language(&overrides), "es");
    assert_eq!(file.service_language(&RegionalOverrides::default()), "es");
    assert_eq!(base_language("sr-Latn-RS"), "sr");
}
