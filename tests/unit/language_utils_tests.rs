/*!
 * Tests for language utilities
 */

use langpack::language_utils;

#[test]
fn test_getLanguageName_withPart1Code_shouldResolve() {
    assert_eq!(language_utils::get_language_name("ja").expect("ja"), "Japanese");
    assert_eq!(language_utils::get_language_name("en").expect("en"), "English");
}

#[test]
fn test_getLanguageName_withPart3Code_shouldResolve() {
    assert_eq!(language_utils::get_language_name("jpn").expect("jpn"), "Japanese");
}

#[test]
fn test_getLanguageName_withInvalidCode_shouldFail() {
    assert!(language_utils::get_language_name("zz").is_err());
    assert!(language_utils::get_language_name("").is_err());
    assert!(language_utils::get_language_name("japanese").is_err());
}

#[test]
fn test_normalizeToPart3_shouldExpandTwoLetterCodes() {
    assert_eq!(language_utils::normalize_to_part3("ja").expect("ja"), "jpn");
    assert_eq!(language_utils::normalize_to_part3("JPN").expect("JPN"), "jpn");
}

#[test]
fn test_languageCodesMatch_shouldIgnoreCodeLength() {
    assert!(language_utils::language_codes_match("ja", "jpn"));
    assert!(language_utils::language_codes_match("en", "eng"));
    assert!(!language_utils::language_codes_match("ja", "en"));
}

#[test]
fn test_usesIdeographicPunctuation_shouldMatchCjkLanguages() {
    assert!(language_utils::uses_ideographic_punctuation("ja"));
    assert!(language_utils::uses_ideographic_punctuation("zho"));
    assert!(!language_utils::uses_ideographic_punctuation("en"));
    assert!(!language_utils::uses_ideographic_punctuation("fr"));
}
