/*!
 * Tests for file and resource-mapping utilities
 */

use indexmap::IndexMap;
use tempfile::tempdir;

use langpack::errors::AppError;
use langpack::file_utils::{self, FileManager};

use crate::common;

#[test]
fn test_fileManager_ensureDir_shouldCreateNestedDirs() {
    let dir = tempdir().expect("tempdir");
    let nested = dir.path().join("a/b/c");

    FileManager::ensure_dir(&nested).expect("ensure_dir");
    assert!(FileManager::dir_exists(&nested));
}

#[test]
fn test_fileManager_writeAtomic_shouldReplaceContent() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");

    FileManager::write_atomic(&path, "first").expect("write");
    FileManager::write_atomic(&path, "second").expect("rewrite");

    assert_eq!(FileManager::read_to_string(&path).expect("read"), "second");
}

#[test]
fn test_loadLangMap_shouldPreserveInsertionOrder() {
    let dir = tempdir().expect("tempdir");
    let path = common::write_lang_file(
        dir.path(),
        "lang/en_us.json",
        &[("z.key", "Z"), ("a.key", "A"), ("m.key", "M")],
    );

    let map = file_utils::load_lang_map(&path).expect("load");
    let keys: Vec<&String> = map.keys().collect();
    assert_eq!(keys, ["z.key", "a.key", "m.key"]);
}

#[test]
fn test_loadLangMap_withNonObject_shouldBeMalformed() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    FileManager::write_to_file(&path, "[1, 2, 3]").expect("write");

    let error = file_utils::load_lang_map(&path).unwrap_err();
    assert!(matches!(error, AppError::MalformedInput(_)));
}

#[test]
fn test_loadLangMap_withNonStringValue_shouldBeMalformed() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    FileManager::write_to_file(&path, r#"{"key": {"nested": true}}"#).expect("write");

    let error = file_utils::load_lang_map(&path).unwrap_err();
    assert!(matches!(error, AppError::MalformedInput(_)));
}

#[test]
fn test_saveLangMap_shouldRoundTrip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("out/lang.json");

    let mut map = IndexMap::new();
    map.insert("greeting".to_string(), "こんにちは。\\n".to_string());
    file_utils::save_lang_map(&path, &map).expect("save");

    let loaded = file_utils::load_lang_map(&path).expect("load");
    assert_eq!(loaded, map);
}

#[test]
fn test_findLangFiles_shouldOnlyMatchLangDirs() {
    let dir = tempdir().expect("tempdir");
    common::write_lang_file(dir.path(), "moda/assets/moda/lang/en_us.json", &[("k", "v")]);
    common::write_lang_file(dir.path(), "modb/assets/modb/lang/en_us.json", &[("k", "v")]);
    // Wrong language and wrong directory should not match
    common::write_lang_file(dir.path(), "moda/assets/moda/lang/ja_jp.json", &[("k", "v")]);
    common::write_lang_file(dir.path(), "modc/en_us.json", &[("k", "v")]);

    let files = file_utils::find_lang_files(dir.path(), "en_us").expect("find");
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.ends_with("lang/en_us.json")));
}
