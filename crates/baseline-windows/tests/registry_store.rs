#![cfg(windows)]

use baseline_core::error::BaselineError;
use baseline_core::keypath::{HiveId, KeyPath};
use baseline_windows::registry::{RegistryRead, RegistryStore, NOT_SET_DISPLAY};
use uuid::Uuid;
use winreg::enums::HKEY_CURRENT_USER;
use winreg::RegKey;

#[test]
fn missing_subkey_reads_as_empty() {
    let (key_path, _guard) = create_test_key();
    let store = RegistryStore::new();

    let path = KeyPath::new(HiveId::CurrentUser, format!("{key_path}\\absent"));
    let read = store.get_value(&path, "Anything").expect("lenient read");
    assert_eq!(read, RegistryRead::Unavailable);
    assert_eq!(read.display(), "");
}

#[test]
fn missing_value_reads_as_not_set() {
    let (key_path, _guard) = create_test_key();
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    hkcu.create_subkey(&key_path).expect("create subkey");

    let store = RegistryStore::new();
    let read = store
        .get_value(&KeyPath::new(HiveId::CurrentUser, key_path.clone()), "Absent")
        .expect("lenient read");
    assert_eq!(read, RegistryRead::NotSet);
    assert_eq!(read.display(), NOT_SET_DISPLAY);
}

#[test]
fn set_creates_intermediate_subkeys_and_reads_back() {
    let (key_path, _guard) = create_test_key();
    let store = RegistryStore::new();
    let full = format!("HKEY_CURRENT_USER\\{key_path}\\a\\b");

    store.set_value_at(&full, "Name", "hello", "string").expect("write string");
    assert_eq!(store.get_value_at(&full, "Name").unwrap().display(), "hello");

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let stored: String = hkcu
        .open_subkey(format!("{key_path}\\a\\b"))
        .expect("subkey created")
        .get_value("Name")
        .expect("value written");
    assert_eq!(stored, "hello");
}

#[test]
fn each_kind_round_trips_to_display_form() {
    let (key_path, _guard) = create_test_key();
    let store = RegistryStore::new();
    let path = KeyPath::new(HiveId::CurrentUser, key_path.clone());

    let cases = [
        ("S", "text", "string", "text"),
        ("E", "%SystemRoot%\\x", "expandstring", "%SystemRoot%\\x"),
        ("D", "4294967295", "dword", "-1"),
        ("D2", "15", "dword", "15"),
        ("Q", "9000000000", "qword", "9000000000"),
        ("M", "a,b,c", "multistring", "a,b,c"),
        ("U", "fallback", "unknown-kind", "fallback"),
    ];
    for (name, raw, kind, shown) in cases {
        store.set_value(&path, name, raw, kind).unwrap_or_else(|e| panic!("write {name}: {e}"));
        assert_eq!(store.get_value(&path, name).unwrap().display(), shown, "{name}");
    }

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let key = hkcu.open_subkey(&key_path).expect("open");
    let dword: u32 = key.get_value("D2").expect("dword stored as REG_DWORD");
    assert_eq!(dword, 15);
    let multi: Vec<String> = key.get_value("M").expect("multi stored as REG_MULTI_SZ");
    assert_eq!(multi, ["a", "b", "c"]);
}

#[test]
fn empty_arguments_fail_before_touching_registry() {
    let (key_path, _guard) = create_test_key();
    let store = RegistryStore::new();
    let path = KeyPath::new(HiveId::CurrentUser, key_path.clone());

    assert!(matches!(store.set_value(&path, "Name", "", "string"), Err(BaselineError::ArgumentNull("value"))));
    assert!(matches!(store.set_value(&path, "", "x", "string"), Err(BaselineError::ArgumentNull("name"))));
    assert!(matches!(store.get_value(&path, ""), Err(BaselineError::ArgumentNull("name"))));

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    assert!(hkcu.open_subkey(&key_path).is_err(), "no subkey should have been created");
}

#[test]
fn invalid_number_is_raised_on_write() {
    let (key_path, _guard) = create_test_key();
    let store = RegistryStore::new();
    let path = KeyPath::new(HiveId::CurrentUser, key_path);

    let err = store.set_value(&path, "D", "seven", "dword").unwrap_err();
    assert!(matches!(err, BaselineError::InvalidNumber { kind: "dword", .. }));
}

#[test]
fn malformed_path_degrades_on_read_and_fails_on_write() {
    let store = RegistryStore::new();
    assert_eq!(store.get_value_at("NOSEPARATOR", "x").unwrap(), RegistryRead::Unavailable);
    assert!(matches!(
        store.set_value_at("NOSEPARATOR", "x", "1", "string"),
        Err(BaselineError::MalformedPath(_))
    ));
}

fn create_test_key() -> (String, CleanupKey) {
    let path = format!("Software\\BaselineAssistantTest\\{}", Uuid::new_v4());
    (path.clone(), CleanupKey(path))
}

struct CleanupKey(String);

impl Drop for CleanupKey {
    fn drop(&mut self) {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let _ = hkcu.delete_subkey_all(&self.0);
    }
}
