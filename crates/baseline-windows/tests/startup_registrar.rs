#![cfg(windows)]

use baseline_windows::startup::StartupRegistrar;
use uuid::Uuid;
use winreg::enums::HKEY_CURRENT_USER;
use winreg::RegKey;

const PRODUCT: &str = "BaselineAssistantTest";
const EXE: &str = "C:\\Program Files\\Baseline\\baseline-assistant.exe";

#[test]
fn enable_then_disable_round_trip() {
    let (run_key, _guard) = create_run_key(true);
    let registrar = StartupRegistrar::new(PRODUCT, EXE, run_key.clone());

    assert!(!registrar.is_registered_for_startup());

    registrar.set_registered_for_startup(true).expect("enable");
    assert!(registrar.is_registered_for_startup());
    let stored: String = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey(&run_key)
        .expect("open run key")
        .get_value(PRODUCT)
        .expect("value written");
    assert_eq!(stored, EXE);

    registrar.set_registered_for_startup(false).expect("disable");
    assert!(!registrar.is_registered_for_startup());

    // 再次取消时值已不存在，应静默成功。
    registrar.set_registered_for_startup(false).expect("disable again");
}

#[test]
fn null_literal_counts_as_unregistered() {
    let (run_key, _guard) = create_run_key(true);
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let (key, _disp) = hkcu.create_subkey(&run_key).expect("create run key");
    key.set_value(PRODUCT, &"null").expect("set literal");

    let registrar = StartupRegistrar::new(PRODUCT, EXE, run_key);
    assert!(!registrar.is_registered_for_startup());
}

#[test]
fn missing_run_key_is_a_no_op() {
    let (run_key, _guard) = create_run_key(false);
    let registrar = StartupRegistrar::new(PRODUCT, EXE, run_key.clone());

    registrar.set_registered_for_startup(true).expect("no-op");
    assert!(!registrar.is_registered_for_startup());
    assert!(RegKey::predef(HKEY_CURRENT_USER).open_subkey(&run_key).is_err());
}

fn create_run_key(create: bool) -> (String, CleanupKey) {
    let root = format!("Software\\BaselineAssistantTest\\{}", Uuid::new_v4());
    let run_key = format!("{root}\\Run");
    if create {
        RegKey::predef(HKEY_CURRENT_USER)
            .create_subkey(&run_key)
            .expect("create run key");
    }
    (run_key, CleanupKey(root))
}

struct CleanupKey(String);

impl Drop for CleanupKey {
    fn drop(&mut self) {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let _ = hkcu.delete_subkey_all(&self.0);
    }
}
