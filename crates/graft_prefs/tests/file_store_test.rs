//! Integration test for the TOML file store.

use graft_prefs::{shared, FileStoreConfig, SettingsStore, TomlFileStore};
use std::sync::Arc;
use std::thread;

fn temp_prefs_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_prefs_store_{id}.toml"))
}

#[test]
fn test_values_survive_reopen() {
    let path = temp_prefs_path();

    let mut store = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();
    store.set_bool("Demo.PushToTalk", true).unwrap();
    store.set_int("Demo.MasterVolume", 65).unwrap();
    store.set_string("Demo.Nickname", "graft").unwrap();
    store.flush().unwrap();
    drop(store);

    let reopened = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();
    assert!(reopened.get_bool("Demo.PushToTalk", false));
    assert_eq!(reopened.get_int("Demo.MasterVolume", 0), 65);
    assert_eq!(reopened.get_string("Demo.Nickname", ""), "graft");

    drop(reopened);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_drop_flushes_pending_writes() {
    let path = temp_prefs_path();

    {
        let mut store = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();
        store.set_int("Demo.Quality", 2).unwrap();
        assert!(store.is_dirty());
    }

    let reopened = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();
    assert_eq!(reopened.get_int("Demo.Quality", 0), 2);

    drop(reopened);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_write_through_without_flush() {
    let path = temp_prefs_path();
    let config = FileStoreConfig {
        autosave: true,
        flush_on_drop: false,
    };

    let mut store = TomlFileStore::open(&path, config).unwrap();
    store.set_string("Demo.Language", "zh").unwrap();
    assert!(!store.is_dirty());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("Demo.Language"));

    assert!(store.remove("Demo.Language").unwrap());
    let reopened = TomlFileStore::open(&path, config).unwrap();
    assert!(!reopened.contains("Demo.Language"));

    drop(store);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_shared_store_across_threads() {
    let path = temp_prefs_path();
    let store = shared(TomlFileStore::open(&path, FileStoreConfig::default()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store.lock().set_int(&format!("Thread{t}.Key{i}"), i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    store.lock().flush().unwrap();
    let reopened = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();
    assert_eq!(reopened.get_int("Thread3.Key24", -1), 24);

    drop(store);
    drop(reopened);
    std::fs::remove_file(&path).ok();
}
