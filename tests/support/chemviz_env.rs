use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

const CONFIG_HOME_ENV: &str = "CHEMVIZ_CONFIG_HOME";
const DISABLE_KEYRING_ENV: &str = "CHEMVIZ_DISABLE_KEYRING";
const API_BASE_ENV: &str = "CHEMVIZ_API_BASE";

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app at a scratch config home with the keyring disabled, so
/// credentials land in the encrypted file fallback under that home.
pub struct ChemvizEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl ChemvizEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = [CONFIG_HOME_ENV, DISABLE_KEYRING_ENV, API_BASE_ENV]
            .into_iter()
            .map(|key| (key, std::env::var(key).ok()))
            .collect();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME_ENV, path);
            std::env::set_var(DISABLE_KEYRING_ENV, "1");
            std::env::remove_var(API_BASE_ENV);
        }
        Self {
            previous,
            _lock: lock,
        }
    }

    pub fn set_api_base(&self, value: &str) {
        // SAFETY: the guard holds the global env lock.
        unsafe {
            std::env::set_var(API_BASE_ENV, value);
        }
    }
}

impl Drop for ChemvizEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
