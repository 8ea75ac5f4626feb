use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Credential, CredentialStore, CredentialStoreError, PASSWORD_KEY, USERNAME_KEY};
use crate::app_dirs;

const KEYRING_SERVICE: &str = "chemviz";
const DISABLE_KEYRING_ENV: &str = "CHEMVIZ_DISABLE_KEYRING";
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Stores the pair in the OS keyring, falling back to encrypted files when the
/// keyring is unavailable or does not read back what was written.
#[derive(Clone, Debug)]
pub struct KeyringCredentialStore {
    fallback_dir: PathBuf,
}

impl KeyringCredentialStore {
    pub fn new() -> Result<Self, CredentialStoreError> {
        Ok(Self::with_fallback_dir(app_dirs::secrets_dir()?))
    }

    pub fn with_fallback_dir(fallback_dir: PathBuf) -> Self {
        Self { fallback_dir }
    }

    fn keyring_get(&self) -> Option<Credential> {
        if keyring_disabled() {
            return None;
        }
        let username = keyring_read(USERNAME_KEY)?;
        let password = keyring_read(PASSWORD_KEY)?;
        Some(Credential { username, password })
    }

    fn keyring_set(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        if keyring_disabled() {
            return Err(CredentialStoreError::Unavailable("keyring disabled".into()));
        }
        keyring_write(USERNAME_KEY, &credential.username)?;
        keyring_write(PASSWORD_KEY, &credential.password)?;
        // Some backends accept writes they never persist.
        match self.keyring_get() {
            Some(stored) if &stored == credential => Ok(()),
            _ => Err(CredentialStoreError::Unavailable(
                "keyring did not read back the stored credential".into(),
            )),
        }
    }

    fn keyring_delete(&self) {
        if keyring_disabled() {
            return;
        }
        for key in [USERNAME_KEY, PASSWORD_KEY] {
            if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, key) {
                let _ = entry.delete_credential();
            }
        }
    }

    fn key_path(&self) -> PathBuf {
        self.fallback_dir.join("credentials.key")
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.fallback_dir.join(format!("{key}.bin"))
    }

    fn fallback_get(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let key_path = self.key_path();
        if !key_path.exists() {
            return Ok(None);
        }
        let key = std::fs::read(key_path)?;
        if key.len() != KEY_LEN {
            return Err(CredentialStoreError::Decode("credential key invalid".into()));
        }
        let Some(username) = self.fallback_read_entry(&key, USERNAME_KEY)? else {
            return Ok(None);
        };
        let Some(password) = self.fallback_read_entry(&key, PASSWORD_KEY)? else {
            return Ok(None);
        };
        Ok(Some(Credential { username, password }))
    }

    fn fallback_read_entry(
        &self,
        key: &[u8],
        name: &str,
    ) -> Result<Option<String>, CredentialStoreError> {
        let path = self.entry_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(path)?;
        if data.len() < NONCE_LEN {
            return Err(CredentialStoreError::Decode(format!("{name} entry too short")));
        }
        let (nonce, ciphertext) = data.split_at(NONCE_LEN);
        let plaintext = decrypt(key, nonce, ciphertext)?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|err| CredentialStoreError::Decode(err.to_string()))
    }

    fn fallback_set(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        std::fs::create_dir_all(&self.fallback_dir)?;
        let key_path = self.key_path();
        let key = if key_path.exists() {
            std::fs::read(&key_path)?
        } else {
            let bytes = random_bytes(KEY_LEN)?;
            write_private_file(&key_path, &bytes)?;
            bytes
        };
        if key.len() != KEY_LEN {
            return Err(CredentialStoreError::Decode("credential key invalid".into()));
        }
        for (name, value) in [
            (USERNAME_KEY, credential.username.as_str()),
            (PASSWORD_KEY, credential.password.as_str()),
        ] {
            let nonce = random_bytes(NONCE_LEN)?;
            let mut payload = nonce.clone();
            payload.extend(encrypt(&key, &nonce, value.as_bytes())?);
            write_private_file(&self.entry_path(name), &payload)?;
        }
        Ok(())
    }

    fn fallback_delete(&self) {
        for path in [
            self.entry_path(USERNAME_KEY),
            self.entry_path(PASSWORD_KEY),
            self.key_path(),
        ] {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        if let Some(credential) = self.keyring_get() {
            return Ok(Some(credential));
        }
        self.fallback_get()
    }

    fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        match self.keyring_set(credential) {
            Ok(()) => {
                self.fallback_delete();
                Ok(())
            }
            Err(err) => {
                tracing::debug!("Keyring unavailable, using encrypted file store: {err}");
                self.keyring_delete();
                self.fallback_set(credential)
            }
        }
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        self.keyring_delete();
        self.fallback_delete();
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            inner: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        *self.inner.lock().unwrap_or_else(|err| err.into_inner()) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.inner.lock().unwrap_or_else(|err| err.into_inner()) = None;
        Ok(())
    }
}

fn keyring_disabled() -> bool {
    std::env::var(DISABLE_KEYRING_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn keyring_read(key: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, key).ok()?;
    entry.get_password().ok()
}

fn keyring_write(key: &str, value: &str) -> Result<(), CredentialStoreError> {
    keyring::Entry::new(KEYRING_SERVICE, key)
        .and_then(|entry| entry.set_password(value))
        .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))
}

fn random_bytes(len: usize) -> Result<Vec<u8>, CredentialStoreError> {
    use rand::TryRngCore;
    let mut out = vec![0u8; len];
    rand::rngs::OsRng
        .try_fill_bytes(&mut out)
        .map_err(|err| CredentialStoreError::Unavailable(err.to_string()))?;
    Ok(out)
}

fn write_private_file(path: &Path, bytes: &[u8]) -> Result<(), CredentialStoreError> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

fn encrypt(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CredentialStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| CredentialStoreError::Crypto(err.to_string()))?;
    cipher
        .encrypt(chacha20poly1305::Nonce::from_slice(nonce), plaintext)
        .map_err(|err| CredentialStoreError::Crypto(err.to_string()))
}

fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CredentialStoreError> {
    use chacha20poly1305::aead::{Aead, KeyInit};
    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key)
        .map_err(|err| CredentialStoreError::Crypto(err.to_string()))?;
    cipher
        .decrypt(chacha20poly1305::Nonce::from_slice(nonce), ciphertext)
        .map_err(|err| CredentialStoreError::Crypto(err.to_string()))
}
