//! Backend credentials: the Basic-Auth pair and where it is persisted.

mod store;

pub use store::{KeyringCredentialStore, MemoryCredentialStore};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Storage entry holding the username.
pub const USERNAME_KEY: &str = "username";
/// Storage entry holding the password.
pub const PASSWORD_KEY: &str = "password";

/// A username/password pair sent as HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves must be non-empty before the pair is worth sending.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Value for the `Authorization` header: `Basic base64(username:password)`.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Crypto error: {0}")]
    Crypto(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("App dir error: {0}")]
    AppDir(#[from] crate::app_dirs::AppDirError),
}

/// Persistent home of the credential pair, read on every outbound call.
pub trait CredentialStore: Send + Sync {
    /// Return the stored pair, or `None` when either entry is missing.
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError>;
    fn save(&self, credential: &Credential) -> Result<(), CredentialStoreError>;
    fn clear(&self) -> Result<(), CredentialStoreError>;
}
