//! Credential gate in front of every page.
//!
//! The gate moves through `Unauthenticated → Validating → Authenticated` or
//! ends in `Failed`. Only an explicit 401 from the probe sends the user back to
//! the prompt; every other probe failure is terminal. The gate itself does no
//! I/O apart from the credential store: it hands the caller a [`GateStep`]
//! telling it to show the prompt or to run the probe, and is fed the probe
//! result through [`AuthGate::resolve`].

use std::sync::Arc;

use crate::api::ApiError;
use crate::credentials::{Credential, CredentialStore};

pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. App cannot proceed.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Please try again.";
pub const INCOMPLETE_CREDENTIALS_MESSAGE: &str = "Enter both a username and a password.";
pub const TOO_MANY_ATTEMPTS_MESSAGE: &str = "Too many failed login attempts.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    /// Waiting for the user to enter a credential pair.
    Unauthenticated,
    /// A probe request is in flight for the pending pair.
    Validating,
    Authenticated,
    /// Terminal; carries the message shown full-screen.
    Failed(String),
}

/// What the caller must do after a gate transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateStep {
    ShowPrompt,
    /// Run the probe for this pair and pass the result to [`AuthGate::resolve`].
    Probe(Credential),
    Idle,
}

/// How a probe result is interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Valid,
    /// The backend rejected the pair (HTTP 401).
    Invalid,
    /// Anything else: network failure, 404, 500, unreadable body.
    Indeterminate(String),
}

pub fn classify_probe(result: &Result<(), ApiError>) -> ProbeOutcome {
    match result {
        Ok(()) => ProbeOutcome::Valid,
        Err(err) if err.is_unauthorized() => ProbeOutcome::Invalid,
        Err(err) => ProbeOutcome::Indeterminate(err.user_message()),
    }
}

pub struct AuthGate {
    state: AuthState,
    pending: Option<Credential>,
    /// The pending pair was read from the store rather than typed.
    pending_is_stored: bool,
    rejected_attempts: u32,
    max_attempts: u32,
    notice: Option<String>,
    store: Arc<dyn CredentialStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn CredentialStore>, max_attempts: u32) -> Self {
        Self {
            state: AuthState::Unauthenticated,
            pending: None,
            pending_is_stored: false,
            rejected_attempts: 0,
            max_attempts: max_attempts.max(1),
            notice: None,
            store,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Inline message for the prompt, e.g. after a rejected attempt.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn rejected_attempts(&self) -> u32 {
        self.rejected_attempts
    }

    /// Username of the validated pair, for display.
    pub fn signed_in_user(&self) -> Option<&str> {
        match (&self.state, &self.pending) {
            (AuthState::Authenticated, Some(credential)) => Some(&credential.username),
            _ => None,
        }
    }

    /// Begin at startup: validate a persisted pair, or ask for one.
    pub fn start(&mut self) -> GateStep {
        match self.store.load() {
            Ok(Some(credential)) if credential.is_complete() => {
                let step = self.begin_validation(credential);
                self.pending_is_stored = true;
                step
            }
            Ok(_) => self.prompt(None),
            Err(err) => {
                tracing::warn!("Could not read stored credentials: {err}");
                self.prompt(None)
            }
        }
    }

    /// Accept a pair from the prompt.
    pub fn submit(&mut self, credential: Credential) -> GateStep {
        if self.state != AuthState::Unauthenticated {
            return GateStep::Idle;
        }
        if !credential.is_complete() {
            return self.prompt(Some(INCOMPLETE_CREDENTIALS_MESSAGE.to_string()));
        }
        self.begin_validation(credential)
    }

    /// The user dismissed the prompt; the app cannot proceed.
    pub fn cancel(&mut self) {
        if self.state == AuthState::Unauthenticated {
            self.fail(AUTH_REQUIRED_MESSAGE.to_string());
        }
    }

    /// Feed the probe result for the pending pair.
    pub fn resolve(&mut self, result: Result<(), ApiError>) -> GateStep {
        if self.state != AuthState::Validating {
            return GateStep::Idle;
        }
        match classify_probe(&result) {
            ProbeOutcome::Valid => self.accept(),
            ProbeOutcome::Invalid => self.reject(),
            ProbeOutcome::Indeterminate(message) => {
                self.pending = None;
                self.fail(format!(
                    "Error during validation: {message}. Please check that the backend is running."
                ));
                GateStep::Idle
            }
        }
    }

    /// Forget the stored pair and return to the prompt.
    pub fn sign_out(&mut self) -> GateStep {
        if let Err(err) = self.store.clear() {
            tracing::warn!("Failed to clear stored credentials: {err}");
        }
        self.pending = None;
        self.rejected_attempts = 0;
        tracing::info!("Signed out");
        self.prompt(None)
    }

    fn begin_validation(&mut self, credential: Credential) -> GateStep {
        self.state = AuthState::Validating;
        self.notice = None;
        self.pending = Some(credential.clone());
        self.pending_is_stored = false;
        GateStep::Probe(credential)
    }

    fn accept(&mut self) -> GateStep {
        let Some(credential) = self.pending.as_ref() else {
            self.fail(AUTH_REQUIRED_MESSAGE.to_string());
            return GateStep::Idle;
        };
        if let Err(err) = self.store.save(credential) {
            self.fail(format!("Could not store credentials: {err}"));
            return GateStep::Idle;
        }
        tracing::info!("Authenticated as {}", credential.username);
        self.state = AuthState::Authenticated;
        self.notice = None;
        GateStep::Idle
    }

    fn reject(&mut self) -> GateStep {
        self.pending = None;
        if let Err(err) = self.store.clear() {
            tracing::warn!("Failed to discard rejected credentials: {err}");
        }
        // A stale stored pair never costs the user one of their typed attempts.
        if std::mem::take(&mut self.pending_is_stored) {
            tracing::info!("Stored credentials rejected");
            return self.prompt(Some(INVALID_CREDENTIALS_MESSAGE.to_string()));
        }
        self.rejected_attempts += 1;
        tracing::info!(
            "Credentials rejected ({} of {} attempts)",
            self.rejected_attempts,
            self.max_attempts
        );
        if self.rejected_attempts >= self.max_attempts {
            self.fail(TOO_MANY_ATTEMPTS_MESSAGE.to_string());
            return GateStep::Idle;
        }
        self.prompt(Some(INVALID_CREDENTIALS_MESSAGE.to_string()))
    }

    fn prompt(&mut self, notice: Option<String>) -> GateStep {
        self.state = AuthState::Unauthenticated;
        self.notice = notice;
        GateStep::ShowPrompt
    }

    fn fail(&mut self, message: String) {
        tracing::error!("Authentication failed: {message}");
        self.notice = None;
        self.state = AuthState::Failed(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;

    fn gate_with(store: Arc<MemoryCredentialStore>, max_attempts: u32) -> AuthGate {
        AuthGate::new(store, max_attempts)
    }

    fn unauthorized() -> Result<(), ApiError> {
        Err(ApiError::Unauthorized { message: None })
    }

    #[test]
    fn classification_singles_out_401() {
        assert_eq!(classify_probe(&Ok(())), ProbeOutcome::Valid);
        assert_eq!(classify_probe(&unauthorized()), ProbeOutcome::Invalid);
        for err in [
            ApiError::Status {
                code: 500,
                message: None,
            },
            ApiError::Status {
                code: 404,
                message: Some("No data available".into()),
            },
            ApiError::Status {
                code: 403,
                message: None,
            },
            ApiError::Transport("connection refused".into()),
        ] {
            assert!(matches!(
                classify_probe(&Err(err)),
                ProbeOutcome::Indeterminate(_)
            ));
        }
    }

    #[test]
    fn missing_credentials_prompt_then_success_persists() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut gate = gate_with(store.clone(), 3);
        assert_eq!(gate.start(), GateStep::ShowPrompt);
        assert_eq!(gate.state(), &AuthState::Unauthenticated);

        let credential = Credential::new("admin", "pw");
        assert_eq!(
            gate.submit(credential.clone()),
            GateStep::Probe(credential.clone())
        );
        assert_eq!(gate.state(), &AuthState::Validating);
        assert_eq!(store.load().unwrap(), None);

        assert_eq!(gate.resolve(Ok(())), GateStep::Idle);
        assert!(gate.is_authenticated());
        assert_eq!(gate.signed_in_user(), Some("admin"));
        assert_eq!(store.load().unwrap(), Some(credential));
    }

    #[test]
    fn stored_credentials_are_probed_without_prompt() {
        let credential = Credential::new("ops", "secret");
        let store = Arc::new(MemoryCredentialStore::with_credential(credential.clone()));
        let mut gate = gate_with(store, 3);
        assert_eq!(gate.start(), GateStep::Probe(credential));
        assert_eq!(gate.state(), &AuthState::Validating);
    }

    #[test]
    fn unauthorized_discards_and_reprompts() {
        let credential = Credential::new("ops", "stale");
        let store = Arc::new(MemoryCredentialStore::with_credential(credential));
        let mut gate = gate_with(store.clone(), 3);
        gate.start();

        assert_eq!(gate.resolve(unauthorized()), GateStep::ShowPrompt);
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
        assert_eq!(gate.notice(), Some(INVALID_CREDENTIALS_MESSAGE));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn stale_stored_pair_does_not_use_up_an_attempt() {
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "ops", "stale",
        )));
        let mut gate = gate_with(store.clone(), 1);
        gate.start();

        assert_eq!(gate.resolve(unauthorized()), GateStep::ShowPrompt);
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
        assert_eq!(gate.rejected_attempts(), 0);
        assert_eq!(store.load().unwrap(), None);

        gate.submit(Credential::new("ops", "still wrong"));
        assert_eq!(gate.resolve(unauthorized()), GateStep::Idle);
        assert_eq!(
            gate.state(),
            &AuthState::Failed(TOO_MANY_ATTEMPTS_MESSAGE.to_string())
        );
    }

    #[test]
    fn server_error_is_terminal_without_reprompt() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut gate = gate_with(store.clone(), 3);
        gate.start();
        gate.submit(Credential::new("a", "b"));

        let step = gate.resolve(Err(ApiError::Status {
            code: 500,
            message: None,
        }));
        assert_eq!(step, GateStep::Idle);
        assert!(matches!(gate.state(), AuthState::Failed(_)));
        assert_eq!(gate.submit(Credential::new("a", "b")), GateStep::Idle);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn network_failure_is_terminal() {
        let mut gate = gate_with(Arc::new(MemoryCredentialStore::new()), 3);
        gate.start();
        gate.submit(Credential::new("a", "b"));
        gate.resolve(Err(ApiError::Transport("connection refused".into())));
        let AuthState::Failed(message) = gate.state() else {
            panic!("expected failure, got {:?}", gate.state());
        };
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn reprompt_loop_is_bounded() {
        let mut gate = gate_with(Arc::new(MemoryCredentialStore::new()), 2);
        gate.start();
        gate.submit(Credential::new("a", "wrong"));
        assert_eq!(gate.resolve(unauthorized()), GateStep::ShowPrompt);
        gate.submit(Credential::new("a", "still wrong"));
        assert_eq!(gate.resolve(unauthorized()), GateStep::Idle);
        assert_eq!(
            gate.state(),
            &AuthState::Failed(TOO_MANY_ATTEMPTS_MESSAGE.to_string())
        );
        assert_eq!(gate.rejected_attempts(), 2);
    }

    #[test]
    fn incomplete_submission_keeps_prompt_open() {
        let mut gate = gate_with(Arc::new(MemoryCredentialStore::new()), 3);
        gate.start();
        assert_eq!(gate.submit(Credential::new("", "pw")), GateStep::ShowPrompt);
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
        assert_eq!(gate.notice(), Some(INCOMPLETE_CREDENTIALS_MESSAGE));
    }

    #[test]
    fn cancel_is_terminal() {
        let mut gate = gate_with(Arc::new(MemoryCredentialStore::new()), 3);
        gate.start();
        gate.cancel();
        assert_eq!(
            gate.state(),
            &AuthState::Failed(AUTH_REQUIRED_MESSAGE.to_string())
        );
    }

    #[test]
    fn sign_out_clears_store_and_resets_attempts() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut gate = gate_with(store.clone(), 3);
        gate.start();
        gate.submit(Credential::new("a", "wrong"));
        gate.resolve(unauthorized());
        gate.submit(Credential::new("a", "right"));
        gate.resolve(Ok(()));
        assert!(gate.is_authenticated());

        assert_eq!(gate.sign_out(), GateStep::ShowPrompt);
        assert_eq!(gate.rejected_attempts(), 0);
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(gate.signed_in_user(), None);
    }

    #[test]
    fn late_probe_results_are_ignored() {
        let mut gate = gate_with(Arc::new(MemoryCredentialStore::new()), 3);
        gate.start();
        assert_eq!(gate.resolve(Ok(())), GateStep::Idle);
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
    }
}
