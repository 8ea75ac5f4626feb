mod support;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chemviz::auth::{AuthState, TOO_MANY_ATTEMPTS_MESSAGE};
use chemviz::config::{self, AppSettings};
use chemviz::credentials::{Credential, CredentialStore, KeyringCredentialStore};
use chemviz::download::FixedDestination;
use chemviz::egui_app::controller::EguiController;
use support::chemviz_env::ChemvizEnvGuard;
use support::mock_backend::{MockBackend, MockResponse, unreachable_base_url};
use tempfile::TempDir;

const VALID_HEADER: &str = "Basic YWRtaW46Y29ycmVjdA=="; // admin:correct

struct GateHarness {
    _config: ChemvizEnvGuard,
    _temp: TempDir,
    store: Arc<KeyringCredentialStore>,
    settings: AppSettings,
}

impl GateHarness {
    fn new(base_url: &str) -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let env = ChemvizEnvGuard::set_config_home(temp.path().join("config"));
        env.set_api_base(base_url);
        let settings = config::load_or_default().expect("load settings");
        let store = Arc::new(KeyringCredentialStore::new().expect("credential store"));
        Self {
            _config: env,
            _temp: temp,
            store,
            settings,
        }
    }

    fn controller(&self) -> EguiController {
        EguiController::new(
            &self.settings,
            self.store.clone(),
            Box::new(FixedDestination(None)),
        )
        .expect("controller")
    }

    fn settle(controller: &mut EguiController) {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            controller.poll_background_jobs();
            if !controller.has_pending_jobs() {
                return;
            }
            assert!(Instant::now() < deadline, "background jobs did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn sign_in(controller: &mut EguiController, username: &str, password: &str) {
        controller.ui.auth_prompt.username = username.to_string();
        controller.ui.auth_prompt.password = password.to_string();
        controller.submit_credentials();
        Self::settle(controller);
    }
}

fn checks_password(request: &support::mock_backend::RecordedRequest) -> MockResponse {
    if request.header("authorization") == Some(VALID_HEADER) {
        MockResponse::json(200, "[]")
    } else {
        MockResponse::json(401, r#"{"detail": "Invalid username/password."}"#)
    }
}

#[test]
fn rejected_pair_reprompts_then_valid_pair_is_persisted() {
    let backend = MockBackend::start(checks_password);
    let harness = GateHarness::new(backend.base_url());
    let mut controller = harness.controller();
    assert_eq!(controller.auth_state(), &AuthState::Unauthenticated);
    assert!(controller.ui.auth_prompt.open);

    GateHarness::sign_in(&mut controller, "admin", "wrong");
    assert_eq!(controller.auth_state(), &AuthState::Unauthenticated);
    assert!(controller.ui.auth_prompt.open);
    assert_eq!(
        controller.auth_notice(),
        Some("Invalid credentials. Please try again.")
    );
    assert_eq!(harness.store.load().unwrap(), None);

    GateHarness::sign_in(&mut controller, "admin", "correct");
    assert_eq!(controller.auth_state(), &AuthState::Authenticated);
    assert_eq!(
        harness.store.load().unwrap(),
        Some(Credential::new("admin", "correct"))
    );
    assert_eq!(backend.paths(), ["GET /api/history/", "GET /api/history/"]);
}

#[test]
fn persisted_pair_is_reused_on_next_launch() {
    let backend = MockBackend::start(checks_password);
    let harness = GateHarness::new(backend.base_url());
    let mut first = harness.controller();
    GateHarness::sign_in(&mut first, "admin", "correct");
    drop(first);

    let mut second = harness.controller();
    assert!(!second.ui.auth_prompt.open);
    GateHarness::settle(&mut second);
    assert_eq!(second.auth_state(), &AuthState::Authenticated);

    second.fetch_history();
    GateHarness::settle(&mut second);
    let last = backend.requests().pop().unwrap();
    assert_eq!(last.header("authorization"), Some(VALID_HEADER));
}

#[test]
fn stale_persisted_pair_is_discarded_on_401() {
    let backend = MockBackend::start(checks_password);
    let harness = GateHarness::new(backend.base_url());
    harness
        .store
        .save(&Credential::new("admin", "old-password"))
        .unwrap();
    let mut controller = harness.controller();
    GateHarness::settle(&mut controller);
    assert_eq!(controller.auth_state(), &AuthState::Unauthenticated);
    assert!(controller.ui.auth_prompt.open);
    assert_eq!(harness.store.load().unwrap(), None);
}

#[test]
fn server_error_during_validation_is_terminal() {
    let backend = MockBackend::start(|_| MockResponse::json(500, "{}"));
    let harness = GateHarness::new(backend.base_url());
    let mut controller = harness.controller();
    GateHarness::sign_in(&mut controller, "admin", "correct");

    let AuthState::Failed(message) = controller.auth_state().clone() else {
        panic!("expected terminal failure, got {:?}", controller.auth_state());
    };
    assert!(message.contains("Request failed with status code 500"));
    assert!(!controller.ui.auth_prompt.open);

    // No re-prompt: further submissions are ignored.
    GateHarness::sign_in(&mut controller, "admin", "correct");
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(harness.store.load().unwrap(), None);
}

#[test]
fn unreachable_backend_during_validation_is_terminal() {
    let harness = GateHarness::new(&unreachable_base_url());
    let mut controller = harness.controller();
    GateHarness::sign_in(&mut controller, "admin", "correct");
    assert!(matches!(controller.auth_state(), AuthState::Failed(_)));
}

#[test]
fn repeated_rejections_exhaust_the_attempt_budget() {
    let backend = MockBackend::start(checks_password);
    let harness = GateHarness::new(backend.base_url());
    let mut controller = harness.controller();
    for attempt in 0..harness.settings.auth.max_attempts {
        assert!(controller.ui.auth_prompt.open, "prompt closed before attempt {attempt}");
        GateHarness::sign_in(&mut controller, "admin", "wrong");
    }
    assert_eq!(
        controller.auth_state(),
        &AuthState::Failed(TOO_MANY_ATTEMPTS_MESSAGE.to_string())
    );
}

#[test]
fn cancelling_the_prompt_is_terminal() {
    let backend = MockBackend::start(checks_password);
    let harness = GateHarness::new(backend.base_url());
    let mut controller = harness.controller();
    controller.cancel_credentials_prompt();
    assert_eq!(
        controller.auth_state(),
        &AuthState::Failed("Authentication required. App cannot proceed.".to_string())
    );
    assert!(backend.requests().is_empty());
}
