use super::*;
use crate::api::ApiError;
use crate::auth::GateStep;
use crate::credentials::Credential;

impl EguiController {
    /// Submit the pair typed into the sign-in modal.
    pub fn submit_credentials(&mut self) {
        if self.jobs.probe_in_progress() {
            return;
        }
        let prompt = &self.ui.auth_prompt;
        let credential = Credential::new(prompt.username.trim(), prompt.password.clone());
        let step = self.gate.submit(credential);
        self.apply_gate_step(step);
    }

    /// The user closed the modal without signing in.
    pub fn cancel_credentials_prompt(&mut self) {
        self.gate.cancel();
        self.ui.auth_prompt.hide();
        self.sync_auth_status();
    }

    /// Forget the stored pair and ask again.
    pub fn sign_out(&mut self) {
        if self.jobs.probe_in_progress() {
            return;
        }
        let step = self.gate.sign_out();
        self.jobs.start_new_session();
        self.ui.clear_page_data();
        self.ui.route = Route::default();
        self.apply_gate_step(step);
    }

    /// Gate shared by every page action; re-opens the prompt when needed.
    pub fn ensure_authenticated(&mut self) -> bool {
        match self.gate.state() {
            AuthState::Authenticated => true,
            AuthState::Unauthenticated => {
                if !self.ui.auth_prompt.open {
                    self.ui.auth_prompt.show();
                }
                self.set_status("Sign in to continue", StatusTone::Warning);
                false
            }
            AuthState::Validating => {
                self.set_status("Still validating credentials…", StatusTone::Busy);
                false
            }
            AuthState::Failed(_) => false,
        }
    }

    pub(super) fn apply_probe_result(&mut self, result: Result<(), ApiError>) {
        let step = self.gate.resolve(result);
        self.apply_gate_step(step);
    }

    pub(super) fn apply_gate_step(&mut self, step: GateStep) {
        match step {
            GateStep::ShowPrompt => {
                self.ui.auth_prompt.show();
                match self.gate.notice().map(str::to_string) {
                    Some(notice) => self.set_status(notice, StatusTone::Warning),
                    None => self.set_status("Sign in to continue", StatusTone::Info),
                }
            }
            GateStep::Probe(credential) => {
                self.ui.auth_prompt.hide();
                self.jobs.begin_probe(&self.api, credential);
                self.set_status("Validating credentials…", StatusTone::Busy);
            }
            GateStep::Idle => {
                self.ui.auth_prompt.hide();
                self.sync_auth_status();
            }
        }
    }

    fn sync_auth_status(&mut self) {
        match self.gate.state().clone() {
            AuthState::Authenticated => {
                let user = self.gate.signed_in_user().unwrap_or_default().to_string();
                self.set_status(format!("Signed in as {user}"), StatusTone::Info);
            }
            AuthState::Failed(message) => self.set_status(message, StatusTone::Error),
            AuthState::Unauthenticated | AuthState::Validating => {}
        }
    }
}
