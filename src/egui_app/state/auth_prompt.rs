/// Inputs of the sign-in modal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthPromptState {
    /// Whether the modal is showing.
    pub open: bool,
    pub username: String,
    pub password: String,
    /// Focus the username field on the next frame.
    pub focus_username_requested: bool,
}

impl AuthPromptState {
    pub fn show(&mut self) {
        self.open = true;
        self.password.clear();
        self.focus_username_requested = true;
    }

    pub fn hide(&mut self) {
        self.open = false;
        self.password.clear();
        self.focus_username_requested = false;
    }
}
