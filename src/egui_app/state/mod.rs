//! Shared state types for the egui UI.

mod auth_prompt;
mod status;
mod views;

pub use auth_prompt::*;
pub use status::*;
pub use views::*;

/// Page shown in the central panel once signed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    Upload,
    #[default]
    Dashboard,
    History,
    Visualizations,
}

impl Route {
    /// Navigation order.
    pub const ALL: [Route; 4] = [
        Route::Upload,
        Route::Dashboard,
        Route::History,
        Route::Visualizations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Route::Upload => "Upload",
            Route::Dashboard => "Dashboard",
            Route::History => "History",
            Route::Visualizations => "Visualizations",
        }
    }
}

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub route: Route,
    pub status: StatusBarState,
    pub auth_prompt: AuthPromptState,
    pub upload: UploadState,
    pub dashboard: DashboardState,
    pub history: HistoryState,
    pub visualizations: VisualizationState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            route: Route::default(),
            status: StatusBarState::idle(),
            auth_prompt: AuthPromptState::default(),
            upload: UploadState::default(),
            dashboard: DashboardState::default(),
            history: HistoryState::default(),
            visualizations: VisualizationState::default(),
        }
    }
}

impl UiState {
    /// Drop everything fetched for the previous user.
    pub fn clear_page_data(&mut self) {
        self.upload = UploadState::default();
        self.dashboard = DashboardState::default();
        self.history = HistoryState::default();
        self.visualizations = VisualizationState::default();
    }
}
