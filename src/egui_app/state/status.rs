use crate::egui_app::ui::style;
use egui::Color32;

/// Entries kept in the rolling status log.
const STATUS_LOG_LIMIT: usize = 50;

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    /// Rolling status log entries, oldest first.
    pub log: Vec<String>,
}

impl StatusBarState {
    /// Status shown before the credential gate has run.
    pub fn idle() -> Self {
        Self {
            text: "Starting up".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(style::StatusTone::Idle),
            log: Vec::new(),
        }
    }

    /// Replace the current message and append it to the log.
    pub fn set(&mut self, text: String, tone: style::StatusTone) {
        self.badge_label = style::status_badge_label(tone).into();
        self.badge_color = style::status_badge_color(tone);
        self.log.push(format!("[{}] {text}", self.badge_label));
        if self.log.len() > STATUS_LOG_LIMIT {
            let excess = self.log.len() - STATUS_LOG_LIMIT;
            self.log.drain(..excess);
        }
        self.text = text;
    }

    /// Concatenate log entries into a single displayable string.
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut status = StatusBarState::idle();
        for index in 0..(STATUS_LOG_LIMIT + 5) {
            status.set(format!("message {index}"), style::StatusTone::Info);
        }
        assert_eq!(status.log.len(), STATUS_LOG_LIMIT);
        assert_eq!(status.log[0], "[Info] message 5");
        assert_eq!(status.text, format!("message {}", STATUS_LOG_LIMIT + 4));
    }
}
