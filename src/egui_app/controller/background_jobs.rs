use super::jobs::{JobMessage, SessionMessage};
use super::*;

impl EguiController {
    /// Apply every finished job. Call once per frame.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let SessionMessage { session, message } = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(
                    std::sync::mpsc::TryRecvError::Empty
                    | std::sync::mpsc::TryRecvError::Disconnected,
                ) => {
                    break;
                }
            };
            if session != self.jobs.session() {
                tracing::debug!("Dropping result from an ended session");
                self.jobs.discard_stale();
                continue;
            }

            match message {
                JobMessage::ProbeFinished(result) => {
                    self.jobs.clear_probe();
                    self.apply_probe_result(result);
                }
                JobMessage::Uploaded { file, result } => {
                    self.jobs.clear_upload();
                    self.apply_upload_result(file, result);
                }
                JobMessage::SummaryLoaded { target, result } => {
                    self.jobs.clear_summary(target);
                    self.apply_summary_result(target, result);
                }
                JobMessage::HistoryLoaded(result) => {
                    self.jobs.clear_history();
                    self.apply_history_result(result);
                }
                JobMessage::PdfLoaded(result) => {
                    self.jobs.clear_pdf();
                    self.apply_pdf_result(result);
                }
            }
        }
    }
}
