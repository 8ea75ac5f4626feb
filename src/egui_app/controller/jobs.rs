use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::api::{ApiClient, ApiError, HistoryEntry, Summary, UploadResult};
use crate::credentials::Credential;

/// Which page asked for a summary; both read the same endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SummaryTarget {
    Dashboard,
    Visualizations,
}

pub(crate) enum JobMessage {
    ProbeFinished(Result<(), ApiError>),
    Uploaded {
        file: PathBuf,
        result: Result<UploadResult, ApiError>,
    },
    SummaryLoaded {
        target: SummaryTarget,
        result: Result<Summary, ApiError>,
    },
    HistoryLoaded(Result<Vec<HistoryEntry>, ApiError>),
    PdfLoaded(Result<Vec<u8>, ApiError>),
}

/// A finished job tagged with the sign-in session that started it.
pub(crate) struct SessionMessage {
    pub(crate) session: u64,
    pub(crate) message: JobMessage,
}

/// One worker thread per request, at most one outstanding request per page.
pub(crate) struct ControllerJobs {
    message_tx: Sender<SessionMessage>,
    message_rx: Receiver<SessionMessage>,
    session: u64,
    /// Workers from earlier sessions that have not reported back yet.
    stale_outstanding: usize,
    probe_in_progress: bool,
    upload_in_progress: bool,
    dashboard_summary_in_progress: bool,
    visualization_summary_in_progress: bool,
    history_in_progress: bool,
    pdf_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<SessionMessage>();
        Self {
            message_tx,
            message_rx,
            session: 0,
            stale_outstanding: 0,
            probe_in_progress: false,
            upload_in_progress: false,
            dashboard_summary_in_progress: false,
            visualization_summary_in_progress: false,
            history_in_progress: false,
            pdf_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<SessionMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(super) fn session(&self) -> u64 {
        self.session
    }

    /// Detach page jobs from the current session so their results are dropped.
    ///
    /// The probe is left alone; sign out is refused while one is pending.
    pub(super) fn start_new_session(&mut self) {
        let detached = [
            &mut self.upload_in_progress,
            &mut self.dashboard_summary_in_progress,
            &mut self.visualization_summary_in_progress,
            &mut self.history_in_progress,
            &mut self.pdf_in_progress,
        ]
        .into_iter()
        .map(std::mem::take)
        .filter(|was_running| *was_running)
        .count();
        self.stale_outstanding += detached;
        self.session += 1;
    }

    /// Account for a result that arrived after its session ended.
    pub(super) fn discard_stale(&mut self) {
        self.stale_outstanding = self.stale_outstanding.saturating_sub(1);
    }

    pub(super) fn any_in_progress(&self) -> bool {
        self.stale_outstanding > 0
            || self.probe_in_progress
            || self.upload_in_progress
            || self.dashboard_summary_in_progress
            || self.visualization_summary_in_progress
            || self.history_in_progress
            || self.pdf_in_progress
    }

    pub(super) fn probe_in_progress(&self) -> bool {
        self.probe_in_progress
    }

    pub(super) fn begin_probe(&mut self, api: &ApiClient, credential: Credential) {
        if self.probe_in_progress {
            return;
        }
        self.probe_in_progress = true;
        self.spawn(api, move |api| JobMessage::ProbeFinished(api.probe(&credential)));
    }

    pub(super) fn clear_probe(&mut self) {
        self.probe_in_progress = false;
    }

    pub(super) fn upload_in_progress(&self) -> bool {
        self.upload_in_progress
    }

    pub(super) fn begin_upload(&mut self, api: &ApiClient, file: PathBuf) {
        if self.upload_in_progress {
            return;
        }
        self.upload_in_progress = true;
        self.spawn(api, move |api| {
            let result = api.upload_csv(&file);
            JobMessage::Uploaded { file, result }
        });
    }

    pub(super) fn clear_upload(&mut self) {
        self.upload_in_progress = false;
    }

    pub(super) fn summary_in_progress(&self, target: SummaryTarget) -> bool {
        match target {
            SummaryTarget::Dashboard => self.dashboard_summary_in_progress,
            SummaryTarget::Visualizations => self.visualization_summary_in_progress,
        }
    }

    pub(super) fn begin_summary(&mut self, api: &ApiClient, target: SummaryTarget) {
        if self.summary_in_progress(target) {
            return;
        }
        self.set_summary_in_progress(target, true);
        self.spawn(api, move |api| JobMessage::SummaryLoaded {
            target,
            result: api.get_summary(),
        });
    }

    pub(super) fn clear_summary(&mut self, target: SummaryTarget) {
        self.set_summary_in_progress(target, false);
    }

    fn set_summary_in_progress(&mut self, target: SummaryTarget, value: bool) {
        match target {
            SummaryTarget::Dashboard => self.dashboard_summary_in_progress = value,
            SummaryTarget::Visualizations => self.visualization_summary_in_progress = value,
        }
    }

    pub(super) fn history_in_progress(&self) -> bool {
        self.history_in_progress
    }

    pub(super) fn begin_history(&mut self, api: &ApiClient) {
        if self.history_in_progress {
            return;
        }
        self.history_in_progress = true;
        self.spawn(api, |api| JobMessage::HistoryLoaded(api.get_history()));
    }

    pub(super) fn clear_history(&mut self) {
        self.history_in_progress = false;
    }

    pub(super) fn pdf_in_progress(&self) -> bool {
        self.pdf_in_progress
    }

    pub(super) fn begin_pdf(&mut self, api: &ApiClient) {
        if self.pdf_in_progress {
            return;
        }
        self.pdf_in_progress = true;
        self.spawn(api, |api| JobMessage::PdfLoaded(api.get_pdf()));
    }

    pub(super) fn clear_pdf(&mut self) {
        self.pdf_in_progress = false;
    }

    fn spawn<F>(&self, api: &ApiClient, job: F)
    where
        F: FnOnce(ApiClient) -> JobMessage + Send + 'static,
    {
        let api = api.clone();
        let tx = self.message_tx.clone();
        let session = self.session;
        thread::spawn(move || {
            let _ = tx.send(SessionMessage {
                session,
                message: job(api),
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_detaches_page_jobs_but_not_validation() {
        let mut jobs = ControllerJobs::new();
        jobs.probe_in_progress = true;
        jobs.dashboard_summary_in_progress = true;
        jobs.pdf_in_progress = true;

        jobs.start_new_session();
        assert_eq!(jobs.session(), 1);
        assert!(jobs.probe_in_progress());
        assert!(!jobs.summary_in_progress(SummaryTarget::Dashboard));
        assert!(!jobs.pdf_in_progress());
        assert_eq!(jobs.stale_outstanding, 2);

        jobs.clear_probe();
        assert!(jobs.any_in_progress());
        jobs.discard_stale();
        jobs.discard_stale();
        assert!(!jobs.any_in_progress());
    }

    #[test]
    fn discarding_more_than_outstanding_saturates() {
        let mut jobs = ControllerJobs::new();
        jobs.discard_stale();
        assert!(!jobs.any_in_progress());
    }
}
