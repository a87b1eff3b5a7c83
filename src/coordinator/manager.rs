use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info};
use uuid::Uuid;

use crate::backend::action::{InputType, JobAction};
use crate::backend::client::{BackendClient, BackendError};
use crate::config::Settings;
use crate::coordinator::alert::{Alert, AlertLog};
use crate::coordinator::batch::{PendingBatch, RequestLog, RequestStatus};
use crate::coordinator::workdir::WorkingDirectory;
use crate::queue::row::JobRow;
use crate::queue::snapshot::QueueSnapshot;
use crate::selection::Selection;

/// Drives the queue against the backend on behalf of a host
///
/// All state lives behind `&mut self` on a single task: batch bookkeeping is
/// only touched between awaits, so no locking is needed. Multi-threaded
/// hosts are not supported.
pub struct Coordinator {
    client: BackendClient,
    settings: Settings,
    snapshot: QueueSnapshot,
    selection: Selection,
    alerts: AlertLog,
    request_log: RequestLog,
    workdir: WorkingDirectory,
    last_fetch: Option<Instant>,
    user: Option<String>,
}

impl Coordinator {
    pub fn new(client: BackendClient, settings: Settings) -> Coordinator {
        Coordinator {
            client,
            settings,
            snapshot: QueueSnapshot::empty(),
            selection: Selection::new(),
            alerts: AlertLog::new(),
            request_log: RequestLog::new(),
            workdir: WorkingDirectory::new("/", ""),
            last_fetch: None,
            user: None,
        }
    }

    pub fn snapshot(&self) -> &QueueSnapshot {
        &self.snapshot
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut AlertLog {
        &mut self.alerts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn set_working_dir(&mut self, workdir: WorkingDirectory) {
        self.workdir = workdir;
    }

    pub fn toggle_user_only(&mut self) {
        self.settings.user_only = !self.settings.user_only;
        info!(
            "Queue view switched to {}",
            if self.settings.user_only { "user" } else { "global" }
        );
    }

    /// Diagnostic completeness check over every request ever issued
    pub fn all_requests_settled(&self) -> bool {
        self.request_log
            .values()
            .all(|status| *status != RequestStatus::Sent)
    }

    /// Replace the snapshot with a fresh fetch, unconditionally
    ///
    /// A failed fetch leaves the previous snapshot in place.
    pub async fn fetch_queue(&mut self) -> Result<(), BackendError> {
        let rows = self.client.squeue(self.settings.user_only).await?;
        info!("Fetched queue snapshot with {} row(s)", rows.len());
        self.snapshot = QueueSnapshot::new(rows);
        self.last_fetch = Some(Instant::now());
        Ok(())
    }

    /// Fetch unless the previous fetch completed less than `floor` ago
    ///
    /// Returns false when the call was collapsed. The floor is soft: it is
    /// measured from completion of the previous fetch, so fetch latency
    /// extends the effective period and fetches never overlap.
    pub async fn fetch_queue_limited(&mut self, floor: Duration) -> Result<bool, BackendError> {
        if let Some(last) = self.last_fetch {
            let elapsed = last.elapsed();
            if elapsed < floor {
                debug!("Skipping fetch, {elapsed:?} since the last one is under the {floor:?} floor");
                return Ok(false);
            }
        }
        self.fetch_queue().await?;
        Ok(true)
    }

    /// Fetch and cache the username the backend runs as
    pub async fn fetch_user(&mut self) -> Result<String, BackendError> {
        let user = self.client.user().await?;
        info!("Backend user is {user}");
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Rows to display: the whole snapshot, or only the current user's jobs
    /// when the user-only filter is on
    ///
    /// This list defines the index space of the row selection; dispatch
    /// resolves selected indices against it.
    pub fn visible_rows(&self) -> Vec<&JobRow> {
        if self.settings.user_only {
            if let (Some(user), Some(idx)) = (self.user.as_deref(), self.settings.user_col_idx()) {
                return self.snapshot.user_rows(user, idx);
            }
        }
        self.snapshot.rows().iter().collect()
    }

    /// Run one action over the currently selected rows
    ///
    /// Selection indices are resolved against [Coordinator::visible_rows],
    /// the same list a host displays, so a selection made under the
    /// user-only filter can never land on a filtered-out job.
    ///
    /// Kill clears the selection before any response arrives: a killed job
    /// is expected to disappear from the next snapshot.
    pub async fn dispatch(&mut self, action: JobAction) {
        let job_ids: Vec<String> = {
            let visible = self.visible_rows();
            self.selection
                .indices()
                .into_iter()
                .filter_map(|idx| visible.get(idx))
                .map(|row| row.job_id().to_string())
                .collect()
        };
        if action == JobAction::Kill {
            self.selection.clear();
        }
        self.dispatch_jobs(action, job_ids).await;
    }

    /// Fire one request per job id and drive them all to completion
    ///
    /// Errors in individual requests never abort their siblings; every
    /// response, success or error, counts towards batch completion, and a
    /// complete batch triggers exactly one reload.
    pub async fn dispatch_jobs(&mut self, action: JobAction, job_ids: Vec<String>) {
        if job_ids.is_empty() {
            debug!("Nothing selected for {action}, ignoring");
            return;
        }
        info!("Dispatching {action} for {} job(s)", job_ids.len());

        let mut batch = PendingBatch::new(job_ids.len());
        let mut requests = FuturesUnordered::new();
        for job_id in job_ids {
            let request_id = Uuid::new_v4();
            self.request_log.insert(request_id, RequestStatus::Sent);
            let client = self.client.clone();
            requests.push(async move {
                let result = client.job_request(action, &job_id).await;
                (request_id, job_id, result)
            });
        }

        while let Some((request_id, job_id, result)) = requests.next().await {
            batch.record_response();
            match result {
                Ok(response) if response.is_success() => {
                    self.request_log.insert(request_id, RequestStatus::Received);
                    let message = if response.message().is_empty() {
                        format!("{action} request for job {job_id} succeeded")
                    } else {
                        response.message().to_string()
                    };
                    self.alerts.push(Alert::success(message));
                }
                Ok(response) => {
                    self.request_log.insert(request_id, RequestStatus::Error);
                    let message = if response.error_text().is_empty() {
                        format!("{action} request for job {job_id} failed")
                    } else {
                        response.error_text().to_string()
                    };
                    error!("{action} failed for job {job_id}: {message}");
                    self.alerts.push(Alert::danger(message));
                }
                Err(err) => {
                    self.request_log.insert(request_id, RequestStatus::Error);
                    error!("{action} request for job {job_id} failed: {err}");
                    self.alerts.push(Alert::danger(format!(
                        "{action} request for job {job_id} failed: {err}"
                    )));
                }
            }
        }

        debug_assert!(batch.is_complete());
        info!("Batch of {} settled, reloading the queue", batch.num_jobs());
        if let Err(err) = self.fetch_queue().await {
            self.alerts
                .push(Alert::danger(format!("couldn't reload the queue: {err}")));
        }
    }

    /// Submit a batch script, either by path or as raw contents
    ///
    /// Success reloads the queue and returns the job id when sbatch reports
    /// one; failure surfaces an alert and does not reload.
    pub async fn submit_job(
        &mut self,
        input: &str,
        input_type: InputType,
    ) -> Result<Option<String>, BackendError> {
        let output_dir = self.workdir.output_dir();
        let input = match input_type {
            InputType::Path => self.workdir.resolve_input(input),
            InputType::Contents => input.to_string(),
        };
        info!("Submitting {input_type} job with output directory {output_dir}");

        match self.client.sbatch(&input, input_type, &output_dir).await {
            Ok(response) if response.is_success() => {
                let job_id = response.submitted_job_id().map(str::to_string);
                let message = if response.message().is_empty() {
                    "Job submitted".to_string()
                } else {
                    response.message().to_string()
                };
                self.alerts.push(Alert::success(message));
                if let Err(err) = self.fetch_queue().await {
                    self.alerts.push(Alert::warning(format!(
                        "job submitted but the queue reload failed: {err}"
                    )));
                }
                Ok(job_id)
            }
            Ok(response) => {
                let message = response.error_text().to_string();
                self.alerts.push(Alert::danger(message.clone()));
                Err(BackendError::Application(message))
            }
            Err(err) => {
                self.alerts
                    .push(Alert::danger(format!("couldn't submit the job: {err}")));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::coordinator::alert::AlertVariant;

    fn coordinator() -> Coordinator {
        // Port 9 (discard) is never listening; only tests that expect
        // transport failures actually send anything
        let client = BackendClient::new(Url::parse("http://127.0.0.1:9").unwrap(), "secret");
        Coordinator::new(client, Settings::default())
    }

    fn sample_snapshot() -> QueueSnapshot {
        QueueSnapshot::new(vec![
            JobRow::from(vec!["101", "debug", "job1", "alice", "R", "0:10", "1", "node01"]),
            JobRow::from(vec!["102", "debug", "job2", "bob", "PD", "0:00", "1", "(Priority)"]),
        ])
    }

    #[test]
    fn user_filter_toggles_between_user_and_global_view() {
        let mut coord = coordinator();
        coord.snapshot = sample_snapshot();
        coord.user = Some("alice".to_string());

        // userOnly defaults to true: only alice's row
        let visible: Vec<&str> = coord.visible_rows().iter().map(|r| r.job_id()).collect();
        assert_eq!(visible, vec!["101"]);

        coord.toggle_user_only();
        assert_eq!(coord.visible_rows().len(), 2);

        coord.toggle_user_only();
        let visible: Vec<&str> = coord.visible_rows().iter().map(|r| r.job_id()).collect();
        assert_eq!(visible, vec!["101"]);
    }

    #[test]
    fn unknown_user_disables_the_filter() {
        let mut coord = coordinator();
        coord.snapshot = sample_snapshot();
        assert_eq!(coord.visible_rows().len(), 2);
    }

    #[tokio::test]
    async fn kill_clears_selection_before_responses_arrive() {
        let mut coord = coordinator();
        coord.snapshot = sample_snapshot();
        coord.selection_mut().click(0);
        coord.selection_mut().toggle_click(1);
        assert_eq!(coord.selection().len(), 2);

        coord.dispatch(JobAction::Kill).await;

        assert!(coord.selection().is_empty());
        // Both requests failed in transport, plus the reload failure
        assert_eq!(coord.alerts().count_of(AlertVariant::Danger), 3);
        assert!(coord.all_requests_settled());
    }

    #[tokio::test]
    async fn hold_keeps_the_selection() {
        let mut coord = coordinator();
        coord.snapshot = sample_snapshot();
        coord.selection_mut().click(0);

        coord.dispatch(JobAction::Hold).await;

        assert_eq!(coord.selection().len(), 1);
    }

    #[tokio::test]
    async fn empty_selection_dispatch_is_a_no_op() {
        let mut coord = coordinator();
        coord.dispatch(JobAction::Release).await;
        assert!(coord.alerts().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let mut coord = coordinator();
        coord.snapshot = sample_snapshot();
        assert!(coord.fetch_queue().await.is_err());
        assert_eq!(coord.snapshot().len(), 2);
    }
}
