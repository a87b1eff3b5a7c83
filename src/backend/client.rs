use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::backend::action::{InputType, JobAction};
use crate::backend::response::{JobResponse, SqueueResponse, UserResponse};
use crate::queue::row::JobRow;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("backend sent malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("bad backend URL: {0}")]
    BadUrl(#[from] url::ParseError),
    #[error("backend reported failure: {0}")]
    Application(String),
}

/// Client for the backend REST surface
///
/// Every request carries the host authorization token. No retries and no
/// request timeouts anywhere: failures are terminal for a single request and
/// the user re-triggers the action.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    token: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(mut base_url: Url, token: impl Into<String>) -> BackendClient {
        // Url::join swallows the last path segment unless it ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        BackendClient {
            base_url,
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch a full queue snapshot, the wholesale replacement of the row set
    pub async fn squeue(&self, user_only: bool) -> Result<Vec<JobRow>, BackendError> {
        let mut url = self.endpoint("squeue")?;
        url.query_pairs_mut()
            .append_pair("userOnly", if user_only { "true" } else { "false" });
        let response: SqueueResponse = self.get_json(url).await?;
        Ok(response.data.into_iter().map(JobRow::new).collect())
    }

    /// Fetch the username the backend runs as
    pub async fn user(&self) -> Result<String, BackendError> {
        let url = self.endpoint("user")?;
        let response: UserResponse = self.get_json(url).await?;
        Ok(response.user)
    }

    /// Submit a batch script via sbatch
    pub async fn sbatch(
        &self,
        input: &str,
        input_type: InputType,
        output_dir: &str,
    ) -> Result<JobResponse, BackendError> {
        let mut url = self.endpoint("sbatch")?;
        url.query_pairs_mut()
            .append_pair("inputType", &input_type.to_string())
            .append_pair("outputDir", output_dir);
        debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth_header())
            .json(&json!({ "input": input }))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Run one job action (scancel / scontrol) against a single job id
    pub async fn job_request(
        &self,
        action: JobAction,
        job_id: &str,
    ) -> Result<JobResponse, BackendError> {
        let url = self.endpoint(action.route())?;
        debug!("{} {url} jobID={job_id}", action.method());
        let response = self
            .http
            .request(action.method(), url)
            .header(AUTHORIZATION, self.auth_header())
            .json(&json!({ "jobID": job_id }))
            .send()
            .await?;
        Self::decode(response).await
    }

    fn endpoint(&self, route: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(route)?)
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Check the status line, then parse the body ourselves so a malformed
    /// payload is distinguishable from a transport failure
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("backend error {status}: {body}");
            return Err(BackendError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = BackendClient::new(Url::parse("http://localhost:8888/slurm").unwrap(), "t");
        assert_eq!(client.base_url().path(), "/slurm/");
        assert_eq!(
            client.endpoint("scontrol/hold").unwrap().as_str(),
            "http://localhost:8888/slurm/scontrol/hold"
        );
    }

    #[test]
    fn root_base_url_unchanged() {
        let client = BackendClient::new(Url::parse("http://localhost:8888").unwrap(), "t");
        assert_eq!(client.base_url().path(), "/");
    }
}
