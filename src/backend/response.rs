use serde::{Deserialize, Serialize};

/// Envelope returned by every job mutation route (sbatch, scancel, scontrol)
///
/// The backend runs the matching Slurm command and reports its exit status
/// plus captured stdout/stderr. A 200 response with a non-zero returncode is
/// an application-level failure and must be surfaced to the user.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub returncode: i32,
    #[serde(default)]
    pub response_message: String,
    #[serde(default)]
    pub error_message: String,
}

impl JobResponse {
    pub fn is_success(&self) -> bool {
        self.returncode == 0
    }

    /// Preferred human-readable text: stdout first, stderr as fallback
    pub fn message(&self) -> &str {
        if self.response_message.is_empty() {
            &self.error_message
        } else {
            &self.response_message
        }
    }

    /// Failure text: stderr first, stdout as fallback
    pub fn error_text(&self) -> &str {
        if self.error_message.is_empty() {
            &self.response_message
        } else {
            &self.error_message
        }
    }

    /// Pull the job id out of sbatch output ("Submitted batch job 12345")
    pub fn submitted_job_id(&self) -> Option<&str> {
        self.response_message
            .split_whitespace()
            .rev()
            .find(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Body of a squeue snapshot: one row of string fields per queued job
#[derive(Debug, Deserialize, Serialize)]
pub struct SqueueResponse {
    pub data: Vec<Vec<String>>,
}

/// Body of the /user route
#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(returncode: i32, response: &str, error: &str) -> JobResponse {
        JobResponse {
            returncode,
            response_message: response.to_string(),
            error_message: error.to_string(),
        }
    }

    #[test]
    fn message_falls_back_to_stderr() {
        let resp = envelope(0, "", "held job 42");
        assert_eq!(resp.message(), "held job 42");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let resp = envelope(1, "scancel: nothing to do", "");
        assert!(!resp.is_success());
        assert_eq!(resp.error_text(), "scancel: nothing to do");
    }

    #[test]
    fn parses_sbatch_job_id() {
        let resp = envelope(0, "Submitted batch job 31415", "");
        assert_eq!(resp.submitted_job_id(), Some("31415"));
    }

    #[test]
    fn missing_job_id_is_none() {
        let resp = envelope(0, "sbatch said something strange", "");
        assert_eq!(resp.submitted_job_id(), None);
    }

    #[test]
    fn deserialises_camel_case_envelope() {
        let resp: JobResponse = serde_json::from_str(
            r#"{"returncode": 0, "responseMessage": "ok", "errorMessage": ""}"#,
        )
        .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.message(), "ok");
    }
}
