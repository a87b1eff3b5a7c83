use std::fmt;

use clap::ValueEnum;
use reqwest::Method;

/// A per-job action, each bound to one backend route and HTTP method
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum JobAction {
    Kill,
    Hold,
    Release,
}

impl JobAction {
    pub fn route(&self) -> &'static str {
        match self {
            JobAction::Kill => "scancel",
            JobAction::Hold => "scontrol/hold",
            JobAction::Release => "scontrol/release",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            JobAction::Kill => Method::DELETE,
            JobAction::Hold | JobAction::Release => Method::PATCH,
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobAction::Kill => write!(f, "kill"),
            JobAction::Hold => write!(f, "hold"),
            JobAction::Release => write!(f, "release"),
        }
    }
}

/// How the sbatch input body should be interpreted by the backend
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum InputType {
    /// Path to a batch script on the server
    Path,
    /// Raw batch script text
    Contents,
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputType::Path => write!(f, "path"),
            InputType::Contents => write!(f, "contents"),
        }
    }
}
