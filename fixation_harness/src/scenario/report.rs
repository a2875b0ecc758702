use http::StatusCode;

use super::{Expect, Scenario};
use crate::driver::{Observation, SessionToken};

/// One request of a scenario and what came back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: &'static str,
    pub path: &'static str,
    /// Account whose Basic credentials were sent
    pub account: Option<String>,
    /// Session token presented in the cookie
    pub presented: Option<SessionToken>,
    pub expected: Expect,
    pub observation: Observation,
}

/// Steps a scenario executed, in order
///
/// On failure the report is not returned; the error names the failing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub steps: Vec<StepRecord>,
}

impl ScenarioReport {
    pub fn statuses(&self) -> Vec<StatusCode> {
        self.steps.iter().map(|s| s.observation.status).collect()
    }

    pub fn step(&self, label: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.step == label)
    }
}
