use super::{Expect, Scenario, ScenarioReport, StepRecord};
use crate::driver::{Credentials, Observation, RequestDriver, SessionToken};
use crate::error::ScenarioError;

/// Executes the steps of one scenario and records them
pub(super) struct Run<'a, D: ?Sized> {
    driver: &'a D,
    scenario: Scenario,
    steps: Vec<StepRecord>,
}

impl<'a, D> Run<'a, D>
where
    D: RequestDriver + ?Sized,
{
    pub(super) fn new(driver: &'a D, scenario: Scenario) -> Self {
        Self {
            driver,
            scenario,
            steps: Vec::new(),
        }
    }

    pub(super) async fn step(
        &mut self,
        step: &'static str,
        path: &'static str,
        credentials: Option<&Credentials>,
        presented: Option<&SessionToken>,
        expected: Expect,
    ) -> Result<Observation, ScenarioError> {
        let observation = self
            .driver
            .send(path, credentials, presented)
            .await
            .map_err(|source| ScenarioError::Driver {
                scenario: self.scenario,
                step,
                source,
            })?;

        tracing::debug!(
            scenario = %self.scenario,
            step,
            path,
            account = credentials.map(|c| c.account.as_str()),
            status = %observation.status,
            issued = observation.session.is_some(),
            "Step completed"
        );

        self.steps.push(StepRecord {
            step,
            path,
            account: credentials.map(|c| c.account.clone()),
            presented: presented.cloned(),
            expected,
            observation: observation.clone(),
        });

        if !expected.matches(observation.status) {
            tracing::warn!(scenario = %self.scenario, step, %expected, actual = %observation.status, "Unexpected status");
            return Err(ScenarioError::UnexpectedStatus {
                scenario: self.scenario,
                step,
                expected,
                actual: observation.status,
            });
        }
        Ok(observation)
    }

    /// The token a step issued, required to be present
    pub(super) fn issued_token(
        &self,
        step: &'static str,
        issued: Option<SessionToken>,
    ) -> Result<SessionToken, ScenarioError> {
        issued.ok_or(ScenarioError::MissingToken {
            scenario: self.scenario,
            step,
        })
    }

    /// The most recent request recorded for `step` carried `expected`
    pub(super) fn check_presented(
        &self,
        step: &'static str,
        expected: &SessionToken,
    ) -> Result<(), ScenarioError> {
        let actual = self
            .steps
            .iter()
            .rev()
            .find(|record| record.step == step)
            .and_then(|record| record.presented.as_ref());
        if actual == Some(expected) {
            return Ok(());
        }
        tracing::warn!(scenario = %self.scenario, step, %expected, "Step did not present the held token");
        Err(ScenarioError::WrongTokenPresented {
            scenario: self.scenario,
            step,
            expected: expected.clone(),
            actual: actual.cloned(),
        })
    }

    /// A login on `presented` must have issued a different token
    pub(super) fn check_rotated(
        &self,
        step: &'static str,
        presented: &SessionToken,
        issued: Option<SessionToken>,
    ) -> Result<(), ScenarioError> {
        match issued {
            Some(ref token) if token != presented => Ok(()),
            issued => {
                tracing::warn!(scenario = %self.scenario, step, %presented, "Session token was not rotated on login");
                Err(ScenarioError::TokenNotRotated {
                    scenario: self.scenario,
                    step,
                    presented: presented.clone(),
                    issued,
                })
            }
        }
    }

    pub(super) fn finish(self) -> ScenarioReport {
        tracing::info!(scenario = %self.scenario, steps = self.steps.len(), "Scenario passed");
        ScenarioReport {
            scenario: self.scenario,
            steps: self.steps,
        }
    }
}
