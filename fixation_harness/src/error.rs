use http::StatusCode;
use thiserror::Error;

use crate::driver::SessionToken;
use crate::scenario::{Expect, Scenario};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<http::Error> for DriverError {
    fn from(err: http::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<reqwest::Error> for DriverError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// First failed assertion of a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("{scenario} step ({step}): expected status {expected}, got {actual}")]
    UnexpectedStatus {
        scenario: Scenario,
        step: &'static str,
        expected: Expect,
        actual: StatusCode,
    },

    #[error("{scenario} step ({step}): no session token was issued")]
    MissingToken {
        scenario: Scenario,
        step: &'static str,
    },

    #[error("{scenario} step ({step}): presented {actual:?} instead of held token {expected}")]
    WrongTokenPresented {
        scenario: Scenario,
        step: &'static str,
        expected: SessionToken,
        actual: Option<SessionToken>,
    },

    #[error(
        "{scenario} step ({step}): session token {presented} was not rotated (issued: {issued:?})"
    )]
    TokenNotRotated {
        scenario: Scenario,
        step: &'static str,
        presented: SessionToken,
        issued: Option<SessionToken>,
    },

    #[error("{scenario} step ({step}): {source}")]
    Driver {
        scenario: Scenario,
        step: &'static str,
        #[source]
        source: DriverError,
    },
}

impl ScenarioError {
    pub fn scenario(&self) -> Scenario {
        match self {
            Self::UnexpectedStatus { scenario, .. }
            | Self::MissingToken { scenario, .. }
            | Self::WrongTokenPresented { scenario, .. }
            | Self::TokenNotRotated { scenario, .. }
            | Self::Driver { scenario, .. } => *scenario,
        }
    }

    /// Step label, `"a"` to `"e"`
    pub fn step(&self) -> &'static str {
        match self {
            Self::UnexpectedStatus { step, .. }
            | Self::MissingToken { step, .. }
            | Self::WrongTokenPresented { step, .. }
            | Self::TokenNotRotated { step, .. }
            | Self::Driver { step, .. } => step,
        }
    }
}
