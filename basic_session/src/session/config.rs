use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::errors::SessionError;

const DEFAULT_MAX_AGE: u64 = 600;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("__Host-SessionId".to_string())
});

pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .map_or(DEFAULT_MAX_AGE, |s| parse_max_age(&s))
});

/// Parses a `SESSION_COOKIE_MAX_AGE` value, falling back to 10 minutes when
/// it is not a number or out of range.
fn parse_max_age(value: &str) -> u64 {
    let parsed = value
        .trim()
        .parse::<u64>()
        .map_err(|e| SessionError::Config(format!("Invalid session max age '{value}': {e}")))
        .and_then(|secs| session_ttl(secs).map(|_| secs));
    parsed.unwrap_or_else(|e| {
        tracing::warn!("{e}; falling back to {DEFAULT_MAX_AGE}");
        DEFAULT_MAX_AGE
    })
}

/// Converts a max age in seconds into a session lifetime
///
/// Fails when the value does not fit a signed cookie `Max-Age` or a chrono
/// `TimeDelta`.
pub(crate) fn session_ttl(max_age: u64) -> Result<TimeDelta, SessionError> {
    i64::try_from(max_age)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| SessionError::Config(format!("Session max age out of range: {max_age}")))
}

pub static SESSION_FIXATION_POLICY: LazyLock<SessionFixationPolicy> = LazyLock::new(|| {
    match std::env::var("SESSION_FIXATION_POLICY") {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}; falling back to {}", SessionFixationPolicy::default());
            SessionFixationPolicy::default()
        }),
        Err(_) => SessionFixationPolicy::default(),
    }
});

/// What happens to the presented session when a request authenticates a new principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFixationPolicy {
    /// Drop the old session and issue a fresh id bound to the new principal
    #[default]
    Migrate,
    /// Issue a fresh id and start from an empty session
    NewSession,
    /// Keep the presented id and rebind it. Vulnerable to fixation.
    None,
}

impl SessionFixationPolicy {
    /// Whether the session id changes when the principal changes
    pub fn rotates_id(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for SessionFixationPolicy {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "migrate" | "migrate_session" => Ok(Self::Migrate),
            "new_session" | "new" => Ok(Self::NewSession),
            "none" => Ok(Self::None),
            other => Err(SessionError::Config(format!(
                "Unknown session fixation policy: {other}"
            ))),
        }
    }
}

impl fmt::Display for SessionFixationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Migrate => "migrate",
            Self::NewSession => "new_session",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Per-instance session settings
///
/// `from_env()` takes its values from the process-wide statics above; the
/// `with_*` methods override individual fields.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age: u64,
    pub fixation_policy: SessionFixationPolicy,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            max_age: *SESSION_COOKIE_MAX_AGE,
            fixation_policy: *SESSION_FIXATION_POLICY,
        }
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub fn with_max_age(mut self, max_age: u64) -> Result<Self, SessionError> {
        session_ttl(max_age)?;
        self.max_age = max_age;
        Ok(self)
    }

    pub fn with_fixation_policy(mut self, policy: SessionFixationPolicy) -> Self {
        self.fixation_policy = policy;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper function to set an environment variable for the duration of the test
    /// and restore the original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "migrate".parse::<SessionFixationPolicy>().unwrap(),
            SessionFixationPolicy::Migrate
        );
        assert_eq!(
            " New_Session ".parse::<SessionFixationPolicy>().unwrap(),
            SessionFixationPolicy::NewSession
        );
        assert_eq!(
            "NONE".parse::<SessionFixationPolicy>().unwrap(),
            SessionFixationPolicy::None
        );
        assert!(matches!(
            "change_id".parse::<SessionFixationPolicy>(),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_policy_display_parses_back() {
        for policy in [
            SessionFixationPolicy::Migrate,
            SessionFixationPolicy::NewSession,
            SessionFixationPolicy::None,
        ] {
            assert_eq!(policy.to_string().parse::<SessionFixationPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_policy_rotation() {
        assert!(SessionFixationPolicy::Migrate.rotates_id());
        assert!(SessionFixationPolicy::NewSession.rotates_id());
        assert!(!SessionFixationPolicy::None.rotates_id());
        assert_eq!(SessionFixationPolicy::default(), SessionFixationPolicy::Migrate);
    }

    #[test]
    fn test_config_overrides() {
        let config = SessionConfig::from_env()
            .with_cookie_name("sid")
            .with_max_age(30)
            .unwrap()
            .with_fixation_policy(SessionFixationPolicy::None);

        assert_eq!(config.cookie_name, "sid");
        assert_eq!(config.max_age, 30);
        assert_eq!(config.fixation_policy, SessionFixationPolicy::None);
    }

    #[test]
    fn test_out_of_range_max_age_rejected() {
        for max_age in [u64::MAX, i64::MAX as u64, 100_000_000_000_000_000] {
            assert!(
                matches!(
                    SessionConfig::from_env().with_max_age(max_age),
                    Err(SessionError::Config(_))
                ),
                "{max_age}"
            );
        }
        assert_eq!(session_ttl(0).unwrap(), TimeDelta::zero());
        assert_eq!(session_ttl(600).unwrap(), TimeDelta::minutes(10));
    }

    #[test]
    fn test_parse_max_age_values() {
        assert_eq!(parse_max_age("1800"), 1800);
        assert_eq!(parse_max_age(" 0 "), 0);
        assert_eq!(parse_max_age("-1"), DEFAULT_MAX_AGE);
        assert_eq!(parse_max_age("18446744073709551615"), DEFAULT_MAX_AGE);
        assert_eq!(parse_max_age("100000000000000000"), DEFAULT_MAX_AGE);
    }

    #[test]
    #[serial]
    fn test_parse_session_cookie_max_age() {
        // The LazyLock may already be initialized, so test the same logic it uses
        let parse = || {
            std::env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .map_or(DEFAULT_MAX_AGE, |s| parse_max_age(&s))
        };

        with_env_var("SESSION_COOKIE_MAX_AGE", None, || assert_eq!(parse(), 600));
        with_env_var("SESSION_COOKIE_MAX_AGE", Some("1800"), || {
            assert_eq!(parse(), 1800)
        });
        with_env_var("SESSION_COOKIE_MAX_AGE", Some("invalid"), || {
            assert_eq!(parse(), 600)
        });
    }

    #[test]
    #[serial]
    fn test_parse_session_fixation_policy_env() {
        let parse = || {
            std::env::var("SESSION_FIXATION_POLICY")
                .ok()
                .and_then(|s| s.parse::<SessionFixationPolicy>().ok())
                .unwrap_or_default()
        };

        with_env_var("SESSION_FIXATION_POLICY", None, || {
            assert_eq!(parse(), SessionFixationPolicy::Migrate)
        });
        with_env_var("SESSION_FIXATION_POLICY", Some("none"), || {
            assert_eq!(parse(), SessionFixationPolicy::None)
        });
        with_env_var("SESSION_FIXATION_POLICY", Some("bogus"), || {
            assert_eq!(parse(), SessionFixationPolicy::Migrate)
        });
    }
}
