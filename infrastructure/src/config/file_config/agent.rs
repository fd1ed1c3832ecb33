//! Agent configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolloop_application::config::{DEFAULT_PREAMBLE, LoopParams, RetryPolicy};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_model_invocations = 10
/// deadline_secs = 25          # 0 disables the deadline
///
/// [agent.retry]
/// max_retries = 3
/// initial_backoff_ms = 250
/// max_backoff_ms = 4000
/// backoff_multiplier = 2.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// System preamble placed ahead of every conversation
    pub preamble: String,
    /// Maximum logical model invocations per query
    pub max_model_invocations: usize,
    /// Overall deadline per query in seconds (0 = unbounded)
    pub deadline_secs: u64,
    /// Backoff for unavailable backends
    pub retry: FileRetryConfig,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            max_model_invocations: 10,
            deadline_secs: 25,
            retry: FileRetryConfig::default(),
        }
    }
}

impl FileAgentConfig {
    /// Convert into loop parameters for the application layer
    pub fn to_loop_params(&self) -> LoopParams {
        let deadline = match self.deadline_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        LoopParams::default()
            .with_preamble(self.preamble.clone())
            .with_max_model_invocations(self.max_model_invocations)
            .with_deadline(deadline)
            .with_retry(self.retry.to_retry_policy())
    }
}

/// Raw retry configuration (`[agent.retry]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
            backoff_multiplier: policy.backoff_multiplier,
        }
    }
}

impl FileRetryConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(self.max_retries)
            .with_initial_backoff(Duration::from_millis(self.initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(self.max_backoff_ms))
            .with_backoff_multiplier(self.backoff_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_loop_params() {
        let params = FileAgentConfig::default().to_loop_params();
        let expected = LoopParams::default();

        assert_eq!(params.max_model_invocations, expected.max_model_invocations);
        assert_eq!(params.deadline, expected.deadline);
        assert_eq!(params.retry, expected.retry);
        assert_eq!(params.preamble, expected.preamble);
    }

    #[test]
    fn test_zero_deadline_is_unbounded() {
        let config = FileAgentConfig {
            deadline_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.to_loop_params().deadline, None);
    }

    #[test]
    fn test_retry_conversion() {
        let retry = FileRetryConfig {
            max_retries: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
            backoff_multiplier: 3.0,
        };
        let policy = retry.to_retry_policy();

        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_secs(1));
        assert_eq!(policy.backoff_multiplier, 3.0);
    }
}
