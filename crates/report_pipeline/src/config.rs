//! Pipeline tuning.

use std::time::Duration;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on every backend call; expiry counts as a transport failure
    pub call_timeout: Duration,
    /// Validation calls in flight at once during a batch
    pub max_concurrent_validations: usize,
    /// Actor recorded in the audit trail
    pub actor: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            max_concurrent_validations: 8,
            actor: "SYSTEM".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new PipelineConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call timeout
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the validation concurrency; zero is treated as one
    pub fn with_max_concurrent_validations(mut self, max: usize) -> Self {
        self.max_concurrent_validations = max.max(1);
        self
    }

    /// Set the audit actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}
