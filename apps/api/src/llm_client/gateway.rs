//! Resilient wrapper around the generative-text transport.
//!
//! Owns the two recovery policies:
//! - rate-limit: retry with exponential backoff, bounded by [`RetryPolicy`];
//! - model-unavailable: replay the same instruction once on the fallback
//!   model and return whatever that call yields.
//!
//! Any other error is propagated immediately. One call is in flight at a
//! time by construction — the caller awaits each call (and each backoff
//! sleep) before issuing the next.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::llm_client::{GenAiError, TextGenerator, FALLBACK_MODEL, PRIMARY_MODEL};

/// Retry policy for rate-limited calls: at most `max_attempts` calls in
/// total, with a backoff of `base_delay * multiplier^(n-1)` after the n-th
/// failed attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    /// 3 attempts, backing off 2s then 4s between them.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after the given 1-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * self.multiplier.saturating_pow(attempt.saturating_sub(1))
    }
}

/// The resilient client used by the analysis pipeline for every section call.
#[derive(Clone)]
pub struct Gateway {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
    primary_model: String,
    fallback_model: String,
}

impl Gateway {
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self {
            generator,
            policy,
            primary_model: PRIMARY_MODEL.to_string(),
            fallback_model: FALLBACK_MODEL.to_string(),
        }
    }

    /// Sends one instruction, applying the retry and fallback policies.
    pub async fn call(&self, prompt: &str) -> Result<String, GenAiError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.generator.generate(&self.primary_model, prompt).await {
                Ok(text) => return Ok(text),
                Err(GenAiError::RateLimited) if attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "Rate limit hit on attempt {attempt}; retrying in {}s...",
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(GenAiError::ModelUnavailable { model }) => {
                    warn!(
                        "Model '{model}' not available; replaying on fallback '{}'",
                        self.fallback_model
                    );
                    // Exactly one substitution: the fallback result is final,
                    // success or failure.
                    return self.generator.generate(&self.fallback_model, prompt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Test double that replays a fixed script of results and records the
    /// model identifier of every call it receives.
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String, GenAiError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<String, GenAiError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn models_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, model: &str, _prompt: &str) -> Result<String, GenAiError> {
            self.calls.lock().unwrap().push(model.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted generator ran out of responses")
        }
    }

    fn gateway_over(script: Vec<Result<String, GenAiError>>) -> (Gateway, Arc<ScriptedGenerator>) {
        let generator = Arc::new(ScriptedGenerator::new(script));
        let gateway = Gateway::new(generator.clone(), RetryPolicy::default());
        (gateway, generator)
    }

    #[test]
    fn test_delay_schedule_doubles_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_makes_single_call() {
        let (gateway, generator) = gateway_over(vec![Ok("summary".to_string())]);
        let text = gateway.call("prompt").await.unwrap();
        assert_eq!(text, "summary");
        assert_eq!(generator.models_called(), vec![PRIMARY_MODEL]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retries_then_succeeds() {
        let (gateway, generator) = gateway_over(vec![
            Err(GenAiError::RateLimited),
            Err(GenAiError::RateLimited),
            Ok("recovered".to_string()),
        ]);
        let text = gateway.call("prompt").await.unwrap();
        assert_eq!(text, "recovered");
        assert_eq!(generator.models_called().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_after_three_attempts() {
        let (gateway, generator) = gateway_over(vec![
            Err(GenAiError::RateLimited),
            Err(GenAiError::RateLimited),
            Err(GenAiError::RateLimited),
        ]);
        let result = gateway.call("prompt").await;
        assert!(matches!(result, Err(GenAiError::RateLimited)));
        // No 4th attempt after the policy is exhausted.
        assert_eq!(generator.models_called().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_follow_policy_schedule() {
        let (gateway, _generator) = gateway_over(vec![
            Err(GenAiError::RateLimited),
            Err(GenAiError::RateLimited),
            Err(GenAiError::RateLimited),
        ]);
        let started = tokio::time::Instant::now();
        let _ = gateway.call("prompt").await;
        // 2s after the 1st failure, 4s after the 2nd; none after the last.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_model_unavailable_substitutes_fallback_once() {
        let (gateway, generator) = gateway_over(vec![
            Err(GenAiError::ModelUnavailable {
                model: PRIMARY_MODEL.to_string(),
            }),
            Ok("from fallback".to_string()),
        ]);
        let text = gateway.call("prompt").await.unwrap();
        assert_eq!(text, "from fallback");
        assert_eq!(generator.models_called(), vec![PRIMARY_MODEL, FALLBACK_MODEL]);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates_without_retry() {
        let (gateway, generator) = gateway_over(vec![
            Err(GenAiError::ModelUnavailable {
                model: PRIMARY_MODEL.to_string(),
            }),
            Err(GenAiError::RateLimited),
        ]);
        let result = gateway.call("prompt").await;
        // The fallback call's rate-limit error is final — no further attempts.
        assert!(matches!(result, Err(GenAiError::RateLimited)));
        assert_eq!(generator.models_called(), vec![PRIMARY_MODEL, FALLBACK_MODEL]);
    }

    #[tokio::test]
    async fn test_unclassified_error_propagates_immediately() {
        let (gateway, generator) = gateway_over(vec![Err(GenAiError::Service {
            status: 500,
            message: "internal".to_string(),
        })]);
        let result = gateway.call("prompt").await;
        assert!(matches!(result, Err(GenAiError::Service { status: 500, .. })));
        assert_eq!(generator.models_called().len(), 1);
    }
}
