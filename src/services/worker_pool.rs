use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::error::{ConfigError, SwapError};
use crate::models::AppConfig;
use crate::services::swap_pipeline::{Budget, CancelToken, SwapOutput, SwapPipeline, SwapRequest};

/// Bounded pool of blocking workers running [`SwapPipeline`] requests.
///
/// Admission never waits: when every permit is taken the request is
/// rejected with [`SwapError::Capacity`]. A permit is held by the worker
/// thread, not the caller, so a request that timed out keeps its slot until
/// the worker actually stops.
#[derive(Clone)]
pub struct SwapPool {
    pipeline: Arc<SwapPipeline>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    timeout: Duration,
}

impl SwapPool {
    pub fn new(pipeline: SwapPipeline, max_concurrent: usize, timeout: Duration) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            pipeline: Arc::new(pipeline),
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let pipeline = SwapPipeline::new(config)?;
        Ok(Self::new(
            pipeline,
            config.limits.concurrency(),
            config.limits.request_timeout(),
        ))
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Requests currently holding a worker.
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    /// Run `request` on a blocking worker within the request timeout.
    pub async fn submit(&self, request: SwapRequest) -> Result<SwapOutput, SwapError> {
        let permit = self
            .permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| SwapError::Capacity {
                max_concurrent: self.max_concurrent,
            })?;

        let token = CancelToken::new();
        let budget = Budget::new(token.clone(), Some(Instant::now() + self.timeout));
        let pipeline = self.pipeline.clone();

        let worker = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline.process_with_budget(request, &budget)
        });

        match tokio::time::timeout(self.timeout, worker).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(SwapError::Encode(format!("Worker task failed: {e}"))),
            Err(_) => {
                token.cancel();
                let stage = token.stage();
                tracing::warn!(
                    %stage,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Request timed out"
                );
                Err(SwapError::Cancelled { stage })
            }
        }
    }
}
