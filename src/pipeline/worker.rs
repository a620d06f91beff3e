//! Single-use background worker around a pipeline.
//!
//! The pipeline runs in its own task and shares nothing with the caller. The
//! caller sends one trigger and receives one reply over oneshot channels;
//! the task ends after replying.

use crate::dataset::Dataset;
use crate::pipeline::StatisticsPipeline;
use std::future::Future;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a spawned, not yet activated pipeline task.
#[derive(Debug)]
pub struct PipelineWorker {
    trigger: oneshot::Sender<()>,
    reply: oneshot::Receiver<Option<Dataset>>,
    handle: JoinHandle<()>,
}

impl PipelineWorker {
    /// Spawn a task that waits for the trigger, runs the pipeline once,
    /// replies and exits. Must be called from within a tokio runtime.
    pub fn spawn(pipeline: StatisticsPipeline) -> Self {
        Self::spawn_job(move || async move { pipeline.run().await })
    }

    /// Spawn a task that runs `job` once the trigger arrives.
    fn spawn_job<F, Fut>(job: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<Dataset>> + Send + 'static,
    {
        let (trigger, trigger_rx) = oneshot::channel::<()>();
        let (reply_tx, reply) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if trigger_rx.await.is_err() {
                tracing::debug!("Worker released without activation");
                return;
            }

            let result = job().await;
            if reply_tx.send(result).is_err() {
                tracing::debug!("Caller stopped waiting before the reply");
            }
        });

        Self {
            trigger,
            reply,
            handle,
        }
    }

    /// Trigger the run and wait for its single reply.
    ///
    /// Returns `None` if the run failed or the task ended without replying.
    pub async fn activate(self) -> Option<Dataset> {
        let Self {
            trigger,
            reply,
            handle,
        } = self;

        if trigger.send(()).is_err() {
            tracing::warn!("Worker task ended before activation");
            return None;
        }

        let dataset = match reply.await {
            Ok(dataset) => dataset,
            Err(_) => {
                tracing::warn!("Worker task ended without replying");
                None
            }
        };

        if let Err(e) = handle.await {
            tracing::warn!("Worker task did not shut down cleanly: {}", e);
        }

        dataset
    }
}
