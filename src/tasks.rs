//! Fire-and-forget background jobs.
//!
//! `submit` queues a closure and returns immediately. Jobs run on tokio's blocking pool,
//! at most `workers` at a time, in no particular order relative to the caller. There is no
//! result and no error propagation: a job that panics is logged and forgotten. Do not use
//! this for work whose failure the caller must see.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone)]
pub struct BackgroundTasks {
    tx: mpsc::UnboundedSender<Job>,
}

impl BackgroundTasks {
    /// Start `workers` worker tasks. Must be called inside a tokio runtime.
    pub fn spawn(workers: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));
        for worker in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            tokio::spawn(async move {
                loop {
                    let job = rx.lock().await.recv().await;
                    let Some(job) = job else { break };
                    if let Err(e) = tokio::task::spawn_blocking(job).await {
                        tracing::warn!(worker, error = %e, "background task failed");
                    }
                }
                tracing::debug!(worker, "background worker stopped");
            });
        }
        BackgroundTasks { tx }
    }

    /// Queue `job`. Never blocks and never reports back.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(job)).is_err() {
            tracing::warn!("background workers are gone; task dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn submitted_job_runs() {
        let tasks = BackgroundTasks::spawn(1);
        let (done_tx, done_rx) = oneshot::channel();
        tasks.submit(move || {
            let _ = done_tx.send(21 * 2);
        });
        let value = tokio::time::timeout(Duration::from_secs(5), done_rx).await.unwrap().unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn panicking_job_does_not_stop_the_pool() {
        let tasks = BackgroundTasks::spawn(1);
        tasks.submit(|| panic!("boom"));
        let (done_tx, done_rx) = oneshot::channel();
        tasks.submit(move || {
            let _ = done_tx.send(());
        });
        tokio::time::timeout(Duration::from_secs(5), done_rx).await.unwrap().unwrap();
    }
}
