use crate::error::EhsError;
use crate::ledger::db_ops::TaskRepo;
use crate::media::MediaStore;
use anyhow::Result;
use log::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// One work report waiting to be saved
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub task_id: i32,
    pub worker_id: i32,
    pub report: String,
    pub media_source: PathBuf,
}

/// Saves work reports off the interactive path.
/// Media is copied first, the task row is only touched once the copy succeeded.
#[derive(Clone)]
pub struct ReportWorker {
    repo: Arc<dyn TaskRepo + Send + Sync>,
    media: Arc<dyn MediaStore + Send + Sync>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
}

impl ReportWorker {
    pub fn new(
        repo: Arc<dyn TaskRepo + Send + Sync>,
        media: Arc<dyn MediaStore + Send + Sync>,
        delay: Duration,
    ) -> Self {
        ReportWorker {
            repo,
            media,
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of reports submitted and not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn submit(&self, job: ReportJob) -> ReportHandle {
        let task_id = job.task_id;
        let repo = self.repo.clone();
        let media = self.media.clone();
        let delay = self.delay;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        // released when the task ends or is dropped unpolled after a cancel
        let in_flight = scopeguard::guard(self.in_flight.clone(), |count| {
            count.fetch_sub(1, Ordering::SeqCst);
        });

        let join = tokio::spawn(async move {
            let _in_flight = in_flight;
            info!(
                "worker {} start reporting task {}",
                job.worker_id, job.task_id
            );
            if !delay.is_zero() {
                debug!(
                    "hold report of task {} for {}",
                    job.task_id,
                    humantime::format_duration(delay)
                );
                sleep(delay).await;
            }

            let media_path = media
                .store_media(job.task_id, job.worker_id, job.media_source.clone())
                .await?;
            if let Err(e) = repo
                .record_report(job.task_id, job.worker_id, job.report, media_path.clone())
                .await
            {
                error!("record report for task {} error reason {}", job.task_id, e);
                if let Err(discard_err) = media.discard_media(job.task_id, job.worker_id).await {
                    warn!("orphaned media {} left behind: {}", media_path, discard_err);
                }
                return Err(e);
            }
            info!("worker {} finished task {}", job.worker_id, job.task_id);
            Ok(media_path)
        });

        ReportHandle { task_id, join }
    }
}

/// Completion signal of a submitted report
pub struct ReportHandle {
    task_id: i32,
    join: JoinHandle<Result<String>>,
}

impl ReportHandle {
    pub fn task_id(&self) -> i32 {
        self.task_id
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the report, nothing is written if it has not reached the copy yet
    pub fn cancel(&self) {
        self.join.abort();
    }

    /// Wait for the report, yields the stored media path
    pub async fn wait(self) -> Result<String> {
        match self.join.await {
            Ok(report_result) => report_result,
            Err(join_error) if join_error.is_cancelled() => {
                Err(EhsError::Cancelled(self.task_id).into())
            }
            Err(join_error) => {
                if join_error.is_panic() {
                    let panic_error = join_error.into_panic();
                    let message = match panic_error.downcast_ref::<&str>() {
                        Some(msg) => msg.to_string(),
                        None => panic_error
                            .downcast_ref::<String>()
                            .cloned()
                            .unwrap_or_else(|| "non string panic payload".to_string()),
                    };
                    Err(anyhow::Error::msg(format!("Panic: {}", message)))
                } else {
                    Err(anyhow::Error::msg(join_error.to_string()))
                }
            }
        }
    }
}
