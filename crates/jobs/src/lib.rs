//! Detached background jobs.
//!
//! Fire-and-forget work (image generation, mainly) runs here: the caller
//! spawns a job, gets an id back immediately, and may poll or ignore it.
//! Nothing in the automation batch ever waits on a job.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),
    #[error("Job already exists: {0}")]
    AlreadyExists(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub id: String,
    pub description: String,
    pub status: JobStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub result: Option<String>,
    pub error: Option<String>,
}

struct JobSlot {
    info: JobInfo,
    handle: Option<JoinHandle<Result<String, String>>>,
}

pub struct JobManager {
    jobs: Arc<RwLock<HashMap<String, Arc<Mutex<JobSlot>>>>>,
    state_file: Option<PathBuf>,
}

impl JobManager {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            state_file: None,
        }
    }

    pub fn with_state_file<P: AsRef<Path>>(state_file: P) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            state_file: Some(state_file.as_ref().to_path_buf()),
        }
    }

    /// Reload persisted job records. Jobs that were still running when the
    /// process died are marked failed, since their handles are gone.
    pub async fn restore(&self) -> Result<(), JobError> {
        let Some(state_file) = &self.state_file else {
            return Ok(());
        };

        if !state_file.exists() {
            return Ok(());
        }

        let content = tokio::fs::read_to_string(state_file).await?;
        let mut records: Vec<JobInfo> = serde_json::from_str(&content)?;
        let now = chrono::Utc::now().timestamp();

        for record in &mut records {
            if record.status == JobStatus::Running {
                record.status = JobStatus::Failed;
                record.error = Some("Interrupted by restart".to_string());
                record.updated_at = now;
            }
        }

        let mut jobs = self.jobs.write().await;
        jobs.clear();
        for info in records {
            jobs.insert(
                info.id.clone(),
                Arc::new(Mutex::new(JobSlot { info, handle: None })),
            );
        }
        drop(jobs);

        self.persist_state().await?;
        Ok(())
    }

    /// Spawn a detached job. Returns the id immediately; the future runs on
    /// its own tokio task.
    pub async fn spawn<F, Fut>(
        &self,
        id: String,
        description: String,
        job_fn: F,
    ) -> Result<String, JobError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<String, String>> + Send + 'static,
    {
        let jobs = self.jobs.read().await;
        if jobs.contains_key(&id) {
            return Err(JobError::AlreadyExists(id));
        }
        drop(jobs);

        let now = chrono::Utc::now().timestamp();
        let info = JobInfo {
            id: id.clone(),
            description,
            status: JobStatus::Running,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        };

        let handle = tokio::spawn(job_fn());

        let slot = Arc::new(Mutex::new(JobSlot {
            info,
            handle: Some(handle),
        }));

        let mut jobs = self.jobs.write().await;
        jobs.insert(id.clone(), slot);
        drop(jobs);
        self.persist_state().await?;

        tracing::info!("Spawned job: {}", id);
        Ok(id)
    }

    /// Current status of a job, reaping its handle if it finished.
    pub async fn status(&self, id: &str) -> Result<JobInfo, JobError> {
        let jobs = self.jobs.read().await;
        let slot = jobs
            .get(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        let mut guard = slot.lock().await;
        let mut changed = false;

        if let Some(handle) = &mut guard.handle {
            if handle.is_finished() {
                let result = handle.await;
                guard.handle = None;

                match result {
                    Ok(Ok(output)) => {
                        guard.info.status = JobStatus::Completed;
                        guard.info.result = Some(output);
                    }
                    Ok(Err(error)) => {
                        guard.info.status = JobStatus::Failed;
                        guard.info.error = Some(error);
                    }
                    Err(e) => {
                        guard.info.status = JobStatus::Failed;
                        guard.info.error = Some(e.to_string());
                    }
                }
                guard.info.updated_at = chrono::Utc::now().timestamp();
                changed = true;
            }
        }

        let info = guard.info.clone();
        drop(guard);
        drop(jobs);

        if changed {
            self.persist_state().await?;
        }

        Ok(info)
    }

    pub async fn cancel(&self, id: &str) -> Result<(), JobError> {
        let jobs = self.jobs.read().await;
        let slot = jobs
            .get(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;

        let mut guard = slot.lock().await;

        if let Some(handle) = guard.handle.take() {
            handle.abort();
            guard.info.status = JobStatus::Cancelled;
            guard.info.updated_at = chrono::Utc::now().timestamp();
            tracing::info!("Cancelled job: {}", id);
        }
        drop(guard);
        drop(jobs);
        self.persist_state().await?;

        Ok(())
    }

    pub async fn list(&self) -> Vec<JobInfo> {
        let jobs = self.jobs.read().await;
        let mut result = Vec::new();

        for slot in jobs.values() {
            let guard = slot.lock().await;
            result.push(guard.info.clone());
        }

        result
    }

    /// Jobs whose handle has not finished yet.
    pub async fn running_count(&self) -> usize {
        let jobs = self.jobs.read().await;
        let mut count = 0;

        for slot in jobs.values() {
            let guard = slot.lock().await;
            if let Some(handle) = &guard.handle {
                if !handle.is_finished() {
                    count += 1;
                }
            }
        }

        count
    }

    /// Drop completed, failed and cancelled jobs from the table.
    pub async fn prune_finished(&self) {
        let mut jobs = self.jobs.write().await;
        jobs.retain(|_, slot| {
            if let Ok(guard) = slot.try_lock() {
                guard.info.status == JobStatus::Running
            } else {
                true
            }
        });
        drop(jobs);
        let _ = self.persist_state().await;
    }

    async fn persist_state(&self) -> Result<(), JobError> {
        let Some(state_file) = &self.state_file else {
            return Ok(());
        };

        let jobs = self.jobs.read().await;
        let mut snapshot = Vec::with_capacity(jobs.len());
        for slot in jobs.values() {
            let guard = slot.lock().await;
            snapshot.push(guard.info.clone());
        }
        drop(jobs);

        if let Some(parent) = state_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_file = state_file.with_extension("tmp");
        let content = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(&tmp_file, content).await?;
        tokio::fs::rename(tmp_file, state_file).await?;

        Ok(())
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}
