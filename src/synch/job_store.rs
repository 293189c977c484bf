use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// What the gateway remembers about a Med42 job it started.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub webhook_url: String,
    pub metadata: Value,
    pub submitted_at: Instant,
}

/// Bounded `job_id` -> originating request map. Entries expire after `ttl`;
/// when `capacity` is reached the oldest entry is evicted.
pub struct JobStore {
    jobs: Mutex<HashMap<String, JobRecord>>,
    ttl: Duration,
    capacity: usize,
}

impl JobStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    pub async fn record(&self, job_id: String, record: JobRecord) {
        if self.capacity == 0 {
            return;
        }
        let mut jobs = self.jobs.lock().await;
        purge_expired(&mut jobs, self.ttl);

        if !jobs.contains_key(&job_id) && jobs.len() >= self.capacity {
            let oldest = jobs
                .iter()
                .min_by_key(|(_, r)| r.submitted_at)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                jobs.remove(&id);
            }
        }
        jobs.insert(job_id, record);
    }

    /// Read-only: looking a job up never changes what later lookups return,
    /// apart from TTL expiry.
    pub async fn lookup(&self, job_id: &str) -> Option<JobRecord> {
        let mut jobs = self.jobs.lock().await;
        purge_expired(&mut jobs, self.ttl);
        jobs.get(job_id).cloned()
    }

    pub async fn len(&self) -> usize {
        let mut jobs = self.jobs.lock().await;
        purge_expired(&mut jobs, self.ttl);
        jobs.len()
    }
}

fn purge_expired(jobs: &mut HashMap<String, JobRecord>, ttl: Duration) {
    let now = Instant::now();
    jobs.retain(|_, r| now.duration_since(r.submitted_at) < ttl);
}
