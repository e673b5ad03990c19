use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::Notify;

use crate::analytics::delivery::{DeliveryError, ExportDelivery};
use crate::analytics::domain::{
    AnalyticsSnapshot, Candidate, Job, JobRanking, ScoreBucket, StageCount, VelocityPoint,
};
use crate::analytics::export::{ExportArtifact, ExportQuoting};
use crate::analytics::query::{
    CandidatePage, CandidateQuery, EntityQuery, JobPage, JobQuery, QueryError,
};
use crate::analytics::session::{AnalyticsSession, SessionSettings};
use crate::analytics::FixedApplicationCounts;

pub(super) fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

pub(super) fn jobs(titles: &[&str]) -> Vec<Job> {
    titles
        .iter()
        .enumerate()
        .map(|(index, title)| Job::new(format!("job-{}", index + 1), *title))
        .collect()
}

pub(super) fn candidates(stages: &[&str]) -> Vec<Candidate> {
    stages
        .iter()
        .enumerate()
        .map(|(index, stage)| Candidate::new(format!("cand-{}", index + 1), *stage))
        .collect()
}

/// Ten candidates: applied x3, screen x2, tech, offer, hired x2, rejected.
pub(super) fn reference_candidates() -> Vec<Candidate> {
    candidates(&[
        "applied", "screen", "applied", "hired", "tech", "rejected", "offer", "screen",
        "applied", "hired",
    ])
}

pub(super) fn settings() -> SessionSettings {
    SessionSettings::default()
}

pub(super) fn legacy_settings() -> SessionSettings {
    SessionSettings {
        quoting: ExportQuoting::Never,
        ..SessionSettings::default()
    }
}

pub(super) fn session_with<Q>(query: Q, settings: SessionSettings) -> AnalyticsSession<Q>
where
    Q: EntityQuery + 'static,
{
    AnalyticsSession::with_counts(Arc::new(query), Arc::new(FixedApplicationCounts(25)), settings)
}

pub(super) fn sample_snapshot() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        candidate_pipeline: vec![
            StageCount {
                stage: "Applied",
                count: 3,
            },
            StageCount {
                stage: "Hired",
                count: 1,
            },
        ],
        hiring_velocity: vec![VelocityPoint {
            period: "Jan",
            hires: 5,
        }],
        assessment_scores: vec![
            ScoreBucket {
                range: "0-50",
                count: 10,
            },
            ScoreBucket {
                range: "51-70",
                count: 20,
            },
        ],
        top_jobs: vec![JobRanking {
            title: "Platform Engineer".to_string(),
            applications: 42,
        }],
    }
}

/// Answers from fixed results and records every query it receives.
#[derive(Default)]
pub(super) struct ScriptedQuery {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    jobs_error: Option<String>,
    candidates_error: Option<String>,
    job_queries: Mutex<Vec<JobQuery>>,
    candidate_queries: Mutex<Vec<CandidateQuery>>,
}

impl ScriptedQuery {
    pub(super) fn new(jobs: Vec<Job>, candidates: Vec<Candidate>) -> Self {
        Self {
            jobs,
            candidates,
            ..Self::default()
        }
    }

    pub(super) fn failing_jobs(mut self, message: &str) -> Self {
        self.jobs_error = Some(message.to_string());
        self
    }

    pub(super) fn failing_candidates(mut self, message: &str) -> Self {
        self.candidates_error = Some(message.to_string());
        self
    }

    pub(super) fn job_queries(&self) -> Vec<JobQuery> {
        self.job_queries.lock().expect("query mutex").clone()
    }

    pub(super) fn candidate_queries(&self) -> Vec<CandidateQuery> {
        self.candidate_queries.lock().expect("query mutex").clone()
    }
}

#[async_trait]
impl EntityQuery for ScriptedQuery {
    async fn jobs(&self, query: JobQuery) -> Result<JobPage, QueryError> {
        self.job_queries.lock().expect("query mutex").push(query);
        match &self.jobs_error {
            Some(message) => Err(QueryError::new(message.clone())),
            None => Ok(JobPage {
                jobs: self.jobs.clone(),
                total: self.jobs.len(),
            }),
        }
    }

    async fn candidates(&self, query: CandidateQuery) -> Result<CandidatePage, QueryError> {
        self.candidate_queries
            .lock()
            .expect("query mutex")
            .push(query);
        match &self.candidates_error {
            Some(message) => Err(QueryError::new(message.clone())),
            None => Ok(CandidatePage {
                candidates: self.candidates.clone(),
                total: self.candidates.len(),
            }),
        }
    }
}

/// Holds each jobs query open until its gate is released. Gates are handed
/// out in call order, so the n-th refresh waits on the n-th gate.
pub(super) struct GatedQuery {
    job_batches: Mutex<VecDeque<(Arc<Notify>, Vec<Job>)>>,
    candidates: Vec<Candidate>,
}

impl GatedQuery {
    pub(super) fn new(job_batches: Vec<(Arc<Notify>, Vec<Job>)>, candidates: Vec<Candidate>) -> Self {
        Self {
            job_batches: Mutex::new(job_batches.into()),
            candidates,
        }
    }
}

#[async_trait]
impl EntityQuery for GatedQuery {
    async fn jobs(&self, _query: JobQuery) -> Result<JobPage, QueryError> {
        let next = self.job_batches.lock().expect("gate mutex").pop_front();
        let Some((gate, jobs)) = next else {
            return Err(QueryError::new("no scripted job batch left"));
        };
        gate.notified().await;
        Ok(JobPage {
            total: jobs.len(),
            jobs,
        })
    }

    async fn candidates(&self, _query: CandidateQuery) -> Result<CandidatePage, QueryError> {
        Ok(CandidatePage {
            candidates: self.candidates.clone(),
            total: self.candidates.len(),
        })
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryDelivery {
    delivered: Mutex<Vec<ExportArtifact>>,
}

impl MemoryDelivery {
    pub(super) fn delivered(&self) -> Vec<ExportArtifact> {
        self.delivered.lock().expect("delivery mutex").clone()
    }
}

impl ExportDelivery for MemoryDelivery {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<(), DeliveryError> {
        self.delivered
            .lock()
            .expect("delivery mutex")
            .push(artifact.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct RejectingDelivery;

impl ExportDelivery for RejectingDelivery {
    fn deliver(&self, _artifact: &ExportArtifact) -> Result<(), DeliveryError> {
        Err(DeliveryError::Rejected("download blocked".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_str(&body).expect("json payload")
}
