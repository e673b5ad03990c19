use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{Candidate, Job};

/// Filter accepted by the job listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    pub search: String,
    pub status: String,
    pub page: u32,
    pub page_size: u32,
    pub sort: String,
}

impl JobQuery {
    /// First page of every job, in the board's display order.
    pub fn display_order(page_size: u32) -> Self {
        Self {
            search: String::new(),
            status: String::new(),
            page: 1,
            page_size,
            sort: "order".to_string(),
        }
    }
}

/// Filter accepted by the candidate listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub search: String,
    pub stage: String,
    pub page: u32,
    pub page_size: u32,
}

impl CandidateQuery {
    pub fn unfiltered(page_size: u32) -> Self {
        Self {
            search: String::new(),
            stage: String::new(),
            page: 1,
            page_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePage {
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub total: usize,
}

/// Data-access boundary answering bounded entity queries.
#[async_trait]
pub trait EntityQuery: Send + Sync {
    async fn jobs(&self, query: JobQuery) -> Result<JobPage, QueryError>;
    async fn candidates(&self, query: CandidateQuery) -> Result<CandidatePage, QueryError>;
}

/// A rejected entity query. The message is surfaced to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct QueryError {
    message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
