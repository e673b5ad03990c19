use crate::dataset::{Dataset, StoredCandidate, StoredJob};
use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use talentflow::analytics::{
    CandidatePage, CandidateQuery, EntityQuery, JobPage, JobQuery, QueryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Entity store answering board queries from memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEntityStore {
    data: Arc<RwLock<Dataset>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryEntityStore {
    pub(crate) fn new(dataset: Dataset) -> Self {
        Self {
            data: Arc::new(RwLock::new(dataset)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every query fail until switched back.
    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    fn ensure_online(&self) -> Result<(), QueryError> {
        if self.offline.load(Ordering::Acquire) {
            Err(QueryError::new("entity store is offline"))
        } else {
            Ok(())
        }
    }
}

fn page_window(len: usize, page: u32, page_size: u32) -> Range<usize> {
    let page_size = page_size as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

fn matches_search(needle: &str, haystacks: &[&str]) -> bool {
    needle.is_empty()
        || haystacks
            .iter()
            .any(|value| value.to_lowercase().contains(needle))
}

#[async_trait]
impl EntityQuery for InMemoryEntityStore {
    async fn jobs(&self, query: JobQuery) -> Result<JobPage, QueryError> {
        self.ensure_online()?;
        let data = self
            .data
            .read()
            .map_err(|_| QueryError::new("entity store lock poisoned"))?;

        let needle = query.search.trim().to_lowercase();
        let mut matches: Vec<&StoredJob> = data
            .jobs
            .iter()
            .filter(|job| matches_search(&needle, &[job.title.as_str()]))
            .filter(|job| query.status.is_empty() || job.status == query.status)
            .collect();

        match query.sort.as_str() {
            "" | "order" => matches.sort_by_key(|job| job.order),
            "title" => matches.sort_by(|a, b| a.title.cmp(&b.title)),
            other => return Err(QueryError::new(format!("unsupported job sort '{other}'"))),
        }

        let total = matches.len();
        let jobs = matches[page_window(total, query.page, query.page_size)]
            .iter()
            .map(|job| job.to_job())
            .collect();
        Ok(JobPage { jobs, total })
    }

    async fn candidates(&self, query: CandidateQuery) -> Result<CandidatePage, QueryError> {
        self.ensure_online()?;
        let data = self
            .data
            .read()
            .map_err(|_| QueryError::new("entity store lock poisoned"))?;

        let needle = query.search.trim().to_lowercase();
        let matches: Vec<&StoredCandidate> = data
            .candidates
            .iter()
            .filter(|candidate| {
                matches_search(
                    &needle,
                    &[candidate.name.as_str(), candidate.email.as_str()],
                )
            })
            .filter(|candidate| query.stage.is_empty() || candidate.stage == query.stage)
            .collect();

        let total = matches.len();
        let candidates = matches[page_window(total, query.page, query.page_size)]
            .iter()
            .map(|candidate| candidate.to_candidate())
            .collect();
        Ok(CandidatePage { candidates, total })
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
