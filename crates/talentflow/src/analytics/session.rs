use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregator::{
    aggregate, ApplicationCountSource, RandomApplicationCounts, DEFAULT_TOP_JOBS_LIMIT,
};
use super::delivery::ExportDelivery;
use super::domain::AnalyticsSnapshot;
use super::export::{artifact_name, render_csv, ExportArtifact, ExportError, ExportQuoting};
use super::query::{CandidateQuery, EntityQuery, JobQuery};

pub const JOBS_PAGE_SIZE: u32 = 100;
pub const CANDIDATES_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_EXPORT_PREFIX: &str = "talentflow";

/// Knobs for one session; see `AnalyticsConfig` for the environment mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub top_jobs_limit: usize,
    pub export_prefix: String,
    pub quoting: ExportQuoting,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            top_jobs_limit: DEFAULT_TOP_JOBS_LIMIT,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            quoting: ExportQuoting::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Loading,
    Ready(Arc<AnalyticsSnapshot>),
    Failed(String),
}

impl SessionState {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }

    pub fn view(&self) -> AnalyticsStateView {
        let (snapshot, error) = match self {
            Self::Ready(snapshot) => (Some(AnalyticsSnapshot::clone(snapshot)), None),
            Self::Failed(message) => (None, Some(message.clone())),
            Self::Idle | Self::Loading => (None, None),
        };

        AnalyticsStateView {
            status: self.label(),
            snapshot,
            error,
        }
    }
}

/// Serializable projection of [`SessionState`] for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsStateView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<AnalyticsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
struct SessionSlot {
    state: SessionState,
    last_started: u64,
    last_completed: u64,
}

/// Owns the current analytics snapshot and drives fetch-then-aggregate cycles.
///
/// Cycles are numbered as they start. A cycle that finishes after a newer one
/// has already completed is discarded, so a slow response never overwrites a
/// fresher snapshot.
pub struct AnalyticsSession<Q> {
    query: Arc<Q>,
    counts: Arc<dyn ApplicationCountSource>,
    settings: SessionSettings,
    slot: Mutex<SessionSlot>,
}

impl<Q> AnalyticsSession<Q>
where
    Q: EntityQuery + 'static,
{
    pub fn new(query: Arc<Q>, settings: SessionSettings) -> Self {
        Self::with_counts(query, Arc::new(RandomApplicationCounts), settings)
    }

    pub fn with_counts(
        query: Arc<Q>,
        counts: Arc<dyn ApplicationCountSource>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            query,
            counts,
            settings,
            slot: Mutex::new(SessionSlot {
                state: SessionState::Idle,
                last_started: 0,
                last_completed: 0,
            }),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        self.slot().state.clone()
    }

    pub fn snapshot(&self) -> Option<Arc<AnalyticsSnapshot>> {
        match &self.slot().state {
            SessionState::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Runs one aggregation cycle and returns the state it leaves behind.
    ///
    /// When cycles overlap, an older cycle that lands while a newer one is
    /// still loading is applied, so the session reads `Ready` with the older
    /// snapshot until the newer cycle replaces it. Only a cycle older than
    /// the last completed one is discarded.
    pub async fn refresh(&self) -> SessionState {
        let cycle = self.begin_cycle();
        info!(cycle, "analytics refresh started");

        let outcome = tokio::try_join!(
            self.query.jobs(JobQuery::display_order(JOBS_PAGE_SIZE)),
            self.query
                .candidates(CandidateQuery::unfiltered(CANDIDATES_PAGE_SIZE)),
        );

        let next = match outcome {
            Ok((jobs, candidates)) => {
                let snapshot = aggregate(
                    &jobs.jobs,
                    &candidates.candidates,
                    self.settings.top_jobs_limit,
                    self.counts.as_ref(),
                );
                info!(
                    cycle,
                    jobs = jobs.jobs.len(),
                    candidates = candidates.candidates.len(),
                    "analytics refresh completed"
                );
                SessionState::Ready(Arc::new(snapshot))
            }
            Err(err) => {
                warn!(cycle, error = %err, "analytics refresh failed");
                SessionState::Failed(err.to_string())
            }
        };

        self.complete_cycle(cycle, next)
    }

    /// Renders the held snapshot. `Ok(None)` when nothing is ready.
    pub fn export_artifact(&self, date: NaiveDate) -> Result<Option<ExportArtifact>, ExportError> {
        let Some(snapshot) = self.snapshot() else {
            debug!("export requested without a ready snapshot");
            return Ok(None);
        };

        let contents = render_csv(&snapshot, self.settings.quoting)?;
        Ok(Some(ExportArtifact {
            file_name: artifact_name(&self.settings.export_prefix, date),
            media_type: super::export::EXPORT_MEDIA_TYPE,
            contents,
        }))
    }

    /// Renders the held snapshot and hands it to `delivery`.
    pub fn export_to<D>(
        &self,
        delivery: &D,
        date: NaiveDate,
    ) -> Result<Option<ExportArtifact>, ExportError>
    where
        D: ExportDelivery + ?Sized,
    {
        let Some(artifact) = self.export_artifact(date)? else {
            return Ok(None);
        };

        delivery.deliver(&artifact)?;
        info!(
            file_name = %artifact.file_name,
            bytes = artifact.contents.len(),
            "analytics export delivered"
        );
        Ok(Some(artifact))
    }

    /// [`Self::export_to`] dated with the current UTC day.
    pub fn export_today<D>(&self, delivery: &D) -> Result<Option<ExportArtifact>, ExportError>
    where
        D: ExportDelivery + ?Sized,
    {
        self.export_to(delivery, Utc::now().date_naive())
    }

    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_cycle(&self) -> u64 {
        let mut slot = self.slot();
        slot.last_started += 1;
        slot.state = SessionState::Loading;
        slot.last_started
    }

    fn complete_cycle(&self, cycle: u64, next: SessionState) -> SessionState {
        let mut slot = self.slot();
        if cycle < slot.last_completed {
            debug!(
                cycle,
                newer = slot.last_completed,
                "discarding stale analytics result"
            );
            return slot.state.clone();
        }

        slot.last_completed = cycle;
        slot.state = next;
        slot.state.clone()
    }
}
