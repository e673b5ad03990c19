//! Dashboard analytics: aggregation of jobs and candidates into summary
//! views, and the sectioned CSV export built from them.

pub mod aggregator;
pub mod delivery;
pub mod domain;
pub mod export;
pub mod query;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use aggregator::{
    aggregate, hiring_velocity, score_distribution, stage_counts, top_jobs,
    ApplicationCountSource, FixedApplicationCounts, RandomApplicationCounts,
    DEFAULT_TOP_JOBS_LIMIT,
};
pub use delivery::{DeliveryError, DirectoryDelivery, ExportDelivery};
pub use domain::{
    AnalyticsSnapshot, Candidate, CandidateId, Job, JobId, JobRanking, PipelineStage,
    ScoreBucket, StageCount, VelocityPoint,
};
pub use export::{
    artifact_name, render_csv, write_csv, ExportArtifact, ExportError, ExportQuoting,
    EXPORT_MEDIA_TYPE,
};
pub use query::{
    CandidatePage, CandidateQuery, EntityQuery, JobPage, JobQuery, QueryError,
};
pub use router::analytics_router;
pub use session::{
    AnalyticsSession, AnalyticsStateView, SessionSettings, SessionState,
    CANDIDATES_PAGE_SIZE, DEFAULT_EXPORT_PREFIX, JOBS_PAGE_SIZE,
};
