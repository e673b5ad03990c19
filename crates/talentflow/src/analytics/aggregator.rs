use rand::Rng;
use std::collections::HashMap;

use super::domain::{
    AnalyticsSnapshot, Candidate, Job, JobRanking, PipelineStage, ScoreBucket, StageCount,
    VelocityPoint,
};

pub const DEFAULT_TOP_JOBS_LIMIT: usize = 5;

// Seed series: no hire dates or assessment scores are read yet.
const HIRING_VELOCITY: [(&str, u32); 6] = [
    ("Jan", 5),
    ("Feb", 8),
    ("Mar", 12),
    ("Apr", 10),
    ("May", 15),
    ("Jun", 18),
];

const SCORE_DISTRIBUTION: [(&str, u32); 4] =
    [("0-50", 10), ("51-70", 20), ("71-90", 30), ("91-100", 15)];

/// Supplies the application count shown next to each top job.
pub trait ApplicationCountSource: Send + Sync {
    fn applications_for(&self, job: &Job) -> u32;
}

/// Uniform draw from `10..60`, matching the placeholder the dashboard shipped with.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomApplicationCounts;

impl ApplicationCountSource for RandomApplicationCounts {
    fn applications_for(&self, _job: &Job) -> u32 {
        rand::thread_rng().gen_range(10..60)
    }
}

/// Same count for every job.
#[derive(Debug, Clone, Copy)]
pub struct FixedApplicationCounts(pub u32);

impl ApplicationCountSource for FixedApplicationCounts {
    fn applications_for(&self, _job: &Job) -> u32 {
        self.0
    }
}

/// One entry per canonical stage, in pipeline order, zero-filled.
pub fn stage_counts(candidates: &[Candidate]) -> Vec<StageCount> {
    let mut tally: HashMap<PipelineStage, usize> = HashMap::new();
    for stage in candidates.iter().filter_map(Candidate::pipeline_stage) {
        *tally.entry(stage).or_default() += 1;
    }

    PipelineStage::ordered()
        .into_iter()
        .map(|stage| StageCount {
            stage: stage.label(),
            count: tally.get(&stage).copied().unwrap_or(0),
        })
        .collect()
}

pub fn hiring_velocity() -> Vec<VelocityPoint> {
    HIRING_VELOCITY
        .iter()
        .map(|&(period, hires)| VelocityPoint { period, hires })
        .collect()
}

pub fn score_distribution() -> Vec<ScoreBucket> {
    SCORE_DISTRIBUTION
        .iter()
        .map(|&(range, count)| ScoreBucket { range, count })
        .collect()
}

/// The first `limit` jobs in delivered order. No ranking is applied.
pub fn top_jobs<C>(jobs: &[Job], limit: usize, counts: &C) -> Vec<JobRanking>
where
    C: ApplicationCountSource + ?Sized,
{
    jobs.iter()
        .take(limit)
        .map(|job| JobRanking {
            title: job.title.clone(),
            applications: counts.applications_for(job),
        })
        .collect()
}

pub fn aggregate<C>(
    jobs: &[Job],
    candidates: &[Candidate],
    top_jobs_limit: usize,
    counts: &C,
) -> AnalyticsSnapshot
where
    C: ApplicationCountSource + ?Sized,
{
    AnalyticsSnapshot {
        candidate_pipeline: stage_counts(candidates),
        hiring_velocity: hiring_velocity(),
        assessment_scores: score_distribution(),
        top_jobs: top_jobs(jobs, top_jobs_limit, counts),
    }
}
