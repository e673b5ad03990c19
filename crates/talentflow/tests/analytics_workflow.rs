use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use talentflow::analytics::{
    AnalyticsSession, Candidate, CandidatePage, CandidateQuery, DirectoryDelivery, EntityQuery,
    ExportQuoting, FixedApplicationCounts, Job, JobPage, JobQuery, QueryError, SessionSettings,
    SessionState,
};

struct StaticBoard {
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
}

#[async_trait]
impl EntityQuery for StaticBoard {
    async fn jobs(&self, query: JobQuery) -> Result<JobPage, QueryError> {
        let jobs: Vec<Job> = self
            .jobs
            .iter()
            .take(query.page_size as usize)
            .cloned()
            .collect();
        Ok(JobPage {
            total: self.jobs.len(),
            jobs,
        })
    }

    async fn candidates(&self, query: CandidateQuery) -> Result<CandidatePage, QueryError> {
        let candidates: Vec<Candidate> = self
            .candidates
            .iter()
            .take(query.page_size as usize)
            .cloned()
            .collect();
        Ok(CandidatePage {
            total: self.candidates.len(),
            candidates,
        })
    }
}

fn board() -> StaticBoard {
    let jobs = (1..=120)
        .map(|n| Job::new(format!("job-{n}"), format!("Role {n}")))
        .collect();
    let stages = ["applied", "screen", "tech", "offer", "hired", "rejected", "withdrawn"];
    let candidates = (0..1400)
        .map(|n| Candidate::new(format!("cand-{n}"), stages[n % stages.len()]))
        .collect();
    StaticBoard { jobs, candidates }
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("talentflow-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn refresh_and_export_to_directory() {
    let session = AnalyticsSession::with_counts(
        Arc::new(board()),
        Arc::new(FixedApplicationCounts(33)),
        SessionSettings {
            top_jobs_limit: 5,
            export_prefix: "acme".to_string(),
            quoting: ExportQuoting::Never,
        },
    );

    let SessionState::Ready(snapshot) = session.refresh().await else {
        panic!("expected ready session");
    };

    // 1000 candidates fetched; every 7th holds an unknown stage.
    let counted: usize = snapshot
        .candidate_pipeline
        .iter()
        .map(|entry| entry.count)
        .sum();
    assert_eq!(counted, 1000 - 1000 / 7);
    assert_eq!(snapshot.top_jobs.len(), 5);
    assert_eq!(snapshot.top_jobs[0].title, "Role 1");

    let dir = scratch_dir("export");
    let delivery = DirectoryDelivery::new(&dir);
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    let artifact = session
        .export_to(&delivery, date)
        .expect("export succeeds")
        .expect("artifact produced");

    let path = dir.join("acme_analytics_2025-06-01.csv");
    assert_eq!(delivery.path_for(&artifact), path);
    let written = fs::read_to_string(&path).expect("export written");
    assert_eq!(written, artifact.contents);
    assert_eq!(written.lines().count(), (2 + 6 + 1) + (2 + 6 + 1) + (2 + 4 + 1) + (2 + 5 + 1));
    assert!(written.ends_with("Role 5,33\n\n"));

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn export_before_refresh_writes_nothing() {
    let session = AnalyticsSession::new(Arc::new(board()), SessionSettings::default());
    let dir = scratch_dir("idle");
    let delivery = DirectoryDelivery::new(&dir);

    let exported = session
        .export_today(&delivery)
        .expect("idle export is a no-op");

    assert!(exported.is_none());
    assert!(!dir.exists());
}
