use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use talentflow::analytics::{Candidate, CandidateId, Job, JobId};
use talentflow::error::AppError;
use tracing::warn;

/// Job row as the board stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredJob {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default = "default_status")]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) order: u32,
}

impl StoredJob {
    pub(crate) fn to_job(&self) -> Job {
        Job {
            id: JobId(self.id.clone()),
            title: self.title.clone(),
        }
    }
}

fn default_status() -> String {
    "active".to_string()
}

/// Candidate row as the board stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredCandidate {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) stage: String,
    #[serde(default)]
    pub(crate) job_id: Option<String>,
}

impl StoredCandidate {
    pub(crate) fn to_candidate(&self) -> Candidate {
        Candidate {
            id: CandidateId(self.id.clone()),
            stage: Some(self.stage.clone()).filter(|stage| !stage.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Dataset {
    #[serde(default)]
    pub(crate) jobs: Vec<StoredJob>,
    #[serde(default)]
    pub(crate) candidates: Vec<StoredCandidate>,
}

impl Dataset {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub(crate) fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let dataset = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::demo(),
        };

        let orphaned = dataset.orphaned_candidates();
        if orphaned > 0 {
            warn!(orphaned, "candidates reference jobs missing from the dataset");
        }
        Ok(dataset)
    }

    /// Candidates whose `job_id` names no job on the board.
    pub(crate) fn orphaned_candidates(&self) -> usize {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.job_id.as_deref())
            .filter(|job_id| !self.jobs.iter().any(|job| job.id == *job_id))
            .count()
    }

    /// Small hiring board used when no dataset file is supplied.
    pub(crate) fn demo() -> Self {
        const JOBS: [(&str, &str); 8] = [
            ("Senior Backend Engineer", "active"),
            ("Product Designer", "active"),
            ("Data Analyst", "active"),
            ("Site Reliability Engineer", "archived"),
            ("Engineering Manager", "active"),
            ("QA Automation Engineer", "active"),
            ("Technical Recruiter", "archived"),
            ("Mobile Developer", "active"),
        ];
        const STAGES: [&str; 6] = ["applied", "screen", "tech", "offer", "hired", "rejected"];
        const FIRST_NAMES: [&str; 8] = [
            "Avery", "Jordan", "Riley", "Casey", "Morgan", "Quinn", "Taylor", "Rowan",
        ];
        const LAST_NAMES: [&str; 5] = ["Lee", "Patel", "Garcia", "Okafor", "Novak"];

        let jobs: Vec<StoredJob> = JOBS
            .iter()
            .enumerate()
            .map(|(index, (title, status))| StoredJob {
                id: format!("job-{}", index + 1),
                title: title.to_string(),
                status: status.to_string(),
                order: index as u32 + 1,
            })
            .collect();

        let candidates = (0..40usize)
            .map(|n| {
                let first = FIRST_NAMES[n % FIRST_NAMES.len()];
                let last = LAST_NAMES[(n / FIRST_NAMES.len()) % LAST_NAMES.len()];
                let stage = STAGES[(n * n + n / 3) % STAGES.len()];
                StoredCandidate {
                    id: format!("cand-{:03}", n + 1),
                    name: format!("{first} {last}"),
                    email: format!(
                        "{}.{}{}@example.com",
                        first.to_lowercase(),
                        last.to_lowercase(),
                        n + 1
                    ),
                    stage: stage.to_string(),
                    job_id: Some(format!("job-{}", n % JOBS.len() + 1)),
                }
            })
            .collect();

        Self { jobs, candidates }
    }
}
