use serde::{Deserialize, Serialize};

/// Canonical hiring pipeline stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl PipelineStage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Applied,
            Self::Screen,
            Self::Tech,
            Self::Offer,
            Self::Hired,
            Self::Rejected,
        ]
    }

    /// Stage code as stored on candidate records.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Screen => "screen",
            Self::Tech => "tech",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Screen => "Screen",
            Self::Tech => "Tech",
            Self::Offer => "Offer",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
        }
    }

    /// Exact, case-sensitive lookup of a stored stage code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|stage| stage.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

/// Job fields read by the analytics core. Anything else the data layer
/// stores is dropped on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
}

impl Job {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: JobId(id.into()),
            title: title.into(),
        }
    }
}

/// Candidate fields read by the analytics core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub stage: Option<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            id: CandidateId(id.into()),
            stage: Some(stage.into()),
        }
    }

    /// Resolves the stored stage; unknown or missing values map to `None`.
    pub fn pipeline_stage(&self) -> Option<PipelineStage> {
        self.stage.as_deref().and_then(PipelineStage::from_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VelocityPoint {
    pub period: &'static str,
    pub hires: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub range: &'static str,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRanking {
    pub title: String,
    pub applications: u32,
}

/// The four summary views produced by one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSnapshot {
    pub candidate_pipeline: Vec<StageCount>,
    pub hiring_velocity: Vec<VelocityPoint>,
    pub assessment_scores: Vec<ScoreBucket>,
    pub top_jobs: Vec<JobRanking>,
}
