use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use super::delivery::DeliveryError;
use super::domain::AnalyticsSnapshot;

pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

/// Quoting rule applied to every exported field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportQuoting {
    /// Quote fields holding a comma, quote, or line break; double inner quotes.
    #[default]
    Necessary,
    /// Raw concatenation. A comma inside a value shifts that row's columns.
    Never,
}

impl ExportQuoting {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "necessary" | "quoted" => Some(Self::Necessary),
            "never" | "raw" | "legacy" => Some(Self::Never),
            _ => None,
        }
    }

    fn style(self) -> csv::QuoteStyle {
        match self {
            Self::Necessary => csv::QuoteStyle::Necessary,
            Self::Never => csv::QuoteStyle::Never,
        }
    }
}

/// Rendered export, ready to hand to a delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub contents: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write csv: {0}")]
    Io(#[from] io::Error),
    #[error("export is not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// `<prefix>_analytics_<YYYY-MM-DD>.csv`
pub fn artifact_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_analytics_{}.csv", date.format("%Y-%m-%d"))
}

struct Section {
    title: &'static str,
    header: [&'static str; 2],
    rows: Vec<[String; 2]>,
}

fn sections(snapshot: &AnalyticsSnapshot) -> [Section; 4] {
    [
        Section {
            title: "Candidate Pipeline",
            header: ["Stage", "Count"],
            rows: snapshot
                .candidate_pipeline
                .iter()
                .map(|entry| [entry.stage.to_string(), entry.count.to_string()])
                .collect(),
        },
        Section {
            title: "Hiring Velocity",
            header: ["Month", "Hires"],
            rows: snapshot
                .hiring_velocity
                .iter()
                .map(|point| [point.period.to_string(), point.hires.to_string()])
                .collect(),
        },
        Section {
            title: "Assessment Scores Distribution",
            header: ["Score Range", "Count"],
            rows: snapshot
                .assessment_scores
                .iter()
                .map(|bucket| [bucket.range.to_string(), bucket.count.to_string()])
                .collect(),
        },
        Section {
            title: "Top Performing Jobs",
            header: ["Job Title", "Applications"],
            rows: snapshot
                .top_jobs
                .iter()
                .map(|job| [job.title.clone(), job.applications.to_string()])
                .collect(),
        },
    ]
}

/// Streams the four sections into `out`, each followed by a blank line.
pub fn write_csv<W: Write>(
    snapshot: &AnalyticsSnapshot,
    quoting: ExportQuoting,
    mut out: W,
) -> Result<W, ExportError> {
    for section in sections(snapshot) {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .quote_style(quoting.style())
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut out);

        writer.write_record([section.title])?;
        writer.write_record(section.header)?;
        for row in &section.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        drop(writer);

        // Separator goes straight to the sink: csv would emit `""` for an empty record.
        out.write_all(b"\n")?;
    }

    Ok(out)
}

pub fn render_csv(snapshot: &AnalyticsSnapshot, quoting: ExportQuoting) -> Result<String, ExportError> {
    let buffer = write_csv(snapshot, quoting, Vec::new())?;
    Ok(String::from_utf8(buffer)?)
}
