use crate::domain::synthesis::RemoteArtifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which step of a chapter's cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Synthesis,
    Retrieval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChapterOutcome {
    Succeeded {
        artifact: RemoteArtifact,
        local_path: String,
    },
    Failed {
        stage: FailureStage,
        reason: String,
    },
}

impl ChapterOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChapterOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterReport {
    pub index: usize,
    pub title: String,
    pub sanitized_title: String,
    pub outcome: ChapterOutcome,
}

/// Outcome of one run over a manuscript, chapters in document order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub document_path: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub chapters: Vec<ChapterReport>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> usize {
        self.chapters
            .iter()
            .filter(|c| c.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.chapters.len() - self.succeeded()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
