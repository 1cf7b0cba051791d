use super::error::PipelineServiceError;
use super::report::{ChapterOutcome, ChapterReport, FailureStage, PipelineReport};
use crate::domain::chapter::{extract_chapters, Chapter};
use crate::domain::retrieval::ArtifactRetriever;
use crate::domain::synthesis::SynthesisDriver;
use crate::infrastructure::document::DocumentReader;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

pub struct PipelineService {
    document_reader: Arc<dyn DocumentReader>,
    driver: SynthesisDriver,
    retriever: ArtifactRetriever,
    local_directory: PathBuf,
}

impl PipelineService {
    pub fn new(
        document_reader: Arc<dyn DocumentReader>,
        driver: SynthesisDriver,
        retriever: ArtifactRetriever,
        local_directory: PathBuf,
    ) -> Self {
        Self {
            document_reader,
            driver,
            retriever,
            local_directory,
        }
    }
}

#[async_trait]
pub trait PipelineServiceApi: Send + Sync {
    /// Narrate every chapter of a manuscript
    ///
    /// This operation:
    /// - Reads the document and splits it into chapters
    /// - Runs one synthesis job per chapter, strictly in document order
    /// - Downloads each finished narration into the local directory
    ///
    /// A failing chapter is recorded in the report and never stops the run.
    /// Only an unreadable document is an error.
    async fn run(&self, document_path: &Path) -> Result<PipelineReport, PipelineServiceError>;
}

#[async_trait]
impl PipelineServiceApi for PipelineService {
    async fn run(&self, document_path: &Path) -> Result<PipelineReport, PipelineServiceError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let reader = self.document_reader.clone();
        let path = document_path.to_path_buf();
        let paragraphs = tokio::task::spawn_blocking(move || reader.paragraphs(&path))
            .await
            .map_err(anyhow::Error::from)??;

        let chapters = extract_chapters(&paragraphs);

        tracing::info!(
            run_id = %run_id,
            document = %document_path.display(),
            paragraph_count = paragraphs.len(),
            chapter_count = chapters.len(),
            "Chapters extracted"
        );

        let mut reports = Vec::with_capacity(chapters.len());

        for (index, (title, body)) in chapters.into_iter().enumerate() {
            let chapter = Chapter { index, title, body };
            let span = tracing::info_span!("chapter", index = index, title = %chapter.title);
            let report = self.process_chapter(chapter).instrument(span).await;
            reports.push(report);
        }

        let report = PipelineReport {
            run_id,
            document_path: document_path.display().to_string(),
            started_at,
            finished_at: Utc::now(),
            chapters: reports,
        };

        tracing::info!(
            run_id = %run_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Pipeline run finished"
        );

        Ok(report)
    }
}

impl PipelineService {
    /// Full synthesize + retrieve cycle for one chapter
    async fn process_chapter(&self, chapter: Chapter) -> ChapterReport {
        let sanitized_title = chapter.sanitized_title();

        let outcome = match self.driver.synthesize(&chapter.body, &chapter.title).await {
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate audio");
                ChapterOutcome::Failed {
                    stage: FailureStage::Synthesis,
                    reason: e.to_string(),
                }
            }
            Ok(artifact) => {
                tracing::info!(output_uri = %artifact.uri, "Audio generated and saved in S3");

                let local_path = self.local_path_for(&sanitized_title);
                match self
                    .retriever
                    .retrieve(&artifact.bucket, &artifact.key, &local_path)
                    .await
                {
                    Ok(()) => ChapterOutcome::Succeeded {
                        artifact,
                        local_path: local_path.display().to_string(),
                    },
                    Err(e) => {
                        tracing::error!(error = %e, key = %artifact.key, "Failed to download audio");
                        ChapterOutcome::Failed {
                            stage: FailureStage::Retrieval,
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };

        ChapterReport {
            index: chapter.index,
            title: chapter.title,
            sanitized_title,
            outcome,
        }
    }

    fn local_path_for(&self, sanitized_title: &str) -> PathBuf {
        let extension = self.driver.settings().file_extension();
        self.local_directory
            .join(format!("{}.{}", sanitized_title, extension))
    }
}
