use crate::helpers::{
    build_pipeline, EventLog, FakeBlobRepository, FakeSynthesisRepository,
    InMemoryDocumentReader, ManualClock,
};
use echotales::domain::pipeline::{
    ChapterOutcome, FailureStage, PipelineServiceApi, PipelineServiceError,
};
use echotales::domain::synthesis::JobSnapshot;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const BOOK: &[&str] = &[
    "MOBY-DICK; or, THE WHALE.",
    "CHAPTER 1. Loomings.",
    "Call me Ishmael.",
    "CHAPTER 2. The Carpet-Bag.",
    "I stuffed a shirt or two into my old carpet-bag.",
    "CHAPTER 3. The Spouter-Inn.",
    "Entering that gable-ended Spouter-Inn,",
    "you found yourself in a wide, low, straggling entry.",
];

struct Fixture {
    events: EventLog,
    synthesis_repo: Arc<FakeSynthesisRepository>,
    clock: Arc<ManualClock>,
    dir: tempfile::TempDir,
}

fn fixture(
    configure_synthesis: impl FnOnce(FakeSynthesisRepository) -> FakeSynthesisRepository,
    configure_blobs: impl FnOnce(FakeBlobRepository) -> FakeBlobRepository,
    reader: InMemoryDocumentReader,
) -> (Fixture, echotales::domain::pipeline::PipelineService) {
    let events = EventLog::default();
    let synthesis_repo = Arc::new(configure_synthesis(FakeSynthesisRepository::new(
        events.clone(),
    )));
    let blob_repo = Arc::new(configure_blobs(FakeBlobRepository::new(events.clone())));
    let clock = Arc::new(ManualClock::default());
    let dir = tempfile::tempdir().unwrap();

    let pipeline = build_pipeline(
        reader,
        synthesis_repo.clone(),
        blob_repo,
        clock.clone(),
        dir.path().to_path_buf(),
    );

    (
        Fixture {
            events,
            synthesis_repo,
            clock,
            dir,
        },
        pipeline,
    )
}

fn titles_with_status(report: &echotales::domain::pipeline::PipelineReport) -> Vec<(String, bool)> {
    report
        .chapters
        .iter()
        .map(|c| (c.title.clone(), c.outcome.is_success()))
        .collect()
}

#[tokio::test]
async fn it_should_narrate_every_chapter_in_order() {
    let (fx, pipeline) = fixture(|s| s, |b| b, InMemoryDocumentReader::new(BOOK));

    let report = pipeline.run(Path::new("mobyDick.docx")).await.unwrap();

    assert_eq!(
        titles_with_status(&report),
        vec![
            ("CHAPTER 1. Loomings.".to_string(), true),
            ("CHAPTER 2. The Carpet-Bag.".to_string(), true),
            ("CHAPTER 3. The Spouter-Inn.".to_string(), true),
        ]
    );
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.document_path, "mobyDick.docx");

    let first = &report.chapters[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.sanitized_title, "CHAPTER_1._Loomings.");
    match &first.outcome {
        ChapterOutcome::Succeeded {
            artifact,
            local_path,
        } => {
            assert_eq!(artifact.bucket, "echotales");
            assert_eq!(artifact.key, "CHAPTER_1._Loomings./.job-1.mp3");
            assert!(local_path.ends_with("CHAPTER_1._Loomings..mp3"));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let audio = std::fs::read(fx.dir.path().join("CHAPTER_1._Loomings..mp3")).unwrap();
    assert_eq!(audio, b"CHAPTER_1._Loomings./.job-1.mp3".to_vec());
    assert!(fx.dir.path().join("CHAPTER_2._The_Carpet-Bag..mp3").exists());
    assert!(fx.dir.path().join("CHAPTER_3._The_Spouter-Inn..mp3").exists());
}

#[tokio::test]
async fn it_should_submit_chapter_bodies_without_front_matter() {
    let (fx, pipeline) = fixture(|s| s, |b| b, InMemoryDocumentReader::new(BOOK));

    pipeline.run(Path::new("mobyDick.docx")).await.unwrap();

    let requests = fx.synthesis_repo.requests.lock();
    let bodies: Vec<&str> = requests.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        bodies,
        vec![
            "CHAPTER 1. Loomings. Call me Ishmael.",
            "CHAPTER 2. The Carpet-Bag. I stuffed a shirt or two into my old carpet-bag.",
            "CHAPTER 3. The Spouter-Inn. Entering that gable-ended Spouter-Inn, you found yourself in a wide, low, straggling entry.",
        ]
    );
    assert!(requests.iter().all(|r| r.voice_id == "Danielle"
        && r.engine == "long-form"
        && r.output_format == "mp3"
        && r.output_bucket == "echotales"));
}

#[tokio::test]
async fn it_should_process_chapters_strictly_one_after_another() {
    let (fx, pipeline) = fixture(
        |s| {
            s.with_script(
                "CHAPTER_1._Loomings.",
                vec![JobSnapshot::in_progress(), JobSnapshot::in_progress()],
            )
        },
        |b| b,
        InMemoryDocumentReader::new(&BOOK[..5]),
    );

    pipeline.run(Path::new("mobyDick.docx")).await.unwrap();

    assert_eq!(
        *fx.events.lock(),
        vec![
            "submit CHAPTER_1._Loomings./",
            "poll job-1",
            "poll job-1",
            "poll job-1",
            "download CHAPTER_1._Loomings./.job-1.mp3",
            "submit CHAPTER_2._The_Carpet-Bag./",
            "poll job-2",
            "download CHAPTER_2._The_Carpet-Bag./.job-2.mp3",
        ]
    );

    // three polls plus settle for chapter 1, one poll plus settle for chapter 2
    let total: Duration = fx.clock.sleeps.lock().iter().sum();
    assert_eq!(total, Duration::from_secs(3 * 5 + 10 + 5 + 10));
}

#[tokio::test]
async fn it_should_record_failed_job_and_continue() {
    let (fx, pipeline) = fixture(
        |s| {
            s.with_script(
                "CHAPTER_1._Loomings.",
                vec![JobSnapshot::failed("Text length exceeds maximum")],
            )
        },
        |b| b,
        InMemoryDocumentReader::new(BOOK),
    );

    let report = pipeline.run(Path::new("mobyDick.docx")).await.unwrap();

    assert_eq!(report.failed(), 1);
    match &report.chapters[0].outcome {
        ChapterOutcome::Failed { stage, reason } => {
            assert_eq!(*stage, FailureStage::Synthesis);
            assert!(reason.contains("Text length exceeds maximum"));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(report.chapters[1].outcome.is_success());
    assert!(report.chapters[2].outcome.is_success());
    assert!(!fx.dir.path().join("CHAPTER_1._Loomings..mp3").exists());
}

#[tokio::test]
async fn it_should_record_submission_error_and_continue() {
    let (fx, pipeline) = fixture(
        |s| s.rejecting("CHAPTER_2._The_Carpet-Bag."),
        |b| b,
        InMemoryDocumentReader::new(BOOK),
    );

    let report = pipeline.run(Path::new("mobyDick.docx")).await.unwrap();

    assert_eq!(
        titles_with_status(&report)
            .into_iter()
            .map(|(_, ok)| ok)
            .collect::<Vec<_>>(),
        vec![true, false, true]
    );
    match &report.chapters[1].outcome {
        ChapterOutcome::Failed { stage, reason } => {
            assert_eq!(*stage, FailureStage::Synthesis);
            assert!(reason.contains("ThrottlingException"));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(fx.synthesis_repo.requests.lock().len(), 3);
}

#[tokio::test]
async fn it_should_isolate_a_retrieval_failure_to_its_chapter() {
    let (fx, pipeline) = fixture(
        |s| s,
        |b| b.failing("CHAPTER_2._The_Carpet-Bag."),
        InMemoryDocumentReader::new(BOOK),
    );

    let report = pipeline.run(Path::new("mobyDick.docx")).await.unwrap();

    let failures: Vec<usize> = report
        .chapters
        .iter()
        .filter(|c| !c.outcome.is_success())
        .map(|c| c.index)
        .collect();
    assert_eq!(failures, vec![1]);
    assert!(matches!(
        report.chapters[1].outcome,
        ChapterOutcome::Failed {
            stage: FailureStage::Retrieval,
            ..
        }
    ));

    assert!(fx.dir.path().join("CHAPTER_1._Loomings..mp3").exists());
    assert!(!fx.dir.path().join("CHAPTER_2._The_Carpet-Bag..mp3").exists());
    assert!(fx.dir.path().join("CHAPTER_3._The_Spouter-Inn..mp3").exists());
}

#[tokio::test]
async fn it_should_merge_chapters_sharing_a_title() {
    let (fx, pipeline) = fixture(
        |s| s,
        |b| b,
        InMemoryDocumentReader::new(&["CHAPTER X", "a", "CHAPTER Y", "b", "CHAPTER X", "c"]),
    );

    let report = pipeline.run(Path::new("book.docx")).await.unwrap();

    assert_eq!(report.chapters.len(), 2);
    assert_eq!(report.chapters[0].title, "CHAPTER X");
    assert_eq!(report.chapters[1].title, "CHAPTER Y");
    assert_eq!(
        fx.synthesis_repo.requests.lock()[0].text,
        "CHAPTER X a CHAPTER X c"
    );
}

#[tokio::test]
async fn it_should_report_nothing_for_a_document_without_chapters() {
    let (fx, pipeline) = fixture(
        |s| s,
        |b| b,
        InMemoryDocumentReader::new(&["Title page", "Dedication"]),
    );

    let report = pipeline.run(Path::new("book.docx")).await.unwrap();

    assert!(report.chapters.is_empty());
    assert!(fx.events.lock().is_empty());
}

#[tokio::test]
async fn it_should_fail_when_the_document_cannot_be_read() {
    let (fx, pipeline) = fixture(|s| s, |b| b, InMemoryDocumentReader::unreadable());

    let result = pipeline.run(Path::new("broken.docx")).await;

    assert!(matches!(result, Err(PipelineServiceError::Document(_))));
    assert!(fx.events.lock().is_empty());
}
