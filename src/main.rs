use echotales::domain::pipeline::{PipelineService, PipelineServiceApi};
use echotales::domain::retrieval::ArtifactRetriever;
use echotales::domain::shared::{Clock, TokioClock};
use echotales::domain::synthesis::SynthesisDriver;
use echotales::error::{AppError, AppResult};
use echotales::infrastructure::config::{Config, LogFormat};
use echotales::infrastructure::document::reader_for_path;
use echotales::infrastructure::repositories::{PollySynthesisRepository, S3BlobRepository};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env().map_err(|e| AppError::Configuration(e.to_string()))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        document = %config.document_path.display(),
        local_directory = %config.local_directory.display(),
        bucket = %config.output_bucket,
        voice_id = %config.voice_id,
        engine = %config.engine,
        "Starting echotales"
    );

    if !config.local_directory.is_dir() {
        tracing::warn!(
            local_directory = %config.local_directory.display(),
            "Local directory does not exist, downloads will fail"
        );
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));

    // === DEPENDENCY INJECTION SETUP ===
    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
    let synthesis_repo = Arc::new(PollySynthesisRepository::new(polly_client));
    let blob_repo = Arc::new(S3BlobRepository::new(s3_client));

    let driver = SynthesisDriver::new(
        synthesis_repo,
        clock.clone(),
        config.synthesis_settings(),
        config.poll_policy(),
        config.retry_policy(),
    );
    let retriever = ArtifactRetriever::new(blob_repo, clock, config.retry_policy());
    let pipeline = PipelineService::new(
        Arc::from(reader_for_path(&config.document_path)),
        driver,
        retriever,
        config.local_directory.clone(),
    );

    if let Err(e) = run(&pipeline, &config).await {
        tracing::error!(error = %e, error_kind = e.kind(), "Pipeline aborted");
        return Err(e.into());
    }

    Ok(())
}

async fn run(pipeline: &PipelineService, config: &Config) -> AppResult<()> {
    let report = pipeline.run(&config.document_path).await?;

    if let Some(report_path) = &config.report_path {
        let json = report.to_json_pretty()?;
        tokio::fs::write(report_path, json).await?;
        tracing::info!(path = %report_path.display(), "Run report written");
    }

    tracing::info!(
        chapters = report.chapters.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Done"
    );

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "echotales=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "echotales=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
