use crate::domain::shared::RetryPolicy;
use crate::domain::synthesis::{PollPolicy, SynthesisSettings};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub document_path: PathBuf,
    pub local_directory: PathBuf,
    pub report_path: Option<PathBuf>,
    pub aws_region: String,
    pub log_format: LogFormat,
    // Polly synthesis
    pub output_bucket: String,
    pub voice_id: String,
    pub engine: String,
    pub output_format: String,
    // Polling
    pub poll_interval_secs: u64,
    pub settle_delay_secs: u64,
    pub poll_timeout_secs: Option<u64>,
    // Retries
    pub retry_max_attempts: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            document_path: env::var("DOCUMENT_PATH")
                .unwrap_or_else(|_| "mobyDick.docx".to_string())
                .into(),
            local_directory: env::var("LOCAL_DIRECTORY")
                .unwrap_or_else(|_| "audios".to_string())
                .into(),
            report_path: env::var("REPORT_PATH").ok().map(PathBuf::from),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            output_bucket: env::var("OUTPUT_BUCKET").unwrap_or_else(|_| "echotales".to_string()),
            voice_id: env::var("VOICE_ID").unwrap_or_else(|_| "Danielle".to_string()),
            engine: env::var("SYNTHESIS_ENGINE").unwrap_or_else(|_| "long-form".to_string()),
            output_format: env::var("OUTPUT_FORMAT").unwrap_or_else(|_| "mp3".to_string()),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            settle_delay_secs: env::var("SETTLE_DELAY_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            poll_timeout_secs: match env::var("POLL_TIMEOUT_SECS") {
                Ok(value) => Some(value.parse()?),
                Err(_) => None,
            },
            retry_max_attempts: env::var("RETRY_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            retry_backoff_ms: env::var("RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn synthesis_settings(&self) -> SynthesisSettings {
        SynthesisSettings {
            voice_id: self.voice_id.clone(),
            engine: self.engine.clone(),
            output_format: self.output_format.clone(),
            output_bucket: self.output_bucket.clone(),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll_interval_secs),
            settle_delay: Duration::from_secs(self.settle_delay_secs),
            timeout: self.poll_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}
