use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::AppConfig;
use crate::services::inference::TextGenerator;
use crate::utils::tools::{probe_tools, ToolStatus};

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub ollama_connected: bool,
    pub models: Vec<String>,
    pub tools: Vec<ToolStatus>,
    /// RFC 3339, UTC
    pub timestamp: String,
}

pub async fn health(generator: &dyn TextGenerator, config: &AppConfig) -> HealthReport {
    let ollama_connected = generator.check_connection().await;
    let models = if ollama_connected {
        generator.list_models().await.unwrap_or_else(|e| {
            log::warn!("Could not list models: {}", e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let (ffmpeg, ffprobe, espeak) = (
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.espeak_path.clone(),
    );
    let tools: Vec<ToolStatus> = tokio::task::spawn_blocking(move || probe_tools(&ffmpeg, &ffprobe, &espeak))
        .await
        .map(|tools| tools.iter().map(|t| t.status()).collect())
        .unwrap_or_else(|e| {
            log::error!("Tool probe panicked: {}", e);
            Vec::new()
        });

    HealthReport {
        status: "healthy".to_string(),
        ollama_connected,
        models,
        tools,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::script::tests::FakeGenerator;
    use std::path::PathBuf;

    fn offline_tools_config() -> AppConfig {
        AppConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe_path: PathBuf::from("/nonexistent/ffprobe"),
            espeak_path: PathBuf::from("/nonexistent/espeak"),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_health_connected() {
        let fake = FakeGenerator::new(&["mistral", "llama3.1:instruct"], "");
        let report = health(&fake, &offline_tools_config()).await;

        assert_eq!(report.status, "healthy");
        assert!(report.ollama_connected);
        assert_eq!(report.models, vec!["llama3.1:instruct", "mistral"]);
        assert_eq!(report.tools.len(), 3);
        assert!(report.tools.iter().all(|t| !t.available));
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_health_disconnected_is_still_healthy() {
        let fake = FakeGenerator::new(&[], "");
        let report = health(&fake, &offline_tools_config()).await;

        assert_eq!(report.status, "healthy");
        assert!(!report.ollama_connected);
        assert!(report.models.is_empty());
    }
}
