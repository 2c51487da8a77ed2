use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use slidecast::models::{AnalysisRequest, VideoGenerationRequest};
use slidecast::utils::logger::init_logger;
use slidecast::{AppConfig, ChannelRegistry, Pipeline, ProgressRegistry};

const CLIENT_ID: &str = "cli";

#[derive(Parser)]
#[command(name = "slidecast", version, about = "Narrated videos from slide decks")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a narrated video from a deck
    Generate {
        #[arg(long)]
        slides: PathBuf,
        /// JSON file with generation settings
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Summarize a video with the local model
    Analyze {
        #[arg(long)]
        video: PathBuf,
        /// JSON file with analysis settings
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Report model and tool availability
    Health,
}

fn read_settings<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid settings in {}", path.display()))
        }
        None => Ok(T::default()),
    }
}

fn encode_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let registry = Arc::new(ChannelRegistry::new());
    let pipeline = Pipeline::from_config(&config, registry.clone())?;

    if !matches!(cli.command, Command::Health) && !pipeline.check_connection().await {
        warn!("Ollama is not reachable at {}", config.ollama_url);
    }

    let mut progress = registry.register(CLIENT_ID);
    let printer = tokio::spawn(async move {
        while let Some(message) = progress.recv().await {
            eprintln!("[{:>3}%] {}", message.progress, message.stage);
        }
    });

    let output = match cli.command {
        Command::Generate { slides, settings } => {
            let request = VideoGenerationRequest {
                slide_data: encode_file(&slides)?,
                file_name: file_name(&slides),
                settings: read_settings(settings.as_deref())?,
            };
            let response = pipeline.generate_video(&request, CLIENT_ID).await?;
            info!("Video written to {}", config.output_dir.display());
            serde_json::to_string_pretty(&response)?
        }
        Command::Analyze { video, settings } => {
            let request = AnalysisRequest {
                video_base64: encode_file(&video)?,
                settings: read_settings(settings.as_deref())?,
            };
            let response = pipeline.analyze_video(&request, CLIENT_ID).await?;
            serde_json::to_string_pretty(&response)?
        }
        Command::Health => serde_json::to_string_pretty(&pipeline.health(&config).await)?,
    };

    registry.deregister(CLIENT_ID);
    let _ = printer.await;
    println!("{}", output);
    Ok(())
}
