use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

static FFMPEG_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"version n?(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

// Structure to represent an external tool
#[derive(Debug, Clone)]
pub struct ExternalTool {
    pub name: String,
    pub path: Option<PathBuf>,
    pub version: Option<Version>,
    pub min_version: Option<Version>,
}

/// Availability of an external tool, as shown in the health report
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub meets_minimum: bool,
}

impl ExternalTool {
    pub fn status(&self) -> ToolStatus {
        let meets_minimum = match (&self.version, &self.min_version) {
            (Some(version), Some(min)) => version >= min,
            (_, None) => self.path.is_some(),
            (None, Some(_)) => false,
        };
        ToolStatus {
            name: self.name.clone(),
            available: self.path.is_some(),
            path: self.path.as_ref().map(|p| p.display().to_string()),
            version: self.version.as_ref().map(Version::to_string),
            meets_minimum,
        }
    }
}

/// Check if a command is available in PATH (or is an existing path itself)
pub fn check_command_in_path(command: &Path) -> Result<PathBuf> {
    which::which(command).with_context(|| format!("{} not found in PATH", command.display()))
}

/// Parse the version out of `ffmpeg -version` / `ffprobe -version` output
pub fn parse_ffmpeg_version(output: &str) -> Option<Version> {
    let caps = FFMPEG_VERSION_RE.captures(output)?;
    let part = |i: usize| {
        caps.get(i)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Check ffmpeg version
fn check_ffmpeg_version(path: &Path) -> Result<Version> {
    let output = Command::new(path)
        .args(["-version"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to execute {}", path.display()))?;

    if !output.status.success() {
        return Err(anyhow!("{} -version exited with {}", path.display(), output.status));
    }

    let version_str = String::from_utf8_lossy(&output.stdout);
    parse_ffmpeg_version(&version_str).ok_or_else(|| {
        debug!("Could not parse version from: {}", version_str.lines().next().unwrap_or(""));
        anyhow!("Unrecognized version output from {}", path.display())
    })
}

/// Locate ffmpeg, ffprobe and espeak
pub fn probe_tools(ffmpeg: &Path, ffprobe: &Path, espeak: &Path) -> Vec<ExternalTool> {
    let min_ffmpeg = Version::new(4, 0, 0);
    let mut tools = Vec::new();

    for (name, program) in [("ffmpeg", ffmpeg), ("ffprobe", ffprobe)] {
        let path = check_command_in_path(program).ok();
        let version = path.as_deref().and_then(|p| check_ffmpeg_version(p).ok());
        if let (Some(p), Some(v)) = (&path, &version) {
            info!("Found {} {} at {}", name, v, p.display());
        }
        tools.push(ExternalTool {
            name: name.to_string(),
            path,
            version,
            min_version: Some(min_ffmpeg.clone()),
        });
    }

    // espeak prints no parseable semver; presence is enough
    tools.push(ExternalTool {
        name: "espeak".to_string(),
        path: check_command_in_path(espeak).ok(),
        version: None,
        min_version: None,
    });

    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ffmpeg_version() {
        let out = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers";
        assert_eq!(parse_ffmpeg_version(out), Some(Version::new(6, 1, 1)));

        let out = "ffprobe version n7.0 Copyright (c) 2007-2024";
        assert_eq!(parse_ffmpeg_version(out), Some(Version::new(7, 0, 0)));

        assert_eq!(parse_ffmpeg_version("ffmpeg version N-113000-gdeadbeef"), None);
    }

    #[test]
    fn test_tool_status() {
        let tool = ExternalTool {
            name: "ffmpeg".into(),
            path: Some(PathBuf::from("/usr/bin/ffmpeg")),
            version: Some(Version::new(3, 4, 0)),
            min_version: Some(Version::new(4, 0, 0)),
        };
        let status = tool.status();
        assert!(status.available);
        assert!(!status.meets_minimum);
        assert_eq!(status.version.as_deref(), Some("3.4.0"));

        let missing = ExternalTool {
            name: "espeak".into(),
            path: None,
            version: None,
            min_version: None,
        };
        assert!(!missing.status().available);
        assert!(!missing.status().meets_minimum);
    }
}
