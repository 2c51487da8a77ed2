//! Thin wrappers around the ffmpeg / ffprobe command line tools

use std::ffi::OsStr;
use std::path::Path;
use tokio::process::Command;

use crate::errors::CompositionError;

/// How many trailing stderr lines end up in an error message
const STDERR_TAIL_LINES: usize = 8;

/// Run ffmpeg with the given arguments, failing on a non-zero exit status.
pub async fn run_ffmpeg<I, S>(program: &Path, args: I) -> Result<(), CompositionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    log::debug!(
        "Running {} {}",
        program.display(),
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| {
            CompositionError::Encode(format!("failed to start {}: {}", program.display(), e))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail = stderr_tail(&stderr, STDERR_TAIL_LINES);
        log::error!("FFmpeg failed with {}: {}", output.status, tail);
        return Err(CompositionError::Encode(format!(
            "ffmpeg exited with {}: {}",
            output.status, tail
        )));
    }

    Ok(())
}

/// Container duration in seconds as reported by ffprobe.
pub async fn probe_duration(ffprobe: &Path, media: &Path) -> std::io::Result<f64> {
    let output = Command::new(ffprobe)
        .args(["-v", "error", "-show_entries", "format=duration", "-of"])
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(media)
        .output()
        .await?;

    if !output.status.success() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("ffprobe exited with {}", output.status),
        ));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    raw.trim().parse::<f64>().map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse duration: {}", raw.trim()),
        )
    })
}

/// Quote a value for use inside an ffmpeg filter graph or concat list.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn stderr_tail(stderr: &str, lines: usize) -> String {
    let all: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join(" | ")
}
