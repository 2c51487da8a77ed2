//! Output artifacts and their download locators
//!
//! Final audio and video files live under `{root}/audio` and `{root}/videos`
//! and are addressed as `/download/{audio|videos}/{file}`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::utils::common::is_safe_file_name;
use crate::utils::ids::IdGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Audio,
    Video,
}

impl ArtifactKind {
    /// Directory below the output root, also the URL segment
    pub fn directory(self) -> &'static str {
        match self {
            ArtifactKind::Audio => "audio",
            ArtifactKind::Video => "videos",
        }
    }

    fn file_name(self, id: &str) -> String {
        match self {
            ArtifactKind::Audio => format!("audio_{}.wav", id),
            ArtifactKind::Video => format!("video_{}.mp4", id),
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "audio" => Some(ArtifactKind::Audio),
            "videos" => Some(ArtifactKind::Video),
            _ => None,
        }
    }
}

/// A reserved output location; the file may not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub file_name: String,
}

impl Artifact {
    pub fn url(&self) -> String {
        format!("/download/{}/{}", self.kind.directory(), self.file_name)
    }

    /// Delete the file if it was (partially) written.
    pub fn discard(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed partial artifact {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    ids: Arc<dyn IdGenerator>,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            root: root.into(),
            ids,
        }
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        for kind in [ArtifactKind::Audio, ArtifactKind::Video] {
            std::fs::create_dir_all(self.root.join(kind.directory()))?;
        }
        Ok(())
    }

    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    pub fn reserve(&self, kind: ArtifactKind, id: &str) -> Artifact {
        let file_name = kind.file_name(id);
        Artifact {
            kind,
            path: self.root.join(kind.directory()).join(&file_name),
            file_name,
        }
    }

    /// Resolve a download request back to an existing file.
    pub fn locate(&self, segment: &str, file_name: &str) -> Option<PathBuf> {
        let kind = ArtifactKind::from_segment(segment)?;
        if !is_safe_file_name(file_name) {
            log::warn!("Rejected download path {}/{}", segment, file_name);
            return None;
        }
        let path = self.root.join(kind.directory()).join(file_name);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ids::SequentialIds;
    use std::path::Path;

    fn store(root: &Path) -> ArtifactStore {
        ArtifactStore::new(root, Arc::new(SequentialIds::new()))
    }

    #[test]
    fn test_reserve_names_and_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let id = store.next_id();

        let audio = store.reserve(ArtifactKind::Audio, &id);
        let video = store.reserve(ArtifactKind::Video, &id);

        assert_eq!(audio.path, dir.path().join("audio/audio_1.wav"));
        assert_eq!(audio.url(), "/download/audio/audio_1.wav");
        assert_eq!(video.path, dir.path().join("videos/video_1.mp4"));
        assert_eq!(video.url(), "/download/videos/video_1.mp4");
    }

    #[test]
    fn test_locate() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().unwrap();
        let video = store.reserve(ArtifactKind::Video, "abc");
        std::fs::write(&video.path, b"mp4").unwrap();

        assert_eq!(store.locate("videos", "video_abc.mp4"), Some(video.path.clone()));
        assert_eq!(store.locate("videos", "video_missing.mp4"), None);
        assert_eq!(store.locate("secrets", "video_abc.mp4"), None);
        assert_eq!(store.locate("videos", "../videos/video_abc.mp4"), None);
    }

    #[test]
    fn test_discard() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.ensure_dirs().unwrap();
        let audio = store.reserve(ArtifactKind::Audio, "x");
        std::fs::write(&audio.path, b"partial").unwrap();

        audio.discard();
        assert!(!audio.path.exists());
        // discarding twice is harmless
        audio.discard();
    }
}
