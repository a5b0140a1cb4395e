use crate::domain::synthesis::AudioFormat;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Private scratch directory for one pipeline invocation.
///
/// The directory name embeds a fresh UUID, so concurrent invocations never
/// share paths. Dropping the workspace removes the directory and everything
/// in it.
pub struct Workspace {
    id: Uuid,
    dir: TempDir,
}

impl Workspace {
    /// Allocate the directory under `root` off the async runtime.
    pub async fn create(root: PathBuf) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::create_blocking(&root))
            .await
            .map_err(io::Error::other)?
    }

    fn create_blocking(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&format!("gen-{}-", id))
            .tempdir_in(root)?;

        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn avatar_path(&self) -> PathBuf {
        self.dir.path().join("avatar.mp4")
    }

    pub fn audio_path(&self, format: AudioFormat) -> PathBuf {
        self.dir.path().join(format!("audio.{}", format.extension()))
    }

    pub fn silent_video_path(&self) -> PathBuf {
        self.dir.path().join("silent.mp4")
    }

    pub fn final_video_path(&self) -> PathBuf {
        self.dir.path().join("final.mp4")
    }

    /// Remove the directory off the async runtime. Failures are logged only.
    pub async fn close(self) {
        let id = self.id;
        let removed = tokio::task::spawn_blocking(move || self.dir.close()).await;

        match removed {
            Ok(Ok(())) => tracing::debug!(workspace_id = %id, "Workspace removed"),
            Ok(Err(e)) => tracing::warn!(workspace_id = %id, error = %e, "Failed to remove workspace"),
            Err(e) => tracing::warn!(workspace_id = %id, error = %e, "Workspace cleanup task failed"),
        }
    }
}
