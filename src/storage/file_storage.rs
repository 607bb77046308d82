use crate::{error::Result, storage::Storage};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;

/// File-based storage: one JSON file per board
pub struct FileStorage {
    root_path: PathBuf,
    board: String,
}

impl FileStorage {
    const TASKBOARD_DIR: &'static str = ".taskboard";

    /// Creates a new FileStorage for `board` under the given project root
    pub fn new(project_root: impl AsRef<Path>, board: impl Into<String>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::TASKBOARD_DIR),
            board: board.into(),
        }
    }

    pub fn snapshot_file(&self) -> PathBuf {
        self.root_path.join(format!("{}.json", self.board))
    }

    fn temp_file(&self) -> PathBuf {
        self.root_path.join(format!("{}.json.tmp", self.board))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Interrupted writes\n*.tmp\n").await?;
        }

        Ok(())
    }

    async fn read_snapshot(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.snapshot_file()).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_snapshot(&self, snapshot: &str) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Rename is atomic on the same filesystem, so readers never see a
        // half-written snapshot.
        let temp_path = self.temp_file();
        fs::write(&temp_path, snapshot).await?;
        fs::rename(&temp_path, self.snapshot_file()).await?;

        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}
