//! Publish targets and the local directory publisher.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::traits::Publisher;

/// Where a rendered list is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    /// Identifier of the list, also used for dry-run file names.
    pub list_id: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path of the file inside the repository.
    pub path: String,
    /// Commit message.
    pub message: String,
}

/// Writes each list to `{dir}/{list_id}.md` instead of committing it.
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    dir: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the file a list would be written to.
    pub fn output_path(&self, list_id: &str) -> io::Result<PathBuf> {
        let file_name = format!("{list_id}.md");
        if list_id.is_empty() || Path::new(&file_name).file_name() != Some(OsStr::new(&file_name)) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("list id '{list_id}' is not a valid file name"),
            ));
        }
        Ok(self.dir.join(file_name))
    }
}

impl Publisher for DirectoryPublisher {
    type Error = io::Error;

    async fn publish(&self, target: &PublishTarget, content: &[u8]) -> Result<(), Self::Error> {
        let path = self.output_path(&target.list_id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, content)?;
        info!(list = %target.list_id, "Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn target(list_id: &str) -> PublishTarget {
        PublishTarget {
            list_id: list_id.to_string(),
            owner: "me".to_string(),
            repo: format!("{list_id}-with-stars"),
            branch: "main".to_string(),
            path: "README.md".to_string(),
            message: format!("chore: update {list_id} stars"),
        }
    }

    #[tokio::test]
    async fn test_writes_file_per_list() {
        let temp = tempdir().unwrap();
        let publisher = DirectoryPublisher::new(temp.path().join("out"));

        publisher
            .publish(&target("awesome-go"), b"# Awesome\n")
            .await
            .unwrap();

        let written = fs::read_to_string(temp.path().join("out/awesome-go.md")).unwrap();
        assert_eq!(written, "# Awesome\n");
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let temp = tempdir().unwrap();
        let publisher = DirectoryPublisher::new(temp.path());

        for id in ["../escape", "a/b", ""] {
            let err = publisher.publish(&target(id), b"x").await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }
    }
}
