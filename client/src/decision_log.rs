use std::path::PathBuf;

use anyhow::{Context, Result};
use rotom_battle::Decision;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Per-battle decision records, `<dir>/<iteration>.txt`
///
/// The iteration starts at the number of files already in the directory and
/// advances once per finished battle, so earlier runs are never overwritten.
#[derive(Debug)]
pub struct DecisionLog {
    dir: PathBuf,
    iteration: u32,
}

impl DecisionLog {
    /// Open (creating if needed) a log directory
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create decision log directory {}", dir.display()))?;

        let mut iteration = 0;
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to list {}", dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                iteration += 1;
            }
        }

        tracing::debug!(dir = %dir.display(), iteration, "Opened decision log");
        Ok(Self { dir, iteration })
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// File of the battle in progress
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.txt", self.iteration))
    }

    /// Append one decision to the current battle's file
    pub async fn append(&self, decision: &Decision) -> Result<()> {
        let path = self.current_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;

        file.write_all(decision.to_record().as_bytes())
            .await
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        file.flush().await?;
        Ok(())
    }

    /// Decisions recorded so far for the current battle
    pub async fn read_current(&self) -> Result<Vec<Decision>> {
        let path = self.current_path();
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        rotom_protocol::parse_records(&text)
            .with_context(|| format!("Malformed decision log {}", path.display()))
    }

    /// Close out the current battle, returning the next iteration
    pub fn finish_battle(&mut self) -> u32 {
        self.iteration += 1;
        self.iteration
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rotom_battle::Action;

    use super::*;

    /// Fresh, empty directory under the system temp dir
    pub(crate) async fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rotom-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir).await;
        dir
    }

    #[tokio::test]
    async fn test_iteration_counts_existing_files() {
        let dir = scratch_dir("count").await;
        fs::create_dir_all(dir.join("nested")).await.unwrap();
        fs::write(dir.join("0.txt"), "").await.unwrap();
        fs::write(dir.join("1.txt"), "").await.unwrap();

        let mut log = DecisionLog::open(&dir).await.unwrap();
        assert_eq!(log.iteration(), 2);
        assert_eq!(log.current_path(), dir.join("2.txt"));
        assert_eq!(log.finish_battle(), 3);

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_append_round_trip() {
        let dir = scratch_dir("append").await;
        let log = DecisionLog::open(&dir).await.unwrap();
        assert_eq!(log.iteration(), 0);
        assert!(log.read_current().await.unwrap().is_empty());

        let decisions = vec![
            Decision::new(Action::Switch2, false, "Dondozo walls Great Tusk"),
            Decision::new(Action::Move1, true, "Tera Fairy\nthen attack"),
        ];
        for decision in &decisions {
            log.append(decision).await.unwrap();
        }

        assert_eq!(log.read_current().await.unwrap(), decisions);
        let text = fs::read_to_string(log.current_path()).await.unwrap();
        assert!(text.starts_with("Action: Switch 2\nTerastallize: false\nReason: Dondozo"));

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
