//! On-disk output: prompt files, saved analyses and the week cursor

use crate::config::OutputConfig;
use crate::error::Result;
use crate::scheduler::calendar::{prompt_filename, WeekCursor};
use crate::types::Game;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PromptStore {
    prompt_dir: PathBuf,
    state_file: PathBuf,
}

impl PromptStore {
    pub fn new(prompt_dir: impl Into<PathBuf>, state_file: impl Into<PathBuf>) -> Self {
        Self {
            prompt_dir: prompt_dir.into(),
            state_file: state_file.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.prompt_dir_path(), config.state_file_path())
    }

    pub fn prompt_dir(&self) -> &Path {
        &self.prompt_dir
    }

    pub fn prompt_path(&self, game: &Game) -> PathBuf {
        self.prompt_dir.join(prompt_filename(game))
    }

    /// Analysis for a game lives next to its prompt
    pub fn analysis_path(&self, game: &Game) -> PathBuf {
        self.prompt_path(game).with_extension("analysis.txt")
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    pub async fn save_prompt(&self, game: &Game, prompt: &str) -> Result<PathBuf> {
        let path = self.prompt_path(game);
        self.write(&path, prompt).await?;
        Ok(path)
    }

    pub async fn save_analysis(&self, game: &Game, analysis: &str) -> Result<PathBuf> {
        let path = self.analysis_path(game);
        self.write(&path, analysis).await?;
        Ok(path)
    }

    /// Saved cursor, or `default` when there is none or it can't be read
    pub async fn load_cursor(&self, default: WeekCursor) -> WeekCursor {
        let content = match tokio::fs::read_to_string(&self.state_file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return default,
            Err(e) => {
                warn!("Could not read {}: {}", self.state_file.display(), e);
                return default;
            }
        };

        match serde_json::from_str::<WeekCursor>(&content) {
            Ok(cursor) if WeekCursor::new(cursor.week, cursor.season).is_ok() => cursor,
            Ok(cursor) => {
                warn!("Ignoring saved cursor with week {}", cursor.week);
                default
            }
            Err(e) => {
                warn!("Corrupt state file {}: {}", self.state_file.display(), e);
                default
            }
        }
    }

    pub async fn save_cursor(&self, cursor: &WeekCursor) -> Result<()> {
        let json = serde_json::to_string_pretty(cursor)?;
        self.write(&self.state_file, &json).await
    }

    /// Prompt files already written, sorted by name
    pub async fn list_prompts(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.prompt_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut prompts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name.starts_with("week") && name.ends_with(".txt") && !name.ends_with(".analysis.txt") {
                prompts.push(path);
            }
        }
        prompts.sort();
        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn game() -> Game {
        let date = NaiveDate::from_ymd_opt(2025, 9, 11)
            .unwrap()
            .and_hms_opt(20, 15, 0)
            .unwrap();
        Game::new("KC", "BUF", date).with_week(1)
    }

    fn store(dir: &Path) -> PromptStore {
        PromptStore::new(dir.join("prompts"), dir.join("state").join("cursor.json"))
    }

    #[tokio::test]
    async fn test_save_prompt_and_analysis() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let prompt_path = store.save_prompt(&game(), "prompt text").await.unwrap();
        assert!(prompt_path.ends_with("prompts/week1_BUF@KC_2025-09-11.txt"));
        assert_eq!(tokio::fs::read_to_string(&prompt_path).await.unwrap(), "prompt text");

        let analysis_path = store.save_analysis(&game(), "KC by 3").await.unwrap();
        assert!(analysis_path.ends_with("prompts/week1_BUF@KC_2025-09-11.analysis.txt"));

        let listed = store.list_prompts().await.unwrap();
        assert_eq!(listed, vec![prompt_path]);
    }

    #[tokio::test]
    async fn test_cursor_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let default = WeekCursor::new(1, 2025).unwrap();

        assert_eq!(store.load_cursor(default).await, default);

        let cursor = WeekCursor::new(7, 2025).unwrap();
        store.save_cursor(&cursor).await.unwrap();
        assert_eq!(store.load_cursor(default).await, cursor);
    }

    #[tokio::test]
    async fn test_corrupt_or_invalid_cursor_uses_default() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let default = WeekCursor::new(3, 2025).unwrap();

        tokio::fs::create_dir_all(dir.path().join("state")).await.unwrap();
        let state = dir.path().join("state").join("cursor.json");

        tokio::fs::write(&state, "not json").await.unwrap();
        assert_eq!(store.load_cursor(default).await, default);

        tokio::fs::write(&state, r#"{"week": 40, "season": 2025}"#).await.unwrap();
        assert_eq!(store.load_cursor(default).await, default);
    }

    #[tokio::test]
    async fn test_list_prompts_without_directory() {
        let dir = tempdir().unwrap();
        assert!(store(dir.path()).list_prompts().await.unwrap().is_empty());
    }
}
