use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use log::warn;

const LAST_MAZE_FILE: &str = "last_maze.json";

/// Durable maze snapshots: one timestamped history entry per generated maze
/// plus a rolling `last_maze.json` that new connections are served from.
/// IO failures are logged and swallowed; the game keeps running without
/// history.
pub struct MazeStore {
    history_dir: PathBuf,
}

impl MazeStore {
    pub fn new(history_dir: PathBuf) -> Self {
        Self { history_dir }
    }

    pub fn save_snapshot(&self, rows: &[String]) {
        if let Err(error) = fs::create_dir_all(&self.history_dir) {
            warn!(
                "failed to create history dir {}: {error}",
                self.history_dir.display()
            );
            return;
        }

        let payload = match serde_json::to_string_pretty(rows) {
            Ok(text) => text,
            Err(error) => {
                warn!("failed to serialize maze snapshot: {error}");
                return;
            }
        };

        let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let history_path = self.history_dir.join(format!("maze_{stamp}.json"));
        if let Err(error) = fs::write(&history_path, &payload) {
            warn!("failed to write {}: {error}", history_path.display());
        }

        let last_path = self.history_dir.join(LAST_MAZE_FILE);
        if let Err(error) = fs::write(&last_path, &payload) {
            warn!("failed to write {}: {error}", last_path.display());
        }
    }

    pub fn load_last(&self) -> Option<Vec<String>> {
        let path = self.history_dir.join(LAST_MAZE_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(value) => value,
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to read {}: {error}", path.display());
                }
                return None;
            }
        };
        match serde_json::from_str::<Vec<String>>(&text) {
            Ok(rows) => Some(rows),
            Err(error) => {
                warn!("failed to parse {}: {error}", path.display());
                None
            }
        }
    }
}
