use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// JSON checkpoints in `directory`, newest first by modification time.
fn list_checkpoints(directory: &str) -> Vec<(PathBuf, DateTime<Utc>)> {
    let Ok(entries) = fs::read_dir(directory) else {
        return Vec::new();
    };

    let mut checkpoints: Vec<(PathBuf, DateTime<Utc>)> = entries
        .flatten()
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), modified.into()))
        })
        .collect();

    checkpoints.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    checkpoints
}

pub fn find_latest_checkpoint(directory: &str) -> Option<PathBuf> {
    list_checkpoints(directory).into_iter().next().map(|(path, _)| path)
}

/// Timestamped file name with millisecond resolution so checkpoints written
/// in quick succession do not collide.
pub fn create_checkpoint_path(directory: &str) -> PathBuf {
    let now: DateTime<Utc> = Utc::now();
    let filename = format!("checkpoint_{}.json", now.format("%Y-%m-%d_%H-%M-%S%.3f"));

    Path::new(directory).join(filename)
}

pub fn cleanup_old_checkpoints(directory: &str, keep_last_n: usize) -> Result<()> {
    for (path, _) in list_checkpoints(directory).iter().skip(keep_last_n) {
        log::info!("Deleting old checkpoint: {:?}", path);
        fs::remove_file(path)?;
    }
    Ok(())
}
