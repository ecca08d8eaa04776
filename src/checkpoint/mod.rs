pub mod storage;

use crate::config::CheckpointConfig;
use crate::error::Result;
use crate::simulation::SimulationState;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the full state as pretty JSON, then prune old checkpoints.
pub fn save_checkpoint(state: &SimulationState, config: &CheckpointConfig) -> Result<PathBuf> {
    let dir = Path::new(&config.directory);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let checkpoint_path = storage::create_checkpoint_path(&config.directory);
    let json = serde_json::to_string_pretty(state)?;
    fs::write(&checkpoint_path, json)?;

    storage::cleanup_old_checkpoints(&config.directory, config.keep_last_n)?;

    Ok(checkpoint_path)
}

/// Newest checkpoint, if any. A file that fails to parse is moved aside to a
/// `.backup.<timestamp>` name and `None` is returned so the run starts fresh.
pub fn load_checkpoint(config: &CheckpointConfig) -> Result<Option<SimulationState>> {
    let Some(checkpoint_path) = storage::find_latest_checkpoint(&config.directory) else {
        log::info!("No checkpoint found");
        return Ok(None);
    };
    log::info!("Loading checkpoint from: {:?}", checkpoint_path);

    let content = match fs::read_to_string(&checkpoint_path) {
        Ok(content) => content,
        Err(e) => {
            log::error!("Failed to read checkpoint file: {}", e);
            return Ok(None);
        }
    };

    match serde_json::from_str::<SimulationState>(&content) {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            log::error!("Failed to parse checkpoint file: {}. Creating backup and starting fresh.", e);

            let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
            let backup_path = format!("{}.backup.{}", checkpoint_path.display(), timestamp);

            match fs::rename(&checkpoint_path, &backup_path) {
                Ok(()) => log::info!("Backed up old checkpoint to: {}", backup_path),
                Err(rename_err) => log::error!("Failed to backup old checkpoint: {}", rename_err),
            }
            Ok(None)
        }
    }
}
