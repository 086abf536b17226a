use crate::api::PlantenApi;
use crate::error::{PlantenError, Result};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATA_DIR_ENV: &str = "PLANTEN_DATA_DIR";

pub struct PlantenContext {
    pub api: PlantenApi<FileStore>,
    pub data_dir: PathBuf,
}

/// Picks the data directory: explicit flag, then the environment, then the
/// platform data dir.
pub fn resolve_data_dir(flag: Option<&Path>, env: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let dirs = ProjectDirs::from("nl", "planten", "planten")
        .ok_or_else(|| PlantenError::Store("Could not determine data dir".into()))?;
    Ok(dirs.data_dir().to_path_buf())
}

pub fn initialize(data_dir: Option<&Path>) -> Result<PlantenContext> {
    let data_dir = resolve_data_dir(data_dir, std::env::var_os(DATA_DIR_ENV))?;
    debug!(dir = %data_dir.display(), "opening catalog");

    let api = PlantenApi::open(FileStore::new(data_dir.clone()))?;
    Ok(PlantenContext { api, data_dir })
}
