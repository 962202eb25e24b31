//! Best-effort persistence of session state across runs.
//!
//! One JSON record per state directory, loaded once at startup and written
//! once at shutdown. The session must come up even when the record is
//! missing or damaged, so `load` falls back to defaults and `save` swallows
//! failures; both log at warn level instead of surfacing errors.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

const SESSION_FILE: &str = "session.json";

/// Persisted history is capped at the most recent entries.
const HISTORY_PERSIST_MAX: usize = 50;

/// Resolves the state directory: `$VIRIDIAN_HOME` when set, otherwise
/// `~/.viridian`. Does not create it.
pub fn find_state_home() -> std::io::Result<PathBuf> {
    if let Ok(val) = std::env::var("VIRIDIAN_HOME") {
        if !val.is_empty() {
            return PathBuf::from(val).canonicalize();
        }
    }

    let mut p = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "could not find home directory")
    })?;
    p.push(".viridian");
    Ok(p)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session state I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session state is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Display font carried for frontends that honor it. The terminal frontend
/// ignores it but round-trips it untouched.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "DejaVu Sans Mono".to_string(),
            size: 11,
        }
    }
}

/// On-disk session record.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
    #[serde(default)]
    pub history: Vec<String>,
}

/// Reads and writes the session record under one state directory.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state comes back as defaults.
    pub fn load(&self) -> SessionRecord {
        match self.try_load() {
            Ok(record) => record,
            Err(StoreError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                SessionRecord::default()
            }
            Err(err) => {
                tracing::warn!("failed to load session state: {err}");
                SessionRecord::default()
            }
        }
    }

    fn try_load(&self) -> Result<SessionRecord, StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Best-effort write; failures are logged and swallowed.
    pub fn save(&self, record: &SessionRecord) {
        if let Err(err) = self.try_save(record) {
            tracing::warn!("failed to save session state: {err}");
        }
    }

    fn try_save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let mut record = record.clone();
        let len = record.history.len();
        if len > HISTORY_PERSIST_MAX {
            record.history.drain(..len - HISTORY_PERSIST_MAX);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&record)?;
        write_owner_only(&self.path, json.as_bytes())?;
        Ok(())
    }
}

/// The record carries command history, so keep it out of other users' reach.
#[cfg(unix)]
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(0o600);
    let mut file = options.open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}
