use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, FALLBACK_SESSION_DIR, SESSION_FILE_EXT};
use crate::error::AppError;
use crate::utils::debug_enabled;

use super::types::{Session, Turn};

/// Listing row for one stored session
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    pub(crate) session_id: String,
    pub(crate) turns: usize,
    pub(crate) first_timestamp: String,
    pub(crate) last_timestamp: String,
}

/// Session ids double as file names, so only a safe alphabet is accepted.
pub(crate) fn validate_session_id(id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidSessionId {
            input: id.to_string(),
        })
    }
}

/// One JSON file per session id. No locking: concurrent writers to the same
/// id race and the last full overwrite wins.
#[derive(Debug, Clone)]
pub(crate) struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) fn default_dir() -> PathBuf {
        match dirs::data_dir() {
            Some(data) => data.join(APP_NAME).join("sessions"),
            None => PathBuf::from(FALLBACK_SESSION_DIR),
        }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.{SESSION_FILE_EXT}"))
    }

    pub(crate) fn exists(&self, session_id: &str) -> bool {
        self.path_for(session_id).is_file()
    }

    /// Load a session. Missing, unreadable or corrupt files yield an empty
    /// history.
    pub(crate) fn load(&self, session_id: &str) -> Session {
        let path = self.path_for(session_id);
        match read_session(&path) {
            Ok(session) => session,
            Err(err) => {
                if debug_enabled() {
                    eprintln!("Starting empty history for {}: {}", path.display(), err);
                }
                Session::default()
            }
        }
    }

    /// Overwrite the session file with the full history.
    pub(crate) fn save(&self, session_id: &str, session: &Session) -> Result<(), AppError> {
        let path = self.path_for(session_id);
        let write_err = |source| AppError::SessionWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let file = File::create(&path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, session)?;
        writer.flush().map_err(write_err)?;
        Ok(())
    }

    /// Summaries of every parseable session file in the directory.
    pub(crate) fn list(&self) -> Vec<SessionSummary> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            SESSION_FILE_EXT
        );
        let files: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(entries) => entries.flatten().collect(),
            Err(err) => {
                if debug_enabled() {
                    eprintln!("Invalid session glob {pattern}: {err}");
                }
                return Vec::new();
            }
        };

        files
            .par_iter()
            .filter_map(|path| {
                let session_id = path.file_stem()?.to_str()?.to_string();
                let session = match read_session(path) {
                    Ok(session) => session,
                    Err(err) => {
                        if debug_enabled() {
                            eprintln!("Skipping {}: {}", path.display(), err);
                        }
                        return None;
                    }
                };
                Some(summarize(session_id, &session))
            })
            .collect()
    }
}

fn read_session(path: &Path) -> Result<Session, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| e.to_string())
}

fn summarize(session_id: String, session: &Session) -> SessionSummary {
    let timestamp = |turn: Option<&Turn>| turn.map(|t| t.timestamp.clone()).unwrap_or_default();
    SessionSummary {
        session_id,
        turns: session.len(),
        first_timestamp: timestamp(session.history.first()),
        last_timestamp: timestamp(session.history.last()),
    }
}
