//! Persisting finished sessions to disk.
//!
//! Each session writes two files sharing a timestamp prefix:
//! `<YYYYmmdd_HHMMSS>_session.json` and `<YYYYmmdd_HHMMSS>_transcript.txt`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::interview::SessionSnapshot;
use crate::summary::StructuredSummary;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to create session directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free session file name for {stamp} in {}", dir.display())]
    NamesExhausted { dir: PathBuf, stamp: String },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The full persisted record for one interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: SessionSnapshot,
    pub summary: StructuredSummary,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq_markdown: Option<String>,
    pub saved_at: DateTime<Local>,
}

impl SessionRecord {
    pub fn new(session: SessionSnapshot, summary: StructuredSummary, markdown: String) -> Self {
        Self {
            session,
            summary,
            markdown,
            faq_markdown: None,
            saved_at: Local::now(),
        }
    }

    /// One `[YYYY-mm-dd HH:MM:SS] ROLE: text` line per turn.
    pub fn transcript(&self) -> String {
        self.session
            .turns
            .iter()
            .map(|t| t.transcript_line())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Paths written by [`SessionStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub session_path: PathBuf,
    pub transcript_path: PathBuf,
}

/// Writes session records into a directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the session JSON and transcript, creating the directory if needed.
    ///
    /// Existing files are never overwritten: when the timestamp prefix is
    /// taken, a numeric suffix is added (`<stamp>_1_session.json`, ...).
    pub fn save(&self, record: &SessionRecord) -> Result<SavedSession, SessionError> {
        fs::create_dir_all(&self.dir).map_err(|source| SessionError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(record)?;
        let transcript = record.transcript();
        let stamp = record.saved_at.format("%Y%m%d_%H%M%S").to_string();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let prefix = if attempt == 0 {
                stamp.clone()
            } else {
                format!("{}_{}", stamp, attempt)
            };
            let session_path = self.dir.join(format!("{}_session.json", prefix));
            let transcript_path = self.dir.join(format!("{}_transcript.txt", prefix));

            if !write_new(&session_path, json.as_bytes())? {
                continue;
            }
            if !write_new(&transcript_path, transcript.as_bytes())? {
                // Release the claimed name so the pair stays together.
                let _ = fs::remove_file(&session_path);
                continue;
            }

            tracing::info!(
                session = %session_path.display(),
                transcript = %transcript_path.display(),
                "Session saved"
            );
            return Ok(SavedSession {
                session_path,
                transcript_path,
            });
        }

        Err(SessionError::NamesExhausted {
            dir: self.dir.clone(),
            stamp,
        })
    }
}

/// Suffixes tried per timestamp before giving up.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Create `path` and write `contents`. `Ok(false)` when the file already exists.
fn write_new(path: &Path, contents: &[u8]) -> Result<bool, SessionError> {
    let write_error = |source: io::Error| SessionError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_error(e)),
    };
    file.write_all(contents).map_err(write_error)?;
    Ok(true)
}
