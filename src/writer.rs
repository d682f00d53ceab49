//! Card Writer - one `.vcf` file per contact
//!
//! Files are always truncated and rewritten. Nothing already written is
//! cleaned up when a later write fails.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::encoder::EncodedCard;

pub const VCARD_EXTENSION: &str = "vcf";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Filename collision: {} was already written in this run", .0.display())]
    Collision(PathBuf),
}

/// What to do when two contacts derive the same filename in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Last write wins
    #[default]
    Overwrite,
    /// Fail the write that would replace an earlier card
    Reject,
}

/// Write `card` to `<output_dir>/<filename>.vcf`, creating the directory.
pub fn write_card(output_dir: &Path, filename: &str, card: &EncodedCard) -> Result<PathBuf, WriteError> {
    fs::create_dir_all(output_dir).map_err(|source| WriteError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = card_path(output_dir, filename);
    fs::write(&path, card.to_vcf()).map_err(|source| WriteError::WriteFile {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

pub fn card_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", filename, VCARD_EXTENSION))
}

/// Run-scoped writer that remembers which filenames it produced.
pub struct CardWriter {
    output_dir: PathBuf,
    policy: CollisionPolicy,
    written: HashSet<String>,
}

impl CardWriter {
    pub fn new(output_dir: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            output_dir: output_dir.into(),
            policy,
            written: HashSet::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    pub fn write(&mut self, filename: &str, card: &EncodedCard) -> Result<PathBuf, WriteError> {
        if self.written.contains(filename) {
            let path = card_path(&self.output_dir, filename);
            match self.policy {
                CollisionPolicy::Reject => return Err(WriteError::Collision(path)),
                CollisionPolicy::Overwrite => {
                    tracing::warn!(path = %path.display(), "filename collision, overwriting earlier card");
                }
            }
        }

        let path = write_card(&self.output_dir, filename, card)?;
        self.written.insert(filename.to_string());
        tracing::debug!(path = %path.display(), "wrote card");

        Ok(path)
    }
}
