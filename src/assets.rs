//! Asset Embedding - Inline Base64 Blocks
//!
//! A missing or unreadable asset never fails a run. It degrades to "no asset".

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// An image ready to be inlined into a card property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineAsset {
    pub type_tag: String,
    pub payload: String,
}

impl InlineAsset {
    pub fn new(type_tag: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            payload: payload.into(),
        }
    }

    /// Encode raw bytes, tagging them from the source path's extension.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Self {
        Self {
            type_tag: type_tag_for(path),
            payload: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes),
        }
    }

    /// Property parameters and value, e.g. `TYPE=PNG:iVBORw0...`
    pub fn property_value(&self) -> String {
        format!("TYPE={}:{}", self.type_tag, self.payload)
    }
}

/// Result of trying to embed a single asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedOutcome {
    NoPath,
    Unreadable { path: PathBuf, reason: String },
    Empty { path: PathBuf },
    Embedded(InlineAsset),
}

impl EmbedOutcome {
    pub fn is_embedded(&self) -> bool {
        matches!(self, EmbedOutcome::Embedded(_))
    }

    pub fn asset(&self) -> Option<&InlineAsset> {
        match self {
            EmbedOutcome::Embedded(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn into_asset(self) -> Option<InlineAsset> {
        match self {
            EmbedOutcome::Embedded(asset) => Some(asset),
            _ => None,
        }
    }
}

/// Uppercased extension, with `JPG` normalized to `JPEG`.
pub fn type_tag_for(path: &Path) -> String {
    let tag = path
        .extension()
        .map(|e| e.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    if tag == "JPG" {
        "JPEG".to_string()
    } else {
        tag
    }
}

/// Load and encode the file at `path`, reporting why nothing was embedded.
pub fn embed_file(path: Option<&Path>) -> EmbedOutcome {
    let Some(path) = path else {
        return EmbedOutcome::NoPath;
    };

    let outcome = match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => EmbedOutcome::Empty {
            path: path.to_path_buf(),
        },
        Ok(bytes) => EmbedOutcome::Embedded(InlineAsset::from_bytes(path, &bytes)),
        Err(e) => EmbedOutcome::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    };

    match &outcome {
        EmbedOutcome::Embedded(asset) => {
            tracing::debug!(
                path = %path.display(),
                type_tag = %asset.type_tag,
                encoded_len = asset.payload.len(),
                "embedded asset"
            );
        }
        EmbedOutcome::Unreadable { reason, .. } => {
            tracing::warn!(path = %path.display(), %reason, "asset unreadable, skipping");
        }
        EmbedOutcome::Empty { .. } => {
            tracing::warn!(path = %path.display(), "asset is empty, skipping");
        }
        EmbedOutcome::NoPath => {}
    }

    outcome
}

/// Embed an asset, collapsing every failure to `None`.
pub fn embed(path: Option<&Path>) -> Option<InlineAsset> {
    embed_file(path).into_asset()
}
