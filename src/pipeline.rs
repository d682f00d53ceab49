//! Generation Pipeline - Single Entry Point
//!
//! One run: embed the logo once, then resolve, encode and write every
//! contact in provider order. The first provider or write error aborts the
//! run; files written before it are left in place.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::assets::{embed_file, InlineAsset};
use crate::config::{ConfigError, GeneratorConfig};
use crate::contact::{ContactRecord, OrganizationInfo};
use crate::encoder::{CardEncoder, EncodedCard};
use crate::filename::derive_filename;
use crate::hashing::card_fingerprint;
use crate::source::{DataProvider, SourceError};
use crate::writer::{CardWriter, WriteError};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenCard {
    pub name: String,
    pub filename: String,
    pub path: PathBuf,
    pub fingerprint: String,
    pub photo_embedded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generator_version: String,
    pub output_dir: PathBuf,
    pub logo_embedded: bool,
    pub cards: Vec<WrittenCard>,
}

/// The generation pipeline
pub struct CardPipeline {
    config: GeneratorConfig,
    encoder: CardEncoder,
    organization: OrganizationInfo,
}

impl CardPipeline {
    pub fn new(config: GeneratorConfig) -> Self {
        let encoder = CardEncoder::new(config.escape);
        let organization = config.organization();
        Self {
            config,
            encoder,
            organization,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn organization(&self) -> &OrganizationInfo {
        &self.organization
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir()
    }

    /// Embed the organization logo. Called once per run.
    pub fn load_logo(&self) -> Option<InlineAsset> {
        embed_file(self.organization.logo()).into_asset()
    }

    /// Encode one contact, reading its photo if it has one.
    pub fn encode_contact(&self, contact: &ContactRecord, logo: Option<&InlineAsset>) -> (EncodedCard, bool) {
        let photo_path = contact.photo().map(|p| self.config.resolve_path(p));
        let photo = embed_file(photo_path.as_deref());

        let card = self
            .encoder
            .encode(contact, Some(&self.organization), logo, photo.asset());
        (card, photo.is_embedded())
    }

    /// Run the configured query against `provider`, then generate.
    pub fn run_with<P, N, I, G, R>(
        &self,
        provider: &P,
        get_nodes: G,
        resolve: R,
    ) -> Result<RunReport, PipelineError>
    where
        P: DataProvider,
        G: FnOnce(P::Output) -> Result<I, SourceError>,
        I: IntoIterator<Item = N>,
        R: FnMut(N) -> Result<ContactRecord, SourceError>,
    {
        self.config.options.validate()?;
        let data = provider.query(&self.config.options.query)?;
        self.run(data, get_nodes, resolve)
    }

    /// Generate one card per node in `data`.
    pub fn run<Q, N, I, G, R>(&self, data: Q, get_nodes: G, mut resolve: R) -> Result<RunReport, PipelineError>
    where
        G: FnOnce(Q) -> Result<I, SourceError>,
        I: IntoIterator<Item = N>,
        R: FnMut(N) -> Result<ContactRecord, SourceError>,
    {
        let output_dir = self.output_dir();
        tracing::info!(output_dir = %output_dir.display(), "generating vCards");

        let logo = self.load_logo();
        let nodes = get_nodes(data)?;
        let mut writer = CardWriter::new(&output_dir, self.config.collisions);
        let mut cards = vec![];

        for node in nodes {
            let contact = resolve(node)?;
            let (card, photo_embedded) = self.encode_contact(&contact, logo.as_ref());
            let filename = derive_filename(&contact.first_name, &contact.last_name);
            let path = writer.write(&filename, &card)?;

            tracing::info!(name = %contact.display_name(), path = %path.display(), "wrote vCard");

            cards.push(WrittenCard {
                name: contact.display_name(),
                filename,
                path,
                fingerprint: card_fingerprint(&card),
                photo_embedded,
            });
        }

        tracing::info!(count = cards.len(), "vCard generation complete");

        Ok(RunReport {
            generator_version: ENGINE_VERSION.to_string(),
            output_dir,
            logo_embedded: logo.is_some(),
            cards,
        })
    }
}
