//! vcardgen Core - Contact Records to vCard 3.0
//!
//! # Guarantees
//! 1. Every card starts with BEGIN, ends with END, REV sits right before END
//! 2. Line order is fixed, whatever order the record's fields come in
//! 3. A missing or unreadable image never fails a run
//! 4. One file per contact, overwritten on every run

pub mod assets;
pub mod config;
pub mod contact;
pub mod encoder;
pub mod filename;
pub mod hashing;
pub mod pipeline;
pub mod source;
pub mod writer;

pub use assets::{embed, embed_file, EmbedOutcome, InlineAsset};
pub use config::{ConfigError, GeneratorConfig, PluginOptions};
pub use contact::{ContactRecord, OrganizationInfo};
pub use encoder::{CardEncoder, EncodedCard, EscapeMode};
pub use filename::derive_filename;
pub use hashing::{card_fingerprint, sha256_hex};
pub use pipeline::{CardPipeline, PipelineError, RunReport, WrittenCard};
pub use source::{nodes_at, resolve_json, DataProvider, JsonFileProvider, SourceError};
pub use writer::{write_card, CardWriter, CollisionPolicy, WriteError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
