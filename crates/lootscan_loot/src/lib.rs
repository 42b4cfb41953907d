//! Loot table mining for treasure datapacks.
//!
//! Walks the per-biome chest tables of a datapack, expands nested table
//! references, normalizes every dropped item into a [`CanonicalItem`] and
//! collapses near-duplicate declarations into single records with widened
//! enchantment and attribute ranges.
//!
//! The entry point is [`LootExtractor`]; the individual stages are available as
//! [`assemble::assemble_item`], [`resolve::TableResolver`] and [`merge::merge`].

pub mod assemble;
pub mod dataset;
pub mod item;
pub mod loot;
pub mod merge;
pub mod pack;
pub mod resolve;
pub mod settings;
mod text;
pub mod value;

pub use dataset::{BucketFailure, Extraction, LootDataset, LootExtractor, Rarity, write_dataset};
pub use item::{Attribute, CanonicalItem, DropCondition, Enchantment, ScoreRange};
pub use pack::PackReader;
pub use resolve::TableResolver;
pub use settings::ExtractorSettings;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LootError {
    #[error("loot table {} has no pools", .path.display())]
    MalformedTable { path: PathBuf },

    #[error("unrecognized item modifier {function:?}")]
    UnrecognizedModifier { function: String },

    #[error("cyclic reference to {} (via {})", .path.display(), format_chain(.chain))]
    CyclicReference { path: PathBuf, chain: Vec<PathBuf> },

    #[error("{} not found (referenced as {reference})", .path.display())]
    MissingFile { path: PathBuf, reference: String },

    #[error("invalid reference {reference:?}: {message}")]
    InvalidReference { reference: String, message: String },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode loot dataset: {0}")]
    Encode(#[from] serde_json::Error),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
