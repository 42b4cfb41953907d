use crate::LootError;
use crate::item::{CanonicalItem, DropCondition};
use crate::merge::merge;
use crate::pack::PackReader;
use crate::resolve::TableResolver;
use crate::settings::ExtractorSettings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rarity tier of a chest table, taken from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythical,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Mythical => "mythical",
        }
    }

    /// `epic.json` -> `Some(Epic)`. Anything other than `<tier>.json` is not a
    /// bucket file.
    pub fn from_file_name(file_name: &str, include_mythical: bool) -> Option<Rarity> {
        let stem = file_name.strip_suffix(".json")?;
        Self::ALL
            .into_iter()
            .filter(|rarity| include_mythical || *rarity != Rarity::Mythical)
            .find(|rarity| rarity.as_str() == stem)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ biome: { rarity: [item, ..] } }`, biomes sorted by name and tiers in
/// [`Rarity`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootDataset(IndexMap<String, IndexMap<Rarity, Vec<CanonicalItem>>>);

impl LootDataset {
    pub fn get(&self, biome: &str, rarity: Rarity) -> Option<&[CanonicalItem]> {
        self.0.get(biome)?.get(&rarity).map(Vec::as_slice)
    }

    pub fn biomes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rarity, &[CanonicalItem])> {
        self.0.iter().flat_map(|(biome, tiers)| {
            tiers
                .iter()
                .map(move |(rarity, items)| (biome.as_str(), *rarity, items.as_slice()))
        })
    }

    pub fn item_count(&self) -> usize {
        self.iter().map(|(_, _, items)| items.len()).sum()
    }

    fn add_biome(&mut self, biome: &str) {
        self.0.entry(biome.to_owned()).or_default();
    }

    fn insert(&mut self, biome: &str, rarity: Rarity, items: Vec<CanonicalItem>) {
        self.0.entry(biome.to_owned()).or_default().insert(rarity, items);
    }
}

/// A bucket that could not be resolved.
#[derive(Debug)]
pub struct BucketFailure {
    pub biome: String,
    pub rarity: Rarity,
    pub error: LootError,
}

/// Result of one extraction run. Buckets that failed are absent from
/// `dataset` and listed in `failures`.
#[derive(Debug, Default)]
pub struct Extraction {
    pub dataset: LootDataset,
    pub failures: Vec<BucketFailure>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds the loot dataset of a datapack.
pub struct LootExtractor {
    pack: PackReader,
    settings: ExtractorSettings,
}

impl LootExtractor {
    pub fn new(root: impl Into<PathBuf>, settings: ExtractorSettings) -> Self {
        Self {
            pack: PackReader::new(root),
            settings,
        }
    }

    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Resolves and deduplicates every (biome, rarity) bucket. Only failure to
    /// list the table directories is an error here; bucket failures are
    /// collected into the returned [`Extraction`].
    pub fn extract(&mut self) -> Result<Extraction, LootError> {
        let tables_dir = self.pack.root().join(&self.settings.loot_table_dir);
        let mut extraction = Extraction::default();

        for (biome, biome_dir) in list_dir(&tables_dir, true)? {
            extraction.dataset.add_biome(&biome);
            for (rarity, path) in self.bucket_files(&biome_dir)? {
                self.extract_bucket(&biome, rarity, &path, &mut extraction);
            }
        }

        info!(
            biomes = extraction.dataset.biomes().count(),
            items = extraction.dataset.item_count(),
            failures = extraction.failures.len(),
            "Extracted loot dataset"
        );
        Ok(extraction)
    }

    fn bucket_files(&self, biome_dir: &Path) -> Result<Vec<(Rarity, PathBuf)>, LootError> {
        let mut files = Vec::new();
        for (file_name, path) in list_dir(biome_dir, false)? {
            if self.settings.is_ignored(&file_name) {
                continue;
            }
            match Rarity::from_file_name(&file_name, self.settings.include_mythical) {
                Some(rarity) => files.push((rarity, path)),
                None => debug!(file = %path.display(), "Ignoring non-tier table"),
            }
        }
        files.sort_by_key(|(rarity, _)| *rarity);
        Ok(files)
    }

    fn extract_bucket(&mut self, biome: &str, rarity: Rarity, path: &Path, extraction: &mut Extraction) {
        let resolved = TableResolver::new(&mut self.pack).resolve(path, &DropCondition::default());
        match resolved {
            Ok(items) => {
                let merged = merge(&items);
                info!(
                    biome,
                    rarity = %rarity,
                    resolved = items.len(),
                    merged = merged.len(),
                    "Resolved loot bucket"
                );
                if !merged.is_empty() {
                    extraction.dataset.insert(biome, rarity, merged);
                }
            }
            Err(error) => {
                warn!(biome, rarity = %rarity, %error, "Failed to resolve loot bucket");
                extraction.failures.push(BucketFailure {
                    biome: biome.to_owned(),
                    rarity,
                    error,
                });
            }
        }
    }
}

/// Lists `(file name, path)` of the directories (or regular files) in `dir`,
/// sorted by name.
fn list_dir(dir: &Path, directories: bool) -> Result<Vec<(String, PathBuf)>, LootError> {
    let io_error = |source: std::io::Error| LootError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        if path.is_dir() != directories {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            entries.push((name.to_owned(), path.clone()));
        }
    }
    entries.sort();
    Ok(entries)
}

/// Writes `dataset` as 4-space indented JSON to `out_dir/file_name`, creating
/// `out_dir` if needed. Returns the written path.
pub fn write_dataset(dataset: &LootDataset, out_dir: &Path, file_name: &str) -> Result<PathBuf, LootError> {
    fs::create_dir_all(out_dir).map_err(|source| LootError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    dataset.serialize(&mut ser)?;
    buf.push(b'\n');

    let path = out_dir.join(file_name);
    fs::File::create(&path)
        .and_then(|mut file| file.write_all(&buf))
        .map_err(|source| LootError::Io {
            path: path.clone(),
            source,
        })?;
    info!(path = %path.display(), bytes = buf.len(), "Wrote loot dataset");
    Ok(path)
}
