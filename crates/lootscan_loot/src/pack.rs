use crate::LootError;
use crate::loot::LootTableProto;
use crate::loot::condition::LootConditionProto;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use tracing::debug;
use valence_ident::Ident;

/// Registry directory names, current layout first.
const LOOT_TABLE_DIRS: [&str; 2] = ["loot_table", "loot_tables"];
const PREDICATE_DIRS: [&str; 2] = ["predicate", "predicates"];

/// Read access to a datapack on disk.
///
/// Parsed documents are cached by path for the lifetime of the reader, so a
/// table shared between buckets is read once.
pub struct PackReader {
    root: PathBuf,
    tables: FxHashMap<PathBuf, Rc<LootTableProto>>,
    predicates: FxHashMap<PathBuf, Rc<Vec<LootConditionProto>>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PredicateFile {
    Many(Vec<LootConditionProto>),
    One(LootConditionProto),
}

impl PackReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tables: FxHashMap::default(),
            predicates: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `mt:shared/gems` -> `<root>/data/mt/loot_table/shared/gems.json`
    pub fn table_path(&self, id: &Ident<String>) -> Result<PathBuf, LootError> {
        self.registry_path(id, &LOOT_TABLE_DIRS)
    }

    pub fn predicate_path(&self, id: &Ident<String>) -> Result<PathBuf, LootError> {
        self.registry_path(id, &PREDICATE_DIRS)
    }

    fn registry_path(&self, id: &Ident<String>, dirs: &[&str]) -> Result<PathBuf, LootError> {
        let candidates: Vec<PathBuf> = dirs
            .iter()
            .map(|dir| {
                self.root
                    .join("data")
                    .join(id.namespace())
                    .join(dir)
                    .join(format!("{}.json", id.path()))
            })
            .collect();
        match candidates.iter().position(|path| path.is_file()) {
            Some(found) => Ok(candidates[found].clone()),
            None => Err(LootError::MissingFile {
                path: candidates.into_iter().next().unwrap_or_default(),
                reference: id.to_string(),
            }),
        }
    }

    pub fn load_table(&mut self, path: &Path) -> Result<Rc<LootTableProto>, LootError> {
        if let Some(table) = self.tables.get(path) {
            return Ok(table.clone());
        }
        let table: Rc<LootTableProto> = Rc::new(read_json(path)?);
        debug!(
            path = %path.display(),
            pools = table.pools.as_ref().map_or(0, Vec::len),
            "Loaded loot table"
        );
        self.tables.insert(path.to_path_buf(), table.clone());
        Ok(table)
    }

    /// Loads the conditions of the predicate named `name`. A predicate file
    /// holds either one condition or an array of them.
    pub fn load_predicate(&mut self, name: &str) -> Result<Rc<Vec<LootConditionProto>>, LootError> {
        let id = Ident::<String>::from_str(name).map_err(|e| LootError::InvalidReference {
            reference: name.to_owned(),
            message: e.to_string(),
        })?;
        let path = self.predicate_path(&id)?;
        if let Some(predicate) = self.predicates.get(&path) {
            return Ok(predicate.clone());
        }
        let conditions = match read_json(&path)? {
            PredicateFile::Many(conditions) => conditions,
            PredicateFile::One(condition) => vec![condition],
        };
        debug!(predicate = %id, conditions = conditions.len(), "Loaded predicate");
        let predicate = Rc::new(conditions);
        self.predicates.insert(path, predicate.clone());
        Ok(predicate)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LootError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LootError::MissingFile {
            path: path.to_path_buf(),
            reference: path.display().to_string(),
        },
        _ => LootError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LootError::Json {
        path: path.to_path_buf(),
        source,
    })
}
