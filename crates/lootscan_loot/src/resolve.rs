use crate::LootError;
use crate::assemble::assemble_item;
use crate::item::{CanonicalItem, DropCondition};
use crate::loot::LootTableProto;
use crate::loot::condition::{LootConditionProto, progression_range};
use crate::loot::entry::{LootEntryProto, LootTableRef};
use crate::pack::PackReader;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Expands a loot table into the ordered list of items it can drop,
/// following nested table references depth-first.
pub struct TableResolver<'p> {
    pack: &'p mut PackReader,
    /// Tables currently being expanded, outermost first.
    stack: Vec<PathBuf>,
}

impl<'p> TableResolver<'p> {
    pub fn new(pack: &'p mut PackReader) -> Self {
        Self {
            pack,
            stack: Vec::new(),
        }
    }

    /// Resolves the table document at `path`. Item entries without a
    /// progression condition of their own (or on their pool) take `inherited`.
    /// A table reference passes down only its own (or its pool's) condition,
    /// which, when present, replaces the condition of every item it yields.
    pub fn resolve(
        &mut self,
        path: &Path,
        inherited: &DropCondition,
    ) -> Result<Vec<CanonicalItem>, LootError> {
        if self.stack.iter().any(|open| open == path) {
            return Err(LootError::CyclicReference {
                path: path.to_path_buf(),
                chain: self.stack.clone(),
            });
        }
        let table = self.pack.load_table(path)?;
        self.stack.push(path.to_path_buf());
        let items = self.resolve_table(&table, path, inherited);
        self.stack.pop();
        items
    }

    fn resolve_table(
        &mut self,
        table: &LootTableProto,
        path: &Path,
        inherited: &DropCondition,
    ) -> Result<Vec<CanonicalItem>, LootError> {
        let Some(pools) = &table.pools else {
            let error = LootError::MalformedTable {
                path: path.to_path_buf(),
            };
            warn!(%error, "Treating loot table as empty");
            return Ok(Vec::new());
        };

        let mut items = Vec::new();
        for pool in pools {
            let pool_condition = self.condition_of(&pool.conditions)?;
            let inherited = pool_condition.or(inherited);
            for entry in &pool.entries {
                match entry {
                    LootEntryProto::Item {
                        name,
                        conditions,
                        functions,
                    } => {
                        let own = self.condition_of(conditions)?;
                        items.push(assemble_item(name, functions, own.or(inherited).clone()));
                    }
                    LootEntryProto::LootTable { value, conditions } => {
                        // the sub-table sees only this entry's gate, never the inherited one
                        let own = self.condition_of(conditions)?;
                        let effective = own.or(&pool_condition).clone();
                        let nested = match value {
                            LootTableRef::Named(id) => {
                                let target = self.pack.table_path(id)?;
                                self.resolve(&target, &effective)?
                            }
                            LootTableRef::Inline(table) => {
                                self.resolve_table(table, path, &effective)?
                            }
                        };
                        if effective.is_empty() {
                            items.extend(nested);
                        } else {
                            items.extend(
                                nested
                                    .into_iter()
                                    .map(|item| item.with_condition(effective.clone())),
                            );
                        }
                    }
                    LootEntryProto::Unknown => {}
                }
            }
        }
        Ok(items)
    }

    fn condition_of(
        &mut self,
        conditions: &[LootConditionProto],
    ) -> Result<DropCondition, LootError> {
        if conditions.is_empty() {
            return Ok(DropCondition::default());
        }
        let pack = &mut *self.pack;
        let range = progression_range(conditions, &mut |name: &str| pack.load_predicate(name))?;
        Ok(range.map(DropCondition::stone_mined).unwrap_or_default())
    }
}
