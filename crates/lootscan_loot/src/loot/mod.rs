pub mod condition;
pub mod entry;
pub mod function;

use crate::loot::condition::LootConditionProto;
use crate::loot::entry::LootEntryProto;
use serde::Deserialize;

// ============================================================================
// Proto types (JSON deserialization)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LootTableProto {
    /// `None` when the document has no `pools` key at all.
    #[serde(default)]
    pub pools: Option<Vec<LootPoolProto>>,
}

/// `rolls`, `bonus_rolls` and pool `functions` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LootPoolProto {
    #[serde(default)]
    pub entries: Vec<LootEntryProto>,
    #[serde(default)]
    pub conditions: Vec<LootConditionProto>,
}
