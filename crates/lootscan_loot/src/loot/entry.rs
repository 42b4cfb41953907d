use crate::loot::LootTableProto;
use crate::loot::condition::LootConditionProto;
use serde::Deserialize;
use valence_ident::Ident;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum LootEntryProto {
    #[serde(rename = "minecraft:item", alias = "item")]
    Item {
        name: Ident<String>,
        #[serde(default)]
        conditions: Vec<LootConditionProto>,
        #[serde(default)]
        functions: Vec<serde_json::Value>,
    },
    #[serde(rename = "minecraft:loot_table", alias = "loot_table")]
    LootTable {
        /// Current packs use `value`, older ones `name`.
        #[serde(alias = "name")]
        value: LootTableRef,
        #[serde(default)]
        conditions: Vec<LootConditionProto>,
    },
    #[serde(other)]
    Unknown,
}

/// Target of a `loot_table` entry: another document, or a table written inline.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LootTableRef {
    Named(Ident<String>),
    Inline(Box<LootTableProto>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_encodings() {
        let item: LootEntryProto =
            serde_json::from_str(r#"{"type": "item", "name": "minecraft:apple"}"#).unwrap();
        assert!(matches!(item, LootEntryProto::Item { ref functions, .. } if functions.is_empty()));

        let table: LootEntryProto =
            serde_json::from_str(r#"{"type": "loot_table", "name": "minecraft:chests/shared"}"#).unwrap();
        assert!(matches!(
            table,
            LootEntryProto::LootTable { value: LootTableRef::Named(ref id), .. } if id.path() == "chests/shared"
        ));
    }

    #[test]
    fn inline_table_reference() {
        let entry: LootEntryProto = serde_json::from_str(
            r#"{"type": "minecraft:loot_table", "value": {"pools": [{"rolls": 1, "entries": []}]}}"#,
        )
        .unwrap();
        match entry {
            LootEntryProto::LootTable {
                value: LootTableRef::Inline(table),
                ..
            } => assert_eq!(table.pools.map(|p| p.len()), Some(1)),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn reference_functions_are_tolerated() {
        let entry: LootEntryProto = serde_json::from_str(
            r#"{"type": "minecraft:loot_table", "value": "mt:gems", "weight": 2,
                "functions": [{"function": "minecraft:set_count", "count": 3}]}"#,
        )
        .unwrap();
        assert!(matches!(
            entry,
            LootEntryProto::LootTable { value: LootTableRef::Named(ref id), ref conditions } if id.path() == "gems" && conditions.is_empty()
        ));
    }

    #[test]
    fn other_entry_types_are_unknown() {
        for kind in ["minecraft:empty", "minecraft:tag", "minecraft:alternatives", "minecraft:dynamic"] {
            let json = format!(r#"{{"type": "{kind}"}}"#);
            let entry: LootEntryProto = serde_json::from_str(&json).unwrap();
            assert!(matches!(entry, LootEntryProto::Unknown));
        }
    }
}
