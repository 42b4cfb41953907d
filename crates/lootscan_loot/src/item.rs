use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized reward item, the unit of the loot dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    /// Item identifier without namespace (e.g. `diamond_sword`).
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbreakable: Option<bool>,
    /// Declaration order is significant: merging matches entries by index.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enchantments: Vec<Enchantment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchant_with_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_components: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_nbt: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "DropCondition::is_empty")]
    pub condition: DropCondition,
}

impl CanonicalItem {
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            name: None,
            lore: None,
            unbreakable: None,
            enchantments: Vec::new(),
            attributes: Vec::new(),
            enchant_with_level: None,
            raw_components: None,
            raw_nbt: None,
            condition: DropCondition::default(),
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: DropCondition) -> Self {
        self.condition = condition;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enchantment {
    #[serde(rename = "type")]
    pub kind: String,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Modifier operation, e.g. `add_value` or `addition`.
    #[serde(rename = "type")]
    pub operation: String,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// Progression gate attached to a drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stone_mined: Option<ScoreRange>,
}

impl DropCondition {
    pub fn stone_mined(range: ScoreRange) -> Self {
        Self {
            stone_mined: Some(range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stone_mined.is_none()
    }

    /// Returns `self` unless it is empty, in which case `fallback` applies.
    pub fn or<'a>(&'a self, fallback: &'a DropCondition) -> &'a DropCondition {
        if self.is_empty() { fallback } else { self }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl ScoreRange {
    pub const fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }
}

/// `minecraft:diamond_sword` -> `diamond_sword`. Identifiers without a
/// namespace are returned unchanged.
pub fn strip_namespace(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, path)| path)
}
