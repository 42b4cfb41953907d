//! Item modifiers (loot functions) and their decoders.
//!
//! Each recognized function kind decodes independently into an [`ItemPatch`];
//! the assembler applies patches in [`DECODERS`] order.

use crate::LootError;
use crate::item::{Attribute, Enchantment, strip_namespace};
use crate::text::{lore_lines, text_of};
use crate::value::NumberProvider;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKind {
    SetNbt,
    SetAttributes,
    SetEnchantments,
    EnchantWithLevels,
    SetName,
    SetLore,
    SetComponents,
}

pub type Decoder = fn(&Value) -> Option<ItemPatch>;

/// Function name, kind and decoder, in application order.
pub const DECODERS: [(&str, ModifierKind, Decoder); 7] = [
    ("set_nbt", ModifierKind::SetNbt, decode_nbt),
    ("set_attributes", ModifierKind::SetAttributes, decode_attributes),
    ("set_enchantments", ModifierKind::SetEnchantments, decode_enchantments),
    ("enchant_with_levels", ModifierKind::EnchantWithLevels, decode_enchant_with_levels),
    ("set_name", ModifierKind::SetName, decode_name),
    ("set_lore", ModifierKind::SetLore, decode_lore),
    ("set_components", ModifierKind::SetComponents, decode_components),
];

impl ModifierKind {
    pub fn from_function(function: &str) -> Option<Self> {
        let function = strip_namespace(function);
        DECODERS
            .iter()
            .find(|(name, _, _)| *name == function)
            .map(|(_, kind, _)| *kind)
    }

    fn decoder(self) -> Decoder {
        DECODERS[self as usize].2
    }
}

/// Partial item produced by a single modifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    /// Raw, possibly namespaced, item id replacing the entry's own.
    pub item_type: Option<String>,
    pub name: Option<String>,
    pub lore: Option<Vec<String>>,
    pub unbreakable: bool,
    pub enchantments: Vec<Enchantment>,
    pub attributes: Vec<Attribute>,
    pub enchant_with_level: Option<i32>,
    pub raw_nbt: Option<Map<String, Value>>,
    pub raw_components: Option<Map<String, Value>>,
}

/// One entry of a loot entry's `functions` list.
#[derive(Debug, Clone, Copy)]
pub struct Modifier<'a> {
    pub kind: ModifierKind,
    pub record: &'a Value,
}

impl<'a> Modifier<'a> {
    pub fn parse(record: &'a Value) -> Result<Self, LootError> {
        let function = function_name(record);
        ModifierKind::from_function(function)
            .map(|kind| Modifier { kind, record })
            .ok_or_else(|| LootError::UnrecognizedModifier {
                function: function.to_owned(),
            })
    }

    /// Fails when the record's shape does not match its kind.
    pub fn decode(&self) -> Result<ItemPatch, LootError> {
        (self.kind.decoder())(self.record).ok_or_else(|| LootError::UnrecognizedModifier {
            function: function_name(self.record).to_owned(),
        })
    }
}

fn function_name(record: &Value) -> &str {
    record
        .get("function")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn decode_nbt(record: &Value) -> Option<ItemPatch> {
    let tag = match record.get("tag")? {
        Value::String(s) => lootscan_snbt::compound_from_str(s).ok()?,
        Value::Object(map) => map.clone(),
        _ => return None,
    };
    let display = tag.get("display");
    Some(ItemPatch {
        name: display.and_then(|d| d.get("Name")).and_then(text_of),
        lore: display.and_then(|d| d.get("Lore")).and_then(lore_lines),
        unbreakable: tag.get("Unbreakable").is_some_and(truthy),
        raw_nbt: Some(tag),
        ..Default::default()
    })
}

fn decode_attributes(record: &Value) -> Option<ItemPatch> {
    let modifiers = record.get("modifiers")?.as_array()?;
    let attributes = modifiers
        .iter()
        .filter_map(|modifier| {
            let amount = NumberProvider::from_json(modifier.get("amount")?);
            Some(Attribute {
                name: strip_namespace(modifier.get("attribute")?.as_str()?).to_owned(),
                operation: modifier
                    .get("operation")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
                min: amount.lower()?,
                max: amount.upper()?,
                slot: match modifier.get("slot") {
                    Some(Value::String(slot)) => Some(slot.clone()),
                    Some(Value::Array(slots)) => slots.first().and_then(Value::as_str).map(str::to_owned),
                    _ => None,
                },
            })
        })
        .collect();
    Some(ItemPatch {
        attributes,
        ..Default::default()
    })
}

fn decode_enchantments(record: &Value) -> Option<ItemPatch> {
    let enchantments = record
        .get("enchantments")?
        .as_object()?
        .iter()
        .map(|(id, level)| {
            let (min, max) = enchantment_levels(level);
            Enchantment {
                kind: strip_namespace(id).to_owned(),
                min,
                max,
            }
        })
        .collect();
    Some(ItemPatch {
        enchantments,
        ..Default::default()
    })
}

/// A bare level fixes both bounds; an object supplies `min`/`max` (scalars or
/// providers), each defaulting to 1.
fn enchantment_levels(level: &Value) -> (i32, i32) {
    let bound = |value: Option<&Value>, pick: fn(&NumberProvider) -> Option<f64>| {
        value
            .and_then(|v| pick(&NumberProvider::from_json(v)))
            .map_or(1, |v| v as i32)
    };
    match level {
        Value::Number(n) => {
            let level = n.as_f64().map_or(1, |v| v as i32);
            (level, level)
        }
        Value::Object(map) if map.contains_key("min") || map.contains_key("max") => (
            bound(map.get("min"), NumberProvider::lower),
            bound(map.get("max"), NumberProvider::upper),
        ),
        Value::Object(map) => {
            let level = bound(map.get("value"), NumberProvider::lower);
            (level, level)
        }
        _ => (1, 1),
    }
}

fn decode_enchant_with_levels(record: &Value) -> Option<ItemPatch> {
    let levels = NumberProvider::from_json(record.get("levels")?);
    Some(ItemPatch {
        enchant_with_level: Some(levels.upper()? as i32),
        ..Default::default()
    })
}

fn decode_name(record: &Value) -> Option<ItemPatch> {
    Some(ItemPatch {
        name: Some(text_of(record.get("name")?)?),
        ..Default::default()
    })
}

fn decode_lore(record: &Value) -> Option<ItemPatch> {
    Some(ItemPatch {
        lore: Some(lore_lines(record.get("lore")?)?),
        ..Default::default()
    })
}

fn decode_components(record: &Value) -> Option<ItemPatch> {
    let components = record.get("components")?.as_object()?;
    let mut patch = ItemPatch::default();
    let mut item_name = None;
    for (key, value) in components {
        // "!minecraft:foo" removes a component
        if key.starts_with('!') {
            continue;
        }
        match strip_namespace(key) {
            "unbreakable" => patch.unbreakable = true,
            "custom_name" => patch.name = text_of(value),
            "item_name" => item_name = text_of(value),
            "lore" => patch.lore = lore_lines(value),
            "item_model" => patch.item_type = value.as_str().map(str::to_owned),
            _ => {}
        }
    }
    if patch.name.is_none() {
        patch.name = item_name;
    }
    patch.raw_components = Some(components.clone());
    Some(patch)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(record: Value) -> ItemPatch {
        Modifier::parse(&record).unwrap().decode().unwrap()
    }

    #[test]
    fn table_order_matches_kind_order() {
        for (index, (_, kind, _)) in DECODERS.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
        assert_eq!(ModifierKind::from_function("minecraft:set_lore"), Some(ModifierKind::SetLore));
        assert_eq!(ModifierKind::from_function("set_nbt"), Some(ModifierKind::SetNbt));
        assert_eq!(ModifierKind::from_function("minecraft:set_count"), None);
    }

    #[test]
    fn unknown_function_is_unrecognized() {
        let record = json!({"function": "minecraft:set_count", "count": 2});
        assert!(matches!(
            Modifier::parse(&record),
            Err(LootError::UnrecognizedModifier { function }) if function == "minecraft:set_count"
        ));
    }

    #[test]
    fn malformed_shape_is_unrecognized() {
        let record = json!({"function": "minecraft:set_enchantments", "enchantments": []});
        let modifier = Modifier::parse(&record).unwrap();
        assert!(matches!(modifier.decode(), Err(LootError::UnrecognizedModifier { .. })));
    }

    #[test]
    fn legacy_nbt_tag() {
        let patch = decode(json!({
            "function": "minecraft:set_nbt",
            "tag": "{display:{Name:'{\"text\":\"Frostbite\"}',Lore:['{\"text\":\"Cold\"}','{\"text\":\"Sharp\"}']},Unbreakable:1b}"
        }));
        assert_eq!(patch.name.as_deref(), Some("Frostbite"));
        assert_eq!(patch.lore, Some(vec!["Cold".to_owned(), "Sharp".to_owned()]));
        assert!(patch.unbreakable);
        assert!(patch.raw_nbt.unwrap().contains_key("display"));
    }

    #[test]
    fn nbt_without_unbreakable_flag() {
        let patch = decode(json!({"function": "set_nbt", "tag": "{Unbreakable:0b,CustomModelData:3}"}));
        assert!(!patch.unbreakable);
        assert_eq!(patch.name, None);
    }

    #[test]
    fn attributes_scalar_range_and_slots() {
        let patch = decode(json!({
            "function": "minecraft:set_attributes",
            "modifiers": [
                {"attribute": "minecraft:generic.attack_damage", "operation": "addition", "amount": 4, "slot": "mainhand"},
                {"attribute": "minecraft:generic.max_health", "operation": "add_value",
                 "amount": {"type": "minecraft:uniform", "min": 1.5, "max": 3.0}, "slot": ["offhand", "mainhand"]},
                {"attribute": "minecraft:generic.luck", "operation": "addition", "amount": 1}
            ]
        }));
        assert_eq!(
            patch.attributes,
            vec![
                Attribute {
                    name: "generic.attack_damage".into(),
                    operation: "addition".into(),
                    min: 4.0,
                    max: 4.0,
                    slot: Some("mainhand".into()),
                },
                Attribute {
                    name: "generic.max_health".into(),
                    operation: "add_value".into(),
                    min: 1.5,
                    max: 3.0,
                    slot: Some("offhand".into()),
                },
                Attribute {
                    name: "generic.luck".into(),
                    operation: "addition".into(),
                    min: 1.0,
                    max: 1.0,
                    slot: None,
                },
            ]
        );
    }

    #[test]
    fn enchantment_level_shapes() {
        let patch = decode(json!({
            "function": "minecraft:set_enchantments",
            "enchantments": {
                "minecraft:sharpness": {"min": 1, "max": 3},
                "minecraft:unbreaking": {"min": {"type": "minecraft:constant", "value": 2}},
                "minecraft:mending": 1,
                "minecraft:looting": {"type": "minecraft:constant", "value": 3},
                "minecraft:fire_aspect": {}
            }
        }));
        let levels: Vec<_> = patch
            .enchantments
            .iter()
            .map(|e| (e.kind.as_str(), e.min, e.max))
            .collect();
        assert_eq!(
            levels,
            vec![
                ("sharpness", 1, 3),
                ("unbreaking", 2, 1),
                ("mending", 1, 1),
                ("looting", 3, 3),
                ("fire_aspect", 1, 1),
            ]
        );
    }

    #[test]
    fn enchant_with_levels() {
        let constant = decode(json!({"function": "minecraft:enchant_with_levels", "levels": 30}));
        assert_eq!(constant.enchant_with_level, Some(30));
        let ranged = decode(json!({
            "function": "minecraft:enchant_with_levels",
            "levels": {"type": "minecraft:uniform", "min": 20, "max": 39}
        }));
        assert_eq!(ranged.enchant_with_level, Some(39));
    }

    #[test]
    fn name_shapes() {
        let array = decode(json!({"function": "minecraft:set_name", "name": [{"text": "Relic"}]}));
        assert_eq!(array.name.as_deref(), Some("Relic"));
        let object = decode(json!({"function": "minecraft:set_name", "name": {"text": "Relic", "color": "gold"}}));
        assert_eq!(object.name.as_deref(), Some("Relic"));
    }

    #[test]
    fn lore_lines_from_set_lore() {
        let patch = decode(json!({
            "function": "minecraft:set_lore",
            "lore": [{"text": "First"}, {"text": "Second"}]
        }));
        assert_eq!(patch.lore, Some(vec!["First".to_owned(), "Second".to_owned()]));
    }

    #[test]
    fn component_map() {
        let patch = decode(json!({
            "function": "minecraft:set_components",
            "components": {
                "minecraft:unbreakable": {},
                "minecraft:custom_name": "{\"text\":\"Oathkeeper\",\"italic\":false}",
                "minecraft:item_name": "{\"text\":\"Plain Sword\"}",
                "minecraft:lore": ["{\"text\":\"Sworn\"}"],
                "minecraft:item_model": "mt:oathkeeper",
                "!minecraft:tooltip_display": {}
            }
        }));
        assert!(patch.unbreakable);
        assert_eq!(patch.name.as_deref(), Some("Oathkeeper"));
        assert_eq!(patch.lore, Some(vec!["Sworn".to_owned()]));
        assert_eq!(patch.item_type.as_deref(), Some("mt:oathkeeper"));
        assert_eq!(patch.raw_components.map(|c| c.len()), Some(6));
    }

    #[test]
    fn item_name_used_without_custom_name() {
        let patch = decode(json!({
            "function": "minecraft:set_components",
            "components": {"minecraft:item_name": {"text": "Trophy"}}
        }));
        assert_eq!(patch.name.as_deref(), Some("Trophy"));
    }
}
